use crate::error::InvalidInput;
use std::fmt;
use std::str::FromStr;

use anyhow::{Error, Result, bail};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Number of distinct tile kinds.
pub const TILE_KINDS: usize = 34;

const MJAI_PAI_STRINGS: [&str; TILE_KINDS] = [
    "1m", "2m", "3m", "4m", "5m", "6m", "7m", "8m", "9m", // m
    "1p", "2p", "3p", "4p", "5p", "6p", "7p", "8p", "9p", // p
    "1s", "2s", "3s", "4s", "5s", "6s", "7s", "8s", "9s", // s
    "E", "S", "W", "N", "P", "F", "C", // z
];

/// Terminals and honors, the thirteen kinds a thirteen orphans hand is built
/// from.
pub const YAOKYUU: [u8; 13] = [0, 8, 9, 17, 18, 26, 27, 28, 29, 30, 31, 32, 33];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Suit {
    /// 萬子, `m`
    Characters,
    /// 筒子, `p`
    Dots,
    /// 索子, `s`
    Bamboo,
    /// 字牌, `z`. Ranks 1-4 are the winds E S W N, 5-7 are the dragons P F C.
    Honors,
}

/// One of the 34 tile kinds.
///
/// The inner ordinal is the canonical ordering used by every count table in
/// this crate: suit first (m, p, s, z), then rank.
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Tile(u8);

impl Suit {
    #[inline]
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    #[inline]
    #[must_use]
    pub const fn max_rank(self) -> u8 {
        match self {
            Self::Honors => 7,
            _ => 9,
        }
    }

    pub(crate) fn from_notation(b: u8) -> Option<Self> {
        match b {
            b'm' => Some(Self::Characters),
            b'p' => Some(Self::Dots),
            b's' => Some(Self::Bamboo),
            b'z' => Some(Self::Honors),
            _ => None,
        }
    }
}

impl Tile {
    /// Every tile kind in canonical order.
    pub const ALL: [Tile; TILE_KINDS] = {
        let mut all = [Tile(0); TILE_KINDS];
        let mut i = 0;
        while i < TILE_KINDS {
            all[i] = Tile(i as u8);
            i += 1;
        }
        all
    };

    /// `id` must be below 34. Only meant for constants built by the `t!`
    /// macro; everything else goes through `TryFrom`.
    #[inline]
    #[must_use]
    pub const fn new_unchecked(id: u8) -> Self {
        assert!((id as usize) < TILE_KINDS, "tile id out of range");
        Self(id)
    }

    pub fn new(suit: Suit, rank: u8) -> Result<Self> {
        if rank == 0 || rank > suit.max_rank() {
            bail!(InvalidInput::BadNotation(format!("rank {rank} does not exist in {suit:?}")));
        }
        Ok(Self(suit.as_u8() * 9 + rank - 1))
    }

    #[inline]
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self.0
    }

    #[inline]
    #[must_use]
    pub const fn as_usize(self) -> usize {
        self.0 as usize
    }

    #[inline]
    #[must_use]
    pub const fn suit(self) -> Suit {
        match self.0 / 9 {
            0 => Suit::Characters,
            1 => Suit::Dots,
            2 => Suit::Bamboo,
            _ => Suit::Honors,
        }
    }

    /// 1-9 for suited tiles, 1-7 for honors.
    #[inline]
    #[must_use]
    pub const fn rank(self) -> u8 {
        self.0 % 9 + 1
    }

    #[inline]
    #[must_use]
    pub const fn is_jihai(self) -> bool {
        self.0 >= 27
    }

    /// Terminal or honor.
    #[inline]
    #[must_use]
    pub const fn is_yaokyuu(self) -> bool {
        self.is_jihai() || matches!(self.0 % 9, 0 | 8)
    }
}

impl TryFrom<u8> for Tile {
    type Error = InvalidInput;

    fn try_from(v: u8) -> Result<Self, Self::Error> {
        if (v as usize) < TILE_KINDS {
            Ok(Self(v))
        } else {
            Err(InvalidInput::BadNotation(format!("tile id {v} is out of range")))
        }
    }
}

impl TryFrom<usize> for Tile {
    type Error = InvalidInput;

    fn try_from(v: usize) -> Result<Self, Self::Error> {
        u8::try_from(v)
            .map_err(|_| InvalidInput::BadNotation(format!("tile id {v} is out of range")))
            .and_then(Self::try_from)
    }
}

impl FromStr for Tile {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        if let Some(id) = MJAI_PAI_STRINGS.iter().position(|&p| p == s) {
            return Ok(Self(id as u8));
        }
        // 1z-7z is common in hand notation even though mjai never emits it
        if let &[rank @ b'1'..=b'7', b'z'] = s.as_bytes() {
            return Tile::new(Suit::Honors, rank - b'0');
        }
        bail!(InvalidInput::BadNotation(format!("{s:?} is not a tile")))
    }
}

impl fmt::Debug for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl fmt::Display for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(MJAI_PAI_STRINGS[self.as_usize()])
    }
}

impl Serialize for Tile {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(MJAI_PAI_STRINGS[self.as_usize()])
    }
}

impl<'de> Deserialize<'de> for Tile {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Tile ordinal from notation tokens, usable in `const` and `match` position.
///
/// ```
/// use tehai::tu8;
/// assert_eq!(tu8!(1m), 0);
/// assert_eq!(tu8!(C), 33);
/// ```
#[macro_export]
macro_rules! tu8 {
    (1m) => { 0_u8 }; (2m) => { 1_u8 }; (3m) => { 2_u8 };
    (4m) => { 3_u8 }; (5m) => { 4_u8 }; (6m) => { 5_u8 };
    (7m) => { 6_u8 }; (8m) => { 7_u8 }; (9m) => { 8_u8 };
    (1p) => { 9_u8 }; (2p) => { 10_u8 }; (3p) => { 11_u8 };
    (4p) => { 12_u8 }; (5p) => { 13_u8 }; (6p) => { 14_u8 };
    (7p) => { 15_u8 }; (8p) => { 16_u8 }; (9p) => { 17_u8 };
    (1s) => { 18_u8 }; (2s) => { 19_u8 }; (3s) => { 20_u8 };
    (4s) => { 21_u8 }; (5s) => { 22_u8 }; (6s) => { 23_u8 };
    (7s) => { 24_u8 }; (8s) => { 25_u8 }; (9s) => { 26_u8 };
    (E) => { 27_u8 }; (S) => { 28_u8 }; (W) => { 29_u8 }; (N) => { 30_u8 };
    (P) => { 31_u8 }; (F) => { 32_u8 }; (C) => { 33_u8 };
    ($($s:tt),* $(,)?) => { [$($crate::tu8!($s)),*] };
}

#[macro_export]
macro_rules! tuz {
    ($s:tt) => { $crate::tu8!($s) as usize };
}

#[macro_export]
macro_rules! t {
    ($s:tt) => { $crate::tile::Tile::new_unchecked($crate::tu8!($s)) };
    ($($s:tt),* $(,)?) => { [$($crate::t!($s)),*] };
}

#[cfg(test)]
pub mod test {
    use super::*;

    #[test]
    fn notation_round_trip() {
        for tile in Tile::ALL {
            let s = tile.to_string();
            assert_eq!(s.parse::<Tile>().unwrap(), tile, "failed for {s}");
        }
        assert_eq!("5z".parse::<Tile>().unwrap(), t!(P));
        assert_eq!("7z".parse::<Tile>().unwrap(), t!(C));
        "8z".parse::<Tile>().unwrap_err();
        "0m".parse::<Tile>().unwrap_err();
        "".parse::<Tile>().unwrap_err();
    }

    #[test]
    fn suit_and_rank() {
        assert_eq!(t!(1m).suit(), Suit::Characters);
        assert_eq!(t!(9p).suit(), Suit::Dots);
        assert_eq!(t!(9p).rank(), 9);
        assert_eq!(t!(5s).suit(), Suit::Bamboo);
        assert_eq!(t!(N).suit(), Suit::Honors);
        assert_eq!(t!(N).rank(), 4);
        for tile in Tile::ALL {
            assert_eq!(Tile::new(tile.suit(), tile.rank()).unwrap(), tile);
        }
        Tile::new(Suit::Honors, 8).unwrap_err();
        Tile::new(Suit::Bamboo, 0).unwrap_err();
    }

    #[test]
    fn ordering_is_suit_then_rank() {
        assert!(t!(9m) < t!(1p));
        assert!(t!(9s) < t!(E));
        assert!(t!(E) < t!(C));
        assert!(Tile::ALL.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn yaokyuu() {
        let yaokyuu = Tile::ALL
            .iter()
            .filter(|t| t.is_yaokyuu())
            .map(|t| t.as_u8())
            .collect::<Vec<_>>();
        assert_eq!(yaokyuu, YAOKYUU);
        assert_eq!(tu8![1m, 9m, E], [0, 8, 27]);
        assert_eq!(tuz!(F), 32);
    }

    #[test]
    fn conversions() {
        assert_eq!(Tile::try_from(33_u8).unwrap(), t!(C));
        Tile::try_from(34_u8).unwrap_err();
        Tile::try_from(300_usize).unwrap_err();
    }
}
