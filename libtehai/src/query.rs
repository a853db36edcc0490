//! The resolver: which shape is a hand closest to, and how close.
use crate::algo::{agari, shanten, wait};
use crate::hand::{count, ensure_hand};
use crate::tile::{TILE_KINDS, Tile};

use anyhow::Result;
use serde::Serialize;
use tinyvec::ArrayVec;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Family {
    /// Four melds and a pair.
    Standard,
    SevenPairs,
    ThirteenOrphans,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ShantenResult {
    /// -1 for a complete hand, 0 for tenpai.
    pub shanten: i8,
    pub family: Family,
}

/// A validated question about a hand. The caller picks the variant; the
/// hand size is checked when the query is built, not guessed from it later.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandQuery {
    /// 14 tiles, is it complete?
    Complete([u8; TILE_KINDS]),
    /// 13 tiles, how far from tenpai?
    Shanten([u8; TILE_KINDS]),
}

impl Family {
    /// Resolution order, which is also the tie-break priority.
    pub const ALL: [Self; 3] = [Self::Standard, Self::SevenPairs, Self::ThirteenOrphans];
}

impl HandQuery {
    pub fn complete(tiles: &[Tile]) -> Result<Self> {
        Self::complete_from_counts(count(tiles))
    }

    pub fn shanten(tiles: &[Tile]) -> Result<Self> {
        Self::shanten_from_counts(count(tiles))
    }

    pub fn complete_from_counts(tehai: [u8; TILE_KINDS]) -> Result<Self> {
        ensure_hand(&tehai, 14)?;
        Ok(Self::Complete(tehai))
    }

    pub fn shanten_from_counts(tehai: [u8; TILE_KINDS]) -> Result<Self> {
        ensure_hand(&tehai, 13)?;
        Ok(Self::Shanten(tehai))
    }

    #[must_use]
    pub const fn tehai(&self) -> &[u8; TILE_KINDS] {
        match self {
            Self::Complete(tehai) | Self::Shanten(tehai) => tehai,
        }
    }

    /// Tiles that complete the hand in any shape. A complete query has
    /// nothing left to wait on.
    #[must_use]
    pub fn waits(&self) -> ArrayVec<[Tile; TILE_KINDS]> {
        match self {
            Self::Complete(_) => ArrayVec::new(),
            Self::Shanten(tehai) => wait::waits_of(tehai),
        }
    }

    /// Unseen copies of [`waits`](Self::waits), with the hand and `visible`
    /// counted as seen.
    #[must_use]
    pub fn acceptance(&self, visible: &[Tile]) -> u8 {
        match self {
            Self::Complete(_) => 0,
            Self::Shanten(tehai) => wait::acceptance_of(tehai, visible),
        }
    }

    /// A complete query only ever answers with the standard shape: -1 if the
    /// hand is four melds and a pair, 0 otherwise.
    ///
    /// A shanten query takes the minimum over the three families. On a tie
    /// the earlier family in [`Family::ALL`] keeps the tag.
    #[must_use]
    pub fn resolve(&self) -> ShantenResult {
        match self {
            Self::Complete(tehai) => {
                let shanten = if agari::is_standard_agari(tehai) { -1 } else { 0 };
                log::trace!("complete query: shanten {shanten}");
                ShantenResult {
                    shanten,
                    family: Family::Standard,
                }
            }
            Self::Shanten(tehai) => {
                let values = family_shanten(tehai);
                log::trace!(
                    "standard {}, seven pairs {}, thirteen orphans {}",
                    values[0],
                    values[1],
                    values[2],
                );
                let mut best = ShantenResult {
                    shanten: values[0],
                    family: Family::Standard,
                };
                for (&family, &shanten) in Family::ALL.iter().zip(&values).skip(1) {
                    if shanten < best.shanten {
                        best = ShantenResult { shanten, family };
                    }
                }
                best
            }
        }
    }
}

/// Shanten of a 13-tile count table in every family, in [`Family::ALL`]
/// order. The table is assumed to be validated already.
pub(crate) fn family_shanten(tehai: &[u8; TILE_KINDS]) -> [i8; 3] {
    [shanten::normal(tehai), shanten::chitoi(tehai), shanten::kokushi(tehai)]
}

/// Per-family shanten of a 13-tile hand.
pub fn all_families(tehai: &[u8; TILE_KINDS]) -> Result<[(Family, i8); 3]> {
    ensure_hand(tehai, 13)?;
    let values = family_shanten(tehai);
    Ok([
        (Family::Standard, values[0]),
        (Family::SevenPairs, values[1]),
        (Family::ThirteenOrphans, values[2]),
    ])
}

#[cfg(test)]
pub mod test {
    use super::*;
    use crate::error::InvalidInput;
    use crate::hand::{hand, parse_tiles};
    use crate::t;

    fn resolve(s: &str) -> ShantenResult {
        HandQuery::shanten_from_counts(hand(s).unwrap()).unwrap().resolve()
    }

    #[test]
    fn tenpai_then_complete() {
        let mut tiles = parse_tiles("123m 123p 123s 555m 9p").unwrap();
        assert_eq!(
            resolve("123m 123p 123s 555m 9p"),
            ShantenResult {
                shanten: 0,
                family: Family::Standard,
            },
        );

        tiles.push(t!(9p));
        let result = HandQuery::complete(&tiles).unwrap().resolve();
        assert_eq!(result.shanten, -1);
        assert_eq!(result.family, Family::Standard);
    }

    #[test]
    fn other_families_win() {
        assert_eq!(
            resolve("1133m 5577p 99s 11z 2z"),
            ShantenResult {
                shanten: 0,
                family: Family::SevenPairs,
            },
        );
        assert_eq!(
            resolve("19m 19p 19s 1234566z"),
            ShantenResult {
                shanten: 0,
                family: Family::ThirteenOrphans,
            },
        );
        assert_eq!(
            resolve("147m 258p 369s 1234z"),
            ShantenResult {
                shanten: 6,
                family: Family::SevenPairs,
            },
        );
    }

    #[test]
    fn ties_keep_the_standard_tag() {
        // standard and seven pairs are both 1-shanten here
        let tehai = hand("112233m 55p 77p 9s 12s").unwrap();
        let values = all_families(&tehai).unwrap();
        assert_eq!(values[0], (Family::Standard, 1));
        assert_eq!(values[1], (Family::SevenPairs, 1));
        assert_eq!(
            resolve("112233m 55p 77p 9s 12s"),
            ShantenResult {
                shanten: 1,
                family: Family::Standard,
            },
        );
    }

    #[test]
    fn never_above_any_family() {
        for s in [
            "123m 456p 78s 11z 35m 9p",
            "1133m 5577p 9s 11z 23z",
            "19m 19p 159s 123456z",
            "135m 246p 13s 12345z",
            "1111m 2222p 3344s 5s",
            "2345678m 234567p",
        ] {
            let tehai = hand(s).unwrap();
            let result = HandQuery::shanten_from_counts(tehai).unwrap().resolve();
            for (family, value) in all_families(&tehai).unwrap() {
                assert!(result.shanten <= value, "{s}: {result:?} is above {family:?} {value}");
            }
        }
    }

    #[test]
    fn complete_query_ignores_other_shapes() {
        let result = HandQuery::complete_from_counts(hand("1133m 5577p 99s 1122z").unwrap())
            .unwrap()
            .resolve();
        assert_eq!(result.shanten, 0);
        assert_eq!(result.family, Family::Standard);
    }

    #[test]
    fn constructors_validate() {
        let err = HandQuery::shanten(&t![1m, 2m, 3m]).unwrap_err();
        assert_eq!(
            err.downcast_ref::<InvalidInput>(),
            Some(&InvalidInput::HandSize { expected: 13, actual: 3 }),
        );
        HandQuery::complete_from_counts(hand("123m 123p 123s 555m 9p").unwrap()).unwrap_err();
        let err = HandQuery::shanten_from_counts(hand("11111m 23m 456p 789s").unwrap()).unwrap_err();
        assert_eq!(
            err.downcast_ref::<InvalidInput>(),
            Some(&InvalidInput::TooManyCopies { tile: t!(1m), count: 5 }),
        );
    }

    #[test]
    fn waits_of_a_query() {
        let query = HandQuery::shanten_from_counts(hand("2345m 456p 789s 111z").unwrap()).unwrap();
        assert_eq!(query.waits().as_slice(), t![2m, 5m]);
        assert_eq!(query.acceptance(&[]), 6);
        assert_eq!(query.acceptance(&t![5m, 5m]), 4);

        let query = HandQuery::complete_from_counts(hand("123m 456p 789s 111z 22z").unwrap()).unwrap();
        assert!(query.waits().is_empty());
        assert_eq!(query.acceptance(&[]), 0);
    }

    #[test]
    fn serializes_family_in_snake_case() {
        let json = serde_json::to_value(resolve("1133m 5577p 99s 11z 2z")).unwrap();
        assert_eq!(json["family"], "seven_pairs");
        assert_eq!(json["shanten"], 0);
    }
}
