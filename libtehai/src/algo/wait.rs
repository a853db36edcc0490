//! Waits of a tenpai hand and how many copies of them are still out there.
use super::agari::{is_chitoi_agari, is_kokushi_agari, is_standard_agari};
use super::shanten::draws;
use crate::hand::{count, ensure_hand};
use crate::tile::{TILE_KINDS, Tile};

use anyhow::Result;
use tinyvec::ArrayVec;

/// Every tile that completes the 13-tile `tehai` in any winning shape, in
/// canonical order. Empty unless the hand is tenpai.
pub fn waits(tehai: &[u8; TILE_KINDS]) -> Result<ArrayVec<[Tile; TILE_KINDS]>> {
    ensure_hand(tehai, 13)?;
    Ok(waits_of(tehai))
}

/// Unseen copies of the waits (受け入れ枚数), counting the hand itself and
/// `visible` (discards, dora indicators, ...) as seen.
pub fn acceptance(tehai: &[u8; TILE_KINDS], visible: &[Tile]) -> Result<u8> {
    ensure_hand(tehai, 13)?;
    Ok(acceptance_of(tehai, visible))
}

/// [`waits`] on a table already known to hold 13 tiles.
pub(crate) fn waits_of(tehai: &[u8; TILE_KINDS]) -> ArrayVec<[Tile; TILE_KINDS]> {
    draws(tehai)
        .filter(|&draw| {
            let mut tehai14 = *tehai;
            tehai14[draw] += 1;
            is_standard_agari(&tehai14) || is_chitoi_agari(&tehai14) || is_kokushi_agari(&tehai14)
        })
        .map(|id| Tile::ALL[id])
        .collect()
}

pub(crate) fn acceptance_of(tehai: &[u8; TILE_KINDS], visible: &[Tile]) -> u8 {
    let seen = count(visible);
    waits_of(tehai)
        .iter()
        .map(|w| {
            let id = w.as_usize();
            4_u8.saturating_sub(tehai[id]).saturating_sub(seen[id])
        })
        .sum()
}

#[cfg(test)]
pub mod test {
    use super::*;
    use crate::hand::hand;
    use crate::t;

    #[test]
    fn standard_waits() {
        let test_one = |tehai_str: &str, expected: &[Tile]| {
            let tehai = hand(tehai_str).unwrap();
            assert_eq!(waits(&tehai).unwrap().as_slice(), expected, "failed for {tehai_str}");
        };
        test_one("123m 123p 123s 555m 9p", &[t!(9p)]);
        test_one("123m 456p 789s 1122z", &t![E, S]);
        test_one("2345m 456p 789s 111z", &t![2m, 5m]);
        test_one("1112345678999m", &t![1m, 2m, 3m, 4m, 5m, 6m, 7m, 8m, 9m]);
        test_one("123m 456p 78s 11z 35m 9p", &[]);
    }

    #[test]
    fn other_shapes() {
        let tehai = hand("1133m 5577p 99s 11z 2z").unwrap();
        assert_eq!(waits(&tehai).unwrap().as_slice(), [t!(S)]);

        let tehai = hand("19m 19p 19s 1234567z").unwrap();
        let w = waits(&tehai).unwrap();
        assert_eq!(w.len(), 13);
        assert!(w.iter().all(|t| t.is_yaokyuu()));
    }

    #[test]
    fn acceptance_counts() {
        let tehai = hand("2345m 456p 789s 111z").unwrap();
        // 2m and 5m, one of each in hand
        assert_eq!(acceptance(&tehai, &[]).unwrap(), 6);
        assert_eq!(acceptance(&tehai, &t![2m, 2m, 5m]).unwrap(), 3);

        let tehai = hand("1111m 234p 567p 789s").unwrap();
        assert_eq!(acceptance(&tehai, &[]).unwrap(), 0);
    }
}
