//! Shanten of 13-tile hands, one calculator per winning shape.
//!
//! The standard shape is answered by brute force for the two values that
//! matter most to a nanikiru problem (tenpai and 1-shanten): the hand is
//! literally extended by every possible draw and checked for completion.
//! Anything further away falls back to a block decomposition search.
use super::agari::is_standard_agari;
use super::mentsu::take;
use crate::hand::ensure_hand;
use crate::tile::{TILE_KINDS, YAOKYUU};

use anyhow::Result;

pub fn calc_normal(tehai: &[u8; TILE_KINDS]) -> Result<i8> {
    ensure_hand(tehai, 13)?;
    Ok(normal(tehai))
}

pub fn calc_chitoi(tehai: &[u8; TILE_KINDS]) -> Result<i8> {
    ensure_hand(tehai, 13)?;
    Ok(chitoi(tehai))
}

pub fn calc_kokushi(tehai: &[u8; TILE_KINDS]) -> Result<i8> {
    ensure_hand(tehai, 13)?;
    Ok(kokushi(tehai))
}

/// Whether some draw completes four melds and a pair.
pub fn is_tenpai(tehai: &[u8; TILE_KINDS]) -> Result<bool> {
    ensure_hand(tehai, 13)?;
    Ok(standard_tenpai(tehai))
}

pub(crate) fn normal(tehai: &[u8; TILE_KINDS]) -> i8 {
    if standard_tenpai(tehai) {
        0
    } else if one_draw_from_tenpai(tehai) {
        1
    } else {
        // the brute force above already ruled out 0 and 1
        block_shanten(tehai).max(2)
    }
}

/// `6 - pairs`, plus one for every kind missing to reach seven distinct
/// kinds, since a triplet or quad only ever contributes a single pair.
pub(crate) fn chitoi(tehai: &[u8; TILE_KINDS]) -> i8 {
    let mut pairs = 0_i8;
    let mut kinds = 0_i8;
    for &c in tehai {
        if c > 0 {
            kinds += 1;
            if c >= 2 {
                pairs += 1;
            }
        }
    }
    6 - pairs + (7 - kinds).max(0)
}

pub(crate) fn kokushi(tehai: &[u8; TILE_KINDS]) -> i8 {
    let mut present = 0_i8;
    let mut has_pair = false;
    for &id in &YAOKYUU {
        let c = tehai[id as usize];
        if c > 0 {
            present += 1;
            has_pair |= c >= 2;
        }
    }
    13 - present - has_pair as i8
}

/// Draws that do not need a fifth copy of a kind.
#[inline]
pub(crate) fn draws(tehai: &[u8; TILE_KINDS]) -> impl Iterator<Item = usize> + '_ {
    (0..TILE_KINDS).filter(|&id| tehai[id] < 4)
}

pub(crate) fn standard_tenpai(tehai: &[u8; TILE_KINDS]) -> bool {
    draws(tehai).any(|draw| {
        let mut tehai14 = *tehai;
        tehai14[draw] += 1;
        is_standard_agari(&tehai14)
    })
}

/// Some draw followed by some discard reaches tenpai.
fn one_draw_from_tenpai(tehai: &[u8; TILE_KINDS]) -> bool {
    draws(tehai).any(|draw| {
        let mut tehai14 = *tehai;
        tehai14[draw] += 1;
        (0..TILE_KINDS).filter(|&id| tehai14[id] > 0).any(|discard| {
            let mut tehai13 = tehai14;
            take(&mut tehai13, discard, 1);
            standard_tenpai(&tehai13)
        })
    })
}

/// `8 - 2 * melds - partials - pair` minimised over all decompositions, with
/// at most four melds and partials counted.
fn block_shanten(tehai: &[u8; TILE_KINDS]) -> i8 {
    let headless = search_blocks(*tehai, 0, 0, 0);
    (0..TILE_KINDS)
        .filter(|&id| tehai[id] >= 2)
        .map(|pair| {
            let mut rest = *tehai;
            take(&mut rest, pair, 2);
            search_blocks(rest, 0, 0, 0) - 1
        })
        .fold(headless, i8::min)
}

fn search_blocks(tehai: [u8; TILE_KINDS], from: usize, melds: i8, partials: i8) -> i8 {
    let Some(id) = (from..TILE_KINDS).find(|&id| tehai[id] > 0) else {
        return 8 - 2 * melds - partials.min(4 - melds);
    };
    let suited = id < 27;
    let num = id % 9;
    let mut best = i8::MAX;

    if tehai[id] >= 3 {
        let mut rest = tehai;
        take(&mut rest, id, 3);
        best = best.min(search_blocks(rest, id, melds + 1, partials));
    }
    if suited && num <= 6 && tehai[id + 1] > 0 && tehai[id + 2] > 0 {
        let mut rest = tehai;
        take(&mut rest, id, 1);
        take(&mut rest, id + 1, 1);
        take(&mut rest, id + 2, 1);
        best = best.min(search_blocks(rest, id, melds + 1, partials));
    }

    if melds + partials < 4 {
        if tehai[id] >= 2 {
            let mut rest = tehai;
            take(&mut rest, id, 2);
            best = best.min(search_blocks(rest, id, melds, partials + 1));
        }
        if suited && num <= 7 && tehai[id + 1] > 0 {
            let mut rest = tehai;
            take(&mut rest, id, 1);
            take(&mut rest, id + 1, 1);
            best = best.min(search_blocks(rest, id, melds, partials + 1));
        }
        if suited && num <= 6 && tehai[id + 2] > 0 {
            let mut rest = tehai;
            take(&mut rest, id, 1);
            take(&mut rest, id + 2, 1);
            best = best.min(search_blocks(rest, id, melds, partials + 1));
        }
    }

    // whatever is left of this kind stays isolated
    let mut rest = tehai;
    rest[id] = 0;
    best.min(search_blocks(rest, id + 1, melds, partials))
}
