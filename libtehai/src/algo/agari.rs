//! Completion checks for 14-tile hands.
use super::mentsu::{self, MAX_MELDS};
use crate::hand::ensure_hand;
use crate::query::Family;
use crate::tile::{TILE_KINDS, YAOKYUU};

use anyhow::Result;

/// Four melds and a pair.
pub fn is_agari(tehai: &[u8; TILE_KINDS]) -> Result<bool> {
    ensure_hand(tehai, 14)?;
    Ok(is_standard_agari(tehai))
}

/// Which winning shape a 14-tile hand completes, if any. The standard shape
/// is checked first, so a hand like 22334455m 667788p reports `Standard` even
/// though it is also seven pairs.
pub fn agari_family(tehai: &[u8; TILE_KINDS]) -> Result<Option<Family>> {
    ensure_hand(tehai, 14)?;
    let family = if is_standard_agari(tehai) {
        Some(Family::Standard)
    } else if is_chitoi_agari(tehai) {
        Some(Family::SevenPairs)
    } else if is_kokushi_agari(tehai) {
        Some(Family::ThirteenOrphans)
    } else {
        None
    };
    Ok(family)
}

/// Every kind with at least two copies is tried as the pair; the first one
/// whose remainder splits into four melds wins.
pub(crate) fn is_standard_agari(tehai: &[u8; TILE_KINDS]) -> bool {
    (0..TILE_KINDS).filter(|&id| tehai[id] >= 2).any(|pair| {
        let mut rest = *tehai;
        mentsu::take(&mut rest, pair, 2);
        mentsu::decompose(rest, MAX_MELDS)
    })
}

/// Seven distinct pairs; four of a kind is not two pairs.
pub(crate) fn is_chitoi_agari(tehai: &[u8; TILE_KINDS]) -> bool {
    tehai.iter().filter(|&&c| c == 2).count() == 7
}

pub(crate) fn is_kokushi_agari(tehai: &[u8; TILE_KINDS]) -> bool {
    YAOKYUU.iter().all(|&id| tehai[id as usize] > 0)
        && YAOKYUU.iter().any(|&id| tehai[id as usize] == 2)
        && YAOKYUU.iter().map(|&id| tehai[id as usize] as u32).sum::<u32>() == 14
}
