//! Meld decomposition: can a count table be split entirely into runs and
//! triplets?
use crate::error::InvalidInput;
use crate::hand::total;
use crate::tile::{TILE_KINDS, Tile};

use anyhow::{Result, bail, ensure};

/// At most four melds fit in a hand.
pub const MAX_MELDS: u8 = 4;

/// Checks whether `tehai`, which must hold exactly `meld_count * 3` tiles,
/// partitions into `meld_count` melds.
pub fn can_form_melds(tehai: &[u8; TILE_KINDS], meld_count: u8) -> Result<bool> {
    ensure!(meld_count <= MAX_MELDS, InvalidInput::MeldCount(meld_count));
    let actual = total(tehai);
    let expected = meld_count as u32 * 3;
    ensure!(actual == expected, InvalidInput::HandSize { expected, actual });
    if let Some((id, &count)) = tehai.iter().enumerate().find(|&(_, &c)| c > 4) {
        bail!(InvalidInput::TooManyCopies {
            tile: Tile::ALL[id],
            count,
        });
    }
    Ok(decompose(*tehai, meld_count))
}

/// The search itself. `tehai` is taken by value, so every branch owns its own
/// copy of the table and sibling branches never see each other's removals.
///
/// The smallest remaining tile is always consumed right away, either by a
/// triplet or by a run starting at it. Any valid partition has to account for
/// it in one of those two ways, so there is nothing to defer.
pub(crate) fn decompose(tehai: [u8; TILE_KINDS], meld_count: u8) -> bool {
    if meld_count == 0 {
        return tehai.iter().all(|&c| c == 0);
    }
    let Some(first) = tehai.iter().position(|&c| c > 0) else {
        return false;
    };

    if tehai[first] >= 3 {
        let mut kotsu = tehai;
        take(&mut kotsu, first, 3);
        if decompose(kotsu, meld_count - 1) {
            return true;
        }
    }

    if first < 27 && first % 9 <= 6 && tehai[first + 1] > 0 && tehai[first + 2] > 0 {
        let mut shuntsu = tehai;
        take(&mut shuntsu, first, 1);
        take(&mut shuntsu, first + 1, 1);
        take(&mut shuntsu, first + 2, 1);
        if decompose(shuntsu, meld_count - 1) {
            return true;
        }
    }

    false
}

#[inline]
pub(crate) fn take(tehai: &mut [u8; TILE_KINDS], id: usize, n: u8) {
    assert!(
        tehai[id] >= n,
        "count of {} would go negative ({} - {n})",
        Tile::ALL[id],
        tehai[id],
    );
    tehai[id] -= n;
}
