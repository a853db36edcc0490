//! Count tables and the compact ASCII hand notation (`"123m 456p 11z"`).
use crate::error::InvalidInput;
use crate::tile::{Suit, TILE_KINDS, Tile};

use anyhow::{Result, bail, ensure};

/// Builds the count table of `tiles`. No validation happens here; counts
/// saturate instead of wrapping if the input is absurd.
#[must_use]
pub fn count(tiles: &[Tile]) -> [u8; TILE_KINDS] {
    let mut tehai = [0_u8; TILE_KINDS];
    for tile in tiles {
        let c = &mut tehai[tile.as_usize()];
        *c = c.saturating_add(1);
    }
    tehai
}

#[inline]
#[must_use]
pub fn total(tehai: &[u8; TILE_KINDS]) -> u32 {
    tehai.iter().map(|&c| c as u32).sum()
}

/// Rejects a count table that does not hold exactly `len` tiles or that holds
/// a fifth copy of anything.
pub fn ensure_hand(tehai: &[u8; TILE_KINDS], len: u32) -> Result<()> {
    let actual = total(tehai);
    ensure!(actual == len, InvalidInput::HandSize { expected: len, actual });
    if let Some((id, &count)) = tehai.iter().enumerate().find(|&(_, &c)| c > 4) {
        bail!(InvalidInput::TooManyCopies {
            tile: Tile::ALL[id],
            count,
        });
    }
    Ok(())
}

/// Reads compact notation, digits followed by their suit letter. Honors are
/// `1z`-`7z` in E S W N P F C order.
pub fn parse_tiles(s: &str) -> Result<Vec<Tile>> {
    ensure!(
        s.is_ascii(),
        InvalidInput::BadNotation(format!("hand {s:?} contains non-ascii content"))
    );

    let mut tiles = vec![];
    let mut stack = vec![];

    for &b in s.as_bytes() {
        match b {
            b'1'..=b'9' => stack.push(b - b'0'),
            _ if b.is_ascii_whitespace() => (),
            _ => {
                let Some(suit) = Suit::from_notation(b) else {
                    bail!(InvalidInput::BadNotation(format!("unexpected byte {:?} in {s:?}", b as char)));
                };
                for rank in stack.drain(..) {
                    tiles.push(Tile::new(suit, rank)?);
                }
            }
        };
    }
    ensure!(
        stack.is_empty(),
        InvalidInput::BadNotation(format!("{s:?} ends with digits that have no suit"))
    );

    Ok(tiles)
}

/// Parses compact notation straight into a count table.
pub fn hand(s: &str) -> Result<[u8; TILE_KINDS]> {
    parse_tiles(s).map(|tiles| count(&tiles))
}

/// Inverse of [`hand`], suits separated by a space.
#[must_use]
pub fn tiles_to_string(tehai: &[u8; TILE_KINDS]) -> String {
    let mut ret = String::new();
    for (suit_idx, suit) in ['m', 'p', 's', 'z'].into_iter().enumerate() {
        let range = suit_idx * 9..(suit_idx * 9 + 9).min(TILE_KINDS);
        let mut wrote_any = false;
        for id in range {
            for _ in 0..tehai[id] {
                if !wrote_any && !ret.is_empty() {
                    ret.push(' ');
                }
                wrote_any = true;
                ret.push(char::from(b'1' + (id % 9) as u8));
            }
        }
        if wrote_any {
            ret.push(suit);
        }
    }
    ret
}
