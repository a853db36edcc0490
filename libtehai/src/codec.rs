//! Unicode mahjong glyphs, the notation problem documents are written in.
use crate::error::InvalidInput;
use crate::tile::{TILE_KINDS, Tile};

use anyhow::{Result, bail};

const VARIATION_SELECTOR_16: char = '\u{FE0F}';

/// Glyph of every tile kind, indexed by ordinal.
///
/// Note that the Unicode block orders bamboo before dots and puts the red
/// dragon first, so this is not a contiguous range.
pub const GLYPHS: [char; TILE_KINDS] = [
    // 🀇-🀏
    '\u{1F007}', '\u{1F008}', '\u{1F009}', '\u{1F00A}', '\u{1F00B}', '\u{1F00C}', '\u{1F00D}', '\u{1F00E}', '\u{1F00F}',
    // 🀙-🀡
    '\u{1F019}', '\u{1F01A}', '\u{1F01B}', '\u{1F01C}', '\u{1F01D}', '\u{1F01E}', '\u{1F01F}', '\u{1F020}', '\u{1F021}',
    // 🀐-🀘
    '\u{1F010}', '\u{1F011}', '\u{1F012}', '\u{1F013}', '\u{1F014}', '\u{1F015}', '\u{1F016}', '\u{1F017}', '\u{1F018}',
    // 🀀🀁🀂🀃 winds, 🀆 white, 🀅 green, 🀄 red
    '\u{1F000}', '\u{1F001}', '\u{1F002}', '\u{1F003}', '\u{1F006}', '\u{1F005}', '\u{1F004}',
];

#[inline]
#[must_use]
pub fn encode(tile: Tile) -> char {
    GLYPHS[tile.as_usize()]
}

#[must_use]
pub fn encode_all(tiles: &[Tile]) -> String {
    tiles.iter().copied().map(encode).collect()
}

#[must_use]
pub fn glyph_to_tile(c: char) -> Option<Tile> {
    GLYPHS.iter().position(|&g| g == c).map(|id| Tile::ALL[id])
}

fn is_separator(c: char) -> bool {
    c.is_whitespace() || c == VARIATION_SELECTOR_16
}

/// Decodes a glyph string, failing on the first symbol that is not a tile.
/// Whitespace and U+FE0F (🀄️ is often written with it) are skipped.
pub fn decode(s: &str) -> Result<Vec<Tile>> {
    let mut tiles = Vec::with_capacity(14);
    for (position, symbol) in s.chars().enumerate() {
        if is_separator(symbol) {
            continue;
        }
        let Some(tile) = glyph_to_tile(symbol) else {
            bail!(InvalidInput::UnknownSymbol { symbol, position });
        };
        tiles.push(tile);
    }
    Ok(tiles)
}

/// Like [`decode`], but unknown symbols are dropped instead of rejected.
///
/// A truncated or garbled hand then reaches the size checks downstream with
/// fewer tiles than it was written with, so every drop is logged.
#[must_use]
pub fn decode_lossy(s: &str) -> Vec<Tile> {
    s.chars()
        .enumerate()
        .filter(|&(_, c)| !is_separator(c))
        .filter_map(|(position, symbol)| {
            let tile = glyph_to_tile(symbol);
            if tile.is_none() {
                log::warn!("dropping unrecognized tile symbol {symbol:?} at position {position}");
            }
            tile
        })
        .collect()
}
