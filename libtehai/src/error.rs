use crate::tile::Tile;
use std::error::Error;
use std::fmt;

/// The input handed to the engine breaks a precondition. This is never a
/// verdict about the hand itself; callers can `downcast_ref` it out of an
/// `anyhow::Error` to tell the two apart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvalidInput {
    /// The query needs exactly `expected` tiles.
    HandSize { expected: u32, actual: u32 },
    /// More than four physical copies of one kind.
    TooManyCopies { tile: Tile, count: u8 },
    /// A symbol outside of the tile glyph table, `position` counted in chars.
    UnknownSymbol { symbol: char, position: usize },
    /// More melds asked for than fit in a hand.
    MeldCount(u8),
    BadNotation(String),
}

impl fmt::Display for InvalidInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HandSize { expected, actual } => {
                write!(f, "expected a hand of {expected} tiles, got {actual}")
            }
            Self::TooManyCopies { tile, count } => {
                write!(f, "{count} copies of {tile}, only 4 exist")
            }
            Self::UnknownSymbol { symbol, position } => {
                write!(f, "unrecognized tile symbol {symbol:?} (U+{:04X}) at position {position}", *symbol as u32)
            }
            Self::MeldCount(n) => write!(f, "{n} melds do not fit in a hand"),
            Self::BadNotation(msg) => f.write_str(msg),
        }
    }
}

impl Error for InvalidInput {}
