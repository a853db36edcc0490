//! Shanten and completion checks for riichi mahjong hands.
//!
//! Hands come in as [`Tile`]s (usually from [`decode`]) and are reduced to a
//! `[u8; 34]` count table, called *tehai* throughout, before any analysis.
//!
//! ```
//! let tiles = tehai::decode("🀇🀈🀉🀙🀚🀛🀐🀑🀒🀋🀋🀋🀡").unwrap();
//! let result = tehai::shanten(&tiles).unwrap();
//! assert_eq!(result.shanten, 0);
//! ```

pub mod algo;
pub mod codec;
pub mod error;
pub mod hand;
pub mod query;
pub mod tile;

pub use codec::{decode, decode_lossy};
pub use error::InvalidInput;
pub use query::{Family, HandQuery, ShantenResult};
pub use tile::Tile;

use anyhow::Result;

/// Minimum shanten over all families of a 13-tile hand.
pub fn shanten(tiles: &[Tile]) -> Result<ShantenResult> {
    HandQuery::shanten(tiles).map(|q| q.resolve())
}

/// Whether 14 tiles form four melds and a pair.
pub fn is_complete(tiles: &[Tile]) -> Result<bool> {
    HandQuery::complete(tiles).map(|q| q.resolve().shanten == -1)
}
