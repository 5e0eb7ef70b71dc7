//! Tile catalog - the fixed set of 27 tiles
//!
//! The catalog is built once by the host and handed to whatever needs it.
//! It is never a global.

use crate::types::{Family, Tile, FAMILY_COUNT, MAX_TILE_VALUE, MIN_TILE_VALUE, TILES_PER_FAMILY};

/// Fixed mapping family → tiles 1..=9 in value order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileCatalog {
    suites: [[Tile; TILES_PER_FAMILY]; FAMILY_COUNT],
}

impl TileCatalog {
    /// Build the standard three-family catalog.
    pub fn standard() -> Self {
        Self {
            suites: Family::ALL.map(Tile::suite),
        }
    }

    /// The ordered tiles of one family.
    pub fn suite(&self, family: Family) -> &[Tile; TILES_PER_FAMILY] {
        &self.suites[family.index()]
    }

    /// Look up a tile by identity.
    pub fn tile(&self, family: Family, value: u8) -> Option<Tile> {
        if !(MIN_TILE_VALUE..=MAX_TILE_VALUE).contains(&value) {
            return None;
        }
        self.suite(family).get((value - MIN_TILE_VALUE) as usize).copied()
    }

    /// All tiles, family by family.
    pub fn all(&self) -> impl Iterator<Item = Tile> + '_ {
        self.suites.iter().flat_map(|suite| suite.iter().copied())
    }

    pub fn len(&self) -> usize {
        FAMILY_COUNT * TILES_PER_FAMILY
    }

    pub fn is_empty(&self) -> bool {
        false
    }
}

impl Default for TileCatalog {
    fn default() -> Self {
        Self::standard()
    }
}
