//! Selection pool - the grid of tappable tiles for one round
//!
//! The pool is laid out row-major in a fixed grid. Taking a tile empties its
//! cell rather than shifting the others, so grid coordinates stay stable for
//! the whole round.

use arrayvec::ArrayVec;

use crate::catalog::TileCatalog;
use crate::rng::{shuffle, RandomSource};
use crate::types::{Family, Mode, Tile, POOL_CAPACITY};

/// Tappable tiles laid out in a `rows × cols` grid
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionPool {
    rows: usize,
    cols: usize,
    cells: ArrayVec<Option<Tile>, POOL_CAPACITY>,
}

impl SelectionPool {
    /// Lay tiles out row-major. Duplicates and tiles past the grid size are dropped.
    pub fn from_tiles(rows: usize, cols: usize, tiles: impl IntoIterator<Item = Tile>) -> Self {
        let capacity = (rows * cols).min(POOL_CAPACITY);
        let mut cells: ArrayVec<Option<Tile>, POOL_CAPACITY> = ArrayVec::new();
        for tile in tiles {
            if cells.len() == capacity {
                break;
            }
            if cells.contains(&Some(tile)) {
                continue;
            }
            cells.push(Some(tile));
        }
        while cells.len() < capacity {
            cells.push(None);
        }
        Self { rows, cols, cells }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Grid cells, row-major. `None` is an empty or consumed cell.
    pub fn cells(&self) -> &[Option<Tile>] {
        &self.cells
    }

    pub fn tile_at(&self, index: usize) -> Option<Tile> {
        self.cells.get(index).copied().flatten()
    }

    pub fn index_of(&self, tile: Tile) -> Option<usize> {
        self.cells.iter().position(|c| *c == Some(tile))
    }

    pub fn contains(&self, tile: Tile) -> bool {
        self.index_of(tile).is_some()
    }

    /// Remove a tile for the rest of the round. Returns false if it was not offered.
    pub fn take(&mut self, tile: Tile) -> bool {
        match self.index_of(tile) {
            Some(i) => {
                self.cells[i] = None;
                true
            }
            None => false,
        }
    }

    /// Tiles still on offer, row-major.
    pub fn tiles(&self) -> impl Iterator<Item = Tile> + '_ {
        self.cells.iter().filter_map(|c| *c)
    }

    pub fn remaining(&self) -> usize {
        self.tiles().count()
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }
}

/// Builds the pool for a round
#[derive(Debug, Clone, Copy)]
pub struct SelectionPoolGenerator<'a> {
    catalog: &'a TileCatalog,
}

impl<'a> SelectionPoolGenerator<'a> {
    pub fn new(catalog: &'a TileCatalog) -> Self {
        Self { catalog }
    }

    /// Uniform: the nine tiles of `family` in value order (a random family
    /// when none is given). Diverse: every catalog tile, shuffled.
    pub fn generate<R: RandomSource + ?Sized>(
        &self,
        mode: Mode,
        family: Option<Family>,
        rng: &mut R,
    ) -> SelectionPool {
        let (rows, cols) = mode.grid();
        match mode {
            Mode::Uniform => {
                let family = family.unwrap_or_else(|| Family::ALL[rng.index(Family::ALL.len())]);
                SelectionPool::from_tiles(rows, cols, self.catalog.suite(family).iter().copied())
            }
            Mode::Diverse => {
                let mut tiles: ArrayVec<Tile, POOL_CAPACITY> = self.catalog.all().collect();
                shuffle(rng, &mut tiles);
                SelectionPool::from_tiles(rows, cols, tiles)
            }
        }
    }
}
