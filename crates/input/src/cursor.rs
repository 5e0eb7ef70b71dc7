//! Selection-grid cursor with wrap-around.

use crate::types::Direction;

/// Cursor over a `rows × cols` grid, row-major.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridCursor {
    rows: usize,
    cols: usize,
    row: usize,
    col: usize,
}

impl GridCursor {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows: rows.max(1),
            cols: cols.max(1),
            row: 0,
            col: 0,
        }
    }

    /// Adopt a new grid size, keeping the position where it still fits.
    pub fn resize(&mut self, rows: usize, cols: usize) {
        self.rows = rows.max(1);
        self.cols = cols.max(1);
        self.row = self.row.min(self.rows - 1);
        self.col = self.col.min(self.cols - 1);
    }

    pub fn reset(&mut self) {
        self.row = 0;
        self.col = 0;
    }

    pub fn move_by(&mut self, direction: Direction) {
        match direction {
            Direction::Left => self.col = (self.col + self.cols - 1) % self.cols,
            Direction::Right => self.col = (self.col + 1) % self.cols,
            Direction::Up => self.row = (self.row + self.rows - 1) % self.rows,
            Direction::Down => self.row = (self.row + 1) % self.rows,
        }
    }

    pub fn row(&self) -> usize {
        self.row
    }

    pub fn col(&self) -> usize {
        self.col
    }

    /// Row-major cell index.
    pub fn index(&self) -> usize {
        self.row * self.cols + self.col
    }

    pub fn dims(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }
}

impl Default for GridCursor {
    fn default() -> Self {
        Self::new(1, 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wraps_horizontally_and_vertically() {
        let mut c = GridCursor::new(3, 3);
        c.move_by(Direction::Left);
        assert_eq!((c.row(), c.col()), (0, 2));
        c.move_by(Direction::Right);
        assert_eq!((c.row(), c.col()), (0, 0));
        c.move_by(Direction::Up);
        assert_eq!((c.row(), c.col()), (2, 0));
        c.move_by(Direction::Down);
        assert_eq!((c.row(), c.col()), (0, 0));
    }

    #[test]
    fn test_index_is_row_major() {
        let mut c = GridCursor::new(5, 6);
        c.move_by(Direction::Down);
        c.move_by(Direction::Right);
        c.move_by(Direction::Right);
        assert_eq!(c.index(), 8);
    }

    #[test]
    fn test_resize_clamps_position() {
        let mut c = GridCursor::new(5, 6);
        for _ in 0..4 {
            c.move_by(Direction::Up);
        }
        c.move_by(Direction::Left);
        assert_eq!((c.row(), c.col()), (1, 5));
        c.resize(3, 3);
        assert_eq!((c.row(), c.col()), (1, 2));
        assert_eq!(c.dims(), (3, 3));
    }

    #[test]
    fn test_degenerate_grid() {
        let mut c = GridCursor::new(0, 0);
        c.move_by(Direction::Right);
        assert_eq!(c.index(), 0);
    }
}
