//! Grid module - the N×N tile matrix
//!
//! Cells hold `0` (empty) or a power-of-two tile value >= 2.
//! Storage is a fixed-capacity flat array sized for the largest supported board,
//! so a `Grid` is `Copy` and moves never allocate.
//! Coordinates: (row, col), both zero-based; row-major storage (row * size + col).
//! Cells past `size * size` are never written and stay zero.

use arrayvec::ArrayVec;

use crate::error::GameError;
use crate::types::{MAX_BOARD_SIZE, MAX_CELLS, MAX_TILE, MIN_BOARD_SIZE};

/// Tile value in a cell (0 = empty)
pub type Tile = u64;

/// Square game grid with flat array storage
///
/// Cells are only written by moves and spawns, so every cell stays a valid tile.
/// Arbitrary values cannot be poked in from outside the crate:
///
/// ```compile_fail
/// let mut grid = tui_2048_core::Grid::new(4).unwrap();
/// grid.set(0, 0, 3);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Grid {
    size: u8,
    /// Flat array of cells, row-major order (row * size + col)
    cells: [Tile; MAX_CELLS],
}

impl Grid {
    /// Create a new empty grid.
    ///
    /// Sizes outside `MIN_BOARD_SIZE..=MAX_BOARD_SIZE` are rejected.
    pub fn new(size: u8) -> Result<Self, GameError> {
        if !(MIN_BOARD_SIZE..=MAX_BOARD_SIZE).contains(&size) {
            return Err(GameError::InvalidBoardSize {
                size: size as usize,
            });
        }
        Ok(Self {
            size,
            cells: [0; MAX_CELLS],
        })
    }

    /// Build a grid from row slices.
    ///
    /// The row count sets the board size; every row must have that many cells and every
    /// non-zero value must be a power of two >= 2.
    ///
    /// ```
    /// use tui_2048_core::Grid;
    ///
    /// let grid = Grid::from_rows(&[[2, 0], [0, 4]]).unwrap();
    /// assert_eq!(grid.get(1, 1), Some(4));
    /// assert!(Grid::from_rows(&[[3, 0], [0, 0]]).is_err());
    /// ```
    pub fn from_rows<R: AsRef<[Tile]>>(rows: &[R]) -> Result<Self, GameError> {
        let n = rows.len();
        if n > MAX_BOARD_SIZE as usize {
            return Err(GameError::InvalidBoardSize { size: n });
        }
        let mut grid = Self::new(n as u8)?;
        for (row, values) in rows.iter().enumerate() {
            let values = values.as_ref();
            if values.len() != n {
                return Err(GameError::GridShape {
                    expected: n,
                    found: values.len(),
                });
            }
            for (col, &value) in values.iter().enumerate() {
                if !is_valid_tile(value) {
                    return Err(GameError::InvalidTile { row, col, value });
                }
                grid.cells[row * n + col] = value;
            }
        }
        Ok(grid)
    }

    /// Calculate flat index from (row, col) coordinates
    #[inline(always)]
    fn index(&self, row: usize, col: usize) -> Option<usize> {
        let n = self.size as usize;
        if row >= n || col >= n {
            return None;
        }
        Some(row * n + col)
    }

    /// Side length of the board
    pub fn size(&self) -> u8 {
        self.size
    }

    /// Get cell at (row, col). Returns None if out of bounds.
    pub fn get(&self, row: usize, col: usize) -> Option<Tile> {
        self.index(row, col).map(|idx| self.cells[idx])
    }

    /// Set cell at (row, col). Returns false if out of bounds.
    pub(crate) fn set(&mut self, row: usize, col: usize, value: Tile) -> bool {
        match self.index(row, col) {
            Some(idx) => {
                self.cells[idx] = value;
                true
            }
            None => false,
        }
    }

    /// The live cells, row-major (`size * size` entries).
    pub fn cells(&self) -> &[Tile] {
        let n = self.size as usize;
        &self.cells[..n * n]
    }

    pub(crate) fn cells_mut(&mut self) -> &mut [Tile] {
        let n = self.size as usize;
        &mut self.cells[..n * n]
    }

    /// Iterate rows as slices.
    pub fn rows(&self) -> impl Iterator<Item = &[Tile]> + '_ {
        self.cells().chunks_exact(self.size as usize)
    }

    /// Flat indices of all empty cells, in row-major order.
    ///
    /// Stack-only; does not allocate.
    pub fn empty_cells(&self) -> ArrayVec<usize, MAX_CELLS> {
        self.cells()
            .iter()
            .enumerate()
            .filter(|&(_, &v)| v == 0)
            .map(|(i, _)| i)
            .collect()
    }

    pub fn empty_count(&self) -> usize {
        self.cells().iter().filter(|&&v| v == 0).count()
    }

    /// True when no cell is empty
    pub fn is_full(&self) -> bool {
        self.cells().iter().all(|&v| v != 0)
    }

    /// Largest tile on the board (0 for an empty board)
    pub fn max_tile(&self) -> Tile {
        self.cells().iter().copied().max().unwrap_or(0)
    }

    /// Clear every cell
    pub fn clear(&mut self) {
        self.cells.fill(0);
    }

    /// Convert to nested rows (for display and protocol output)
    pub fn to_rows(&self) -> Vec<Vec<Tile>> {
        self.rows().map(|row| row.to_vec()).collect()
    }
}

/// A cell value is valid when empty or a power of two in `2..=MAX_TILE`.
pub fn is_valid_tile(value: Tile) -> bool {
    value == 0 || (value >= 2 && value <= MAX_TILE && value.is_power_of_two())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_index_calculation() {
        let grid = Grid::new(4).unwrap();
        assert_eq!(grid.index(0, 0), Some(0));
        assert_eq!(grid.index(0, 3), Some(3));
        assert_eq!(grid.index(1, 0), Some(4));
        assert_eq!(grid.index(3, 3), Some(15));
        assert_eq!(grid.index(4, 0), None);
        assert_eq!(grid.index(0, 4), None);
    }

    #[test]
    fn test_grid_size_bounds() {
        assert_eq!(
            Grid::new(1),
            Err(GameError::InvalidBoardSize { size: 1 })
        );
        assert_eq!(
            Grid::new(8),
            Err(GameError::InvalidBoardSize { size: 8 })
        );
        assert_eq!(Grid::new(2).unwrap().cells().len(), 4);
        assert_eq!(Grid::new(7).unwrap().cells().len(), 49);
    }

    #[test]
    fn test_from_rows_validates_shape_and_tiles() {
        assert_eq!(
            Grid::from_rows(&[vec![2, 0], vec![0]]),
            Err(GameError::GridShape {
                expected: 2,
                found: 1
            })
        );
        assert_eq!(
            Grid::from_rows(&[[0, 0], [6, 0]]),
            Err(GameError::InvalidTile {
                row: 1,
                col: 0,
                value: 6
            })
        );
        assert_eq!(
            Grid::from_rows(&[[1, 0], [0, 0]]),
            Err(GameError::InvalidTile {
                row: 0,
                col: 0,
                value: 1
            })
        );
    }

    #[test]
    fn test_tiles_above_the_cap_are_rejected() {
        assert!(is_valid_tile(MAX_TILE));
        assert!(!is_valid_tile(MAX_TILE * 2));
        assert!(!is_valid_tile(1 << 63));
        assert_eq!(
            Grid::from_rows(&[[0, 1 << 63], [0, 0]]),
            Err(GameError::InvalidTile {
                row: 0,
                col: 1,
                value: 1 << 63
            })
        );
    }

    #[test]
    fn test_rows_roundtrip() {
        let rows = vec![vec![2, 4, 0], vec![0, 0, 8], vec![16, 0, 2]];
        let grid = Grid::from_rows(&rows).unwrap();
        assert_eq!(grid.to_rows(), rows);
        assert_eq!(grid.max_tile(), 16);
        assert_eq!(grid.empty_count(), 4);
        assert_eq!(grid.empty_cells().as_slice(), &[2, 3, 4, 7]);
    }

    #[test]
    fn test_unused_storage_stays_zero() {
        let mut grid = Grid::new(2).unwrap();
        assert!(!grid.set(2, 0, 2));
        assert!(grid.set(1, 1, 2));
        assert!(grid.cells[4..].iter().all(|&v| v == 0));
    }
}
