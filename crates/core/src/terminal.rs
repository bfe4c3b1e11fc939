//! Terminal-state evaluation (win / no moves left).
//!
//! Both signals are advisory: they never block further moves.

use crate::grid::Grid;
use crate::types::{MAX_TILE, WIN_TILE};

/// Result of a terminal-state check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TerminalState {
    /// Some cell holds the win tile
    pub won: bool,
    /// No empty cell and no equal neighbours anywhere
    pub lost: bool,
}

impl TerminalState {
    pub fn is_terminal(&self) -> bool {
        self.won || self.lost
    }
}

impl Grid {
    /// True if any two horizontally or vertically adjacent cells can merge.
    ///
    /// Scans every row and every column.
    pub fn has_adjacent_pair(&self) -> bool {
        let n = self.size() as usize;
        let cells = self.cells();
        for row in 0..n {
            for col in 0..n {
                let v = cells[row * n + col];
                if v == 0 || v >= MAX_TILE {
                    continue;
                }
                if col + 1 < n && cells[row * n + col + 1] == v {
                    return true;
                }
                if row + 1 < n && cells[(row + 1) * n + col] == v {
                    return true;
                }
            }
        }
        false
    }

    /// True while at least one direction can change the grid.
    pub fn moves_available(&self) -> bool {
        !self.is_full() || self.has_adjacent_pair()
    }

    /// Evaluate win/loss for the current grid. Pure read.
    pub fn terminal_state(&self) -> TerminalState {
        TerminalState {
            won: self.cells().iter().any(|&v| v == WIN_TILE),
            lost: !self.moves_available(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Direction;

    #[test]
    fn test_full_grid_without_pairs_is_lost() {
        let g = Grid::from_rows(&[[2, 4, 2, 4], [4, 2, 4, 2], [2, 4, 2, 4], [4, 2, 4, 2]])
            .unwrap();
        let t = g.terminal_state();
        assert!(t.lost);
        assert!(!t.won);
        for dir in Direction::ALL {
            assert!(!g.can_slide(dir));
        }
    }

    #[test]
    fn test_vertical_pair_in_last_column_keeps_game_alive() {
        let g = Grid::from_rows(&[[2, 4, 2, 8], [4, 2, 4, 8], [2, 4, 2, 4], [4, 2, 4, 2]])
            .unwrap();
        assert!(g.has_adjacent_pair());
        assert!(!g.terminal_state().lost);
    }

    #[test]
    fn test_horizontal_pair_in_last_row_keeps_game_alive() {
        let g = Grid::from_rows(&[[2, 4, 2, 4], [4, 2, 4, 2], [2, 4, 2, 4], [4, 2, 8, 8]])
            .unwrap();
        assert!(!g.terminal_state().lost);
    }

    #[test]
    fn test_max_tile_pair_does_not_keep_game_alive() {
        use crate::types::MAX_TILE;

        let g = Grid::from_rows(&[[MAX_TILE, MAX_TILE], [2, 4]]).unwrap();
        assert!(!g.has_adjacent_pair());
        assert!(g.terminal_state().lost);
    }

    #[test]
    fn test_win_tile_detected() {
        let g = Grid::from_rows(&[[0, 0], [2048, 0]]).unwrap();
        let t = g.terminal_state();
        assert!(t.won);
        assert!(!t.lost);
        assert!(t.is_terminal());
    }

    #[test]
    fn test_terminal_check_is_idempotent() {
        let g = Grid::from_rows(&[[2, 4], [4, 2]]).unwrap();
        let first = g.terminal_state();
        assert_eq!(first, g.terminal_state());
        assert_eq!(first, TerminalState { won: false, lost: true });
    }
}
