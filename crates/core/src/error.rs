//! Error types for board construction and input parsing.

use thiserror::Error;

use crate::types::{MAX_BOARD_SIZE, MIN_BOARD_SIZE};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("board size {size} out of range ({}..={})", MIN_BOARD_SIZE, MAX_BOARD_SIZE)]
    InvalidBoardSize { size: usize },
    #[error("unknown direction: {0:?}")]
    InvalidDirection(String),
    #[error("grid must be {expected}x{expected}, found a row of length {found}")]
    GridShape { expected: usize, found: usize },
    #[error("invalid tile {value} at ({row}, {col}): must be 0 or a power of two >= 2")]
    InvalidTile { row: usize, col: usize, value: u64 },
}

/// Parse a direction token, rejecting anything outside the four directions.
pub fn parse_direction(s: &str) -> Result<crate::types::Direction, GameError> {
    crate::types::Direction::from_str(s).ok_or_else(|| GameError::InvalidDirection(s.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Direction;

    #[test]
    fn parse_direction_fails_fast_on_unknown_token() {
        assert_eq!(parse_direction("Up"), Ok(Direction::Up));
        assert_eq!(
            parse_direction("north"),
            Err(GameError::InvalidDirection("north".to_string()))
        );
    }

    #[test]
    fn board_size_error_names_the_range() {
        let msg = GameError::InvalidBoardSize { size: 1 }.to_string();
        assert_eq!(msg, "board size 1 out of range (2..=7)");
    }
}
