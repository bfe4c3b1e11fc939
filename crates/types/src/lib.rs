//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the application.
//! All types are pure data structures with no external dependencies, making them
//! usable in any context (core logic, terminal rendering, AI protocol).
//!
//! # Board Dimensions
//!
//! The board is an N×N square grid addressed by `(row, col)`, both zero-based.
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `DEFAULT_BOARD_SIZE` | 4 | Classic 4x4 board |
//! | `MIN_BOARD_SIZE` | 2 | Smallest playable board |
//! | `MAX_BOARD_SIZE` | 7 | Largest board whose best possible tile still fits in `u64` |
//! | `MAX_CELLS` | 49 | Storage capacity of a grid (`MAX_BOARD_SIZE²`) |
//!
//! # Tile Spawning
//!
//! After a move a new tile is spawned into a random empty cell:
//!
//! - value `2` with probability 9/10
//! - value `4` with probability 1/10
//!
//! Reaching [`WIN_TILE`] (2048) signals a win; play continues afterwards.
//!
//! # Examples
//!
//! ```
//! use tui_2048_types::{Direction, GameAction, DEFAULT_BOARD_SIZE, WIN_TILE};
//!
//! // Parse a direction (case-insensitive)
//! assert_eq!(Direction::from_str("left"), Some(Direction::Left));
//! assert_eq!(Direction::from_str("diagonal"), None);
//!
//! // Game actions carry a direction when they are moves
//! let action = GameAction::from_str("moveUp").unwrap();
//! assert_eq!(action.direction(), Some(Direction::Up));
//! assert_eq!(GameAction::Restart.direction(), None);
//!
//! assert_eq!(DEFAULT_BOARD_SIZE, 4);
//! assert_eq!(WIN_TILE, 2048);
//! ```

/// Default board size (4x4)
pub const DEFAULT_BOARD_SIZE: u8 = 4;

/// Smallest accepted board size
pub const MIN_BOARD_SIZE: u8 = 2;

/// Largest accepted board size.
///
/// The largest tile reachable on an N×N board is 2^(N²+1); 7 is the largest N
/// for which that value (and the score that produced it) fits in `u64`.
pub const MAX_BOARD_SIZE: u8 = 7;

/// Cell capacity of a grid
pub const MAX_CELLS: usize = (MAX_BOARD_SIZE as usize) * (MAX_BOARD_SIZE as usize);

/// Largest tile value a grid accepts: 2^(MAX_CELLS + 1).
///
/// Two tiles of this value do not merge, so merging can never overflow `u64`.
pub const MAX_TILE: u64 = 1 << (MAX_CELLS + 1);

/// Tile value that signals a win
pub const WIN_TILE: u64 = 2048;

/// Number of initial tiles placed on a fresh board
pub const INITIAL_TILES: usize = 2;

/// Value of a regular spawned tile
pub const SPAWN_LOW: u64 = 2;

/// Value of a rare spawned tile
pub const SPAWN_HIGH: u64 = 4;

/// Odds of spawning [`SPAWN_HIGH`] are `SPAWN_HIGH_NUMERATOR / SPAWN_ODDS_DENOMINATOR`
pub const SPAWN_HIGH_NUMERATOR: u32 = 1;

/// Denominator for spawn odds
pub const SPAWN_ODDS_DENOMINATOR: u32 = 10;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classic_rules_defaults() {
        assert_eq!(DEFAULT_BOARD_SIZE, 4);
        assert_eq!(WIN_TILE, 2048);
        assert_eq!(INITIAL_TILES, 2);
        assert_eq!((SPAWN_LOW, SPAWN_HIGH), (2, 4));
        assert_eq!(SPAWN_HIGH_NUMERATOR, 1);
        assert_eq!(SPAWN_ODDS_DENOMINATOR, 10);
        assert_eq!(MAX_CELLS, 49);
        assert_eq!(MAX_TILE, 1 << 50);
    }

    #[test]
    fn direction_roundtrips_through_str() {
        for dir in Direction::ALL {
            assert_eq!(Direction::from_str(dir.as_str()), Some(dir));
        }
        assert_eq!(Direction::from_str("UP"), Some(Direction::Up));
        assert_eq!(Direction::from_str(""), None);
    }

    #[test]
    fn action_names_roundtrip() {
        for action in [
            GameAction::MoveLeft,
            GameAction::MoveRight,
            GameAction::MoveUp,
            GameAction::MoveDown,
            GameAction::Restart,
        ] {
            assert_eq!(GameAction::from_str(action.as_str()), Some(action));
        }
    }
}

/// Slide direction for a move
///
/// Tiles travel toward the edge named by the direction (the "target edge").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    /// All four directions, in a stable order.
    pub const ALL: [Direction; 4] = [
        Direction::Left,
        Direction::Right,
        Direction::Up,
        Direction::Down,
    ];

    /// Parse direction from string (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use tui_2048_types::Direction;
    ///
    /// assert_eq!(Direction::from_str("Right"), Some(Direction::Right));
    /// assert_eq!(Direction::from_str("down"), Some(Direction::Down));
    /// assert_eq!(Direction::from_str("sideways"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "left" => Some(Direction::Left),
            "right" => Some(Direction::Right),
            "up" => Some(Direction::Up),
            "down" => Some(Direction::Down),
            _ => None,
        }
    }

    /// Convert to lowercase string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Left => "left",
            Direction::Right => "right",
            Direction::Up => "up",
            Direction::Down => "down",
        }
    }
}

/// Game actions that can be applied to modify game state
///
/// These actions are used by both human input and AI control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameAction {
    /// Slide all tiles toward the left edge
    MoveLeft,
    /// Slide all tiles toward the right edge
    MoveRight,
    /// Slide all tiles toward the top edge
    MoveUp,
    /// Slide all tiles toward the bottom edge
    MoveDown,
    /// Start a new game (score cleared, fresh board)
    Restart,
}

impl GameAction {
    /// All actions, in protocol order.
    pub const ALL: [GameAction; 5] = [
        GameAction::MoveLeft,
        GameAction::MoveRight,
        GameAction::MoveUp,
        GameAction::MoveDown,
        GameAction::Restart,
    ];

    /// Parse action from string (for AI protocol)
    ///
    /// # Examples
    ///
    /// ```
    /// use tui_2048_types::GameAction;
    ///
    /// assert_eq!(GameAction::from_str("moveLeft"), Some(GameAction::MoveLeft));
    /// assert_eq!(GameAction::from_str("MOVEDOWN"), Some(GameAction::MoveDown));
    /// assert_eq!(GameAction::from_str("restart"), Some(GameAction::Restart));
    /// assert_eq!(GameAction::from_str("hardDrop"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "moveleft" => Some(GameAction::MoveLeft),
            "moveright" => Some(GameAction::MoveRight),
            "moveup" => Some(GameAction::MoveUp),
            "movedown" => Some(GameAction::MoveDown),
            "restart" => Some(GameAction::Restart),
            _ => None,
        }
    }

    /// Convert to camelCase string for AI protocol
    pub fn as_str(&self) -> &'static str {
        match self {
            GameAction::MoveLeft => "moveLeft",
            GameAction::MoveRight => "moveRight",
            GameAction::MoveUp => "moveUp",
            GameAction::MoveDown => "moveDown",
            GameAction::Restart => "restart",
        }
    }

    /// The slide direction of a move action, `None` for non-move actions.
    pub fn direction(&self) -> Option<Direction> {
        match self {
            GameAction::MoveLeft => Some(Direction::Left),
            GameAction::MoveRight => Some(Direction::Right),
            GameAction::MoveUp => Some(Direction::Up),
            GameAction::MoveDown => Some(Direction::Down),
            GameAction::Restart => None,
        }
    }
}

impl From<Direction> for GameAction {
    fn from(value: Direction) -> Self {
        match value {
            Direction::Left => GameAction::MoveLeft,
            Direction::Right => GameAction::MoveRight,
            Direction::Up => GameAction::MoveUp,
            Direction::Down => GameAction::MoveDown,
        }
    }
}

/// When a random tile is spawned after a move
///
/// - **OnChange**: only after a move that changed the grid (no tile for a no-op move)
/// - **Always**: after every move, even when nothing slid (classic web version behaviour)
///
/// Terminal-state re-evaluation follows the same rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SpawnPolicy {
    #[default]
    OnChange,
    Always,
}

impl SpawnPolicy {
    /// Whether a move with the given change flag triggers a spawn.
    pub fn spawns_after(&self, changed: bool) -> bool {
        match self {
            SpawnPolicy::OnChange => changed,
            SpawnPolicy::Always => true,
        }
    }
}
