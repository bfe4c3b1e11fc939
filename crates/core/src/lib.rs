//! Core game logic module - pure, deterministic, and testable
//!
//! This module contains all the game rules, state management, and simulation logic.
//! It has **zero dependencies** on UI, networking, or I/O, making it:
//!
//! - **Deterministic**: Same seed produces identical games (for AI training and replays)
//! - **Testable**: Unit tests for every rule, plus scenario tests at the workspace root
//! - **Portable**: Can run in any environment (terminal, GUI, headless)
//! - **Fast**: Moves work on a fixed-capacity `Copy` grid and never allocate
//!
//! # Module Structure
//!
//! - [`grid`]: N×N tile matrix with flat array storage
//! - [`slide`]: the slide/merge transformation, one line primitive for all directions
//! - [`rng`]: random tile spawning (2 at 90%, 4 at 10%) from an injected RNG
//! - [`terminal`]: win / no-moves-left evaluation
//! - [`game_state`]: complete game state (grid, score, flags, lifecycle)
//! - [`snapshot`]: copyable view for renderers and the adapter
//!
//! # Game Rules
//!
//! - A move slides every line toward the target edge, merging equal neighbours once
//! - Each merge adds the merged value to the score
//! - A move that changed the grid spawns one new tile (see [`types::SpawnPolicy`])
//! - Reaching 2048 signals a win; play may continue
//! - A full grid without equal neighbours is game over
//!
//! # Example
//!
//! ```
//! use tui_2048_core::GameState;
//! use tui_2048_types::{Direction, GameAction};
//!
//! // Create a seeded 4x4 game
//! let mut game = GameState::new(4, 12345).unwrap();
//!
//! // Apply moves
//! game.apply_move(Direction::Left);
//! game.apply_action(GameAction::MoveUp);
//!
//! // Inspect state
//! let snap = game.snapshot();
//! assert_eq!(snap.size, 4);
//! assert!(snap.score <= 16);
//! ```

pub mod error;
pub mod game_state;
pub mod grid;
pub mod rng;
pub mod slide;
pub mod snapshot;
pub mod terminal;

pub use tui_2048_types as types;

// Re-export commonly used types for convenience
pub use error::{parse_direction, GameError};
pub use game_state::{GameState, MoveOutcome};
pub use grid::{is_valid_tile, Grid, Tile};
pub use rng::{add_random_tile, random_tile_value, SpawnedTile};
pub use slide::{slide_grid, slide_line, LineSlide, SlideSummary};
pub use snapshot::GameSnapshot;
pub use terminal::TerminalState;
