//! Terminal input module (engine-facing).
//!
//! This module is intentionally independent of any UI framework. It maps
//! `crossterm` key events and mouse drags ("swipes") into
//! [`crate::types::GameAction`]s.

pub mod map;
pub mod swipe;

pub use tui_2048_types as types;

pub use map::{handle_key_event, should_quit};
pub use swipe::{swipe_direction, SwipeTracker, DEFAULT_SWIPE_DEAD_ZONE};
