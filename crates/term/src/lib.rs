//! Terminal presentation for the 2048 board.
//!
//! `GameView` turns a `GameSnapshot` into a `FrameBuffer` (pure, testable) and
//! `TerminalRenderer` flushes framebuffers to the real terminal with diffing.

pub mod fb;
pub mod game_view;
pub mod renderer;

pub use tui_2048_core as core;
pub use tui_2048_types as types;

pub use fb::{Cell, CellStyle, FrameBuffer, Rgb};
pub use game_view::{
    tile_label, tile_style, AdapterStatusView, AnchorY, BoardLayout, GameView, Viewport,
};
pub use renderer::{encode_diff_into, encode_full_into, TerminalRenderer};
