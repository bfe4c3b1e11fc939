//! Swipe recognition from mouse drags.
//!
//! A press starts a gesture, the release ends it, and the dominant axis of the
//! drag picks the direction. Drags shorter than the dead zone are ignored.

use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};

use crate::types::{Direction, GameAction};

/// Minimum drag (in terminal cells, along the dominant axis) that counts as a swipe.
pub const DEFAULT_SWIPE_DEAD_ZONE: u32 = 2;

/// Map a drag vector to a direction.
///
/// `|dx| > |dy|` is a horizontal swipe; ties go to the vertical axis. Positive `dy`
/// points down (terminal rows grow downward).
pub fn swipe_direction(dx: i32, dy: i32, dead_zone: u32) -> Option<Direction> {
    let (ax, ay) = (dx.unsigned_abs(), dy.unsigned_abs());
    if ax.max(ay) < dead_zone.max(1) {
        return None;
    }
    if ax > ay {
        Some(if dx > 0 { Direction::Right } else { Direction::Left })
    } else {
        Some(if dy > 0 { Direction::Down } else { Direction::Up })
    }
}

/// Tracks one in-flight mouse drag.
#[derive(Debug, Clone)]
pub struct SwipeTracker {
    start: Option<(u16, u16)>,
    dead_zone: u32,
}

impl SwipeTracker {
    pub fn new() -> Self {
        Self::with_dead_zone(DEFAULT_SWIPE_DEAD_ZONE)
    }

    pub fn with_dead_zone(dead_zone: u32) -> Self {
        Self {
            start: None,
            dead_zone,
        }
    }

    /// Feed a mouse event; returns a move action when a swipe completes.
    pub fn handle_mouse_event(&mut self, event: MouseEvent) -> Option<GameAction> {
        match event.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                self.start = Some((event.column, event.row));
                None
            }
            MouseEventKind::Up(MouseButton::Left) => {
                let (x0, y0) = self.start.take()?;
                let dx = event.column as i32 - x0 as i32;
                let dy = event.row as i32 - y0 as i32;
                swipe_direction(dx, dy, self.dead_zone).map(GameAction::from)
            }
            _ => None,
        }
    }

    /// Drop any half-finished gesture (e.g. on focus loss).
    pub fn cancel(&mut self) {
        self.start = None;
    }
}

impl Default for SwipeTracker {
    fn default() -> Self {
        Self::new()
    }
}
