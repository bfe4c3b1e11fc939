//! Slide/merge module - the move transformation
//!
//! Every direction is expressed through one primitive, [`slide_line`], which slides a
//! line toward index 0. A direction only changes how a line is read out of the grid:
//!
//! | Direction | Transpose | Reverse |
//! |-----------|-----------|---------|
//! | Left      | no        | no      |
//! | Right     | no        | yes     |
//! | Up        | yes       | no      |
//! | Down      | yes       | yes     |
//!
//! Lines are gathered into a stack buffer, slid, and scattered back in place.

use crate::grid::{Grid, Tile};
use crate::types::{Direction, MAX_BOARD_SIZE, MAX_TILE};

/// Result of sliding a single line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LineSlide {
    /// Number of merges performed
    pub merges: u32,
    /// Sum of merged values (the score gained)
    pub merged_score: u64,
}

/// Result of sliding the whole grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SlideSummary {
    /// True when any cell differs from before the move
    pub changed: bool,
    pub merges: u32,
    pub merged_score: u64,
}

/// Slide and merge one line toward index 0.
///
/// Zeros are squeezed out, then equal neighbours merge pairwise starting at index 0.
/// A merged tile never merges again in the same pass, and a pair of `MAX_TILE`
/// tiles stays apart. The line is re-padded with zeros at the far end.
///
/// ```
/// use tui_2048_core::slide_line;
///
/// let mut line = [2, 0, 2, 2];
/// let slid = slide_line(&mut line);
/// assert_eq!(line, [4, 2, 0, 0]);
/// assert_eq!(slid.merged_score, 4);
/// ```
pub fn slide_line(line: &mut [Tile]) -> LineSlide {
    let len = line.len();

    // Compact non-zero values toward index 0.
    let mut filled = 0usize;
    for read in 0..len {
        if line[read] != 0 {
            line[filled] = line[read];
            filled += 1;
        }
    }

    // Merge pass. `out <= read` always, so unread cells are never clobbered.
    let mut result = LineSlide::default();
    let mut out = 0usize;
    let mut read = 0usize;
    while read < filled {
        let value = line[read];
        if read + 1 < filled && line[read + 1] == value && value < MAX_TILE {
            let merged = value * 2;
            line[out] = merged;
            result.merges += 1;
            result.merged_score += merged;
            read += 2;
        } else {
            line[out] = value;
            read += 1;
        }
        out += 1;
    }

    for cell in &mut line[out..] {
        *cell = 0;
    }

    result
}

/// How lines of a direction map onto grid coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Orientation {
    transpose: bool,
    reverse: bool,
}

impl Orientation {
    fn of(direction: Direction) -> Self {
        match direction {
            Direction::Left => Self {
                transpose: false,
                reverse: false,
            },
            Direction::Right => Self {
                transpose: false,
                reverse: true,
            },
            Direction::Up => Self {
                transpose: true,
                reverse: false,
            },
            Direction::Down => Self {
                transpose: true,
                reverse: true,
            },
        }
    }

    /// Flat index of position `pos` (counted from the target edge) within line `line`.
    #[inline(always)]
    fn cell(&self, line: usize, pos: usize, n: usize) -> usize {
        let p = if self.reverse { n - 1 - pos } else { pos };
        let (row, col) = if self.transpose { (p, line) } else { (line, p) };
        row * n + col
    }
}

/// Apply the slide/merge transformation for `direction` to the whole grid.
pub fn slide_grid(grid: &mut Grid, direction: Direction) -> SlideSummary {
    let before = *grid;
    let n = grid.size() as usize;
    let orientation = Orientation::of(direction);
    let cells = grid.cells_mut();

    let mut summary = SlideSummary::default();
    let mut buf = [0 as Tile; MAX_BOARD_SIZE as usize];
    for line in 0..n {
        let buf = &mut buf[..n];
        for (pos, slot) in buf.iter_mut().enumerate() {
            *slot = cells[orientation.cell(line, pos, n)];
        }

        let slid = slide_line(buf);
        summary.merges += slid.merges;
        summary.merged_score += slid.merged_score;

        for (pos, &value) in buf.iter().enumerate() {
            cells[orientation.cell(line, pos, n)] = value;
        }
    }

    summary.changed = *grid != before;
    summary
}

impl Grid {
    /// Slide and merge in place. See [`slide_grid`].
    pub fn slide(&mut self, direction: Direction) -> SlideSummary {
        slide_grid(self, direction)
    }

    /// True if a move in `direction` would change the grid.
    pub fn can_slide(&self, direction: Direction) -> bool {
        let mut trial = *self;
        trial.slide(direction).changed
    }
}
