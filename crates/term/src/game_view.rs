//! GameView: maps a `core::GameSnapshot` into a terminal framebuffer.
//!
//! This module is pure (no I/O). It can be unit-tested.

use crate::core::GameSnapshot;
use crate::fb::{format_u64, CellStyle, FrameBuffer, Rgb};
use crate::types::WIN_TILE;

/// Terminal viewport dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdapterStatusView {
    pub enabled: bool,
    pub client_count: u16,
    pub controller_id: Option<usize>,
    pub streaming_count: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorY {
    Center,
    Top,
}

/// Where the board frame landed in the viewport for a given render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardLayout {
    /// Top-left corner of the border.
    pub x: u16,
    pub y: u16,
    /// Border-inclusive size.
    pub w: u16,
    pub h: u16,
    pub tile_w: u16,
    pub tile_h: u16,
    pub gap: u16,
}

impl BoardLayout {
    /// Top-left terminal cell of tile (row, col).
    pub fn tile_origin(&self, row: u16, col: u16) -> (u16, u16) {
        let x = self.x + 1 + self.gap + col * (self.tile_w + self.gap);
        let y = self.y + 1 + self.gap + row * (self.tile_h + self.gap);
        (x, y)
    }
}

/// A lightweight terminal renderer for the 2048 board.
#[derive(Debug, Clone)]
pub struct GameView {
    /// Tile width in terminal columns.
    tile_w: u16,
    /// Tile height in terminal rows.
    tile_h: u16,
    /// Spacing between tiles (and between tiles and the border).
    gap: u16,
    anchor_y: AnchorY,
    /// Drop to the compact tile size when the board does not fit.
    compact_fallback: bool,
}

impl Default for GameView {
    fn default() -> Self {
        // 7x3 keeps tiles roughly square on typical terminal glyphs.
        Self {
            tile_w: 7,
            tile_h: 3,
            gap: 1,
            anchor_y: AnchorY::Center,
            compact_fallback: true,
        }
    }
}

impl GameView {
    pub fn new(tile_w: u16, tile_h: u16, gap: u16) -> Self {
        Self {
            tile_w: tile_w.max(1),
            tile_h: tile_h.max(1),
            gap,
            ..Self::default()
        }
    }

    /// One-row tiles without gaps, for small terminals.
    pub fn compact() -> Self {
        Self {
            compact_fallback: false,
            ..Self::new(5, 1, 0)
        }
    }

    pub fn with_anchor_y(mut self, anchor_y: AnchorY) -> Self {
        self.anchor_y = anchor_y;
        self
    }

    pub fn with_compact_fallback(mut self, enabled: bool) -> Self {
        self.compact_fallback = enabled;
        self
    }

    /// Border-inclusive frame size for an `n`x`n` board.
    pub fn frame_size(&self, n: u16) -> (u16, u16) {
        let w = n * self.tile_w + (n + 1) * self.gap + 2;
        let h = n * self.tile_h + (n + 1) * self.gap + 2;
        (w, h)
    }

    /// Compute where the board goes, switching to the compact tile size if needed.
    pub fn layout(&self, size: u8, viewport: Viewport) -> BoardLayout {
        let n = size as u16;
        let (mut w, mut h) = self.frame_size(n);
        let (mut tile_w, mut tile_h, mut gap) = (self.tile_w, self.tile_h, self.gap);

        if self.compact_fallback && (w > viewport.width || h > viewport.height) {
            let compact = Self::compact();
            (w, h) = compact.frame_size(n);
            (tile_w, tile_h, gap) = (compact.tile_w, compact.tile_h, compact.gap);
        }

        let x = viewport.width.saturating_sub(w) / 2;
        let y = match self.anchor_y {
            AnchorY::Center => viewport.height.saturating_sub(h) / 2,
            AnchorY::Top => 0,
        };

        BoardLayout {
            x,
            y,
            w,
            h,
            tile_w,
            tile_h,
            gap,
        }
    }

    /// Render the current game state into an existing framebuffer.
    ///
    /// This is the allocation-free hot path. Callers can reuse a framebuffer
    /// across frames and only resize when the terminal size changes.
    pub fn render_into(&self, snap: &GameSnapshot, viewport: Viewport, fb: &mut FrameBuffer) {
        self.render_into_with_adapter(snap, None, viewport, fb);
    }

    pub fn render_into_with_adapter(
        &self,
        snap: &GameSnapshot,
        adapter: Option<&AdapterStatusView>,
        viewport: Viewport,
        fb: &mut FrameBuffer,
    ) {
        fb.resize(viewport.width, viewport.height);
        fb.clear(CellStyle::default().cell(' '));
        if snap.size == 0 {
            return;
        }

        let layout = self.layout(snap.size, viewport);

        fb.fill_rect(
            layout.x + 1,
            layout.y + 1,
            layout.w - 2,
            layout.h - 2,
            ' ',
            CellStyle::new(BOARD_FG, BOARD_BG),
        );
        draw_border(fb, layout.x, layout.y, layout.w, layout.h);

        for row in 0..snap.size as u16 {
            for col in 0..snap.size as u16 {
                let value = snap.cell(row as usize, col as usize);
                draw_tile(fb, &layout, row, col, value);
            }
        }

        self.draw_side_panel(fb, snap, adapter, viewport, &layout);

        if snap.game_over {
            draw_overlay_text(fb, &layout, "GAME OVER");
        } else if snap.won {
            // On the top border so play can continue unobstructed.
            let style = tile_style(WIN_TILE);
            fb.put_str_centered(layout.x, layout.y, layout.w, " 2048! ", style);
        }
    }

    /// Convenience helper that allocates a new framebuffer.
    pub fn render(&self, snap: &GameSnapshot, viewport: Viewport) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(snap, viewport, &mut fb);
        fb
    }

    fn draw_side_panel(
        &self,
        fb: &mut FrameBuffer,
        snap: &GameSnapshot,
        adapter: Option<&AdapterStatusView>,
        viewport: Viewport,
        layout: &BoardLayout,
    ) {
        let panel_x = layout.x.saturating_add(layout.w).saturating_add(2);
        if panel_x >= viewport.width || viewport.width - panel_x < 12 {
            return;
        }

        let label = CellStyle::new(Rgb::new(220, 220, 220), Rgb::new(0, 0, 0)).bold();
        let value = CellStyle::new(Rgb::new(200, 200, 200), Rgb::new(0, 0, 0));
        let dim = value.dim();

        let mut y = layout.y;
        let field = |fb: &mut FrameBuffer, name: &str, y: &mut u16| {
            fb.put_str(panel_x, *y, name, label);
            *y = y.saturating_add(1);
        };

        field(fb, "SCORE", &mut y);
        fb.put_u64(panel_x, y, snap.score, value);
        y = y.saturating_add(2);

        field(fb, "MOVES", &mut y);
        fb.put_u64(panel_x, y, snap.moves as u64, value);
        y = y.saturating_add(2);

        field(fb, "BEST", &mut y);
        fb.put_u64(panel_x, y, snap.max_tile, value);
        y = y.saturating_add(2);

        field(fb, "SIZE", &mut y);
        let x = panel_x + fb.put_u64(panel_x, y, snap.size as u64, value);
        let x = x + fb.put_str(x, y, "x", value);
        fb.put_u64(x, y, snap.size as u64, value);
        y = y.saturating_add(2);

        field(fb, "STATUS", &mut y);
        let (status, style) = if snap.game_over {
            ("GAME OVER", value.bold())
        } else if snap.won {
            ("WON", CellStyle::new(Rgb::new(237, 194, 46), Rgb::new(0, 0, 0)).bold())
        } else {
            ("PLAYING", value)
        };
        fb.put_str(panel_x, y, status, style);
        y = y.saturating_add(2);

        field(fb, "AI", &mut y);
        match adapter {
            Some(st) if st.enabled => {
                fb.put_str(panel_x, y, "ON", value);
                fb.put_str(panel_x + 3, y, "clients", dim);
                y = y.saturating_add(1);
                fb.put_str(panel_x, y, "C", value);
                fb.put_u64(panel_x + 2, y, st.client_count as u64, value);
                y = y.saturating_add(1);
                fb.put_str(panel_x, y, "S", value);
                fb.put_u64(panel_x + 2, y, st.streaming_count as u64, value);
                y = y.saturating_add(1);
                fb.put_str(panel_x, y, "CTRL", value);
                match st.controller_id {
                    Some(id) => fb.put_u64(panel_x + 5, y, id as u64, value),
                    None => fb.put_str(panel_x + 5, y, "-", value),
                };
            }
            _ => {
                fb.put_str(panel_x, y, "OFF", value);
            }
        }
        y = y.saturating_add(2);

        for help in ["arrows/hjkl move", "r restart", "q quit"] {
            fb.put_str(panel_x, y, help, dim);
            y = y.saturating_add(1);
        }
    }
}

const BOARD_BG: Rgb = Rgb::new(187, 173, 160);
const BOARD_FG: Rgb = Rgb::new(119, 110, 101);
const EMPTY_BG: Rgb = Rgb::new(205, 193, 180);

fn draw_border(fb: &mut FrameBuffer, x: u16, y: u16, w: u16, h: u16) {
    if w < 2 || h < 2 {
        return;
    }
    let style = CellStyle::new(Rgb::new(200, 200, 200), Rgb::new(0, 0, 0));

    fb.put_char(x, y, '┌', style);
    fb.put_char(x + w - 1, y, '┐', style);
    fb.put_char(x, y + h - 1, '└', style);
    fb.put_char(x + w - 1, y + h - 1, '┘', style);

    for dx in 1..w - 1 {
        fb.put_char(x + dx, y, '─', style);
        fb.put_char(x + dx, y + h - 1, '─', style);
    }
    for dy in 1..h - 1 {
        fb.put_char(x, y + dy, '│', style);
        fb.put_char(x + w - 1, y + dy, '│', style);
    }
}

fn draw_tile(fb: &mut FrameBuffer, layout: &BoardLayout, row: u16, col: u16, value: u64) {
    let (x, y) = layout.tile_origin(row, col);
    let style = tile_style(value);
    fb.fill_rect(x, y, layout.tile_w, layout.tile_h, ' ', style);

    let mid_y = y + layout.tile_h / 2;
    if value == 0 {
        fb.put_str_centered(x, mid_y, layout.tile_w, "·", style.dim());
        return;
    }
    let mut buf = [0u8; 24];
    let text = tile_label(value, layout.tile_w as usize, &mut buf);
    fb.put_str_centered(x, mid_y, layout.tile_w, text, style);
}

/// Colors per tile value, following the classic palette up to 2048.
pub fn tile_style(value: u64) -> CellStyle {
    const DARK: Rgb = Rgb::new(119, 110, 101);
    const LIGHT: Rgb = Rgb::new(249, 246, 242);

    let bg = match value {
        0 => return CellStyle::new(BOARD_FG, EMPTY_BG),
        2 => Rgb::new(238, 228, 218),
        4 => Rgb::new(237, 224, 200),
        8 => Rgb::new(242, 177, 121),
        16 => Rgb::new(245, 149, 99),
        32 => Rgb::new(246, 124, 95),
        64 => Rgb::new(246, 94, 59),
        128 => Rgb::new(237, 207, 114),
        256 => Rgb::new(237, 204, 97),
        512 => Rgb::new(237, 200, 80),
        1024 => Rgb::new(237, 197, 63),
        WIN_TILE => Rgb::new(237, 194, 46),
        _ => Rgb::new(60, 58, 50),
    };
    let fg = if value <= 4 { DARK } else { LIGHT };
    let style = CellStyle::new(fg, bg);
    if value >= 128 {
        style.bold()
    } else {
        style
    }
}

/// Label for a tile that fits in `max_w` columns.
///
/// Values that are too wide are shown in binary multiples (`131072` -> `128k`).
pub fn tile_label(value: u64, max_w: usize, buf: &mut [u8; 24]) -> &str {
    const SUFFIXES: [&str; 6] = ["", "k", "M", "G", "T", "P"];

    let mut digits = [0u8; 20];
    let mut v = value;
    let mut len = 0;
    for (i, suffix) in SUFFIXES.iter().enumerate() {
        let s = format_u64(v, &mut digits);
        len = s.len() + suffix.len();
        if len <= max_w || i + 1 == SUFFIXES.len() {
            buf[..s.len()].copy_from_slice(s.as_bytes());
            buf[s.len()..len].copy_from_slice(suffix.as_bytes());
            break;
        }
        v /= 1024;
    }
    std::str::from_utf8(&buf[..len]).unwrap_or("")
}

fn draw_overlay_text(fb: &mut FrameBuffer, layout: &BoardLayout, text: &str) {
    let mid_y = layout.y.saturating_add(layout.h / 2);
    let style = CellStyle::new(Rgb::new(255, 255, 255), Rgb::new(0, 0, 0)).bold();
    // Pad with one blank cell either side so the text stands off the tiles.
    let text_w = text.chars().count() as u16 + 2;
    let x = layout.x.saturating_add(layout.w.saturating_sub(text_w) / 2);
    fb.fill_rect(x, mid_y, text_w, 1, ' ', style);
    fb.put_str(x + 1, mid_y, text, style);
}
