use rand::rngs::StdRng;
use rand::SeedableRng;

use tui_2048::core::{GameState, Grid};
use tui_2048::term::{AdapterStatusView, AnchorY, FrameBuffer, GameView, Viewport};

fn screen_text(fb: &FrameBuffer) -> String {
    let mut all = String::new();
    for y in 0..fb.height() {
        all.push_str(&fb.row_text(y));
        all.push('\n');
    }
    all
}

fn game(rows: &[[u64; 4]]) -> GameState {
    GameState::from_grid(Grid::from_rows(rows).unwrap(), StdRng::seed_from_u64(5))
}

#[test]
fn term_view_renders_border_corners() {
    let snap = GameState::new(4, 1).unwrap().snapshot();
    let view = GameView::default();

    // 4 tiles of 7 columns + 5 gaps + border = 35; 4 tiles of 3 rows + 5 gaps + border = 19.
    let fb = view.render(&snap, Viewport::new(35, 19));

    assert_eq!(fb.get(0, 0).unwrap().ch, '┌');
    assert_eq!(fb.get(34, 0).unwrap().ch, '┐');
    assert_eq!(fb.get(0, 18).unwrap().ch, '└');
    assert_eq!(fb.get(34, 18).unwrap().ch, '┘');
}

#[test]
fn term_view_centers_tile_labels() {
    let snap = game(&[[2, 0, 0, 0], [0, 0, 0, 0], [0, 0, 0, 128], [0, 0, 0, 0]]).snapshot();
    let fb = GameView::default().render(&snap, Viewport::new(35, 19));

    // Tile (0,0) spans x 2..9, y 2..5; its label sits on the middle row.
    assert_eq!(fb.row_text(3).chars().nth(5), Some('2'));
    let row = fb.row_text(11);
    let tile: String = row.chars().skip(26).take(7).collect();
    assert_eq!(tile, "  128  ");
}

#[test]
fn term_view_colors_tiles_by_value() {
    let snap = game(&[[2, 4, 0, 0], [0; 4], [0; 4], [0; 4]]).snapshot();
    let fb = GameView::default().render(&snap, Viewport::new(35, 19));

    let two = fb.get(2, 2).unwrap().style.bg;
    let four = fb.get(10, 2).unwrap().style.bg;
    let empty = fb.get(18, 2).unwrap().style.bg;
    assert_ne!(two, four);
    assert_ne!(two, empty);
}

#[test]
fn term_view_draws_side_panel_when_wide_enough() {
    let mut g = GameState::new(4, 3).unwrap();
    for _ in 0..4 {
        g.apply_move(tui_2048::types::Direction::Left);
        g.apply_move(tui_2048::types::Direction::Down);
    }
    let snap = g.snapshot();

    let adapter = AdapterStatusView {
        enabled: true,
        client_count: 2,
        controller_id: Some(1),
        streaming_count: 1,
    };
    let mut fb = FrameBuffer::new(0, 0);
    GameView::default().render_into_with_adapter(&snap, Some(&adapter), Viewport::new(70, 26), &mut fb);
    let all = screen_text(&fb);
    assert!(all.contains("SCORE"));
    assert!(all.contains("MOVES"));
    assert!(all.contains("4x4"));
    assert!(all.contains("PLAYING"));
    assert!(all.contains("CTRL 1"));

    // Narrow viewport: no panel.
    let fb = GameView::default().render(&snap, Viewport::new(35, 19));
    assert!(!screen_text(&fb).contains("SCORE"));
}

#[test]
fn term_view_shows_game_over_overlay() {
    let snap = game(&[[2, 4, 2, 4], [4, 2, 4, 2], [2, 4, 2, 4], [4, 2, 4, 2]]).snapshot();
    assert!(snap.game_over);
    let fb = GameView::default().render(&snap, Viewport::new(60, 19));
    assert!(screen_text(&fb).contains("GAME OVER"));
}

#[test]
fn term_view_marks_win_on_top_border() {
    let snap = game(&[[2048, 0, 0, 0], [0; 4], [0; 4], [0; 4]]).snapshot();
    assert!(snap.won);
    let fb = GameView::default()
        .with_anchor_y(AnchorY::Top)
        .render(&snap, Viewport::new(70, 19));
    assert!(fb.row_text(0).contains("2048!"));
    assert!(screen_text(&fb).contains("WON"));
}

#[test]
fn term_view_falls_back_to_compact_tiles() {
    let snap = game(&[[2, 0, 0, 0], [0; 4], [0; 4], [0, 0, 0, 1024]]).snapshot();
    let fb = GameView::default()
        .with_anchor_y(AnchorY::Top)
        .render(&snap, Viewport::new(22, 6));

    assert_eq!(fb.get(0, 0).unwrap().ch, '┌');
    assert_eq!(fb.get(21, 5).unwrap().ch, '┘');
    assert!(fb.row_text(4).contains("1024"));
}

#[test]
fn term_view_centers_board_by_default_on_tall_viewports() {
    let snap = GameState::new(4, 1).unwrap().snapshot();
    let fb = GameView::default().render(&snap, Viewport::new(35, 29));

    // start_y = (29 - 19) / 2 = 5.
    assert_eq!(fb.get(0, 5).unwrap().ch, '┌');
}
