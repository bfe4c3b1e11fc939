use criterion::{black_box, criterion_group, criterion_main, Criterion};
use tui_2048::core::{slide_line, GameState, Grid};
use tui_2048::types::Direction;

fn bench_apply_move(c: &mut Criterion) {
    let mut state = GameState::new(4, 12345).unwrap();
    let mut i = 0usize;

    c.bench_function("apply_move_4x4", |b| {
        b.iter(|| {
            if state.game_over() {
                state.reset();
            }
            let dir = Direction::ALL[i % 4];
            i = i.wrapping_add(1);
            black_box(state.apply_move(black_box(dir)));
        })
    });
}

fn bench_slide_line(c: &mut Criterion) {
    c.bench_function("slide_line_7", |b| {
        b.iter(|| {
            let mut line = black_box([2u64, 2, 0, 4, 4, 8, 8]);
            black_box(slide_line(&mut line));
        })
    });
}

fn bench_slide_grid_all_directions(c: &mut Criterion) {
    let grid = Grid::from_rows(&[
        [2u64, 2, 4, 8, 0, 0, 2],
        [0, 4, 4, 0, 8, 8, 16],
        [2, 0, 2, 0, 2, 0, 2],
        [32, 32, 64, 64, 128, 0, 128],
        [0, 0, 0, 0, 0, 0, 0],
        [4, 2, 4, 2, 4, 2, 4],
        [1024, 1024, 2, 2, 0, 4, 4],
    ])
    .unwrap();

    c.bench_function("slide_grid_7x7_all_directions", |b| {
        b.iter(|| {
            for dir in Direction::ALL {
                let mut g = black_box(grid);
                black_box(g.slide(dir));
            }
        })
    });
}

fn bench_terminal_state(c: &mut Criterion) {
    // Full board, no equal neighbours: the worst case for the scan.
    let grid = Grid::from_rows(&[
        [2u64, 4, 2, 4],
        [4, 2, 4, 2],
        [2, 4, 2, 4],
        [4, 2, 4, 2],
    ])
    .unwrap();

    c.bench_function("terminal_state_full_4x4", |b| {
        b.iter(|| black_box(black_box(&grid).terminal_state()))
    });
}

fn bench_snapshot(c: &mut Criterion) {
    let state = GameState::new(4, 12345).unwrap();
    let mut snap = state.snapshot();

    c.bench_function("snapshot_into", |b| {
        b.iter(|| {
            state.snapshot_into(black_box(&mut snap));
        })
    });
}

criterion_group!(
    benches,
    bench_apply_move,
    bench_slide_line,
    bench_slide_grid_all_directions,
    bench_terminal_state,
    bench_snapshot
);
criterion_main!(benches);
