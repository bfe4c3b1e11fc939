use crate::game_state::MoveOutcome;
use crate::grid::Tile;
use crate::types::MAX_CELLS;

/// Copyable view of a game, handed to renderers and the adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GameSnapshot {
    pub size: u8,
    /// Row-major cells; only the first `size * size` entries are meaningful.
    pub cells: [Tile; MAX_CELLS],
    pub score: u64,
    pub moves: u32,
    pub max_tile: Tile,
    pub won: bool,
    pub game_over: bool,
    pub episode_id: u32,
    pub seed: Option<u64>,
    pub last_move: Option<MoveOutcome>,
}

impl GameSnapshot {
    pub fn clear(&mut self) {
        self.size = 0;
        self.cells = [0; MAX_CELLS];
        self.score = 0;
        self.moves = 0;
        self.max_tile = 0;
        self.won = false;
        self.game_over = false;
        self.episode_id = 0;
        self.seed = None;
        self.last_move = None;
    }

    /// Cell at (row, col); 0 when out of range.
    pub fn cell(&self, row: usize, col: usize) -> Tile {
        let n = self.size as usize;
        if row >= n || col >= n {
            return 0;
        }
        self.cells[row * n + col]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Tile]> + '_ {
        let n = self.size as usize;
        self.cells[..n * n].chunks_exact(n.max(1))
    }

    pub fn playable(&self) -> bool {
        !self.game_over
    }
}

impl Default for GameSnapshot {
    fn default() -> Self {
        Self {
            size: 0,
            cells: [0; MAX_CELLS],
            score: 0,
            moves: 0,
            max_tile: 0,
            won: false,
            game_over: false,
            episode_id: 0,
            seed: None,
            last_move: None,
        }
    }
}
