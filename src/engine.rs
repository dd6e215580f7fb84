#![warn(clippy::all, clippy::pedantic)]
#![allow(
    // Allow truncation when casting from usize to i32 since board dimensions are always small enough to fit in i32
    clippy::cast_possible_truncation,
    // Allow potential wrapping when casting between types of same size as we validate values are in range
    clippy::cast_possible_wrap
)]

//! The board engine: every game-state transition lives here.
//!
//! All state sits behind a single mutex so one [`Engine`] can be shared through
//! an `Arc` between the input dispatcher, the drop timers and the render loop.
//! Each public method takes the lock exactly once, which keeps a timer-driven
//! placement from interleaving with an input-driven move or rotation.

use std::sync::{Mutex, MutexGuard, PoisonError};

use log::{debug, info};

use crate::components::{Board, ColorIndex, EMPTY, Tetromino, TetrominoType};
use crate::game::{LINES_PER_LEVEL, PALETTE_SIZE, SCORE_PER_ELIMINATED_LINES};

/// Outcome of writing the active piece into the board.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Placement {
    pub lines_cleared: usize,
    pub points: u32,
    pub level_up: bool,
    pub game_over: bool,
}

/// Outcome of one gravity or soft-drop step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// The piece moved down one row.
    Moved,
    /// The piece could not descend and was placed.
    Placed(Placement),
    /// The game is already over; nothing happened.
    Idle,
}

/// Consistent copy of everything the render loop draws.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub cells: Vec<Vec<ColorIndex>>,
    pub score: u32,
    pub level: u32,
    pub lines_cleared: u32,
    pub game_over: bool,
}

impl Snapshot {
    #[must_use]
    pub fn color(&self, row: usize, col: usize) -> ColorIndex {
        self.cells
            .get(row)
            .and_then(|r| r.get(col))
            .copied()
            .unwrap_or(EMPTY)
    }
}

#[derive(Debug)]
struct State {
    board: Board,
    tetromino: Tetromino,
    score: u32,
    level: u32,
    lines_cleared: u32,
    game_over: bool,
    rng: fastrand::Rng,
}

impl State {
    fn new(board: Board, rng: fastrand::Rng) -> Self {
        let mut state = Self {
            board,
            tetromino: Tetromino::new(TetrominoType::O, 1),
            score: 0,
            level: 0,
            lines_cleared: 0,
            game_over: false,
            rng,
        };
        state.spawn();
        state
    }

    fn spawn(&mut self) {
        let tetromino_type = TetrominoType::random(&mut self.rng);
        let color = self.rng.u8(1..PALETTE_SIZE);
        self.tetromino = Tetromino::new(tetromino_type, color);
        self.game_over = !self.board.is_valid_position(&self.tetromino);

        if self.game_over {
            info!("Spawned {tetromino_type:?} into occupied cells, game over");
        } else {
            debug!("Spawned {tetromino_type:?} with color {color}");
        }
    }

    fn cell_color(&self, row: i32, col: i32) -> ColorIndex {
        if self.tetromino.covers(row, col) {
            self.tetromino.color
        } else {
            self.board.get(row, col)
        }
    }

    fn try_move(&mut self, d_row: i32, d_col: i32) -> bool {
        if self.game_over {
            return false;
        }
        let candidate = self.tetromino.moved(d_row, d_col);
        if self.board.is_valid_position(&candidate) {
            self.tetromino = candidate;
            true
        } else {
            false
        }
    }

    fn try_rotate(&mut self) -> bool {
        if self.game_over {
            return false;
        }
        let candidate = self.tetromino.rotated();
        if self.board.is_valid_position(&candidate) {
            self.tetromino = candidate;
            true
        } else {
            false
        }
    }

    fn apply_piece(&mut self) -> Placement {
        if self.game_over {
            return Placement {
                game_over: true,
                ..Placement::default()
            };
        }

        let fully_visible = self.board.lock_tetromino(&self.tetromino);
        let lines_cleared = self.board.clear_lines();

        // Scored against the level held before these lines are counted
        let previous_level = self.level;
        let max_index = SCORE_PER_ELIMINATED_LINES.len() - 1;
        let points =
            SCORE_PER_ELIMINATED_LINES[lines_cleared.min(max_index)] * (previous_level + 1);
        self.score += points;
        self.lines_cleared += lines_cleared as u32;
        self.level = self.lines_cleared / LINES_PER_LEVEL;

        if lines_cleared > 0 {
            info!(
                "Cleared {lines_cleared} line(s) for {points} points (score {}, level {})",
                self.score, self.level
            );
        }

        if fully_visible {
            self.spawn();
        } else {
            info!("Piece locked above the field, game over");
            self.game_over = true;
        }

        Placement {
            lines_cleared,
            points,
            level_up: self.level > previous_level,
            game_over: self.game_over,
        }
    }

    fn snapshot(&self) -> Snapshot {
        let cells = (0..self.board.height as i32)
            .map(|r| {
                (0..self.board.width as i32)
                    .map(|c| self.cell_color(r, c))
                    .collect()
            })
            .collect();

        Snapshot {
            cells,
            score: self.score,
            level: self.level,
            lines_cleared: self.lines_cleared,
            game_over: self.game_over,
        }
    }
}

#[derive(Debug)]
pub struct Engine {
    state: Mutex<State>,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine {
    /// Empty board and a randomly chosen first piece.
    #[must_use]
    pub fn new() -> Self {
        Self::from_parts(Board::default(), fastrand::Rng::new())
    }

    /// Same piece sequence for the same seed.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self::from_parts(Board::default(), fastrand::Rng::with_seed(seed))
    }

    /// Resumes from a prepared board. A piece is spawned immediately, so an
    /// obstructed spawn area ends the game right away.
    #[must_use]
    pub fn with_board(board: Board, seed: u64) -> Self {
        Self::from_parts(board, fastrand::Rng::with_seed(seed))
    }

    fn from_parts(board: Board, rng: fastrand::Rng) -> Self {
        Self {
            state: Mutex::new(State::new(board, rng)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        // Every mutation validates before it commits, so a poisoned guard
        // still holds consistent state.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Replaces the active piece with a random one at the spawn offset and
    /// re-evaluates game over. Does nothing once the game is over; only
    /// [`Engine::reset`] leaves that state.
    pub fn spawn_next_piece(&self) {
        let mut state = self.lock();
        if !state.game_over {
            state.spawn();
        }
    }

    /// Color shown at `(row, col)`: the active piece if it covers the cell,
    /// otherwise the stored board color.
    #[must_use]
    pub fn cell_color(&self, row: i32, col: i32) -> ColorIndex {
        self.lock().cell_color(row, col)
    }

    /// In bounds and empty. Ignores the active piece.
    #[must_use]
    pub fn is_free(&self, row: i32, col: i32) -> bool {
        self.lock().board.is_free(row, col)
    }

    /// Shifts the active piece if every moved cell is open. Rows above the
    /// field count as open while the column is in bounds.
    pub fn try_move(&self, d_row: i32, d_col: i32) -> bool {
        self.lock().try_move(d_row, d_col)
    }

    pub fn try_rotate(&self) -> bool {
        self.lock().try_rotate()
    }

    pub fn apply_piece(&self) -> Placement {
        self.lock().apply_piece()
    }

    /// One row of gravity: move down, or place the piece if it cannot
    /// descend. Runs under a single lock so no input lands in between.
    pub fn step_down(&self) -> Step {
        let mut state = self.lock();
        if state.game_over {
            Step::Idle
        } else if state.try_move(1, 0) {
            Step::Moved
        } else {
            Step::Placed(state.apply_piece())
        }
    }

    /// Clears the board and counters and starts over with a fresh piece.
    pub fn reset(&self) {
        let mut state = self.lock();
        state.board.clear();
        state.score = 0;
        state.level = 0;
        state.lines_cleared = 0;
        state.spawn();
        info!("Game reset");
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.lock().score
    }

    #[must_use]
    pub fn level(&self) -> u32 {
        self.lock().level
    }

    #[must_use]
    pub fn total_lines_cleared(&self) -> u32 {
        self.lock().lines_cleared
    }

    #[must_use]
    pub fn is_game_over(&self) -> bool {
        self.lock().game_over
    }

    #[must_use]
    pub fn tetromino(&self) -> Tetromino {
        self.lock().tetromino
    }

    /// Overrides the active piece. Returns `false` and leaves the current
    /// piece alone if the new one does not fit.
    pub fn set_tetromino(&self, tetromino: Tetromino) -> bool {
        let mut state = self.lock();
        if state.game_over || !state.board.is_valid_position(&tetromino) {
            return false;
        }
        state.tetromino = tetromino;
        true
    }

    #[must_use]
    pub fn board(&self) -> Board {
        self.lock().board.clone()
    }

    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        self.lock().snapshot()
    }
}
