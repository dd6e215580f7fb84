#![warn(clippy::all, clippy::pedantic)]
#![allow(
    // Allow truncation when casting from usize to i32 since board dimensions are always small enough to fit in i32
    clippy::cast_possible_truncation,
    // Allow sign loss when going from signed to unsigned types since we validate values are non-negative before casting
    clippy::cast_sign_loss,
    // Allow potential wrapping when casting between types of same size as we validate values are in range
    clippy::cast_possible_wrap
)]

use ratatui::style::Color;

use crate::game::{FIELD_HEIGHT, FIELD_WIDTH, PALETTE_SIZE, SPAWN_COL, SPAWN_ROW};

/// Index into [`PALETTE`]. `0` marks an empty cell.
pub type ColorIndex = u8;

pub const EMPTY: ColorIndex = 0;

/// Cell colors: gray, white, red, blue, orange, purple.
pub const PALETTE: [Color; PALETTE_SIZE as usize] = [
    Color::DarkGray,
    Color::White,
    Color::Red,
    Color::Blue,
    Color::Rgb(255, 165, 0),
    Color::Magenta,
];

#[must_use]
pub fn palette_color(index: ColorIndex) -> Color {
    PALETTE
        .get(usize::from(index))
        .copied()
        .unwrap_or(PALETTE[usize::from(EMPTY)])
}

/// A (row, col) offset. Rows grow downward.
pub type Cell = (i32, i32);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TetrominoType {
    O,
    L,
    J,
    Z,
    T,
    S,
    I,
}

impl TetrominoType {
    pub const ALL: [TetrominoType; 7] = [
        TetrominoType::O,
        TetrominoType::L,
        TetrominoType::J,
        TetrominoType::Z,
        TetrominoType::T,
        TetrominoType::S,
        TetrominoType::I,
    ];

    #[must_use]
    pub fn random(rng: &mut fastrand::Rng) -> Self {
        Self::ALL[rng.usize(..Self::ALL.len())]
    }

    #[must_use]
    pub fn template(self) -> [Cell; 4] {
        match self {
            TetrominoType::O => [(0, 0), (0, 1), (1, 0), (1, 1)],
            TetrominoType::L => [(0, 0), (0, 1), (1, 1), (2, 1)],
            TetrominoType::J => [(0, 1), (1, 1), (2, 1), (2, 0)],
            TetrominoType::Z => [(0, 1), (1, 0), (1, 1), (2, 0)],
            TetrominoType::T => [(0, 1), (1, 0), (1, 1), (2, 1)],
            TetrominoType::S => [(0, 0), (1, 0), (1, 1), (2, 1)],
            TetrominoType::I => [(0, 1), (1, 1), (2, 1), (3, 1)],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub row: i32,
    pub col: i32,
}

impl Position {
    #[must_use]
    pub fn spawn() -> Self {
        Self {
            row: SPAWN_ROW,
            col: SPAWN_COL,
        }
    }
}

/// The falling piece. Moves and rotations produce a new value which the
/// engine validates before swapping it in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tetromino {
    pub shape: [Cell; 4],
    pub color: ColorIndex,
    pub position: Position,
}

impl Tetromino {
    #[must_use]
    pub fn new(tetromino_type: TetrominoType, color: ColorIndex) -> Self {
        Self {
            shape: tetromino_type.template(),
            color,
            position: Position::spawn(),
        }
    }

    #[must_use]
    pub fn at(mut self, row: i32, col: i32) -> Self {
        self.position = Position { row, col };
        self
    }

    /// Board coordinates of the four cells.
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        self.shape
            .iter()
            .map(|&(r, c)| (r + self.position.row, c + self.position.col))
    }

    #[must_use]
    pub fn covers(&self, row: i32, col: i32) -> bool {
        self.cells().any(|cell| cell == (row, col))
    }

    #[must_use]
    pub fn moved(self, d_row: i32, d_col: i32) -> Self {
        self.at(self.position.row + d_row, self.position.col + d_col)
    }

    /// Quarter turn about the shape's local origin: the cell list is walked
    /// in reverse and each `(r, c)` becomes `(c, -r)`.
    #[must_use]
    pub fn rotated(self) -> Self {
        let mut shape = self.shape;
        for (dst, &(r, c)) in shape.iter_mut().zip(self.shape.iter().rev()) {
            *dst = (c, -r);
        }
        Self { shape, ..self }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    pub width: usize,
    pub height: usize,
    pub cells: Vec<Vec<ColorIndex>>,
}

impl Default for Board {
    fn default() -> Self {
        Self::new(FIELD_WIDTH, FIELD_HEIGHT)
    }
}

impl Board {
    #[must_use]
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![vec![EMPTY; width]; height],
        }
    }

    pub fn clear(&mut self) {
        for row in &mut self.cells {
            row.fill(EMPTY);
        }
    }

    fn in_columns(&self, col: i32) -> bool {
        col >= 0 && col < self.width as i32
    }

    fn in_bounds(&self, row: i32, col: i32) -> bool {
        row >= 0 && row < self.height as i32 && self.in_columns(col)
    }

    /// Stored color, or empty for coordinates outside the board.
    #[must_use]
    pub fn get(&self, row: i32, col: i32) -> ColorIndex {
        if self.in_bounds(row, col) {
            self.cells[row as usize][col as usize]
        } else {
            EMPTY
        }
    }

    #[must_use]
    pub fn is_free(&self, row: i32, col: i32) -> bool {
        self.in_bounds(row, col) && self.cells[row as usize][col as usize] == EMPTY
    }

    /// Like [`Board::is_free`], but rows above the field count as open as
    /// long as the column is on the board.
    #[must_use]
    pub fn can_occupy(&self, row: i32, col: i32) -> bool {
        if row < 0 {
            self.in_columns(col)
        } else {
            self.is_free(row, col)
        }
    }

    #[must_use]
    pub fn is_valid_position(&self, tetromino: &Tetromino) -> bool {
        tetromino.cells().all(|(r, c)| self.can_occupy(r, c))
    }

    /// Writes the piece's visible cells. Returns `false` if part of the piece
    /// was still above the field.
    pub fn lock_tetromino(&mut self, tetromino: &Tetromino) -> bool {
        let mut fully_visible = true;
        for (r, c) in tetromino.cells() {
            if self.in_bounds(r, c) {
                self.cells[r as usize][c as usize] = tetromino.color;
            } else {
                fully_visible = false;
            }
        }
        fully_visible
    }

    /// Removes every full row, refills from the top, and returns how many
    /// rows went away.
    pub fn clear_lines(&mut self) -> usize {
        let before = self.cells.len();
        self.cells.retain(|row| row.contains(&EMPTY));
        let cleared = before - self.cells.len();
        for _ in 0..cleared {
            self.cells.insert(0, vec![EMPTY; self.width]);
        }
        cleared
    }
}
