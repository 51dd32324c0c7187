use std::ops::{Deref, DerefMut};

use crate::error::BoardError;

use super::Player;

pub const DEFAULT_ROWS: usize = 6;
pub const DEFAULT_COLS: usize = 7;

/// Number of identical pieces in a line needed to win.
pub const WIN_LENGTH: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cell {
    Empty,
    Own,
    Opponent,
}

/// Rectangular four-in-a-row grid. Row 0 is the bottom row.
///
/// `column_fill[c]` is the next open row in column `c` (equal to `rows`
/// when the column is full), so moves and undos are constant time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    rows: usize,
    cols: usize,
    cells: Vec<Cell>,
    column_fill: Vec<usize>,
}

impl Board {
    /// Create an empty board with the given dimensions.
    pub fn new(rows: usize, cols: usize) -> Self {
        Board {
            rows,
            cols,
            cells: vec![Cell::Empty; rows * cols],
            column_fill: vec![0; cols],
        }
    }

    /// Create an empty 6 × 7 board.
    pub fn standard() -> Self {
        Self::new(DEFAULT_ROWS, DEFAULT_COLS)
    }

    /// Build a board from rows listed bottom-up (`rows[0]` is the bottom row).
    pub fn from_rows(rows: Vec<Vec<Cell>>) -> Result<Self, BoardError> {
        let num_rows = rows.len();
        let num_cols = rows.first().map(Vec::len).unwrap_or(0);
        if num_rows == 0 || num_cols == 0 {
            return Err(BoardError::Empty);
        }

        let mut board = Board::new(num_rows, num_cols);
        for (row, cells) in rows.into_iter().enumerate() {
            if cells.len() != num_cols {
                return Err(BoardError::Ragged {
                    row,
                    expected: num_cols,
                    found: cells.len(),
                });
            }
            for (col, cell) in cells.into_iter().enumerate() {
                if cell == Cell::Empty {
                    continue;
                }
                if board.column_fill[col] != row {
                    return Err(BoardError::FloatingPiece { row, col });
                }
                board.set(row, col, cell);
                board.column_fill[col] += 1;
            }
        }
        Ok(board)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.cols
    }

    /// Get the cell at a specific position (row 0 is the bottom).
    pub fn get(&self, row: usize, col: usize) -> Cell {
        self.cells[row * self.cols + col]
    }

    fn set(&mut self, row: usize, col: usize, cell: Cell) {
        self.cells[row * self.cols + col] = cell;
    }

    /// Next open row in `col`; equals `rows()` when the column is full.
    pub fn column_fill(&self, col: usize) -> usize {
        self.column_fill[col]
    }

    /// Total number of pieces on the board.
    pub fn piece_count(&self) -> usize {
        self.column_fill.iter().sum()
    }

    /// Check if a column has no open row left
    pub fn is_column_full(&self, col: usize) -> bool {
        self.column_fill[col] >= self.rows
    }

    /// Drop a piece for `player` into `col`. Ignored when the column is full.
    ///
    /// Returns whether a piece was placed.
    pub fn add_piece(&mut self, col: usize, player: Player) -> bool {
        let row = self.column_fill[col];
        if row >= self.rows {
            return false;
        }
        self.set(row, col, player.to_cell());
        self.column_fill[col] += 1;
        true
    }

    /// Take the top piece back out of `col`.
    pub fn remove_piece(&mut self, col: usize) {
        debug_assert!(self.column_fill[col] > 0, "remove_piece on empty column {col}");
        if let Some(row) = self.column_fill[col].checked_sub(1) {
            self.set(row, col, Cell::Empty);
            self.column_fill[col] = row;
        }
    }

    /// Place a piece and hand back a guard that takes it out again when dropped.
    pub fn play(&mut self, col: usize, player: Player) -> PlacedPiece<'_> {
        let placed = self.add_piece(col, player);
        PlacedPiece {
            board: self,
            col,
            placed,
        }
    }

    /// True when every column is filled to the top.
    pub fn check_full(&self) -> bool {
        (0..self.cols).all(|col| self.is_column_full(col))
    }

    /// True when any line anywhere on the board holds `WIN_LENGTH` identical pieces.
    pub fn check_win(&self) -> bool {
        const DIRECTIONS: [(isize, isize); 4] = [(0, 1), (1, 0), (1, 1), (-1, 1)];

        for row in 0..self.rows {
            for col in 0..self.cols {
                let cell = self.get(row, col);
                if cell == Cell::Empty {
                    continue;
                }
                for &(dr, dc) in &DIRECTIONS {
                    if self.run_matches(row, col, dr, dc, cell) {
                        return true;
                    }
                }
            }
        }
        false
    }

    fn run_matches(&self, row: usize, col: usize, dr: isize, dc: isize, cell: Cell) -> bool {
        (1..WIN_LENGTH as isize).all(|i| {
            let r = row as isize + dr * i;
            let c = col as isize + dc * i;
            r >= 0
                && c >= 0
                && (r as usize) < self.rows
                && (c as usize) < self.cols
                && self.get(r as usize, c as usize) == cell
        })
    }

    /// Open columns, center first. Equal distance resolves to the lower index.
    pub fn legal_columns(&self) -> Vec<usize> {
        let center = self.cols / 2;
        let mut cols: Vec<usize> = (0..self.cols)
            .filter(|&col| !self.is_column_full(col))
            .collect();
        cols.sort_by_key(|&col| (col.abs_diff(center), col));
        cols
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::standard()
    }
}

/// A piece placed by [`Board::play`]; removed again when this guard drops.
pub struct PlacedPiece<'a> {
    board: &'a mut Board,
    col: usize,
    placed: bool,
}

impl Deref for PlacedPiece<'_> {
    type Target = Board;

    fn deref(&self) -> &Board {
        self.board
    }
}

impl DerefMut for PlacedPiece<'_> {
    fn deref_mut(&mut self) -> &mut Board {
        self.board
    }
}

impl Drop for PlacedPiece<'_> {
    fn drop(&mut self) {
        if self.placed {
            self.board.remove_piece(self.col);
        }
    }
}
