//! Core board logic: the mutable grid with constant-time move/undo, the cell
//! and player alphabets, and the scoped move guard used by search.

mod board;
mod player;

pub use board::{Board, Cell, PlacedPiece, DEFAULT_COLS, DEFAULT_ROWS, WIN_LENGTH};
pub use player::Player;
