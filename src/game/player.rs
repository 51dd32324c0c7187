use super::board::Cell;

/// The two sides of a search: the engine itself and its opponent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Player {
    Own,
    Opponent,
}

impl Player {
    /// Get the other player
    pub fn other(self) -> Player {
        match self {
            Player::Own => Player::Opponent,
            Player::Opponent => Player::Own,
        }
    }

    /// Convert player to cell type
    pub fn to_cell(self) -> Cell {
        match self {
            Player::Own => Cell::Own,
            Player::Opponent => Cell::Opponent,
        }
    }

    /// Owner of a cell, if any
    pub fn from_cell(cell: Cell) -> Option<Player> {
        match cell {
            Cell::Own => Some(Player::Own),
            Cell::Opponent => Some(Player::Opponent),
            Cell::Empty => None,
        }
    }
}
