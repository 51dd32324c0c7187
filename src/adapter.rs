//! Translation between the external "position in, column out" contract and
//! the core board.
//!
//! Callers send rows top-down with small integer symbols (`0` empty, `1` the
//! engine, `2` the opponent by default). The core wants rows bottom-up with
//! [`Cell`] values, so rows are reversed and symbols mapped on the way in.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::ai::{AlphaBetaSearch, SearchOutcome, FALLBACK_COLUMN};
use crate::config::AppConfig;
use crate::error::{BoardError, RequestError};
use crate::game::{Board, Cell};

/// Symbol encoding used by callers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AdapterConfig {
    /// Symbol marking the engine's pieces.
    pub own_symbol: u8,
    /// Symbol marking the opponent's pieces.
    pub opponent_symbol: u8,
}

impl Default for AdapterConfig {
    fn default() -> Self {
        AdapterConfig {
            own_symbol: 1,
            opponent_symbol: 2,
        }
    }
}

/// Incoming position, rows listed top-down.
///
/// Cells are read as any JSON integer so that symbols outside the configured
/// pair (negative ones included) become empty cells instead of parse errors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRequest {
    #[serde(default)]
    pub board: Option<Vec<Vec<i64>>>,
}

impl MoveRequest {
    pub fn new(board: Vec<Vec<i64>>) -> Self {
        MoveRequest { board: Some(board) }
    }

    pub fn from_json(json: &str) -> Result<Self, RequestError> {
        Ok(serde_json::from_str(json)?)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveResponse {
    pub column: usize,
}

/// The answer plus the search that produced it, if one ran.
#[derive(Debug, Clone, PartialEq)]
pub struct MoveDecision {
    pub response: MoveResponse,
    pub outcome: Option<SearchOutcome>,
}

impl MoveDecision {
    fn fallback() -> Self {
        MoveDecision {
            response: MoveResponse {
                column: FALLBACK_COLUMN,
            },
            outcome: None,
        }
    }
}

/// Maps a caller's top-down symbol grid onto a bottom-up [`Board`].
#[derive(Debug, Clone)]
pub struct GridTranslator {
    own_symbol: i64,
    opponent_symbol: i64,
}

impl GridTranslator {
    pub fn new(config: &AdapterConfig) -> Self {
        GridTranslator {
            own_symbol: i64::from(config.own_symbol),
            opponent_symbol: i64::from(config.opponent_symbol),
        }
    }

    /// Unknown symbols read as empty.
    pub fn cell(&self, symbol: i64) -> Cell {
        if symbol == self.own_symbol {
            Cell::Own
        } else if symbol == self.opponent_symbol {
            Cell::Opponent
        } else {
            Cell::Empty
        }
    }

    /// Build a board from rows listed top-down. Row order is flipped; column
    /// indices are untouched.
    pub fn to_board(&self, grid: &[Vec<i64>]) -> Result<Board, BoardError> {
        let rows = grid
            .iter()
            .rev()
            .map(|row| row.iter().map(|&symbol| self.cell(symbol)).collect())
            .collect();
        Board::from_rows(rows).inspect_err(|err| {
            if let &BoardError::FloatingPiece { row, col } = err {
                debug!(
                    column = col,
                    grid_row = grid.len() - 1 - row,
                    "piece has an empty cell beneath it"
                );
            }
        })
    }
}

impl Default for GridTranslator {
    fn default() -> Self {
        Self::new(&AdapterConfig::default())
    }
}

/// Answers move requests: translate, search, fall back to column 0 when
/// there is nothing usable to search.
pub struct MoveService {
    translator: GridTranslator,
    search: AlphaBetaSearch,
}

impl MoveService {
    pub fn new(translator: GridTranslator, search: AlphaBetaSearch) -> Self {
        MoveService { translator, search }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            GridTranslator::new(&config.adapter),
            AlphaBetaSearch::from_config(&config.search, config.eval.clone()),
        )
    }

    /// Like [`MoveService::decide`], but a malformed board is returned as an error.
    pub fn try_decide(&self, request: &MoveRequest) -> Result<MoveDecision, RequestError> {
        let grid = match request.board.as_deref() {
            Some(grid) if !grid.is_empty() => grid,
            _ => {
                warn!("received a missing or empty board, defaulting to column {FALLBACK_COLUMN}");
                return Ok(MoveDecision::fallback());
            }
        };

        let mut board = self.translator.to_board(grid)?;
        let outcome = self.search.best_move(&mut board);
        Ok(MoveDecision {
            response: MoveResponse {
                column: outcome.column,
            },
            outcome: Some(outcome),
        })
    }

    /// Always produces a column; anything unusable yields the fallback.
    pub fn decide(&self, request: &MoveRequest) -> MoveDecision {
        self.try_decide(request).unwrap_or_else(|err| {
            warn!(error = %err, "unusable board, defaulting to column {FALLBACK_COLUMN}");
            MoveDecision::fallback()
        })
    }
}
