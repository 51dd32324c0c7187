use serde::{Deserialize, Serialize};

use crate::game::{Board, Cell, Player, WIN_LENGTH};

use super::window::{windows, windows_along, Direction, Window};

/// Trait for evaluating a board position from the engine's (`Own`) perspective.
pub trait Heuristic: Send {
    fn evaluate(&self, board: &Board) -> f64;
}

/// Scoring weights for [`ThreatHeuristic`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EvalWeights {
    /// Per own piece in the middle column.
    pub center: f64,
    /// Own three-with-one-gap, scaled by reachability.
    pub threat_own: f64,
    /// Opponent three-with-one-gap, scaled by reachability.
    pub threat_opponent: f64,
    /// Own pair with two gaps, pieces adjacent.
    pub setup_strong: f64,
    /// Own pair with two gaps, pieces split.
    pub setup_weak: f64,
    /// Opponent pair with two gaps.
    pub setup_opponent: f64,
    /// Parity credit for the player favored to be handed the gap cell.
    pub zugzwang: f64,
    /// Contribution of an opponent threat that can be completed next move.
    pub must_block: f64,
}

impl Default for EvalWeights {
    fn default() -> Self {
        EvalWeights {
            center: 10.0,
            threat_own: 500.0,
            threat_opponent: 1000.0,
            setup_strong: 30.0,
            setup_weak: 15.0,
            setup_opponent: 8.0,
            zugzwang: 100.0,
            must_block: -999_999.0,
        }
    }
}

/// Per column, the row of the empty cell of the lowest unresolved vertical
/// three. A line whose gap sits above that row cannot be played until the
/// vertical threat is dealt with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThreatMap {
    lowest: Vec<Option<usize>>,
}

impl ThreatMap {
    pub fn build(board: &Board) -> Self {
        let mut lowest = vec![None; board.columns()];
        // Vertical windows come out lowest row first, so the first hit per column wins.
        for window in windows_along(board, Direction::Vertical) {
            let slot = &mut lowest[window.origin_col];
            if slot.is_some() {
                continue;
            }
            if let Some(offset) = threat_gap(&window) {
                *slot = Some(window.origin_row + offset);
            }
        }
        ThreatMap { lowest }
    }

    /// Row of the recorded vertical threat in `col`.
    pub fn lowest(&self, col: usize) -> Option<usize> {
        self.lowest[col]
    }

    /// True when a vertical threat in `col` sits strictly below `row`.
    pub fn undercuts(&self, row: usize, col: usize) -> bool {
        self.lowest(col).is_some_and(|threat_row| row > threat_row)
    }
}

/// Index of the gap when the window holds three of one player and one empty cell.
fn threat_gap(window: &Window) -> Option<usize> {
    let three = WIN_LENGTH - 1;
    if window.count(Cell::Empty) != 1 {
        return None;
    }
    if window.count(Cell::Own) != three && window.count(Cell::Opponent) != three {
        return None;
    }
    window.first_empty()
}

/// Window-scanning evaluator with threat reachability, undercut detection
/// and move-parity credit.
#[derive(Debug, Clone, Default)]
pub struct ThreatHeuristic {
    weights: EvalWeights,
}

impl ThreatHeuristic {
    pub fn new(weights: EvalWeights) -> Self {
        ThreatHeuristic { weights }
    }

    fn center_bonus(&self, board: &Board) -> f64 {
        let center = board.columns() / 2;
        let own = (0..board.rows())
            .filter(|&row| board.get(row, center) == Cell::Own)
            .count();
        own as f64 * self.weights.center
    }

    fn score_window(&self, window: &Window, board: &Board, threats: &ThreatMap) -> f64 {
        let own = window.count(Cell::Own);
        let opp = window.count(Cell::Opponent);
        let empty = window.count(Cell::Empty);

        if own > 0 && opp > 0 {
            return 0.0;
        }

        if empty == 1 && (own == WIN_LENGTH - 1 || opp == WIN_LENGTH - 1) {
            let Some(owner) = window.cells.iter().find_map(|&cell| Player::from_cell(cell)) else {
                return 0.0;
            };
            return self.score_threat(window, owner, board, threats);
        }

        if empty == 2 && own == WIN_LENGTH - 2 {
            return if window.has_run(Cell::Own, WIN_LENGTH - 2) {
                self.weights.setup_strong
            } else {
                self.weights.setup_weak
            };
        }
        if empty == 2 && opp == WIN_LENGTH - 2 {
            return -self.weights.setup_opponent;
        }

        0.0
    }

    fn score_threat(
        &self,
        window: &Window,
        owner: Player,
        board: &Board,
        threats: &ThreatMap,
    ) -> f64 {
        let Some(gap) = window.first_empty() else {
            return 0.0;
        };
        let (row, col) = window.cell_position(gap);
        let fill = board.column_fill(col);

        if !window.is_vertical() && fill != row && threats.undercuts(row, col) {
            return 0.0;
        }

        let weight = if fill == row {
            if owner == Player::Opponent {
                return self.weights.must_block;
            }
            1.0
        } else if fill < row {
            1.0 / ((row - fill) as f64 + 1.0)
        } else {
            0.0
        };

        let mut score = match owner {
            Player::Own => self.weights.threat_own * weight,
            Player::Opponent => -self.weights.threat_opponent * weight,
        };

        if owner == parity_favored(row, board) {
            let bonus = self.weights.zugzwang * weight;
            score += if owner == Player::Own { bonus } else { -bonus };
        }

        score
    }
}

/// Player that move parity tends to hand the cells of `row` to.
///
/// Rows count from 1 at the bottom; with an odd number of cells on the board
/// the opponent is favored on odd rows, otherwise the engine is.
fn parity_favored(row: usize, board: &Board) -> Player {
    let odd_row = row % 2 == 0;
    let odd_cells = (board.rows() * board.columns()) % 2 != 0;
    match (odd_cells, odd_row) {
        (true, true) | (false, false) => Player::Opponent,
        (true, false) | (false, true) => Player::Own,
    }
}

impl Heuristic for ThreatHeuristic {
    fn evaluate(&self, board: &Board) -> f64 {
        let threats = ThreatMap::build(board);
        let mut score = self.center_bonus(board);
        for window in windows(board) {
            score += self.score_window(&window, board, &threats);
        }
        score
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Cell::{Empty as E, Opponent as O, Own as X};

    fn horizontal(row: usize, col: usize, cells: [Cell; WIN_LENGTH]) -> Window {
        Window {
            origin_row: row,
            origin_col: col,
            direction: Direction::Horizontal,
            cells,
        }
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn heuristic_empty_board_is_zero() {
        let h = ThreatHeuristic::default();
        assert_close(h.evaluate(&Board::standard()), 0.0);
    }

    #[test]
    fn heuristic_center_preference() {
        let h = ThreatHeuristic::default();
        let mut center = Board::standard();
        center.add_piece(3, Player::Own);
        let mut edge = Board::standard();
        edge.add_piece(0, Player::Own);

        assert_close(h.evaluate(&center), 10.0);
        assert_close(h.evaluate(&edge), 0.0);
    }

    #[test]
    fn heuristic_own_playable_threat() {
        let h = ThreatHeuristic::default();
        let mut board = Board::standard();
        for col in 0..3 {
            board.add_piece(col, Player::Own);
        }
        // threat 500 + parity 100 (row 1, even cell count) + adjacent pair 30
        assert_close(h.evaluate(&board), 630.0);
    }

    #[test]
    fn heuristic_opponent_playable_threat_hits_sentinel() {
        let h = ThreatHeuristic::default();
        let mut board = Board::standard();
        for col in 0..3 {
            board.add_piece(col, Player::Opponent);
        }
        assert!(h.evaluate(&board) < -900_000.0);

        let mut vertical = Board::standard();
        for _ in 0..3 {
            vertical.add_piece(6, Player::Opponent);
        }
        assert!(h.evaluate(&vertical) < -900_000.0);
    }

    #[test]
    fn threat_map_records_lowest_vertical_gap() {
        let mut board = Board::standard();
        for _ in 0..3 {
            board.add_piece(4, Player::Own);
        }
        board.add_piece(1, Player::Own);
        for _ in 0..3 {
            board.add_piece(1, Player::Opponent);
        }
        board.add_piece(6, Player::Own);
        board.add_piece(6, Player::Own);

        let threats = ThreatMap::build(&board);
        assert_eq!(threats.lowest(4), Some(3));
        assert_eq!(threats.lowest(1), Some(4));
        assert_eq!(threats.lowest(6), None);
        assert!(threats.undercuts(4, 4));
        assert!(!threats.undercuts(3, 4));
        assert!(!threats.undercuts(5, 6));
    }

    #[test]
    fn undercut_line_scores_zero() {
        let h = ThreatHeuristic::default();
        let mut board = Board::standard();
        for _ in 0..3 {
            board.add_piece(4, Player::Own);
        }
        let window = horizontal(4, 1, [O, O, O, E]);

        let threats = ThreatMap::build(&board);
        assert_close(h.score_window(&window, &board, &threats), 0.0);

        // Same line without the vertical threat below: gap of one row, weight 1/2.
        let clear = ThreatMap::build(&Board::standard());
        assert_close(h.score_window(&window, &board, &clear), -500.0);
    }

    #[test]
    fn vertical_windows_ignore_undercut() {
        let h = ThreatHeuristic::default();
        let mut board = Board::standard();
        for _ in 0..3 {
            board.add_piece(2, Player::Own);
        }
        let threats = ThreatMap::build(&board);
        let window = Window {
            origin_row: 0,
            origin_col: 2,
            direction: Direction::Vertical,
            cells: [X, X, X, E],
        };
        // playable own threat on row 4 (even): opponent favored, no parity credit
        assert_close(h.score_window(&window, &board, &threats), 500.0);
    }

    #[test]
    fn parity_flips_on_odd_sized_board() {
        let h = ThreatHeuristic::default();
        let board = Board::new(5, 7);
        let threats = ThreatMap::build(&board);
        let window = horizontal(1, 0, [X, X, X, E]);
        // weight 1/2; row 2 is even so the engine is favored on an odd board
        assert_close(h.score_window(&window, &board, &threats), 300.0);

        let standard = Board::standard();
        assert_close(h.score_window(&window, &standard, &threats), 250.0);
    }

    #[test]
    fn opponent_threat_on_opponent_parity_row_subtracts_bonus() {
        let h = ThreatHeuristic::default();
        let board = Board::standard();
        let threats = ThreatMap::build(&board);

        // gap at row 1, weight 1/2; even board favors the opponent there
        let window = horizontal(1, 0, [O, O, O, E]);
        assert_close(h.score_window(&window, &board, &threats), -550.0);

        // row 2 favors the engine on a standard board: no bonus either way
        let window = horizontal(2, 0, [O, O, O, E]);
        assert_close(h.score_window(&window, &board, &threats), -1000.0 / 3.0);
    }

    #[test]
    fn opponent_parity_row_flips_on_odd_sized_board() {
        let h = ThreatHeuristic::default();
        let board = Board::new(5, 7);
        let threats = ThreatMap::build(&board);

        // gap at row 2, weight 1/3; odd board favors the opponent there
        let window = horizontal(2, 0, [O, O, O, E]);
        assert_close(h.score_window(&window, &board, &threats), -1100.0 / 3.0);

        // row 1 now belongs to the engine
        let window = horizontal(1, 0, [O, O, O, E]);
        assert_close(h.score_window(&window, &board, &threats), -500.0);
    }

    #[test]
    fn setup_windows() {
        let h = ThreatHeuristic::default();
        let board = Board::standard();
        let threats = ThreatMap::build(&board);

        assert_close(h.score_window(&horizontal(0, 0, [X, X, E, E]), &board, &threats), 30.0);
        assert_close(h.score_window(&horizontal(0, 0, [X, E, X, E]), &board, &threats), 15.0);
        assert_close(h.score_window(&horizontal(0, 0, [O, E, E, O]), &board, &threats), -8.0);
        assert_close(h.score_window(&horizontal(0, 0, [O, O, E, E]), &board, &threats), -8.0);
    }

    #[test]
    fn mixed_and_sparse_windows_are_dead() {
        let h = ThreatHeuristic::default();
        let board = Board::standard();
        let threats = ThreatMap::build(&board);

        assert_close(h.score_window(&horizontal(0, 0, [X, X, X, O]), &board, &threats), 0.0);
        assert_close(h.score_window(&horizontal(0, 0, [X, E, E, E]), &board, &threats), 0.0);
        assert_close(h.score_window(&horizontal(0, 0, [E, E, E, E]), &board, &threats), 0.0);
    }

    #[test]
    fn custom_weights_apply() {
        let h = ThreatHeuristic::new(EvalWeights {
            center: 1.0,
            ..EvalWeights::default()
        });
        let mut board = Board::standard();
        board.add_piece(3, Player::Own);
        board.add_piece(3, Player::Own);
        // two center pieces plus one adjacent vertical pair
        assert_close(h.evaluate(&board), 2.0 + 30.0);
    }
}
