use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::game::{Board, Player};

use super::heuristic::{EvalWeights, Heuristic, ThreatHeuristic};

/// Base score for a won position; remaining depth is added on top so that
/// faster wins and slower losses are preferred.
pub const WIN_SCORE: f64 = 10_000_000.0;

/// Default number of plies searched below each root move.
pub const DEFAULT_DEPTH: u32 = 7;

/// Column returned when there is nothing to search.
pub const FALLBACK_COLUMN: usize = 0;

/// Search configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Plies searched below each root move.
    pub depth: u32,
    /// Pick the depth from the board width instead of `depth`.
    pub adaptive_depth: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            depth: DEFAULT_DEPTH,
            adaptive_depth: false,
        }
    }
}

impl SearchConfig {
    pub fn depth_policy(&self) -> DepthPolicy {
        if self.adaptive_depth {
            DepthPolicy::Adaptive
        } else {
            DepthPolicy::Fixed(self.depth)
        }
    }
}

/// How many plies to search for a given board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DepthPolicy {
    Fixed(u32),
    /// Narrower boards are searched deeper.
    Adaptive,
}

impl DepthPolicy {
    pub fn depth_for(self, board: &Board) -> u32 {
        match self {
            DepthPolicy::Fixed(depth) => depth,
            DepthPolicy::Adaptive => match board.columns() {
                0..=6 => 7,
                7 => 5,
                _ => 4,
            },
        }
    }
}

impl Default for DepthPolicy {
    fn default() -> Self {
        DepthPolicy::Fixed(DEFAULT_DEPTH)
    }
}

/// Counters accumulated over one root decision.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchStats {
    pub nodes_expanded: u64,
    pub branches_pruned: u64,
}

/// Result of a root decision.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchOutcome {
    pub column: usize,
    pub score: f64,
    pub depth: u32,
    pub stats: SearchStats,
}

/// Minimax search with alpha-beta pruning over a single mutable board.
pub struct AlphaBetaSearch {
    depth_policy: DepthPolicy,
    heuristic: Box<dyn Heuristic>,
}

impl AlphaBetaSearch {
    pub fn new(depth_policy: DepthPolicy) -> Self {
        AlphaBetaSearch {
            depth_policy,
            heuristic: Box::new(ThreatHeuristic::default()),
        }
    }

    pub fn with_heuristic(depth_policy: DepthPolicy, heuristic: Box<dyn Heuristic>) -> Self {
        AlphaBetaSearch {
            depth_policy,
            heuristic,
        }
    }

    pub fn from_config(config: &SearchConfig, weights: EvalWeights) -> Self {
        Self::with_heuristic(
            config.depth_policy(),
            Box::new(ThreatHeuristic::new(weights)),
        )
    }

    pub fn depth_policy(&self) -> DepthPolicy {
        self.depth_policy
    }

    /// Pick the best column for `Own`.
    ///
    /// Every legal root column is searched; ties keep the column seen first in
    /// center-out order. The board is mutated during the search and handed back
    /// unchanged.
    pub fn best_move(&self, board: &mut Board) -> SearchOutcome {
        let depth = self.depth_policy.depth_for(board);
        let mut stats = SearchStats::default();

        let legal = board.legal_columns();
        let Some(&first) = legal.first() else {
            warn!("no legal columns, falling back to column {FALLBACK_COLUMN}");
            return SearchOutcome {
                column: FALLBACK_COLUMN,
                score: 0.0,
                depth,
                stats,
            };
        };

        let mut best_column = first;
        let mut best_score = f64::NEG_INFINITY;
        let mut alpha = f64::NEG_INFINITY;
        let beta = f64::INFINITY;

        for col in legal {
            let score = {
                let mut child = board.play(col, Player::Own);
                self.alpha_beta(&mut child, depth, false, alpha, beta, &mut stats)
            };
            debug!(column = col, score, "root column scored");

            if score > best_score {
                best_score = score;
                best_column = col;
            }
            alpha = alpha.max(score);
        }

        info!(
            column = best_column,
            score = best_score,
            depth,
            pieces = board.piece_count(),
            nodes = stats.nodes_expanded,
            pruned = stats.branches_pruned,
            "search finished"
        );

        SearchOutcome {
            column: best_column,
            score: best_score,
            depth,
            stats,
        }
    }

    /// Score the position reached by the previous move.
    ///
    /// `maximizing` is true when `Own` is to move, so a win on the board at
    /// that point was made by the opponent.
    fn alpha_beta(
        &self,
        board: &mut Board,
        depth: u32,
        maximizing: bool,
        mut alpha: f64,
        mut beta: f64,
        stats: &mut SearchStats,
    ) -> f64 {
        stats.nodes_expanded += 1;

        if board.check_win() {
            let score = WIN_SCORE + depth as f64;
            return if maximizing { -score } else { score };
        }
        if board.check_full() {
            return 0.0;
        }
        if depth == 0 {
            return self.heuristic.evaluate(board);
        }

        let player = if maximizing {
            Player::Own
        } else {
            Player::Opponent
        };
        let mut best = if maximizing {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        };

        for col in board.legal_columns() {
            let score = {
                let mut child = board.play(col, player);
                self.alpha_beta(&mut child, depth - 1, !maximizing, alpha, beta, stats)
            };

            if maximizing {
                best = best.max(score);
                alpha = alpha.max(best);
            } else {
                best = best.min(score);
                beta = beta.min(best);
            }
            if alpha >= beta {
                stats.branches_pruned += 1;
                break;
            }
        }

        best
    }
}

impl Default for AlphaBetaSearch {
    fn default() -> Self {
        Self::new(DepthPolicy::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Constant(f64);

    impl Heuristic for Constant {
        fn evaluate(&self, _board: &Board) -> f64 {
            self.0
        }
    }

    fn board_with(own: &[usize], opponent: &[usize]) -> Board {
        let mut board = Board::standard();
        for &col in own {
            board.add_piece(col, Player::Own);
        }
        for &col in opponent {
            board.add_piece(col, Player::Opponent);
        }
        board
    }

    #[test]
    fn empty_board_plays_center() {
        let search = AlphaBetaSearch::new(DepthPolicy::Fixed(7));
        let mut board = Board::standard();
        let outcome = search.best_move(&mut board);
        assert_eq!(outcome.column, 3);
        assert_eq!(outcome.depth, 7);
    }

    #[test]
    fn takes_winning_move() {
        let search = AlphaBetaSearch::default();
        let mut board = board_with(&[0, 1, 2], &[]);
        let outcome = search.best_move(&mut board);
        assert_eq!(outcome.column, 3, "Should take winning move at col 3");
        assert_eq!(outcome.score, WIN_SCORE + DEFAULT_DEPTH as f64);
    }

    #[test]
    fn blocks_opponent_win() {
        // Opponent stacks three in column 0, the last column in search order.
        let search = AlphaBetaSearch::new(DepthPolicy::Fixed(4));
        let mut board = board_with(&[3, 3, 4], &[0, 0, 0]);
        let outcome = search.best_move(&mut board);
        assert_eq!(outcome.column, 0, "Should block opponent's winning move at col 0");
    }

    #[test]
    fn prefers_win_over_block() {
        let search = AlphaBetaSearch::new(DepthPolicy::Fixed(4));
        let mut board = board_with(&[6, 6, 6], &[0, 0, 0]);
        let outcome = search.best_move(&mut board);
        assert_eq!(outcome.column, 6, "Should prefer winning move over blocking");
    }

    #[test]
    fn board_is_restored_after_search() {
        let search = AlphaBetaSearch::new(DepthPolicy::Fixed(5));
        let mut board = board_with(&[3, 2, 2, 5], &[3, 4, 1, 3]);
        let before = board.clone();
        search.best_move(&mut board);
        assert_eq!(board, before);
    }

    #[test]
    fn ties_keep_first_center_out_column() {
        let search = AlphaBetaSearch::with_heuristic(DepthPolicy::Fixed(1), Box::new(Constant(0.0)));
        let mut board = Board::standard();
        assert_eq!(search.best_move(&mut board).column, 3);

        for row in 0..board.rows() {
            let (left, right) = if row % 2 == 0 {
                (Player::Opponent, Player::Own)
            } else {
                (Player::Own, Player::Opponent)
            };
            board.add_piece(2, left);
            board.add_piece(3, right);
        }
        // columns 2 and 3 are full; 4 precedes 1, 5, 0, 6
        assert_eq!(search.best_move(&mut board).column, 4);
    }

    #[test]
    fn full_board_scores_zero_regardless_of_heuristic() {
        let search = AlphaBetaSearch::with_heuristic(DepthPolicy::Fixed(3), Box::new(Constant(123.0)));
        let mut board = Board::new(3, 3);
        for col in 0..3 {
            board.add_piece(col, Player::Own);
            board.add_piece(col, Player::Opponent);
            board.add_piece(col, Player::Own);
        }
        assert!(board.check_full());

        let mut stats = SearchStats::default();
        for maximizing in [true, false] {
            let score = search.alpha_beta(
                &mut board,
                3,
                maximizing,
                f64::NEG_INFINITY,
                f64::INFINITY,
                &mut stats,
            );
            assert_eq!(score, 0.0);
        }
    }

    #[test]
    fn no_legal_column_falls_back() {
        let search = AlphaBetaSearch::new(DepthPolicy::Fixed(3));
        let mut board = Board::new(2, 2);
        for col in 0..2 {
            board.add_piece(col, Player::Opponent);
            board.add_piece(col, Player::Own);
        }
        let outcome = search.best_move(&mut board);
        assert_eq!(outcome.column, FALLBACK_COLUMN);
        assert_eq!(outcome.stats, SearchStats::default());
    }

    #[test]
    fn win_score_depends_on_who_moved() {
        let search = AlphaBetaSearch::new(DepthPolicy::Fixed(2));
        let mut board = board_with(&[0, 1, 2, 3], &[]);
        let mut stats = SearchStats::default();
        let inf = f64::INFINITY;
        assert_eq!(
            search.alpha_beta(&mut board, 2, false, -inf, inf, &mut stats),
            WIN_SCORE + 2.0
        );
        assert_eq!(
            search.alpha_beta(&mut board, 2, true, -inf, inf, &mut stats),
            -(WIN_SCORE + 2.0)
        );
    }

    #[test]
    fn stats_are_fresh_per_search() {
        let search = AlphaBetaSearch::new(DepthPolicy::Fixed(4));
        let mut board = board_with(&[3], &[3]);
        let first = search.best_move(&mut board);
        let second = search.best_move(&mut board);
        assert!(first.stats.nodes_expanded > 0);
        assert!(first.stats.branches_pruned > 0);
        assert_eq!(first.stats, second.stats);
        assert_eq!(first.column, second.column);
    }

    #[test]
    fn adaptive_depth_follows_board_width() {
        assert_eq!(DepthPolicy::Adaptive.depth_for(&Board::new(6, 5)), 7);
        assert_eq!(DepthPolicy::Adaptive.depth_for(&Board::new(6, 6)), 7);
        assert_eq!(DepthPolicy::Adaptive.depth_for(&Board::new(6, 7)), 5);
        assert_eq!(DepthPolicy::Adaptive.depth_for(&Board::new(6, 9)), 4);
        assert_eq!(DepthPolicy::Fixed(7).depth_for(&Board::new(6, 9)), 7);
    }

    #[test]
    fn config_selects_policy() {
        let mut config = SearchConfig::default();
        assert_eq!(config.depth_policy(), DepthPolicy::Fixed(DEFAULT_DEPTH));
        config.adaptive_depth = true;
        assert_eq!(config.depth_policy(), DepthPolicy::Adaptive);
    }
}
