//! Move selection: window scanning, the threat-aware static evaluator, the
//! alpha-beta search and per-move diagnostics.

pub mod heuristic;
pub mod history;
pub mod search;
pub mod window;

pub use heuristic::{EvalWeights, Heuristic, ThreatHeuristic, ThreatMap};
pub use history::{MoveRecord, SearchHistory};
pub use search::{
    AlphaBetaSearch, DepthPolicy, SearchConfig, SearchOutcome, SearchStats, DEFAULT_DEPTH,
    FALLBACK_COLUMN, WIN_SCORE,
};
pub use window::{Direction, Window};
