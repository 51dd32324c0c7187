use std::collections::VecDeque;
use std::time::Duration;

use super::search::SearchOutcome;

/// Diagnostics for a single root decision.
#[derive(Debug, Clone, PartialEq)]
pub struct MoveRecord {
    pub column: usize,
    pub nodes_expanded: u64,
    pub branches_pruned: u64,
    pub elapsed: Duration,
}

impl MoveRecord {
    pub fn from_outcome(outcome: &SearchOutcome, elapsed: Duration) -> Self {
        MoveRecord {
            column: outcome.column,
            nodes_expanded: outcome.stats.nodes_expanded,
            branches_pruned: outcome.stats.branches_pruned,
            elapsed,
        }
    }
}

/// Per-move search diagnostics with rolling window computations.
///
/// Owned by whoever drives a sequence of decisions; searches never see it.
pub struct SearchHistory {
    records: VecDeque<MoveRecord>,
    capacity: usize,
    total_moves: usize, // lifetime count, never capped
}

impl SearchHistory {
    pub fn with_capacity(capacity: usize) -> Self {
        SearchHistory {
            records: VecDeque::with_capacity(capacity),
            capacity,
            total_moves: 0,
        }
    }

    pub fn new() -> Self {
        Self::with_capacity(100)
    }

    pub fn record(&mut self, record: MoveRecord) {
        self.total_moves += 1;
        self.records.push_back(record);
        if self.records.len() > self.capacity {
            self.records.pop_front();
        }
    }

    pub fn last(&self) -> Option<&MoveRecord> {
        self.records.back()
    }

    /// Average nodes expanded over the last N moves.
    pub fn average_nodes(&self, last_n: usize) -> f64 {
        self.average(last_n, |r| r.nodes_expanded as f64)
    }

    /// Average pruned branches over the last N moves.
    pub fn average_pruned(&self, last_n: usize) -> f64 {
        self.average(last_n, |r| r.branches_pruned as f64)
    }

    /// Average decision time over the last N moves.
    pub fn average_elapsed(&self, last_n: usize) -> Duration {
        let n = self.records.len().min(last_n);
        if n == 0 {
            return Duration::ZERO;
        }
        let total: Duration = self.records.iter().rev().take(n).map(|r| r.elapsed).sum();
        total / n as u32
    }

    fn average(&self, last_n: usize, value: impl Fn(&MoveRecord) -> f64) -> f64 {
        let n = self.records.len().min(last_n);
        if n == 0 {
            return 0.0;
        }
        let total: f64 = self.records.iter().rev().take(n).map(value).sum();
        total / n as f64
    }

    /// Nodes expanded across every retained record.
    pub fn total_nodes(&self) -> u64 {
        self.records.iter().map(|r| r.nodes_expanded).sum()
    }

    pub fn total_moves(&self) -> usize {
        self.total_moves
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl Default for SearchHistory {
    fn default() -> Self {
        Self::new()
    }
}
