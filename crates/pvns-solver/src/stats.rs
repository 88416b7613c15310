//! Local search statistics.
//!
//! Counters accumulate across every `local_search` call made on the same
//! orchestrator.

use std::time::Duration;

/// Aggregate metrics for a parallel local search.
///
/// # Example
///
/// ```
/// use pvns_solver::stats::LocalSearchStats;
/// use std::time::Duration;
///
/// let mut stats = LocalSearchStats::new(3);
/// stats.record_round(Some(1), 0);
/// stats.record_round(None, 1);
/// stats.record_search(Duration::from_millis(20));
///
/// assert_eq!(stats.rounds, 2);
/// assert_eq!(stats.improving_rounds, 1);
/// assert_eq!(stats.wins, vec![0, 1, 0]);
/// assert_eq!(stats.explorer_failures, 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocalSearchStats {
    /// Completed `local_search` calls.
    pub searches: u64,
    /// Rounds executed across all searches.
    pub rounds: u64,
    /// Rounds that replaced the current best.
    pub improving_rounds: u64,
    /// Explorer runs that failed and were treated as no improvement.
    pub explorer_failures: u64,
    /// Improving rounds won by each explorer, by explorer index.
    pub wins: Vec<u64>,
    /// Total wall time spent in searches.
    pub total_duration: Duration,
}

impl LocalSearchStats {
    /// Creates empty statistics for `explorer_count` explorers.
    pub fn new(explorer_count: usize) -> Self {
        Self {
            wins: vec![0; explorer_count],
            ..Self::default()
        }
    }

    /// Records a finished round, its winner if any, and how many explorers failed.
    pub fn record_round(&mut self, winner: Option<usize>, failures: usize) {
        self.rounds += 1;
        self.explorer_failures += failures as u64;
        if let Some(index) = winner {
            self.improving_rounds += 1;
            if index >= self.wins.len() {
                self.wins.resize(index + 1, 0);
            }
            self.wins[index] += 1;
        }
    }

    /// Records a finished search.
    pub fn record_search(&mut self, duration: Duration) {
        self.searches += 1;
        self.total_duration += duration;
    }

    /// Fraction of rounds that improved the best solution.
    pub fn improvement_rate(&self) -> f64 {
        if self.rounds == 0 {
            0.0
        } else {
            self.improving_rounds as f64 / self.rounds as f64
        }
    }

    /// Average rounds per search.
    pub fn rounds_per_search(&self) -> f64 {
        if self.searches == 0 {
            0.0
        } else {
            self.rounds as f64 / self.searches as f64
        }
    }
}
