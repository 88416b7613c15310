//! pvns Solver Engine
//!
//! This crate provides the parallel local search round engine:
//! - Batch executor over a fixed-size worker pool
//! - Neighborhood explorer contract
//! - Best-of-batch improvement selection
//! - Local search orchestrator
//! - Event listeners and statistics

pub mod error;
pub mod event;
pub mod executor;
pub mod explorer;
pub mod search;
pub mod selector;
pub mod stats;

#[cfg(test)]
mod test_utils;

pub use error::{ExecutorError, ExplorerError, LocalSearchError, Result, TaskFailure};
pub use event::{
    CountingListener, LocalSearchEventSupport, LocalSearchListener, LoggingListener, RoundReport,
};
pub use executor::{BatchExecutor, BatchTask, TaskResult};
pub use explorer::{ExplorerTask, Neighbor, NeighborhoodExplorer};
pub use search::ParallelLocalSearch;
pub use selector::{select_improvement, Improvement};
pub use stats::LocalSearchStats;

pub use pvns_config::{LocalSearchConfig, ThreadCount};
