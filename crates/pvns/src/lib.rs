//! pvns - Parallel Variable Neighborhood Search
//!
//! Runs a fixed pool of neighborhood explorers concurrently against the same
//! routing solution, adopts the best improving candidate of every round and
//! stops when no neighborhood improves any more.
//!
//! # Example
//!
//! ```rust
//! use pvns::prelude::*;
//!
//! let config = LocalSearchConfig::default()
//!     .with_thread_count(ThreadCount::Count(4))
//!     .with_round_limit(1_000);
//!
//! assert_eq!(config.optimization_sense, OptimizationSense::Minimization);
//! assert_eq!(config.thread_count.resolve(2), 2);
//! ```

// Domain contracts
pub use pvns_core::{
    prune_degenerate, reconcile_into, Objective, OptimizationSense, Route, RoutingSolution,
    SenseParseError,
};

// Configuration
pub use pvns_config::{ConfigError, LocalSearchConfig, ThreadCount};

// Engine
pub use pvns_solver::{
    BatchExecutor, BatchTask, CountingListener, ExecutorError, ExplorerError, LocalSearchError,
    LocalSearchEventSupport, LocalSearchListener, LocalSearchStats, LoggingListener, Neighbor,
    NeighborhoodExplorer, ParallelLocalSearch, RoundReport, TaskFailure, TaskResult,
};

#[cfg(feature = "console")]
pub mod console;

pub mod prelude {
    pub use super::{LocalSearchConfig, OptimizationSense, ThreadCount};
    pub use super::{LocalSearchError, ParallelLocalSearch};
    pub use super::{ExplorerError, Neighbor, NeighborhoodExplorer};
    pub use super::{LocalSearchListener, RoundReport};
    pub use super::{Route, RoutingSolution};
}
