//! Error types for pvns-solver

use pvns_config::ConfigError;
use thiserror::Error;

/// Batch executor lifecycle error.
///
/// These are always fatal to the caller: they mean the pool was misused,
/// not that a task went wrong.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExecutorError {
    /// A batch was submitted after the pool was shut down.
    #[error("Batch executor has been shut down")]
    Shutdown,

    /// Shutdown or a second batch was requested while a batch is running.
    #[error("A batch is already in flight")]
    BatchInFlight,

    /// The worker pool could not be created.
    #[error("Failed to build worker pool: {0}")]
    PoolBuild(String),
}

/// Why a single task in a batch did not complete normally.
///
/// Task failures are isolated by the executor: they are logged and the
/// task's output is replaced by its failure output.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TaskFailure {
    /// The task returned an error.
    #[error("task returned an error: {0}")]
    Error(String),

    /// The task panicked.
    #[error("task panicked: {0}")]
    Panicked(String),
}

/// Internal failure reported by a neighborhood explorer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{neighborhood}: {message}")]
pub struct ExplorerError {
    /// Neighborhood that failed.
    pub neighborhood: String,
    /// Description of the failure.
    pub message: String,
}

impl ExplorerError {
    /// Creates a new explorer error.
    pub fn new(neighborhood: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            neighborhood: neighborhood.into(),
            message: message.into(),
        }
    }
}

/// Main error type for local search operations
#[derive(Debug, Error)]
pub enum LocalSearchError {
    /// The worker pool failed or was misused.
    #[error("Executor error: {0}")]
    Executor(#[from] ExecutorError),

    /// Invalid configuration at construction time.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The search was built without any explorer.
    #[error("At least one neighborhood explorer is required")]
    NoExplorers,

    /// The executor returned a different number of results than tasks.
    #[error("Expected {expected} results from the batch, got {actual}")]
    ResultCountMismatch { expected: usize, actual: usize },

    /// A candidate's objective cannot be ordered against the current best.
    #[error("Neighborhood '{neighborhood}' produced a candidate with an unordered objective value")]
    UnorderedCandidate { neighborhood: String },
}

/// Result type alias for local search operations
pub type Result<T> = std::result::Result<T, LocalSearchError>;
