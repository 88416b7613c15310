//! Configuration system for pvns.
//!
//! Load local search configuration from TOML or YAML files to control pool
//! sizing, the optimization sense, and round limits without code changes.
//!
//! # Examples
//!
//! Load configuration from a TOML string:
//!
//! ```
//! use pvns_config::{LocalSearchConfig, ThreadCount};
//!
//! let config = LocalSearchConfig::from_toml_str(r#"
//!     thread_count = { count = 4 }
//!     thread_name_prefix = "vns"
//!     optimization_sense = "minimization"
//!     round_limit = 500
//! "#).unwrap();
//!
//! assert_eq!(config.thread_count, ThreadCount::Count(4));
//! assert_eq!(config.round_limit, Some(500));
//! ```
//!
//! Use the defaults when the file is missing:
//!
//! ```
//! use pvns_config::LocalSearchConfig;
//!
//! let config = LocalSearchConfig::load("pvns.toml").unwrap_or_default();
//! assert_eq!(config.thread_name_prefix, "pvns");
//! ```

use std::fmt;
use std::path::Path;

use pvns_core::OptimizationSense;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default prefix for worker thread names.
pub const DEFAULT_THREAD_NAME_PREFIX: &str = "pvns";

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Parallel local search configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct LocalSearchConfig {
    /// Worker pool sizing.
    #[serde(default)]
    pub thread_count: ThreadCount,

    /// Prefix for worker thread names (`<prefix>-<index>`).
    #[serde(default = "default_thread_name_prefix")]
    pub thread_name_prefix: String,

    /// Direction in which objective values improve.
    #[serde(default)]
    pub optimization_sense: OptimizationSense,

    /// Maximum number of rounds per local search call.
    #[serde(default)]
    pub round_limit: Option<u64>,
}

fn default_thread_name_prefix() -> String {
    DEFAULT_THREAD_NAME_PREFIX.to_string()
}

impl Default for LocalSearchConfig {
    fn default() -> Self {
        Self {
            thread_count: ThreadCount::default(),
            thread_name_prefix: default_thread_name_prefix(),
            optimization_sense: OptimizationSense::default(),
            round_limit: None,
        }
    }
}

impl LocalSearchConfig {
    /// Creates a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns error if the file doesn't exist, contains invalid TOML, or
    /// fails validation.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_toml_file(path)
    }

    /// Loads configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    /// Parses configuration from a YAML string.
    pub fn from_yaml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks values that deserialize fine but cannot be used.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.thread_count == ThreadCount::Count(0) {
            return Err(ConfigError::Invalid(
                "thread_count must be at least 1".to_string(),
            ));
        }
        if self.thread_name_prefix.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "thread_name_prefix must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Sets the worker pool sizing.
    pub fn with_thread_count(mut self, thread_count: ThreadCount) -> Self {
        self.thread_count = thread_count;
        self
    }

    /// Sets the worker thread name prefix.
    pub fn with_thread_name_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.thread_name_prefix = prefix.into();
        self
    }

    /// Sets the optimization sense.
    pub fn with_optimization_sense(mut self, sense: OptimizationSense) -> Self {
        self.optimization_sense = sense;
        self
    }

    /// Caps the number of rounds per local search call.
    pub fn with_round_limit(mut self, rounds: u64) -> Self {
        self.round_limit = Some(rounds);
        self
    }
}

/// Worker pool sizing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ThreadCount {
    /// One worker per explorer, capped at the available CPU cores.
    #[default]
    Auto,

    /// Use all available CPU cores, still capped at the explorer count.
    Unlimited,

    /// Specific number of threads, capped at the explorer count.
    Count(usize),
}

impl ThreadCount {
    /// Resolves the thread count to an actual number.
    ///
    /// # Arguments
    ///
    /// * `task_count` - Number of tasks submitted per batch
    ///
    /// # Returns
    ///
    /// The number of worker threads to use, never less than 1.
    pub fn resolve(&self, task_count: usize) -> usize {
        let resolved = match self {
            ThreadCount::Auto => std::cmp::min(available_cpus(), task_count),
            ThreadCount::Unlimited => std::cmp::min(available_cpus(), task_count),
            ThreadCount::Count(n) => std::cmp::min(*n, task_count),
        };
        resolved.max(1)
    }
}

fn available_cpus() -> usize {
    std::thread::available_parallelism()
        .map(|p| p.get())
        .unwrap_or(1)
}

impl fmt::Display for ThreadCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ThreadCount::Auto => write!(f, "Auto"),
            ThreadCount::Unlimited => write!(f, "Unlimited"),
            ThreadCount::Count(n) => write!(f, "{}", n),
        }
    }
}
