//! Error types for pvns-core

use thiserror::Error;

/// Error returned when an optimization sense cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown optimization sense '{0}', expected 'minimization' or 'maximization'")]
pub struct SenseParseError(pub String);
