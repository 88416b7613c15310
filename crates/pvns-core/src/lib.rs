//! pvns Core - Domain contracts for parallel local search
//!
//! This crate provides the abstractions the search engine consumes from a
//! routing domain model:
//! - Objective values and the optimization sense that orders them
//! - Route and solution traits
//! - Reconciliation helpers that drop depot-only routes

pub mod domain;
pub mod error;
pub mod objective;

pub use domain::{prune_degenerate, reconcile_into, Route, RoutingSolution};
pub use error::SenseParseError;
pub use objective::{Objective, OptimizationSense};
