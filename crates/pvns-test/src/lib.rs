//! Shared test fixtures for pvns crates.
//!
//! This crate provides data types and pure functions for testing.
//! It only depends on `pvns-core` so that `pvns-solver` can use it as a
//! dev-dependency without a cycle.
//!
//! - [`cvrp`] - A small capacitated routing model with an explicit cost
//!
//! # Usage
//!
//! Add as a dev-dependency in your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! pvns-test = { workspace = true }
//! ```
//!
//! Then import the fixtures you need:
//!
//! ```ignore
//! use pvns_test::cvrp::{TestRoute, TestSolution};
//! ```

pub mod cvrp;

pub use cvrp::{TestRoute, TestSolution};
