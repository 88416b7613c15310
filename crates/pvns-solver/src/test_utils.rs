//! Test utilities for pvns-solver
//!
//! Explorer stubs over the `pvns-test` routing fixtures.

use std::thread;
use std::time::Duration;

use pvns_test::{TestRoute, TestSolution};

use crate::error::ExplorerError;
use crate::explorer::{Neighbor, NeighborhoodExplorer};

// ============================================================================
// ScriptedExplorer - replays a fixed cost per round
// ============================================================================

/// Replays one scripted outcome per run.
///
/// `Some(cost)` yields the start solution re-costed to `cost`; `None`, or
/// running past the end of the script, yields no improvement.
#[derive(Debug, Clone)]
pub struct ScriptedExplorer {
    name: String,
    script: Vec<Option<f64>>,
    cursor: usize,
    delay: Duration,
    start: Option<TestSolution>,
}

impl ScriptedExplorer {
    pub fn new(name: &str, script: Vec<Option<f64>>) -> Self {
        Self {
            name: name.to_string(),
            script,
            cursor: 0,
            delay: Duration::ZERO,
            start: None,
        }
    }

    /// Sleeps for `delay` before every result.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Number of completed runs.
    pub fn runs(&self) -> usize {
        self.cursor
    }

    /// The most recent start solution.
    pub fn start(&self) -> Option<&TestSolution> {
        self.start.as_ref()
    }
}

impl NeighborhoodExplorer<TestSolution> for ScriptedExplorer {
    fn set_start_solution(&mut self, solution: &TestSolution) {
        self.start = Some(solution.clone());
    }

    fn explore(&mut self) -> Result<Neighbor<TestSolution>, ExplorerError> {
        let start = self
            .start
            .as_ref()
            .ok_or_else(|| ExplorerError::new(&self.name, "no start solution"))?;

        if !self.delay.is_zero() {
            thread::sleep(self.delay);
        }

        let step = self.script.get(self.cursor).copied().flatten();
        self.cursor += 1;

        Ok(match step {
            Some(cost) => Neighbor::Candidate(start.with_new_cost(cost)),
            None => Neighbor::NoImprovement,
        })
    }

    fn describe(&self) -> &str {
        &self.name
    }
}

// ============================================================================
// DescentExplorer - lowers the cost by a fixed step down to a floor
// ============================================================================

/// Improves the start cost by `step` until `floor` would be crossed.
#[derive(Debug, Clone)]
pub struct DescentExplorer {
    name: String,
    step: f64,
    floor: f64,
    add_empty_route: bool,
    start: Option<TestSolution>,
}

impl DescentExplorer {
    pub fn new(name: &str, step: f64, floor: f64) -> Self {
        Self {
            name: name.to_string(),
            step,
            floor,
            add_empty_route: false,
            start: None,
        }
    }

    /// Leaves a depot-only route in every candidate.
    pub fn leaving_empty_routes(mut self) -> Self {
        self.add_empty_route = true;
        self
    }
}

impl NeighborhoodExplorer<TestSolution> for DescentExplorer {
    fn set_start_solution(&mut self, solution: &TestSolution) {
        self.start = Some(solution.clone());
    }

    fn explore(&mut self) -> Result<Neighbor<TestSolution>, ExplorerError> {
        let start = self
            .start
            .as_ref()
            .ok_or_else(|| ExplorerError::new(&self.name, "no start solution"))?;

        let cost = start.cost - self.step;
        if cost < self.floor {
            return Ok(Neighbor::NoImprovement);
        }

        let mut candidate = start.with_new_cost(cost);
        if self.add_empty_route {
            candidate.routes.push(TestRoute::empty());
        }
        Ok(Neighbor::Candidate(candidate))
    }

    fn describe(&self) -> &str {
        &self.name
    }
}

// ============================================================================
// FailingExplorer - always fails
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureMode {
    Error,
    Panic,
}

/// Fails on every run, either by returning an error or by panicking.
#[derive(Debug, Clone)]
pub struct FailingExplorer {
    name: String,
    mode: FailureMode,
}

impl FailingExplorer {
    pub fn new(name: &str, mode: FailureMode) -> Self {
        Self {
            name: name.to_string(),
            mode,
        }
    }
}

impl NeighborhoodExplorer<TestSolution> for FailingExplorer {
    fn set_start_solution(&mut self, _solution: &TestSolution) {}

    fn explore(&mut self) -> Result<Neighbor<TestSolution>, ExplorerError> {
        match self.mode {
            FailureMode::Error => Err(ExplorerError::new(&self.name, "scripted failure")),
            FailureMode::Panic => panic!("{} exploded", self.name),
        }
    }

    fn describe(&self) -> &str {
        &self.name
    }
}
