//! Neighborhood explorer contract.
//!
//! An explorer searches one neighborhood structure around a starting
//! solution and reports the best neighbor it found. How it searches is up to
//! the routing model; the engine only seeds it, runs it, and reads the
//! result.

use std::fmt::{self, Debug};
use std::marker::PhantomData;

use pvns_core::RoutingSolution;

use crate::error::ExplorerError;
use crate::executor::BatchTask;

/// Outcome of one exploration.
#[derive(Clone, PartialEq)]
pub enum Neighbor<S> {
    /// A neighbor solution. Whether it improves on the current best is
    /// decided by the selector, not the explorer.
    Candidate(S),
    /// The neighborhood contains no improving move.
    NoImprovement,
}

impl<S: RoutingSolution> Neighbor<S> {
    /// Returns the candidate's objective value, if there is a candidate.
    pub fn value(&self) -> Option<S::Value> {
        match self {
            Neighbor::Candidate(solution) => Some(solution.objective_value()),
            Neighbor::NoImprovement => None,
        }
    }
}

impl<S> Neighbor<S> {
    /// Returns true if a candidate was produced.
    pub fn is_candidate(&self) -> bool {
        matches!(self, Neighbor::Candidate(_))
    }

    /// Returns the candidate solution, consuming the result.
    pub fn into_candidate(self) -> Option<S> {
        match self {
            Neighbor::Candidate(solution) => Some(solution),
            Neighbor::NoImprovement => None,
        }
    }
}

impl<S: RoutingSolution> Debug for Neighbor<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Neighbor::Candidate(solution) => f
                .debug_tuple("Candidate")
                .field(&solution.objective_value())
                .finish(),
            Neighbor::NoImprovement => f.write_str("NoImprovement"),
        }
    }
}

/// Searches a single neighborhood structure.
///
/// Explorers live for the whole search and are reseeded every round.
/// They run concurrently with each other, so an explorer must keep its own
/// working copy and never share mutable state with another explorer.
///
/// # Example
///
/// ```
/// use pvns_core::{Route, RoutingSolution};
/// use pvns_solver::{ExplorerError, Neighbor, NeighborhoodExplorer};
///
/// #[derive(Clone)]
/// struct Tour(Vec<usize>);
/// impl Route for Tour {
///     fn len(&self) -> usize { self.0.len() }
/// }
///
/// #[derive(Clone)]
/// struct Plan { routes: Vec<Tour>, cost: f64 }
/// impl RoutingSolution for Plan {
///     type Route = Tour;
///     type Value = f64;
///     fn objective_value(&self) -> f64 { self.cost }
///     fn routes(&self) -> &[Tour] { &self.routes }
///     fn clear(&mut self) { self.routes.clear(); }
///     fn add_route(&mut self, route: Tour) { self.routes.push(route); }
/// }
///
/// /// Pretends to shave one unit of cost off every solution.
/// struct Shave { start: Option<Plan> }
///
/// impl NeighborhoodExplorer<Plan> for Shave {
///     fn set_start_solution(&mut self, solution: &Plan) {
///         self.start = Some(solution.clone());
///     }
///
///     fn explore(&mut self) -> Result<Neighbor<Plan>, ExplorerError> {
///         let mut plan = self
///             .start
///             .take()
///             .ok_or_else(|| ExplorerError::new("shave", "not seeded"))?;
///         if plan.cost < 1.0 {
///             return Ok(Neighbor::NoImprovement);
///         }
///         plan.cost -= 1.0;
///         Ok(Neighbor::Candidate(plan))
///     }
///
///     fn describe(&self) -> &str {
///         "shave"
///     }
/// }
/// ```
pub trait NeighborhoodExplorer<S: RoutingSolution>: Send {
    /// Replaces the starting solution for the next run.
    ///
    /// The supplied solution is shared with every other explorer of the
    /// round and must not be mutated.
    fn set_start_solution(&mut self, solution: &S);

    /// Searches the neighborhood of the starting solution.
    fn explore(&mut self) -> Result<Neighbor<S>, ExplorerError>;

    /// Stable, human-readable neighborhood identifier for reporting.
    fn describe(&self) -> &str;
}

impl<S, E> NeighborhoodExplorer<S> for Box<E>
where
    S: RoutingSolution,
    E: NeighborhoodExplorer<S> + ?Sized,
{
    fn set_start_solution(&mut self, solution: &S) {
        (**self).set_start_solution(solution);
    }

    fn explore(&mut self) -> Result<Neighbor<S>, ExplorerError> {
        (**self).explore()
    }

    fn describe(&self) -> &str {
        (**self).describe()
    }
}

/// Adapts an explorer to the [`BatchTask`] interface of the executor.
///
/// A failed exploration is recorded as [`Neighbor::NoImprovement`].
pub struct ExplorerTask<S, E> {
    explorer: E,
    _phantom: PhantomData<fn() -> S>,
}

impl<S, E> ExplorerTask<S, E>
where
    S: RoutingSolution,
    E: NeighborhoodExplorer<S>,
{
    /// Wraps an explorer.
    pub fn new(explorer: E) -> Self {
        Self {
            explorer,
            _phantom: PhantomData,
        }
    }

    /// Returns the wrapped explorer.
    pub fn explorer(&self) -> &E {
        &self.explorer
    }

    /// Returns the wrapped explorer mutably.
    pub fn explorer_mut(&mut self) -> &mut E {
        &mut self.explorer
    }

    /// Unwraps the explorer.
    pub fn into_inner(self) -> E {
        self.explorer
    }
}

impl<S, E> BatchTask for ExplorerTask<S, E>
where
    S: RoutingSolution,
    E: NeighborhoodExplorer<S>,
{
    type Output = Neighbor<S>;
    type Error = ExplorerError;

    fn run(&mut self) -> Result<Neighbor<S>, ExplorerError> {
        self.explorer.explore()
    }

    fn failed_output(&self) -> Neighbor<S> {
        Neighbor::NoImprovement
    }

    fn name(&self) -> &str {
        self.explorer.describe()
    }
}

impl<S, E> Debug for ExplorerTask<S, E>
where
    S: RoutingSolution,
    E: NeighborhoodExplorer<S>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExplorerTask")
            .field("neighborhood", &self.explorer.describe())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{FailingExplorer, FailureMode, ScriptedExplorer};
    use pvns_test::TestSolution;

    #[test]
    fn test_neighbor_value() {
        let candidate = Neighbor::Candidate(TestSolution::with_cost(12.0));
        assert_eq!(candidate.value(), Some(12.0));
        assert!(candidate.is_candidate());

        let none: Neighbor<TestSolution> = Neighbor::NoImprovement;
        assert_eq!(none.value(), None);
        assert!(none.into_candidate().is_none());
    }

    #[test]
    fn test_neighbor_debug_shows_value() {
        let candidate = Neighbor::Candidate(TestSolution::with_cost(3.5));
        assert_eq!(format!("{:?}", candidate), "Candidate(3.5)");
    }

    #[test]
    fn test_task_runs_explorer() {
        let explorer = ScriptedExplorer::new("relocate", vec![Some(5.0)]);
        let mut task = ExplorerTask::<TestSolution, _>::new(explorer);
        task.explorer_mut()
            .set_start_solution(&TestSolution::with_cost(10.0));

        let result = task.run().unwrap();

        assert_eq!(result.value(), Some(5.0));
        assert_eq!(task.name(), "relocate");
    }

    #[test]
    fn test_task_failure_output_is_no_improvement() {
        let explorer = FailingExplorer::new("broken", FailureMode::Error);
        let mut task = ExplorerTask::<TestSolution, _>::new(explorer);
        task.explorer_mut()
            .set_start_solution(&TestSolution::with_cost(10.0));

        assert!(task.run().is_err());
        assert_eq!(task.failed_output(), Neighbor::NoImprovement);
    }

    #[test]
    fn test_boxed_explorers_mix() {
        let mut explorers: Vec<Box<dyn NeighborhoodExplorer<TestSolution>>> = vec![
            Box::new(ScriptedExplorer::new("swap", vec![Some(1.0)])),
            Box::new(FailingExplorer::new("broken", FailureMode::Error)),
        ];

        let start = TestSolution::with_cost(2.0);
        for explorer in explorers.iter_mut() {
            explorer.set_start_solution(&start);
        }

        assert_eq!(explorers[0].describe(), "swap");
        assert_eq!(explorers[0].explore().unwrap().value(), Some(1.0));
        assert!(explorers[1].explore().is_err());
    }
}
