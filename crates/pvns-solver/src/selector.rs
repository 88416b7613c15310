//! Best-of-batch improvement selection.
//!
//! Given the current best and every explorer's result for a round, keep the
//! single candidate that is strictly better than everything seen before it.
//! The whole batch is scanned even after an improvement is found, so the
//! chosen candidate is the best of the round rather than the first to
//! arrive. Results are scanned in explorer order, which makes ties resolve
//! to the lowest explorer index.

use std::cmp::Ordering;

use pvns_core::{OptimizationSense, RoutingSolution};

use crate::explorer::Neighbor;

/// The winning candidate of a round.
#[derive(Debug, Clone, PartialEq)]
pub struct Improvement<S> {
    /// Index of the explorer that produced the candidate.
    pub explorer_index: usize,
    /// The candidate solution.
    pub solution: S,
}

/// A candidate whose objective cannot be ordered against the best so far.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnorderedCandidate {
    /// Index of the explorer that produced the candidate.
    pub explorer_index: usize,
}

/// Selects the best strictly improving candidate of a round.
///
/// Returns `Ok(None)` when no candidate improves on `best`.
///
/// # Errors
///
/// Returns [`UnorderedCandidate`] if a candidate's objective value cannot be
/// compared with the running best (for example a NaN cost).
///
/// # Example
///
/// ```
/// use pvns_core::OptimizationSense;
/// use pvns_solver::selector::select_improvement;
/// use pvns_solver::Neighbor;
/// # use pvns_core::{Route, RoutingSolution};
/// # #[derive(Clone)] struct Tour;
/// # impl Route for Tour { fn len(&self) -> usize { 2 } }
/// # #[derive(Clone)] struct Plan(f64);
/// # impl RoutingSolution for Plan {
/// #     type Route = Tour; type Value = f64;
/// #     fn objective_value(&self) -> f64 { self.0 }
/// #     fn routes(&self) -> &[Tour] { &[] }
/// #     fn clear(&mut self) {}
/// #     fn add_route(&mut self, _: Tour) {}
/// # }
///
/// let results = vec![
///     Neighbor::Candidate(Plan(10.0)),
///     Neighbor::NoImprovement,
///     Neighbor::Candidate(Plan(7.0)),
/// ];
///
/// let winner = select_improvement(OptimizationSense::Minimization, &Plan(12.0), results)
///     .unwrap()
///     .unwrap();
/// assert_eq!(winner.explorer_index, 2);
/// assert_eq!(winner.solution.0, 7.0);
/// ```
pub fn select_improvement<S: RoutingSolution>(
    sense: OptimizationSense,
    best: &S,
    results: Vec<Neighbor<S>>,
) -> Result<Option<Improvement<S>>, UnorderedCandidate> {
    let mut best_value = best.objective_value();
    let mut winner: Option<Improvement<S>> = None;

    for (explorer_index, result) in results.into_iter().enumerate() {
        let Neighbor::Candidate(candidate) = result else {
            continue;
        };

        let value = candidate.objective_value();
        match sense.compare(&best_value, &value) {
            Some(Ordering::Greater) => {
                best_value = value;
                winner = Some(Improvement {
                    explorer_index,
                    solution: candidate,
                });
            }
            Some(_) => {}
            None => return Err(UnorderedCandidate { explorer_index }),
        }
    }

    Ok(winner)
}
