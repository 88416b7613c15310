//! Parallel local search orchestrator.
//!
//! Each round seeds every explorer with the current best, runs them all as
//! one batch on the executor, and adopts the best strictly improving
//! candidate. The search ends on the first round without an improvement.
//! If anything improved, the caller's solution is rebuilt from the best
//! candidate with its depot-only routes dropped.

use std::fmt::{self, Debug};
use std::sync::Arc;
use std::time::Instant;

use pvns_config::LocalSearchConfig;
use pvns_core::{reconcile_into, RoutingSolution};
use tracing::{debug, info, warn};

use crate::error::{ExecutorError, LocalSearchError, Result};
use crate::event::{LocalSearchEventSupport, LocalSearchListener, RoundReport, NO_IMPROVEMENT_LABEL};
use crate::executor::BatchExecutor;
use crate::explorer::{ExplorerTask, NeighborhoodExplorer};
use crate::selector::select_improvement;
use crate::stats::LocalSearchStats;

/// Runs a fixed pool of neighborhood explorers in parallel rounds.
///
/// The explorer pool is fixed at construction. The worker pool is sized
/// once from the configured [`ThreadCount`](pvns_config::ThreadCount) and the
/// number of explorers, so every explorer of a round can run without
/// waiting behind another when enough cores are available.
///
/// # Example
///
/// ```
/// use pvns_core::{Route, RoutingSolution};
/// use pvns_solver::{ExplorerError, Neighbor, NeighborhoodExplorer, ParallelLocalSearch};
///
/// #[derive(Clone)]
/// struct Tour(usize);
/// impl Route for Tour { fn len(&self) -> usize { self.0 } }
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
/// struct Halve(Option<Plan>);
/// impl NeighborhoodExplorer<Plan> for Halve {
///     fn set_start_solution(&mut self, solution: &Plan) { self.0 = Some(solution.clone()); }
///     fn explore(&mut self) -> Result<Neighbor<Plan>, ExplorerError> {
///         let mut plan = self.0.take().ok_or_else(|| ExplorerError::new("halve", "unseeded"))?;
///         if plan.cost < 1.0 {
///             return Ok(Neighbor::NoImprovement);
///         }
///         plan.cost /= 2.0;
///         Ok(Neighbor::Candidate(plan))
///     }
///     fn describe(&self) -> &str { "halve" }
/// }
///
/// let mut search = ParallelLocalSearch::new(vec![Halve(None)]).unwrap();
/// let mut plan = Plan { routes: vec![Tour(2), Tour(4)], cost: 8.0 };
///
/// assert!(search.local_search(&mut plan).unwrap());
/// assert_eq!(plan.cost, 0.5);
/// assert_eq!(plan.routes.len(), 1);
///
/// search.dispose().unwrap();
/// ```
pub struct ParallelLocalSearch<S, E>
where
    S: RoutingSolution,
    E: NeighborhoodExplorer<S>,
{
    tasks: Vec<ExplorerTask<S, E>>,
    executor: BatchExecutor,
    config: LocalSearchConfig,
    events: LocalSearchEventSupport<S>,
    stats: LocalSearchStats,
    best_solution: Option<S>,
}

impl<S, E> ParallelLocalSearch<S, E>
where
    S: RoutingSolution,
    E: NeighborhoodExplorer<S>,
{
    /// Creates an orchestrator with the default configuration.
    pub fn new(explorers: Vec<E>) -> Result<Self> {
        Self::with_config(explorers, LocalSearchConfig::default())
    }

    /// Creates an orchestrator with an explicit configuration.
    ///
    /// # Errors
    ///
    /// Fails if the configuration is invalid, if `explorers` is empty, or if
    /// the worker pool cannot be built.
    pub fn with_config(explorers: Vec<E>, config: LocalSearchConfig) -> Result<Self> {
        config.validate()?;
        if explorers.is_empty() {
            return Err(LocalSearchError::NoExplorers);
        }

        let threads = config.thread_count.resolve(explorers.len());
        let executor = BatchExecutor::new(threads, config.thread_name_prefix.clone())?;
        let stats = LocalSearchStats::new(explorers.len());
        let tasks = explorers.into_iter().map(ExplorerTask::new).collect();

        Ok(Self {
            tasks,
            executor,
            config,
            events: LocalSearchEventSupport::new(),
            stats,
            best_solution: None,
        })
    }

    /// Registers an observer of search events.
    pub fn add_listener(&mut self, listener: Arc<dyn LocalSearchListener<S>>) {
        self.events.add_listener(listener);
    }

    /// Runs rounds until no explorer improves on the current best.
    ///
    /// Returns `true` if `solution` was replaced by a better one. When
    /// nothing improved, `solution` is left untouched.
    ///
    /// # Errors
    ///
    /// Explorer failures are absorbed and never reach the caller. The search
    /// fails if the orchestrator was disposed, if the executor returned the
    /// wrong number of results, or if a candidate's objective cannot be
    /// ordered against the current best. On error `solution` and
    /// [`best_solution`](Self::best_solution) are unchanged, while the
    /// search is still counted in the stats and reported to listeners as
    /// ended without change.
    pub fn local_search(&mut self, solution: &mut S) -> Result<bool> {
        let start = Instant::now();

        info!(
            event = "local_search_start",
            explorers = self.tasks.len(),
            threads = self.executor.thread_count(),
            value = %solution.objective_value(),
        );
        self.events.fire_search_started(solution);

        let mut rounds: u64 = 0;
        let outcome = self.run_rounds(solution, &mut rounds);

        let result = match outcome {
            Ok(Some(best)) => {
                reconcile_into(solution, &best);
                self.best_solution = Some(best);
                Ok(true)
            }
            Ok(None) => Ok(false),
            Err(e) => {
                warn!(event = "local_search_failed", rounds = rounds, error = %e);
                Err(e)
            }
        };
        let changed = matches!(result, Ok(true));

        let duration = start.elapsed();
        self.stats.record_search(duration);

        info!(
            event = "local_search_end",
            rounds = rounds,
            changed = changed,
            duration_ms = duration.as_millis() as u64,
            value = %solution.objective_value(),
        );
        self.events.fire_search_ended(solution, changed);

        result
    }

    // Returns the best adopted candidate, or `None` if no round improved.
    // Nothing outside the explorers and the stats is touched until it returns.
    fn run_rounds(&mut self, solution: &S, rounds: &mut u64) -> Result<Option<S>> {
        let sense = self.config.optimization_sense;
        let mut best: Option<S> = None;

        loop {
            let round = *rounds;
            if self.config.round_limit.is_some_and(|limit| round >= limit) {
                debug!(event = "round_limit_reached", rounds = round);
                break;
            }

            let round_start = Instant::now();
            self.events.fire_round_started(round);

            let current = best.as_ref().unwrap_or(solution);
            for task in &mut self.tasks {
                task.explorer_mut().set_start_solution(current);
            }

            let results = self.executor.submit_batch_and_wait(&mut self.tasks)?;
            if results.len() != self.tasks.len() {
                return Err(LocalSearchError::ResultCountMismatch {
                    expected: self.tasks.len(),
                    actual: results.len(),
                });
            }

            let failures = results.iter().filter(|r| r.is_failed()).count();
            let neighbors = results.into_iter().map(|r| r.output).collect();

            let selection = select_improvement(sense, current, neighbors).map_err(|e| {
                LocalSearchError::UnorderedCandidate {
                    neighborhood: self.neighborhood(e.explorer_index).to_string(),
                }
            })?;

            let winner = selection.as_ref().map(|i| i.explorer_index);
            self.stats.record_round(winner, failures);
            *rounds += 1;

            let label = match winner {
                Some(index) => format!("{}*", self.neighborhood(index)),
                None => NO_IMPROVEMENT_LABEL.to_string(),
            };
            if let Some(improvement) = selection {
                best = Some(improvement.solution);
            }

            let current = best.as_ref().unwrap_or(solution);
            let elapsed = round_start.elapsed();

            debug!(
                event = "round_end",
                round = round,
                neighborhood = %label,
                improved = winner.is_some(),
                failures = failures,
                duration_ms = elapsed.as_millis() as u64,
                value = %current.objective_value(),
            );
            self.events.fire_round_ended(&RoundReport {
                round,
                neighborhood: &label,
                improved: winner.is_some(),
                elapsed,
                solution: current,
            });

            if winner.is_none() {
                break;
            }
        }

        Ok(best)
    }

    /// Releases the worker pool.
    ///
    /// Safe to call more than once, and before any search has run. Any
    /// later [`local_search`](Self::local_search) fails with
    /// [`ExecutorError::Shutdown`].
    pub fn dispose(&self) -> std::result::Result<(), ExecutorError> {
        self.executor.shutdown()
    }

    /// Returns true once [`dispose`](Self::dispose) has run.
    pub fn is_disposed(&self) -> bool {
        self.executor.is_shutdown()
    }

    /// Returns the explorers in pool order.
    pub fn explorers(&self) -> impl ExactSizeIterator<Item = &E> + '_ {
        self.tasks.iter().map(ExplorerTask::explorer)
    }

    pub fn explorer_count(&self) -> usize {
        self.tasks.len()
    }

    /// Returns the worker pool size.
    pub fn thread_count(&self) -> usize {
        self.executor.thread_count()
    }

    pub fn config(&self) -> &LocalSearchConfig {
        &self.config
    }

    pub fn stats(&self) -> &LocalSearchStats {
        &self.stats
    }

    /// Returns the best candidate of the last search that improved, before
    /// route pruning. A failed search leaves it as it was.
    pub fn best_solution(&self) -> Option<&S> {
        self.best_solution.as_ref()
    }

    fn neighborhood(&self, index: usize) -> &str {
        self.tasks
            .get(index)
            .map_or("unknown", |task| task.explorer().describe())
    }
}

impl<S, E> Debug for ParallelLocalSearch<S, E>
where
    S: RoutingSolution,
    E: NeighborhoodExplorer<S>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let neighborhoods: Vec<&str> = self.tasks.iter().map(|t| t.explorer().describe()).collect();
        f.debug_struct("ParallelLocalSearch")
            .field("neighborhoods", &neighborhoods)
            .field("executor", &self.executor)
            .field("stats", &self.stats)
            .finish()
    }
}

#[cfg(test)]
#[path = "search_tests.rs"]
mod tests;
