//! Instrumentation hooks for local search.
//!
//! Listeners receive notifications at fixed points of the search: when it
//! starts, at every round boundary, and when it ends. They are purely
//! observational. The control loop never reads anything back from them.
//!
//! # Usage
//!
//! ```
//! use std::sync::Arc;
//! use pvns_core::{Route, RoutingSolution};
//! use pvns_solver::event::{LocalSearchEventSupport, LocalSearchListener, RoundReport};
//!
//! #[derive(Clone)]
//! struct Tour;
//! impl Route for Tour { fn len(&self) -> usize { 2 } }
//!
//! #[derive(Clone)]
//! struct Plan(f64);
//! impl RoutingSolution for Plan {
//!     type Route = Tour;
//!     type Value = f64;
//!     fn objective_value(&self) -> f64 { self.0 }
//!     fn routes(&self) -> &[Tour] { &[] }
//!     fn clear(&mut self) {}
//!     fn add_route(&mut self, _: Tour) {}
//! }
//!
//! #[derive(Debug)]
//! struct Printer;
//! impl LocalSearchListener<Plan> for Printer {
//!     fn on_round_ended(&self, report: &RoundReport<'_, Plan>) {
//!         println!("{} -> {}", report.neighborhood, report.value());
//!     }
//! }
//!
//! let mut support = LocalSearchEventSupport::<Plan>::new();
//! support.add_listener(Arc::new(Printer));
//! assert_eq!(support.listener_count(), 1);
//! ```

use std::fmt::{self, Debug};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use pvns_core::RoutingSolution;
use tracing::{debug, info};

/// Neighborhood label used for rounds that found no improvement.
pub const NO_IMPROVEMENT_LABEL: &str = "none";

/// Summary of one completed round.
pub struct RoundReport<'a, S: RoutingSolution> {
    /// Round index within the current search (0-based).
    pub round: u64,
    /// Winning neighborhood followed by `*`, or [`NO_IMPROVEMENT_LABEL`].
    pub neighborhood: &'a str,
    /// Whether the round replaced the current best.
    pub improved: bool,
    /// Wall time of the round, including the batch barrier.
    pub elapsed: Duration,
    /// The current best after the round.
    pub solution: &'a S,
}

impl<S: RoutingSolution> RoundReport<'_, S> {
    /// Objective value of the current best after the round.
    pub fn value(&self) -> S::Value {
        self.solution.objective_value()
    }
}

impl<S: RoutingSolution> Debug for RoundReport<'_, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RoundReport")
            .field("round", &self.round)
            .field("neighborhood", &self.neighborhood)
            .field("improved", &self.improved)
            .field("elapsed", &self.elapsed)
            .field("value", &self.value())
            .finish()
    }
}

/// Listener for local search events.
///
/// All methods default to doing nothing.
pub trait LocalSearchListener<S: RoutingSolution>: Send + Sync + Debug {
    /// Called before the first round with the input solution.
    fn on_search_started(&self, _solution: &S) {}

    /// Called before a round's explorers are seeded.
    fn on_round_started(&self, _round: u64) {}

    /// Called after a round's selection.
    fn on_round_ended(&self, _report: &RoundReport<'_, S>) {}

    /// Called when the search terminates, after reconciliation.
    fn on_search_ended(&self, _solution: &S, _changed: bool) {}
}

/// Central event broadcaster for local search events.
///
/// All listener methods are called synchronously in registration order.
pub struct LocalSearchEventSupport<S: RoutingSolution> {
    listeners: Vec<Arc<dyn LocalSearchListener<S>>>,
}

impl<S: RoutingSolution> LocalSearchEventSupport<S> {
    /// Creates a new event support instance.
    pub fn new() -> Self {
        Self {
            listeners: Vec::new(),
        }
    }

    /// Adds a listener.
    pub fn add_listener(&mut self, listener: Arc<dyn LocalSearchListener<S>>) {
        self.listeners.push(listener);
    }

    /// Removes all listeners.
    pub fn clear_listeners(&mut self) {
        self.listeners.clear();
    }

    /// Returns the number of listeners.
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    pub fn fire_search_started(&self, solution: &S) {
        for listener in &self.listeners {
            listener.on_search_started(solution);
        }
    }

    pub fn fire_round_started(&self, round: u64) {
        for listener in &self.listeners {
            listener.on_round_started(round);
        }
    }

    pub fn fire_round_ended(&self, report: &RoundReport<'_, S>) {
        for listener in &self.listeners {
            listener.on_round_ended(report);
        }
    }

    pub fn fire_search_ended(&self, solution: &S, changed: bool) {
        for listener in &self.listeners {
            listener.on_search_ended(solution, changed);
        }
    }
}

impl<S: RoutingSolution> Default for LocalSearchEventSupport<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: RoutingSolution> Debug for LocalSearchEventSupport<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalSearchEventSupport")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

/// A listener that reports events through `tracing`.
///
/// Search boundaries are logged at `info`, rounds at `debug`.
#[derive(Debug, Clone, Default)]
pub struct LoggingListener {
    /// Label attached to every event.
    label: String,
}

impl LoggingListener {
    /// Creates a new logging listener.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a logging listener with a custom label.
    pub fn with_label(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
        }
    }
}

impl<S: RoutingSolution> LocalSearchListener<S> for LoggingListener {
    fn on_search_started(&self, solution: &S) {
        info!(
            event = "ls_init",
            label = %self.label,
            routes = solution.route_count(),
            value = %solution.objective_value(),
        );
    }

    fn on_round_ended(&self, report: &RoundReport<'_, S>) {
        debug!(
            event = "ls_round",
            label = %self.label,
            round = report.round,
            neighborhood = report.neighborhood,
            improved = report.improved,
            duration_ms = report.elapsed.as_millis() as u64,
            value = %report.value(),
        );
    }

    fn on_search_ended(&self, solution: &S, changed: bool) {
        info!(
            event = "ls_end",
            label = %self.label,
            changed = changed,
            routes = solution.route_count(),
            value = %solution.objective_value(),
        );
    }
}

/// A counting listener that tracks event occurrences.
///
/// Useful for testing and statistics collection.
#[derive(Debug, Default)]
pub struct CountingListener {
    searches_started: AtomicUsize,
    rounds_started: AtomicUsize,
    rounds_ended: AtomicUsize,
    improving_rounds: AtomicUsize,
    searches_ended: AtomicUsize,
}

impl CountingListener {
    /// Creates a new counting listener.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn searches_started(&self) -> usize {
        self.searches_started.load(Ordering::SeqCst)
    }

    pub fn rounds_started(&self) -> usize {
        self.rounds_started.load(Ordering::SeqCst)
    }

    pub fn rounds_ended(&self) -> usize {
        self.rounds_ended.load(Ordering::SeqCst)
    }

    pub fn improving_rounds(&self) -> usize {
        self.improving_rounds.load(Ordering::SeqCst)
    }

    pub fn searches_ended(&self) -> usize {
        self.searches_ended.load(Ordering::SeqCst)
    }

    /// Resets all counters to zero.
    pub fn reset(&self) {
        self.searches_started.store(0, Ordering::SeqCst);
        self.rounds_started.store(0, Ordering::SeqCst);
        self.rounds_ended.store(0, Ordering::SeqCst);
        self.improving_rounds.store(0, Ordering::SeqCst);
        self.searches_ended.store(0, Ordering::SeqCst);
    }
}

impl<S: RoutingSolution> LocalSearchListener<S> for CountingListener {
    fn on_search_started(&self, _solution: &S) {
        self.searches_started.fetch_add(1, Ordering::SeqCst);
    }

    fn on_round_started(&self, _round: u64) {
        self.rounds_started.fetch_add(1, Ordering::SeqCst);
    }

    fn on_round_ended(&self, report: &RoundReport<'_, S>) {
        self.rounds_ended.fetch_add(1, Ordering::SeqCst);
        if report.improved {
            self.improving_rounds.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn on_search_ended(&self, _solution: &S, _changed: bool) {
        self.searches_ended.fetch_add(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pvns_test::TestSolution;

    fn report<'a>(solution: &'a TestSolution, improved: bool) -> RoundReport<'a, TestSolution> {
        RoundReport {
            round: 3,
            neighborhood: if improved { "2opt*" } else { NO_IMPROVEMENT_LABEL },
            improved,
            elapsed: Duration::from_millis(5),
            solution,
        }
    }

    #[test]
    fn test_support_broadcasts_to_every_listener() {
        let first = Arc::new(CountingListener::new());
        let second = Arc::new(CountingListener::new());
        let mut support = LocalSearchEventSupport::<TestSolution>::new();
        support.add_listener(first.clone());
        support.add_listener(second.clone());

        let solution = TestSolution::with_cost(10.0);
        support.fire_search_started(&solution);
        support.fire_round_started(0);
        support.fire_round_ended(&report(&solution, true));
        support.fire_round_started(1);
        support.fire_round_ended(&report(&solution, false));
        support.fire_search_ended(&solution, true);

        for listener in [&first, &second] {
            assert_eq!(listener.searches_started(), 1);
            assert_eq!(listener.rounds_started(), 2);
            assert_eq!(listener.rounds_ended(), 2);
            assert_eq!(listener.improving_rounds(), 1);
            assert_eq!(listener.searches_ended(), 1);
        }
    }

    #[test]
    fn test_clear_listeners() {
        let mut support = LocalSearchEventSupport::<TestSolution>::new();
        support.add_listener(Arc::new(LoggingListener::with_label("pvns")));
        assert_eq!(support.listener_count(), 1);

        support.clear_listeners();
        assert_eq!(support.listener_count(), 0);
    }

    #[test]
    fn test_counting_reset() {
        let listener = CountingListener::new();
        LocalSearchListener::<TestSolution>::on_round_started(&listener, 0);
        assert_eq!(listener.rounds_started(), 1);

        listener.reset();
        assert_eq!(listener.rounds_started(), 0);
    }

    #[test]
    fn test_report_debug() {
        let solution = TestSolution::with_cost(4.5);
        let debug = format!("{:?}", report(&solution, true));
        assert!(debug.contains("2opt*"));
        assert!(debug.contains("4.5"));
    }
}
