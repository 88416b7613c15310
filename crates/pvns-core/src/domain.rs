//! Routing domain traits consumed by the search engine.
//!
//! The engine never inspects visits, loads or feasibility. It only needs to
//! compare solutions, count route visits, and rebuild a solution route by
//! route once the search is over.

use crate::objective::Objective;

/// A single vehicle route.
///
/// A route is an ordered sequence of visits bounded by two depot endpoints.
///
/// # Example
///
/// ```
/// use pvns_core::Route;
///
/// #[derive(Clone)]
/// struct Tour(Vec<usize>);
///
/// impl Route for Tour {
///     fn len(&self) -> usize { self.0.len() }
/// }
///
/// assert!(Tour(vec![0, 0]).is_degenerate());
/// assert!(!Tour(vec![0, 4, 0]).is_degenerate());
/// ```
pub trait Route {
    /// Number of visits, counting both depot endpoints.
    fn len(&self) -> usize;

    /// Returns true if the route has no visits at all, not even depots.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns true if the route serves no customer.
    ///
    /// A route made of only its two depot endpoints is degenerate and is
    /// dropped when a solution is reconciled.
    fn is_degenerate(&self) -> bool {
        self.len() <= 2
    }
}

/// A candidate solution to a vehicle routing problem.
///
/// Solutions are cloned into every explorer once per round, so they must be
/// `Send + Sync` and cheap enough to clone.
///
/// # Example
///
/// ```
/// use pvns_core::{Route, RoutingSolution};
///
/// #[derive(Clone)]
/// struct Tour(Vec<usize>);
/// impl Route for Tour {
///     fn len(&self) -> usize { self.0.len() }
/// }
///
/// #[derive(Clone)]
/// struct Plan { routes: Vec<Tour>, cost: f64 }
///
/// impl RoutingSolution for Plan {
///     type Route = Tour;
///     type Value = f64;
///
///     fn objective_value(&self) -> f64 { self.cost }
///     fn routes(&self) -> &[Tour] { &self.routes }
///     fn clear(&mut self) { self.routes.clear(); }
///     fn add_route(&mut self, route: Tour) { self.routes.push(route); }
/// }
/// ```
pub trait RoutingSolution: Clone + Send + Sync + 'static {
    /// The route type stored in this solution.
    type Route: Route + Clone;

    /// The objective value type.
    type Value: Objective;

    /// Returns the objective value of this solution.
    fn objective_value(&self) -> Self::Value;

    /// Returns the routes in order.
    fn routes(&self) -> &[Self::Route];

    /// Removes every route.
    fn clear(&mut self);

    /// Appends a route.
    fn add_route(&mut self, route: Self::Route);

    /// Returns the number of routes.
    fn route_count(&self) -> usize {
        self.routes().len()
    }
}

/// Rebuilds `target` from the routes of `source`, dropping degenerate ones.
///
/// `target` is cleared first, so whatever it held before is lost.
pub fn reconcile_into<S: RoutingSolution>(target: &mut S, source: &S) {
    target.clear();
    for route in source.routes() {
        if !route.is_degenerate() {
            target.add_route(route.clone());
        }
    }
}

/// Drops degenerate routes from `solution` in place.
///
/// Returns the number of routes removed. Running it again on the result is a
/// no-op.
pub fn prune_degenerate<S: RoutingSolution>(solution: &mut S) -> usize {
    let degenerate = solution
        .routes()
        .iter()
        .filter(|r| r.is_degenerate())
        .count();
    if degenerate == 0 {
        return 0;
    }

    let kept: Vec<S::Route> = solution
        .routes()
        .iter()
        .filter(|r| !r.is_degenerate())
        .cloned()
        .collect();
    solution.clear();
    for route in kept {
        solution.add_route(route);
    }
    degenerate
}
