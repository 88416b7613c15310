//! Capacitated routing fixtures.
//!
//! Routes are plain node sequences starting and ending at depot `0`. The
//! solution cost is stored explicitly so tests can script objective values
//! without a distance matrix.
//!
//! # Example
//!
//! ```
//! use pvns_core::RoutingSolution;
//! use pvns_test::cvrp::TestSolution;
//!
//! let solution = TestSolution::from_route_lengths(&[2, 5, 3], 120.0);
//! assert_eq!(solution.route_count(), 3);
//! assert_eq!(solution.objective_value(), 120.0);
//! ```

use pvns_core::{Route, RoutingSolution};

/// Depot node index.
pub const DEPOT: usize = 0;

/// A route as a sequence of node indices bounded by the depot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TestRoute {
    pub nodes: Vec<usize>,
}

impl TestRoute {
    /// Creates a route visiting `customers` between two depot visits.
    pub fn new(customers: &[usize]) -> Self {
        let mut nodes = Vec::with_capacity(customers.len() + 2);
        nodes.push(DEPOT);
        nodes.extend_from_slice(customers);
        nodes.push(DEPOT);
        Self { nodes }
    }

    /// Creates a depot-only route.
    pub fn empty() -> Self {
        Self::new(&[])
    }

    /// Creates a route whose length (depots included) is `length`.
    ///
    /// Customer ids are `first_customer..`. Lengths below 2 produce a
    /// depot-only route.
    pub fn with_length(length: usize, first_customer: usize) -> Self {
        let customers: Vec<usize> =
            (first_customer..first_customer + length.saturating_sub(2)).collect();
        Self::new(&customers)
    }

    /// Returns the customers served, without depots.
    pub fn customers(&self) -> &[usize] {
        let n = self.nodes.len();
        if n <= 2 {
            &[]
        } else {
            &self.nodes[1..n - 1]
        }
    }
}

impl Route for TestRoute {
    fn len(&self) -> usize {
        self.nodes.len()
    }
}

/// A routing solution with an explicit cost.
#[derive(Clone, Debug, PartialEq)]
pub struct TestSolution {
    pub routes: Vec<TestRoute>,
    pub cost: f64,
}

impl TestSolution {
    /// Creates a solution from routes and a cost.
    pub fn new(routes: Vec<TestRoute>, cost: f64) -> Self {
        Self { routes, cost }
    }

    /// Creates a solution with no routes.
    pub fn with_cost(cost: f64) -> Self {
        Self::new(Vec::new(), cost)
    }

    /// Creates a solution whose routes have the given lengths.
    ///
    /// Customer ids are assigned consecutively across routes so every route
    /// is distinguishable.
    pub fn from_route_lengths(lengths: &[usize], cost: f64) -> Self {
        let mut next = 1;
        let routes = lengths
            .iter()
            .map(|&len| {
                let route = TestRoute::with_length(len, next);
                next += len.saturating_sub(2);
                route
            })
            .collect();
        Self::new(routes, cost)
    }

    /// Returns a copy of this solution with a different cost.
    pub fn with_new_cost(&self, cost: f64) -> Self {
        Self {
            routes: self.routes.clone(),
            cost,
        }
    }

    /// Returns the length of every route.
    pub fn route_lengths(&self) -> Vec<usize> {
        self.routes.iter().map(|r| r.nodes.len()).collect()
    }
}

impl RoutingSolution for TestSolution {
    type Route = TestRoute;
    type Value = f64;

    fn objective_value(&self) -> f64 {
        self.cost
    }

    fn routes(&self) -> &[TestRoute] {
        &self.routes
    }

    fn clear(&mut self) {
        self.routes.clear();
    }

    fn add_route(&mut self, route: TestRoute) {
        self.routes.push(route);
    }
}
