//! Solution, unrouted-order and violation types.

use std::time::Duration;

use serde::Serialize;

use super::Route;
use crate::graph::NodeId;

/// A type of constraint violation in a route.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ViolationType {
    /// Vehicle capacity exceeded.
    CapacityExceeded {
        /// Route index in the solution.
        route_index: usize,
        /// Load that exceeded capacity.
        load: f64,
        /// Vehicle capacity.
        capacity: f64,
    },
    /// A leg of the route has no finite distance.
    UnreachableLeg {
        /// Route index in the solution.
        route_index: usize,
        /// Leg start.
        from: NodeId,
        /// Leg end.
        to: NodeId,
    },
}

/// A constraint violation in a solution.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Violation {
    /// The type of violation.
    pub kind: ViolationType,
}

impl Violation {
    /// Creates a new violation.
    pub fn new(kind: ViolationType) -> Self {
        Self { kind }
    }
}

/// Why an order was left out of every route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum UnroutedReason {
    /// Weight is negative or not a number.
    InvalidWeight,
    /// Weight exceeds the capacity of an empty vehicle.
    ExceedsCapacity,
    /// No finite distance between the depot and the destination, either way.
    Unreachable,
    /// The order's window is not contained in the fleet's window.
    OutsideTimeWindow,
}

/// An order the builder could not place.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnroutedOrder {
    /// The order's ID.
    pub order_id: u64,
    /// Why it was not routed.
    pub reason: UnroutedReason,
}

/// Routes built for a set of orders.
///
/// Every input order appears either in exactly one route or in `unrouted`.
///
/// # Examples
///
/// ```
/// use u_roadnet::models::{Route, RoutingSolution, UnroutedReason};
///
/// let mut sol = RoutingSolution::new();
/// sol.add_route(Route::new(0));
/// sol.add_unrouted(9, UnroutedReason::ExceedsCapacity);
/// assert_eq!(sol.vehicle_count(), 1);
/// assert_eq!(sol.unrouted()[0].order_id, 9);
/// ```
#[derive(Debug, Clone, Default, Serialize)]
pub struct RoutingSolution {
    routes: Vec<Route>,
    unrouted: Vec<UnroutedOrder>,
    computation_time: Duration,
}

impl RoutingSolution {
    /// Creates an empty solution.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a route to this solution.
    pub fn add_route(&mut self, route: Route) {
        self.routes.push(route);
    }

    /// Records an order that could not be routed.
    pub fn add_unrouted(&mut self, order_id: u64, reason: UnroutedReason) {
        self.unrouted.push(UnroutedOrder { order_id, reason });
    }

    /// Returns the routes in this solution.
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// Orders left out, with reasons.
    pub fn unrouted(&self) -> &[UnroutedOrder] {
        &self.unrouted
    }

    /// Number of routes (vehicles used).
    pub fn vehicle_count(&self) -> usize {
        self.routes.len()
    }

    /// Total distance across all routes.
    pub fn total_distance(&self) -> f64 {
        self.routes.iter().map(|r| r.total_distance()).sum()
    }

    /// Total number of orders served across all routes.
    pub fn num_served(&self) -> usize {
        self.routes.iter().map(|r| r.len()).sum()
    }

    /// Wall-clock time spent building the solution.
    pub fn computation_time(&self) -> Duration {
        self.computation_time
    }

    /// Sets the wall-clock time.
    pub fn set_computation_time(&mut self, elapsed: Duration) {
        self.computation_time = elapsed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Stop;

    #[test]
    fn test_solution_empty() {
        let sol = RoutingSolution::new();
        assert_eq!(sol.vehicle_count(), 0);
        assert!(sol.unrouted().is_empty());
        assert_eq!(sol.num_served(), 0);
        assert_eq!(sol.total_distance(), 0.0);
    }

    #[test]
    fn test_solution_with_routes() {
        let mut sol = RoutingSolution::new();

        let mut r1 = Route::new(0);
        r1.push_stop(Stop {
            order_id: 1,
            node: 1,
            load_after: 10.0,
        });
        r1.set_total_distance(50.0);

        let mut r2 = Route::new(0);
        r2.push_stop(Stop {
            order_id: 2,
            node: 2,
            load_after: 5.0,
        });
        r2.push_stop(Stop {
            order_id: 3,
            node: 3,
            load_after: 15.0,
        });
        r2.set_total_distance(80.0);

        sol.add_route(r1);
        sol.add_route(r2);
        sol.add_unrouted(4, UnroutedReason::Unreachable);

        assert_eq!(sol.vehicle_count(), 2);
        assert_eq!(sol.num_served(), 3);
        assert_eq!(sol.unrouted().len(), 1);
        assert!((sol.total_distance() - 130.0).abs() < 1e-10);
    }

    #[test]
    fn test_serializes_to_json() {
        let mut sol = RoutingSolution::new();
        sol.add_unrouted(4, UnroutedReason::OutsideTimeWindow);
        let json = serde_json::to_value(&sol).expect("serializable");
        assert_eq!(json["unrouted"][0]["reason"], "OutsideTimeWindow");
    }
}
