//! Route evaluator that computes load, distance, and feasibility.

use crate::distance::DistanceMatrix;
use crate::graph::NodeId;
use crate::models::{FleetConfig, Order, Route, RoutingSolution, Stop, Violation, ViolationType};

/// Evaluates routes against a distance matrix and the fleet's capacity.
///
/// # Examples
///
/// ```
/// use u_roadnet::distance::DistanceMatrix;
/// use u_roadnet::evaluation::RouteEvaluator;
/// use u_roadnet::models::{FleetConfig, Order};
///
/// let dm = DistanceMatrix::from_data(
///     vec![0, 1, 2],
///     vec![
///         0.0, 5.0, 10.0,
///         5.0, 0.0, 5.0,
///         10.0, 5.0, 0.0,
///     ],
/// )
/// .unwrap();
/// let fleet = FleetConfig::new(100.0, 0).unwrap();
/// let orders = [Order::new(1, 1, 10.0), Order::new(2, 2, 20.0)];
///
/// let evaluator = RouteEvaluator::new(&dm, &fleet);
/// let (route, violations) = evaluator.build_route(&[&orders[0], &orders[1]]);
/// assert_eq!(route.nodes(), vec![0, 1, 2, 0]);
/// assert_eq!(route.total_distance(), 20.0);
/// assert!(violations.is_empty());
/// ```
pub struct RouteEvaluator<'a> {
    distances: &'a DistanceMatrix,
    fleet: &'a FleetConfig,
}

impl<'a> RouteEvaluator<'a> {
    /// Creates a new evaluator for the given matrix and fleet.
    pub fn new(distances: &'a DistanceMatrix, fleet: &'a FleetConfig) -> Self {
        Self { distances, fleet }
    }

    /// Builds a route serving `orders` in the given sequence.
    ///
    /// Returns the constructed route and any constraint violations found.
    pub fn build_route(&self, orders: &[&Order]) -> (Route, Vec<Violation>) {
        let mut route = Route::new(self.fleet.depot());
        let mut load = 0.0;
        for order in orders {
            load += order.weight();
            route.push_stop(Stop {
                order_id: order.id(),
                node: order.destination(),
                load_after: load,
            });
        }
        let violations = self.measure(&mut route, 0);
        (route, violations)
    }

    /// Recomputes a route's distance and checks it.
    ///
    /// `route_index` is copied into the reported violations.
    pub fn evaluate_route(&self, route: &Route, route_index: usize) -> (f64, Vec<Violation>) {
        let mut route = route.clone();
        let violations = self.measure(&mut route, route_index);
        (route.total_distance(), violations)
    }

    /// Evaluates an entire solution, returning total distance and all
    /// violations.
    pub fn evaluate_solution(&self, solution: &RoutingSolution) -> (f64, Vec<Violation>) {
        let mut total = 0.0;
        let mut all_violations = Vec::new();
        for (idx, route) in solution.routes().iter().enumerate() {
            let (distance, mut violations) = self.evaluate_route(route, idx);
            total += distance;
            all_violations.append(&mut violations);
        }
        (total, all_violations)
    }

    fn measure(&self, route: &mut Route, route_index: usize) -> Vec<Violation> {
        let mut violations = Vec::new();
        let nodes = route.nodes();
        let mut total_distance = 0.0;

        if !route.is_empty() {
            for leg in nodes.windows(2) {
                let (from, to): (NodeId, NodeId) = (leg[0], leg[1]);
                let d = self.distances.distance(from, to);
                if !d.is_finite() {
                    violations.push(Violation::new(ViolationType::UnreachableLeg {
                        route_index,
                        from,
                        to,
                    }));
                }
                total_distance += d;
            }
        }
        route.set_total_distance(total_distance);

        let capacity = self.fleet.capacity();
        let peak = route
            .stops()
            .iter()
            .map(|s| s.load_after)
            .fold(0.0, f64::max);
        if peak > capacity {
            violations.push(Violation::new(ViolationType::CapacityExceeded {
                route_index,
                load: peak,
                capacity,
            }));
        }

        violations
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Depot 0 and stops 1..=3 on a line, one unit apart; node 9 is
    /// unreachable from everywhere.
    fn setup() -> (DistanceMatrix, Vec<Order>) {
        let mut dm = DistanceMatrix::new(vec![0, 1, 2, 3, 9]);
        for a in 0..4u64 {
            for b in 0..4u64 {
                dm.set(a, b, (a as f64 - b as f64).abs());
            }
        }
        let orders = vec![
            Order::new(1, 1, 10.0),
            Order::new(2, 2, 20.0),
            Order::new(3, 3, 15.0),
            Order::new(4, 9, 5.0),
        ];
        (dm, orders)
    }

    #[test]
    fn test_build_route_empty() {
        let (dm, _) = setup();
        let fleet = FleetConfig::new(50.0, 0).expect("valid fleet");
        let eval = RouteEvaluator::new(&dm, &fleet);
        let (route, violations) = eval.build_route(&[]);
        assert!(route.is_empty());
        assert!(violations.is_empty());
        assert_eq!(route.total_distance(), 0.0);
    }

    #[test]
    fn test_build_route_distance_and_load() {
        let (dm, orders) = setup();
        let fleet = FleetConfig::new(50.0, 0).expect("valid fleet");
        let eval = RouteEvaluator::new(&dm, &fleet);
        let (route, violations) = eval.build_route(&[&orders[0], &orders[1]]);
        assert!(violations.is_empty());
        // 0->1->2->0 = 1 + 1 + 2
        assert!((route.total_distance() - 4.0).abs() < 1e-10);
        assert_eq!(route.total_load(), 30.0);
    }

    #[test]
    fn test_build_route_capacity_violated() {
        let (dm, orders) = setup();
        let fleet = FleetConfig::new(25.0, 0).expect("valid fleet");
        let eval = RouteEvaluator::new(&dm, &fleet);
        let (_, violations) = eval.build_route(&[&orders[0], &orders[1], &orders[2]]);
        assert_eq!(violations.len(), 1);
        assert!(matches!(
            violations[0].kind,
            ViolationType::CapacityExceeded { load, capacity, .. } if load == 45.0 && capacity == 25.0
        ));
    }

    #[test]
    fn test_unreachable_leg_reported() {
        let (dm, orders) = setup();
        let fleet = FleetConfig::new(100.0, 0).expect("valid fleet");
        let eval = RouteEvaluator::new(&dm, &fleet);
        let (route, violations) = eval.build_route(&[&orders[3]]);
        assert_eq!(route.total_distance(), f64::INFINITY);
        assert_eq!(violations.len(), 2);
        assert_eq!(
            violations[0].kind,
            ViolationType::UnreachableLeg {
                route_index: 0,
                from: 0,
                to: 9
            }
        );
    }

    #[test]
    fn test_evaluate_solution_indexes_routes() {
        let (dm, orders) = setup();
        let fleet = FleetConfig::new(25.0, 0).expect("valid fleet");
        let eval = RouteEvaluator::new(&dm, &fleet);
        let (ok, _) = eval.build_route(&[&orders[0]]);
        let (over, _) = eval.build_route(&[&orders[1], &orders[2]]);

        let mut sol = RoutingSolution::new();
        sol.add_route(ok);
        sol.add_route(over);
        let (total, violations) = eval.evaluate_solution(&sol);
        // 0->1->0 = 2, 0->2->3->0 = 2 + 1 + 3
        assert!((total - 8.0).abs() < 1e-10);
        assert_eq!(violations.len(), 1);
        assert!(matches!(
            violations[0].kind,
            ViolationType::CapacityExceeded { route_index: 1, .. }
        ));
    }
}
