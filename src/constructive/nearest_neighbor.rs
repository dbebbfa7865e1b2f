//! Capacity-aware nearest-neighbor route construction.
//!
//! Builds routes greedily: starting from the depot, always deliver the
//! nearest remaining order that still fits the vehicle. When nothing fits,
//! the route returns to the depot and a new one is opened.
//!
//! # Complexity
//!
//! O(n²) lookups on the distance matrix, where n = number of orders, plus
//! the cost of building the matrix when a graph is supplied.
//!
//! # Policies
//!
//! - An order is kept only if its time window lies inside the fleet's
//!   window. Orders without a window are always kept.
//! - Orders that do not fit together are split across routes; a route never
//!   exceeds capacity.
//! - Orders that could never fit an empty vehicle are reported as unrouted
//!   instead of failing the whole run.

use std::borrow::Cow;
use std::collections::HashSet;
use std::time::Instant;

use log::{debug, info};

use crate::distance::DistanceMatrix;
use crate::evaluation::RouteEvaluator;
use crate::graph::{NodeId, RoadGraph};
use crate::models::{FleetConfig, Order, RoutingSolution, UnroutedReason};
use crate::search::SearchConfig;

/// Where the route builder takes its distances from.
#[derive(Debug, Clone, Copy)]
pub enum DistanceSource<'a> {
    /// Compute a matrix over the depot and order nodes first.
    Graph(&'a RoadGraph),
    /// Use precomputed distances. Missing pairs count as unreachable.
    Matrix(&'a DistanceMatrix),
}

impl<'a> From<&'a RoadGraph> for DistanceSource<'a> {
    fn from(graph: &'a RoadGraph) -> Self {
        Self::Graph(graph)
    }
}

impl<'a> From<&'a DistanceMatrix> for DistanceSource<'a> {
    fn from(matrix: &'a DistanceMatrix) -> Self {
        Self::Matrix(matrix)
    }
}

/// Builds delivery routes with the nearest-neighbor heuristic.
///
/// Never fails: every order ends up in exactly one route or in
/// [`RoutingSolution::unrouted`] with a reason.
///
/// # Arguments
///
/// * `source` — a road graph or a precomputed distance matrix
/// * `orders` — deliveries to route
/// * `fleet` — capacity, depot and global time window
/// * `config` — iteration cap for searches when a matrix must be built
///
/// # Examples
///
/// ```
/// use u_roadnet::constructive::nearest_neighbor_routes;
/// use u_roadnet::graph::RoadGraph;
/// use u_roadnet::models::{FleetConfig, Order};
/// use u_roadnet::search::SearchConfig;
///
/// let mut g = RoadGraph::new();
/// for (id, lon) in [(0, 0.0), (1, 0.001), (2, 0.002)] {
///     g.add_node(id, 0.0, lon).unwrap();
/// }
/// g.add_two_way_edge(0, 1, 120.0).unwrap();
/// g.add_two_way_edge(1, 2, 120.0).unwrap();
///
/// let orders = vec![Order::new(1, 1, 60.0), Order::new(2, 2, 50.0)];
/// let fleet = FleetConfig::new(100.0, 0).unwrap();
///
/// let solution = nearest_neighbor_routes(&g, &orders, &fleet, &SearchConfig::default());
/// assert_eq!(solution.vehicle_count(), 2);
/// assert!(solution.unrouted().is_empty());
/// ```
pub fn nearest_neighbor_routes<'a>(
    source: impl Into<DistanceSource<'a>>,
    orders: &[Order],
    fleet: &FleetConfig,
    config: &SearchConfig,
) -> RoutingSolution {
    let started = Instant::now();
    let mut solution = RoutingSolution::new();
    let depot = fleet.depot();
    let capacity = fleet.capacity();

    // Step 1: time-window filter.
    let mut candidates: Vec<&Order> = Vec::with_capacity(orders.len());
    for order in orders {
        let inside = match (fleet.time_window(), order.time_window()) {
            (Some(global), Some(window)) => global.contains_window(window),
            _ => true,
        };
        if inside {
            candidates.push(order);
        } else {
            solution.add_unrouted(order.id(), UnroutedReason::OutsideTimeWindow);
        }
    }

    // Step 2: distances over depot and destinations.
    let distances: Cow<'_, DistanceMatrix> = match source.into() {
        DistanceSource::Matrix(matrix) => Cow::Borrowed(matrix),
        DistanceSource::Graph(graph) => {
            let mut nodes: Vec<NodeId> = vec![depot];
            nodes.extend(candidates.iter().map(|o| o.destination()));
            Cow::Owned(DistanceMatrix::from_graph(graph, &nodes, config))
        }
    };

    // Step 3: orders no fresh route could ever take.
    let mut pending: Vec<&Order> = Vec::with_capacity(candidates.len());
    for order in candidates {
        let weight = order.weight();
        let reason = if weight.is_nan() || weight < 0.0 {
            Some(UnroutedReason::InvalidWeight)
        } else if weight > capacity {
            Some(UnroutedReason::ExceedsCapacity)
        } else if !distances.distance(depot, order.destination()).is_finite()
            || !distances.distance(order.destination(), depot).is_finite()
        {
            Some(UnroutedReason::Unreachable)
        } else {
            None
        };
        match reason {
            Some(reason) => {
                debug!("order {} unrouted: {reason:?}", order.id());
                solution.add_unrouted(order.id(), reason);
            }
            None => pending.push(order),
        }
    }

    // Step 4: construction.
    let evaluator = RouteEvaluator::new(&distances, fleet);
    let mut routed: HashSet<usize> = HashSet::with_capacity(pending.len());

    while routed.len() < pending.len() {
        let mut current = depot;
        let mut load = 0.0;
        let mut sequence: Vec<&Order> = Vec::new();

        loop {
            let mut best: Option<(usize, f64)> = None;
            for (i, order) in pending.iter().enumerate() {
                if routed.contains(&i) || load + order.weight() > capacity {
                    continue;
                }
                let d = distances.distance(current, order.destination());
                if !d.is_finite() {
                    continue;
                }
                if best.map_or(true, |(_, best_d)| d < best_d) {
                    best = Some((i, d));
                }
            }

            match best {
                Some((next, _)) => {
                    routed.insert(next);
                    let order = pending[next];
                    load += order.weight();
                    current = order.destination();
                    sequence.push(order);
                }
                None => break,
            }
        }

        if sequence.is_empty() {
            // Every remaining order fits an empty vehicle and is reachable
            // from the depot, so this only happens on inconsistent input.
            for (i, order) in pending.iter().enumerate() {
                if !routed.contains(&i) {
                    solution.add_unrouted(order.id(), UnroutedReason::Unreachable);
                }
            }
            break;
        }

        let (route, _) = evaluator.build_route(&sequence);
        debug!(
            "route {} closed: {} stops, load {:.2}, distance {:.2}",
            solution.vehicle_count(),
            route.len(),
            route.total_load(),
            route.total_distance()
        );
        solution.add_route(route);
    }

    solution.set_computation_time(started.elapsed());
    info!(
        "built {} routes over {} orders ({} unrouted) in {:?}",
        solution.vehicle_count(),
        orders.len(),
        solution.unrouted().len(),
        solution.computation_time()
    );
    solution
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TimeWindow;

    /// Depot 0 and nodes 1..=3 on a line, 1 unit apart; node 9 is isolated.
    fn line_matrix() -> DistanceMatrix {
        let mut dm = DistanceMatrix::new(vec![0, 1, 2, 3, 9]);
        for a in 0..4u64 {
            for b in 0..4u64 {
                dm.set(a, b, (a as f64 - b as f64).abs());
            }
        }
        dm
    }

    fn route(dm: &DistanceMatrix, orders: &[Order], fleet: &FleetConfig) -> RoutingSolution {
        nearest_neighbor_routes(dm, orders, fleet, &SearchConfig::default())
    }

    #[test]
    fn test_all_on_one_route() {
        let dm = line_matrix();
        let orders = vec![
            Order::new(3, 3, 10.0),
            Order::new(1, 1, 10.0),
            Order::new(2, 2, 10.0),
        ];
        let sol = route(&dm, &orders, &FleetConfig::new(100.0, 0).expect("valid fleet"));
        assert_eq!(sol.vehicle_count(), 1);
        assert_eq!(sol.routes()[0].order_ids(), vec![1, 2, 3]);
        assert_eq!(sol.routes()[0].nodes(), vec![0, 1, 2, 3, 0]);
        // 1 + 1 + 1 + 3
        assert!((sol.total_distance() - 6.0).abs() < 1e-10);
        assert!(sol.unrouted().is_empty());
    }

    #[test]
    fn test_capacity_splits_routes() {
        let dm = line_matrix();
        let orders = vec![Order::new(1, 1, 60.0), Order::new(2, 2, 50.0)];
        let sol = route(&dm, &orders, &FleetConfig::new(100.0, 0).expect("valid fleet"));
        assert_eq!(sol.vehicle_count(), 2);
        assert!(sol.unrouted().is_empty());
        assert_eq!(sol.routes()[0].order_ids(), vec![1]);
        assert_eq!(sol.routes()[1].order_ids(), vec![2]);
        for r in sol.routes() {
            assert!(r.total_load() <= 100.0);
        }
    }

    #[test]
    fn test_skips_to_smaller_order_that_fits() {
        let dm = line_matrix();
        let orders = vec![
            Order::new(1, 1, 60.0),
            Order::new(2, 2, 50.0),
            Order::new(3, 3, 30.0),
        ];
        let sol = route(&dm, &orders, &FleetConfig::new(100.0, 0).expect("valid fleet"));
        assert_eq!(sol.routes()[0].order_ids(), vec![1, 3]);
        assert_eq!(sol.routes()[1].order_ids(), vec![2]);
    }

    #[test]
    fn test_unrouted_reasons() {
        let dm = line_matrix();
        let fleet = FleetConfig::new(100.0, 0)
            .expect("valid fleet")
            .with_time_window(TimeWindow::new(9.0, 11.0).expect("valid"));
        let orders = vec![
            Order::new(1, 1, 10.0).with_time_window(TimeWindow::new(9.0, 10.0).expect("valid")),
            Order::new(2, 2, 10.0).with_time_window(TimeWindow::new(10.0, 12.0).expect("valid")),
            Order::new(3, 3, 150.0),
            Order::new(4, 9, 10.0),
            Order::new(5, 2, -1.0),
            Order::new(6, 2, f64::NAN),
            Order::new(7, 42, 10.0),
        ];
        let sol = route(&dm, &orders, &fleet);

        let reason = |id: u64| {
            sol.unrouted()
                .iter()
                .find(|u| u.order_id == id)
                .map(|u| u.reason)
        };
        assert_eq!(reason(1), None);
        assert_eq!(reason(2), Some(UnroutedReason::OutsideTimeWindow));
        assert_eq!(reason(3), Some(UnroutedReason::ExceedsCapacity));
        assert_eq!(reason(4), Some(UnroutedReason::Unreachable));
        assert_eq!(reason(5), Some(UnroutedReason::InvalidWeight));
        assert_eq!(reason(6), Some(UnroutedReason::InvalidWeight));
        assert_eq!(reason(7), Some(UnroutedReason::Unreachable));
        assert_eq!(sol.num_served(), 1);
        assert_eq!(sol.num_served() + sol.unrouted().len(), orders.len());
    }

    #[test]
    fn test_no_orders() {
        let dm = line_matrix();
        let sol = route(&dm, &[], &FleetConfig::new(100.0, 0).expect("valid fleet"));
        assert_eq!(sol.vehicle_count(), 0);
        assert!(sol.unrouted().is_empty());
    }

    #[test]
    fn test_chooses_nearest() {
        let dm = line_matrix();
        let orders = vec![Order::new(1, 3, 5.0), Order::new(2, 1, 5.0)];
        let sol = route(&dm, &orders, &FleetConfig::new(100.0, 0).expect("valid fleet"));
        assert_eq!(sol.routes()[0].order_ids(), vec![2, 1]);
    }

    #[test]
    fn test_builds_matrix_from_graph() {
        let mut g = RoadGraph::new();
        for (id, lon) in [(0, 0.0), (1, 0.001), (2, 0.002)] {
            g.add_node(id, 0.0, lon).expect("valid");
        }
        g.add_two_way_edge(0, 1, 120.0).expect("valid");
        g.add_two_way_edge(1, 2, 120.0).expect("valid");

        let orders = vec![Order::new(1, 2, 10.0), Order::new(2, 1, 10.0)];
        let sol = nearest_neighbor_routes(
            &g,
            &orders,
            &FleetConfig::new(100.0, 0).expect("valid fleet"),
            &SearchConfig::default(),
        );
        assert_eq!(sol.vehicle_count(), 1);
        assert_eq!(sol.routes()[0].nodes(), vec![0, 1, 2, 0]);
        assert!((sol.total_distance() - 480.0).abs() < 1e-9);
    }
}
