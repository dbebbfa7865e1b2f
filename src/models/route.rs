//! Route and stop types.

use serde::Serialize;

use crate::graph::NodeId;

/// One delivery within a route.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Stop {
    /// Order delivered here.
    pub order_id: u64,
    /// Node visited.
    pub node: NodeId,
    /// Cumulative load after this stop.
    pub load_after: f64,
}

/// An ordered sequence of stops served by one vehicle.
///
/// A route starts and ends at the depot; the depot is not stored in
/// `stops` but is included by [`Route::nodes`].
///
/// # Examples
///
/// ```
/// use u_roadnet::models::{Route, Stop};
///
/// let mut route = Route::new(0);
/// route.push_stop(Stop { order_id: 1, node: 4, load_after: 10.0 });
/// route.push_stop(Stop { order_id: 2, node: 9, load_after: 25.0 });
/// assert_eq!(route.nodes(), vec![0, 4, 9, 0]);
/// assert_eq!(route.order_ids(), vec![1, 2]);
/// assert_eq!(route.total_load(), 25.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Route {
    depot: NodeId,
    stops: Vec<Stop>,
    total_distance: f64,
    total_load: f64,
}

impl Route {
    /// Creates an empty route from `depot`.
    pub fn new(depot: NodeId) -> Self {
        Self {
            depot,
            stops: Vec::new(),
            total_distance: 0.0,
            total_load: 0.0,
        }
    }

    /// Appends a stop to the end of this route.
    pub fn push_stop(&mut self, stop: Stop) {
        self.total_load = stop.load_after;
        self.stops.push(stop);
    }

    /// Start and end node.
    pub fn depot(&self) -> NodeId {
        self.depot
    }

    /// Stops in visit order.
    pub fn stops(&self) -> &[Stop] {
        &self.stops
    }

    /// Number of stops (excluding the depot).
    pub fn len(&self) -> usize {
        self.stops.len()
    }

    /// Returns `true` if this route has no stops.
    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    /// Full node sequence, depot first and last.
    pub fn nodes(&self) -> Vec<NodeId> {
        let mut nodes = Vec::with_capacity(self.stops.len() + 2);
        nodes.push(self.depot);
        nodes.extend(self.stops.iter().map(|s| s.node));
        nodes.push(self.depot);
        nodes
    }

    /// Orders served, in visit order.
    pub fn order_ids(&self) -> Vec<u64> {
        self.stops.iter().map(|s| s.order_id).collect()
    }

    /// Distance including the return leg (set by the evaluator).
    pub fn total_distance(&self) -> f64 {
        self.total_distance
    }

    /// Load carried from the depot.
    pub fn total_load(&self) -> f64 {
        self.total_load
    }

    /// Sets the total distance (used by the evaluator).
    pub fn set_total_distance(&mut self, d: f64) {
        self.total_distance = d;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_empty() {
        let r = Route::new(5);
        assert!(r.is_empty());
        assert_eq!(r.nodes(), vec![5, 5]);
        assert_eq!(r.total_distance(), 0.0);
        assert_eq!(r.total_load(), 0.0);
    }

    #[test]
    fn test_push_stop_tracks_load() {
        let mut r = Route::new(0);
        r.push_stop(Stop {
            order_id: 5,
            node: 3,
            load_after: 20.0,
        });
        r.push_stop(Stop {
            order_id: 3,
            node: 8,
            load_after: 35.0,
        });
        assert_eq!(r.len(), 2);
        assert_eq!(r.order_ids(), vec![5, 3]);
        assert_eq!(r.total_load(), 35.0);
    }
}
