//! Remaining-cost estimates that order the kernel's queue.

use crate::graph::{planar_distance, Coordinate, Node};

/// Estimates the remaining cost from a node to the search goal.
///
/// A* returns optimal paths only when the estimate never exceeds the true
/// remaining cost *in the same unit as the edge weights*. The kernel does
/// not check this.
///
/// Closures `Fn(&Node) -> f64` implement this trait.
pub trait Heuristic {
    /// Lower bound on the cost from `node` to the goal.
    fn estimate(&self, node: &Node) -> f64;
}

/// Always zero: turns the kernel into Dijkstra.
#[derive(Debug, Clone, Copy, Default)]
pub struct ZeroHeuristic;

impl Heuristic for ZeroHeuristic {
    fn estimate(&self, _node: &Node) -> f64 {
        0.0
    }
}

/// Planar straight-line distance in metres to a fixed goal.
///
/// Admissible for weights measured along the same planar projection.
/// Edge weights computed geodesically (e.g. haversine) can be shorter than
/// this estimate for some node pairs, so A* with geodesic weights is not
/// guaranteed optimal.
#[derive(Debug, Clone, Copy)]
pub struct PlanarHeuristic {
    goal: Coordinate,
}

impl PlanarHeuristic {
    /// Heuristic towards `goal`.
    pub fn towards(goal: &Node) -> Self {
        Self {
            goal: *goal.coordinate(),
        }
    }
}

impl Heuristic for PlanarHeuristic {
    fn estimate(&self, node: &Node) -> f64 {
        planar_distance(node.coordinate(), &self.goal)
    }
}

impl<F> Heuristic for F
where
    F: Fn(&Node) -> f64,
{
    fn estimate(&self, node: &Node) -> f64 {
        self(node)
    }
}
