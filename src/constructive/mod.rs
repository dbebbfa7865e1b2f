//! Constructive heuristics for building delivery routes.
//!
//! - [`nearest_neighbor_routes`] — capacity-aware greedy nearest-neighbor, O(n²)

mod nearest_neighbor;

pub use nearest_neighbor::{nearest_neighbor_routes, DistanceSource};
