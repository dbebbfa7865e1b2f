//! Road network graph consumed by the search kernel.
//!
//! The graph is built once by the caller (from map extraction or a
//! node-link JSON export) and borrowed immutably by every search.

mod geo;
mod network;

pub use geo::{planar_distance, Coordinate, METRES_PER_DEGREE};
pub use network::{Edge, Node, NodeId, RoadGraph};
