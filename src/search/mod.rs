//! Shortest-path search over a [`RoadGraph`](crate::graph::RoadGraph).
//!
//! - [`dijkstra`] / [`shortest_distances`] — label-setting search with no heuristic
//! - [`a_star`] / [`a_star_with`] — the same loop ordered by `g + h`
//! - [`dijkstra_all_pairs`] — every ordered pair, one single-source run per node
//! - [`reconstruct_path`] — predecessor map to forward path via a stack
//!
//! Every search is bounded by [`SearchConfig::max_iterations`], borrows the
//! graph immutably and owns its own heap and labels.

mod astar;
mod config;
mod dijkstra;
mod heuristic;
mod kernel;
mod path;
mod result;

pub use astar::{a_star, a_star_with};
pub use config::SearchConfig;
pub use dijkstra::{dijkstra, dijkstra_all_pairs, shortest_distances};
pub use heuristic::{Heuristic, PlanarHeuristic, ZeroHeuristic};
pub use path::reconstruct_path;
pub use result::{AStarResult, PairPath, SearchResult, SearchStats, ShortestDistances};
