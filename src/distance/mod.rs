//! Pairwise road distances.
//!
//! - [`DistanceMatrix`] — dense matrix keyed by node id, built from a graph or a store
//! - [`DistanceStore`] / [`CsvDistanceStore`] — append-only record of computed pairs
//! - [`precompute_distances`] — resumable, chunked A* over many node pairs

mod matrix;
mod precompute;
mod store;

pub use matrix::{estimate_pair_distance, DistanceMatrix, DistanceMethod, PairEstimate};
pub use precompute::{precompute_distances, precompute_into, select_nodes, PrecomputeConfig, PrecomputeReport};
pub use store::{CacheRecord, CsvDistanceStore, DistanceStore, PairOutcome, UNREACHABLE};
