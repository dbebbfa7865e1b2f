//! # u-roadnet
//!
//! Shortest paths over road networks and greedy delivery routing on top of
//! them.
//!
//! ## Modules
//!
//! - [`graph`] — Directed, weighted road graph with node coordinates
//! - [`queue`] — Binary-heap priority queue with lazy deletion
//! - [`search`] — Dijkstra, A* and path reconstruction over one shared kernel
//! - [`distance`] — Distance matrices and the resumable precompute pipeline
//! - [`models`] — Domain model types (Order, FleetConfig, Route, RoutingSolution)
//! - [`evaluation`] — Route distance and feasibility checking
//! - [`constructive`] — Capacity-aware nearest-neighbor route construction
//! - [`error`] — Error types
//!
//! The crate logs through the [`log`] facade and never installs a logger.

pub mod constructive;
pub mod distance;
pub mod error;
pub mod evaluation;
pub mod graph;
pub mod models;
pub mod queue;
pub mod search;
