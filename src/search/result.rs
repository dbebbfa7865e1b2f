//! Search outputs and counters.

use std::collections::HashMap;
use std::fmt;

use serde::Serialize;

use super::reconstruct_path;
use crate::error::SearchError;
use crate::graph::NodeId;

/// Work counters returned by every search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SearchStats {
    /// Queue pops, stale ones included.
    pub iterations: usize,
    /// Nodes finalized.
    pub nodes_visited: usize,
    /// Queue pushes. Exceeds `nodes_visited` when a node is pushed again
    /// with a better label before being popped.
    pub nodes_evaluated: usize,
}

/// A point-to-point shortest path.
///
/// The distance and predecessor maps hold every node labelled during the
/// search; nodes missing from the distance map were never reached.
#[derive(Debug, Clone)]
pub struct SearchResult {
    pub(crate) distance: f64,
    pub(crate) path: Vec<NodeId>,
    pub(crate) distances: HashMap<NodeId, f64>,
    pub(crate) predecessors: HashMap<NodeId, NodeId>,
    pub(crate) stats: SearchStats,
}

impl SearchResult {
    /// Total path cost.
    pub fn distance(&self) -> f64 {
        self.distance
    }

    /// Nodes from start to end inclusive.
    pub fn path(&self) -> &[NodeId] {
        &self.path
    }

    /// Consumes the result, keeping only the path.
    pub fn into_path(self) -> Vec<NodeId> {
        self.path
    }

    /// Tentative distance of every labelled node.
    pub fn distances(&self) -> &HashMap<NodeId, f64> {
        &self.distances
    }

    /// Predecessor of every labelled node except the start.
    pub fn predecessors(&self) -> &HashMap<NodeId, NodeId> {
        &self.predecessors
    }

    /// Distance label of `node`, `+∞` if it was never reached.
    pub fn distance_to(&self, node: NodeId) -> f64 {
        self.distances.get(&node).copied().unwrap_or(f64::INFINITY)
    }

    /// Queue pops performed.
    pub fn iterations(&self) -> usize {
        self.stats.iterations
    }

    /// Nodes finalized.
    pub fn nodes_visited(&self) -> usize {
        self.stats.nodes_visited
    }

    /// All counters.
    pub fn stats(&self) -> SearchStats {
        self.stats
    }
}

impl fmt::Display for SearchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path = self
            .path
            .iter()
            .map(NodeId::to_string)
            .collect::<Vec<_>>()
            .join(" -> ");
        write!(
            f,
            "distance: {:.2}\npath: {}\niterations: {}\nnodes visited: {}",
            self.distance, path, self.stats.iterations, self.stats.nodes_visited
        )
    }
}

/// An A* shortest path, with the cost maps that drove the search.
#[derive(Debug, Clone)]
pub struct AStarResult {
    pub(crate) search: SearchResult,
    pub(crate) f_costs: HashMap<NodeId, f64>,
}

impl AStarResult {
    /// Total path cost.
    pub fn distance(&self) -> f64 {
        self.search.distance
    }

    /// Nodes from start to end inclusive.
    pub fn path(&self) -> &[NodeId] {
        &self.search.path
    }

    /// Cost from the start (`g`) of every labelled node.
    pub fn g_costs(&self) -> &HashMap<NodeId, f64> {
        &self.search.distances
    }

    /// `g + h` of every labelled node at its last push.
    pub fn f_costs(&self) -> &HashMap<NodeId, f64> {
        &self.f_costs
    }

    /// Nodes pushed onto the queue, duplicates included.
    pub fn nodes_evaluated(&self) -> usize {
        self.search.stats.nodes_evaluated
    }

    /// Nodes finalized.
    pub fn nodes_visited(&self) -> usize {
        self.search.stats.nodes_visited
    }

    /// The underlying path result.
    pub fn as_search(&self) -> &SearchResult {
        &self.search
    }

    /// Drops the A*-specific maps.
    pub fn into_search(self) -> SearchResult {
        self.search
    }
}

impl fmt::Display for AStarResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}\nnodes evaluated: {}",
            self.search, self.search.stats.nodes_evaluated
        )
    }
}

/// Distance and path for one ordered pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PairPath {
    /// Path cost.
    pub distance: f64,
    /// Nodes from source to target inclusive.
    pub path: Vec<NodeId>,
}

/// Single-source shortest distances from one node to every reachable node.
#[derive(Debug, Clone)]
pub struct ShortestDistances {
    pub(crate) source: NodeId,
    pub(crate) distances: HashMap<NodeId, f64>,
    pub(crate) predecessors: HashMap<NodeId, NodeId>,
    pub(crate) stats: SearchStats,
}

impl ShortestDistances {
    /// Search origin.
    pub fn source(&self) -> NodeId {
        self.source
    }

    /// Distance of every reachable node; unreachable nodes are absent.
    pub fn distances(&self) -> &HashMap<NodeId, f64> {
        &self.distances
    }

    /// Predecessor of every reachable node except the source.
    pub fn predecessors(&self) -> &HashMap<NodeId, NodeId> {
        &self.predecessors
    }

    /// Distance to `node`, `+∞` when unreachable.
    pub fn distance_to(&self, node: NodeId) -> f64 {
        self.distances.get(&node).copied().unwrap_or(f64::INFINITY)
    }

    /// Path from the source to `target`.
    pub fn path_to(&self, target: NodeId) -> Result<Vec<NodeId>, SearchError> {
        if !self.distances.contains_key(&target) {
            return Err(SearchError::NoPathExists {
                start: self.source,
                end: target,
            });
        }
        reconstruct_path(&self.predecessors, self.source, target)
    }

    /// Work counters.
    pub fn stats(&self) -> SearchStats {
        self.stats
    }
}
