//! Dense distance matrix keyed by node id.

use std::collections::HashMap;

use log::{debug, warn};

use super::{CacheRecord, PairOutcome};
use crate::graph::{planar_distance, NodeId, RoadGraph};
use crate::search::{a_star, dijkstra, SearchConfig};

/// A dense n×n distance matrix stored in row-major order.
///
/// Rows and columns are addressed by [`NodeId`] through a direct
/// id→index map. The diagonal is zero; pairs that were never set are
/// `+∞`.
///
/// # Examples
///
/// ```
/// use u_roadnet::distance::DistanceMatrix;
///
/// let mut dm = DistanceMatrix::new(vec![10, 20, 30]);
/// dm.set(10, 20, 5.0);
/// assert_eq!(dm.distance(10, 20), 5.0);
/// assert_eq!(dm.distance(20, 10), f64::INFINITY);
/// assert_eq!(dm.distance(30, 30), 0.0);
/// assert_eq!(dm.get(10, 99), None);
/// ```
#[derive(Debug, Clone)]
pub struct DistanceMatrix {
    nodes: Vec<NodeId>,
    index: HashMap<NodeId, usize>,
    data: Vec<f64>,
}

impl DistanceMatrix {
    /// Creates a matrix over `nodes` (duplicates dropped, order kept),
    /// zero on the diagonal and `+∞` elsewhere.
    pub fn new(nodes: Vec<NodeId>) -> Self {
        let mut unique = Vec::with_capacity(nodes.len());
        let mut index = HashMap::with_capacity(nodes.len());
        for id in nodes {
            if !index.contains_key(&id) {
                index.insert(id, unique.len());
                unique.push(id);
            }
        }
        let size = unique.len();
        let mut data = vec![f64::INFINITY; size * size];
        for i in 0..size {
            data[i * size + i] = 0.0;
        }
        Self {
            nodes: unique,
            index,
            data,
        }
    }

    /// Creates a matrix from an explicit row-major grid.
    ///
    /// Returns `None` if `nodes` has duplicates or the data length doesn't
    /// match `nodes.len()²`.
    pub fn from_data(nodes: Vec<NodeId>, data: Vec<f64>) -> Option<Self> {
        let mut matrix = Self::new(nodes.clone());
        if matrix.nodes.len() != nodes.len() || data.len() != matrix.data.len() {
            return None;
        }
        matrix.data = data;
        Some(matrix)
    }

    /// Computes road distances between every ordered pair of `nodes`.
    ///
    /// Each pair goes through [`estimate_pair_distance`]: A*, then
    /// Dijkstra, then the straight-line estimate, then `+∞`.
    pub fn from_graph(graph: &RoadGraph, nodes: &[NodeId], config: &SearchConfig) -> Self {
        let mut matrix = Self::new(nodes.to_vec());
        let ids = matrix.nodes.clone();
        for &from in &ids {
            for &to in &ids {
                if from != to {
                    let estimate = estimate_pair_distance(graph, from, to, config);
                    matrix.set(from, to, estimate.distance);
                }
            }
        }
        debug!("built {}x{} distance matrix from graph", ids.len(), ids.len());
        matrix
    }

    /// Builds a matrix from persisted precompute rows.
    ///
    /// Nodes appear in first-seen order. Unreachable rows leave `+∞`.
    pub fn from_records(records: &[CacheRecord]) -> Self {
        let nodes = records
            .iter()
            .flat_map(|r| [r.source, r.target])
            .collect::<Vec<_>>();
        let mut matrix = Self::new(nodes);
        for record in records {
            if let PairOutcome::Reachable { distance, .. } = record.outcome {
                matrix.set(record.source, record.target, distance);
            }
        }
        matrix
    }

    /// Distance from `from` to `to`, or `None` if either is not in the
    /// matrix.
    pub fn get(&self, from: NodeId, to: NodeId) -> Option<f64> {
        let i = self.index_of(from)?;
        let j = self.index_of(to)?;
        Some(self.data[i * self.size() + j])
    }

    /// Distance from `from` to `to`; `+∞` when either node is missing.
    pub fn distance(&self, from: NodeId, to: NodeId) -> f64 {
        self.get(from, to).unwrap_or(f64::INFINITY)
    }

    /// Sets the distance from `from` to `to`.
    ///
    /// Returns `false` (and changes nothing) if either node is missing.
    pub fn set(&mut self, from: NodeId, to: NodeId, distance: f64) -> bool {
        match (self.index_of(from), self.index_of(to)) {
            (Some(i), Some(j)) => {
                let size = self.size();
                self.data[i * size + j] = distance;
                true
            }
            _ => false,
        }
    }

    /// Number of nodes in this matrix.
    pub fn size(&self) -> usize {
        self.nodes.len()
    }

    /// Node ids in row order.
    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    /// Returns `true` if `id` has a row in this matrix.
    pub fn contains(&self, id: NodeId) -> bool {
        self.index.contains_key(&id)
    }

    /// Returns `true` if the matrix is symmetric within the given tolerance.
    pub fn is_symmetric(&self, tol: f64) -> bool {
        let n = self.size();
        for i in 0..n {
            for j in (i + 1)..n {
                let a = self.data[i * n + j];
                let b = self.data[j * n + i];
                if a != b && (a - b).abs() > tol {
                    return false;
                }
            }
        }
        true
    }

    /// Returns the nearest reachable candidate to `from`.
    ///
    /// Returns `None` if no candidate has a finite distance.
    pub fn nearest_neighbor(&self, from: NodeId, candidates: &[NodeId]) -> Option<NodeId> {
        candidates
            .iter()
            .copied()
            .map(|c| (c, self.distance(from, c)))
            .filter(|(_, d)| d.is_finite())
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(c, _)| c)
    }

    fn index_of(&self, id: NodeId) -> Option<usize> {
        self.index.get(&id).copied()
    }
}

/// How a pair distance was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DistanceMethod {
    /// A* found a path.
    AStar,
    /// A* failed, Dijkstra found a path.
    Dijkstra,
    /// Both searches failed; planar straight-line estimate.
    StraightLine,
    /// No search succeeded and a coordinate was missing.
    Unavailable,
}

/// A pair distance with its provenance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PairEstimate {
    /// Distance, `+∞` when [`DistanceMethod::Unavailable`].
    pub distance: f64,
    /// Which step of the fallback chain produced it.
    pub method: DistanceMethod,
}

/// Distance from `from` to `to`, trying each method strictly in order:
/// A*, Dijkstra, straight line between the node coordinates, `+∞`.
///
/// # Examples
///
/// ```
/// use u_roadnet::distance::{estimate_pair_distance, DistanceMethod};
/// use u_roadnet::graph::RoadGraph;
/// use u_roadnet::search::SearchConfig;
///
/// let mut g = RoadGraph::new();
/// g.add_node(1, 0.0, 0.0).unwrap();
/// g.add_node(2, 0.0, 0.001).unwrap();
///
/// // No edge: both searches fail and the straight line is used.
/// let e = estimate_pair_distance(&g, 1, 2, &SearchConfig::default());
/// assert_eq!(e.method, DistanceMethod::StraightLine);
/// assert!(e.distance > 100.0);
///
/// let e = estimate_pair_distance(&g, 1, 3, &SearchConfig::default());
/// assert_eq!(e.method, DistanceMethod::Unavailable);
/// ```
pub fn estimate_pair_distance(
    graph: &RoadGraph,
    from: NodeId,
    to: NodeId,
    config: &SearchConfig,
) -> PairEstimate {
    let a_star_err = match a_star(graph, from, to, config) {
        Ok(r) => {
            return PairEstimate {
                distance: r.distance(),
                method: DistanceMethod::AStar,
            }
        }
        Err(e) => e,
    };
    let dijkstra_err = match dijkstra(graph, from, to, config) {
        Ok(r) => {
            warn!("a* {from} -> {to} failed ({a_star_err}); using dijkstra");
            return PairEstimate {
                distance: r.distance(),
                method: DistanceMethod::Dijkstra,
            };
        }
        Err(e) => e,
    };
    match (graph.node(from), graph.node(to)) {
        (Some(a), Some(b)) => {
            warn!("no road path {from} -> {to} ({dijkstra_err}); using straight-line estimate");
            PairEstimate {
                distance: planar_distance(a.coordinate(), b.coordinate()),
                method: DistanceMethod::StraightLine,
            }
        }
        _ => {
            warn!("no distance for {from} -> {to}: {dijkstra_err}");
            PairEstimate {
                distance: f64::INFINITY,
                method: DistanceMethod::Unavailable,
            }
        }
    }
}
