//! Directed weighted road graph with node coordinates.

use std::collections::HashMap;

use serde::Deserialize;

use super::Coordinate;
use crate::error::GraphError;

/// Identifier of a road-network node (OSM-style numeric id).
pub type NodeId = u64;

/// A graph node: id plus position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Node {
    id: NodeId,
    coordinate: Coordinate,
}

impl Node {
    /// Node id.
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Node position.
    pub fn coordinate(&self) -> &Coordinate {
        &self.coordinate
    }
}

/// An outgoing edge as seen from its tail node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    /// Head node.
    pub target: NodeId,
    /// Traversal cost.
    pub weight: f64,
}

/// Dense-index form of an edge used inside searches.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Arc {
    pub(crate) head: usize,
    pub(crate) weight: f64,
}

/// A directed, weighted road graph.
///
/// Node ids are mapped to dense indices so that searches can keep their
/// labels in vectors. Once built, the graph is only read; any number of
/// searches may borrow it concurrently.
///
/// Weights must be finite. Negative weights are stored as given, but the
/// label-setting searches do not guarantee optimal results on them.
///
/// # Examples
///
/// ```
/// use u_roadnet::graph::RoadGraph;
///
/// let mut g = RoadGraph::new();
/// g.add_node(1, -9.650, -35.720).unwrap();
/// g.add_node(2, -9.651, -35.721).unwrap();
/// g.add_edge(1, 2, 150.0).unwrap();
///
/// assert_eq!(g.node_count(), 2);
/// assert_eq!(g.edge_weight(1, 2), Some(150.0));
/// assert_eq!(g.edge_weight(2, 1), None);
/// ```
#[derive(Debug, Clone, Default)]
pub struct RoadGraph {
    nodes: Vec<Node>,
    index: HashMap<NodeId, usize>,
    adjacency: Vec<Vec<Arc>>,
    edge_count: usize,
}

impl RoadGraph {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a node, or moves it if the id already exists.
    pub fn add_node(&mut self, id: NodeId, lat: f64, lon: f64) -> Result<(), GraphError> {
        let coordinate =
            Coordinate::new(lat, lon).ok_or(GraphError::InvalidCoordinate { id, lat, lon })?;
        match self.index.get(&id) {
            Some(&idx) => self.nodes[idx].coordinate = coordinate,
            None => {
                self.index.insert(id, self.nodes.len());
                self.nodes.push(Node { id, coordinate });
                self.adjacency.push(Vec::new());
            }
        }
        Ok(())
    }

    /// Adds a directed edge. Both endpoints must already exist.
    ///
    /// A second edge between the same ordered pair keeps the lighter weight.
    pub fn add_edge(&mut self, source: NodeId, target: NodeId, weight: f64) -> Result<(), GraphError> {
        if !weight.is_finite() {
            return Err(GraphError::InvalidWeight {
                source_id: source,
                target_id: target,
                weight,
            });
        }
        let tail = self.index_of(source).ok_or(GraphError::UnknownEndpoint(source))?;
        let head = self.index_of(target).ok_or(GraphError::UnknownEndpoint(target))?;

        let arcs = &mut self.adjacency[tail];
        match arcs.iter_mut().find(|a| a.head == head) {
            Some(existing) => existing.weight = existing.weight.min(weight),
            None => {
                arcs.push(Arc { head, weight });
                self.edge_count += 1;
            }
        }
        Ok(())
    }

    /// Adds edges in both directions with the same weight.
    pub fn add_two_way_edge(&mut self, a: NodeId, b: NodeId, weight: f64) -> Result<(), GraphError> {
        self.add_edge(a, b, weight)?;
        self.add_edge(b, a, weight)
    }

    /// Parses a directed node-link JSON document.
    ///
    /// Nodes need `id`, `lat` and `lon`; links need `source` and `target`
    /// and take `weight` = 1.0 when it is absent.
    ///
    /// # Examples
    ///
    /// ```
    /// use u_roadnet::graph::RoadGraph;
    ///
    /// let json = r#"{
    ///     "nodes": [
    ///         {"id": 1, "lat": -9.650, "lon": -35.720},
    ///         {"id": 2, "lat": -9.651, "lon": -35.721}
    ///     ],
    ///     "links": [{"source": 1, "target": 2, "weight": 150.0}]
    /// }"#;
    /// let g = RoadGraph::from_node_link_json(json).unwrap();
    /// assert_eq!(g.edge_count(), 1);
    /// ```
    pub fn from_node_link_json(json: &str) -> Result<Self, GraphError> {
        let doc: NodeLinkDocument = serde_json::from_str(json)?;
        let mut graph = Self::new();
        for node in &doc.nodes {
            graph.add_node(node.id, node.lat, node.lon)?;
        }
        for link in &doc.links {
            graph.add_edge(link.source, link.target, link.weight)?;
        }
        Ok(graph)
    }

    /// Number of nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of directed edges.
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// Returns `true` if the graph has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns `true` if `id` is a node of this graph.
    pub fn contains(&self, id: NodeId) -> bool {
        self.index.contains_key(&id)
    }

    /// Looks up a node.
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.index_of(id).map(|idx| &self.nodes[idx])
    }

    /// Node ids in insertion order.
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.iter().map(|n| n.id)
    }

    /// Outgoing edges of `id`; empty for unknown nodes.
    pub fn neighbors(&self, id: NodeId) -> impl Iterator<Item = Edge> + '_ {
        let arcs: &[Arc] = match self.index_of(id) {
            Some(idx) => &self.adjacency[idx],
            None => &[],
        };
        arcs.iter().map(|a| Edge {
            target: self.nodes[a.head].id,
            weight: a.weight,
        })
    }

    /// Weight of the edge `source -> target`, if present.
    pub fn edge_weight(&self, source: NodeId, target: NodeId) -> Option<f64> {
        let tail = self.index_of(source)?;
        let head = self.index_of(target)?;
        self.adjacency[tail]
            .iter()
            .find(|a| a.head == head)
            .map(|a| a.weight)
    }

    pub(crate) fn index_of(&self, id: NodeId) -> Option<usize> {
        self.index.get(&id).copied()
    }

    pub(crate) fn node_at(&self, idx: usize) -> &Node {
        &self.nodes[idx]
    }

    pub(crate) fn arcs(&self, idx: usize) -> &[Arc] {
        &self.adjacency[idx]
    }
}

#[derive(Deserialize)]
struct NodeLinkDocument {
    nodes: Vec<NodeLinkNode>,
    #[serde(default, alias = "edges")]
    links: Vec<NodeLinkEdge>,
}

#[derive(Deserialize)]
struct NodeLinkNode {
    id: NodeId,
    lat: f64,
    lon: f64,
}

#[derive(Deserialize)]
struct NodeLinkEdge {
    source: NodeId,
    target: NodeId,
    #[serde(default = "default_weight")]
    weight: f64,
}

fn default_weight() -> f64 {
    1.0
}
