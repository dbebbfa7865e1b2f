//! The label-setting loop shared by Dijkstra and A*.
//!
//! # Algorithm
//!
//! Pop the node with the smallest `g + h`; skip it if it is already
//! finalized (stale duplicate); otherwise finalize it and relax its outgoing
//! edges to unfinalized neighbors, pushing every neighbor whose `g`
//! improves. With `h = 0` this is Dijkstra.
//!
//! With non-negative weights and a consistent `h`, finalized labels are
//! exact. Negative weights are relaxed mechanically but the result may not
//! be optimal.

use std::collections::HashMap;

use log::trace;

use super::{Heuristic, SearchConfig, SearchStats};
use crate::error::SearchError;
use crate::graph::{NodeId, RoadGraph};
use crate::queue::MinHeapQueue;

/// Labels left behind by one run of the kernel, indexed densely.
pub(crate) struct Labels {
    pub(crate) g: Vec<f64>,
    pub(crate) f: Vec<f64>,
    pub(crate) pred: Vec<Option<usize>>,
    pub(crate) stats: SearchStats,
}

impl Labels {
    /// `g` of every labelled node; unreached nodes are absent.
    pub(crate) fn distance_map(&self, graph: &RoadGraph) -> HashMap<NodeId, f64> {
        Self::finite_map(&self.g, graph)
    }

    /// `f` at the time of each node's last push.
    pub(crate) fn f_cost_map(&self, graph: &RoadGraph) -> HashMap<NodeId, f64> {
        Self::finite_map(&self.f, graph)
    }

    pub(crate) fn predecessor_map(&self, graph: &RoadGraph) -> HashMap<NodeId, NodeId> {
        self.pred
            .iter()
            .enumerate()
            .filter_map(|(idx, p)| p.map(|p| (graph.node_at(idx).id(), graph.node_at(p).id())))
            .collect()
    }

    fn finite_map(values: &[f64], graph: &RoadGraph) -> HashMap<NodeId, f64> {
        values
            .iter()
            .enumerate()
            .filter(|(_, v)| v.is_finite())
            .map(|(idx, &v)| (graph.node_at(idx).id(), v))
            .collect()
    }
}

/// Runs the label-setting search from `source`, stopping early once
/// `target` is finalized.
pub(crate) fn label_setting<H>(
    graph: &RoadGraph,
    source: usize,
    target: Option<usize>,
    heuristic: &H,
    config: &SearchConfig,
) -> Result<Labels, SearchError>
where
    H: Heuristic + ?Sized,
{
    let n = graph.node_count();
    let mut g = vec![f64::INFINITY; n];
    let mut f = vec![f64::INFINITY; n];
    let mut pred: Vec<Option<usize>> = vec![None; n];
    let mut visited = vec![false; n];
    let mut stats = SearchStats::default();

    let mut queue = MinHeapQueue::new();
    g[source] = 0.0;
    f[source] = heuristic.estimate(graph.node_at(source));
    queue.insert(source, f[source])?;
    stats.nodes_evaluated = 1;

    while !queue.is_empty() {
        if stats.iterations >= config.max_iterations {
            return Err(SearchError::IterationLimitExceeded {
                limit: config.max_iterations,
            });
        }
        stats.iterations += 1;

        let current = queue.extract_min()?;
        if visited[current] {
            continue;
        }
        visited[current] = true;
        stats.nodes_visited += 1;

        if Some(current) == target {
            break;
        }

        let base = g[current];
        for arc in graph.arcs(current) {
            let next = arc.head;
            if visited[next] {
                continue;
            }
            let tentative = base + arc.weight;
            if tentative < g[next] {
                g[next] = tentative;
                pred[next] = Some(current);
                f[next] = tentative + heuristic.estimate(graph.node_at(next));
                queue.insert(next, f[next])?;
                stats.nodes_evaluated += 1;
                trace!(
                    "relaxed {} -> {}: g={tentative:.3}",
                    graph.node_at(current).id(),
                    graph.node_at(next).id()
                );
            }
        }
    }

    Ok(Labels { g, f, pred, stats })
}

/// Resolves a node id to its dense index.
pub(crate) fn resolve(graph: &RoadGraph, id: NodeId) -> Result<usize, SearchError> {
    graph.index_of(id).ok_or(SearchError::UnknownNode(id))
}
