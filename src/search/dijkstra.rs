//! Dijkstra's algorithm: the kernel with a zero heuristic.
//!
//! # Reference
//!
//! Dijkstra, E.W. (1959). "A note on two problems in connexion with graphs",
//! *Numerische Mathematik* 1, 269-271.

use std::collections::HashMap;

use log::{debug, warn};

use super::kernel::{label_setting, resolve};
use super::{reconstruct_path, PairPath, SearchConfig, SearchResult, ShortestDistances, ZeroHeuristic};
use crate::error::SearchError;
use crate::graph::{NodeId, RoadGraph};

/// Shortest path from `start` to `end`.
///
/// Stops as soon as `end` is finalized.
///
/// # Errors
///
/// - [`SearchError::UnknownNode`] if either endpoint is not in the graph
/// - [`SearchError::NoPathExists`] if `end` is unreachable
/// - [`SearchError::IterationLimitExceeded`] if the search needs more than
///   `config.max_iterations` pops
///
/// # Examples
///
/// ```
/// use u_roadnet::graph::RoadGraph;
/// use u_roadnet::search::{dijkstra, SearchConfig};
///
/// let mut g = RoadGraph::new();
/// for id in 1..=5 {
///     g.add_node(id, 0.0, 0.0).unwrap();
/// }
/// for (u, v, w) in [(1, 2, 1.0), (2, 3, 2.0), (3, 4, 1.5), (4, 5, 2.5)] {
///     g.add_edge(u, v, w).unwrap();
/// }
///
/// let result = dijkstra(&g, 1, 5, &SearchConfig::default()).unwrap();
/// assert_eq!(result.distance(), 7.0);
/// assert_eq!(result.path(), &[1, 2, 3, 4, 5]);
/// ```
pub fn dijkstra(
    graph: &RoadGraph,
    start: NodeId,
    end: NodeId,
    config: &SearchConfig,
) -> Result<SearchResult, SearchError> {
    let source = resolve(graph, start)?;
    let target = resolve(graph, end)?;
    debug!("dijkstra {start} -> {end}");

    let labels = label_setting(graph, source, Some(target), &ZeroHeuristic, config)?;
    let distance = labels.g[target];
    if distance == f64::INFINITY {
        return Err(SearchError::NoPathExists { start, end });
    }

    let predecessors = labels.predecessor_map(graph);
    let path = reconstruct_path(&predecessors, start, end)?;
    debug!(
        "dijkstra {start} -> {end}: distance={distance:.3}, {} iterations",
        labels.stats.iterations
    );

    Ok(SearchResult {
        distance,
        path,
        distances: labels.distance_map(graph),
        predecessors,
        stats: labels.stats,
    })
}

/// Single-source shortest distances from `start` to every reachable node.
///
/// This is the "no destination" form of [`dijkstra`]: the search runs until
/// the queue drains.
///
/// # Examples
///
/// ```
/// use u_roadnet::graph::RoadGraph;
/// use u_roadnet::search::{shortest_distances, SearchConfig};
///
/// let mut g = RoadGraph::new();
/// for id in 1..=3 {
///     g.add_node(id, 0.0, 0.0).unwrap();
/// }
/// g.add_edge(1, 2, 4.0).unwrap();
///
/// let all = shortest_distances(&g, 1, &SearchConfig::default()).unwrap();
/// assert_eq!(all.distance_to(2), 4.0);
/// assert_eq!(all.distance_to(3), f64::INFINITY);
/// ```
pub fn shortest_distances(
    graph: &RoadGraph,
    start: NodeId,
    config: &SearchConfig,
) -> Result<ShortestDistances, SearchError> {
    let source = resolve(graph, start)?;
    let labels = label_setting(graph, source, None, &ZeroHeuristic, config)?;
    Ok(ShortestDistances {
        source: start,
        distances: labels.distance_map(graph),
        predecessors: labels.predecessor_map(graph),
        stats: labels.stats,
    })
}

/// Shortest paths between every ordered pair of distinct nodes.
///
/// Runs one single-source search per node. Unreachable pairs map to
/// `None`. A source whose search fails (iteration cap) maps every target to
/// `None` and is logged.
pub fn dijkstra_all_pairs(
    graph: &RoadGraph,
    config: &SearchConfig,
) -> HashMap<NodeId, HashMap<NodeId, Option<PairPath>>> {
    let mut results = HashMap::with_capacity(graph.node_count());

    for source in graph.node_ids() {
        let tree = match shortest_distances(graph, source, config) {
            Ok(tree) => Some(tree),
            Err(e) => {
                warn!("all-pairs search from {source} failed: {e}");
                None
            }
        };

        let row: HashMap<NodeId, Option<PairPath>> = graph
            .node_ids()
            .filter(|&target| target != source)
            .map(|target| {
                let pair = tree.as_ref().and_then(|t| {
                    let path = t.path_to(target).ok()?;
                    Some(PairPath {
                        distance: t.distance_to(target),
                        path,
                    })
                });
                (target, pair)
            })
            .collect();
        results.insert(source, row);
    }

    results
}

#[cfg(test)]
mod tests {
    use super::*;

    const A: NodeId = 1;
    const B: NodeId = 2;
    const C: NodeId = 3;
    const D: NodeId = 4;
    const E: NodeId = 5;

    fn line() -> RoadGraph {
        let mut g = RoadGraph::new();
        for id in [A, B, C, D, E] {
            g.add_node(id, 0.0, 0.0).expect("valid");
        }
        for (u, v, w) in [(A, B, 1.0), (B, C, 2.0), (C, D, 1.5), (D, E, 2.5)] {
            g.add_edge(u, v, w).expect("valid");
        }
        g
    }

    #[test]
    fn test_line_scenario() {
        let g = line();
        let r = dijkstra(&g, A, E, &SearchConfig::default()).expect("reachable");
        assert!((r.distance() - 7.0).abs() < 1e-12);
        assert_eq!(r.path(), &[A, B, C, D, E]);
        assert_eq!(r.nodes_visited(), 5);
        assert_eq!(r.distance_to(C), 3.0);
        assert_eq!(r.predecessors().get(&E), Some(&D));
    }

    #[test]
    fn test_start_is_end() {
        let g = line();
        let r = dijkstra(&g, C, C, &SearchConfig::default()).expect("trivial");
        assert_eq!(r.distance(), 0.0);
        assert_eq!(r.path(), &[C]);
    }

    #[test]
    fn test_unknown_nodes() {
        let g = line();
        let config = SearchConfig::default();
        assert_eq!(
            dijkstra(&g, 42, E, &config).err(),
            Some(SearchError::UnknownNode(42))
        );
        assert_eq!(
            dijkstra(&g, A, 43, &config).err(),
            Some(SearchError::UnknownNode(43))
        );
    }

    #[test]
    fn test_no_path_against_edge_direction() {
        let g = line();
        assert_eq!(
            dijkstra(&g, E, A, &SearchConfig::default()).err(),
            Some(SearchError::NoPathExists { start: E, end: A })
        );
    }

    #[test]
    fn test_prefers_cheaper_detour() {
        let mut g = line();
        g.add_edge(A, E, 10.0).expect("valid");
        g.add_edge(B, D, 3.0).expect("valid");
        let r = dijkstra(&g, A, E, &SearchConfig::default()).expect("reachable");
        assert!((r.distance() - 6.5).abs() < 1e-12);
        assert_eq!(r.path(), &[A, B, D, E]);
    }

    #[test]
    fn test_early_exit_leaves_far_nodes_unvisited() {
        let g = line();
        let r = dijkstra(&g, A, B, &SearchConfig::default()).expect("reachable");
        assert_eq!(r.nodes_visited(), 2);
        assert_eq!(r.distance_to(E), f64::INFINITY);
    }

    #[test]
    fn test_iteration_limit() {
        let g = line();
        let config = SearchConfig::default().with_max_iterations(3);
        assert_eq!(
            dijkstra(&g, A, E, &config).err(),
            Some(SearchError::IterationLimitExceeded { limit: 3 })
        );
    }

    #[test]
    fn test_shortest_distances_full_map() {
        let g = line();
        let all = shortest_distances(&g, B, &SearchConfig::default()).expect("known node");
        assert_eq!(all.source(), B);
        assert_eq!(all.distances().len(), 4);
        assert_eq!(all.distance_to(E), 6.0);
        assert_eq!(all.distance_to(A), f64::INFINITY);
        assert_eq!(all.path_to(E).expect("reachable"), vec![B, C, D, E]);
        assert!(matches!(
            all.path_to(A),
            Err(SearchError::NoPathExists { start: B, end: A })
        ));
    }

    #[test]
    fn test_all_pairs() {
        let g = line();
        let all = dijkstra_all_pairs(&g, &SearchConfig::default());
        assert_eq!(all.len(), 5);
        assert_eq!(all[&A].len(), 4);
        let ae = all[&A][&E].as_ref().expect("reachable");
        assert!((ae.distance - 7.0).abs() < 1e-12);
        assert_eq!(ae.path, vec![A, B, C, D, E]);
        assert!(all[&E][&A].is_none());
    }

    #[test]
    fn test_display() {
        let g = line();
        let r = dijkstra(&g, A, C, &SearchConfig::default()).expect("reachable");
        let text = r.to_string();
        assert!(text.contains("distance: 3.00"));
        assert!(text.contains("1 -> 2 -> 3"));
    }

    #[test]
    fn test_negative_weight_is_relaxed_mechanically() {
        let mut g = RoadGraph::new();
        for id in 1..=3 {
            g.add_node(id, 0.0, 0.0).expect("valid");
        }
        g.add_edge(1, 2, 1.0).expect("valid");
        g.add_edge(1, 3, 2.0).expect("valid");
        g.add_edge(3, 2, -5.0).expect("valid");
        // 2 is finalized at 1.0 before 3 is popped; the cheaper -3.0 route is
        // never seen. This is the documented limitation.
        let r = dijkstra(&g, 1, 2, &SearchConfig::default()).expect("reachable");
        assert_eq!(r.distance(), 1.0);
    }
}
