//! A* search: the kernel ordered by `g + h`.
//!
//! # Admissibility
//!
//! The default heuristic is [`PlanarHeuristic`], a straight-line distance on
//! a planar projection of the node coordinates. It is admissible only when
//! edge weights use that same metric. Road graphs whose weights were
//! computed geodesically can make it overestimate, and A* may then return a
//! longer path than Dijkstra would.
//!
//! # Reference
//!
//! Hart, P.E., Nilsson, N.J., Raphael, B. (1968). "A Formal Basis for the
//! Heuristic Determination of Minimum Cost Paths", *IEEE Transactions on
//! Systems Science and Cybernetics* 4(2), 100-107.

use log::debug;

use super::kernel::{label_setting, resolve};
use super::{reconstruct_path, AStarResult, Heuristic, PlanarHeuristic, SearchConfig, SearchResult};
use crate::error::SearchError;
use crate::graph::{NodeId, RoadGraph};

/// A* from `start` to `end` with the planar straight-line heuristic.
///
/// Fails like [`dijkstra`](super::dijkstra): `UnknownNode`, `NoPathExists`,
/// `IterationLimitExceeded`.
///
/// # Examples
///
/// ```
/// use u_roadnet::graph::{planar_distance, RoadGraph};
/// use u_roadnet::search::{a_star, SearchConfig};
///
/// let mut g = RoadGraph::new();
/// g.add_node(1, 0.000, 0.000).unwrap();
/// g.add_node(2, 0.000, 0.001).unwrap();
/// g.add_node(3, 0.000, 0.002).unwrap();
/// for (u, v) in [(1, 2), (2, 3)] {
///     let w = planar_distance(g.node(u).unwrap().coordinate(), g.node(v).unwrap().coordinate());
///     g.add_edge(u, v, w).unwrap();
/// }
///
/// let r = a_star(&g, 1, 3, &SearchConfig::default()).unwrap();
/// assert_eq!(r.path(), &[1, 2, 3]);
/// assert!(r.nodes_evaluated() >= r.nodes_visited());
/// ```
pub fn a_star(
    graph: &RoadGraph,
    start: NodeId,
    end: NodeId,
    config: &SearchConfig,
) -> Result<AStarResult, SearchError> {
    let target = resolve(graph, end)?;
    let heuristic = PlanarHeuristic::towards(graph.node_at(target));
    a_star_with(graph, start, end, &heuristic, config)
}

/// A* from `start` to `end` with a caller-supplied heuristic.
pub fn a_star_with<H>(
    graph: &RoadGraph,
    start: NodeId,
    end: NodeId,
    heuristic: &H,
    config: &SearchConfig,
) -> Result<AStarResult, SearchError>
where
    H: Heuristic + ?Sized,
{
    let source = resolve(graph, start)?;
    let target = resolve(graph, end)?;
    debug!("a* {start} -> {end}");

    let labels = label_setting(graph, source, Some(target), heuristic, config)?;
    let distance = labels.g[target];
    if distance == f64::INFINITY {
        return Err(SearchError::NoPathExists { start, end });
    }

    let predecessors = labels.predecessor_map(graph);
    let path = reconstruct_path(&predecessors, start, end)?;
    debug!(
        "a* {start} -> {end}: distance={distance:.3}, evaluated={}, visited={}",
        labels.stats.nodes_evaluated, labels.stats.nodes_visited
    );

    Ok(AStarResult {
        f_costs: labels.f_cost_map(graph),
        search: SearchResult {
            distance,
            path,
            distances: labels.distance_map(graph),
            predecessors,
            stats: labels.stats,
        },
    })
}
