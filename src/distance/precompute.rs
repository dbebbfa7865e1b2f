//! Resumable batch precomputation of A* distances between node pairs.
//!
//! Every ordered pair `(u, v)` with `u != v` of the selected node set is
//! searched once and written to a [`DistanceStore`]. Rows are buffered and
//! flushed every `chunk_size` rows, so an interrupted run loses at most one
//! partial chunk and a rerun with `resume` picks up where it stopped.

use std::collections::HashSet;
use std::path::Path;

use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::seq::index;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use super::store::{CacheRecord, CsvDistanceStore, DistanceStore};
use crate::error::PrecomputeError;
use crate::graph::{NodeId, RoadGraph};
use crate::search::{a_star, SearchConfig};

/// Settings for one precompute run.
///
/// # Examples
///
/// ```
/// use u_roadnet::distance::PrecomputeConfig;
///
/// let config = PrecomputeConfig::default()
///     .with_sample_size(50)
///     .with_seed(7)
///     .with_chunk_size(10);
/// assert!(config.resume);
/// assert_eq!(config.sample_size, 50);
/// assert_eq!(config.seed, Some(7));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrecomputeConfig {
    /// Explicit node set. When `None`, `sample_size` nodes are drawn at random.
    pub nodes: Option<Vec<NodeId>>,
    /// Number of nodes to sample when no explicit set is given.
    pub sample_size: usize,
    /// Seed for the node sample. `None` draws from the thread RNG.
    pub seed: Option<u64>,
    /// Skip pairs already in the store instead of starting over.
    pub resume: bool,
    /// Rows buffered between flushes. Zero is treated as one.
    pub chunk_size: usize,
    /// Limits for each A* call.
    pub search: SearchConfig,
}

impl PrecomputeConfig {
    /// Uses exactly these nodes.
    pub fn with_nodes(mut self, nodes: Vec<NodeId>) -> Self {
        self.nodes = Some(nodes);
        self
    }

    /// Sets the random sample size.
    pub fn with_sample_size(mut self, sample_size: usize) -> Self {
        self.sample_size = sample_size;
        self
    }

    /// Makes the sample reproducible.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Enables or disables resuming from the existing store.
    pub fn with_resume(mut self, resume: bool) -> Self {
        self.resume = resume;
        self
    }

    /// Sets the flush interval.
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    /// Sets the per-search iteration cap.
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.search.max_iterations = max_iterations;
        self
    }
}

impl Default for PrecomputeConfig {
    fn default() -> Self {
        Self {
            nodes: None,
            sample_size: 20,
            seed: None,
            resume: true,
            chunk_size: 100,
            search: SearchConfig::default(),
        }
    }
}

/// Counters for one precompute run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PrecomputeReport {
    /// Rows appended to the store by this run.
    pub rows_written: usize,
    /// Pairs skipped because the store already had them.
    pub skipped: usize,
    /// Rows written with the unreachable sentinel.
    pub unreachable: usize,
    /// Appends issued to the store.
    pub chunks_flushed: usize,
}

/// Node set a run will cover.
///
/// An explicit list is deduplicated with its order kept. Otherwise a
/// random sample of `sample_size` nodes is drawn (every node when the graph
/// is smaller) and returned in ascending id order.
///
/// # Errors
///
/// [`PrecomputeError::EmptyGraph`] if the graph has no nodes.
pub fn select_nodes(
    graph: &RoadGraph,
    config: &PrecomputeConfig,
) -> Result<Vec<NodeId>, PrecomputeError> {
    if graph.is_empty() {
        return Err(PrecomputeError::EmptyGraph);
    }

    if let Some(explicit) = &config.nodes {
        let mut seen = HashSet::with_capacity(explicit.len());
        return Ok(explicit
            .iter()
            .copied()
            .filter(|id| seen.insert(*id))
            .collect());
    }

    let mut ids: Vec<NodeId> = graph.node_ids().collect();
    ids.sort_unstable();
    if config.sample_size >= ids.len() {
        return Ok(ids);
    }

    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_rng(&mut rand::rng()),
    };
    let mut sample: Vec<NodeId> = index::sample(&mut rng, ids.len(), config.sample_size)
        .into_iter()
        .map(|i| ids[i])
        .collect();
    sample.sort_unstable();
    Ok(sample)
}

/// Runs the pipeline against any [`DistanceStore`].
///
/// With `resume` the pairs already in the store are skipped; without it
/// the store is reset first. A pair whose search fails for any reason is
/// recorded as unreachable and the run continues. A store failure aborts
/// the run; chunks flushed before it stay durable.
pub fn precompute_into<S>(
    graph: &RoadGraph,
    config: &PrecomputeConfig,
    store: &mut S,
) -> Result<PrecomputeReport, PrecomputeError>
where
    S: DistanceStore + ?Sized,
{
    let nodes = select_nodes(graph, config)?;
    let chunk_size = config.chunk_size.max(1);

    let done = if config.resume {
        store.completed_pairs()?
    } else {
        store.reset()?;
        HashSet::new()
    };
    info!(
        "precomputing {} nodes ({} pairs), {} already stored",
        nodes.len(),
        nodes.len() * nodes.len().saturating_sub(1),
        done.len()
    );

    let mut report = PrecomputeReport::default();
    let mut attempted: HashSet<(NodeId, NodeId)> = HashSet::new();
    let mut buffer: Vec<CacheRecord> = Vec::with_capacity(chunk_size);

    for &u in &nodes {
        for &v in &nodes {
            if u == v {
                continue;
            }
            if done.contains(&(u, v)) {
                report.skipped += 1;
                continue;
            }
            if !attempted.insert((u, v)) {
                continue;
            }

            let record = match a_star(graph, u, v, &config.search) {
                Ok(result) => {
                    let distance = result.distance();
                    CacheRecord::reachable(u, v, distance, result.into_search().into_path())
                }
                Err(e) => {
                    warn!("pair {u} -> {v} recorded as unreachable: {e}");
                    report.unreachable += 1;
                    CacheRecord::unreachable(u, v)
                }
            };
            buffer.push(record);

            if buffer.len() >= chunk_size {
                flush(store, &mut buffer, &mut report)?;
            }
        }
    }
    flush(store, &mut buffer, &mut report)?;

    info!(
        "precompute finished: {} written, {} skipped, {} unreachable",
        report.rows_written, report.skipped, report.unreachable
    );
    Ok(report)
}

/// Runs the pipeline against a CSV store at `store_path`.
///
/// # Examples
///
/// ```
/// use u_roadnet::distance::{precompute_distances, PrecomputeConfig};
/// use u_roadnet::graph::RoadGraph;
///
/// let mut g = RoadGraph::new();
/// g.add_node(1, 0.0, 0.0).unwrap();
/// g.add_node(2, 0.0, 0.001).unwrap();
/// g.add_two_way_edge(1, 2, 120.0).unwrap();
///
/// let dir = tempfile::tempdir().unwrap();
/// let path = dir.path().join("distances.csv");
/// let config = PrecomputeConfig::default();
///
/// let first = precompute_distances(&g, &config, &path).unwrap();
/// assert_eq!(first.rows_written, 2);
/// let second = precompute_distances(&g, &config, &path).unwrap();
/// assert_eq!(second.rows_written, 0);
/// assert_eq!(second.skipped, 2);
/// ```
pub fn precompute_distances(
    graph: &RoadGraph,
    config: &PrecomputeConfig,
    store_path: impl AsRef<Path>,
) -> Result<PrecomputeReport, PrecomputeError> {
    let mut store = CsvDistanceStore::new(store_path.as_ref());
    precompute_into(graph, config, &mut store)
}

fn flush<S>(
    store: &mut S,
    buffer: &mut Vec<CacheRecord>,
    report: &mut PrecomputeReport,
) -> Result<(), PrecomputeError>
where
    S: DistanceStore + ?Sized,
{
    if buffer.is_empty() {
        return Ok(());
    }
    store.append(buffer)?;
    report.rows_written += buffer.len();
    report.chunks_flushed += 1;
    debug!("flushed {} rows", buffer.len());
    buffer.clear();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::PairOutcome;
    use crate::error::StoreError;
    use std::io;

    #[derive(Default)]
    struct MemoryStore {
        rows: Vec<CacheRecord>,
        appends: usize,
        fail_on_append: Option<usize>,
    }

    impl DistanceStore for MemoryStore {
        fn completed_pairs(&self) -> Result<HashSet<(NodeId, NodeId)>, StoreError> {
            Ok(self.rows.iter().map(CacheRecord::key).collect())
        }

        fn append(&mut self, records: &[CacheRecord]) -> Result<(), StoreError> {
            self.appends += 1;
            if self.fail_on_append == Some(self.appends) {
                return Err(StoreError::Io(io::Error::other("disk full")));
            }
            self.rows.extend_from_slice(records);
            Ok(())
        }

        fn reset(&mut self) -> Result<(), StoreError> {
            self.rows.clear();
            Ok(())
        }
    }

    /// 1 <-> 2 <-> 3 plus an isolated node 4.
    fn graph() -> RoadGraph {
        let mut g = RoadGraph::new();
        g.add_node(1, 0.0, 0.0).expect("valid");
        g.add_node(2, 0.0, 0.001).expect("valid");
        g.add_node(3, 0.0, 0.002).expect("valid");
        g.add_node(4, 0.01, 0.01).expect("valid");
        g.add_two_way_edge(1, 2, 120.0).expect("valid");
        g.add_two_way_edge(2, 3, 130.0).expect("valid");
        g
    }

    #[test]
    fn test_select_explicit_nodes_dedup_keeps_order() {
        let config = PrecomputeConfig::default().with_nodes(vec![3, 1, 3, 2, 1]);
        assert_eq!(select_nodes(&graph(), &config).expect("nodes"), vec![3, 1, 2]);
    }

    #[test]
    fn test_select_sample_is_reproducible() {
        let config = PrecomputeConfig::default().with_sample_size(2).with_seed(11);
        let a = select_nodes(&graph(), &config).expect("nodes");
        let b = select_nodes(&graph(), &config).expect("nodes");
        assert_eq!(a, b);
        assert_eq!(a.len(), 2);
        assert!(a.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_select_small_graph_takes_all() {
        let config = PrecomputeConfig::default().with_sample_size(10);
        assert_eq!(select_nodes(&graph(), &config).expect("nodes"), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_empty_graph() {
        let mut store = MemoryStore::default();
        let result = precompute_into(&RoadGraph::new(), &PrecomputeConfig::default(), &mut store);
        assert!(matches!(result, Err(PrecomputeError::EmptyGraph)));
    }

    #[test]
    fn test_every_ordered_pair_written_once() {
        let mut store = MemoryStore::default();
        let config = PrecomputeConfig::default().with_chunk_size(5);
        let report = precompute_into(&graph(), &config, &mut store).expect("run");

        assert_eq!(report.rows_written, 12);
        assert_eq!(report.chunks_flushed, 3);
        assert_eq!(report.unreachable, 6);
        let keys: HashSet<_> = store.rows.iter().map(CacheRecord::key).collect();
        assert_eq!(keys.len(), 12);

        let row = store
            .rows
            .iter()
            .find(|r| r.key() == (1, 3))
            .expect("stored");
        assert_eq!(
            row.outcome,
            PairOutcome::Reachable {
                distance: 250.0,
                path: vec![1, 2, 3]
            }
        );
    }

    #[test]
    fn test_resume_writes_nothing_new() {
        let mut store = MemoryStore::default();
        let config = PrecomputeConfig::default();
        precompute_into(&graph(), &config, &mut store).expect("run");
        let report = precompute_into(&graph(), &config, &mut store).expect("rerun");
        assert_eq!(report.rows_written, 0);
        assert_eq!(report.skipped, 12);
        assert_eq!(store.rows.len(), 12);
    }

    #[test]
    fn test_no_resume_resets_store() {
        let mut store = MemoryStore::default();
        let config = PrecomputeConfig::default().with_resume(false);
        precompute_into(&graph(), &config, &mut store).expect("run");
        let report = precompute_into(&graph(), &config, &mut store).expect("rerun");
        assert_eq!(report.rows_written, 12);
        assert_eq!(store.rows.len(), 12);
    }

    #[test]
    fn test_iteration_cap_becomes_unreachable_row() {
        let mut store = MemoryStore::default();
        let config = PrecomputeConfig::default()
            .with_nodes(vec![1, 3])
            .with_max_iterations(1);
        let report = precompute_into(&graph(), &config, &mut store).expect("run");
        assert_eq!(report.rows_written, 2);
        assert_eq!(report.unreachable, 2);
    }

    #[test]
    fn test_store_failure_aborts_and_resume_completes() {
        let mut store = MemoryStore {
            fail_on_append: Some(2),
            ..MemoryStore::default()
        };
        let config = PrecomputeConfig::default().with_chunk_size(4);
        let result = precompute_into(&graph(), &config, &mut store);
        assert!(matches!(result, Err(PrecomputeError::Store(_))));
        assert_eq!(store.rows.len(), 4);

        store.fail_on_append = None;
        let report = precompute_into(&graph(), &config, &mut store).expect("resume");
        assert_eq!(report.skipped, 4);
        assert_eq!(report.rows_written, 8);
        let keys: HashSet<_> = store.rows.iter().map(CacheRecord::key).collect();
        assert_eq!(keys.len(), 12);
        assert_eq!(store.rows.len(), 12);
    }
}
