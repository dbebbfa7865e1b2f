//! Error types shared across the crate.

use thiserror::Error;

use crate::graph::NodeId;

/// Errors from [`crate::queue::MinHeapQueue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum QueueError {
    /// `extract_min` was called on an empty queue.
    #[error("extract_min called on an empty priority queue")]
    EmptyQueue,
    /// The priority was NaN and cannot be ordered.
    #[error("priority must be a number")]
    InvalidPriority,
}

/// Errors from the shortest-path kernel and path reconstruction.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SearchError {
    /// The start or end node does not exist in the graph.
    #[error("node {0} does not exist in the graph")]
    UnknownNode(NodeId),
    /// The end node cannot be reached from the start node.
    #[error("no path from {start} to {end}")]
    NoPathExists {
        /// Search origin.
        start: NodeId,
        /// Requested destination.
        end: NodeId,
    },
    /// The search needed more pops than the configured cap.
    #[error("search exceeded {limit} iterations")]
    IterationLimitExceeded {
        /// The configured `max_iterations`.
        limit: usize,
    },
    /// Walking the predecessor map from `end` never reached `start`.
    ///
    /// Signals an inconsistent predecessor map, not a user error.
    #[error("predecessor chain from {end} does not reach {start}")]
    BrokenChain {
        /// Expected first node of the path.
        start: NodeId,
        /// Node the walk started from.
        end: NodeId,
    },
    /// The priority queue rejected an operation.
    #[error(transparent)]
    Queue(#[from] QueueError),
}

/// Errors raised while assembling a [`crate::graph::RoadGraph`].
#[derive(Debug, Error)]
pub enum GraphError {
    /// Latitude or longitude is outside its valid range or not finite.
    #[error("node {id} has invalid coordinates ({lat}, {lon})")]
    InvalidCoordinate {
        /// Offending node.
        id: NodeId,
        /// Latitude in degrees.
        lat: f64,
        /// Longitude in degrees.
        lon: f64,
    },
    /// Edge weight is not a finite number.
    #[error("edge {source_id} -> {target_id} has non-finite weight {weight}")]
    InvalidWeight {
        /// Edge tail.
        source_id: NodeId,
        /// Edge head.
        target_id: NodeId,
        /// Rejected weight.
        weight: f64,
    },
    /// Edge references a node that was never added.
    #[error("edge endpoint {0} is not a node of the graph")]
    UnknownEndpoint(NodeId),
    /// The node-link document could not be parsed.
    #[error("invalid node-link document: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors from a [`crate::distance::DistanceStore`].
#[derive(Debug, Error)]
pub enum StoreError {
    /// Filesystem failure.
    #[error("distance store I/O failed: {0}")]
    Io(#[from] std::io::Error),
    /// CSV encoding or decoding failure.
    #[error("distance store CSV error: {0}")]
    Csv(#[from] csv::Error),
    /// A row was readable but its fields made no sense.
    #[error("malformed distance row {row}: {message}")]
    MalformedRow {
        /// 1-based data row number.
        row: u64,
        /// What was wrong with it.
        message: String,
    },
    /// The file's first line is complete but is not the store header.
    #[error("not a distance store, header is {found:?}")]
    UnexpectedHeader {
        /// The first line as read.
        found: String,
    },
}

/// Errors that abort a precompute run.
///
/// Per-pair search failures never surface here; they are persisted as
/// unreachable rows instead.
#[derive(Debug, Error)]
pub enum PrecomputeError {
    /// The graph has no nodes.
    #[error("graph has no nodes")]
    EmptyGraph,
    /// Reading or appending to the store failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}
