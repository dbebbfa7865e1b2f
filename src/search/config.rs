//! Search limits.

use serde::{Deserialize, Serialize};

/// Iteration cap applied to every search.
///
/// One iteration is one pop from the priority queue, stale entries
/// included. The cap is the only cancellation mechanism: a search that
/// needs more pops fails with
/// [`SearchError::IterationLimitExceeded`](crate::error::SearchError::IterationLimitExceeded).
///
/// # Examples
///
/// ```
/// use u_roadnet::search::SearchConfig;
///
/// let config = SearchConfig::default().with_max_iterations(500);
/// assert_eq!(config.max_iterations, 500);
/// assert_eq!(SearchConfig::default().max_iterations, 10_000);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Maximum number of queue pops per search.
    pub max_iterations: usize,
}

impl SearchConfig {
    /// Sets the iteration cap.
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_iterations: 10_000,
        }
    }
}
