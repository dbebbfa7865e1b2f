//! Stack-based path reconstruction.

use std::collections::HashMap;

use crate::error::SearchError;
use crate::graph::NodeId;

/// Rebuilds the forward path `start → … → end` from a predecessor map.
///
/// Walks backwards from `end`, pushing each node onto a stack, until
/// `start` is reached, then pops the stack. The walk is capped at
/// `predecessors.len() + 1` hops, which no acyclic chain can exceed.
///
/// Returns [`SearchError::BrokenChain`] if the chain dead-ends or loops
/// without reaching `start`; that indicates an inconsistent map.
///
/// # Examples
///
/// ```
/// use std::collections::HashMap;
/// use u_roadnet::search::reconstruct_path;
///
/// let preds = HashMap::from([(2, 1), (3, 2), (4, 3)]);
/// assert_eq!(reconstruct_path(&preds, 1, 4).unwrap(), vec![1, 2, 3, 4]);
/// assert!(reconstruct_path(&preds, 9, 4).is_err());
/// ```
pub fn reconstruct_path(
    predecessors: &HashMap<NodeId, NodeId>,
    start: NodeId,
    end: NodeId,
) -> Result<Vec<NodeId>, SearchError> {
    let broken = SearchError::BrokenChain { start, end };
    let max_hops = predecessors.len() + 1;

    let mut stack = vec![end];
    let mut current = end;
    let mut hops = 0;
    while current != start {
        if hops >= max_hops {
            return Err(broken);
        }
        current = *predecessors.get(&current).ok_or_else(|| broken.clone())?;
        stack.push(current);
        hops += 1;
    }

    let mut path = Vec::with_capacity(stack.len());
    while let Some(node) = stack.pop() {
        path.push(node);
    }
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_equals_end() {
        let preds = HashMap::new();
        assert_eq!(reconstruct_path(&preds, 5, 5), Ok(vec![5]));
    }

    #[test]
    fn test_single_hop() {
        let preds = HashMap::from([(2, 1)]);
        assert_eq!(reconstruct_path(&preds, 1, 2), Ok(vec![1, 2]));
    }

    #[test]
    fn test_dead_end() {
        let preds = HashMap::from([(3, 2)]);
        assert_eq!(
            reconstruct_path(&preds, 1, 3),
            Err(SearchError::BrokenChain { start: 1, end: 3 })
        );
    }

    #[test]
    fn test_cycle_hits_hop_guard() {
        let preds = HashMap::from([(3, 2), (2, 3)]);
        assert_eq!(
            reconstruct_path(&preds, 1, 3),
            Err(SearchError::BrokenChain { start: 1, end: 3 })
        );
    }

    #[test]
    fn test_deterministic() {
        let preds = HashMap::from([(2, 1), (3, 2), (4, 2), (5, 4)]);
        let first = reconstruct_path(&preds, 1, 5).expect("chain");
        for _ in 0..10 {
            assert_eq!(reconstruct_path(&preds, 1, 5).expect("chain"), first);
        }
        assert_eq!(first, vec![1, 2, 4, 5]);
    }
}
