//! Binary min-heap over `(priority, value)` pairs.
//!
//! # Algorithm
//!
//! Entries live in a `Vec` laid out as an implicit complete binary tree:
//! the children of slot `i` are `2i + 1` and `2i + 2`. `insert` appends and
//! sifts up, `extract_min` swaps the root with the last slot, pops it and
//! sifts the new root down.
//!
//! There is no decrease-key. A value may be inserted several times with
//! different priorities; consumers skip values they have already finalized
//! when they pop them (lazy deletion).
//!
//! # Complexity
//!
//! `insert` and `extract_min` are O(log n), `peek` is O(1), `heapify` is
//! O(n).

use crate::error::QueueError;

#[derive(Debug, Clone)]
struct Entry<T> {
    priority: f64,
    value: T,
}

/// A min-priority queue with lazy deletion.
///
/// Priorities must be numbers (`NaN` is rejected). Ties are broken
/// arbitrarily.
///
/// # Examples
///
/// ```
/// use u_roadnet::queue::MinHeapQueue;
///
/// let mut pq = MinHeapQueue::new();
/// pq.insert("C", 3.0).unwrap();
/// pq.insert("A", 1.0).unwrap();
/// pq.insert("B", 2.0).unwrap();
///
/// assert_eq!(pq.peek(), Some(&"A"));
/// assert_eq!(pq.extract_min().unwrap(), "A");
/// assert_eq!(pq.extract_min().unwrap(), "B");
/// assert_eq!(pq.extract_min().unwrap(), "C");
/// assert!(pq.extract_min().is_err());
/// ```
#[derive(Debug, Clone)]
pub struct MinHeapQueue<T> {
    heap: Vec<Entry<T>>,
}

impl<T> MinHeapQueue<T> {
    /// Creates an empty queue.
    pub fn new() -> Self {
        Self { heap: Vec::new() }
    }

    /// Creates an empty queue with room for `capacity` entries.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            heap: Vec::with_capacity(capacity),
        }
    }

    /// Inserts `value` with the given priority.
    ///
    /// Returns [`QueueError::InvalidPriority`] if `priority` is NaN.
    pub fn insert(&mut self, value: T, priority: f64) -> Result<(), QueueError> {
        if priority.is_nan() {
            return Err(QueueError::InvalidPriority);
        }
        self.heap.push(Entry { priority, value });
        self.sift_up(self.heap.len() - 1);
        Ok(())
    }

    /// Removes and returns the minimum-priority value.
    pub fn extract_min(&mut self) -> Result<T, QueueError> {
        self.extract_min_entry().map(|(_, value)| value)
    }

    /// Removes and returns the minimum entry as `(priority, value)`.
    pub fn extract_min_entry(&mut self) -> Result<(f64, T), QueueError> {
        if self.heap.is_empty() {
            return Err(QueueError::EmptyQueue);
        }
        let last = self.heap.len() - 1;
        self.heap.swap(0, last);
        let entry = self.heap.pop().ok_or(QueueError::EmptyQueue)?;
        if !self.heap.is_empty() {
            self.sift_down(0);
        }
        Ok((entry.priority, entry.value))
    }

    /// The minimum-priority value, without removing it.
    pub fn peek(&self) -> Option<&T> {
        self.heap.first().map(|e| &e.value)
    }

    /// The minimum priority currently queued.
    pub fn peek_priority(&self) -> Option<f64> {
        self.heap.first().map(|e| e.priority)
    }

    /// Number of queued entries, stale ones included.
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Returns `true` if nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Restores the heap property over all entries in O(n).
    pub fn heapify(&mut self) {
        for i in (0..self.heap.len() / 2).rev() {
            self.sift_down(i);
        }
    }

    /// Checks that every parent priority is ≤ its children's.
    pub fn satisfies_heap_property(&self) -> bool {
        (1..self.heap.len()).all(|i| self.heap[(i - 1) / 2].priority <= self.heap[i].priority)
    }

    fn sift_up(&mut self, mut i: usize) {
        while i > 0 {
            let parent = (i - 1) / 2;
            if self.heap[parent].priority <= self.heap[i].priority {
                break;
            }
            self.heap.swap(parent, i);
            i = parent;
        }
    }

    fn sift_down(&mut self, mut i: usize) {
        let n = self.heap.len();
        loop {
            let left = 2 * i + 1;
            let right = left + 1;
            let mut smallest = i;
            if left < n && self.heap[left].priority < self.heap[smallest].priority {
                smallest = left;
            }
            if right < n && self.heap[right].priority < self.heap[smallest].priority {
                smallest = right;
            }
            if smallest == i {
                break;
            }
            self.heap.swap(i, smallest);
            i = smallest;
        }
    }
}

impl<T> Default for MinHeapQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> FromIterator<(T, f64)> for MinHeapQueue<T> {
    /// Builds a queue in O(n). Entries with NaN priority are dropped.
    fn from_iter<I: IntoIterator<Item = (T, f64)>>(iter: I) -> Self {
        let heap = iter
            .into_iter()
            .filter(|(_, p)| !p.is_nan())
            .map(|(value, priority)| Entry { priority, value })
            .collect();
        let mut queue = Self { heap };
        queue.heapify();
        queue
    }
}
