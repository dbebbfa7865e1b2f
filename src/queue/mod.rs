//! Priority queue used by the shortest-path kernel.
//!
//! - [`MinHeapQueue`] — array-backed binary min-heap with lazy deletion

mod min_heap;

pub use min_heap::MinHeapQueue;
