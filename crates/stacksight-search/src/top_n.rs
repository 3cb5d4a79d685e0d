//! Bounded best-N collection with deterministic tie-breaking.

use std::{cmp::Ordering, collections::BinaryHeap};

/// Upper bound on up-front heap allocation; larger capacities grow on demand.
const MAX_PREALLOCATED: usize = 1024;

/// Keeps the `capacity` best-scored items seen so far.
///
/// Items rank by descending score; equal scores rank by insertion order, earlier
/// first. The heap is keyed on the worst member, so a full collection decides in O(1)
/// whether a candidate can enter and replaces the worst in O(log N).
///
/// # Example
///
/// ```
/// use stacksight_search::TopN;
///
/// let mut top = TopN::new(2);
/// top.push(1.0, "a");
/// top.push(3.0, "b");
/// top.push(3.0, "c");
/// top.push(2.0, "d");
/// assert_eq!(top.into_sorted_vec(), ["b", "c"]);
/// ```
#[derive(Debug, Clone)]
pub struct TopN<T> {
    capacity: usize,
    next_seq: u64,
    heap: BinaryHeap<Entry<T>>,
}

impl<T> TopN<T> {
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            next_seq: 0,
            heap: BinaryHeap::with_capacity(capacity.min(MAX_PREALLOCATED)),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Score of the member that the next accepted candidate would evict.
    #[must_use]
    pub fn worst_score(&self) -> Option<f32> {
        self.heap.peek().map(|entry| entry.score)
    }

    /// Returns `true` if a candidate with `score`, inserted now, would be kept.
    ///
    /// Lets callers skip building a candidate that cannot enter.
    #[must_use]
    pub fn would_accept(&self, score: f32) -> bool {
        if self.heap.len() < self.capacity {
            return true;
        }
        // a later candidate loses ties, so it must be strictly better
        self.heap
            .peek()
            .is_some_and(|worst| score.total_cmp(&worst.score).is_gt())
    }

    /// Offers a candidate; returns whether it was kept.
    pub fn push(&mut self, score: f32, item: T) -> bool {
        let seq = self.next_seq;
        self.next_seq += 1;

        if !self.would_accept(score) {
            return false;
        }
        if self.heap.len() == self.capacity {
            self.heap.pop();
        }
        self.heap.push(Entry { score, seq, item });
        true
    }

    /// Returns the kept items, best first.
    #[must_use]
    pub fn into_sorted_vec(self) -> Vec<T> {
        self.heap
            .into_sorted_vec()
            .into_iter()
            .map(|entry| entry.item)
            .collect()
    }
}

/// Heap entry ordered by "worseness": the greatest entry is the worst ranked.
#[derive(Debug, Clone)]
struct Entry<T> {
    score: f32,
    seq: u64,
    item: T,
}

impl<T> PartialEq for Entry<T> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other).is_eq()
    }
}

impl<T> Eq for Entry<T> {}

impl<T> PartialOrd for Entry<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Entry<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .score
            .total_cmp(&self.score)
            .then_with(|| self.seq.cmp(&other.seq))
    }
}
