//! Max-queue of pairs keyed by count, for incremental training.
//!
//! The queue is lazy: updating a pair pushes a fresh entry and leaves the old
//! one in the heap, to be discarded when it surfaces.

use ahash::AHashMap;
use dary_heap::OctonaryHeap;
use subword_core::Pair;

use super::pair_index::Occurrence;

/// A pair waiting to be merged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergeCandidate {
    pub pair: Pair,
    /// Weighted occurrences across the corpus
    pub count: u64,
    /// Where the pair is first seen in corpus order
    pub first: Occurrence,
}

impl MergeCandidate {
    pub fn new(pair: Pair, count: u64, first: Occurrence) -> Self {
        Self { pair, count, first }
    }
}

// Higher count first; among equal counts the earliest occurrence wins.
impl Ord for MergeCandidate {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.count
            .cmp(&other.count)
            .then_with(|| other.first.cmp(&self.first))
            .then_with(|| other.pair.cmp(&self.pair))
    }
}

impl PartialOrd for MergeCandidate {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

/// Lazy priority queue over [`MergeCandidate`]s, backed by an 8-ary heap.
#[derive(Debug, Default)]
pub struct PairPriorityQueue {
    heap: OctonaryHeap<MergeCandidate>,
    /// Live `(count, first)` per pair; heap entries that disagree are stale
    current: AHashMap<Pair, (u64, Occurrence)>,
}

impl PairPriorityQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            heap: OctonaryHeap::with_capacity(capacity),
            current: AHashMap::with_capacity(capacity),
        }
    }

    /// Push a candidate, superseding any earlier entry for the same pair.
    pub fn push(&mut self, candidate: MergeCandidate) {
        self.current
            .insert(candidate.pair, (candidate.count, candidate.first));
        self.heap.push(candidate);
    }

    /// Forget a pair; its heap entries become stale.
    pub fn remove(&mut self, pair: Pair) {
        self.current.remove(&pair);
    }

    /// Pop the highest priority live candidate.
    pub fn pop(&mut self) -> Option<MergeCandidate> {
        while let Some(candidate) = self.heap.pop() {
            if self.current.get(&candidate.pair) == Some(&(candidate.count, candidate.first)) {
                self.current.remove(&candidate.pair);
                return Some(candidate);
            }
        }
        None
    }

    /// Number of live pairs.
    pub fn len(&self) -> usize {
        self.current.len()
    }

    pub fn is_empty(&self) -> bool {
        self.current.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_pop() {
        let mut queue = PairPriorityQueue::new();

        queue.push(MergeCandidate::new((0, 1), 10, (0, 0)));
        queue.push(MergeCandidate::new((1, 2), 20, (0, 1)));
        queue.push(MergeCandidate::new((2, 3), 15, (1, 0)));

        assert_eq!(queue.pop().map(|c| c.pair), Some((1, 2)));
        assert_eq!(queue.pop().map(|c| c.pair), Some((2, 3)));
        assert_eq!(queue.pop().map(|c| c.pair), Some((0, 1)));
        assert!(queue.pop().is_none());
    }

    #[test]
    fn test_ties_go_to_earliest_occurrence() {
        let mut queue = PairPriorityQueue::new();

        queue.push(MergeCandidate::new((7, 8), 5, (3, 0)));
        queue.push(MergeCandidate::new((0, 1), 5, (1, 4)));
        queue.push(MergeCandidate::new((4, 4), 5, (1, 2)));

        assert_eq!(queue.pop().map(|c| c.pair), Some((4, 4)));
        assert_eq!(queue.pop().map(|c| c.pair), Some((0, 1)));
        assert_eq!(queue.pop().map(|c| c.pair), Some((7, 8)));
    }

    #[test]
    fn test_stale_entry_detection() {
        let mut queue = PairPriorityQueue::new();

        queue.push(MergeCandidate::new((0, 1), 10, (0, 0)));
        queue.push(MergeCandidate::new((1, 2), 20, (0, 1)));

        // Supersede the (0, 1) entry
        queue.push(MergeCandidate::new((0, 1), 15, (2, 0)));
        assert_eq!(queue.len(), 2);

        assert_eq!(queue.pop().map(|c| c.pair), Some((1, 2)));
        let updated = queue.pop().unwrap();
        assert_eq!((updated.pair, updated.count, updated.first), ((0, 1), 15, (2, 0)));

        // the superseded entry is dropped, not returned
        assert_eq!(queue.pop(), None);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_remove() {
        let mut queue = PairPriorityQueue::with_capacity(2);

        queue.push(MergeCandidate::new((0, 1), 10, (0, 0)));
        queue.push(MergeCandidate::new((1, 2), 5, (0, 1)));
        queue.remove((0, 1));

        assert_eq!(queue.pop().map(|c| c.pair), Some((1, 2)));
        assert!(queue.pop().is_none());
    }
}
