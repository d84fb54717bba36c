//! Per-rank receive structure: N append-only lanes, one per source rank.
//!
//! A lane is only ever appended to by RPC closures dispatched from its
//! source rank and executed on the owning rank's own thread (or, for a
//! self-send, spliced in directly by that same thread), so within a lane,
//! FIFO order matches send order. Ordering across lanes is unspecified and
//! has no semantic effect on the resulting table (the table is a multiset
//! of slots; lookups match on sequence equality, not insertion order).

use crate::kmer::KmerPair;
use std::collections::VecDeque;

pub struct RecvLanes {
    lanes: Vec<VecDeque<KmerPair>>,
}

impl RecvLanes {
    pub fn new(rank_n: usize) -> Self {
        Self {
            lanes: (0..rank_n).map(|_| VecDeque::new()).collect(),
        }
    }

    /// Appends a batch shipped from `source` onto its lane, in order.
    pub fn append(&mut self, source: usize, batch: Vec<KmerPair>) {
        self.lanes[source].extend(batch);
    }

    pub fn lane_count(&self) -> usize {
        self.lanes.len()
    }

    /// Pops the front of lane `source`, FIFO, or `None` once it is drained.
    pub fn pop_front(&mut self, source: usize) -> Option<KmerPair> {
        self.lanes[source].pop_front()
    }

    #[cfg(test)]
    pub fn lane_len(&self, source: usize) -> usize {
        self.lanes[source].len()
    }
}
