//! The local, per-rank open-addressed slot array.
//!
//! Every method here assumes it is only ever called by the owning rank's own
//! thread (either directly, during apply/find, or indirectly through an RPC
//! closure the runtime only ever runs on that thread), so plain
//! read-modify-write suffices, no atomics. The [`parking_lot::Mutex`]
//! wrapping a `SlotStore` inside `RankCell` exists purely to satisfy Rust's
//! aliasing rules for a value reachable from multiple OS threads; it is
//! never contended in practice because only the owner ever locks it.

use crate::kmer::KmerPair;

pub struct SlotStore {
    data: Vec<Option<KmerPair>>,
    used: Vec<bool>,
}

impl SlotStore {
    pub fn new(local_capacity: usize) -> Self {
        Self {
            data: vec![None; local_capacity],
            used: vec![false; local_capacity],
        }
    }

    pub fn local_capacity(&self) -> usize {
        self.used.len()
    }

    pub fn slot_used(&self, i: usize) -> bool {
        self.used[i]
    }

    /// If `used[i] == 0`, claims it and returns `true`; otherwise leaves it
    /// untouched and returns `false`.
    pub fn request_slot(&mut self, i: usize) -> bool {
        if self.used[i] {
            false
        } else {
            self.used[i] = true;
            true
        }
    }

    /// Callers must have already succeeded at `request_slot(i)`.
    pub fn write_slot(&mut self, i: usize, kmer: KmerPair) {
        debug_assert!(self.used[i], "write_slot called without a prior request_slot");
        self.data[i] = Some(kmer);
    }

    /// Only defined when `slot_used(i)`.
    pub fn read_slot(&self, i: usize) -> KmerPair {
        self.data[i].expect("read_slot called on an empty slot")
    }

    /// Number of slots currently occupied, for tests and diagnostics.
    pub fn occupied_count(&self) -> usize {
        self.used.iter().filter(|&&u| u).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::K;

    fn sample(byte: u8) -> KmerPair {
        KmerPair::new([byte; K], b'C', b'F')
    }

    #[test]
    fn request_slot_is_exclusive() {
        let mut store = SlotStore::new(4);
        assert!(store.request_slot(0));
        assert!(!store.request_slot(0));
    }

    #[test]
    fn write_then_read_round_trips() {
        let mut store = SlotStore::new(4);
        assert!(store.request_slot(2));
        store.write_slot(2, sample(b'A'));
        assert!(store.slot_used(2));
        assert_eq!(store.read_slot(2), sample(b'A'));
    }

    #[test]
    fn unused_slots_report_unused() {
        let store = SlotStore::new(3);
        assert!(!store.slot_used(0));
        assert!(!store.slot_used(1));
        assert!(!store.slot_used(2));
        assert_eq!(store.occupied_count(), 0);
    }
}
