//! Linear-probe lookup, run either directly against the local slot store or
//! inside an RPC closure against a remote rank's.

use crate::config::K;
use crate::kmer::KmerPair;
use crate::table::slot_store::SlotStore;

/// Probes `store` starting at `local_slot`, stride 1, wrapping only within
/// the segment, looking for a stored k-mer whose sequence equals `sequence`.
pub fn probe_find(store: &SlotStore, sequence: &[u8; K], local_slot: usize) -> Option<KmerPair> {
    let local_capacity = store.local_capacity();
    for probe in 0..local_capacity {
        let slot = (local_slot + probe) % local_capacity;
        if !store.slot_used(slot) {
            continue;
        }
        let candidate = store.read_slot(slot);
        if candidate.sequence() == sequence {
            return Some(candidate);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kmer(byte: u8) -> KmerPair {
        KmerPair::new([byte; K], b'C', b'F')
    }

    #[test]
    fn probe_find_locates_a_stored_kmer() {
        let mut store = SlotStore::new(4);
        store.request_slot(1);
        store.write_slot(1, kmer(b'A'));
        let found = probe_find(&store, &[b'A'; K], 0).unwrap();
        assert_eq!(found, kmer(b'A'));
    }

    #[test]
    fn probe_find_reports_miss() {
        let store = SlotStore::new(4);
        assert!(probe_find(&store, &[b'A'; K], 0).is_none());
    }
}
