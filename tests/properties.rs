//! Property-based tests for the routing and table invariants named in
//! SPEC_FULL.md §8, independent of any particular file or contig shape.

mod common;

use debruijn_assembler::config::K;
use debruijn_assembler::kmer::{hash_sequence, KmerPair};
use debruijn_assembler::pgas::{DistHandle, Runtime};
use debruijn_assembler::table::{DistributedTable, RankCell};
use proptest::prelude::*;
use std::sync::Arc;

const ALPHABET: [u8; 4] = [b'A', b'C', b'G', b'T'];

fn arb_sequence() -> impl Strategy<Value = [u8; K]> {
    prop::collection::vec(0..4usize, K).prop_map(|digits| {
        let mut seq = [0u8; K];
        for (slot, d) in seq.iter_mut().zip(digits) {
            *slot = ALPHABET[d];
        }
        seq
    })
}

proptest! {
    /// Hashing the same sequence twice always routes to the same
    /// (owner, local_slot) pair, for any valid (global_capacity, rank_n).
    #[test]
    fn routing_is_stable_for_a_given_sequence(
        seq in arb_sequence(),
        n_kmers in 1usize..500,
        rank_n in 1usize..16,
    ) {
        let global_capacity = (n_kmers as f64 / 0.5).ceil() as usize;
        let local_capacity = (global_capacity + rank_n - 1) / rank_n;

        let hash = hash_sequence(&seq);
        let owner_a = (hash as usize % global_capacity) / local_capacity;
        let slot_a = (hash as usize % global_capacity) % local_capacity;
        let owner_b = (hash as usize % global_capacity) / local_capacity;
        let slot_b = (hash as usize % global_capacity) % local_capacity;

        prop_assert_eq!(owner_a, owner_b);
        prop_assert_eq!(slot_a, slot_b);
    }

    /// Every (owner, local_slot) pair the routing formula produces stays
    /// within the bounds of the segment it names: no rank index >= rank_n,
    /// no local slot >= that segment's capacity.
    #[test]
    fn routing_stays_within_segment_bounds(
        seq in arb_sequence(),
        n_kmers in 1usize..500,
        rank_n in 1usize..16,
    ) {
        let global_capacity = (n_kmers as f64 / 0.5).ceil() as usize;
        let local_capacity = (global_capacity + rank_n - 1) / rank_n;

        let hash = hash_sequence(&seq);
        let global_slot = hash as usize % global_capacity;
        let owner = global_slot / local_capacity;
        let local_slot = global_slot % local_capacity;

        prop_assert!(owner < rank_n, "owner {owner} out of range for rank_n {rank_n}");
        prop_assert!(local_slot < local_capacity);
    }

    /// A single rank that inserts a batch of distinct sequences and applies
    /// them never reports more occupied slots than it inserted, and never
    /// exceeds its own capacity.
    #[test]
    fn no_phantom_slots_after_apply(seqs in prop::collection::hash_set(arb_sequence(), 1..30)) {
        let seqs: Vec<_> = seqs.into_iter().collect();
        let local_capacity = seqs.len() * 4 + 1;
        let runtime = Arc::new(Runtime::new(vec![RankCell::new(local_capacity, 1)]));
        let handles = Arc::new(DistHandle::new(1));
        handles.publish(0, 0usize);
        let mut table = DistributedTable::new(runtime, handles, 0, 1, local_capacity, local_capacity, 40);

        for seq in &seqs {
            table.insert(KmerPair::new(*seq, b'C', b'F'));
        }
        table.barrier();
        table.send_all_buffers();
        table.barrier();
        table.apply_received().unwrap();

        prop_assert_eq!(table.occupied_count(), seqs.len());
        prop_assert!(table.occupied_count() <= local_capacity);
    }

    /// Whatever is inserted and applied on a single rank can be found again
    /// by its exact sequence.
    #[test]
    fn find_matches_what_was_inserted(seqs in prop::collection::hash_set(arb_sequence(), 1..20)) {
        let seqs: Vec<_> = seqs.into_iter().collect();
        let local_capacity = seqs.len() * 4 + 1;
        let runtime = Arc::new(Runtime::new(vec![RankCell::new(local_capacity, 1)]));
        let handles = Arc::new(DistHandle::new(1));
        handles.publish(0, 0usize);
        let mut table = DistributedTable::new(runtime, handles, 0, 1, local_capacity, local_capacity, 40);

        for seq in &seqs {
            table.insert(KmerPair::new(*seq, b'C', b'F'));
        }
        table.barrier();
        table.send_all_buffers();
        table.barrier();
        table.apply_received().unwrap();

        for seq in &seqs {
            let found = table.find(*seq).unwrap();
            prop_assert_eq!(found.sequence(), seq);
        }
    }
}
