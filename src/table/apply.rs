//! The drain/apply stage: turns received batches into occupied slots.

use crate::errors::{AssemblyError, AssemblyResult};
use crate::table::recv_lanes::RecvLanes;
use crate::table::slot_store::SlotStore;

/// Drains every receive lane into the local slot store by linear probing.
///
/// Ordering within a lane is FIFO; ordering across lanes is whatever order
/// this loop visits them in, which has no semantic effect (the table is a
/// multiset of occupied slots, and lookups match on sequence equality, not
/// insertion order).
pub fn apply_received(
    store: &mut SlotStore,
    lanes: &mut RecvLanes,
    global_capacity: usize,
    rank: usize,
) -> AssemblyResult<()> {
    let local_capacity = store.local_capacity();
    for source in 0..lanes.lane_count() {
        while let Some(kmer) = lanes.pop_front(source) {
            let local_slot = (kmer.hash() as usize % global_capacity) % local_capacity;
            let mut placed = false;
            for probe in 0..local_capacity {
                let slot = (local_slot + probe) % local_capacity;
                if store.request_slot(slot) {
                    store.write_slot(slot, kmer);
                    placed = true;
                    break;
                }
            }
            if !placed {
                return Err(AssemblyError::TableFull {
                    rank,
                    capacity: local_capacity,
                });
            }
        }
    }
    Ok(())
}
