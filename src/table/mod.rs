//! The distributed open-addressing hash table: the core of this crate.
//!
//! [`DistributedTable`] is the per-rank handle a driver holds. It owns this
//! rank's send buffers directly (never touched by anyone but this rank's own
//! code) and reaches into the shared [`pgas::Runtime`] for everything that
//! crosses rank boundaries: flushing a full send buffer is an RPC, and a
//! remote lookup is a blocking RPC; a local lookup or a local apply touches
//! this rank's own [`RankCell`] without going through the runtime at all.

mod apply;
mod recv_lanes;
mod remote_find;
mod slot_store;

pub use recv_lanes::RecvLanes;
pub use slot_store::SlotStore;

use crate::config::K;
use crate::errors::{AssemblyError, AssemblyResult};
use crate::kmer::KmerPair;
use crate::pgas::{DistHandle, RankId, Runtime};
use parking_lot::Mutex;
use std::sync::Arc;

/// Everything one rank owns inside the shared runtime: its segment of the
/// table and its receive lanes. Guarded by `Mutex` purely so the type can be
/// shared across OS threads at all; see `slot_store`'s module docs for why
/// that lock is never actually contended.
pub struct RankCell {
    slot_store: Mutex<SlotStore>,
    recv_lanes: Mutex<RecvLanes>,
}

impl RankCell {
    pub fn new(local_capacity: usize, rank_n: usize) -> Self {
        Self {
            slot_store: Mutex::new(SlotStore::new(local_capacity)),
            recv_lanes: Mutex::new(RecvLanes::new(rank_n)),
        }
    }
}

pub type TableRuntime = Runtime<RankCell>;

/// The run's state machine (SPEC_FULL.md §4.6). Transitions are enforced by
/// `DistributedTable`'s own methods; violating one is a driver bug, not a
/// recoverable runtime condition, so it panics rather than returning a
/// `Result`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Reading,
    Buffering,
    Flushed,
    Applied,
    Finding,
    Done,
}

pub struct DistributedTable {
    runtime: Arc<TableRuntime>,
    recv_handles: Arc<DistHandle<RankId>>,
    rank: RankId,
    rank_n: usize,
    global_capacity: usize,
    local_capacity: usize,
    batch_size: usize,
    send_buffers: Vec<Vec<KmerPair>>,
    phase: Phase,
}

impl DistributedTable {
    pub fn new(
        runtime: Arc<TableRuntime>,
        recv_handles: Arc<DistHandle<RankId>>,
        rank: RankId,
        rank_n: usize,
        global_capacity: usize,
        local_capacity: usize,
        batch_size: usize,
    ) -> Self {
        Self {
            runtime,
            recv_handles,
            rank,
            rank_n,
            global_capacity,
            local_capacity,
            batch_size,
            send_buffers: vec![Vec::with_capacity(batch_size); rank_n],
            phase: Phase::Reading,
        }
    }

    pub fn rank(&self) -> RankId {
        self.rank
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    fn owner_of(&self, hash: u64) -> (RankId, usize) {
        let global_slot = hash as usize % self.global_capacity;
        let owner = global_slot / self.local_capacity;
        (owner, global_slot % self.local_capacity)
    }

    fn my_state(&self) -> &RankCell {
        self.runtime.state(self.rank)
    }

    /// Routes `kmer` to its owning rank's send buffer, flushing it via RPC
    /// if it just reached capacity. Illegal once the insert phase has ended
    /// (`send_all_buffers` has been called).
    pub fn insert(&mut self, kmer: KmerPair) {
        assert!(
            matches!(self.phase, Phase::Reading | Phase::Buffering),
            "insert() called after send_all_buffers(): illegal per the READING/BUFFERING -> FLUSHED state machine"
        );
        if self.phase == Phase::Reading {
            self.phase = Phase::Buffering;
        }

        let (target, _) = self.owner_of(kmer.hash());
        self.send_buffers[target].push(kmer);
        if self.send_buffers[target].len() == self.batch_size {
            self.flush_target(target);
        }
    }

    fn flush_target(&mut self, target: RankId) {
        let batch = std::mem::replace(
            &mut self.send_buffers[target],
            Vec::with_capacity(self.batch_size),
        );
        if batch.is_empty() {
            return;
        }
        if target == self.rank {
            // Self-sends are routed through the same per-source lane a
            // remote send would use, for uniformity (SPEC_FULL.md §9).
            self.my_state().recv_lanes.lock().append(self.rank, batch);
        } else {
            // Obtain the (trivial, in-process) handle to the remote rank's
            // receive structure before dispatching; mirrors the cached
            // `DistHandle::fetch` step a real PGAS backend needs to learn a
            // peer's remote pointer.
            let _handle = self
                .recv_handles
                .fetch(target, &self.runtime, self.rank, self.my_state());
            let source = self.rank;
            // Fire-and-forget: the future is intentionally dropped. Delivery
            // is guaranteed by the barrier that follows send_all_buffers().
            let _ = self.runtime.rpc(target, move |cell: &RankCell| {
                cell.recv_lanes.lock().append(source, batch);
            });
        }
    }

    /// Flushes every non-empty send buffer regardless of fill level. Called
    /// exactly once before the end-of-insert barrier.
    pub fn send_all_buffers(&mut self) {
        for target in 0..self.rank_n {
            if !self.send_buffers[target].is_empty() {
                self.flush_target(target);
            }
        }
        self.phase = Phase::Flushed;
    }

    /// Collective barrier, delegated straight to the runtime.
    pub fn barrier(&self) {
        self.runtime.barrier(self.rank, self.my_state());
    }

    /// Drains this rank's own receive lanes into its own slot store.
    /// Illegal before `send_all_buffers` + a barrier have run.
    pub fn apply_received(&mut self) -> AssemblyResult<()> {
        assert_eq!(
            self.phase,
            Phase::Flushed,
            "apply_received() called before send_all_buffers(): illegal per the state machine"
        );
        let cell = self.my_state();
        let mut store = cell.slot_store.lock();
        let mut lanes = cell.recv_lanes.lock();
        apply::apply_received(&mut store, &mut lanes, self.global_capacity, self.rank)?;
        self.phase = Phase::Applied;
        Ok(())
    }

    /// Looks up `sequence`, probing locally or dispatching a blocking RPC to
    /// the owning rank. Illegal before `apply_received` has run.
    pub fn find(&mut self, sequence: [u8; K]) -> AssemblyResult<KmerPair> {
        assert!(
            matches!(self.phase, Phase::Applied | Phase::Finding),
            "find() called before apply_received(): illegal per the state machine"
        );
        self.phase = Phase::Finding;

        let hash = crate::kmer::hash_sequence(&sequence);
        let (owner, local_slot) = self.owner_of(hash);

        let found = if owner == self.rank {
            let store = self.my_state().slot_store.lock();
            remote_find::probe_find(&store, &sequence, local_slot)
        } else {
            let future = self.runtime.rpc(owner, move |cell: &RankCell| {
                let store = cell.slot_store.lock();
                remote_find::probe_find(&store, &sequence, local_slot)
            });
            future.wait(&self.runtime, self.rank, self.my_state())
        };

        found.ok_or_else(|| AssemblyError::LookupMissing {
            sequence: sequence.iter().map(|&b| b as char).collect(),
        })
    }

    /// Marks the run as finished. Purely documentary: nothing currently
    /// keyed off `Phase::Done`, but the state machine names it as the final
    /// transition after the last start-node walk, a barrier, and finalize.
    pub fn mark_done(&mut self) {
        self.phase = Phase::Done;
    }

    pub fn global_capacity(&self) -> usize {
        self.global_capacity
    }

    pub fn local_capacity(&self) -> usize {
        self.local_capacity
    }

    /// Number of slots occupied on this rank, for tests/diagnostics.
    pub fn occupied_count(&self) -> usize {
        self.my_state().slot_store.lock().occupied_count()
    }
}
