//! The shared runtime: rank identity, the per-rank inboxes RPCs are
//! delivered through, and the collective barrier.

use super::rpc::Job;
use super::RankId;
use crossbeam::queue::SegQueue;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Marker alias for whatever per-rank payload a caller parameterizes the
/// runtime with (here, always the table's `RankCell`). The runtime itself
/// only needs to know how to route jobs to it; it never inspects the
/// payload.
pub trait RankState: Send + Sync {}
impl<T: Send + Sync> RankState for T {}

/// Collective state shared by every rank thread. Construct exactly once,
/// before spawning the rank threads (`init()`); drop after joining them
/// all (`finalize()`).
pub struct Runtime<T: RankState> {
    rank_n: usize,
    states: Vec<T>,
    inboxes: Vec<SegQueue<Job<T>>>,
    barrier_arrived: AtomicUsize,
    barrier_generation: AtomicUsize,
}

impl<T: RankState> Runtime<T> {
    /// Collective construction: `states` must have exactly `rank_n`
    /// entries, one per rank, in rank order.
    pub fn new(states: Vec<T>) -> Self {
        let rank_n = states.len();
        let inboxes = (0..rank_n).map(|_| SegQueue::new()).collect();
        Self {
            rank_n,
            states,
            inboxes,
            barrier_arrived: AtomicUsize::new(0),
            barrier_generation: AtomicUsize::new(0),
        }
    }

    pub fn rank_n(&self) -> usize {
        self.rank_n
    }

    pub fn state(&self, rank: RankId) -> &T {
        &self.states[rank]
    }

    pub(super) fn push_job(&self, target: RankId, job: Job<T>) {
        self.inboxes[target].push(job);
    }

    /// Drains and runs every job currently queued for `me`, without
    /// blocking. This is the only place inbound RPC closures execute; it is
    /// always called from `me`'s own thread.
    pub fn progress(&self, me: RankId, my_state: &T) {
        while let Some(job) = self.inboxes[me].pop() {
            job(my_state);
        }
    }

    /// Collective barrier: establishes a happens-before edge between
    /// everything any rank did before calling it and everything any rank
    /// does after. Spins while draining this rank's own inbox so that any
    /// fire-and-forget RPC dispatched before the barrier is guaranteed
    /// delivered by the time every rank has returned from it.
    pub fn barrier(&self, me: RankId, my_state: &T) {
        let observed_generation = self.barrier_generation.load(Ordering::SeqCst);
        let arrived = self.barrier_arrived.fetch_add(1, Ordering::SeqCst) + 1;
        if arrived == self.rank_n {
            self.barrier_arrived.store(0, Ordering::SeqCst);
            self.barrier_generation
                .store(observed_generation + 1, Ordering::SeqCst);
        } else {
            while self.barrier_generation.load(Ordering::SeqCst) == observed_generation {
                self.progress(me, my_state);
                std::thread::yield_now();
            }
        }
        // One last drain: a peer may have pushed a job between us observing
        // the new generation and actually returning.
        self.progress(me, my_state);
    }
}
