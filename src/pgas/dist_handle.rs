//! Distributed handle publication.
//!
//! A real PGAS substrate uses this to let rank `r` discover rank `p`'s
//! remote pointer to some collectively-allocated array without either side
//! blocking on anything but the other's willingness to publish. In this
//! in-process realization every rank already shares one address space, so
//! the payload each rank publishes is its own `RankId` rather than an actual
//! remote pointer: the synchronization contract (publish-before-fetch,
//! fetch spins while making progress) is kept faithfully even though the
//! value being exchanged is trivial here. A real multi-process backend
//! would publish an actual remote pointer/descriptor in its place.

use super::runtime::{RankState, Runtime};
use super::RankId;
use std::sync::OnceLock;

pub struct DistHandle<H> {
    cells: Vec<OnceLock<H>>,
}

impl<H: Clone> DistHandle<H> {
    pub fn new(rank_n: usize) -> Self {
        Self {
            cells: (0..rank_n).map(|_| OnceLock::new()).collect(),
        }
    }

    /// Publishes this rank's value. Must be called exactly once per rank,
    /// before any peer calls `fetch` on it.
    pub fn publish(&self, rank: RankId, value: H) {
        self.cells[rank]
            .set(value)
            .unwrap_or_else(|_| panic!("rank {rank} published its distributed handle twice"));
    }

    /// Collectively retrieves `rank`'s published value, making progress on
    /// `me`'s own inbox while waiting for the publication to land.
    pub fn fetch<T: RankState>(&self, rank: RankId, runtime: &Runtime<T>, me: RankId, my_state: &T) -> H {
        loop {
            if let Some(value) = self.cells[rank].get() {
                return value.clone();
            }
            runtime.progress(me, my_state);
            std::thread::yield_now();
        }
    }
}
