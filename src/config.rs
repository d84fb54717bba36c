//! Compile-time and run-time tunables shared across the crate.
//!
//! `K` mirrors the original source's `KMER_LEN` constant in `packing.hpp`: it is
//! baked into the binary, and a file whose k-mers don't match it is rejected
//! up front rather than silently truncated or padded.

/// Length, in bases, of every k-mer this binary was compiled for.
pub const K: usize = 21;

/// Default number of records a per-destination send buffer holds before it
/// is flushed via RPC.
pub const DEFAULT_BATCH_SIZE: usize = 40;

/// Default load factor for sizing the global table: `G = ceil(n_kmers / LOAD_FACTOR)`.
pub const DEFAULT_LOAD_FACTOR: f64 = 0.5;

/// How often (wall-clock) the driver is allowed to print a progress line in
/// `verbose` mode. Mirrors `MINIMUM_LOG_DELTA_TIME`-style throttling used by
/// long-running bucketed pipelines so that a busy insert phase doesn't spam
/// stdout once per k-mer.
pub const MINIMUM_LOG_DELTA_TIME: std::time::Duration = std::time::Duration::from_millis(500);

/// Run-time configuration assembled from the CLI, distinct from the
/// compile-time `K`.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub ranks: usize,
    pub batch_size: usize,
    pub load_factor: f64,
    pub mode: RunMode,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunMode {
    Normal,
    Verbose,
    Test { prefix: String },
}

impl RunConfig {
    pub fn global_capacity(&self, n_kmers: usize) -> usize {
        ((n_kmers as f64) / self.load_factor).ceil() as usize
    }

    pub fn segment_capacity(&self, n_kmers: usize) -> usize {
        let g = self.global_capacity(n_kmers).max(1);
        (g + self.ranks - 1) / self.ranks
    }
}
