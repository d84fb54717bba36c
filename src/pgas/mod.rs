//! A minimal PGAS (partitioned global address space) runtime adapter.
//!
//! This is the substrate described in SPEC_FULL.md §4.1: collective
//! init/finalize, rank identity, barriers, remote memory allocation,
//! distributed handle publication, and RPC with futures. It is realized
//! in-process as one OS thread per rank sharing a single [`Runtime`], rather
//! than against a real multi-process transport; see DESIGN.md for why that
//! substitution preserves every correctness-relevant property the rest of
//! the crate depends on.

mod dist_handle;
mod rpc;
mod runtime;

pub use dist_handle::DistHandle;
pub use rpc::{Job, RpcFuture};
pub use runtime::{RankState, Runtime};

pub type RankId = usize;
