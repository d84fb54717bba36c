//! The assembly driver: reads k-mers, inserts them, barriers, walks
//! start-node chains via find, and hands back this rank's contigs.

use crate::assembly::timing::PhaseTimer;
use crate::config::{RunConfig, RunMode};
use crate::errors::AssemblyResult;
use crate::io::kmer_file;
use crate::kmer::KmerPair;
use crate::pgas::{DistHandle, RankId, Runtime};
use crate::table::{DistributedTable, RankCell, TableRuntime};
use std::path::Path;
use std::sync::Arc;

/// Everything every rank thread needs a handle to, built once collectively
/// before any rank thread is spawned.
pub struct AssemblyContext {
    pub runtime: Arc<TableRuntime>,
    pub recv_handles: Arc<DistHandle<RankId>>,
    pub config: RunConfig,
    pub global_capacity: usize,
    pub local_capacity: usize,
}

impl AssemblyContext {
    pub fn new(config: RunConfig, n_kmers: usize) -> Self {
        let global_capacity = config.global_capacity(n_kmers);
        let local_capacity = config.segment_capacity(n_kmers);
        let states = (0..config.ranks)
            .map(|_| RankCell::new(local_capacity, config.ranks))
            .collect();
        let runtime = Arc::new(Runtime::new(states));
        let recv_handles = Arc::new(DistHandle::new(config.ranks));
        // Collective publication: every rank's handle is set up front since
        // all ranks already share this one runtime's address space.
        for rank in 0..config.ranks {
            recv_handles.publish(rank, rank);
        }
        Self {
            runtime,
            recv_handles,
            config,
            global_capacity,
            local_capacity,
        }
    }
}

pub struct RankReport {
    pub rank: RankId,
    pub contigs: Vec<Vec<KmerPair>>,
    pub start_node_count: usize,
    pub occupied_count: usize,
    pub timer: PhaseTimer,
}

/// Runs the full per-rank pipeline: read this rank's partition, insert every
/// k-mer (collecting start nodes), flush and apply, then walk every start
/// node's chain to a terminus.
pub fn run_rank(ctx: &AssemblyContext, rank: RankId, kmer_path: &Path) -> AssemblyResult<RankReport> {
    let mut timer = PhaseTimer::start();
    let mut table = DistributedTable::new(
        Arc::clone(&ctx.runtime),
        Arc::clone(&ctx.recv_handles),
        rank,
        ctx.config.ranks,
        ctx.global_capacity,
        ctx.local_capacity,
        ctx.config.batch_size,
    );

    let kmers = kmer_file::read_partition(kmer_path, rank, ctx.config.ranks)?;
    timer.mark_read_done();

    let mut start_nodes = Vec::new();
    for kmer in kmers {
        table.insert(kmer);
        if kmer.is_start_node() {
            start_nodes.push(kmer);
        }
    }

    // Pre-flush rendezvous: every rank has finished its own insert loop
    // before any buffer is flushed, mirroring the original source's extra
    // barrier ahead of `send_all_buffers`.
    table.barrier();
    table.send_all_buffers();
    table.barrier();
    table.apply_received()?;
    table.barrier();

    timer.mark_insert_done();

    let occupied_count = table.occupied_count();

    let mut contigs = Vec::with_capacity(start_nodes.len());
    for start in start_nodes.iter().copied() {
        let mut chain = vec![start];
        while !chain.last().unwrap().is_terminus() {
            let next_sequence = chain.last().unwrap().next_kmer_sequence();
            let next = table.find(next_sequence)?;
            chain.push(next);
        }
        contigs.push(chain);
    }

    table.barrier();
    table.mark_done();
    timer.mark_find_done();

    if ctx.config.mode == RunMode::Verbose {
        println!(
            "rank {} reconstructed {} contigs from {} start nodes ({:.3}s read, {:.3}s insert, {:.3}s find, {:.3}s total)",
            rank,
            contigs.len(),
            start_nodes.len(),
            timer.read_duration().as_secs_f64(),
            timer.insert_duration().as_secs_f64(),
            timer.find_duration().as_secs_f64(),
            timer.total_duration().as_secs_f64(),
        );
    }

    Ok(RankReport {
        rank,
        contigs,
        start_node_count: start_nodes.len(),
        occupied_count,
        timer,
    })
}

