//! CLI entry point: `kmer_hash <kmer_file> [verbose|test <prefix>] [--ranks N] [--batch-size B] [--load-factor F]`.
//!
//! Spawns one OS thread per rank against a shared in-process [`pgas::Runtime`],
//! joins them, and reports the first fatal error if any rank failed.

use clap::{Parser, Subcommand};
use debruijn_assembler::config::{DEFAULT_BATCH_SIZE, DEFAULT_LOAD_FACTOR};
use debruijn_assembler::io::{contig_writer, kmer_file};
use debruijn_assembler::{AssemblyContext, RunConfig, RunMode};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "kmer_hash", about = "Distributed k-mer hash table contig assembler")]
struct Cli {
    /// Path to the k-mer input file.
    kmer_file: PathBuf,

    /// Number of simulated ranks.
    #[arg(long, default_value_t = 4)]
    ranks: usize,

    /// Per-destination send buffer capacity before an RPC flush.
    #[arg(long, default_value_t = DEFAULT_BATCH_SIZE)]
    batch_size: usize,

    /// Target load factor used to size the global table.
    #[arg(long, default_value_t = DEFAULT_LOAD_FACTOR)]
    load_factor: f64,

    #[command(subcommand)]
    mode: Option<Mode>,
}

#[derive(Subcommand)]
enum Mode {
    /// Print per-rank phase timing as the run progresses.
    Verbose,
    /// Write each rank's reconstructed contigs to `<prefix>_<rank>.dat`.
    Test { prefix: String },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let mode = match cli.mode {
        None => RunMode::Normal,
        Some(Mode::Verbose) => RunMode::Verbose,
        Some(Mode::Test { prefix }) => RunMode::Test { prefix },
    };

    match run(cli.kmer_file, cli.ranks, cli.batch_size, cli.load_factor, mode) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("kmer_hash: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(
    kmer_path: PathBuf,
    ranks: usize,
    batch_size: usize,
    load_factor: f64,
    mode: RunMode,
) -> Result<(), Box<dyn std::error::Error>> {
    kmer_file::validate_k(&kmer_path)?;
    let n_kmers = kmer_file::line_count(&kmer_path)?;

    let config = RunConfig {
        ranks,
        batch_size,
        load_factor,
        mode: mode.clone(),
    };
    let ctx = Arc::new(AssemblyContext::new(config, n_kmers));

    if matches!(mode, RunMode::Test { .. }) {
        // About to open `ranks` output files concurrently; raise the soft FD
        // limit up front rather than risk a mid-run `Io` failure on a
        // high-rank-count run.
        let _ = fdlimit::raise_fd_limit();
    }

    let handles: Vec<_> = (0..ranks)
        .map(|rank| {
            let ctx = Arc::clone(&ctx);
            let kmer_path = kmer_path.clone();
            std::thread::Builder::new()
                .name(format!("rank-{rank}"))
                .spawn(move || debruijn_assembler::run_rank(&ctx, rank, &kmer_path))
                .expect("failed to spawn rank thread")
        })
        .collect();

    let mut reports = Vec::with_capacity(ranks);
    for handle in handles {
        let report = handle.join().expect("rank thread panicked")?;
        reports.push(report);
    }

    if let RunMode::Test { prefix } = &mode {
        for report in &reports {
            contig_writer::write_contigs(prefix, report.rank, &report.contigs)?;
        }
    }

    let total_contigs: usize = reports.iter().map(|r| r.contigs.len()).sum();
    eprintln!("assembled {total_contigs} contigs across {ranks} ranks");

    Ok(())
}
