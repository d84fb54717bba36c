//! Shared fixtures for the end-to-end scenarios in SPEC_FULL.md §8.

use debruijn_assembler::config::K;
use debruijn_assembler::{AssemblyContext, RankReport, RunConfig, RunMode};
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use tempfile::NamedTempFile;

/// Builds the file lines for one linear contig of `bases.len()` total bases
/// (so `bases.len() - K + 1` k-mer records), in the `<K bases><fwd><bwd>`
/// format the reader expects.
pub fn contig_lines(bases: &[u8]) -> Vec<String> {
    assert!(bases.len() >= K, "contig must be at least K bases long");
    let n = bases.len() - K + 1;
    (0..n)
        .map(|i| {
            let seq = std::str::from_utf8(&bases[i..i + K]).unwrap();
            let fwd = if i + K < bases.len() { bases[i + K] as char } else { 'F' };
            let bwd = if i == 0 { 'F' } else { bases[i - 1] as char };
            format!("{seq}{fwd}{bwd}")
        })
        .collect()
}

pub fn write_kmer_file(lines: &[String]) -> NamedTempFile {
    let mut f = NamedTempFile::new().unwrap();
    for line in lines {
        writeln!(f, "{line}").unwrap();
    }
    f
}

/// Runs a full collective assembly across `ranks` OS threads against the
/// file at `path`, returning every rank's report in rank order. Panics (via
/// the joined threads' `?`) on any rank's fatal error; tests that expect a
/// failure should call [`try_run_collective`] instead.
pub fn run_collective(path: &Path, ranks: usize, batch_size: usize, load_factor: f64) -> Vec<RankReport> {
    try_run_collective(path, ranks, batch_size, load_factor)
        .unwrap_or_else(|e| panic!("expected a successful run, got {e}"))
}

pub fn try_run_collective(
    path: &Path,
    ranks: usize,
    batch_size: usize,
    load_factor: f64,
) -> Result<Vec<RankReport>, debruijn_assembler::AssemblyError> {
    let n_kmers = debruijn_assembler::io::kmer_file::line_count(path).unwrap();
    let config = RunConfig {
        ranks,
        batch_size,
        load_factor,
        mode: RunMode::Normal,
    };
    let ctx = Arc::new(AssemblyContext::new(config, n_kmers));

    let handles: Vec<_> = (0..ranks)
        .map(|rank| {
            let ctx = Arc::clone(&ctx);
            let path = path.to_path_buf();
            std::thread::spawn(move || debruijn_assembler::run_rank(&ctx, rank, &path))
        })
        .collect();

    let mut reports = Vec::with_capacity(ranks);
    for handle in handles {
        reports.push(handle.join().expect("rank thread panicked")?);
    }
    Ok(reports)
}
