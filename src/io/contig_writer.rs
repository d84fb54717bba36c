//! Contig serialization and the `test`-mode output writer.

use crate::errors::{AssemblyError, AssemblyResult};
use crate::kmer::KmerPair;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

/// Concatenates the first base of every k-mer but the last, then appends
/// the last k-mer's full sequence. A chain of `n` k-mers serializes to a
/// string of length `n + K - 1`.
pub fn extract_contig(chain: &[KmerPair]) -> String {
    let mut out = String::with_capacity(chain.len() + chain.first().map_or(0, |k| k.sequence().len()));
    for kmer in &chain[..chain.len().saturating_sub(1)] {
        out.push(kmer.sequence()[0] as char);
    }
    if let Some(last) = chain.last() {
        out.push_str(&last.to_string());
    }
    out
}

/// Writes `P_<rank>.dat`, one serialized contig per line, in the order the
/// contigs were walked.
pub fn write_contigs(prefix: &str, rank: usize, contigs: &[Vec<KmerPair>]) -> AssemblyResult<()> {
    let path = PathBuf::from(format!("{prefix}_{rank}.dat"));
    let file = File::create(&path).map_err(|e| AssemblyError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    let mut writer = BufWriter::new(file);
    for contig in contigs {
        writeln!(writer, "{}", extract_contig(contig)).map_err(|e| AssemblyError::Io {
            path: path.display().to_string(),
            source: e,
        })?;
    }
    writer.flush().map_err(|e| AssemblyError::Io {
        path: path.display().to_string(),
        source: e,
    })
}
