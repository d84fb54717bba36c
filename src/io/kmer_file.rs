//! The k-mer file format parser: a line-oriented text format, one record per
//! line, `<K bases><fwd ext><bwd ext>`. Grounded in the original source's
//! `kmer_size`/`line_count`/`read_kmers` helpers (see `original_source/`).

use crate::config::K;
use crate::errors::{AssemblyError, AssemblyResult};
use crate::kmer::KmerPair;
use std::fs;
use std::path::Path;

fn io_err(path: &Path, source: std::io::Error) -> AssemblyError {
    AssemblyError::Io {
        path: path.display().to_string(),
        source,
    }
}

/// Reports the base-string length of the file's first line (total line
/// length minus the two trailing extension bytes), without parsing the rest
/// of the file. Used to validate against the compiled `K` before any rank
/// starts reading its partition.
pub fn kmer_size(path: &Path) -> AssemblyResult<usize> {
    let contents = fs::read_to_string(path).map_err(|e| io_err(path, e))?;
    let first_line = contents
        .lines()
        .next()
        .ok_or_else(|| AssemblyError::MalformedRecord {
            line: 0,
            reason: "file is empty".to_string(),
        })?;
    Ok(first_line.trim_end().len().saturating_sub(2))
}

/// Total number of (non-empty) lines in the file.
pub fn line_count(path: &Path) -> AssemblyResult<usize> {
    let contents = fs::read_to_string(path).map_err(|e| io_err(path, e))?;
    Ok(contents.lines().filter(|l| !l.trim().is_empty()).count())
}

/// Validates that the file's k-mer length matches the compiled `K`. Fatal at
/// startup if not; every rank must agree on `K` before any insert happens.
pub fn validate_k(path: &Path) -> AssemblyResult<()> {
    let found = kmer_size(path)?;
    if found != K {
        return Err(AssemblyError::InputMismatch {
            path: path.display().to_string(),
            found,
            expected: K,
        });
    }
    Ok(())
}

/// Reads only the slice of lines `[rank*n/N, (rank+1)*n/N)` (floor division,
/// with the last rank taking the remainder), parsing each into a
/// [`KmerPair`].
pub fn read_partition(path: &Path, rank: usize, n_ranks: usize) -> AssemblyResult<Vec<KmerPair>> {
    let contents = fs::read_to_string(path).map_err(|e| io_err(path, e))?;
    let lines: Vec<&str> = contents.lines().filter(|l| !l.trim().is_empty()).collect();
    let n = lines.len();
    let start = rank * n / n_ranks;
    let end = if rank + 1 == n_ranks {
        n
    } else {
        (rank + 1) * n / n_ranks
    };

    let mut kmers = Vec::with_capacity(end.saturating_sub(start));
    for (offset, line) in lines[start..end].iter().enumerate() {
        let kmer = KmerPair::parse(line.trim_end()).map_err(|reason| AssemblyError::MalformedRecord {
            line: start + offset + 1,
            reason,
        })?;
        kmers.push(kmer);
    }
    Ok(kmers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_lines(lines: &[&str]) -> NamedTempFile {
        let mut f = NamedTempFile::new().unwrap();
        for line in lines {
            writeln!(f, "{line}").unwrap();
        }
        f
    }

    #[test]
    fn line_count_counts_non_empty_lines() {
        let line = "A".repeat(K) + "CF";
        let f = write_lines(&[&line, &line, &line]);
        assert_eq!(line_count(f.path()).unwrap(), 3);
    }

    #[test]
    fn validate_k_rejects_mismatched_length() {
        let short_line = "A".repeat(K - 1) + "CF";
        let f = write_lines(&[&short_line]);
        assert!(matches!(
            validate_k(f.path()),
            Err(AssemblyError::InputMismatch { .. })
        ));
    }

    #[test]
    fn partitioning_splits_by_floor_division_with_remainder_on_last_rank() {
        let line = "A".repeat(K) + "CF";
        let lines: Vec<&str> = (0..5).map(|_| line.as_str()).collect();
        let f = write_lines(&lines);
        // 5 lines across 2 ranks: rank 0 gets floor(5/2)=2, rank 1 gets the
        // remaining 3.
        let part0 = read_partition(f.path(), 0, 2).unwrap();
        let part1 = read_partition(f.path(), 1, 2).unwrap();
        assert_eq!(part0.len(), 2);
        assert_eq!(part1.len(), 3);
    }
}
