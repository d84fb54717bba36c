//! Fatal error kinds for the assembler.
//!
//! Every variant here is abort-level per the propagation policy: nothing in
//! this crate attempts to recover from one of these, retry, or continue with
//! partial results.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AssemblyError {
    #[error("{path}: contains {found}-mers, but this binary is compiled for {expected}-mers")]
    InputMismatch {
        path: String,
        found: usize,
        expected: usize,
    },

    #[error("rank {rank}: hash table segment is full (capacity {capacity})")]
    TableFull { rank: usize, capacity: usize },

    #[error("k-mer not found in hash table: {sequence}")]
    LookupMissing { sequence: String },

    #[error("transport fault: {0}")]
    TransportFault(String),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed k-mer record on line {line}: {reason}")]
    MalformedRecord { line: usize, reason: String },
}

pub type AssemblyResult<T> = Result<T, AssemblyError>;
