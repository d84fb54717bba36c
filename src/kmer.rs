//! The packed k-mer value type.
//!
//! Treated by the rest of the crate as an opaque, hashable, equality-comparable
//! fixed-size record: two single-byte extensions plus a fixed-length DNA
//! sequence. Nothing outside this module inspects the sequence's bytes
//! directly except to hash, compare, shift, and print it.

use crate::config::K;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Extension alphabet. `F` denotes a chain terminus.
pub const EXT_ALPHABET: [u8; 5] = [b'A', b'C', b'G', b'T', b'F'];

pub fn is_valid_ext(b: u8) -> bool {
    EXT_ALPHABET.contains(&b)
}

/// A fixed-length DNA sequence of `K` bases paired with a forward and a
/// backward extension byte.
#[derive(Debug, Clone, Copy)]
pub struct KmerPair {
    sequence: [u8; K],
    forward_ext: u8,
    backward_ext: u8,
}

impl KmerPair {
    pub fn new(sequence: [u8; K], forward_ext: u8, backward_ext: u8) -> Self {
        Self {
            sequence,
            forward_ext,
            backward_ext,
        }
    }

    /// Parses a single input line of the form `<K bases><fwd><bwd>`.
    pub fn parse(line: &str) -> Result<Self, String> {
        let bytes = line.as_bytes();
        if bytes.len() != K + 2 {
            return Err(format!(
                "expected a line of length {} (K={K} bases + 2 extension bytes), got {}",
                K + 2,
                bytes.len()
            ));
        }
        let mut sequence = [0u8; K];
        sequence.copy_from_slice(&bytes[..K]);
        let forward_ext = bytes[K];
        let backward_ext = bytes[K + 1];
        if !is_valid_ext(forward_ext) || !is_valid_ext(backward_ext) {
            return Err(format!(
                "extension bytes must be one of {:?}, got forward={}, backward={}",
                EXT_ALPHABET.map(|b| b as char),
                forward_ext as char,
                backward_ext as char
            ));
        }
        Ok(Self::new(sequence, forward_ext, backward_ext))
    }

    pub fn sequence(&self) -> &[u8; K] {
        &self.sequence
    }

    pub fn forward_ext(&self) -> u8 {
        self.forward_ext
    }

    pub fn backward_ext(&self) -> u8 {
        self.backward_ext
    }

    pub fn is_terminus(&self) -> bool {
        self.forward_ext == b'F'
    }

    pub fn is_start_node(&self) -> bool {
        self.backward_ext == b'F'
    }

    /// The sequence shifted left by one base with the forward extension
    /// appended: the sequence of the k-mer that should follow this one in
    /// the chain.
    pub fn next_kmer_sequence(&self) -> [u8; K] {
        let mut next = [0u8; K];
        next[..K - 1].copy_from_slice(&self.sequence[1..]);
        next[K - 1] = self.forward_ext;
        next
    }

    /// A 64-bit hash of the sequence only. Non-cryptographic, deterministic
    /// within a single process run (every rank thread shares the same
    /// process-wide `ahash` seed, which is exactly what routing requires;
    /// see DESIGN.md).
    pub fn hash(&self) -> u64 {
        let mut hasher = ahash::AHasher::default();
        self.sequence.hash(&mut hasher);
        hasher.finish()
    }
}

/// Equality is defined over the sequence alone, matching the "equality over
/// the sequence" contract: two records with the same bases but (for whatever
/// reason) different extension bytes are still the same k-mer for lookup
/// purposes.
impl PartialEq for KmerPair {
    fn eq(&self, other: &Self) -> bool {
        self.sequence == other.sequence
    }
}
impl Eq for KmerPair {}

impl fmt::Display for KmerPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &b in &self.sequence {
            write!(f, "{}", b as char)?;
        }
        Ok(())
    }
}

/// Hashes the sequence bytes of a raw (not-yet-wrapped) k-mer using the same
/// hasher `KmerPair::hash` uses, for routing lookups against a bare
/// `[u8; K]` (e.g. the `next_kmer_sequence()` the driver asks `find` for).
pub fn hash_sequence(sequence: &[u8; K]) -> u64 {
    let mut hasher = ahash::AHasher::default();
    sequence.hash(&mut hasher);
    hasher.finish()
}
