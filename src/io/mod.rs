//! File format I/O: the k-mer file parser and the contig writer. Treated as
//! ambient engineering (SPEC_FULL.md §2): necessary for a runnable crate,
//! but not part of the distributed-table core.

pub mod contig_writer;
pub mod kmer_file;
