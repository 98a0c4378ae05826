//! # backtrans - codon alignment from a protein alignment
//!
//! Rebuilds a nucleotide alignment that follows the columns of an existing
//! amino-acid alignment, given the unaligned coding sequence of each protein.
//!
//! ## Architecture
//!
//! - `model`: Sequences, fixed-width alignments and identifier lookup
//! - `formats`: FASTA, FASTQ, PHYLIP, NEXUS and Clustal readers
//! - `genetic_code`: NCBI genetic codes and codon translation
//! - `backtrans`: The codon-by-codon walk for a single sequence
//! - `batch`: Whole-alignment driver, run configuration and diagnostics
//! - `output`: FASTA-style writer

pub mod backtrans;
pub mod batch;
pub mod formats;
pub mod genetic_code;
pub mod model;
pub mod output;
