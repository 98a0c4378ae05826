//! Multi-format sequence file readers.
//!
//! Supports the formats accepted by `--informat`:
//! - FASTA
//! - FASTQ
//! - PHYLIP - sequential and interleaved
//! - NEXUS
//! - Clustal (ClustalW / Clustal Omega, also MUSCLE and PROBCONS headers)
//!
//! The same format applies to the protein alignment and to the unaligned
//! nucleotide file. The alignment must be fixed-width; the nucleotide file is
//! indexed by identifier.

pub mod clustal;
pub mod fasta;
pub mod fastq;
pub mod nexus;
pub mod phylip;

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use thiserror::Error;

use crate::model::{Alignment, AlignmentError, Sequence, SequenceIndex};

/// Input file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Fasta,
    Fastq,
    Phylip,
    Nexus,
    Clustal,
}

impl std::fmt::Display for FileFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FileFormat::Fasta => write!(f, "FASTA"),
            FileFormat::Fastq => write!(f, "FASTQ"),
            FileFormat::Phylip => write!(f, "PHYLIP"),
            FileFormat::Nexus => write!(f, "NEXUS"),
            FileFormat::Clustal => write!(f, "Clustal"),
        }
    }
}

/// Errors that can occur while reading an input file.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Empty file")]
    EmptyFile,

    #[error("FASTA error: {0}")]
    FastaError(#[from] fasta::FastaError),

    #[error("FASTQ error: {0}")]
    FastqError(#[from] fastq::FastqError),

    #[error("PHYLIP error: {0}")]
    PhylipError(#[from] phylip::PhylipError),

    #[error("NEXUS error: {0}")]
    NexusError(#[from] nexus::NexusError),

    #[error("Clustal error: {0}")]
    ClustalError(#[from] clustal::ClustalError),

    #[error(transparent)]
    Alignment(#[from] AlignmentError),
}

/// Result type for parsing operations.
pub type ParseResult<T> = Result<T, ParseError>;

/// Parses in-memory content with a specific format.
pub fn parse_content(content: &str, format: FileFormat) -> ParseResult<Vec<Sequence>> {
    let sequences = match format {
        FileFormat::Fasta => fasta::parse_fasta_str(content)?,
        FileFormat::Fastq => fastq::parse_fastq_str(content)?,
        FileFormat::Phylip => phylip::parse_phylip_str(content)?,
        FileFormat::Nexus => nexus::parse_nexus_str(content)?,
        FileFormat::Clustal => clustal::parse_clustal_str(content)?,
    };
    Ok(sequences)
}

/// Reads every record of a file in the given format.
pub fn read_sequences<P: AsRef<Path>>(path: P, format: FileFormat) -> ParseResult<Vec<Sequence>> {
    let file = File::open(&path)?;
    let file_size = file.metadata()?.len() as usize;

    if file_size == 0 {
        return Err(ParseError::EmptyFile);
    }

    let mut reader = BufReader::with_capacity(1024 * 1024, file);
    let mut content = String::with_capacity(file_size);
    reader.read_to_string(&mut content)?;

    parse_content(&content, format)
}

/// Reads a fixed-width alignment.
pub fn read_alignment<P: AsRef<Path>>(path: P, format: FileFormat) -> ParseResult<Alignment> {
    let sequences = read_sequences(path, format)?;
    Ok(Alignment::new(sequences)?)
}

/// Reads unaligned sequences and indexes them by identifier.
pub fn read_sequence_index<P: AsRef<Path>>(
    path: P,
    format: FileFormat,
) -> ParseResult<SequenceIndex> {
    let sequences = read_sequences(path, format)?;
    Ok(SequenceIndex::new(sequences)?)
}

/// True for symbols that may appear inside sequence data of any format.
pub(crate) fn is_sequence_symbol(c: char) -> bool {
    c.is_ascii_alphabetic() || matches!(c, '-' | '.' | '*' | '?')
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn write_temp(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_parse_content_dispatch() {
        let fasta = parse_content(">a\nMK\n", FileFormat::Fasta).unwrap();
        assert_eq!(fasta[0].as_str(), "MK");

        let fastq = parse_content("@a\nATG\n+\nIII\n", FileFormat::Fastq).unwrap();
        assert_eq!(fastq[0].as_str(), "ATG");

        let phylip = parse_content("1 2\na MK\n", FileFormat::Phylip).unwrap();
        assert_eq!(phylip[0].id, "a");

        let clustal = parse_content("CLUSTAL W\n\na MK\n", FileFormat::Clustal).unwrap();
        assert_eq!(clustal[0].as_str(), "MK");
    }

    #[test]
    fn test_read_alignment() {
        let file = write_temp(">a\nM-K\n>b\nMLK\n");
        let alignment = read_alignment(file.path(), FileFormat::Fasta).unwrap();
        assert_eq!(alignment.sequence_count(), 2);
        assert_eq!(alignment.width(), 3);
    }

    #[test]
    fn test_read_ragged_alignment() {
        let file = write_temp(">a\nM-K\n>b\nMK\n");
        let result = read_alignment(file.path(), FileFormat::Fasta);
        assert!(matches!(
            result,
            Err(ParseError::Alignment(AlignmentError::Ragged { .. }))
        ));
    }

    #[test]
    fn test_read_sequence_index() {
        let file = write_temp(">a desc\nATGAAA\n>b\nATG\n");
        let index = read_sequence_index(file.path(), FileFormat::Fasta).unwrap();
        assert_eq!(index.len(), 2);
        assert_eq!(index.get("a").unwrap().as_str(), "ATGAAA");
    }

    #[test]
    fn test_read_empty_file() {
        let file = write_temp("");
        assert!(matches!(
            read_sequences(file.path(), FileFormat::Fasta),
            Err(ParseError::EmptyFile)
        ));
    }

    #[test]
    fn test_read_missing_file() {
        let result = read_sequences("does/not/exist.fasta", FileFormat::Fasta);
        assert!(matches!(result, Err(ParseError::IoError(_))));
    }

    #[test]
    fn test_wrong_format_is_an_error() {
        let file = write_temp(">a\nMK\n");
        assert!(read_sequences(file.path(), FileFormat::Nexus).is_err());
    }
}
