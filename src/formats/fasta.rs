//! FASTA parser.
//!
//! Handles single-line and multi-line sequences.
//!
//! ## FASTA Format
//!
//! ```text
//! >sequence_identifier optional description
//! ACGTACGTACGT...
//! >another_sequence
//! TGCATGCATGCA...
//! ```

use thiserror::Error;

use crate::model::Sequence;

/// Errors that can occur during FASTA parsing.
#[derive(Error, Debug)]
pub enum FastaError {
    #[error("Empty FASTA file")]
    EmptyFile,

    #[error("Invalid FASTA format: {0}")]
    InvalidFormat(String),

    #[error("Sequence without header at line {0}")]
    SequenceWithoutHeader(usize),
}

/// Result type for FASTA operations.
pub type FastaResult<T> = Result<T, FastaError>;

/// Parses FASTA content held in memory.
///
/// The identifier is the first whitespace-delimited word of the header.
/// Records without any sequence data are kept as empty sequences.
pub fn parse_fasta_str(content: &str) -> FastaResult<Vec<Sequence>> {
    let mut sequences = Vec::new();
    let mut current: Option<(&str, Vec<u8>)> = None;

    for (idx, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(header) = line.strip_prefix('>') {
            if let Some((id, data)) = current.take() {
                sequences.push(Sequence::from_bytes(id, data));
            }

            let id = header.split_whitespace().next().unwrap_or_default();
            if id.is_empty() {
                return Err(FastaError::InvalidFormat(format!(
                    "Empty sequence identifier at line {}",
                    idx + 1
                )));
            }
            current = Some((id, Vec::new()));
        } else {
            let Some((_, data)) = current.as_mut() else {
                return Err(FastaError::SequenceWithoutHeader(idx + 1));
            };
            data.extend(line.bytes().filter(|b| !b.is_ascii_whitespace()));
        }
    }

    if let Some((id, data)) = current {
        sequences.push(Sequence::from_bytes(id, data));
    }

    if sequences.is_empty() {
        return Err(FastaError::EmptyFile);
    }

    Ok(sequences)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_fasta() {
        let seqs = parse_fasta_str(">seq1\nACGT\n>seq2\nTGCA\n").unwrap();

        assert_eq!(seqs.len(), 2);
        assert_eq!(seqs[0].id, "seq1");
        assert_eq!(seqs[0].as_str(), "ACGT");
        assert_eq!(seqs[1].id, "seq2");
        assert_eq!(seqs[1].as_str(), "TGCA");
    }

    #[test]
    fn test_parse_multiline_sequence() {
        let seqs = parse_fasta_str(">seq1\nACGT\nTGCA\nAAAA\n").unwrap();
        assert_eq!(seqs.len(), 1);
        assert_eq!(seqs[0].as_str(), "ACGTTGCAAAAA");
    }

    #[test]
    fn test_parse_with_description() {
        let seqs = parse_fasta_str(">seq1 This is a description\nMK-L\n").unwrap();
        assert_eq!(seqs[0].id, "seq1");
        assert_eq!(seqs[0].as_str(), "MK-L");
    }

    #[test]
    fn test_parse_with_empty_lines_and_crlf() {
        let seqs = parse_fasta_str(">seq1\r\nACGT\r\n\r\n>seq2\n\nTG CA\n").unwrap();
        assert_eq!(seqs.len(), 2);
        assert_eq!(seqs[0].as_str(), "ACGT");
        assert_eq!(seqs[1].as_str(), "TGCA");
    }

    #[test]
    fn test_record_without_data() {
        let seqs = parse_fasta_str(">empty\n>seq2\nATG\n").unwrap();
        assert_eq!(seqs.len(), 2);
        assert!(seqs[0].is_empty());
    }

    #[test]
    fn test_empty_file() {
        assert!(matches!(parse_fasta_str(""), Err(FastaError::EmptyFile)));
        assert!(matches!(parse_fasta_str("\n\n"), Err(FastaError::EmptyFile)));
    }

    #[test]
    fn test_sequence_without_header() {
        let result = parse_fasta_str("ACGT\n>seq1\nTGCA\n");
        assert!(matches!(result, Err(FastaError::SequenceWithoutHeader(1))));
    }

    #[test]
    fn test_empty_identifier() {
        let result = parse_fasta_str(">\nACGT\n");
        assert!(matches!(result, Err(FastaError::InvalidFormat(_))));
    }

    #[test]
    fn test_case_preservation() {
        let seqs = parse_fasta_str(">seq1\nacgt\n").unwrap();
        assert_eq!(seqs[0].as_str(), "acgt");
    }
}
