//! PHYLIP format parser.
//!
//! The first line holds the number of sequences and the number of columns:
//! ```text
//!  3 10
//! ```
//!
//! The next `ntax` data lines each start with a label. Any further data
//! lines continue the sequences in the same order, block after block
//! (interleaved layout); a file with one line per sequence is the special
//! case of a single block.
//!
//! ```text
//!  3 20
//! Seq1      ACGTACGTAC
//! Seq2      TGCATGCATG
//! Seq3      AAAACCCCGG
//!
//! GTGTGTGTGT
//! CACACACACA
//! TTTTTTTTTT
//! ```
//!
//! Labels are read as strict PHYLIP first: the first 10 columns hold the
//! name, which may contain spaces, and the rest of the line is data. When that
//! reading does not fit the header, labels are split from the data at the first
//! whitespace instead (relaxed PHYLIP, names of any length).

use thiserror::Error;

use crate::formats::is_sequence_symbol;
use crate::model::Sequence;

/// Width of a strict PHYLIP label.
const STRICT_LABEL_WIDTH: usize = 10;

/// Errors that can occur during PHYLIP parsing.
#[derive(Error, Debug)]
pub enum PhylipError {
    #[error("Empty PHYLIP file")]
    EmptyFile,

    #[error("Invalid header: expected 'ntax nchar' (two integers), got '{0}'")]
    InvalidHeader(String),

    #[error("Expected {expected} sequences but found {found}")]
    SequenceCountMismatch { expected: usize, found: usize },

    #[error("Sequence '{name}' has length {found}, expected {expected}")]
    SequenceLengthMismatch {
        name: String,
        expected: usize,
        found: usize,
    },

    #[error("Line {line}: unexpected symbol '{symbol}' in sequence data")]
    InvalidSymbol { line: usize, symbol: char },
}

/// Result type for PHYLIP operations.
pub type PhylipResult<T> = Result<T, PhylipError>;

/// How the first block separates names from data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LabelStyle {
    /// Name in the first 10 columns
    Strict,
    /// Name up to the first whitespace
    Relaxed,
}

/// Parses PHYLIP content from a string.
pub fn parse_phylip_str(content: &str) -> PhylipResult<Vec<Sequence>> {
    parse_with_labels(content, LabelStyle::Strict)
        .or_else(|_| parse_with_labels(content, LabelStyle::Relaxed))
}

fn parse_with_labels(content: &str, style: LabelStyle) -> PhylipResult<Vec<Sequence>> {
    let mut lines = content
        .lines()
        .enumerate()
        .map(|(idx, line)| (idx + 1, line.trim_end()))
        .filter(|(_, line)| !line.trim_start().is_empty());

    let (_, header) = lines.next().ok_or(PhylipError::EmptyFile)?;
    let (ntax, nchar) = parse_header(header)?;

    let mut sequences: Vec<(String, Vec<u8>)> = Vec::with_capacity(ntax);
    for (block_row, (line_number, line)) in lines.enumerate() {
        if sequences.len() < ntax {
            let (label, data) = split_label(line, style);
            let mut residues = Vec::with_capacity(nchar);
            push_residues(&mut residues, data, line_number)?;
            sequences.push((label.to_string(), residues));
        } else {
            let row = (block_row - ntax) % ntax;
            push_residues(&mut sequences[row].1, line, line_number)?;
        }
    }

    if sequences.len() != ntax {
        return Err(PhylipError::SequenceCountMismatch {
            expected: ntax,
            found: sequences.len(),
        });
    }

    if let Some((name, data)) = sequences.iter().find(|(_, data)| data.len() != nchar) {
        return Err(PhylipError::SequenceLengthMismatch {
            name: name.clone(),
            expected: nchar,
            found: data.len(),
        });
    }

    Ok(sequences
        .into_iter()
        .map(|(name, data)| Sequence::from_bytes(name, data))
        .collect())
}

/// Parses the `ntax nchar` header line.
fn parse_header(header: &str) -> PhylipResult<(usize, usize)> {
    let invalid = || PhylipError::InvalidHeader(header.to_string());
    let mut fields = header.split_whitespace();

    let ntax: usize = fields.next().and_then(|f| f.parse().ok()).ok_or_else(invalid)?;
    let nchar: usize = fields.next().and_then(|f| f.parse().ok()).ok_or_else(invalid)?;

    if ntax == 0 {
        return Err(invalid());
    }
    Ok((ntax, nchar))
}

/// Splits a labelled line into label and sequence data.
fn split_label(line: &str, style: LabelStyle) -> (&str, &str) {
    match style {
        LabelStyle::Strict if line.is_char_boundary(STRICT_LABEL_WIDTH) => {
            let (label, data) = line.split_at(STRICT_LABEL_WIDTH);
            (label.trim(), data)
        }
        LabelStyle::Strict => (line.trim(), ""),
        LabelStyle::Relaxed => {
            let line = line.trim_start();
            match line.split_once(char::is_whitespace) {
                Some((label, data)) => (label, data),
                None if line.is_char_boundary(STRICT_LABEL_WIDTH) => {
                    line.split_at(STRICT_LABEL_WIDTH)
                }
                None => (line, ""),
            }
        }
    }
}

/// Appends the sequence symbols of `data`, skipping whitespace and column counters.
fn push_residues(residues: &mut Vec<u8>, data: &str, line_number: usize) -> PhylipResult<()> {
    for c in data.chars().filter(|c| !c.is_whitespace() && !c.is_ascii_digit()) {
        if !is_sequence_symbol(c) {
            return Err(PhylipError::InvalidSymbol {
                line: line_number,
                symbol: c,
            });
        }
        residues.push(c as u8);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_one_line_per_sequence() {
        let content = " 3 10
Seq1      ACGTACGTAC
Seq2      TGCATGCATG
Seq3      AAAACCCCGG
";
        let seqs = parse_phylip_str(content).unwrap();
        assert_eq!(seqs.len(), 3);
        assert_eq!(seqs[0].id, "Seq1");
        assert_eq!(seqs[0].as_str(), "ACGTACGTAC");
        assert_eq!(seqs[1].id, "Seq2");
        assert_eq!(seqs[2].id, "Seq3");
    }

    #[test]
    fn test_parse_interleaved() {
        let content = " 3 20
Seq1      ACGTACGTAC
Seq2      TGCATGCATG
Seq3      AAAACCCCGG

GGGGGGGGGG
CCCCCCCCCC
TTTTTTTTTT
";
        let seqs = parse_phylip_str(content).unwrap();
        assert_eq!(seqs.len(), 3);
        assert_eq!(seqs[0].as_str(), "ACGTACGTACGGGGGGGGGG");
        assert_eq!(seqs[1].as_str(), "TGCATGCATGCCCCCCCCCC");
        assert_eq!(seqs[2].as_str(), "AAAACCCCGGTTTTTTTTTT");
    }

    #[test]
    fn test_spaced_residue_groups() {
        let content = "2 8
alpha MKLV -AGT
beta  MK-V QAGT
";
        let seqs = parse_phylip_str(content).unwrap();
        assert_eq!(seqs[0].id, "alpha");
        assert_eq!(seqs[0].as_str(), "MKLV-AGT");
        assert_eq!(seqs[1].as_str(), "MK-VQAGT");
    }

    #[test]
    fn test_strict_labels_without_whitespace() {
        let content = "2 4
Sequence01MK-L
Sequence02MKQL
";
        let seqs = parse_phylip_str(content).unwrap();
        assert_eq!(seqs[0].id, "Sequence01");
        assert_eq!(seqs[1].as_str(), "MKQL");
    }

    #[test]
    fn test_strict_full_width_labels_with_blocks() {
        let content = "2 20
Sequence01ACGTACGTAC GTGTGTGTGT
Sequence02TGCATGCATG CACACACACA
";
        let seqs = parse_phylip_str(content).unwrap();
        assert_eq!(seqs[0].id, "Sequence01");
        assert_eq!(seqs[0].as_str(), "ACGTACGTACGTGTGTGTGT");
        assert_eq!(seqs[1].id, "Sequence02");
        assert_eq!(seqs[1].as_str(), "TGCATGCATGCACACACACA");
    }

    #[test]
    fn test_strict_labels_with_spaces() {
        let content = "2 4
seq 1     MK-L
seq 2     MKQL
";
        let seqs = parse_phylip_str(content).unwrap();
        assert_eq!(seqs[0].id, "seq 1");
        assert_eq!(seqs[0].as_str(), "MK-L");
        assert_eq!(seqs[1].id, "seq 2");
        assert_eq!(seqs[1].as_str(), "MKQL");
    }

    #[test]
    fn test_relaxed_long_labels() {
        let content = "2 4
a_rather_long_name MK-L
another_long_name  MKQL
";
        let seqs = parse_phylip_str(content).unwrap();
        assert_eq!(seqs[0].id, "a_rather_long_name");
        assert_eq!(seqs[0].as_str(), "MK-L");
        assert_eq!(seqs[1].id, "another_long_name");
    }

    #[test]
    fn test_parse_with_gaps() {
        let content = " 2 10
Seq1      ACGT--GTAC
Seq2      TG--TGCATG
";
        let seqs = parse_phylip_str(content).unwrap();
        assert_eq!(seqs[0].as_str(), "ACGT--GTAC");
        assert_eq!(seqs[1].as_str(), "TG--TGCATG");
    }

    #[test]
    fn test_empty_file() {
        assert!(matches!(parse_phylip_str(""), Err(PhylipError::EmptyFile)));
    }

    #[test]
    fn test_invalid_header() {
        assert!(matches!(
            parse_phylip_str("invalid\nSeq1 ACGT\n"),
            Err(PhylipError::InvalidHeader(_))
        ));
        assert!(matches!(
            parse_phylip_str("0 4\n"),
            Err(PhylipError::InvalidHeader(_))
        ));
    }

    #[test]
    fn test_too_few_sequences() {
        let content = " 3 10
Seq1      ACGTACGTAC
Seq2      TGCATGCATG
";
        assert!(matches!(
            parse_phylip_str(content),
            Err(PhylipError::SequenceCountMismatch {
                expected: 3,
                found: 2
            })
        ));
    }

    #[test]
    fn test_length_mismatch() {
        let content = "2 5
a ACGTA
b ACG
";
        assert!(matches!(
            parse_phylip_str(content),
            Err(PhylipError::SequenceLengthMismatch { found: 3, .. })
        ));
    }

    #[test]
    fn test_invalid_symbol() {
        let content = "1 4\na AC#T\n";
        assert!(matches!(
            parse_phylip_str(content),
            Err(PhylipError::InvalidSymbol { line: 2, symbol: '#' })
        ));
    }
}
