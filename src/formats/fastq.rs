//! FASTQ parser.
//!
//! ## FASTQ Format
//!
//! ```text
//! @read_identifier optional description
//! ACGTACGT
//! +
//! IIIIIIII
//! ```
//!
//! Sequence and quality may wrap over several lines; the quality block ends
//! once it is as long as the sequence. Quality values are checked for length
//! and then dropped, only the sequence is kept.

use thiserror::Error;

use crate::model::Sequence;

/// Errors that can occur during FASTQ parsing.
#[derive(Error, Debug)]
pub enum FastqError {
    #[error("Empty FASTQ file")]
    EmptyFile,

    #[error("Line {0}: expected a '@' header")]
    MissingHeader(usize),

    #[error("Line {0}: empty read identifier")]
    EmptyIdentifier(usize),

    #[error("Record '{0}' has no '+' separator")]
    MissingSeparator(String),

    #[error("Record '{id}' has {sequence} bases but {quality} quality values")]
    QualityLengthMismatch {
        id: String,
        sequence: usize,
        quality: usize,
    },
}

/// Result type for FASTQ operations.
pub type FastqResult<T> = Result<T, FastqError>;

/// Parses FASTQ content held in memory.
pub fn parse_fastq_str(content: &str) -> FastqResult<Vec<Sequence>> {
    let mut sequences = Vec::new();
    let mut lines = content
        .lines()
        .enumerate()
        .map(|(idx, line)| (idx + 1, line.trim_end()))
        .filter(|(_, line)| !line.is_empty());

    while let Some((line_number, header)) = lines.next() {
        let Some(header) = header.strip_prefix('@') else {
            return Err(FastqError::MissingHeader(line_number));
        };
        let id = header.split_whitespace().next().unwrap_or_default();
        if id.is_empty() {
            return Err(FastqError::EmptyIdentifier(line_number));
        }

        let mut bases: Vec<u8> = Vec::new();
        let mut separated = false;
        for (_, line) in lines.by_ref() {
            if line.starts_with('+') {
                separated = true;
                break;
            }
            bases.extend(line.trim().bytes());
        }
        if !separated {
            return Err(FastqError::MissingSeparator(id.to_string()));
        }

        // '@' is a legal quality symbol, so quality lines are consumed by length.
        let mut quality = 0;
        while quality < bases.len() {
            match lines.next() {
                Some((_, line)) => quality += line.trim().len(),
                None => break,
            }
        }
        if quality != bases.len() {
            return Err(FastqError::QualityLengthMismatch {
                id: id.to_string(),
                sequence: bases.len(),
                quality,
            });
        }

        sequences.push(Sequence::from_bytes(id, bases));
    }

    if sequences.is_empty() {
        return Err(FastqError::EmptyFile);
    }

    Ok(sequences)
}
