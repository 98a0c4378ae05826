//! Clustal format parser.
//!
//! Reads ClustalW / Clustal Omega alignments (MUSCLE and PROBCONS write the
//! same layout under their own header):
//! ```text
//! CLUSTAL W (1.83) multiple sequence alignment
//!
//! seq1    MK-LV 4
//! seq2    MKQLV 5
//!         ** **
//! ```
//!
//! Each block holds one `name fragment [residue count]` line per sequence.
//! Conservation lines are indented and ignored.

use thiserror::Error;

use crate::formats::is_sequence_symbol;
use crate::model::Sequence;

/// Headers accepted on the first non-empty line.
const HEADERS: [&str; 3] = ["CLUSTAL", "MUSCLE", "PROBCONS"];

/// Errors that can occur during Clustal parsing.
#[derive(Error, Debug)]
pub enum ClustalError {
    #[error("Missing CLUSTAL header line")]
    MissingHeader,

    #[error("No sequences found after the header")]
    NoSequences,

    #[error("Line {line}: unexpected symbol '{symbol}' in sequence data")]
    InvalidSymbol { line: usize, symbol: char },
}

/// Result type for Clustal operations.
pub type ClustalResult<T> = Result<T, ClustalError>;

/// Parses Clustal content from a string.
pub fn parse_clustal_str(content: &str) -> ClustalResult<Vec<Sequence>> {
    let mut lines = content
        .lines()
        .enumerate()
        .map(|(idx, line)| (idx + 1, line.trim_end()))
        .filter(|(_, line)| !line.trim().is_empty());

    let has_header = lines
        .next()
        .is_some_and(|(_, header)| HEADERS.iter().any(|h| header.trim_start().starts_with(h)));
    if !has_header {
        return Err(ClustalError::MissingHeader);
    }

    let mut rows: Vec<(String, Vec<u8>)> = Vec::new();
    for (line_number, line) in lines {
        // Conservation lines never start at column 0.
        if line.starts_with(char::is_whitespace) {
            continue;
        }

        let mut fields = line.split_whitespace();
        let (Some(name), Some(fragment)) = (fields.next(), fields.next()) else {
            continue;
        };

        if let Some(symbol) = fragment.chars().find(|&c| !is_sequence_symbol(c)) {
            return Err(ClustalError::InvalidSymbol {
                line: line_number,
                symbol,
            });
        }

        match rows.iter().position(|(id, _)| id == name) {
            Some(idx) => rows[idx].1.extend(fragment.bytes()),
            None => rows.push((name.to_string(), fragment.bytes().collect())),
        }
    }

    if rows.is_empty() {
        return Err(ClustalError::NoSequences);
    }

    Ok(rows
        .into_iter()
        .map(|(name, data)| Sequence::from_bytes(name, data))
        .collect())
}
