//! NEXUS format parser.
//!
//! Reads the first DATA or CHARACTERS block of a NEXUS file:
//! ```text
//! #NEXUS
//! BEGIN DATA;
//!   DIMENSIONS NTAX=3 NCHAR=10;
//!   FORMAT DATATYPE=DNA GAP=- MISSING=?;
//!   MATRIX
//!     seq1 ACGTACGTAC
//!     seq2 TGCATGCATG
//!     seq3 AAAACCCCGG
//!   ;
//! END;
//! ```
//!
//! ## Supported Features
//!
//! - DIMENSIONS (NTAX, NCHAR), both optional
//! - FORMAT INTERLEAVE and MATCHCHAR
//! - Sequential rows spanning several lines (needs NCHAR)
//! - Quoted labels and `[bracket]` comments
//! - Case insensitive commands

use thiserror::Error;

use crate::model::Sequence;

/// Errors that can occur during NEXUS parsing.
#[derive(Error, Debug)]
pub enum NexusError {
    #[error("Not a NEXUS file (must start with #NEXUS)")]
    NotNexus,

    #[error("No DATA or CHARACTERS block found")]
    NoDataBlock,

    #[error("Missing MATRIX command in the data block")]
    MissingMatrix,

    #[error("Invalid {key} value: '{value}'")]
    InvalidDimension { key: String, value: String },

    #[error("Expected {expected} sequences (NTAX), found {found}")]
    SequenceCountMismatch { expected: usize, found: usize },

    #[error("Sequence '{name}' has length {found}, expected {expected} (NCHAR)")]
    SequenceLengthMismatch {
        name: String,
        expected: usize,
        found: usize,
    },

    #[error("Duplicate sequence name: '{0}'")]
    DuplicateName(String),
}

/// Result type for NEXUS operations.
pub type NexusResult<T> = Result<T, NexusError>;

/// Settings collected from the DIMENSIONS and FORMAT commands.
#[derive(Debug, Default)]
struct MatrixLayout {
    ntax: Option<usize>,
    nchar: Option<usize>,
    interleave: bool,
    matchchar: Option<u8>,
}

/// Parses NEXUS content from a string.
pub fn parse_nexus_str(content: &str) -> NexusResult<Vec<Sequence>> {
    let content = content.trim_start();
    let body = content
        .get(..6)
        .filter(|magic| magic.eq_ignore_ascii_case("#NEXUS"))
        .map(|_| &content[6..])
        .ok_or(NexusError::NotNexus)?;

    let text = strip_comments(body);
    let mut layout = MatrixLayout::default();
    let mut in_block = false;
    let mut found_block = false;
    let mut matrix: Option<&str> = None;

    for command in split_commands(&text) {
        let command = command.trim();
        let (keyword, args) = command
            .split_once(char::is_whitespace)
            .unwrap_or((command, ""));

        match keyword.to_ascii_uppercase().as_str() {
            "BEGIN" => {
                let block = args.trim().to_ascii_uppercase();
                in_block = block == "DATA" || block == "CHARACTERS";
                found_block |= in_block;
            }
            "END" | "ENDBLOCK" if in_block => break,
            "DIMENSIONS" if in_block => {
                for (key, value) in parameters(args) {
                    match key.as_str() {
                        "NTAX" => layout.ntax = Some(parse_count(&key, value)?),
                        "NCHAR" => layout.nchar = Some(parse_count(&key, value)?),
                        _ => {}
                    }
                }
            }
            "FORMAT" if in_block => {
                for (key, value) in parameters(args) {
                    match key.as_str() {
                        "INTERLEAVE" => {
                            layout.interleave = !value.is_some_and(|v| v.eq_ignore_ascii_case("NO"))
                        }
                        "MATCHCHAR" => layout.matchchar = value.and_then(|v| v.bytes().next()),
                        _ => {}
                    }
                }
            }
            "MATRIX" if in_block => matrix = Some(args),
            _ => {}
        }
    }

    if !found_block {
        return Err(NexusError::NoDataBlock);
    }
    let matrix = matrix.ok_or(NexusError::MissingMatrix)?;

    let mut rows = if layout.interleave {
        read_interleaved(matrix)
    } else {
        read_sequential(matrix, layout.nchar)?
    };

    if let Some(matchchar) = layout.matchchar {
        apply_matchchar(&mut rows, matchchar);
    }
    validate(&rows, &layout)?;

    Ok(rows
        .into_iter()
        .map(|(name, data)| Sequence::from_bytes(name, data))
        .collect())
}

/// Removes `[...]` comments outside quoted labels.
fn strip_comments(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut depth = 0usize;
    let mut quote: Option<char> = None;

    for c in text.chars() {
        match (c, quote, depth) {
            ('[', None, _) => depth += 1,
            (']', None, d) if d > 0 => depth -= 1,
            (_, None, d) if d > 0 => {}
            ('\'' | '"', None, _) => {
                quote = Some(c);
                result.push(c);
            }
            (_, Some(q), _) if c == q => {
                quote = None;
                result.push(c);
            }
            _ => result.push(c),
        }
    }
    result
}

/// Splits text into `;`-terminated commands, ignoring `;` inside quotes.
fn split_commands(text: &str) -> Vec<&str> {
    let mut commands = Vec::new();
    let mut start = 0;
    let mut quote: Option<char> = None;

    for (idx, c) in text.char_indices() {
        match (c, quote) {
            ('\'' | '"', None) => quote = Some(c),
            (_, Some(q)) if c == q => quote = None,
            (';', None) => {
                commands.push(&text[start..idx]);
                start = idx + 1;
            }
            _ => {}
        }
    }
    if !text[start..].trim().is_empty() {
        commands.push(&text[start..]);
    }
    commands
}

/// `KEY=VALUE` / `KEY = VALUE` / `KEY` parameters of a command, keys upper-cased.
fn parameters(args: &str) -> Vec<(String, Option<&str>)> {
    let spaced: Vec<&str> = args
        .split_whitespace()
        .flat_map(|word| word.split_inclusive('='))
        .flat_map(|part| match part.strip_suffix('=') {
            Some("") => vec!["="],
            Some(key) => vec![key, "="],
            None => vec![part],
        })
        .collect();

    let mut params = Vec::new();
    let mut i = 0;
    while i < spaced.len() {
        let key = spaced[i].to_ascii_uppercase();
        if spaced.get(i + 1) == Some(&"=") {
            params.push((key, spaced.get(i + 2).copied()));
            i += 3;
        } else {
            params.push((key, None));
            i += 1;
        }
    }
    params
}

fn parse_count(key: &str, value: Option<&str>) -> NexusResult<usize> {
    value
        .and_then(|v| v.parse().ok())
        .ok_or_else(|| NexusError::InvalidDimension {
            key: key.to_string(),
            value: value.unwrap_or_default().to_string(),
        })
}

/// Splits a matrix line into whitespace-separated tokens, unquoting labels.
fn tokenize(line: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;

    for c in line.chars() {
        match (c, quote) {
            ('\'' | '"', None) if current.is_empty() => quote = Some(c),
            (_, Some(q)) if c == q => {
                quote = None;
                tokens.push(std::mem::take(&mut current));
            }
            (_, Some(_)) => current.push(c),
            _ if c.is_whitespace() => {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
            }
            _ => current.push(c),
        }
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    tokens
}

/// Sequential rows: a label then data, which may continue on the next lines
/// until NCHAR symbols are read. Without NCHAR every line is one row.
fn read_sequential(matrix: &str, nchar: Option<usize>) -> NexusResult<Vec<(String, Vec<u8>)>> {
    let mut rows: Vec<(String, Vec<u8>)> = Vec::new();

    for line in matrix.lines() {
        let mut tokens = tokenize(line).into_iter();

        let continues = match (rows.last(), nchar) {
            (Some((_, data)), Some(n)) => data.len() < n,
            _ => false,
        };
        if continues {
            if let Some((_, data)) = rows.last_mut() {
                tokens.for_each(|t| data.extend(t.bytes()));
            }
            continue;
        }

        let Some(label) = tokens.next() else {
            continue;
        };
        if rows.iter().any(|(name, _)| *name == label) {
            return Err(NexusError::DuplicateName(label));
        }
        let data: Vec<u8> = tokens.flat_map(String::into_bytes).collect();
        rows.push((label, data));
    }
    Ok(rows)
}

/// Interleaved rows: every line is `label data`, labels repeat in each block.
fn read_interleaved(matrix: &str) -> Vec<(String, Vec<u8>)> {
    let mut rows: Vec<(String, Vec<u8>)> = Vec::new();

    for line in matrix.lines() {
        let mut tokens = tokenize(line).into_iter();
        let Some(label) = tokens.next() else {
            continue;
        };
        let chunk = tokens.flat_map(String::into_bytes);

        match rows.iter().position(|(name, _)| *name == label) {
            Some(idx) => rows[idx].1.extend(chunk),
            None => rows.push((label, chunk.collect())),
        }
    }
    rows
}

/// Replaces MATCHCHAR symbols with the symbol of the first row.
fn apply_matchchar(rows: &mut [(String, Vec<u8>)], matchchar: u8) {
    let Some(((_, reference), others)) = rows.split_first_mut() else {
        return;
    };
    for (_, data) in others {
        for (symbol, &original) in data.iter_mut().zip(reference.iter()) {
            if *symbol == matchchar {
                *symbol = original;
            }
        }
    }
}

fn validate(rows: &[(String, Vec<u8>)], layout: &MatrixLayout) -> NexusResult<()> {
    if let Some(ntax) = layout.ntax {
        if rows.len() != ntax {
            return Err(NexusError::SequenceCountMismatch {
                expected: ntax,
                found: rows.len(),
            });
        }
    }
    if rows.is_empty() {
        return Err(NexusError::MissingMatrix);
    }
    if let Some(nchar) = layout.nchar {
        if let Some((name, data)) = rows.iter().find(|(_, data)| data.len() != nchar) {
            return Err(NexusError::SequenceLengthMismatch {
                name: name.clone(),
                expected: nchar,
                found: data.len(),
            });
        }
    }
    Ok(())
}
