//! Data model for back-translation.
//!
//! This module contains the sequence containers shared by the readers,
//! the back-translation walk and the writer:
//! - `Sequence`: an identifier and its raw symbols
//! - `Alignment`: an ordered, fixed-width set of aligned sequences
//! - `SequenceIndex`: unaligned sequences looked up by identifier

use std::collections::HashMap;

use thiserror::Error;

/// Errors raised when building an alignment or a sequence index.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AlignmentError {
    #[error("Sequence '{id}' has length {found}, but the alignment is {expected} columns wide")]
    Ragged {
        id: String,
        expected: usize,
        found: usize,
    },

    #[error("Duplicate sequence identifier: '{0}'")]
    DuplicateId(String),
}

/// Result type for model construction.
pub type AlignmentResult<T> = Result<T, AlignmentError>;

/// Represents a single sequence with its identifier and data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sequence {
    /// The sequence identifier (from the record header, without '>' or '@')
    pub id: String,
    /// Raw symbols (nucleotides, residues or gaps)
    data: Vec<u8>,
}

impl Sequence {
    /// Creates a new sequence from text.
    pub fn new(id: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            data: data.into().into_bytes(),
        }
    }

    /// Creates a new sequence from raw bytes.
    pub fn from_bytes(id: impl Into<String>, data: Vec<u8>) -> Self {
        Self { id: id.into(), data }
    }

    /// Returns the length of the sequence.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns true if the sequence is empty.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Raw symbols of the sequence.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Symbols as text. Non-UTF-8 data (never produced by the readers) reads as empty.
    pub fn as_str(&self) -> &str {
        std::str::from_utf8(&self.data).unwrap_or_default()
    }
}

/// An ordered set of aligned sequences sharing one width.
#[derive(Debug, Clone, Default)]
pub struct Alignment {
    sequences: Vec<Sequence>,
    width: usize,
}

impl Alignment {
    /// Creates an alignment, rejecting sequences whose length differs from the first one.
    pub fn new(sequences: Vec<Sequence>) -> AlignmentResult<Self> {
        let width = sequences.first().map_or(0, Sequence::len);

        if let Some(odd) = sequences.iter().find(|s| s.len() != width) {
            return Err(AlignmentError::Ragged {
                id: odd.id.clone(),
                expected: width,
                found: odd.len(),
            });
        }

        Ok(Self { sequences, width })
    }

    /// Number of columns (L).
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the number of sequences.
    pub fn sequence_count(&self) -> usize {
        self.sequences.len()
    }

    /// All sequences, in file order.
    pub fn sequences(&self) -> &[Sequence] {
        &self.sequences
    }

    /// Returns true if the alignment is empty.
    pub fn is_empty(&self) -> bool {
        self.sequences.is_empty()
    }
}

/// Unaligned sequences keyed by identifier.
#[derive(Debug, Clone, Default)]
pub struct SequenceIndex {
    by_id: HashMap<String, Sequence>,
}

impl SequenceIndex {
    /// Indexes sequences by identifier. Identifiers must be unique.
    pub fn new(sequences: Vec<Sequence>) -> AlignmentResult<Self> {
        let mut by_id = HashMap::with_capacity(sequences.len());
        for seq in sequences {
            if by_id.contains_key(&seq.id) {
                return Err(AlignmentError::DuplicateId(seq.id));
            }
            by_id.insert(seq.id.clone(), seq);
        }
        Ok(Self { by_id })
    }

    pub fn get(&self, id: &str) -> Option<&Sequence> {
        self.by_id.get(id)
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}
