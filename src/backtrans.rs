//! Back-translation of one aligned protein onto its unaligned coding sequence.
//!
//! The walk advances through the aligned residues and the nucleotides in
//! lock-step, one codon per residue column:
//!
//! 1. Leading gap columns become a fixed prefix of `---` codons.
//! 2. Gap columns emit `---` without consuming nucleotides.
//! 3. A residue column translates the codon under the nucleotide cursor. A match
//!    emits the codon and advances both cursors. Before the first match of a run
//!    a mismatch only slides the nucleotide frame by one codon. After it, a
//!    mismatch backtracks: every codon emitted since the run began is discarded
//!    and the run is retried one codon further along the nucleotides.
//!
//! Backtracking always restarts one *codon* past the checkpoint, never one
//! nucleotide, so a frameshift inside the coding sequence is not recovered:
//! the walk keeps sliding whole codons and usually runs out of nucleotides.
//!
//! ```text
//! residues     M - K
//! nucleotides  TTT ATG AAA
//! walk         TTT≠M (slide)  ATG=M  gap  AAA=K
//! output       ATG --- AAA
//! ```

use thiserror::Error;

use crate::genetic_code::CodonTranslator;
use crate::model::Sequence;

/// Codon emitted for gap columns.
pub const GAP_CODON: &[u8; 3] = b"---";

/// Codon width in nucleotides.
pub const CODON_LEN: usize = 3;

/// Residue symbols treated as alignment gaps.
pub fn is_gap(residue: u8) -> bool {
    matches!(residue, b'-' | b'?')
}

/// Per-record back-translation failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BackTranslateError {
    #[error("Sequence '{0}' not found in the unaligned nucleotide sequences")]
    MissingSequence(String),

    #[error("Ran out of nucleotides for '{id}' at column {column}: codon at {offset} overruns {length} nucleotides")]
    TranslationExhausted {
        id: String,
        column: usize,
        offset: usize,
        length: usize,
    },

    #[error("Back-translated '{id}' has {found} nucleotides, expected {expected}")]
    LengthMismatch {
        id: String,
        expected: usize,
        found: usize,
    },

    #[error("Gave up on '{id}' after {limit} codon translations")]
    AttemptLimit { id: String, limit: usize },
}

/// Result type for back-translation.
pub type BackTranslateResult<T> = Result<T, BackTranslateError>;

/// Tuning for a single walk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WalkOptions {
    /// Maximum number of codon translations per record (unbounded when `None`).
    pub max_attempts: Option<usize>,
}

/// Where the current run of matches began.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Checkpoint {
    /// Residue column of the first match of the run
    pub aa_pos: usize,
    /// Nucleotide offset of the first matched codon
    pub nt_pos: usize,
    /// Codons emitted (after the leading-gap prefix) before the run began
    pub emitted: usize,
}

/// Cursor of the walk. Each step consumes a state and produces the next one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WalkState {
    /// Next residue column
    pub aa_pos: usize,
    /// Next nucleotide offset
    pub nt_pos: usize,
    /// Codons emitted so far, not counting the leading-gap prefix
    pub emitted: usize,
    /// Set while a run of matches is in progress
    pub checkpoint: Option<Checkpoint>,
}

/// What a step contributes to the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Emission {
    /// Append `---`.
    Gap,
    /// Append the matched codon starting at this nucleotide offset.
    Codon { offset: usize },
    /// Nothing; the nucleotide frame moved one codon forward.
    Slide,
    /// Keep only the first `keep` emitted codons.
    Backtrack { keep: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    pub state: WalkState,
    pub emission: Emission,
}

impl WalkState {
    /// Starts the walk at `aa_pos` (the first non-gap column).
    pub fn start(aa_pos: usize) -> Self {
        Self {
            aa_pos,
            ..Self::default()
        }
    }

    pub fn matched(&self) -> bool {
        self.checkpoint.is_some()
    }

    pub fn is_finished(&self, residues: &[u8]) -> bool {
        self.aa_pos >= residues.len()
    }

    /// Advances the walk by one column decision.
    ///
    /// Returns `None` once the walk is finished, or when a codon is needed but
    /// fewer than three nucleotides remain at `nt_pos`.
    pub fn step<T>(self, residues: &[u8], nucleotides: &[u8], translator: &T) -> Option<Step>
    where
        T: CodonTranslator + ?Sized,
    {
        let residue = *residues.get(self.aa_pos)?;

        if is_gap(residue) {
            return Some(Step {
                state: WalkState {
                    aa_pos: self.aa_pos + 1,
                    emitted: self.emitted + 1,
                    ..self
                },
                emission: Emission::Gap,
            });
        }

        let codon = nucleotides.get(self.nt_pos..self.nt_pos + CODON_LEN)?;
        // Untranslatable codons match nothing.
        let hit = translator.translate(codon).is_ok_and(|aa| aa == residue);

        let step = match (hit, self.checkpoint) {
            (true, checkpoint) => Step {
                state: WalkState {
                    aa_pos: self.aa_pos + 1,
                    nt_pos: self.nt_pos + CODON_LEN,
                    emitted: self.emitted + 1,
                    checkpoint: checkpoint.or(Some(Checkpoint {
                        aa_pos: self.aa_pos,
                        nt_pos: self.nt_pos,
                        emitted: self.emitted,
                    })),
                },
                emission: Emission::Codon {
                    offset: self.nt_pos,
                },
            },
            (false, None) => Step {
                state: WalkState {
                    nt_pos: self.nt_pos + CODON_LEN,
                    ..self
                },
                emission: Emission::Slide,
            },
            (false, Some(checkpoint)) => Step {
                state: WalkState {
                    aa_pos: checkpoint.aa_pos,
                    nt_pos: checkpoint.nt_pos + CODON_LEN,
                    emitted: checkpoint.emitted,
                    checkpoint: None,
                },
                emission: Emission::Backtrack {
                    keep: checkpoint.emitted,
                },
            },
        };
        Some(step)
    }
}

/// Bookkeeping of one walk, for diagnostics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WalkSummary {
    pub leading_gaps: usize,
    /// Codon translations performed
    pub attempts: usize,
    /// Codons skipped before a run began
    pub slides: usize,
    pub backtracks: usize,
}

/// A gapped nucleotide sequence, one codon per alignment column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackTranslation {
    pub sequence: Sequence,
    pub summary: WalkSummary,
}

/// Back-translates one aligned protein onto its unaligned nucleotides.
///
/// The result has exactly `3 * residues.len()` symbols.
pub fn back_translate<T>(
    id: &str,
    residues: &[u8],
    nucleotides: &[u8],
    translator: &T,
    options: &WalkOptions,
) -> BackTranslateResult<BackTranslation>
where
    T: CodonTranslator + ?Sized,
{
    let width = residues.len();
    let leading_gaps = residues.iter().take_while(|&&r| is_gap(r)).count();
    let prefix_len = leading_gaps * CODON_LEN;

    let mut aligned = Vec::with_capacity(width * CODON_LEN);
    aligned.extend(GAP_CODON.repeat(leading_gaps));

    let mut summary = WalkSummary {
        leading_gaps,
        ..WalkSummary::default()
    };
    let mut state = WalkState::start(leading_gaps);

    while !state.is_finished(residues) {
        let translating = !is_gap(residues[state.aa_pos]);
        if translating {
            if let Some(limit) = options.max_attempts {
                if summary.attempts >= limit {
                    return Err(BackTranslateError::AttemptLimit {
                        id: id.to_string(),
                        limit,
                    });
                }
            }
            summary.attempts += 1;
        }

        let step = state.step(residues, nucleotides, translator).ok_or_else(|| {
            BackTranslateError::TranslationExhausted {
                id: id.to_string(),
                column: state.aa_pos,
                offset: state.nt_pos,
                length: nucleotides.len(),
            }
        })?;

        match step.emission {
            Emission::Gap => aligned.extend_from_slice(GAP_CODON),
            Emission::Codon { offset } => {
                aligned.extend_from_slice(&nucleotides[offset..offset + CODON_LEN])
            }
            Emission::Slide => summary.slides += 1,
            Emission::Backtrack { keep } => {
                log::trace!(
                    "{}: mismatch at column {}, retrying from nucleotide {}",
                    id,
                    state.aa_pos,
                    step.state.nt_pos
                );
                aligned.truncate(prefix_len + keep * CODON_LEN);
                summary.backtracks += 1;
            }
        }
        state = step.state;
    }

    let expected = width * CODON_LEN;
    if aligned.len() != expected {
        return Err(BackTranslateError::LengthMismatch {
            id: id.to_string(),
            expected,
            found: aligned.len(),
        });
    }

    Ok(BackTranslation {
        sequence: Sequence::from_bytes(id, aligned),
        summary,
    })
}
