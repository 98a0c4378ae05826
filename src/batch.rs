//! Back-translation of a whole alignment.
//!
//! Records are independent, so they are mapped in parallel with rayon; the
//! report keeps the alignment order. A failing record is reported and skipped,
//! it never stops the batch.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use rayon::iter::{IntoParallelRefIterator, ParallelIterator};

use crate::backtrans::{back_translate, BackTranslateError, BackTranslation, WalkOptions};
use crate::formats::{read_alignment, read_sequence_index, FileFormat};
use crate::genetic_code::{CodonTranslator, GeneticCodes};
use crate::model::{Alignment, Sequence, SequenceIndex};
use crate::output::write_records;

/// Outcome of one alignment record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordOutcome {
    pub id: String,
    pub result: Result<BackTranslation, BackTranslateError>,
}

/// Outcomes of every record, in alignment order.
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    pub outcomes: Vec<RecordOutcome>,
}

impl BatchReport {
    /// Successfully back-translated sequences, in alignment order.
    pub fn translated(&self) -> impl Iterator<Item = &Sequence> {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().ok())
            .map(|t| &t.sequence)
    }

    pub fn failures(&self) -> impl Iterator<Item = &BackTranslateError> {
        self.outcomes.iter().filter_map(|o| o.result.as_ref().err())
    }

    pub fn succeeded_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_ok()).count()
    }

    pub fn failed_count(&self) -> usize {
        self.outcomes.len() - self.succeeded_count()
    }
}

/// Back-translates one aligned protein, looking up its nucleotides by identifier.
pub fn back_translate_record<T>(
    residues: &Sequence,
    nucleotides: &SequenceIndex,
    translator: &T,
    options: &WalkOptions,
) -> Result<BackTranslation, BackTranslateError>
where
    T: CodonTranslator + ?Sized,
{
    let nt = nucleotides
        .get(&residues.id)
        .ok_or_else(|| BackTranslateError::MissingSequence(residues.id.clone()))?;

    back_translate(
        &residues.id,
        residues.as_bytes(),
        nt.as_bytes(),
        translator,
        options,
    )
}

/// Back-translates every record of the alignment.
pub fn back_translate_all<T>(
    alignment: &Alignment,
    nucleotides: &SequenceIndex,
    translator: &T,
    options: &WalkOptions,
) -> BatchReport
where
    T: CodonTranslator + Sync + ?Sized,
{
    let outcomes = alignment
        .sequences()
        .par_iter()
        .map(|residues| RecordOutcome {
            id: residues.id.clone(),
            result: back_translate_record(residues, nucleotides, translator, options),
        })
        .collect();

    BatchReport { outcomes }
}

/// Where the back-translated records go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    Stdout,
    File(PathBuf),
}

impl OutputTarget {
    /// `-` means standard output.
    pub fn from_arg(arg: &str) -> Self {
        if arg == "-" {
            OutputTarget::Stdout
        } else {
            OutputTarget::File(PathBuf::from(arg))
        }
    }
}

/// Everything one run needs.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub alignment_path: PathBuf,
    pub nucleotide_path: PathBuf,
    pub format: FileFormat,
    pub genetic_code: u8,
    pub output: OutputTarget,
    pub line_width: Option<usize>,
    pub walk: WalkOptions,
}

/// Reads both inputs, back-translates every record and writes the successful ones.
///
/// Unreadable inputs abort the run; failing records are logged and skipped.
pub fn run(config: &RunConfig) -> Result<BatchReport> {
    let codes = GeneticCodes::new();
    let code = codes
        .get(config.genetic_code)
        .with_context(|| format!("Unknown genetic code: {}", config.genetic_code))?;

    let alignment = read_alignment(&config.alignment_path, config.format).with_context(|| {
        format!(
            "Cannot read {} alignment {}",
            config.format,
            config.alignment_path.display()
        )
    })?;
    log::info!(
        "Loaded {} aligned sequences ({} columns) from {}",
        alignment.sequence_count(),
        alignment.width(),
        config.alignment_path.display()
    );

    let nucleotides =
        read_sequence_index(&config.nucleotide_path, config.format).with_context(|| {
            format!(
                "Cannot read {} nucleotide sequences {}",
                config.format,
                config.nucleotide_path.display()
            )
        })?;
    log::info!(
        "Loaded {} nucleotide sequences from {}",
        nucleotides.len(),
        config.nucleotide_path.display()
    );
    log::debug!("Translating with genetic code {} ({})", code.id, code.name);

    let report = back_translate_all(&alignment, &nucleotides, code, &config.walk);

    for outcome in &report.outcomes {
        match &outcome.result {
            Ok(translation) => log::debug!("{}: {:?}", outcome.id, translation.summary),
            Err(err) => log::warn!("Skipping {}: {}", outcome.id, err),
        }
    }

    match &config.output {
        OutputTarget::Stdout => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            write_records(&mut handle, report.translated(), config.line_width)?;
        }
        OutputTarget::File(path) => {
            let file = File::create(path)
                .with_context(|| format!("Cannot create output file {}", path.display()))?;
            let mut writer = BufWriter::new(file);
            write_records(&mut writer, report.translated(), config.line_width)?;
            writer.flush()?;
        }
    }

    log::info!(
        "Back-translated {} of {} sequences ({} skipped)",
        report.succeeded_count(),
        report.outcomes.len(),
        report.failed_count()
    );

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixtures() -> (Alignment, SequenceIndex) {
        let alignment = Alignment::new(vec![
            Sequence::new("human", "M-K"),
            Sequence::new("ghost", "MLK"),
            Sequence::new("mouse", "MLK"),
        ])
        .unwrap();
        let nucleotides = SequenceIndex::new(vec![
            Sequence::new("human", "ATGAAA"),
            Sequence::new("mouse", "TTTATGCTGAAA"),
        ])
        .unwrap();
        (alignment, nucleotides)
    }

    #[test]
    fn test_missing_sequence_is_skipped() {
        let (alignment, nucleotides) = fixtures();
        let codes = GeneticCodes::new();
        let report = back_translate_all(
            &alignment,
            &nucleotides,
            codes.default_code(),
            &WalkOptions::default(),
        );

        assert_eq!(report.outcomes.len(), 3);
        assert_eq!(report.succeeded_count(), 2);
        assert_eq!(report.failed_count(), 1);
        assert_eq!(
            report.failures().collect::<Vec<_>>(),
            vec![&BackTranslateError::MissingSequence("ghost".to_string())]
        );

        let translated: Vec<(&str, &str)> = report
            .translated()
            .map(|s| (s.id.as_str(), s.as_str()))
            .collect();
        assert_eq!(translated, vec![("human", "ATG---AAA"), ("mouse", "ATGCTGAAA")]);
    }

    #[test]
    fn test_order_is_preserved() {
        let ids: Vec<String> = (0..64).map(|i| format!("seq{}", i)).collect();
        let alignment = Alignment::new(ids.iter().map(|id| Sequence::new(id.as_str(), "MK")).collect()).unwrap();
        let nucleotides =
            SequenceIndex::new(ids.iter().map(|id| Sequence::new(id.as_str(), "ATGAAA")).collect()).unwrap();
        let codes = GeneticCodes::new();

        let report = back_translate_all(
            &alignment,
            &nucleotides,
            codes.default_code(),
            &WalkOptions::default(),
        );
        let order: Vec<&String> = report.outcomes.iter().map(|o| &o.id).collect();
        assert_eq!(order, ids.iter().collect::<Vec<_>>());
    }

    #[test]
    fn test_output_target_from_arg() {
        assert_eq!(OutputTarget::from_arg("-"), OutputTarget::Stdout);
        assert_eq!(
            OutputTarget::from_arg("out.fasta"),
            OutputTarget::File(PathBuf::from("out.fasta"))
        );
    }
}
