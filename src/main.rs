//! backtrans - protein alignment to codon alignment
//!
//! Back-translates an amino-acid alignment using the unaligned nucleotide
//! sequence of every aligned protein.
//!
//! ## Usage
//!
//! ```bash
//! backtrans proteins.aln.fasta cds.fasta > codons.aln.fasta
//! backtrans --informat nexus proteins.nex cds.nex -o codons.fasta
//! backtrans -g 2 -vv mito_proteins.fasta mito_cds.fasta
//! ```
//!
//! ## Supported Formats
//!
//! fasta (default), fastq, phylip, nexus, clustalw. The same format is used
//! for both input files.

// Use jemalloc for better memory management (returns memory to OS)
#[cfg(not(windows))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use clap::{ArgAction, Parser, ValueEnum};
use env_logger::fmt::Color;
use log::{Level, LevelFilter};

use backtrans::backtrans::WalkOptions;
use backtrans::batch::{run, OutputTarget, RunConfig};
use backtrans::formats::FileFormat;
use backtrans::genetic_code::GeneticCodes;

/// Input format specification for command line
#[derive(Debug, Clone, Copy, ValueEnum)]
enum FormatArg {
    /// FASTA format
    Fasta,
    /// FASTQ format
    Fastq,
    /// PHYLIP format
    Phylip,
    /// NEXUS format
    Nexus,
    /// Clustal format
    Clustalw,
}

impl From<FormatArg> for FileFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Fasta => FileFormat::Fasta,
            FormatArg::Fastq => FileFormat::Fastq,
            FormatArg::Phylip => FileFormat::Phylip,
            FormatArg::Nexus => FileFormat::Nexus,
            FormatArg::Clustalw => FileFormat::Clustal,
        }
    }
}

/// backtrans - Back-translate an amino-acid alignment onto unaligned nucleotide sequences
///
/// Every aligned protein is matched by identifier with its nucleotide sequence.
/// Residue columns receive the matching codon, gap columns receive "---".
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Amino-acid alignment file
    inalignment: PathBuf,

    /// Unaligned nucleotide sequences of the aligned proteins
    innucleotide: PathBuf,

    /// Format of both input files
    #[arg(long = "informat", value_enum, default_value = "fasta")]
    informat: FormatArg,

    /// Output file. Use "-" for stdout (default).
    #[arg(short = 'o', long = "output", default_value = "-")]
    output: String,

    /// Genetic code for translation (1-33, default: 1 = Standard)
    #[arg(short = 'g', long = "genetic-code", default_value = "1")]
    genetic_code: u8,

    /// Wrap output sequences at this many characters (default: one line per sequence)
    #[arg(long = "line-width")]
    line_width: Option<usize>,

    /// Give up on a sequence after this many codon translations
    #[arg(long = "max-attempts")]
    max_attempts: Option<usize>,

    /// Number of threads (default: all cores)
    #[arg(short = 't', long = "threads")]
    threads: Option<usize>,

    /// Specify multiple times to increase verbosity level (e.g., -vv for more verbosity)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    verbosity: u8,
}

fn init_verbose(verbosity: u8) {
    let filter_level = match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };

    env_logger::Builder::from_default_env()
        .format(|buf, record| {
            let level = record.level();
            let mut style = buf.style();
            match level {
                Level::Error => style.set_color(Color::Red),
                Level::Warn => style.set_color(Color::Yellow),
                Level::Info => style.set_color(Color::Green),
                Level::Debug => style.set_color(Color::Blue),
                Level::Trace => style.set_color(Color::Cyan),
            };

            writeln!(
                buf,
                "{} [{}] - {}",
                buf.timestamp_seconds(),
                style.value(level),
                record.args()
            )
        })
        .filter_level(filter_level)
        .init();
}

fn init_thread_pool(threads: Option<usize>) -> Result<()> {
    let Some(threads) = threads else {
        return Ok(());
    };
    if threads == 0 {
        anyhow::bail!("Number of threads must be at least 1");
    }

    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .thread_name(|i| format!("backtrans-{}", i))
        .build_global()?;
    log::debug!("Using {} threads", threads);
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_verbose(args.verbosity);

    // Validate genetic code (1-33, with some gaps)
    if GeneticCodes::new().get(args.genetic_code).is_none() {
        anyhow::bail!("Unknown genetic code: {} (valid: 1-6, 9-16, 21-33)", args.genetic_code);
    }

    if args.max_attempts == Some(0) {
        anyhow::bail!("--max-attempts must be at least 1");
    }

    init_thread_pool(args.threads)?;

    let config = RunConfig {
        alignment_path: args.inalignment,
        nucleotide_path: args.innucleotide,
        format: args.informat.into(),
        genetic_code: args.genetic_code,
        output: OutputTarget::from_arg(&args.output),
        line_width: args.line_width,
        walk: WalkOptions {
            max_attempts: args.max_attempts,
        },
    };

    log::info!("Running {}-{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
    run(&config)?;
    log::info!("{} end", env!("CARGO_PKG_NAME"));

    Ok(())
}
