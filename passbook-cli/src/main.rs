use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use passbook_core::{BUILTIN_BANKS, Document};
use passbook_ingest::{ExtractionFailure, FieldNormalizer, extract, to_transactions};
use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod config;
mod output;

use output::Format;

#[derive(Parser, Debug)]
#[command(
    name = "passbook",
    version,
    long_version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("PASSBOOK_BUILD_SHA"), ")"),
    about = "Rebuild bank statement transactions from positioned page text"
)]
struct Cli {
    /// Debug logging on stderr (overrides RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Reconstruct transactions from a page-token JSON file
    Extract {
        /// `{"pages": [{"width": .., "words": [..]}]}`
        input: PathBuf,

        /// Built-in bank profile key (see `passbook banks`)
        #[arg(long)]
        bank: Option<String>,

        /// TOML profile file; takes precedence over --bank
        #[arg(long)]
        profile: Option<PathBuf>,

        #[arg(long, value_enum, default_value_t = Format::Json)]
        format: Format,

        /// Write here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Skip field normalization
        #[arg(long)]
        raw: bool,

        /// Emit typed transactions (parsed dates, signed amounts)
        #[arg(long)]
        typed: bool,
    },

    /// List built-in bank profiles
    Banks,

    /// Inspect bank profiles
    Profile {
        #[command(subcommand)]
        command: ProfileCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ProfileCommand {
    /// Print a built-in profile as TOML (a starting point for --profile)
    Show { key: String },
}

struct ExtractArgs {
    input: PathBuf,
    bank: Option<String>,
    profile: Option<PathBuf>,
    format: Format,
    output: Option<PathBuf>,
    raw: bool,
    typed: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Extract {
            input,
            bank,
            profile,
            format,
            output,
            raw,
            typed,
        } => run_extract(ExtractArgs {
            input,
            bank,
            profile,
            format,
            output,
            raw,
            typed,
        })?,

        Command::Banks => {
            for (key, name) in BUILTIN_BANKS {
                println!("{key:<12} {name}");
            }
        }

        Command::Profile { command } => match command {
            ProfileCommand::Show { key } => {
                print!("{}", config::profile_toml(&key)?);
            }
        },
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run_extract(args: ExtractArgs) -> Result<()> {
    let profile = config::resolve_profile(args.bank.as_deref(), args.profile.as_deref())?;

    let raw_json = fs::read_to_string(&args.input)
        .with_context(|| format!("read {}", args.input.display()))?;
    let doc: Document = serde_json::from_str(&raw_json)
        .with_context(|| format!("parse {}", args.input.display()))?;

    let extraction = extract(&doc.pages, &profile)
        .with_context(|| format!("extract {}", args.input.display()))?;

    if let Some(ExtractionFailure::HeaderNotFound { best_match }) = extraction.failure {
        eprintln!(
            "warning: no transaction header in {} (best line matched {} of {} columns)",
            args.input.display(),
            best_match,
            profile.header().min_categories
        );
    }
    let stats = &extraction.stats;
    info!(
        bank = profile.key(),
        pages = stats.pages,
        records = stats.records,
        orphans = stats.orphan_lines,
        rejected_tokens = stats.rejected_tokens,
        "extraction finished"
    );

    let columns = extraction
        .layout
        .as_ref()
        .map(|l| l.categories())
        .unwrap_or_default();
    let mut records = extraction.records;
    if !args.raw {
        FieldNormalizer::new(&profile)
            .context("compile normalization rules")?
            .apply(&mut records);
    }

    let mut sink: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(BufWriter::new(
            fs::File::create(path).with_context(|| format!("create {}", path.display()))?,
        )),
        None => Box::new(io::stdout().lock()),
    };

    if args.typed {
        let (txns, errors) = to_transactions(&records);
        for err in &errors {
            warn!("skipped: {err}");
        }
        match args.format {
            Format::Json => output::write_transactions_json(&mut sink, &txns)?,
            Format::Csv => output::write_transactions_csv(&mut sink, &txns)?,
        }
    } else {
        match args.format {
            Format::Json => output::write_records_json(&mut sink, &records)?,
            Format::Csv => output::write_records_csv(&mut sink, &columns, &records)?,
        }
    }
    sink.flush().context("flush output")?;

    if let Some(path) = &args.output {
        eprintln!("Wrote {} records to {}", records.len(), path.display());
    }
    Ok(())
}
