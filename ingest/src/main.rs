//! csvnest CLI - Convert user CSV files to nested JSON records
//!
//! # Commands
//!
//! ```bash
//! csvnest convert users.csv         # Full pipeline, JSON report
//! csvnest parse users.csv           # Nested records only
//! csvnest validate users.csv        # Report skipped rows, exit 1 if any
//! csvnest tokenize '"a,b",c'        # Show how one line is split
//! ```

use clap::{Parser, Subcommand};
use csvnest::logs::log_error;
use csvnest::{tokenize, ConfigError, IngestConfig, Ingestor};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "csvnest")]
#[command(
    about = "Convert CSV files with dotted headers into nested JSON records",
    long_about = None
)]
struct Cli {
    /// Only log warnings and errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full pipeline and output the ingestion report
    Convert {
        /// Input CSV file
        input: PathBuf,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Parse, validate and normalize; output nested records
    Parse {
        /// Input CSV file
        input: PathBuf,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Check a CSV file and list skipped rows
    Validate {
        /// Input CSV file
        input: PathBuf,
    },

    /// Tokenize a single CSV line
    Tokenize {
        /// The line to split
        line: String,
    },
}

fn main() {
    // Load .env file (if present)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    setup_logging(cli.quiet);

    let result = run(cli.command);

    if let Err(e) = result {
        log_error(e.to_string());
        eprintln!("❌ Error: {}", e);
        std::process::exit(1);
    }
}

fn run(command: Commands) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Commands::Convert { input, output } => cmd_convert(&ingestor()?, &input, output.as_deref()),
        Commands::Parse { input, output } => cmd_parse(&ingestor()?, &input, output.as_deref()),
        Commands::Validate { input } => cmd_validate(&ingestor()?, &input),
        Commands::Tokenize { line } => cmd_tokenize(&line),
    }
}

fn ingestor() -> Result<Ingestor, ConfigError> {
    Ok(Ingestor::new(IngestConfig::from_env()?))
}

/// Set up structured logging on stderr
fn setup_logging(quiet: bool) {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let level = if quiet { "warn" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("csvnest={}", level)));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_level(true)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .init();
}

fn cmd_convert(
    ingestor: &Ingestor,
    input: &Path,
    output: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("📄 Converting: {}", input.display());

    let report = ingestor.ingest_file(input)?;

    eprintln!("   Encoding: {}", report.encoding);
    eprintln!("   Columns: {}", report.headers.join(", "));
    eprintln!(
        "✅ {} records ready, {} rows skipped",
        report.records_processed(),
        report.rows_skipped()
    );

    let json = serde_json::to_string_pretty(&report)?;
    write_output(&json, output)?;

    Ok(())
}

fn cmd_parse(
    ingestor: &Ingestor,
    input: &Path,
    output: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("📄 Parsing CSV: {}", input.display());

    let bytes = fs::read(input)?;
    let (text, _encoding) = ingestor.decode(&bytes)?;
    let batch = ingestor.normalize_text(&text)?;

    eprintln!("   Columns: {}", batch.headers.join(", "));
    eprintln!("✅ Parsed {} records", batch.rows.len());

    let records: Vec<_> = batch.records().collect();
    let json = serde_json::to_string_pretty(&records)?;
    write_output(&json, output)?;

    Ok(())
}

fn cmd_validate(ingestor: &Ingestor, input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("✔️  Validating: {}", input.display());

    let report = ingestor.ingest_file(input)?;

    for diag in &report.diagnostics {
        eprintln!("   ❌ {}", diag);
    }
    eprintln!(
        "\n📊 Results: {} valid, {} skipped (of {} rows)",
        report.records_processed(),
        report.rows_skipped(),
        report.rows_seen
    );

    if report.rows_skipped() > 0 {
        std::process::exit(1);
    }

    Ok(())
}

fn cmd_tokenize(line: &str) -> Result<(), Box<dyn std::error::Error>> {
    let fields = tokenize(line);
    println!("{}", serde_json::to_string(&fields)?);
    Ok(())
}

fn write_output(content: &str, path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    match path {
        Some(p) => {
            fs::write(p, content)?;
            eprintln!("💾 Output written to: {}", p.display());
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
