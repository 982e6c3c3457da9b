//! CLI entry point for the column profiler.

use anyhow::{Result, anyhow};
use clap::Parser;
use column_profiler::reporting::{write_report, write_report_to_file};
use column_profiler::{DatasetProfiler, DatasetReport, ProfilerConfig};
use polars::io::csv::read::CsvReadOptions;
use polars::prelude::*;
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Column-level statistical profiler",
    long_about = "Profiles every column of a CSV or Parquet file and writes a JSON feature report.\n\n\
                  EXAMPLES:\n  \
                  # Report to stdout\n  \
                  column-profiler -i data.csv\n\n  \
                  # Pretty report file with the 5 most common entries per table\n  \
                  column-profiler -i data.csv -o data_profile.json --top-k 5 --pretty\n\n  \
                  # Keep the types polars infers instead of reading everything as text\n  \
                  column-profiler -i data.csv --infer-types"
)]
struct Args {
    /// Path to the CSV or Parquet file to profile
    #[arg(short, long)]
    input: String,

    /// Path of the JSON report
    ///
    /// If not specified, the report is written to stdout and logging is disabled
    #[arg(short, long)]
    output: Option<String>,

    /// Number of entries kept in every frequency table
    #[arg(long, default_value = "10")]
    top_k: usize,

    /// Sigma multiplier for punctuation outlier cells
    #[arg(long, default_value = "3.0")]
    sigma: f64,

    /// Token delimiter (default: runs of whitespace)
    #[arg(long)]
    delimiter: Option<String>,

    /// Skip language detection
    #[arg(long)]
    no_language: bool,

    /// Let polars infer CSV column types instead of reading all columns as text
    #[arg(long)]
    infer_types: bool,

    /// Pretty-print the JSON report
    #[arg(long)]
    pretty: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Suppress progress output (only show warnings and errors)
    #[arg(short, long)]
    quiet: bool,
}

/// Initialize the tracing subscriber for logging.
///
/// When the report goes to stdout, logging is completely disabled so that
/// stdout only contains JSON.
fn init_logging(level: &str, quiet: bool, json_to_stdout: bool) {
    if json_to_stdout {
        return;
    }

    use tracing_subscriber::EnvFilter;

    let effective_level = if quiet { "warn" } else { level };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(effective_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(&args.log_level, args.quiet, args.output.is_none());

    if !Path::new(&args.input).exists() {
        return Err(anyhow!("Input file not found: {}", args.input));
    }

    let config = build_config(&args)?;
    debug!(?config, "Profiler configuration");

    info!("Loading dataset from: {}", args.input);
    let data = load_table(&args.input, args.infer_types)?;
    info!("Dataset loaded successfully: {:?}", data.shape());

    let report = DatasetProfiler::new(config)?.profile_dataframe(&data, &args.input);

    match args.output {
        Some(ref output) => {
            write_report_to_file(&report, output, args.pretty)?;
            if !args.quiet {
                print_summary(&report, output);
            }
        }
        None => write_report(&report, std::io::stdout().lock(), args.pretty)?,
    }

    Ok(())
}

fn build_config(args: &Args) -> Result<ProfilerConfig> {
    let mut builder = ProfilerConfig::builder()
        .top_k(args.top_k)
        .punctuation_outlier_sigma(args.sigma)
        .detect_language(!args.no_language);

    if let Some(ref delimiter) = args.delimiter {
        builder = builder.token_delimiter(delimiter);
    }

    Ok(builder.build()?)
}

/// Load a CSV or Parquet table, chosen by file extension.
fn load_table(path: &str, infer_types: bool) -> Result<DataFrame> {
    let extension = Path::new(path)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);

    match extension.as_deref() {
        Some("parquet") | Some("pq") => Ok(ParquetReader::new(File::open(path)?).finish()?),
        _ => load_csv_with_fallbacks(path, infer_types),
    }
}

/// Load CSV, retrying without quote handling if the first attempt fails.
///
/// Unless `infer_types` is set every column is read as text, so cells reach
/// the profiler exactly as written in the file.
fn load_csv_with_fallbacks(path: &str, infer_types: bool) -> Result<DataFrame> {
    let schema_length = if infer_types { Some(100) } else { Some(0) };

    match CsvReadOptions::default()
        .with_infer_schema_length(schema_length)
        .with_has_header(true)
        .with_parse_options(CsvParseOptions::default().with_quote_char(Some(b'"')))
        .try_into_reader_with_file_path(Some(PathBuf::from(path)))?
        .finish()
    {
        Ok(df) => return Ok(df),
        Err(e) => {
            debug!("Standard loading failed: {}", e);
        }
    }

    CsvReadOptions::default()
        .with_infer_schema_length(schema_length)
        .with_has_header(true)
        .with_parse_options(CsvParseOptions::default().with_quote_char(None))
        .try_into_reader_with_file_path(Some(PathBuf::from(path)))?
        .finish()
        .map_err(|e| anyhow!("Could not read {path} as CSV: {e}"))
}

/// Print a short human-readable summary after writing a report file.
fn print_summary(report: &DatasetReport, output: &str) {
    println!();
    println!("{}", "=".repeat(80));
    println!("PROFILING COMPLETE");
    println!("{}", "=".repeat(80));
    println!(
        "Input:  {} ({} rows x {} columns)",
        report.source, report.shape.0, report.shape.1
    );
    println!("Report: {}", output);
    println!("Profiled columns: {}", report.columns.len());

    if !report.failed_columns.is_empty() {
        println!();
        println!("Failed columns:");
        for (name, failure) in &report.failed_columns {
            println!("  ! {}: {}", name, failure.message);
        }
    }
    println!("{}", "=".repeat(80));
}
