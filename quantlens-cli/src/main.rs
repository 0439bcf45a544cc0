//! QuantLens CLI: compute indicators, generate synthetic data, show config.
//!
//! Commands:
//! - `compute`: load an OHLCV file (CSV or JSON records), compute every
//!   indicator group and write the enriched rows as JSON or CSV
//! - `synthetic`: write a deterministic synthetic OHLCV series as CSV
//! - `config`: print the effective indicator configuration as TOML
//!
//! Logs go to stderr; `RUST_LOG` overrides the level chosen by `--verbose`.

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use quantlens_core::data::load_path;
use quantlens_core::export::{to_csv, to_json_string};
use quantlens_core::fingerprint::RunFingerprint;
use quantlens_core::synthetic::generate_synthetic_bars;
use quantlens_core::{DegeneratePolicy, IndicatorConfig, IndicatorPipeline};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "quantlens",
    about = "QuantLens CLI: technical indicators over OHLCV series"
)]
struct Cli {
    /// Log at debug level (per-group timings and column counts).
    #[arg(long, short, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFormat {
    Json,
    Csv,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute every indicator over an OHLCV file.
    Compute {
        /// Input file (.csv, or .json with an array of records).
        #[arg(long)]
        input: PathBuf,

        /// TOML indicator config. Defaults to the standard parameter set.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Output format.
        #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,

        /// Only emit the last N rows (the AI payload uses 5).
        #[arg(long)]
        tail: Option<usize>,

        /// Evaluate indicator groups on the rayon pool.
        #[arg(long, default_value_t = false)]
        parallel: bool,

        /// Pretty-print JSON output.
        #[arg(long, default_value_t = false)]
        pretty: bool,

        /// Output file. Defaults to stdout.
        #[arg(long)]
        output: Option<PathBuf>,

        /// Write a JSON run fingerprint (hashes, columns, diagnostics) here.
        #[arg(long)]
        fingerprint: Option<PathBuf>,
    },
    /// Write a deterministic synthetic OHLCV series as CSV.
    Synthetic {
        /// Symbol; seeds the generator.
        #[arg(long, default_value = "SYNTH")]
        symbol: String,

        /// Start date (YYYY-MM-DD).
        #[arg(long, default_value = "2024-01-01")]
        start: String,

        /// End date (YYYY-MM-DD).
        #[arg(long, default_value = "2024-12-31")]
        end: String,

        /// Output file. Defaults to stdout.
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Print the effective indicator config as TOML.
    Config {
        /// Config file to validate and normalise. Defaults to built-in values.
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Compute {
            input,
            config,
            format,
            tail,
            parallel,
            pretty,
            output,
            fingerprint,
        } => run_compute(ComputeArgs {
            input,
            config,
            format,
            tail,
            parallel,
            pretty,
            output,
            fingerprint,
        }),
        Commands::Synthetic {
            symbol,
            start,
            end,
            output,
        } => run_synthetic(&symbol, &start, &end, output.as_deref()),
        Commands::Config { config } => run_config(config.as_deref()),
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

struct ComputeArgs {
    input: PathBuf,
    config: Option<PathBuf>,
    format: OutputFormat,
    tail: Option<usize>,
    parallel: bool,
    pretty: bool,
    output: Option<PathBuf>,
    fingerprint: Option<PathBuf>,
}

fn run_compute(args: ComputeArgs) -> Result<()> {
    let config = load_config(args.config.as_deref())?;
    let pipeline = IndicatorPipeline::from_config(&config)?;

    let bars = load_path(&args.input)
        .with_context(|| format!("failed to load bars from {}", args.input.display()))?;
    info!(
        input = %args.input.display(),
        bars = bars.len(),
        groups = pipeline.group_count(),
        "loaded input"
    );

    let series = if args.parallel {
        pipeline.run_parallel(&bars)?
    } else {
        pipeline.run(&bars)?
    };

    for diagnostic in series.diagnostics() {
        warn!(indicator = diagnostic.indicator(), "{diagnostic}");
    }

    let run = RunFingerprint::new(&bars, &config, &series);
    info!(
        dataset = %run.dataset_hash,
        config = %run.config_hash,
        columns = run.columns.len(),
        "computed indicators"
    );
    if let Some(path) = &args.fingerprint {
        let json = serde_json::to_string_pretty(&run)?;
        std::fs::write(path, json)
            .with_context(|| format!("failed to write fingerprint to {}", path.display()))?;
        debug!(path = %path.display(), "wrote run fingerprint");
    }

    let view = match args.tail {
        Some(n) => series.tail(n),
        None => series,
    };
    let text = match args.format {
        OutputFormat::Json => to_json_string(&view, args.pretty)?,
        OutputFormat::Csv => to_csv(&view)?,
    };
    write_output(args.output.as_deref(), &text)
}

fn run_synthetic(symbol: &str, start: &str, end: &str, output: Option<&Path>) -> Result<()> {
    let start_date = parse_date(start, "--start")?;
    let end_date = parse_date(end, "--end")?;
    if end_date < start_date {
        bail!("--end ({end}) is before --start ({start})");
    }

    let bars = generate_synthetic_bars(symbol, start_date, end_date);
    info!(symbol, bars = bars.len(), "generated synthetic series");

    // An empty pipeline exports the bars alone.
    let series = IndicatorPipeline::new(Vec::new(), DegeneratePolicy::default()).run(&bars)?;
    write_output(output, &to_csv(&series)?)
}

fn run_config(path: Option<&Path>) -> Result<()> {
    let config = load_config(path)?;
    info!(hash = %config.config_hash(), "effective config");
    print!("{}", config.to_toml_string()?);
    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<IndicatorConfig> {
    match path {
        Some(path) => {
            let config = IndicatorConfig::load(path)?;
            debug!(path = %path.display(), "loaded indicator config");
            Ok(config)
        }
        None => Ok(IndicatorConfig::default()),
    }
}

fn parse_date(value: &str, flag: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .with_context(|| format!("{flag} must be YYYY-MM-DD, got '{value}'"))
}

fn write_output(path: Option<&Path>, text: &str) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, text)
                .with_context(|| format!("failed to write {}", path.display()))?;
            info!(path = %path.display(), "wrote output");
        }
        None => print!("{text}"),
    }
    Ok(())
}
