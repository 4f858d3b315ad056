//! Quoter tick replay harness - Entry Point
//!
//! Replays a JSONL file of exchange snapshots through the market-making
//! engine and writes one visualizer line per tick.

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use quoter_bot::config::{CONFIG_ENV, DEFAULT_CONFIG_PATH};
use quoter_telemetry::Metrics;
use tracing::info;

/// Quoter market-making engine replay harness
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, env = CONFIG_ENV, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// JSONL file with one TradingState per line (stdin if omitted)
    #[arg(short, long)]
    ticks: Option<PathBuf>,

    /// Output file for per-tick lines (stdout if omitted)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print prometheus metrics to stderr when done
    #[arg(long)]
    metrics: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    quoter_telemetry::init_logging()?;

    info!("Starting quoter v{}", env!("CARGO_PKG_VERSION"));

    // Config path: CLI arg > QUOTER_CONFIG env var > default
    info!(config_path = %args.config.display(), "Loading configuration");

    let config = quoter_bot::AppConfig::from_file(&args.config)?;
    info!(
        kind = ?config.strategy.kind,
        limit_policy = ?config.strategy.limit_policy,
        instruments = config.strategy.instruments.len(),
        "Configuration loaded"
    );

    let mut app = quoter_bot::Application::new(config)?;

    let writer: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("creating {}", path.display()))?,
        )),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };

    match &args.ticks {
        Some(path) => {
            let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
            app.run(BufReader::new(file), writer)?;
        }
        None => {
            app.run(io::stdin().lock(), writer)?;
        }
    }

    app.summary().log();

    if args.metrics {
        eprint!("{}", Metrics::render()?);
    }

    Ok(())
}
