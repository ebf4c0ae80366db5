//! # diurnal
//!
//! Command-line interface for the diurnal utilization models.

use anyhow::{anyhow, bail, Context};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use model_facade::dataset::{decoder_for_filename, synthesize, write_csv, SynthesisConfig, Table};
use model_facade::{
    ForecastConfig, ForecastResult, MetricGroup, ModelService, ModelServiceBuilder, Prediction,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use server::ServerConfig;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "diurnal")]
#[command(about = "Utilization forecasting from time-of-day patterns", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the REST API server
    Serve {
        /// Port to listen on (overrides PORT)
        #[arg(short, long)]
        port: Option<u16>,

        /// Host to bind to (overrides HOST)
        #[arg(long)]
        host: Option<String>,
    },

    /// Generate a synthetic 15-minute utilization dataset
    Synthesize {
        /// Metric group (resource, requests)
        #[arg(short, long, default_value = "resource")]
        kind: String,

        /// Number of weeks to generate
        #[arg(short, long, default_value = "1")]
        weeks: u32,

        /// First day, YYYY-MM-DD
        #[arg(long, default_value = "2024-01-01")]
        start: String,

        /// Seed for reproducible output
        #[arg(long)]
        seed: Option<u64>,

        /// Output CSV file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Forecast the next 15-minute value of every metric in a file
    Forecast {
        /// Input file (CSV or JSON)
        #[arg(short, long)]
        input: PathBuf,

        /// Accept series not sampled every 15 minutes
        #[arg(long)]
        lenient: bool,
    },

    /// Fit short-horizon models from a file and predict one timestamp
    Predict {
        /// Input file (CSV or JSON)
        #[arg(short, long)]
        input: PathBuf,

        /// Timestamp to predict
        #[arg(short, long)]
        timestamp: String,

        /// Prediction type (resource, requests); defaults to the fitted group
        #[arg(long = "type")]
        kind: Option<String>,
    },
}

/// Load a dataset, choosing the decoder from the file extension.
fn load_table(path: &Path) -> anyhow::Result<Table> {
    let bytes = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default();
    Ok(decoder_for_filename(name)?.decode(&bytes)?)
}

fn run_serve(port: Option<u16>, host: Option<String>) -> anyhow::Result<()> {
    let mut config = ServerConfig::from_env()?;
    if let Some(port) = port {
        config.port = port;
    }
    if let Some(host) = host {
        config.host = host;
    }

    server::init_tracing();
    let runtime = tokio::runtime::Runtime::new().context("Failed to start async runtime")?;
    runtime.block_on(server::serve(config))
}

fn synthesize_table(
    kind: &str,
    weeks: u32,
    start: &str,
    seed: Option<u64>,
) -> anyhow::Result<Table> {
    let group = MetricGroup::parse(kind).ok_or_else(|| anyhow!("Unknown kind '{}'", kind))?;
    if weeks == 0 {
        bail!("weeks must be at least 1");
    }
    let start = NaiveDate::parse_from_str(start, "%Y-%m-%d")
        .with_context(|| format!("Invalid start date '{}'", start))?;

    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    Ok(synthesize(&SynthesisConfig::new(group, weeks, start), &mut rng)?)
}

fn run_synthesize(
    kind: &str,
    weeks: u32,
    start: &str,
    seed: Option<u64>,
    output: Option<&Path>,
) -> anyhow::Result<()> {
    let table = synthesize_table(kind, weeks, start, seed)?;

    match output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            write_csv(&table, BufWriter::new(file))?;
            eprintln!("Wrote {} rows to {}", table.num_rows(), path.display());
        }
        None => write_csv(&table, io::stdout().lock())?,
    }
    Ok(())
}

fn forecast_file(input: &Path, lenient: bool) -> anyhow::Result<ForecastResult> {
    let service = ModelServiceBuilder::new()
        .forecast_config(ForecastConfig::default().with_strict_interval(!lenient))
        .build()?;
    Ok(service.forecast_table(&load_table(input)?)?)
}

fn predict_file(input: &Path, timestamp: &str, kind: Option<&str>) -> anyhow::Result<Prediction> {
    let service = ModelService::default();
    let report = service.fit_table(&load_table(input)?)?;
    let kind = kind.unwrap_or(report.group.as_str());
    Ok(service.predict(Some(kind), Some(timestamp))?)
}

fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, value)?;
    writeln!(stdout)?;
    Ok(())
}

fn main() {
    // Load .env file (optional - won't fail if missing)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Serve { port, host } => run_serve(port, host),

        Commands::Synthesize {
            kind,
            weeks,
            start,
            seed,
            output,
        } => run_synthesize(&kind, weeks, &start, seed, output.as_deref()),

        Commands::Forecast { input, lenient } => {
            forecast_file(&input, lenient).and_then(|result| print_json(&result))
        }

        Commands::Predict {
            input,
            timestamp,
            kind,
        } => predict_file(&input, &timestamp, kind.as_deref()).and_then(|p| print_json(&p)),
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
