//! Command-line parsing for the dip-screening tool.
//!
//! The goal of this module is to keep **argument parsing** and **command
//! dispatch** separate from the pipeline/model code.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(
    name = "dipscan",
    version,
    about = "Daily price screening: forecast-driven RED/GREEN trade signals"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Scan instruments: fetch quotes, repair gaps, forecast, classify,
    /// and export one signal-tagged CSV per instrument.
    Scan(ScanArgs),
    /// Print the discovered instrument universe, one code per line.
    Universe,
}

/// Options for a scan.
#[derive(Debug, Parser, Clone)]
pub struct ScanArgs {
    /// Instrument codes to scan. When empty, the full universe is
    /// discovered from the listing service.
    pub codes: Vec<String>,

    /// Reference end date (YYYY-MM-DD). Training uses dates strictly before
    /// it; forecasts start on it. Defaults to today.
    #[arg(long)]
    pub end_date: Option<NaiveDate>,

    /// Fetch window in days before the end date.
    #[arg(long, default_value_t = 720)]
    pub lookback: i64,

    /// Minimum training-window length (days).
    #[arg(long, default_value_t = 360)]
    pub min_history: usize,

    /// Forecast horizon (days beyond the origin).
    #[arg(long, default_value_t = 2)]
    pub horizon: usize,

    /// Relative-spread threshold for a RED signal.
    #[arg(long, default_value_t = crate::signal::DEFAULT_THRESHOLD)]
    pub threshold: f64,

    /// Number of sampled trajectories per instrument.
    #[arg(long, default_value_t = 200)]
    pub samples: usize,

    /// Random seed for trajectory sampling.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Trailing training rows included in each output file.
    #[arg(long, default_value_t = 5)]
    pub tail: usize,

    /// Worker pool size (concurrent instrument pipelines).
    #[arg(long, default_value_t = 20)]
    pub workers: usize,

    /// Root directory for `<end-date>/data` and `<end-date>/predict` output.
    #[arg(long, default_value = ".")]
    pub out_root: PathBuf,
}
