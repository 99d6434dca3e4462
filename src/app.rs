//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - discovers the instrument universe (or takes codes from argv)
//! - fans the per-instrument pipeline out over a bounded worker pool
//! - writes output files and prints the scan summary

use clap::Parser;
use rayon::prelude::*;

use crate::cli::{Cli, Command, ScanArgs};
use crate::data::{QuoteClient, UniverseClient};
use crate::domain::{PipelineOutcome, ScanConfig};
use crate::error::AppError;
use crate::forecast::{Ar1MonteCarlo, Forecaster};
use crate::report::InstrumentReport;

pub mod pipeline;

/// Entry point for the `dipscan` binary.
pub fn run() -> Result<(), AppError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match cli.command {
        Command::Scan(args) => handle_scan(args),
        Command::Universe => handle_universe(),
    }
}

fn handle_universe() -> Result<(), AppError> {
    let client = UniverseClient::from_env();
    for code in client.fetch_codes()? {
        println!("{code}");
    }
    Ok(())
}

fn handle_scan(args: ScanArgs) -> Result<(), AppError> {
    let config = scan_config_from_args(&args)?;

    let codes = if args.codes.is_empty() {
        UniverseClient::from_env().fetch_codes()?
    } else {
        args.codes.clone()
    };
    if codes.is_empty() {
        return Err(AppError::new(4, "Universe discovery returned no instrument codes."));
    }

    std::fs::create_dir_all(config.data_dir()).map_err(|e| {
        AppError::new(2, format!("Failed to create '{}': {e}", config.data_dir().display()))
    })?;
    std::fs::create_dir_all(config.predict_dir()).map_err(|e| {
        AppError::new(2, format!("Failed to create '{}': {e}", config.predict_dir().display()))
    })?;

    let quotes = QuoteClient::from_env();
    let forecaster = Ar1MonteCarlo::new(config.min_history, config.sample_count, config.seed);
    log::info!(
        "scanning {} instruments with {} workers (model: {})",
        codes.len(),
        config.workers,
        forecaster.name()
    );

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.workers)
        .build()
        .map_err(|e| AppError::new(2, format!("Failed to build worker pool: {e}")))?;

    let reports: Vec<InstrumentReport> = pool.install(|| {
        codes
            .par_iter()
            .map(|code| scan_one(code, &quotes, &config, &forecaster))
            .collect()
    });

    println!("{}", crate::report::format_scan_summary(&reports, &config));
    Ok(())
}

/// Fetch, repair, forecast, classify, and export a single instrument.
///
/// Never returns an error into the pool: every failure becomes a terminal
/// outcome for this instrument only.
fn scan_one(
    code: &str,
    quotes: &QuoteClient,
    config: &ScanConfig,
    forecaster: &dyn Forecaster,
) -> InstrumentReport {
    let body = match quotes.fetch_history(code, config.start_date(), config.end_date) {
        Ok(body) => body,
        Err(err) => {
            log::warn!("{code}: fetch failed: {err}");
            return InstrumentReport {
                code: code.to_string(),
                outcome: PipelineOutcome::SkippedNoData,
            };
        }
    };

    // Keep the raw download next to the outputs. Failure here is not fatal
    // to the run.
    let raw_path = config.data_dir().join(format!("{code}.csv"));
    if let Err(err) = std::fs::write(&raw_path, &body) {
        log::warn!("{code}: failed to persist raw CSV: {err}");
    }

    let ingest = match crate::io::ingest::parse_quote_csv(body.as_bytes()) {
        Ok(ingest) => ingest,
        Err(err) => {
            log::warn!("{code}: ingest failed: {err}");
            return InstrumentReport {
                code: code.to_string(),
                outcome: PipelineOutcome::SkippedNoData,
            };
        }
    };
    for row_err in &ingest.row_errors {
        log::debug!("{code}: line {}: {}", row_err.line, row_err.message);
    }

    let run = pipeline::run_instrument(code, &ingest.observations, config, forecaster);

    if let Some(output) = &run.output {
        if let Err(err) = crate::io::export::write_output_csv(
            &config.predict_dir(),
            code,
            output.signal,
            &output.record,
        ) {
            log::error!("{code}: export failed: {err}");
            return InstrumentReport {
                code: run.code,
                outcome: PipelineOutcome::Failed {
                    reason: err.to_string(),
                },
            };
        }
    }

    log::info!("{code}: {}", run.outcome);
    InstrumentReport {
        code: run.code,
        outcome: run.outcome,
    }
}

pub fn scan_config_from_args(args: &ScanArgs) -> Result<ScanConfig, AppError> {
    let end_date = args
        .end_date
        .unwrap_or_else(|| chrono::Local::now().date_naive());

    if args.horizon == 0 {
        return Err(AppError::new(2, "Horizon must be >= 1."));
    }
    if args.workers == 0 {
        return Err(AppError::new(2, "Worker count must be >= 1."));
    }
    if args.lookback <= 0 {
        return Err(AppError::new(2, "Lookback must be > 0 days."));
    }
    if !(args.threshold.is_finite() && args.threshold > 0.0) {
        return Err(AppError::new(2, "Threshold must be finite and > 0."));
    }
    if args.samples == 0 {
        return Err(AppError::new(2, "Sample count must be > 0."));
    }

    Ok(ScanConfig {
        end_date,
        lookback_days: args.lookback,
        min_history: args.min_history,
        horizon: args.horizon,
        threshold: args.threshold,
        sample_count: args.samples,
        seed: args.seed,
        tail_len: args.tail,
        workers: args.workers,
        out_root: args.out_root.clone(),
    })
}
