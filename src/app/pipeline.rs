//! Per-instrument pipeline orchestration.
//!
//! One instrument's run is strictly sequential, ordered by data dependency:
//!
//! gap-fill -> train -> predict -> classify -> output record
//!
//! Every failure is terminal for that instrument only and maps to a
//! `PipelineOutcome`; nothing here retries and nothing crosses instrument
//! boundaries.

use crate::domain::{
    DenseSeries, Observation, OutputRow, PipelineOutcome, SampleSet, ScanConfig, Signal,
};
use crate::error::PipelineError;
use crate::fill::fill_calendar_gaps;
use crate::forecast::Forecaster;
use crate::signal::classify;

/// Everything computed by one successful pipeline run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub signal: Signal,
    pub samples: SampleSet,
    /// Last `tail_len` training rows followed by the forecast rows,
    /// ascending by date.
    pub record: Vec<OutputRow>,
}

/// Outcome report for one instrument.
#[derive(Debug, Clone)]
pub struct InstrumentRun {
    pub code: String,
    pub outcome: PipelineOutcome,
    /// Present only for `Done` outcomes.
    pub output: Option<RunOutput>,
}

/// Run the full pipeline for one instrument.
///
/// Never returns an error: every failure becomes a terminal outcome for this
/// instrument.
pub fn run_instrument(
    code: &str,
    raw: &[Observation],
    config: &ScanConfig,
    forecaster: &dyn Forecaster,
) -> InstrumentRun {
    match compute(raw, config, forecaster) {
        Ok(output) => InstrumentRun {
            code: code.to_string(),
            outcome: PipelineOutcome::Done {
                signal: output.signal,
            },
            output: Some(output),
        },
        Err(err) => InstrumentRun {
            code: code.to_string(),
            outcome: outcome_for(err),
            output: None,
        },
    }
}

fn compute(
    raw: &[Observation],
    config: &ScanConfig,
    forecaster: &dyn Forecaster,
) -> Result<RunOutput, PipelineError> {
    if raw.is_empty() {
        return Err(PipelineError::NoSourceData);
    }

    // The dense series ends at end_date - 1, so it is the training window.
    let series = fill_calendar_gaps(raw, config.end_date)?;
    let model = forecaster.train(&series, config.horizon)?;
    let samples = model.predict(config.end_date, config.horizon)?;
    let signal = classify(samples.primary(), config.threshold)?;
    let record = build_output_record(&series, &samples, config.tail_len);

    Ok(RunOutput {
        signal,
        samples,
        record,
    })
}

/// Map a pipeline error to its terminal outcome.
fn outcome_for(err: PipelineError) -> PipelineOutcome {
    match err {
        PipelineError::NoSourceData => PipelineOutcome::SkippedNoData,
        PipelineError::InsufficientData { len, .. } => PipelineOutcome::SkippedShortHistory { len },
        other => PipelineOutcome::Failed {
            reason: other.to_string(),
        },
    }
}

/// Concatenate the last `tail_len` training rows with the primary forecast
/// trajectory's rows.
fn build_output_record(
    series: &DenseSeries,
    samples: &SampleSet,
    tail_len: usize,
) -> Vec<OutputRow> {
    let mut record: Vec<OutputRow> = series
        .tail(tail_len)
        .iter()
        .map(|o| OutputRow {
            date: o.date,
            value: o.close,
        })
        .collect();
    for (date, value) in samples.dates().into_iter().zip(samples.primary().iter().copied()) {
        record.push(OutputRow { date, value });
    }
    record
}
