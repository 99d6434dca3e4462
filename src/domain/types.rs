//! Shared domain types.
//!
//! These types are intentionally kept lightweight so they can be:
//!
//! - used in-memory during a pipeline run
//! - exported to the per-instrument output CSV
//! - aggregated into the end-of-scan report

use std::fmt;
use std::path::PathBuf;

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

/// A single daily price observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub date: NaiveDate,
    pub close: f64,
}

/// A calendar-complete, gap-free daily price series.
///
/// Invariants (established by `fill::fill_calendar_gaps`, the only production
/// constructor):
///
/// - dates increase by exactly one calendar day, no gaps, no duplicates
/// - every synthetic entry's value equals the most recent real value at or
///   before its date
///
/// One pipeline run owns its series exclusively; it is immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct DenseSeries {
    observations: Vec<Observation>,
}

impl DenseSeries {
    /// Wrap an already sorted, contiguous observation vector.
    ///
    /// Callers must guarantee contiguity.
    pub(crate) fn from_contiguous(observations: Vec<Observation>) -> Self {
        Self { observations }
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.observations.first().map(|o| o.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.observations.last().map(|o| o.date)
    }

    /// The last `n` observations (fewer if the series is shorter).
    pub fn tail(&self, n: usize) -> &[Observation] {
        let start = self.observations.len().saturating_sub(n);
        &self.observations[start..]
    }
}

/// Sampled forecast trajectories from one training run.
///
/// Each trajectory has `horizon + 1` points: the model's estimate at the
/// origin date followed by one point per forecast day. Produced once per
/// training run; immutable.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleSet {
    pub origin: NaiveDate,
    pub horizon: usize,
    pub trajectories: Vec<Vec<f64>>,
}

impl SampleSet {
    /// The first sampled trajectory, used for classification and output.
    pub fn primary(&self) -> &[f64] {
        self.trajectories.first().map(Vec::as_slice).unwrap_or(&[])
    }

    /// Calendar dates of the trajectory points: origin through origin + horizon.
    pub fn dates(&self) -> Vec<NaiveDate> {
        (0..=self.horizon as i64)
            .map(|i| self.origin + Duration::days(i))
            .collect()
    }
}

/// RED/GREEN trade signal derived from a forecast trajectory's shape.
///
/// RED marks a trajectory that dips before rallying by at least the
/// configured fraction ("buy dip, sell rally"); everything else is GREEN.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Signal {
    Red,
    Green,
}

impl Signal {
    /// Output-file prefix (`RED_<code>.csv` / `GREEN_<code>.csv`).
    pub fn as_str(self) -> &'static str {
        match self {
            Signal::Red => "RED",
            Signal::Green => "GREEN",
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Terminal outcome of one instrument's pipeline run.
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineOutcome {
    Done { signal: Signal },
    SkippedNoData,
    SkippedShortHistory { len: usize },
    Failed { reason: String },
}

impl fmt::Display for PipelineOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineOutcome::Done { signal } => write!(f, "done ({signal})"),
            PipelineOutcome::SkippedNoData => f.write_str("skipped (no data)"),
            PipelineOutcome::SkippedShortHistory { len } => {
                write!(f, "skipped (history {len} days)")
            }
            PipelineOutcome::Failed { reason } => write!(f, "failed: {reason}"),
        }
    }
}

/// One `(date, value)` row of an instrument's output record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutputRow {
    pub date: NaiveDate,
    pub value: f64,
}

/// A full scan's configuration as understood by the pipeline.
///
/// Derived from CLI flags (plus defaults). `end_date` is the reference end
/// date of the run: the training window covers dates strictly before it and
/// the forecast origin is the date itself. It is resolved once at the CLI
/// boundary; nothing below it reads the ambient clock.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    pub end_date: NaiveDate,
    /// Fetch window in days before `end_date`.
    pub lookback_days: i64,
    /// Minimum training-window length (days).
    pub min_history: usize,
    /// Forecast horizon in days beyond the origin.
    pub horizon: usize,
    /// Relative-spread threshold for a RED signal.
    pub threshold: f64,
    /// Number of sampled trajectories per instrument.
    pub sample_count: usize,
    /// Base seed for trajectory sampling.
    pub seed: u64,
    /// Trailing training rows included in each output file.
    pub tail_len: usize,
    /// Worker pool size (concurrent instrument pipelines).
    pub workers: usize,
    /// Root directory for `<end-date>/data` and `<end-date>/predict`.
    pub out_root: PathBuf,
}

impl ScanConfig {
    /// First date requested from the quote source.
    pub fn start_date(&self) -> NaiveDate {
        self.end_date - Duration::days(self.lookback_days)
    }

    fn dated_root(&self) -> PathBuf {
        self.out_root.join(self.end_date.format("%Y%m%d").to_string())
    }

    /// Directory for raw fetched quote CSVs.
    pub fn data_dir(&self) -> PathBuf {
        self.dated_root().join("data")
    }

    /// Directory for signal-tagged output CSVs.
    pub fn predict_dir(&self) -> PathBuf {
        self.dated_root().join("predict")
    }
}
