//! Probabilistic forecasting behind a pluggable trait.
//!
//! The pipeline treats the model as a black box: anything that can train on
//! a dense series and sample future trajectories of the right shape is
//! acceptable. The default implementation is `ar1::Ar1MonteCarlo`; swapping
//! in a heavier model only requires implementing the two traits below.

pub mod ar1;

pub use ar1::*;

use chrono::NaiveDate;

use crate::domain::{DenseSeries, SampleSet};
use crate::error::PipelineError;

/// Where a forecaster would like to run.
///
/// A hint only; the scheduler is free to ignore it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceHint {
    Cpu,
    /// Training benefits from a GPU or similar accelerator when available.
    PrefersAccelerator,
}

/// A forecast model family.
///
/// `train` is a blocking, non-cancellable unit of work and is the dominant
/// cost of a pipeline run; the scan's worker pool bounds how many execute at
/// once.
pub trait Forecaster: Send + Sync {
    fn name(&self) -> &'static str;

    fn resource_hint(&self) -> ResourceHint {
        ResourceHint::Cpu
    }

    /// Train on a dense series for the given horizon.
    ///
    /// Fails with `PipelineError::InsufficientData` when the series is
    /// shorter than the forecaster's minimum history.
    fn train(
        &self,
        series: &DenseSeries,
        horizon: usize,
    ) -> Result<Box<dyn TrainedModel>, PipelineError>;
}

/// A trained model ready to sample trajectories.
pub trait TrainedModel: Send + std::fmt::Debug {
    /// Sample one or more trajectories of length `horizon + 1` starting at
    /// `origin`.
    ///
    /// The first point of each trajectory is the model's estimate at
    /// `origin` itself.
    fn predict(&self, origin: NaiveDate, horizon: usize) -> Result<SampleSet, PipelineError>;
}
