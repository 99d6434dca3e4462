//! Default forecaster: AR(1) on log prices with Monte Carlo sampling.
//!
//! Training fits `ln p(t+1) = a + b ln p(t)` by least squares over the
//! training window and estimates the residual standard deviation. Prediction
//! simulates the recursion forward with Gaussian noise, one seeded RNG per
//! training run so reruns on the same data reproduce exactly.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use chrono::NaiveDate;
use nalgebra::{DMatrix, DVector};
use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::Normal;

use crate::domain::{DenseSeries, SampleSet};
use crate::error::PipelineError;
use crate::forecast::{Forecaster, ResourceHint, TrainedModel};
use crate::math::solve_least_squares;

/// AR(1) Monte Carlo forecaster.
#[derive(Debug, Clone)]
pub struct Ar1MonteCarlo {
    /// Minimum training-window length (days).
    pub min_history: usize,
    /// Number of trajectories sampled per prediction.
    pub sample_count: usize,
    /// Base seed, combined with a series fingerprint per training run.
    pub seed: u64,
}

impl Ar1MonteCarlo {
    pub fn new(min_history: usize, sample_count: usize, seed: u64) -> Self {
        Self {
            min_history,
            sample_count,
            seed,
        }
    }
}

impl Forecaster for Ar1MonteCarlo {
    fn name(&self) -> &'static str {
        "ar1-monte-carlo"
    }

    fn resource_hint(&self) -> ResourceHint {
        ResourceHint::Cpu
    }

    fn train(
        &self,
        series: &DenseSeries,
        horizon: usize,
    ) -> Result<Box<dyn TrainedModel>, PipelineError> {
        // The recursion is horizon-agnostic at training time.
        let _ = horizon;

        if series.len() < self.min_history {
            return Err(PipelineError::InsufficientData {
                len: series.len(),
                min: self.min_history,
            });
        }
        if self.sample_count == 0 {
            return Err(PipelineError::Forecaster(
                "sample count must be > 0".to_string(),
            ));
        }

        let logs: Vec<f64> = series.observations().iter().map(|o| o.close.ln()).collect();
        if logs.iter().any(|v| !v.is_finite()) {
            return Err(PipelineError::Forecaster(
                "non-positive close in training window".to_string(),
            ));
        }

        // Regress ln p(t+1) on [1, ln p(t)].
        let n = logs.len() - 1;
        let x = DMatrix::from_fn(n, 2, |r, c| if c == 0 { 1.0 } else { logs[r] });
        let y = DVector::from_fn(n, |r, _| logs[r + 1]);
        let beta = solve_least_squares(&x, &y)
            .ok_or_else(|| PipelineError::Forecaster("AR(1) regression is singular".to_string()))?;
        let (a, b) = (beta[0], beta[1]);

        let mut sse = 0.0;
        for i in 0..n {
            let e = logs[i + 1] - (a + b * logs[i]);
            sse += e * e;
        }
        let sigma = (sse / n as f64).sqrt();

        Ok(Box::new(Ar1Model {
            a,
            b,
            sigma,
            last_log: logs[n],
            sample_count: self.sample_count,
            seed: trajectory_seed(self.seed, series),
        }))
    }
}

/// Trained AR(1) parameters plus sampling state.
#[derive(Debug, Clone)]
pub struct Ar1Model {
    a: f64,
    b: f64,
    sigma: f64,
    last_log: f64,
    sample_count: usize,
    seed: u64,
}

impl TrainedModel for Ar1Model {
    fn predict(&self, origin: NaiveDate, horizon: usize) -> Result<SampleSet, PipelineError> {
        let normal = Normal::new(0.0, 1.0)
            .map_err(|e| PipelineError::Forecaster(format!("noise distribution error: {e}")))?;
        let mut rng = StdRng::seed_from_u64(self.seed);

        let mut trajectories = Vec::with_capacity(self.sample_count);
        for _ in 0..self.sample_count {
            let mut path = Vec::with_capacity(horizon + 1);
            // First point: the noise-free one-step mean at the origin.
            let mut x = self.a + self.b * self.last_log;
            path.push(x.exp());
            for _ in 0..horizon {
                x = self.a + self.b * x + self.sigma * normal.sample(&mut rng);
                path.push(x.exp());
            }
            trajectories.push(path);
        }

        Ok(SampleSet {
            origin,
            horizon,
            trajectories,
        })
    }
}

/// Deterministic per-series RNG seed.
///
/// Combines the configured base seed with a fingerprint of the training
/// window so reruns on the same data reproduce exactly while different
/// instruments draw different noise.
fn trajectory_seed(seed: u64, series: &DenseSeries) -> u64 {
    let mut hasher = DefaultHasher::new();
    seed.hash(&mut hasher);
    series.len().hash(&mut hasher);
    if let Some(date) = series.first_date() {
        date.hash(&mut hasher);
    }
    if let Some(obs) = series.observations().last() {
        obs.date.hash(&mut hasher);
        obs.close.to_bits().hash(&mut hasher);
    }
    hasher.finish()
}
