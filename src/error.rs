//! Error types.
//!
//! Two layers:
//!
//! - `AppError`: application-boundary failures carrying a process exit code
//!   (bad usage/config/filesystem = 2, remote service trouble = 4)
//! - `PipelineError`: failures scoped to a single instrument's pipeline run,
//!   mapped to terminal outcomes by the orchestrator

use thiserror::Error;

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

/// Errors scoped to one instrument's pipeline run.
///
/// A run that fails simply terminates with its outcome; sibling instruments
/// in the worker pool are unaffected. There is no retry policy here.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PipelineError {
    /// Raw observation sequence is empty (or the upstream fetch failed).
    #[error("no source data")]
    NoSourceData,

    /// Repaired series is shorter than the minimum history threshold.
    #[error("insufficient history: {len} < {min} days")]
    InsufficientData { len: usize, min: usize },

    /// Classification hit a zero minimum value (division by zero).
    #[error("degenerate trajectory: minimum value is zero")]
    DegenerateSeries,

    /// Any failure inside the pluggable forecaster.
    #[error("forecaster: {0}")]
    Forecaster(String),
}
