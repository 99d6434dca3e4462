//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - raw and repaired price series (`Observation`, `DenseSeries`)
//! - forecast outputs (`SampleSet`)
//! - the RED/GREEN `Signal` and per-instrument outcomes
//! - the run configuration (`ScanConfig`)

pub mod types;

pub use types::*;
