//! Export the signal-tagged output record to CSV.
//!
//! One file per instrument per run, named `RED_<code>.csv` or
//! `GREEN_<code>.csv`, holding `date,close` rows for the trailing training
//! window followed by the forecast trajectory, ascending by date. The export
//! is meant to be easy to consume in spreadsheets or downstream scripts.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::domain::{OutputRow, Signal};
use crate::error::AppError;

/// Write one instrument's output CSV and return the path written.
pub fn write_output_csv(
    dir: &Path,
    code: &str,
    signal: Signal,
    record: &[OutputRow],
) -> Result<PathBuf, AppError> {
    let path = dir.join(format!("{}_{code}.csv", signal.as_str()));
    let mut file = File::create(&path).map_err(|e| {
        AppError::new(2, format!("Failed to create output CSV '{}': {e}", path.display()))
    })?;

    writeln!(file, "date,close")
        .map_err(|e| AppError::new(2, format!("Failed to write output CSV header: {e}")))?;

    for row in record {
        writeln!(file, "{},{:.4}", row.date, row.value)
            .map_err(|e| AppError::new(2, format!("Failed to write output CSV row: {e}")))?;
    }

    Ok(path)
}
