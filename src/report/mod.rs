//! Scan reporting: per-instrument outcome tallies and the RED list.
//!
//! Formatting is kept in one place so:
//! - the pipeline code stays clean and testable
//! - output changes are localized (important for future snapshot tests)

use crate::domain::{PipelineOutcome, ScanConfig, Signal};

/// Outcome of one instrument within a scan.
#[derive(Debug, Clone)]
pub struct InstrumentReport {
    pub code: String,
    pub outcome: PipelineOutcome,
}

/// Aggregate outcome counts over a scan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanTally {
    pub red: usize,
    pub green: usize,
    pub skipped_no_data: usize,
    pub skipped_short_history: usize,
    pub failed: usize,
}

/// Count outcomes per category.
pub fn tally(reports: &[InstrumentReport]) -> ScanTally {
    let mut out = ScanTally::default();
    for report in reports {
        match &report.outcome {
            PipelineOutcome::Done {
                signal: Signal::Red,
            } => out.red += 1,
            PipelineOutcome::Done {
                signal: Signal::Green,
            } => out.green += 1,
            PipelineOutcome::SkippedNoData => out.skipped_no_data += 1,
            PipelineOutcome::SkippedShortHistory { .. } => out.skipped_short_history += 1,
            PipelineOutcome::Failed { .. } => out.failed += 1,
        }
    }
    out
}

/// Format the summary printed at the end of a scan.
pub fn format_scan_summary(reports: &[InstrumentReport], config: &ScanConfig) -> String {
    let counts = tally(reports);
    let mut out = String::new();

    out.push_str("=== dipscan - forecast signal scan ===\n");
    out.push_str(&format!("End date: {}\n", config.end_date));
    out.push_str(&format!("Instruments: {}\n", reports.len()));
    out.push_str(&format!("RED: {}  GREEN: {}\n", counts.red, counts.green));
    out.push_str(&format!(
        "Skipped (no data): {}  Skipped (short history): {}  Failed: {}\n",
        counts.skipped_no_data, counts.skipped_short_history, counts.failed
    ));

    let reds: Vec<&str> = reports
        .iter()
        .filter(|r| {
            matches!(
                r.outcome,
                PipelineOutcome::Done {
                    signal: Signal::Red
                }
            )
        })
        .map(|r| r.code.as_str())
        .collect();
    if !reds.is_empty() {
        out.push_str(&format!("RED instruments: {}\n", reds.join(", ")));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::path::PathBuf;

    fn report(code: &str, outcome: PipelineOutcome) -> InstrumentReport {
        InstrumentReport {
            code: code.to_string(),
            outcome,
        }
    }

    fn config() -> ScanConfig {
        ScanConfig {
            end_date: NaiveDate::from_ymd_opt(2026, 8, 24).unwrap(),
            lookback_days: 720,
            min_history: 360,
            horizon: 2,
            threshold: 0.099,
            sample_count: 200,
            seed: 42,
            tail_len: 5,
            workers: 20,
            out_root: PathBuf::from("."),
        }
    }

    #[test]
    fn tallies_every_outcome_category() {
        let reports = vec![
            report("A", PipelineOutcome::Done { signal: Signal::Red }),
            report("B", PipelineOutcome::Done { signal: Signal::Green }),
            report("C", PipelineOutcome::SkippedNoData),
            report("D", PipelineOutcome::SkippedShortHistory { len: 120 }),
            report(
                "E",
                PipelineOutcome::Failed {
                    reason: "forecaster: diverged".to_string(),
                },
            ),
        ];
        assert_eq!(
            tally(&reports),
            ScanTally {
                red: 1,
                green: 1,
                skipped_no_data: 1,
                skipped_short_history: 1,
                failed: 1,
            }
        );
    }

    #[test]
    fn summary_lists_red_instruments() {
        let reports = vec![
            report("600000", PipelineOutcome::Done { signal: Signal::Red }),
            report("000001", PipelineOutcome::Done { signal: Signal::Green }),
        ];
        let summary = format_scan_summary(&reports, &config());
        assert!(summary.contains("RED: 1  GREEN: 1"));
        assert!(summary.contains("RED instruments: 600000"));
        assert!(!summary.contains("000001,"));
    }
}
