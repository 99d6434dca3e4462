//! Quote CSV ingest and normalization.
//!
//! This module turns a downloaded daily-quote CSV into a clean, date-sorted
//! observation list that is safe to gap-fill and train on.
//!
//! Design goals:
//! - **Row-level validation** (skip bad rows, but report what happened)
//! - **Deterministic behavior** (no hidden randomness)
//! - **Separation of concerns**: no pipeline logic here

use std::collections::{BTreeMap, HashMap};
use std::io::Read;

use chrono::NaiveDate;
use csv::StringRecord;

use crate::domain::Observation;
use crate::error::AppError;

/// Header names accepted for the date column (the quote service labels it
/// 日期).
const DATE_HEADERS: [&str; 3] = ["date", "dt", "日期"];

/// Header names accepted for the close-price column (the quote service
/// labels it 收盘价).
const CLOSE_HEADERS: [&str; 4] = ["close_price", "tclose", "close", "收盘价"];

/// A row-level error encountered during ingest.
#[derive(Debug, Clone)]
pub struct RowError {
    pub line: usize,
    pub message: String,
}

/// Ingest output: date-sorted observations + row errors.
#[derive(Debug, Clone)]
pub struct IngestedQuotes {
    pub observations: Vec<Observation>,
    pub row_errors: Vec<RowError>,
    pub rows_read: usize,
    pub rows_used: usize,
}

/// Parse a quote CSV into date-sorted observations.
///
/// Columns other than the date and close are ignored. Duplicate dates are
/// last-write-wins. Rows with unparseable dates or non-positive/non-finite
/// closes become row errors, not fatal failures.
pub fn parse_quote_csv(input: impl Read) -> Result<IngestedQuotes, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(input);

    let headers = reader
        .headers()
        .map_err(|e| AppError::new(2, format!("Failed to read CSV headers: {e}")))?
        .clone();
    let header_map = build_header_map(&headers);

    let date_idx = find_column(&header_map, &DATE_HEADERS)
        .ok_or_else(|| AppError::new(2, "Missing date column (`date`/`dt`)."))?;
    let close_idx = find_column(&header_map, &CLOSE_HEADERS)
        .ok_or_else(|| AppError::new(2, "Missing close column (`close_price`/`tclose`/`close`)."))?;

    let mut by_date: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    let mut row_errors = Vec::new();
    let mut rows_read = 0usize;

    for (idx, result) in reader.records().enumerate() {
        // +2 because records() starts after the header row and CSV line
        // numbers are 1-based.
        let line = idx + 2;
        rows_read += 1;

        let record = match result {
            Ok(record) => record,
            Err(e) => {
                row_errors.push(RowError {
                    line,
                    message: format!("CSV parse error: {e}"),
                });
                continue;
            }
        };

        match parse_row(&record, date_idx, close_idx) {
            Ok((date, close)) => {
                // File order decides duplicates: the last occurrence wins.
                by_date.insert(date, close);
            }
            Err(message) => row_errors.push(RowError { line, message }),
        }
    }

    let observations: Vec<Observation> = by_date
        .into_iter()
        .map(|(date, close)| Observation { date, close })
        .collect();
    let rows_used = observations.len();

    Ok(IngestedQuotes {
        observations,
        row_errors,
        rows_read,
        rows_used,
    })
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (normalize_header_name(name), idx))
        .collect()
}

fn normalize_header_name(name: &str) -> String {
    // Some CSV exports carry a UTF-8 BOM on the first header; strip it so
    // column lookup does not silently fail.
    let name = name.trim().trim_start_matches('\u{feff}');
    name.to_ascii_lowercase()
}

fn find_column(header_map: &HashMap<String, usize>, names: &[&str]) -> Option<usize> {
    names.iter().find_map(|name| header_map.get(*name).copied())
}

fn parse_row(
    record: &StringRecord,
    date_idx: usize,
    close_idx: usize,
) -> Result<(NaiveDate, f64), String> {
    let date_raw = record
        .get(date_idx)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| "Missing date value.".to_string())?;
    let date = parse_date(date_raw)?;

    let close_raw = record
        .get(close_idx)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| "Missing close value.".to_string())?;
    let close = close_raw
        .parse::<f64>()
        .map_err(|_| format!("Invalid close '{close_raw}'."))?;

    if !close.is_finite() || close <= 0.0 {
        // Suspended listings report a close of 0; a zero would later poison
        // the log-price regression and the classification ratio.
        return Err(format!("Non-positive close '{close_raw}'."));
    }

    Ok((date, close))
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    const FMTS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%Y%m%d"];
    for fmt in FMTS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Ok(d);
        }
    }
    Err(format!(
        "Invalid date '{s}'. Expected one of: YYYY-MM-DD, YYYY/MM/DD, YYYYMMDD."
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_sorts_quote_rows() {
        let csv = "\
DATE,CODE,TCLOSE,HIGH
2026-01-05,'600000,12.5,12.9
2026-01-02,'600000,12.0,12.2
2026-01-03,'600000,12.2,12.4
";
        let ingest = parse_quote_csv(csv.as_bytes()).unwrap();
        assert_eq!(ingest.rows_read, 3);
        assert_eq!(ingest.rows_used, 3);
        assert!(ingest.row_errors.is_empty());

        let dates: Vec<NaiveDate> = ingest.observations.iter().map(|o| o.date).collect();
        assert!(dates.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(ingest.observations[0].close, 12.0);
    }

    #[test]
    fn duplicate_dates_keep_the_last_occurrence() {
        let csv = "date,close_price\n2026-01-02,10.0\n2026-01-02,10.5\n";
        let ingest = parse_quote_csv(csv.as_bytes()).unwrap();
        assert_eq!(ingest.rows_used, 1);
        assert_eq!(ingest.observations[0].close, 10.5);
    }

    #[test]
    fn bad_rows_become_row_errors_not_failures() {
        let csv = "\
date,close
2026-01-02,10.0
not-a-date,10.1
2026-01-04,0
2026-01-05,11.0
";
        let ingest = parse_quote_csv(csv.as_bytes()).unwrap();
        assert_eq!(ingest.rows_read, 4);
        assert_eq!(ingest.rows_used, 2);
        assert_eq!(ingest.row_errors.len(), 2);
        assert_eq!(ingest.row_errors[0].line, 3);
    }

    #[test]
    fn missing_close_column_is_an_error() {
        let csv = "date,open\n2026-01-02,10.0\n";
        assert!(parse_quote_csv(csv.as_bytes()).is_err());
    }
}
