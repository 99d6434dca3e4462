//! Calendar-gap repair via forward-fill.
//!
//! Exchange data only carries rows for trading days. The forecaster wants an
//! uninterrupted daily series, so every missing calendar day is filled with
//! the most recent prior close. Values are carried forward, never
//! interpolated and never extrapolated beyond the carry.

use std::collections::BTreeMap;

use chrono::{Duration, NaiveDate};

use crate::domain::{DenseSeries, Observation};
use crate::error::PipelineError;

/// Build a dense series covering every calendar day in
/// `[first_raw_date, end_date - 1]`.
///
/// Raw observations are sorted by date; on duplicate dates the last
/// occurrence wins. Each day absent from the raw input is emitted as a
/// synthetic observation carrying the most recent earlier close (the first
/// raw close before any real value has been seen). Raw dates at or past
/// `end_date` fall outside the window and are dropped.
///
/// The output is a fixed point: re-filling a dense series yields the same
/// series.
pub fn fill_calendar_gaps(
    raw: &[Observation],
    end_date: NaiveDate,
) -> Result<DenseSeries, PipelineError> {
    if raw.is_empty() {
        return Err(PipelineError::NoSourceData);
    }

    let mut by_date: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for obs in raw {
        by_date.insert(obs.date, obs.close);
    }

    let Some((&first, &first_close)) = by_date.iter().next() else {
        return Err(PipelineError::NoSourceData);
    };

    let last_day = end_date - Duration::days(1);
    let mut out = Vec::new();
    let mut carried = first_close;
    let mut day = first;
    while day <= last_day {
        if let Some(&close) = by_date.get(&day) {
            carried = close;
        }
        out.push(Observation {
            date: day,
            close: carried,
        });
        day = day + Duration::days(1);
    }

    Ok(DenseSeries::from_contiguous(out))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn obs(date: NaiveDate, close: f64) -> Observation {
        Observation { date, close }
    }

    #[test]
    fn fills_every_day_up_to_end_date_exclusive() {
        let raw = vec![
            obs(d(2026, 1, 1), 10.0),
            obs(d(2026, 1, 2), 11.0),
            // 3rd and 4th missing (weekend)
            obs(d(2026, 1, 5), 12.0),
        ];
        let series = fill_calendar_gaps(&raw, d(2026, 1, 8)).unwrap();

        let dates: Vec<NaiveDate> = series.observations().iter().map(|o| o.date).collect();
        assert_eq!(
            dates,
            vec![
                d(2026, 1, 1),
                d(2026, 1, 2),
                d(2026, 1, 3),
                d(2026, 1, 4),
                d(2026, 1, 5),
                d(2026, 1, 6),
                d(2026, 1, 7),
            ]
        );
    }

    #[test]
    fn synthetic_days_carry_most_recent_prior_close() {
        let raw = vec![
            obs(d(2026, 1, 1), 10.0),
            obs(d(2026, 1, 2), 11.0),
            obs(d(2026, 1, 5), 12.0),
        ];
        let series = fill_calendar_gaps(&raw, d(2026, 1, 6)).unwrap();

        let by_date: std::collections::HashMap<NaiveDate, f64> = series
            .observations()
            .iter()
            .map(|o| (o.date, o.close))
            .collect();
        // Weekend carries Friday's value, never the following Monday's.
        assert_eq!(by_date[&d(2026, 1, 3)], 11.0);
        assert_eq!(by_date[&d(2026, 1, 4)], 11.0);
        assert_eq!(by_date[&d(2026, 1, 5)], 12.0);
    }

    #[test]
    fn refilling_a_dense_series_is_a_fixed_point() {
        let raw = vec![
            obs(d(2026, 1, 1), 10.0),
            obs(d(2026, 1, 4), 11.5),
            obs(d(2026, 1, 6), 9.0),
        ];
        let end = d(2026, 1, 10);
        let first = fill_calendar_gaps(&raw, end).unwrap();
        let second = fill_calendar_gaps(first.observations(), end).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn gapless_input_passes_through() {
        let raw = vec![
            obs(d(2026, 1, 1), 10.0),
            obs(d(2026, 1, 2), 11.0),
            obs(d(2026, 1, 3), 12.0),
        ];
        let series = fill_calendar_gaps(&raw, d(2026, 1, 4)).unwrap();
        assert_eq!(series.observations(), raw.as_slice());
    }

    #[test]
    fn duplicate_dates_are_last_write_wins() {
        let raw = vec![
            obs(d(2026, 1, 1), 10.0),
            obs(d(2026, 1, 2), 11.0),
            obs(d(2026, 1, 2), 11.5),
        ];
        let series = fill_calendar_gaps(&raw, d(2026, 1, 3)).unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series.observations()[1].close, 11.5);
    }

    #[test]
    fn empty_input_is_no_source_data() {
        let err = fill_calendar_gaps(&[], d(2026, 1, 3)).unwrap_err();
        assert_eq!(err, PipelineError::NoSourceData);
    }

    #[test]
    fn unsorted_input_is_sorted_by_date() {
        let raw = vec![
            obs(d(2026, 1, 3), 12.0),
            obs(d(2026, 1, 1), 10.0),
            obs(d(2026, 1, 2), 11.0),
        ];
        let series = fill_calendar_gaps(&raw, d(2026, 1, 4)).unwrap();
        assert_eq!(series.first_date(), Some(d(2026, 1, 1)));
        assert_eq!(series.last_date(), Some(d(2026, 1, 3)));
    }
}
