//! Trajectory shape classification.
//!
//! RED flags a "dip then rally" shape: the first minimum occurs strictly
//! before the first maximum and the relative spread clears the threshold.
//! Every other shape (flat, declining, rising-then-falling, or a rally too
//! small to matter) is GREEN.

use crate::domain::Signal;
use crate::error::PipelineError;

/// Default relative-spread threshold for a RED signal.
pub const DEFAULT_THRESHOLD: f64 = 0.099;

/// Classify one forecast trajectory.
///
/// RED iff `min_pos < max_pos` and `(max - min) / min >= threshold`, where
/// positions are first occurrences. Trajectories with fewer than two points
/// are GREEN. A zero minimum in a dip-then-rally shape would divide by zero
/// and is surfaced as `DegenerateSeries` rather than guessed around.
pub fn classify(trajectory: &[f64], threshold: f64) -> Result<Signal, PipelineError> {
    if trajectory.len() < 2 {
        return Ok(Signal::Green);
    }

    let mut max_v = f64::NEG_INFINITY;
    let mut min_v = f64::INFINITY;
    let mut max_pos = 0usize;
    let mut min_pos = 0usize;
    for (i, &v) in trajectory.iter().enumerate() {
        if v > max_v {
            max_v = v;
            max_pos = i;
        }
        if v < min_v {
            min_v = v;
            min_pos = i;
        }
    }

    if min_pos >= max_pos {
        return Ok(Signal::Green);
    }
    if min_v == 0.0 {
        return Err(PipelineError::DegenerateSeries);
    }
    if (max_v - min_v) / min_v >= threshold {
        Ok(Signal::Red)
    } else {
        Ok(Signal::Green)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dip_then_rally_above_threshold_is_red() {
        // spread (11 - 9) / 9 ≈ 0.222
        let signal = classify(&[10.0, 9.0, 11.0], DEFAULT_THRESHOLD).unwrap();
        assert_eq!(signal, Signal::Red);
    }

    #[test]
    fn dip_then_rally_below_threshold_is_green() {
        // spread (9.9 - 9.5) / 9.5 ≈ 0.042
        let signal = classify(&[10.0, 9.5, 9.9], DEFAULT_THRESHOLD).unwrap();
        assert_eq!(signal, Signal::Green);
    }

    #[test]
    fn rally_then_dip_is_green_regardless_of_spread() {
        let signal = classify(&[10.0, 12.0, 9.0], DEFAULT_THRESHOLD).unwrap();
        assert_eq!(signal, Signal::Green);
    }

    #[test]
    fn single_point_is_green() {
        assert_eq!(classify(&[10.0], DEFAULT_THRESHOLD).unwrap(), Signal::Green);
        assert_eq!(classify(&[], DEFAULT_THRESHOLD).unwrap(), Signal::Green);
    }

    #[test]
    fn first_occurrence_positions_decide_ties() {
        // min at 0, max first reached at 1: ordering holds.
        let signal = classify(&[9.0, 11.0, 11.0, 9.0], DEFAULT_THRESHOLD).unwrap();
        assert_eq!(signal, Signal::Red);
    }

    #[test]
    fn zero_minimum_before_maximum_is_degenerate() {
        let err = classify(&[1.0, 0.0, 2.0], DEFAULT_THRESHOLD).unwrap_err();
        assert_eq!(err, PipelineError::DegenerateSeries);
    }

    #[test]
    fn zero_minimum_after_maximum_is_still_green() {
        // Ordering already fails, so the ratio is never formed.
        let signal = classify(&[1.0, 2.0, 0.0], DEFAULT_THRESHOLD).unwrap();
        assert_eq!(signal, Signal::Green);
    }
}
