//! Transition point estimation within a wing.
//!
//! The steepest rise is located with the two-step difference
//! `wing[i + 2] - wing[i]`. Its centre `a = i + 1` and the following sample
//! `b = i + 2` are the two candidates for the frame that contains the edge.
//! Segment statistics are taken over `wing[..a]` (bottom) and
//! `wing[a + 1..len - 1]` (top); sample `a` and the final sample are left out
//! of both.

use serde::{Deserialize, Serialize};
use shared::{StatsError, StatsScan};

use crate::error::FlashTimingError;

/// Segment statistics and the chosen transition index of one wing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransitionEstimate {
    pub bottom_mean: f64,
    pub bottom_std: f64,
    pub top_mean: f64,
    pub top_std: f64,
    /// Wing-relative index of the frame holding the edge
    pub transition_index: usize,
    /// Candidate at the centre of the steepest rise
    pub candidate_a: usize,
    /// Candidate one frame later
    pub candidate_b: usize,
    /// Largest two-step difference found
    pub max_delta: f64,
}

/// Mean and sample standard deviation of one wing segment.
fn segment_stats(segment: &[f64], name: &'static str) -> Result<(f64, f64), FlashTimingError> {
    let scan = StatsScan::new(segment);
    let stats = || -> Result<(f64, f64), StatsError> {
        Ok((scan.mean()?, scan.sample_std_dev(segment)?))
    };
    stats().map_err(|source| FlashTimingError::EmptySegment {
        segment: name,
        source,
    })
}

/// Pick `a` or `b` as the transition frame.
///
/// `a` stays a candidate unless it sits below the bottom mean; `b` stays a
/// candidate unless it sits above the top mean. With exactly one candidate
/// left it wins. With none, `b` wins. With both, the one further from its
/// own asymptote wins, ties going to `b`.
#[allow(clippy::neg_cmp_op_on_partial_ord)]
pub fn choose_transition(
    a_value: f64,
    b_value: f64,
    bottom_mean: f64,
    top_mean: f64,
) -> Candidate {
    let a_is_candidate = !(a_value < bottom_mean);
    let b_is_candidate = !(b_value > top_mean);

    match (a_is_candidate, b_is_candidate) {
        (false, false) | (false, true) => Candidate::B,
        (true, false) => Candidate::A,
        (true, true) => {
            let a_delta = a_value - bottom_mean;
            let b_delta = top_mean - b_value;
            if a_delta > b_delta {
                Candidate::A
            } else {
                Candidate::B
            }
        }
    }
}

/// Which of the two candidate frames holds the edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Candidate {
    A,
    B,
}

/// Estimate the transition frame and segment statistics of a rising wing.
///
/// Wings shorter than `min_len`, or than the three samples one two-step
/// difference needs, are rejected outright; a wing whose steepest
/// rise leaves fewer than two samples on either side fails with
/// `EmptySegment`.
pub fn estimate_transition(
    wing: &[f64],
    min_len: usize,
) -> Result<TransitionEstimate, FlashTimingError> {
    let len = wing.len();
    let min = min_len.max(3);
    if len < min {
        return Err(FlashTimingError::WingTooShort { len, min });
    }

    let mut max_delta = f64::NEG_INFINITY;
    let mut candidate_a = 1;
    let mut candidate_b = 2;
    for i in 0..len - 2 {
        let delta = wing[i + 2] - wing[i];
        if delta > max_delta {
            max_delta = delta;
            candidate_a = i + 1;
            candidate_b = i + 2;
        }
    }

    let (bottom_mean, bottom_std) = segment_stats(&wing[..candidate_a], "bottom")?;
    let top = wing.get(candidate_a + 1..len - 1).unwrap_or(&[]);
    let (top_mean, top_std) = segment_stats(top, "top")?;

    let a_value = wing[candidate_a];
    let b_value = wing[candidate_b];
    let choice = choose_transition(a_value, b_value, bottom_mean, top_mean);
    let transition_index = match choice {
        Candidate::A => candidate_a,
        Candidate::B => candidate_b,
    };

    log::debug!(
        "transition: max rise {max_delta:.3} at candidates a={candidate_a} ({a_value:.3}) \
         b={candidate_b} ({b_value:.3}); bottom {bottom_mean:.3}±{bottom_std:.3}, \
         top {top_mean:.3}±{top_std:.3}; chose {choice:?} -> {transition_index}"
    );

    Ok(TransitionEstimate {
        bottom_mean,
        bottom_std,
        top_mean,
        top_std,
        transition_index,
        candidate_a,
        candidate_b,
        max_delta,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_perfect_step_lands_on_step() {
        let mut wing = vec![100.0; 8];
        wing.extend([500.0; 12]);
        let est = estimate_transition(&wing, 8).unwrap();

        assert_eq!(est.candidate_a, 7);
        assert_eq!(est.candidate_b, 8);
        assert_eq!(est.transition_index, 8);
        assert_eq!(est.bottom_mean, 100.0);
        assert_eq!(est.bottom_std, 0.0);
        assert_eq!(est.top_mean, 500.0);
        assert_eq!(est.top_std, 0.0);
        assert_eq!(est.max_delta, 400.0);
    }

    #[test]
    fn test_partial_frame_picks_a() {
        // Frame 10 is 70% lit: steepest two-step rise is centred on it.
        let mut wing = vec![100.0, 102.0, 98.0, 101.0, 99.0, 100.0, 103.0, 97.0, 100.0, 100.0];
        wing.push(380.0);
        wing.extend([500.0, 498.0, 503.0, 499.0, 501.0, 500.0]);
        let est = estimate_transition(&wing, 8).unwrap();

        assert_eq!(est.candidate_a, 10);
        assert_eq!(est.transition_index, 10);
        assert_relative_eq!(est.bottom_mean, 100.0, epsilon = 1e-9);
        // top excludes wing[10] and the final sample
        assert_relative_eq!(est.top_mean, 500.2, epsilon = 1e-9);
    }

    #[test]
    fn test_segments_use_sample_std() {
        let wing = [1.0, 3.0, 1.0, 3.0, 50.0, 100.0, 96.0, 104.0, 96.0, 104.0, 0.0];
        let est = estimate_transition(&wing, 8).unwrap();

        // max rise wing[5] - wing[3] = 97 -> a = 4, b = 5
        assert_eq!(est.candidate_a, 4);
        // bottom [1,3,1,3]: mean 2, sample var 4/3
        assert_relative_eq!(est.bottom_mean, 2.0, epsilon = 1e-12);
        assert_relative_eq!(est.bottom_std, (4.0_f64 / 3.0).sqrt(), epsilon = 1e-12);
        // top [100,96,104,96,104]: mean 100, sample var 64/4
        assert_relative_eq!(est.top_mean, 100.0, epsilon = 1e-12);
        assert_relative_eq!(est.top_std, 4.0, epsilon = 1e-12);
    }

    #[test]
    fn test_short_wing_is_rejected() {
        let wing = [100.0, 100.0, 100.0, 500.0, 500.0, 500.0, 500.0];
        assert_eq!(
            estimate_transition(&wing, 8),
            Err(FlashTimingError::WingTooShort { len: 7, min: 8 })
        );
    }

    #[test]
    fn test_floor_of_three_samples() {
        assert_eq!(
            estimate_transition(&[100.0, 500.0], 0),
            Err(FlashTimingError::WingTooShort { len: 2, min: 3 })
        );
        // Long enough to scan, too short for two samples on each side
        assert!(matches!(
            estimate_transition(&[100.0, 100.0, 500.0, 500.0], 0),
            Err(FlashTimingError::EmptySegment { .. })
        ));
    }

    #[test]
    fn test_rise_at_end_leaves_no_top() {
        let mut wing = vec![100.0; 9];
        wing.push(500.0);
        assert!(matches!(
            estimate_transition(&wing, 8),
            Err(FlashTimingError::EmptySegment { segment: "top", .. })
        ));
    }

    #[test]
    fn test_tie_break_rules() {
        // a below bottom mean, b fine -> b
        assert_eq!(choose_transition(90.0, 400.0, 100.0, 500.0), Candidate::B);
        // b above top mean, a fine -> a
        assert_eq!(choose_transition(300.0, 510.0, 100.0, 500.0), Candidate::A);
        // both fail -> b
        assert_eq!(choose_transition(90.0, 510.0, 100.0, 500.0), Candidate::B);
        // both valid: larger deviation from its own asymptote wins
        assert_eq!(choose_transition(350.0, 480.0, 100.0, 500.0), Candidate::A);
        assert_eq!(choose_transition(120.0, 300.0, 100.0, 500.0), Candidate::B);
        // equal deviations -> b
        assert_eq!(choose_transition(150.0, 450.0, 100.0, 500.0), Candidate::B);
    }
}
