//! Sub-frame refinement of the transition frame.

use serde::{Deserialize, Serialize};

use crate::algo::transition::TransitionEstimate;
use crate::error::FlashTimingError;

/// Fractional edge position inside the light curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SubFrameEstimate {
    /// Light-curve frame holding the edge
    pub frame_index: usize,
    /// Intensity of that frame
    pub point_intensity: f64,
    /// Fraction of the frame before the edge, in `[0, 1]`
    pub delta: f64,
    /// Whether the point sat strictly inside the one-sigma window
    pub in_window: bool,
    /// `frame_index + delta`
    pub edge_at: f64,
}

/// Linear position of `p` between the asymptotes, measured down from the top.
///
/// Only defined while `p` lies strictly between `bottom_mean + bottom_std`
/// and `top_mean - top_std`; outside that window the point is too close to
/// an asymptote to refine and `None` is returned.
pub fn sub_frame_delta(
    p: f64,
    bottom_mean: f64,
    bottom_std: f64,
    top_mean: f64,
    top_std: f64,
) -> Option<f64> {
    let bottom_threshold = bottom_mean + bottom_std;
    let top_threshold = top_mean - top_std;

    if bottom_threshold < p && p < top_threshold {
        Some((top_mean - p) / (top_mean - bottom_mean))
    } else {
        None
    }
}

/// Map a wing-relative transition back to the light curve and refine it.
///
/// `starting_offset` is the light-curve frame of the wing's first sample.
pub fn interpolate_edge(
    samples: &[f64],
    estimate: &TransitionEstimate,
    starting_offset: usize,
) -> Result<SubFrameEstimate, FlashTimingError> {
    let frame_index = estimate.transition_index + starting_offset;
    let point_intensity =
        samples
            .get(frame_index)
            .copied()
            .ok_or(FlashTimingError::FrameOutOfRange {
                index: frame_index,
                len: samples.len(),
            })?;

    let window_delta = sub_frame_delta(
        point_intensity,
        estimate.bottom_mean,
        estimate.bottom_std,
        estimate.top_mean,
        estimate.top_std,
    );
    let in_window = window_delta.is_some();
    let delta = window_delta.unwrap_or(0.0);

    if !in_window {
        log::warn!(
            "Transition point {point_intensity:.3} at frame {frame_index} is outside \
             ({:.3}, {:.3}); using the integer frame",
            estimate.bottom_mean + estimate.bottom_std,
            estimate.top_mean - estimate.top_std
        );
    }

    let edge_at = frame_index as f64 + delta;
    log::debug!("sub-frame delta {delta:.4}, edge at {edge_at:.4}");

    Ok(SubFrameEstimate {
        frame_index,
        point_intensity,
        delta,
        in_window,
        edge_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn estimate(transition_index: usize) -> TransitionEstimate {
        TransitionEstimate {
            bottom_mean: 100.0,
            bottom_std: 2.0,
            top_mean: 500.0,
            top_std: 3.0,
            transition_index,
            candidate_a: transition_index,
            candidate_b: transition_index + 1,
            max_delta: 400.0,
        }
    }

    #[test]
    fn test_delta_inside_window() {
        assert_relative_eq!(
            sub_frame_delta(380.0, 100.0, 2.0, 500.0, 3.0).unwrap(),
            0.3,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_window_is_strict() {
        assert!(sub_frame_delta(102.0, 100.0, 2.0, 500.0, 3.0).is_none());
        assert!(sub_frame_delta(497.0, 100.0, 2.0, 500.0, 3.0).is_none());
        assert!(sub_frame_delta(500.0, 100.0, 0.0, 500.0, 0.0).is_none());
        assert!(sub_frame_delta(100.0, 100.0, 0.0, 500.0, 0.0).is_none());
    }

    #[test]
    fn test_right_wing_offset_applied() {
        let mut samples = vec![100.0; 90];
        samples[80] = 200.0;
        let sub = interpolate_edge(&samples, &estimate(11), 69).unwrap();

        assert_eq!(sub.frame_index, 80);
        assert_eq!(sub.point_intensity, 200.0);
        assert!(sub.in_window);
        assert_relative_eq!(sub.delta, 0.75, epsilon = 1e-12);
        assert_relative_eq!(sub.edge_at, 80.75, epsilon = 1e-12);
    }

    #[test]
    fn test_outside_window_collapses_to_frame() {
        let samples = vec![500.0; 30];
        let sub = interpolate_edge(&samples, &estimate(20), 0).unwrap();
        assert!(!sub.in_window);
        assert_eq!(sub.delta, 0.0);
        assert_eq!(sub.edge_at, 20.0);
    }

    #[test]
    fn test_offset_past_end() {
        let samples = vec![100.0; 10];
        assert_eq!(
            interpolate_edge(&samples, &estimate(5), 10),
            Err(FlashTimingError::FrameOutOfRange { index: 15, len: 10 })
        );
    }
}
