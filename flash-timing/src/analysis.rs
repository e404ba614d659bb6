//! Flash analysis: both goalposts from one light curve.
//!
//! The baseline, flash detection and mid level are computed once. The left
//! and right goalposts then run the wing → transition → sub-frame → time →
//! uncertainty chain independently of each other, optionally as a
//! `rayon::join`.

use serde::{Deserialize, Serialize};
use shared::Timestamp;
use std::fmt;

use crate::algo::{
    baseline_mean, detect_flash, edge_time, estimate_transition, estimate_uncertainty,
    extract_left_wing, extract_right_wing, interpolate_edge, FlashDetection, SnrInputs,
};
use crate::config::AnalysisConfig;
use crate::error::FlashTimingError;
use crate::light_curve::{FrameTimeBase, LightCurve};

/// One of the two transition events bounding the analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Goalpost {
    /// Onset of the first flash, found scanning forward
    Left,
    /// Onset of the last flash, found scanning backward
    Right,
}

impl fmt::Display for Goalpost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            Goalpost::Left => "left",
            Goalpost::Right => "right",
        })
    }
}

/// Edge position, timing and uncertainty for one goalpost.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeStats {
    pub goalpost: Goalpost,
    pub bottom_mean: f64,
    pub bottom_std: f64,
    pub top_mean: f64,
    pub top_std: f64,
    /// Fractional light-curve frame of the edge
    pub edge_at: f64,
    /// Timing uncertainty in frames
    pub edge_sigma: f64,
    pub p_snr: f64,
    pub b_snr: f64,
    pub a_snr: f64,
    /// Reserved; not populated by the current pipeline.
    pub intermediate_point_intensity: Option<f64>,
    /// Light-curve frame holding the edge
    pub transition_index: usize,
    pub sub_frame_delta: f64,
    /// Intensity of the transition frame
    pub point_intensity: f64,
    pub sigma_frame: f64,
    pub sigma_frame_from_ratio: f64,
    /// Absolute instant of the edge
    pub time_at_edge: Timestamp,
    /// `edge_sigma` scaled by the transition frame's exposure
    pub edge_sigma_seconds: f64,
    /// Light-curve frame of the first wing sample
    pub wing_start: usize,
    pub wing_len: usize,
    pub saturated: bool,
}

/// Separation between the two goalposts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GoalpostSpan {
    pub frames: f64,
    pub seconds: f64,
    /// Quadrature sum of both edge sigmas, in frames
    pub sigma_frames: f64,
    /// Quadrature sum of both edge sigmas, in seconds
    pub sigma_seconds: f64,
}

/// Outcome of a full analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlashAnalysisResult {
    /// False when no flash was detected
    pub success: bool,
    pub left: Option<EdgeStats>,
    pub right: Option<EdgeStats>,
    /// False when either edge was too bright for a photometric sigma
    pub flash_intensity_valid: bool,
    pub baseline: f64,
    /// Present whenever a flash was detected
    pub detection: Option<FlashDetection>,
}

impl FlashAnalysisResult {
    fn no_flash(baseline: f64) -> Self {
        Self {
            success: false,
            left: None,
            right: None,
            flash_intensity_valid: true,
            baseline,
            detection: None,
        }
    }

    /// Edge statistics of one goalpost
    pub fn edge(&self, goalpost: Goalpost) -> Option<&EdgeStats> {
        match goalpost {
            Goalpost::Left => self.left.as_ref(),
            Goalpost::Right => self.right.as_ref(),
        }
    }

    /// Right edge minus left edge, or `None` without both edges.
    pub fn span(&self) -> Option<GoalpostSpan> {
        let (left, right) = (self.left.as_ref()?, self.right.as_ref()?);
        Some(GoalpostSpan {
            frames: right.edge_at - left.edge_at,
            seconds: right.time_at_edge.seconds_since(&left.time_at_edge),
            sigma_frames: left.edge_sigma.hypot(right.edge_sigma),
            sigma_seconds: left.edge_sigma_seconds.hypot(right.edge_sigma_seconds),
        })
    }
}

/// Run the edge chain for one goalpost.
pub fn analyze_goalpost(
    goalpost: Goalpost,
    light_curve: &LightCurve,
    time_base: &FrameTimeBase,
    mid_flash_level: f64,
    config: &AnalysisConfig,
) -> Result<EdgeStats, FlashTimingError> {
    let samples = light_curve.samples();
    let wing = match goalpost {
        Goalpost::Left => extract_left_wing(samples, mid_flash_level)?,
        Goalpost::Right => extract_right_wing(samples, mid_flash_level, config.right_wing_margin)?,
    };

    let transition = estimate_transition(wing.samples, config.min_wing_len)?;
    let sub_frame = interpolate_edge(samples, &transition, wing.start)?;
    let time_at_edge = edge_time(time_base, sub_frame.frame_index, sub_frame.delta)?;
    let (_, exposure) = time_base.frame(sub_frame.frame_index)?;

    let uncertainty = estimate_uncertainty(
        &SnrInputs {
            point_intensity: sub_frame.point_intensity,
            delta: sub_frame.delta,
            bottom_mean: transition.bottom_mean,
            bottom_std: transition.bottom_std,
            top_mean: transition.top_mean,
            top_std: transition.top_std,
        },
        config.num_pixels,
        config.max_allowed_flash_level,
        config.saturated_edge_sigma,
    );

    let stats = EdgeStats {
        goalpost,
        bottom_mean: transition.bottom_mean,
        bottom_std: transition.bottom_std,
        top_mean: transition.top_mean,
        top_std: transition.top_std,
        edge_at: sub_frame.edge_at,
        edge_sigma: uncertainty.edge_sigma,
        p_snr: uncertainty.p_snr,
        b_snr: uncertainty.b_snr,
        a_snr: uncertainty.a_snr,
        intermediate_point_intensity: None,
        transition_index: sub_frame.frame_index,
        sub_frame_delta: sub_frame.delta,
        point_intensity: sub_frame.point_intensity,
        sigma_frame: uncertainty.sigma_frame,
        sigma_frame_from_ratio: uncertainty.sigma_frame_from_ratio,
        time_at_edge,
        edge_sigma_seconds: uncertainty.edge_sigma * exposure,
        wing_start: wing.start,
        wing_len: wing.len(),
        saturated: uncertainty.saturated,
    };

    log::info!(
        "{goalpost} edge at frame {:.4} ± {:.4} ({} ± {:.6} s)",
        stats.edge_at,
        stats.edge_sigma,
        stats.time_at_edge,
        stats.edge_sigma_seconds
    );

    Ok(stats)
}

/// Locate both goalposts of a recording.
///
/// A light curve in which no frame crosses the flash threshold yields
/// `Ok` with `success == false`. Contract violations (too short for the
/// baseline, misaligned time base, wings that cannot be cut or are too
/// short) are returned as errors.
pub fn analyze_flash(
    light_curve: &LightCurve,
    time_base: &FrameTimeBase,
    config: &AnalysisConfig,
) -> Result<FlashAnalysisResult, FlashTimingError> {
    config.validate()?;
    time_base.check_aligned(light_curve)?;

    let samples = light_curve.samples();
    let baseline = baseline_mean(samples, config.base_zone)?;
    log::debug!(
        "Baseline {baseline:.3} from the first {} frames",
        config.base_zone
    );

    let detection = match detect_flash(
        samples,
        baseline,
        config.flash_threshold_factor,
        config.base_zone,
        config.flash_lookahead,
    ) {
        Ok(detection) => detection,
        Err(FlashTimingError::NoFlashDetected { threshold }) => {
            log::warn!("No flash found: no frame exceeds {threshold:.3}");
            return Ok(FlashAnalysisResult::no_flash(baseline));
        }
        Err(e) => return Err(e),
    };

    let mid = detection.mid_flash_level;
    let run = |goalpost| analyze_goalpost(goalpost, light_curve, time_base, mid, config);
    let (left, right) = if config.parallel_goalposts {
        rayon::join(|| run(Goalpost::Left), || run(Goalpost::Right))
    } else {
        (run(Goalpost::Left), run(Goalpost::Right))
    };
    let (left, right) = (left?, right?);

    let flash_intensity_valid = !(left.saturated || right.saturated);

    Ok(FlashAnalysisResult {
        success: true,
        left: Some(left),
        right: Some(right),
        flash_intensity_valid,
        baseline,
        detection: Some(detection),
    })
}
