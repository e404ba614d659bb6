//! Flash detection and the bottom/top decision level.

use serde::{Deserialize, Serialize};

use crate::error::FlashTimingError;

/// Where the flash was first seen and the levels derived from it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FlashDetection {
    /// Mean of the baseline window
    pub baseline: f64,
    /// `flash_threshold_factor * baseline`
    pub threshold: f64,
    /// First frame brighter than `threshold`
    pub onset_frame: usize,
    /// Frame the max flash level was read from
    pub level_frame: usize,
    /// Representative plateau level
    pub max_flash_level: f64,
    /// Midpoint between baseline and max flash level
    pub mid_flash_level: f64,
}

/// Midpoint between the two asymptotes; discriminates bottom from top for
/// both goalposts.
pub fn mid_flash_level(max_flash_level: f64, baseline: f64) -> f64 {
    (max_flash_level + baseline) / 2.0
}

/// Find the first frame at or after `search_start` brighter than
/// `threshold_factor * baseline`.
///
/// The rising sample itself is usually still transitional, so the max flash
/// level is read `lookahead` frames further on, falling back towards the
/// trigger frame near the end of the curve.
pub fn detect_flash(
    samples: &[f64],
    baseline: f64,
    threshold_factor: f64,
    search_start: usize,
    lookahead: usize,
) -> Result<FlashDetection, FlashTimingError> {
    let threshold = threshold_factor * baseline;

    let onset_frame = samples
        .iter()
        .enumerate()
        .skip(search_start)
        .find(|&(_, &v)| v > threshold)
        .map(|(i, _)| i)
        .ok_or(FlashTimingError::NoFlashDetected { threshold })?;

    let level_frame = onset_frame.saturating_add(lookahead).min(samples.len() - 1);
    let max_flash_level = samples[level_frame];
    let mid = mid_flash_level(max_flash_level, baseline);

    log::debug!(
        "Flash onset at frame {onset_frame} (threshold {threshold:.3}), \
         max flash level {max_flash_level:.3} from frame {level_frame}, mid level {mid:.3}"
    );

    Ok(FlashDetection {
        baseline,
        threshold,
        onset_frame,
        level_frame,
        max_flash_level,
        mid_flash_level: mid,
    })
}
