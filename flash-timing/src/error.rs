//! Error taxonomy for flash edge analysis.

use shared::StatsError;
use thiserror::Error;

use crate::analysis::Goalpost;

/// Failures raised by the analysis pipeline.
///
/// `NoFlashDetected` is the only variant the top-level analysis absorbs
/// into an unsuccessful [`FlashAnalysisResult`](crate::FlashAnalysisResult);
/// every other variant is an input-contract violation and is returned as-is.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FlashTimingError {
    #[error("Light curve has {got} samples, baseline needs at least {needed}")]
    InsufficientBaseline { needed: usize, got: usize },

    #[error("No frame exceeds the flash threshold {threshold:.3}")]
    NoFlashDetected { threshold: f64 },

    #[error("{goalpost} wing never reaches the mid flash level {mid_level:.3}")]
    NoFlashPlateau { goalpost: Goalpost, mid_level: f64 },

    #[error("Last plateau starts at frame 0; no baseline precedes it for the right wing")]
    PlateauAtStart,

    #[error(
        "Right wing needs {margin} baseline frames before frame {bottom_end}, only {available} available"
    )]
    RightWingMarginUnavailable {
        margin: usize,
        bottom_end: usize,
        available: usize,
    },

    #[error("Wing has {len} samples, transition estimation needs at least {min}")]
    WingTooShort { len: usize, min: usize },

    #[error("{segment} segment of the wing is unusable: {source}")]
    EmptySegment {
        segment: &'static str,
        #[source]
        source: StatsError,
    },

    #[error("Sequence lengths differ: {what} has {got}, expected {expected}")]
    MismatchedLengths {
        what: &'static str,
        expected: usize,
        got: usize,
    },

    #[error("Intensity at frame {index} is {value}, must be finite and non-negative")]
    InvalidIntensity { index: usize, value: f64 },

    #[error("Exposure at frame {index} is {value} s, must be finite and non-negative")]
    InvalidExposure { index: usize, value: f64 },

    #[error("Frame index {index} outside light curve of length {len}")]
    FrameOutOfRange { index: usize, len: usize },

    #[error("Edge time at frame {index} overflows the timestamp range")]
    TimeOverflow { index: usize },

    #[error("Invalid analysis configuration: {0}")]
    InvalidConfig(String),
}
