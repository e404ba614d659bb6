//! Wing extraction.
//!
//! A wing is the contiguous run of samples that straddles one goalpost,
//! from baseline through plateau. Both extractors are small state machines
//! driven by whether each sample sits at or above the mid flash level.

use crate::analysis::Goalpost;
use crate::error::FlashTimingError;

/// Samples around one goalpost plus their position in the light curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Wing<'a> {
    /// Light-curve frame of `samples[0]`
    pub start: usize,
    pub samples: &'a [f64],
}

impl Wing<'_> {
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Light-curve frame one past the last sample
    pub fn end(&self) -> usize {
        self.start + self.samples.len()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LeftWingState {
    AccumulateBottom,
    AccumulateTop,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RightWingState {
    TraverseRightBottom,
    TraverseTop,
    TraverseLeftBottom,
}

/// Forward scan from frame 0 through the baseline and the first plateau.
///
/// Stops, without taking it, at the first sample that falls back below
/// `mid_level` after the plateau began, or at the end of the curve.
pub fn extract_left_wing(samples: &[f64], mid_level: f64) -> Result<Wing<'_>, FlashTimingError> {
    let mut state = LeftWingState::AccumulateBottom;
    let mut end = samples.len();

    for (i, &value) in samples.iter().enumerate() {
        let above = value >= mid_level;
        state = match (state, above) {
            (LeftWingState::AccumulateBottom, false) => LeftWingState::AccumulateBottom,
            (LeftWingState::AccumulateBottom, true) => {
                log::trace!("left wing: plateau begins at frame {i} ({value:.3})");
                LeftWingState::AccumulateTop
            }
            (LeftWingState::AccumulateTop, true) => LeftWingState::AccumulateTop,
            (LeftWingState::AccumulateTop, false) => {
                log::trace!("left wing: plateau ends before frame {i} ({value:.3})");
                end = i;
                break;
            }
        };
    }

    if state == LeftWingState::AccumulateBottom {
        return Err(FlashTimingError::NoFlashPlateau {
            goalpost: Goalpost::Left,
            mid_level,
        });
    }

    log::debug!("left wing: frames 0..{end}");
    Ok(Wing {
        start: 0,
        samples: &samples[..end],
    })
}

/// Backward scan from the last frame.
///
/// Crosses the trailing baseline, then the last plateau in the recording,
/// then steps `margin` frames into the baseline that precedes it. The wing
/// runs from that point to the final plateau frame inclusive, so it holds
/// the onset of the last flash.
///
/// Running out of frames in any state is an error rather than an
/// out-of-bounds read.
pub fn extract_right_wing(
    samples: &[f64],
    mid_level: f64,
    margin: usize,
) -> Result<Wing<'_>, FlashTimingError> {
    let mut state = RightWingState::TraverseRightBottom;
    let mut index = samples.len();
    let mut last_flash_top_end = 0;

    loop {
        state = match state {
            RightWingState::TraverseRightBottom => {
                index = index.checked_sub(1).ok_or(FlashTimingError::NoFlashPlateau {
                    goalpost: Goalpost::Right,
                    mid_level,
                })?;
                if samples[index] >= mid_level {
                    last_flash_top_end = index;
                    log::trace!("right wing: last plateau ends at frame {index}");
                    RightWingState::TraverseTop
                } else {
                    RightWingState::TraverseRightBottom
                }
            }
            RightWingState::TraverseTop => {
                index = index
                    .checked_sub(1)
                    .ok_or(FlashTimingError::PlateauAtStart)?;
                if samples[index] >= mid_level {
                    RightWingState::TraverseTop
                } else {
                    log::trace!("right wing: baseline resumes at frame {index}");
                    RightWingState::TraverseLeftBottom
                }
            }
            RightWingState::TraverseLeftBottom => {
                let last_flash_bottom_start = index.checked_sub(margin).ok_or(
                    FlashTimingError::RightWingMarginUnavailable {
                        margin,
                        bottom_end: index,
                        available: index,
                    },
                )?;
                log::debug!("right wing: frames {last_flash_bottom_start}..={last_flash_top_end}");
                return Ok(Wing {
                    start: last_flash_bottom_start,
                    samples: &samples[last_flash_bottom_start..=last_flash_top_end],
                });
            }
        };
    }
}
