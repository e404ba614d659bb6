//! Fractional frame to absolute time.

use shared::Timestamp;

use crate::error::FlashTimingError;
use crate::light_curve::FrameTimeBase;

/// Absolute instant of an edge `delta` of the way through `frame_index`.
///
/// The correction `delta * exposure` is applied to the frame's exposure
/// start time at nanosecond resolution.
pub fn edge_time(
    time_base: &FrameTimeBase,
    frame_index: usize,
    delta: f64,
) -> Result<Timestamp, FlashTimingError> {
    let (start, exposure) = time_base.frame(frame_index)?;
    let time_correction_seconds = delta * exposure;

    start
        .offset_by_seconds(time_correction_seconds)
        .ok_or(FlashTimingError::TimeOverflow { index: frame_index })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn time_base(len: usize) -> FrameTimeBase {
        let starts = (0..len)
            .map(|i| Timestamp::new(1_700_000_000, 0).offset_by_seconds(i as f64 * 0.1).unwrap())
            .collect();
        FrameTimeBase::new(starts, vec![0.1; len]).unwrap()
    }

    #[test]
    fn test_half_frame_of_100ms_exposure() {
        let tb = time_base(30);
        let t0 = tb.start_times()[20];
        let edge = edge_time(&tb, 20, 0.5).unwrap();

        assert_eq!(edge, t0.offset_by_seconds(0.05).unwrap());
        assert_eq!(edge.as_nanos() - t0.as_nanos(), 50_000_000);
    }

    #[test]
    fn test_zero_delta_is_frame_start() {
        let tb = time_base(30);
        assert_eq!(edge_time(&tb, 7, 0.0).unwrap(), tb.start_times()[7]);
    }

    #[test]
    fn test_frame_out_of_range() {
        let tb = time_base(5);
        assert_eq!(
            edge_time(&tb, 5, 0.1),
            Err(FlashTimingError::FrameOutOfRange { index: 5, len: 5 })
        );
    }
}
