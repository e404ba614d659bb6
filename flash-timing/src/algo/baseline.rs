//! Pre-flash baseline level.

use shared::StatsScan;

use crate::error::FlashTimingError;

/// Mean intensity of the first `base_zone` frames.
pub fn baseline_mean(samples: &[f64], base_zone: usize) -> Result<f64, FlashTimingError> {
    if base_zone == 0 || samples.len() < base_zone {
        return Err(FlashTimingError::InsufficientBaseline {
            needed: base_zone.max(1),
            got: samples.len(),
        });
    }

    let window = &samples[..base_zone];
    StatsScan::new(window)
        .mean()
        .map_err(|source| FlashTimingError::EmptySegment {
            segment: "baseline",
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_mean_of_leading_window_only() {
        let mut samples = vec![10.0, 12.0, 11.0, 9.0, 10.0, 8.0, 12.0, 8.0];
        samples.extend([500.0; 20]);
        assert_relative_eq!(baseline_mean(&samples, 8).unwrap(), 10.0, epsilon = 1e-12);
    }

    #[test]
    fn test_too_short() {
        let samples = [1.0; 7];
        assert_eq!(
            baseline_mean(&samples, 8),
            Err(FlashTimingError::InsufficientBaseline { needed: 8, got: 7 })
        );
    }

    #[test]
    fn test_exact_length_is_enough() {
        let samples = [4.0; 8];
        assert_eq!(baseline_mean(&samples, 8).unwrap(), 4.0);
    }
}
