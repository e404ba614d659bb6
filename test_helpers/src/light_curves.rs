//! Synthetic light curves and frame time bases.
//!
//! A flash is modelled as a box in continuous time. Each frame integrates
//! the box over its own exposure `[i, i + 1)`, so an onset at `20.3` leaves
//! frame 20 at 70% of the way from base to flash level. That is exactly the
//! shape the sub-frame interpolator is meant to recover.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Normal};
use shared::Timestamp;

/// Constant `base` up to frame `step_at`, constant `top` from then on.
pub fn step_curve(len: usize, step_at: usize, base: f64, top: f64) -> Vec<f64> {
    (0..len)
        .map(|i| if i < step_at { base } else { top })
        .collect()
}

/// Light curve with one or more flashes.
///
/// Each `(onset, end)` pair is a flash lit over the continuous interval
/// `[onset, end)` in frame units. Frames partially covered by a flash get a
/// proportional share of `flash - base`.
pub fn pulse_curve(len: usize, flashes: &[(f64, f64)], base: f64, flash: f64) -> Vec<f64> {
    (0..len)
        .map(|i| {
            let frame_start = i as f64;
            let frame_end = frame_start + 1.0;
            let lit: f64 = flashes
                .iter()
                .map(|&(onset, end)| (frame_end.min(end) - frame_start.max(onset)).max(0.0))
                .sum();
            base + lit.min(1.0) * (flash - base)
        })
        .collect()
}

/// Add seeded zero-mean Gaussian noise, clamping at zero.
pub fn with_gaussian_noise(curve: &[f64], sigma: f64, seed: u64) -> Vec<f64> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let normal = Normal::new(0.0, sigma).expect("noise sigma must be finite and non-negative");
    curve
        .iter()
        .map(|&v| (v + normal.sample(&mut rng)).max(0.0))
        .collect()
}

/// Evenly spaced frame start times beginning at `t0`.
pub fn uniform_start_times(len: usize, t0: Timestamp, frame_seconds: f64) -> Vec<Timestamp> {
    (0..len)
        .map(|i| {
            t0.offset_by_seconds(i as f64 * frame_seconds)
                .expect("frame offset must be representable")
        })
        .collect()
}

/// Same exposure for every frame.
pub fn uniform_exposures(len: usize, frame_seconds: f64) -> Vec<f64> {
    vec![frame_seconds; len]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_frame_share() {
        let curve = pulse_curve(30, &[(20.25, 25.0)], 100.0, 500.0);
        assert_eq!(curve[19], 100.0);
        assert!((curve[20] - 400.0).abs() < 1e-9);
        assert_eq!(curve[21], 500.0);
        assert_eq!(curve[25], 100.0);
    }

    #[test]
    fn test_noise_is_reproducible() {
        let clean = step_curve(50, 10, 100.0, 400.0);
        let a = with_gaussian_noise(&clean, 5.0, 7);
        let b = with_gaussian_noise(&clean, 5.0, 7);
        assert_eq!(a, b);
        assert_ne!(a, clean);
    }

    #[test]
    fn test_uniform_start_times() {
        let times = uniform_start_times(3, Timestamp::new(10, 0), 0.04);
        assert_eq!(times[2], Timestamp::new(10, 80_000_000));
    }
}
