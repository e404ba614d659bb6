//! Photometric SNR and timing uncertainty of an edge.
//!
//! Two independent timing sigmas are formed and combined in quadrature:
//!
//! - from the relative noise of the two asymptotes, scaled by the sub-frame
//!   fraction: `delta * sqrt(1/bSNR² + 1/aSNR²)`
//! - from the absolute noise at the interpolated point over the signal
//!   swing: `sigmaP / (topMean - bottomMean)`
//!
//! A noise-free level has infinite SNR, including a dark level at zero, so
//! its `1/SNR²` term vanishes.

use serde::{Deserialize, Serialize};

/// Everything the uncertainty estimate needs about one edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnrInputs {
    /// Intensity of the transition frame
    pub point_intensity: f64,
    /// Sub-frame fraction, `0` when the point fell outside the window
    pub delta: f64,
    pub bottom_mean: f64,
    pub bottom_std: f64,
    pub top_mean: f64,
    pub top_std: f64,
}

/// SNRs and timing sigmas of one edge. Sigmas are in frames.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EdgeUncertainty {
    /// Intensity noise at the interpolated point
    pub sigma_p: f64,
    /// Point SNR, `p / sigmaP`
    pub p_snr: f64,
    /// Top asymptote SNR, `topMean / topStd`
    pub b_snr: f64,
    /// Bottom asymptote SNR, `bottomMean / bottomStd`
    pub a_snr: f64,
    pub sigma_frame_from_ratio: f64,
    pub sigma_frame: f64,
    /// Quadrature sum of the two sigmas
    pub edge_sigma: f64,
    /// Average top level per pixel exceeded the allowed flash level
    pub saturated: bool,
}

/// `signal / noise`, infinite when the noise is zero.
fn snr(signal: f64, noise: f64) -> f64 {
    if noise == 0.0 {
        f64::INFINITY
    } else {
        signal / noise
    }
}

/// Propagate segment noise into a timing sigma.
///
/// When `top_mean / num_pixels` exceeds `max_allowed_flash_level` the flash
/// is treated as saturated and all three sigmas are forced to
/// `saturated_sigma`.
pub fn estimate_uncertainty(
    inputs: &SnrInputs,
    num_pixels: usize,
    max_allowed_flash_level: f64,
    saturated_sigma: f64,
) -> EdgeUncertainty {
    let SnrInputs {
        point_intensity,
        delta,
        bottom_mean,
        bottom_std,
        top_mean,
        top_std,
    } = *inputs;

    let sigma_p = bottom_std + (top_std - bottom_std) * (1.0 - delta);
    let p_snr = snr(point_intensity, sigma_p);
    let b_snr = snr(top_mean, top_std);
    let a_snr = snr(bottom_mean, bottom_std);

    let mut sigma_frame_from_ratio = delta * (1.0 / (b_snr * b_snr) + 1.0 / (a_snr * a_snr)).sqrt();
    let mut sigma_frame = sigma_p / (top_mean - bottom_mean);
    let mut edge_sigma = sigma_frame_from_ratio.hypot(sigma_frame);

    let average_pixel_value_in_top = top_mean / num_pixels as f64;
    let saturated = average_pixel_value_in_top > max_allowed_flash_level;
    if saturated {
        log::warn!(
            "Average top level {average_pixel_value_in_top:.2} per pixel exceeds \
             {max_allowed_flash_level:.2}; reporting sigma {saturated_sigma} frames"
        );
        edge_sigma = saturated_sigma;
        sigma_frame = saturated_sigma;
        sigma_frame_from_ratio = saturated_sigma;
    }

    log::debug!(
        "SNR p={p_snr:.2} b={b_snr:.2} a={a_snr:.2}; sigma ratio={sigma_frame_from_ratio:.4} \
         frame={sigma_frame:.4} edge={edge_sigma:.4}"
    );

    EdgeUncertainty {
        sigma_p,
        p_snr,
        b_snr,
        a_snr,
        sigma_frame_from_ratio,
        sigma_frame,
        edge_sigma,
        saturated,
    }
}
