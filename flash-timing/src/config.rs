//! Analysis parameters.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::FlashTimingError;

/// Number of leading frames averaged into the baseline.
pub const DEFAULT_BASE_ZONE: usize = 8;

/// A frame brighter than this multiple of baseline triggers flash detection.
pub const DEFAULT_FLASH_THRESHOLD_FACTOR: f64 = 1.1;

/// Ceiling on the average per-pixel top level before an edge is treated as
/// saturated. Sized for 8-bit video.
pub const DEFAULT_MAX_ALLOWED_FLASH_LEVEL: f64 = 225.0;

/// Timing sigma, in frames, reported for saturated edges.
pub const SATURATED_EDGE_SIGMA: f64 = 0.5;

/// Tunable parameters of the edge timing pipeline.
///
/// Serialized as JSON for named profiles; every field has a default so a
/// partial profile still loads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Leading frames averaged into the baseline
    pub base_zone: usize,
    /// Multiplicative threshold over baseline for flash detection
    pub flash_threshold_factor: f64,
    /// Frames past the trigger frame sampled for the max flash level
    pub flash_lookahead: usize,
    /// Average per-pixel top level above which an edge counts as saturated
    pub max_allowed_flash_level: f64,
    /// Pixels summed into each light-curve sample
    pub num_pixels: usize,
    /// Shortest wing the transition estimator accepts
    pub min_wing_len: usize,
    /// Baseline frames the right wing extends before the last flash
    pub right_wing_margin: usize,
    /// Timing sigma, in frames, forced onto saturated edges
    pub saturated_edge_sigma: f64,
    /// Compute the two goalposts on the rayon pool
    pub parallel_goalposts: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            base_zone: DEFAULT_BASE_ZONE,
            flash_threshold_factor: DEFAULT_FLASH_THRESHOLD_FACTOR,
            flash_lookahead: 2,
            max_allowed_flash_level: DEFAULT_MAX_ALLOWED_FLASH_LEVEL,
            num_pixels: 1,
            min_wing_len: 8,
            right_wing_margin: 10,
            saturated_edge_sigma: SATURATED_EDGE_SIGMA,
            parallel_goalposts: true,
        }
    }
}

impl AnalysisConfig {
    /// Check that every parameter is usable.
    pub fn validate(&self) -> Result<(), FlashTimingError> {
        let invalid = |msg: String| Err(FlashTimingError::InvalidConfig(msg));

        if self.base_zone == 0 {
            return invalid("base_zone must be at least 1".to_string());
        }
        if !(self.flash_threshold_factor.is_finite() && self.flash_threshold_factor > 0.0) {
            return invalid(format!(
                "flash_threshold_factor must be positive, got {}",
                self.flash_threshold_factor
            ));
        }
        if !(self.max_allowed_flash_level.is_finite() && self.max_allowed_flash_level > 0.0) {
            return invalid(format!(
                "max_allowed_flash_level must be positive, got {}",
                self.max_allowed_flash_level
            ));
        }
        if self.num_pixels == 0 {
            return invalid("num_pixels must be at least 1".to_string());
        }
        if !(self.saturated_edge_sigma.is_finite() && self.saturated_edge_sigma >= 0.0) {
            return invalid(format!(
                "saturated_edge_sigma must be non-negative, got {}",
                self.saturated_edge_sigma
            ));
        }
        Ok(())
    }

    /// Save to JSON file
    pub fn save_to_file(&self, path: &Path) -> std::io::Result<()> {
        shared::config_storage::save_json(path, self)
    }

    /// Load from JSON file
    pub fn load_from_file(path: &Path) -> std::io::Result<Self> {
        shared::config_storage::load_json(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_is_valid() {
        let config = AnalysisConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.base_zone, 8);
        assert_eq!(config.flash_threshold_factor, 1.1);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let bad = [
            AnalysisConfig {
                base_zone: 0,
                ..Default::default()
            },
            AnalysisConfig {
                flash_threshold_factor: f64::NAN,
                ..Default::default()
            },
            AnalysisConfig {
                num_pixels: 0,
                ..Default::default()
            },
        ];
        for config in bad {
            assert!(matches!(
                config.validate(),
                Err(FlashTimingError::InvalidConfig(_))
            ));
        }
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config: AnalysisConfig =
            serde_json::from_str(r#"{ "num_pixels": 49, "max_allowed_flash_level": 4000.0 }"#)
                .unwrap();
        assert_eq!(config.num_pixels, 49);
        assert_eq!(config.max_allowed_flash_level, 4000.0);
        assert_eq!(config.right_wing_margin, 10);
    }

    #[test]
    fn test_file_roundtrip() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("analysis.json");
        let config = AnalysisConfig {
            flash_threshold_factor: 1.3,
            parallel_goalposts: false,
            ..Default::default()
        };
        config.save_to_file(&path).unwrap();
        assert_eq!(AnalysisConfig::load_from_file(&path).unwrap(), config);
    }
}
