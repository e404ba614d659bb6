use clap::Args;

use crate::config::AnalysisConfig;

/// Parse flash ranges in format "onset:end[,onset:end...]", in frames
pub fn parse_flash_ranges(s: &str) -> Result<Vec<(f64, f64)>, String> {
    s.split(',')
        .map(|range| {
            let (onset, end) = range
                .trim()
                .split_once(':')
                .ok_or_else(|| format!("Flash range '{range}' must be in format 'onset:end'"))?;
            let onset: f64 = onset
                .trim()
                .parse()
                .map_err(|_| format!("Invalid flash onset: {onset}"))?;
            let end: f64 = end
                .trim()
                .parse()
                .map_err(|_| format!("Invalid flash end: {end}"))?;
            if !(onset >= 0.0 && end > onset) {
                return Err(format!("Flash range {onset}:{end} must satisfy 0 <= onset < end"));
            }
            Ok((onset, end))
        })
        .collect()
}

/// Flash ranges parsed from the command line
#[derive(Debug, Clone, PartialEq)]
pub struct FlashRanges(pub Vec<(f64, f64)>);

impl std::str::FromStr for FlashRanges {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_flash_ranges(s).map(FlashRanges)
    }
}

/// Analysis parameter overrides shared by the subcommands that run an analysis
///
/// Unset options leave the profile (or default) value untouched.
#[derive(Args, Debug, Clone, Default)]
pub struct AnalysisArgs {
    /// Leading frames averaged into the baseline
    #[arg(long)]
    pub base_zone: Option<usize>,

    /// Flash threshold as a multiple of the baseline
    #[arg(long)]
    pub threshold_factor: Option<f64>,

    /// Average per-pixel top level above which an edge counts as saturated
    #[arg(long)]
    pub max_flash_level: Option<f64>,

    /// Pixels summed into each light-curve sample
    #[arg(long)]
    pub num_pixels: Option<usize>,

    /// Baseline frames kept ahead of the last flash in the right wing
    #[arg(long)]
    pub right_wing_margin: Option<usize>,

    /// Compute the goalposts one after the other instead of on the rayon pool
    #[arg(long, default_value_t = false)]
    pub sequential: bool,
}

impl AnalysisArgs {
    /// Layer the overrides onto `config`
    pub fn apply(&self, mut config: AnalysisConfig) -> AnalysisConfig {
        if let Some(base_zone) = self.base_zone {
            config.base_zone = base_zone;
        }
        if let Some(factor) = self.threshold_factor {
            config.flash_threshold_factor = factor;
        }
        if let Some(level) = self.max_flash_level {
            config.max_allowed_flash_level = level;
        }
        if let Some(num_pixels) = self.num_pixels {
            config.num_pixels = num_pixels;
        }
        if let Some(margin) = self.right_wing_margin {
            config.right_wing_margin = margin;
        }
        if self.sequential {
            config.parallel_goalposts = false;
        }
        config
    }
}
