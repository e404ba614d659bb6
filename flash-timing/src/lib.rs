//! Sub-frame flash edge timing for occultation video.
//!
//! Given a light curve sampled once per video frame and the exposure start
//! time and duration of every frame, locate the onset of the first flash
//! (left goalpost) and the onset of the last flash (right goalpost) to a
//! fraction of a frame, map each onset to an absolute timestamp, and attach
//! a propagated timing sigma.
//!
//! ```
//! use flash_timing::{analyze_flash, AnalysisConfig, FrameTimeBase, LightCurve};
//! use shared::Timestamp;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut samples = vec![100.0; 120];
//! samples[30..60].fill(500.0);
//! let light_curve = LightCurve::new(samples)?;
//!
//! let t0 = Timestamp::new(1_700_000_000, 0);
//! let starts = (0..120)
//!     .map(|i| t0.offset_by_seconds(i as f64 / 25.0).unwrap())
//!     .collect();
//! let time_base = FrameTimeBase::new(starts, vec![0.04; 120])?;
//!
//! let config = AnalysisConfig { num_pixels: 25, ..Default::default() };
//! let result = analyze_flash(&light_curve, &time_base, &config)?;
//! assert!(result.success);
//! assert_eq!(result.left.unwrap().edge_at, 30.0);
//! # Ok(())
//! # }
//! ```

pub mod algo;
pub mod analysis;
pub mod config;
pub mod error;
pub mod light_curve;
pub mod report;
pub mod shared_args;

pub use analysis::{
    analyze_flash, analyze_goalpost, EdgeStats, FlashAnalysisResult, Goalpost, GoalpostSpan,
};
pub use config::AnalysisConfig;
pub use error::FlashTimingError;
pub use light_curve::{FrameTimeBase, LightCurve, LightCurveIoError, Recording};
