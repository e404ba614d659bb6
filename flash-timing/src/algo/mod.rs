//! Edge location and timing uncertainty algorithms.
//!
//! The pipeline runs leaves first:
//!
//! - [`baseline`]: mean of the leading baseline window
//! - [`flash`]: threshold crossing, max flash level and mid level
//! - [`wing`]: bottom/top state machines that cut out each goalpost's wing
//! - [`transition`]: segment statistics and the integer transition index
//! - [`interpolate`]: sub-frame fraction inside the transition frame
//! - [`time_map`]: fractional frame to absolute timestamp
//! - [`snr`]: photometric SNRs and the combined timing sigma
//!
//! Every function here is pure over its arguments; orchestration lives in
//! [`crate::analysis`].

pub mod baseline;
pub mod flash;
pub mod interpolate;
pub mod snr;
pub mod time_map;
pub mod transition;
pub mod wing;

pub use baseline::baseline_mean;
pub use flash::{detect_flash, mid_flash_level, FlashDetection};
pub use interpolate::{interpolate_edge, sub_frame_delta, SubFrameEstimate};
pub use snr::{estimate_uncertainty, EdgeUncertainty, SnrInputs};
pub use time_map::edge_time;
pub use transition::{estimate_transition, TransitionEstimate};
pub use wing::{extract_left_wing, extract_right_wing, Wing};
