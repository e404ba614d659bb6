//! Shared components for the flash timing workspace.
//!
//! Value types that cross crate boundaries live here so that the analysis
//! core, the command line tools and the test helpers agree on a single
//! definition of a frame timestamp or a statistics pass.

pub mod config_storage;
pub mod stats_scan;
pub mod timestamp;

pub use config_storage::ConfigStorage;
pub use stats_scan::{StatsError, StatsScan};
pub use timestamp::Timestamp;
