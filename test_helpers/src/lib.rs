//! Testing infrastructure for flash timing validation.
//!
//! Provides workspace discovery, a shared output directory for test
//! artifacts (plots, JSON reports, CSV recordings), and seeded generators
//! for synthetic light curves and frame time bases so that every test
//! runs against reproducible input.
//!
//! # Usage
//! ```rust
//! use test_helpers::light_curves::{pulse_curve, with_gaussian_noise};
//!
//! // Flash from frame 20 up to (not including) frame 40
//! let clean = pulse_curve(100, &[(20.0, 40.0)], 100.0, 500.0);
//! let noisy = with_gaussian_noise(&clean, 3.0, 42);
//! assert_eq!(noisy.len(), 100);
//! ```

pub mod light_curves;

use once_cell::sync::Lazy;
use std::env;
use std::path::{Path, PathBuf};

/// Errors raised while setting up the test environment.
#[derive(thiserror::Error, Debug)]
pub enum TestHelperError {
    /// No Cargo.toml with a `[workspace]` section above the working directory.
    #[error("Failed to find project root: {0}")]
    ProjectRootNotFound(String),
}

/// Locate the workspace root by walking up from the current directory until
/// a Cargo.toml containing `[workspace]` is found.
pub fn find_project_root() -> Result<PathBuf, TestHelperError> {
    let mut current_dir = env::current_dir().map_err(|e| {
        TestHelperError::ProjectRootNotFound(format!("Failed to get current directory: {e}"))
    })?;

    loop {
        let cargo_toml = current_dir.join("Cargo.toml");
        if cargo_toml.exists() {
            let content = std::fs::read_to_string(&cargo_toml).map_err(|e| {
                TestHelperError::ProjectRootNotFound(format!("Failed to read Cargo.toml: {e}"))
            })?;

            if content.contains("[workspace]") {
                return Ok(current_dir);
            }
        }

        if !current_dir.pop() {
            break;
        }
    }

    Err(TestHelperError::ProjectRootNotFound(
        "Workspace root not found".to_string(),
    ))
}

static PROJECT_ROOT: Lazy<PathBuf> =
    Lazy::new(|| find_project_root().expect("Failed to find project root directory"));

/// Get `<project_root>/test_output/`, creating it if missing.
pub fn get_output_dir() -> PathBuf {
    let output_dir = PROJECT_ROOT.join("test_output");

    if !output_dir.exists() {
        std::fs::create_dir_all(&output_dir).expect("Failed to create output directory");
    }

    output_dir
}

/// Path of an artifact inside the test output directory.
pub fn output_path<P: AsRef<Path>>(path: P) -> PathBuf {
    get_output_dir().join(path)
}
