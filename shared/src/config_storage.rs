//! Configuration storage for named analysis profiles.
//!
//! Provides centralized storage for per-camera analysis settings.
//! All config is stored in ~/.flash_timing/ by default.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Configuration storage manager.
///
/// Profiles are JSON documents named by the user (typically after the
/// camera/recorder combination they were tuned for) and kept under
/// `<root>/profiles/<name>.json`.
#[derive(Debug, Clone)]
pub struct ConfigStorage {
    /// Root directory for all configuration (e.g., ~/.flash_timing)
    root_path: PathBuf,
}

impl ConfigStorage {
    /// Create a new config storage with default path (~/.flash_timing)
    pub fn new() -> std::io::Result<Self> {
        let home = std::env::var("HOME")
            .map_err(|_| std::io::Error::new(std::io::ErrorKind::NotFound, "HOME not set"))?;
        let root_path = PathBuf::from(home).join(".flash_timing");
        Ok(Self { root_path })
    }

    /// Create a new config storage with custom root path
    pub fn with_path(root_path: PathBuf) -> Self {
        Self { root_path }
    }

    /// Get the root configuration path
    pub fn root_path(&self) -> &Path {
        &self.root_path
    }

    fn profiles_dir(&self) -> PathBuf {
        self.root_path.join("profiles")
    }

    fn profile_filename(&self, name: &str) -> std::io::Result<PathBuf> {
        if name.is_empty() || name.contains(['/', '\\']) || name.starts_with('.') {
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("Invalid profile name: {name:?}"),
            ));
        }
        let name_safe = name.replace(' ', "_");
        Ok(self.profiles_dir().join(format!("{name_safe}.json")))
    }

    /// Load a named profile.
    ///
    /// Returns None if no profile exists under this name.
    /// Returns Some(Err) if the file exists but cannot be loaded.
    pub fn get_profile<T: DeserializeOwned>(&self, name: &str) -> Option<std::io::Result<T>> {
        let path = match self.profile_filename(name) {
            Ok(path) => path,
            Err(e) => return Some(Err(e)),
        };

        if !path.exists() {
            return None;
        }

        Some(load_json(&path))
    }

    /// Save a named profile, creating the profiles directory if needed.
    ///
    /// Returns the path where the profile was saved.
    pub fn save_profile<T: Serialize>(&self, name: &str, profile: &T) -> std::io::Result<PathBuf> {
        let path = self.profile_filename(name)?;
        std::fs::create_dir_all(self.profiles_dir())?;
        save_json(&path, profile)?;
        log::debug!("Saved profile {name:?} to {}", path.display());
        Ok(path)
    }

    /// List all stored profile names, sorted.
    pub fn list_profiles(&self) -> std::io::Result<Vec<String>> {
        let dir = self.profiles_dir();

        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut names = Vec::new();
        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();

            if path.extension().and_then(|s| s.to_str()) == Some("json") {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    names.push(stem.replace('_', " "));
                }
            }
        }

        names.sort();
        Ok(names)
    }

    /// Delete a named profile.
    ///
    /// Returns Ok(true) if the file was deleted, Ok(false) if it didn't exist.
    pub fn delete_profile(&self, name: &str) -> std::io::Result<bool> {
        let path = self.profile_filename(name)?;

        if !path.exists() {
            return Ok(false);
        }

        std::fs::remove_file(path)?;
        Ok(true)
    }
}

/// Save any serializable value as pretty JSON
pub fn save_json<T: Serialize>(path: &Path, value: &T) -> std::io::Result<()> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
    std::fs::write(path, json)
}

/// Load any deserializable value from a JSON file
pub fn load_json<T: DeserializeOwned>(path: &Path) -> std::io::Result<T> {
    let json = std::fs::read_to_string(path)?;
    serde_json::from_str(&json).map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
}
