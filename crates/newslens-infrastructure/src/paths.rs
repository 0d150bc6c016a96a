//! Unified path management for newslens local files.
//!
//! The only persisted client state in the current design is the bearer
//! token; earlier iterations also cached saved terms locally, which the
//! server-backed flow superseded.

use std::path::PathBuf;

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Config directory could not be determined.
    ConfigDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::ConfigDirNotFound => write!(f, "Cannot find config directory"),
        }
    }
}

impl std::error::Error for PathError {}

/// Path resolution for newslens.
///
/// # Directory Structure
///
/// ```text
/// ~/.config/newslens/          # Config directory
/// └── token.json               # Persisted bearer token
/// ```
pub struct NewslensPaths;

impl NewslensPaths {
    /// Returns the newslens configuration directory.
    pub fn config_dir() -> Result<PathBuf, PathError> {
        dirs::config_dir()
            .map(|dir| dir.join("newslens"))
            .ok_or(PathError::ConfigDirNotFound)
    }

    /// Returns the path to the persisted token file.
    pub fn token_file() -> Result<PathBuf, PathError> {
        Self::config_dir().map(|dir| dir.join("token.json"))
    }
}
