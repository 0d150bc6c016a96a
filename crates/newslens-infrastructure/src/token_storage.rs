//! Token file storage.
//!
//! Persists the bearer token as a small JSON file under the platform config
//! directory, standing in for the browser-local storage of the original
//! client.

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use newslens_core::NewslensError;
use newslens_core::auth::CredentialStore;
use newslens_core::error::Result;

use crate::paths::NewslensPaths;

#[derive(Serialize, Deserialize)]
struct TokenFile {
    access_token: String,
}

/// File-backed [`CredentialStore`].
///
/// Responsibilities:
/// - Read the token file at session start
/// - Write it on login, remove it on logout
///
/// Does NOT:
/// - Validate the token against the backend
/// - Cache anything (the `CredentialHolder` owns the in-memory copy)
///
/// # Security Note
///
/// The token is stored as plaintext JSON; the file should carry restrictive
/// permissions. It is never logged.
pub struct FileTokenStorage {
    path: PathBuf,
}

impl FileTokenStorage {
    /// Creates a storage at the default path
    /// (`~/.config/newslens/token.json`).
    pub fn new() -> Result<Self> {
        let path = NewslensPaths::token_file()
            .map_err(|err| NewslensError::storage(err.to_string()))?;
        Ok(Self { path })
    }

    /// Creates a storage with a custom path (for testing).
    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    /// Returns the path to the token file.
    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

impl CredentialStore for FileTokenStorage {
    fn load(&self) -> Result<Option<String>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&self.path)?;
        let token: TokenFile = serde_json::from_str(&content)?;
        Ok(Some(token.access_token))
    }

    fn store(&self, token: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(&TokenFile {
            access_token: token.to_string(),
        })?;
        fs::write(&self.path, content)?;
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        if self.path.exists() {
            fs::remove_file(&self.path)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn load_without_file_is_logged_out() {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileTokenStorage::with_path(temp_dir.path().join("token.json"));

        assert_eq!(storage.load().unwrap(), None);
    }

    #[test]
    fn store_then_load_round_trips() {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileTokenStorage::with_path(temp_dir.path().join("token.json"));

        storage.store("tok-123").unwrap();
        assert_eq!(storage.load().unwrap(), Some("tok-123".to_string()));
    }

    #[test]
    fn store_creates_missing_parent_directories() {
        let temp_dir = TempDir::new().unwrap();
        let storage =
            FileTokenStorage::with_path(temp_dir.path().join("nested").join("token.json"));

        storage.store("tok-123").unwrap();
        assert_eq!(storage.load().unwrap(), Some("tok-123".to_string()));
    }

    #[test]
    fn clear_removes_the_file_and_is_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileTokenStorage::with_path(temp_dir.path().join("token.json"));

        storage.store("tok-123").unwrap();
        storage.clear().unwrap();
        assert_eq!(storage.load().unwrap(), None);

        // Clearing again must not fail.
        storage.clear().unwrap();
    }

    #[test]
    fn corrupt_file_surfaces_a_typed_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("token.json");
        fs::write(&path, "{ not json").unwrap();

        let storage = FileTokenStorage::with_path(path);
        let result = storage.load();
        assert!(matches!(
            result,
            Err(NewslensError::Serialization { .. })
        ));
    }
}
