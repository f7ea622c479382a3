//! Local credential cache.
//!
//! Remembers the source account's email and app password between runs so a
//! rerun after a failure does not re-prompt. A missing or corrupt cache file
//! reads as "no cache"; only writes surface errors.

use std::fs;
use std::io;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum CacheError {
    #[error("Failed to write credential cache '{path}': {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to remove credential cache '{path}': {source}")]
    Remove {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to serialize credential cache: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// The cached source-account credentials.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedCredentials {
    pub email: String,
    pub app_password: String,
}

/// A JSON credential cache at a fixed path.
pub struct CredentialCache {
    path: PathBuf,
}

impl CredentialCache {
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The per-user default location, when a config directory exists.
    pub fn default_location() -> Option<Self> {
        dirs::config_dir().map(|dir| Self::at(dir.join("mailferry").join("credentials.json")))
    }

    /// Reads the cache; any read or parse failure reads as absent.
    pub fn load(&self) -> Option<CachedCredentials> {
        let raw = fs::read_to_string(&self.path).ok()?;
        match serde_json::from_str(&raw) {
            Ok(cached) => Some(cached),
            Err(err) => {
                debug!("ignoring corrupt credential cache: {}", err);
                None
            }
        }
    }

    pub fn store(&self, email: &str, app_password: &str) -> Result<(), CacheError> {
        let data = CachedCredentials {
            email: email.to_string(),
            app_password: app_password.to_string(),
        };
        let raw = serde_json::to_string_pretty(&data)?;
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|source| CacheError::Write {
                path: self.path.clone(),
                source,
            })?;
        }
        fs::write(&self.path, raw).map_err(|source| CacheError::Write {
            path: self.path.clone(),
            source,
        })
    }

    /// Removes the cache file; an already-absent file is not an error.
    pub fn clear(&self) -> Result<(), CacheError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(CacheError::Remove {
                path: self.path.clone(),
                source,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_round_trip() {
        let dir = TempDir::new().unwrap();
        let cache = CredentialCache::at(dir.path().join("credentials.json"));

        assert!(cache.load().is_none());
        cache.store("user@example.com", "app-password").unwrap();

        let cached = cache.load().unwrap();
        assert_eq!(cached.email, "user@example.com");
        assert_eq!(cached.app_password, "app-password");
    }

    #[test]
    fn test_clear_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let cache = CredentialCache::at(dir.path().join("credentials.json"));

        cache.store("user@example.com", "secret").unwrap();
        cache.clear().unwrap();
        assert!(cache.load().is_none());
        // A second clear on a missing file still succeeds.
        cache.clear().unwrap();
    }

    #[test]
    fn test_corrupt_cache_reads_as_absent() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("credentials.json");
        fs::write(&path, "not json").unwrap();

        let cache = CredentialCache::at(path);
        assert!(cache.load().is_none());
    }

    #[test]
    fn test_store_creates_parent_directories() {
        let dir = TempDir::new().unwrap();
        let cache = CredentialCache::at(dir.path().join("nested").join("credentials.json"));
        cache.store("user@example.com", "secret").unwrap();
        assert!(cache.load().is_some());
    }
}
