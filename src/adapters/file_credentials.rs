//! File-based credential storage.
//!
//! Persists the bearer token at `~/.chirp/.credentials.json`, the desktop
//! equivalent of the browser's auth cookie. An unreadable or corrupt file
//! loads as "no credential".

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::PathBuf;

use crate::traits::{CredentialStore, CredentialsError};

/// The credentials directory name.
const CREDENTIALS_DIR: &str = ".chirp";

/// The credentials file name.
const CREDENTIALS_FILE: &str = ".credentials.json";

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
struct StoredCredential {
    token: Option<String>,
}

/// File-backed [`CredentialStore`].
#[derive(Debug)]
pub struct FileCredentials {
    credentials_path: PathBuf,
}

impl FileCredentials {
    /// Create a store rooted at the user's home directory.
    ///
    /// Returns an error if the home directory cannot be determined.
    pub fn new() -> Result<Self, CredentialsError> {
        let home = dirs::home_dir().ok_or_else(|| {
            CredentialsError::Other("Failed to determine home directory".to_string())
        })?;
        Ok(Self {
            credentials_path: home.join(CREDENTIALS_DIR).join(CREDENTIALS_FILE),
        })
    }

    /// Create a store at an explicit path. Used by tests.
    pub fn at_path(credentials_path: PathBuf) -> Self {
        Self { credentials_path }
    }

    /// Get the path to the credentials file.
    pub fn credentials_path(&self) -> &PathBuf {
        &self.credentials_path
    }

    fn read(&self) -> StoredCredential {
        if !self.credentials_path.exists() {
            return StoredCredential::default();
        }
        let file = match File::open(&self.credentials_path) {
            Ok(f) => f,
            Err(_) => return StoredCredential::default(),
        };
        serde_json::from_reader(BufReader::new(file)).unwrap_or_default()
    }
}

#[async_trait]
impl CredentialStore for FileCredentials {
    async fn load(&self) -> Option<String> {
        self.read().token
    }

    async fn store(&self, token: &str) -> Result<(), CredentialsError> {
        if let Some(parent) = self.credentials_path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| CredentialsError::Io(e.to_string()))?;
            }
        }

        let file = File::create(&self.credentials_path)
            .map_err(|e| CredentialsError::SaveFailed(e.to_string()))?;
        let mut writer = BufWriter::new(file);
        let stored = StoredCredential {
            token: Some(token.to_string()),
        };
        serde_json::to_writer_pretty(&mut writer, &stored)
            .map_err(|e| CredentialsError::SaveFailed(e.to_string()))?;
        writer
            .flush()
            .map_err(|e| CredentialsError::SaveFailed(e.to_string()))
    }

    async fn clear(&self) -> Result<(), CredentialsError> {
        if !self.credentials_path.exists() {
            return Ok(());
        }
        fs::remove_file(&self.credentials_path)
            .map_err(|e| CredentialsError::ClearFailed(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_store(temp_dir: &TempDir) -> FileCredentials {
        FileCredentials::at_path(temp_dir.path().join(CREDENTIALS_DIR).join(CREDENTIALS_FILE))
    }

    #[tokio::test]
    async fn test_load_nonexistent() {
        let temp_dir = TempDir::new().unwrap();
        let store = create_test_store(&temp_dir);
        assert_eq!(store.load().await, None);
    }

    #[tokio::test]
    async fn test_store_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let store = create_test_store(&temp_dir);

        store.store("jwt-token-value").await.unwrap();
        assert_eq!(store.load().await, Some("jwt-token-value".to_string()));
    }

    #[tokio::test]
    async fn test_store_creates_parent_dir() {
        let temp_dir = TempDir::new().unwrap();
        let store = create_test_store(&temp_dir);

        assert!(!store.credentials_path().parent().unwrap().exists());
        store.store("token").await.unwrap();
        assert!(store.credentials_path().parent().unwrap().exists());
    }

    #[tokio::test]
    async fn test_store_replaces_previous_token() {
        let temp_dir = TempDir::new().unwrap();
        let store = create_test_store(&temp_dir);

        store.store("first").await.unwrap();
        store.store("second").await.unwrap();
        assert_eq!(store.load().await, Some("second".to_string()));
    }

    #[tokio::test]
    async fn test_clear() {
        let temp_dir = TempDir::new().unwrap();
        let store = create_test_store(&temp_dir);

        store.store("token").await.unwrap();
        store.clear().await.unwrap();
        assert_eq!(store.load().await, None);
        assert!(!store.credentials_path().exists());
    }

    #[tokio::test]
    async fn test_clear_nonexistent_succeeds() {
        let temp_dir = TempDir::new().unwrap();
        let store = create_test_store(&temp_dir);
        assert!(store.clear().await.is_ok());
    }

    #[tokio::test]
    async fn test_load_invalid_json_reads_as_none() {
        let temp_dir = TempDir::new().unwrap();
        let store = create_test_store(&temp_dir);

        fs::create_dir_all(store.credentials_path().parent().unwrap()).unwrap();
        fs::write(store.credentials_path(), "not valid json").unwrap();

        assert_eq!(store.load().await, None);
    }
}
