//! In-memory credential store for testing.

use async_trait::async_trait;
use std::sync::{Arc, Mutex};

use crate::traits::{CredentialStore, CredentialsError};

/// In-memory [`CredentialStore`] for tests.
///
/// Stores the token in memory so tests can verify session behavior without
/// touching the file system. Save and clear can be made to fail to exercise
/// error paths.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCredentials {
    token: Arc<Mutex<Option<String>>>,
    save_should_fail: Arc<Mutex<bool>>,
    clear_should_fail: Arc<Mutex<bool>>,
}

impl InMemoryCredentials {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store seeded with a token.
    pub fn with_token(token: &str) -> Self {
        let store = Self::new();
        *store.token.lock().unwrap() = Some(token.to_string());
        store
    }

    /// Make subsequent `store` calls fail.
    pub fn fail_saves(&self) {
        *self.save_should_fail.lock().unwrap() = true;
    }

    /// Make subsequent `clear` calls fail.
    pub fn fail_clears(&self) {
        *self.clear_should_fail.lock().unwrap() = true;
    }

    /// Peek at the stored token without going through the trait.
    pub fn current(&self) -> Option<String> {
        self.token.lock().unwrap().clone()
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentials {
    async fn load(&self) -> Option<String> {
        self.token.lock().unwrap().clone()
    }

    async fn store(&self, token: &str) -> Result<(), CredentialsError> {
        if *self.save_should_fail.lock().unwrap() {
            return Err(CredentialsError::SaveFailed("mock failure".to_string()));
        }
        *self.token.lock().unwrap() = Some(token.to_string());
        Ok(())
    }

    async fn clear(&self) -> Result<(), CredentialsError> {
        if *self.clear_should_fail.lock().unwrap() {
            return Err(CredentialsError::ClearFailed("mock failure".to_string()));
        }
        *self.token.lock().unwrap() = None;
        Ok(())
    }
}
