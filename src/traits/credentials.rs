//! Credential storage trait abstraction.
//!
//! The stored value is the opaque bearer token the backend hands out at
//! login, the client-side equivalent of the browser's auth cookie. Storage
//! is abstracted so tests can run against an in-memory store.

use async_trait::async_trait;

/// Credential storage errors.
#[derive(Debug, Clone)]
pub enum CredentialsError {
    /// Failed to persist the token
    SaveFailed(String),
    /// Failed to clear the token
    ClearFailed(String),
    /// IO error
    Io(String),
    /// Other error
    Other(String),
}

impl std::fmt::Display for CredentialsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CredentialsError::SaveFailed(msg) => write!(f, "Failed to save credential: {}", msg),
            CredentialsError::ClearFailed(msg) => write!(f, "Failed to clear credential: {}", msg),
            CredentialsError::Io(msg) => write!(f, "IO error: {}", msg),
            CredentialsError::Other(msg) => write!(f, "Credential error: {}", msg),
        }
    }
}

impl std::error::Error for CredentialsError {}

/// Trait for bearer-token storage and retrieval.
///
/// `load` is infallible by design: a missing or unreadable store reads as
/// "no credential", which the session layer treats as anonymous.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Load the stored token, if any.
    async fn load(&self) -> Option<String>;

    /// Persist a token, replacing any previous one.
    async fn store(&self, token: &str) -> Result<(), CredentialsError>;

    /// Remove the stored token.
    async fn clear(&self) -> Result<(), CredentialsError>;
}
