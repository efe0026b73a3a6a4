//! The session state holder.
//!
//! [`SessionHolder`] owns the single authoritative "current session" value
//! and is the only writer of it. Consumers observe the value through a
//! replay-1 subscription: a new subscriber immediately sees the latest
//! published value, then every subsequent change, so late-mounting UI
//! never renders an unknown auth state.

use std::sync::Arc;
use tokio::sync::watch;

use crate::error::ApiError;
use crate::gateway::AccountClient;
use crate::traits::{CredentialStore, CredentialsError};

use super::claims::Claims;

/// Error from a session command.
#[derive(Debug)]
pub enum SessionError {
    /// The backend rejected the request.
    Api(ApiError),
    /// The credential could not be persisted or cleared.
    Store(CredentialsError),
}

impl std::fmt::Display for SessionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionError::Api(e) => write!(f, "{}", e),
            SessionError::Store(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for SessionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SessionError::Api(e) => Some(e),
            SessionError::Store(e) => Some(e),
        }
    }
}

impl From<ApiError> for SessionError {
    fn from(e: ApiError) -> Self {
        SessionError::Api(e)
    }
}

impl From<CredentialsError> for SessionError {
    fn from(e: CredentialsError) -> Self {
        SessionError::Store(e)
    }
}

/// Write handle the gateway uses to drop the session on a 401.
///
/// Defined here so that publishing stays inside the session module: the
/// gateway can only say "the credential was rejected", it cannot publish
/// arbitrary session values.
#[derive(Debug, Clone)]
pub struct SessionInvalidator {
    tx: Arc<watch::Sender<Option<Claims>>>,
}

impl SessionInvalidator {
    /// Publish "no session". Exactly one publish per call.
    pub fn invalidate(&self) {
        tracing::debug!("session invalidated by 401 response");
        self.tx.send_replace(None);
    }
}

/// Owner of the current session value.
///
/// Exactly one session value is live per client; it is overwritten, never
/// merged. All mutation goes through [`login`](Self::login),
/// [`logout`](Self::logout), [`refresh`](Self::refresh) or the
/// [`SessionInvalidator`].
pub struct SessionHolder {
    account: AccountClient,
    store: Arc<dyn CredentialStore>,
    tx: Arc<watch::Sender<Option<Claims>>>,
}

impl SessionHolder {
    /// Create a holder over an account client.
    ///
    /// Installs this holder's invalidator into the underlying gateway so
    /// any authenticated request that meets a 401 drops the session.
    pub fn new(account: AccountClient) -> Self {
        let (tx, _rx) = watch::channel(None);
        let tx = Arc::new(tx);
        let store = account.gateway().credentials().clone();
        let holder = Self { account, store, tx };
        holder
            .account
            .gateway()
            .install_invalidator(holder.invalidator());
        holder
    }

    /// Subscribe to session changes. The receiver immediately holds the
    /// latest published value (replay depth 1).
    pub fn subscribe(&self) -> watch::Receiver<Option<Claims>> {
        self.tx.subscribe()
    }

    /// The most recently published session value.
    pub fn current(&self) -> Option<Claims> {
        self.tx.borrow().clone()
    }

    /// A cloneable invalidation handle for the gateway.
    pub fn invalidator(&self) -> SessionInvalidator {
        SessionInvalidator {
            tx: self.tx.clone(),
        }
    }

    /// Probe the status endpoint and publish the resulting session value.
    ///
    /// A confirmed session publishes the decoded claims; a rejected or
    /// absent credential publishes `None`. Any other failure abandons the
    /// refresh without publishing, so a transient network error never
    /// flaps the UI into a logged-out state.
    pub async fn refresh(&self) {
        match self.account.status().await {
            Ok(true) => {
                let value = self.decode_stored_claims().await;
                self.tx.send_replace(value);
            }
            Ok(false) | Err(ApiError::Unauthorized) => {
                self.tx.send_replace(None);
            }
            Err(e) => {
                tracing::warn!("session refresh abandoned: {}", e);
            }
        }
    }

    /// Exchange credentials for a token, store it, and refresh.
    ///
    /// On failure the error propagates to the caller (the login form) and
    /// nothing is published.
    pub async fn login(&self, username: &str, password: &str) -> Result<(), SessionError> {
        let token = self.account.login(username, password).await?;
        self.store.store(&token).await?;
        self.refresh().await;
        Ok(())
    }

    /// Clear the stored credential and publish "no session".
    ///
    /// Navigation after logout is a UI concern and not handled here.
    pub async fn logout(&self) {
        if let Err(e) = self.store.clear().await {
            tracing::warn!("failed to clear stored credential: {}", e);
        }
        self.tx.send_replace(None);
    }

    /// Decode claims from the stored token. An absent token reads as no
    /// session; an undecodable token additionally clears the store so the
    /// broken credential is not retried forever.
    async fn decode_stored_claims(&self) -> Option<Claims> {
        let token = self.store.load().await?;
        match Claims::decode(&token) {
            Ok(claims) => Some(claims),
            Err(e) => {
                tracing::warn!("stored credential is undecodable, clearing it: {}", e);
                if let Err(clear_err) = self.store.clear().await {
                    tracing::warn!("failed to clear broken credential: {}", clear_err);
                }
                None
            }
        }
    }
}
