//! Identity claims decoded from the bearer token.
//!
//! The token is a JWT whose payload carries the identity the UI renders
//! from. The client never verifies the signature; the claims are display
//! data only, and the server re-checks authority on every request.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use serde::Deserialize;
use thiserror::Error;

use crate::models::Role;

/// Failure to decode claims from a stored token.
#[derive(Debug, Error)]
pub enum ClaimsError {
    #[error("token is not a three-part JWT")]
    MalformedToken,
    #[error("payload is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("payload is not valid claims JSON: {0}")]
    Json(#[from] serde_json::Error),
}

fn default_role() -> Role {
    Role::User
}

/// Decoded identity claims of the current user.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Claims {
    /// Username (JWT subject).
    #[serde(rename = "sub")]
    pub subject: String,
    /// Numeric user id.
    #[serde(rename = "uid")]
    pub user_id: i64,
    /// Role claim; absent claims default to the regular user role.
    #[serde(default = "default_role")]
    pub role: Role,
    /// Expiry as a Unix timestamp, if the token carries one.
    #[serde(default, rename = "exp")]
    pub expires_at: Option<i64>,
}

impl Claims {
    /// Decode claims from the payload section of a JWT.
    pub fn decode(token: &str) -> Result<Self, ClaimsError> {
        let mut parts = token.split('.');
        let payload = match (parts.next(), parts.next(), parts.next(), parts.next()) {
            (Some(_), Some(payload), Some(_), None) => payload,
            _ => return Err(ClaimsError::MalformedToken),
        };
        let bytes = URL_SAFE_NO_PAD.decode(payload)?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Whether the role claim grants moderation authority.
    pub fn is_moderator(&self) -> bool {
        matches!(self.role, Role::Moderator | Role::Admin)
    }
}
