//! Error types for the Chirp client core.
//!
//! The gateway maps every failed request into an [`ApiError`]:
//!
//! - 401 responses become [`ApiError::Unauthorized`], never a generic
//!   failure;
//! - recognized `{ "error": <code> }` envelopes become
//!   [`ApiError::Domain`] with a specific user message;
//! - everything else (transport failures, 5xx, undecodable bodies) maps
//!   to a generic retry-later message.
//!
//! Callers convert errors to dismissable notices at the point of use;
//! nothing is retried automatically.

pub mod domain;

pub use domain::DomainError;

use crate::traits::HttpError;

/// Error returned by all gateway operations.
#[derive(Debug)]
pub enum ApiError {
    /// The server rejected the credential (HTTP 401).
    Unauthorized,
    /// A structured, recognized server error code.
    Domain(DomainError),
    /// Any other non-2xx response.
    Server { status: u16, message: String },
    /// The request never produced a response.
    Transport(HttpError),
    /// A 2xx body that could not be decoded.
    Decode(serde_json::Error),
}

impl ApiError {
    /// True for errors that mean "the session is invalid".
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized)
    }

    /// The user-facing message for this error, per the error taxonomy:
    /// 401 asks the user to log in, domain codes get their specific text,
    /// everything else gets a generic retry-later message.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Unauthorized => "You have to be logged in to do that.".to_string(),
            ApiError::Domain(code) => code.user_message().to_string(),
            ApiError::Server { .. } | ApiError::Transport(_) | ApiError::Decode(_) => {
                "An error occurred, please try again later.".to_string()
            }
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::Unauthorized => write!(f, "Unauthorized (401)"),
            ApiError::Domain(code) => write!(f, "Server error code: {}", code),
            ApiError::Server { status, message } => {
                write!(f, "Server error ({}): {}", status, message)
            }
            ApiError::Transport(e) => write!(f, "Transport error: {}", e),
            ApiError::Decode(e) => write!(f, "Decode error: {}", e),
        }
    }
}

impl std::error::Error for ApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ApiError::Transport(e) => Some(e),
            ApiError::Decode(e) => Some(e),
            ApiError::Domain(e) => Some(e),
            _ => None,
        }
    }
}

impl From<HttpError> for ApiError {
    fn from(e: HttpError) -> Self {
        ApiError::Transport(e)
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        ApiError::Decode(e)
    }
}

impl From<DomainError> for ApiError {
    fn from(e: DomainError) -> Self {
        ApiError::Domain(e)
    }
}
