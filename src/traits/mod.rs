//! Trait abstractions for dependency injection and testability.
//!
//! # Traits
//!
//! - [`HttpClient`] - HTTP client operations (GET, POST, PUT, PATCH, DELETE, multipart)
//! - [`CredentialStore`] - Bearer-token storage and retrieval

pub mod credentials;
pub mod http;

pub use credentials::{CredentialStore, CredentialsError};
pub use http::{FilePart, Headers, HttpClient, HttpError, Response};
