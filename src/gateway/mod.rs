//! HTTP gateway to the Chirp backend.
//!
//! [`Gateway`] is the shared request core: it builds URLs, attaches the
//! bearer credential to every outbound request when one is stored, and
//! maps failures into [`ApiError`] uniformly. The per-area API clients
//! ([`AccountClient`], [`ContentClient`], [`SearchClient`],
//! [`StatisticsClient`], [`ImageClient`], [`DatabaseClient`]) are thin
//! typed wrappers over it.
//!
//! 401 handling is centralized here: any 401 on a regular request maps to
//! [`ApiError::Unauthorized`] and triggers exactly one session
//! invalidation. The login and status-probe requests opt out, because the
//! session holder interprets their 401s itself.

pub mod account;
pub mod content;
pub mod database;
pub mod images;
pub mod search;
pub mod statistics;

pub use account::AccountClient;
pub use content::ContentClient;
pub use database::DatabaseClient;
pub use images::ImageClient;
pub use search::SearchClient;
pub use statistics::StatisticsClient;

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::{Arc, OnceLock};

use crate::auth::SessionInvalidator;
use crate::config::ClientConfig;
use crate::error::{ApiError, DomainError};
use crate::traits::{CredentialStore, FilePart, Headers, HttpClient, Response};

/// What a 401 response should do besides failing the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum OnUnauthorized {
    /// Drop the current session (the default for authenticated requests).
    Invalidate,
    /// Leave the session alone; the caller interprets the 401 itself.
    PassThrough,
}

#[derive(Debug, Clone, Copy)]
enum Verb {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

/// Structured error envelope the backend uses for domain failures.
#[derive(Debug, serde::Deserialize)]
struct ErrorEnvelope {
    error: u8,
}

/// Shared request core for all API clients.
pub struct Gateway {
    http: Arc<dyn HttpClient>,
    config: ClientConfig,
    store: Arc<dyn CredentialStore>,
    invalidator: OnceLock<SessionInvalidator>,
}

impl Gateway {
    /// Create a gateway over an explicit transport and credential store.
    pub fn new(http: Arc<dyn HttpClient>, store: Arc<dyn CredentialStore>) -> Arc<Self> {
        Self::with_config(http, store, ClientConfig::default())
    }

    /// Create a gateway with a specific configuration.
    pub fn with_config(
        http: Arc<dyn HttpClient>,
        store: Arc<dyn CredentialStore>,
        config: ClientConfig,
    ) -> Arc<Self> {
        Arc::new(Self {
            http,
            config,
            store,
            invalidator: OnceLock::new(),
        })
    }

    /// Production gateway: reqwest transport configured from the
    /// environment, file-backed credential storage.
    pub fn from_env() -> Result<Arc<Self>, crate::traits::CredentialsError> {
        let config = ClientConfig::from_env();
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| crate::traits::CredentialsError::Other(e.to_string()))?;
        let http = Arc::new(crate::adapters::ReqwestHttpClient::with_client(client));
        let store = Arc::new(crate::adapters::FileCredentials::new()?);
        Ok(Self::with_config(http, store, config))
    }

    /// The credential store requests read their bearer token from.
    pub fn credentials(&self) -> &Arc<dyn CredentialStore> {
        &self.store
    }

    /// The active configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Install the session invalidator. Called once by the session holder;
    /// later calls are ignored.
    pub fn install_invalidator(&self, invalidator: SessionInvalidator) {
        let _ = self.invalidator.set(invalidator);
    }

    /// Absolute URL for an API path (path starts with `/`).
    pub(crate) fn url(&self, path_and_query: &str) -> String {
        format!("{}{}", self.config.api_base, path_and_query)
    }

    async fn request_headers(&self, has_body: bool) -> Headers {
        let mut headers = Headers::new();
        if has_body {
            headers.insert("Content-Type".to_string(), "application/json".to_string());
        }
        if let Some(token) = self.store.load().await {
            headers.insert("Authorization".to_string(), format!("Bearer {}", token));
        }
        headers
    }

    /// Issue a request and map the response status into the error taxonomy.
    async fn send(
        &self,
        verb: Verb,
        path_and_query: &str,
        body: Option<String>,
        on_unauthorized: OnUnauthorized,
    ) -> Result<Response, ApiError> {
        let url = self.url(path_and_query);
        let headers = self.request_headers(body.is_some()).await;
        let body_str = body.as_deref().unwrap_or("");

        tracing::debug!(?verb, path = path_and_query, "gateway request");

        let response = match verb {
            Verb::Get => self.http.get(&url, &headers).await?,
            Verb::Post => self.http.post(&url, body_str, &headers).await?,
            Verb::Put => self.http.put(&url, body_str, &headers).await?,
            Verb::Patch => self.http.patch(&url, body_str, &headers).await?,
            Verb::Delete => self.http.delete(&url, &headers).await?,
        };

        self.check_status(response, on_unauthorized)
    }

    fn check_status(
        &self,
        response: Response,
        on_unauthorized: OnUnauthorized,
    ) -> Result<Response, ApiError> {
        if response.is_success() {
            return Ok(response);
        }

        if response.status == 401 {
            if on_unauthorized == OnUnauthorized::Invalidate {
                if let Some(invalidator) = self.invalidator.get() {
                    invalidator.invalidate();
                }
            }
            return Err(ApiError::Unauthorized);
        }

        // Probe the body for a structured error code before falling back
        // to a plain server error.
        if let Ok(envelope) = serde_json::from_slice::<ErrorEnvelope>(&response.body) {
            if let Ok(code) = DomainError::try_from(envelope.error) {
                return Err(ApiError::Domain(code));
            }
        }

        let message = response.text().unwrap_or_else(|_| "Unknown error".to_string());
        Err(ApiError::Server {
            status: response.status,
            message,
        })
    }

    fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
        Ok(serde_json::from_slice(&response.body)?)
    }

    fn encode<B: Serialize>(body: &B) -> Result<String, ApiError> {
        Ok(serde_json::to_string(body)?)
    }

    // Typed helpers used by the API clients.

    pub(crate) async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self
            .send(Verb::Get, path, None, OnUnauthorized::Invalidate)
            .await?;
        Self::decode(response)
    }

    /// GET whose 401 is interpreted by the caller (the status probe).
    pub(crate) async fn get_json_passthrough<T: DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<T, ApiError> {
        let response = self
            .send(Verb::Get, path, None, OnUnauthorized::PassThrough)
            .await?;
        Self::decode(response)
    }

    pub(crate) async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let body = Self::encode(body)?;
        let response = self
            .send(Verb::Post, path, Some(body), OnUnauthorized::Invalidate)
            .await?;
        Self::decode(response)
    }

    /// POST returning the raw response text. The login endpoint answers
    /// with the bare token rather than JSON; its 401 means "wrong
    /// credentials", not "session expired", so it never invalidates.
    pub(crate) async fn post_text_passthrough<B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<String, ApiError> {
        let body = Self::encode(body)?;
        let response = self
            .send(Verb::Post, path, Some(body), OnUnauthorized::PassThrough)
            .await?;
        response
            .text()
            .map_err(|e| ApiError::Server {
                status: response.status,
                message: format!("response is not UTF-8: {}", e),
            })
    }

    /// POST with an empty body (e.g. adding a follow).
    pub(crate) async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self
            .send(Verb::Post, path, None, OnUnauthorized::Invalidate)
            .await?;
        Self::decode(response)
    }

    pub(crate) async fn post_unit<B: Serialize>(&self, path: &str, body: &B) -> Result<(), ApiError> {
        let body = Self::encode(body)?;
        self.send(Verb::Post, path, Some(body), OnUnauthorized::Invalidate)
            .await?;
        Ok(())
    }

    pub(crate) async fn put_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let body = Self::encode(body)?;
        let response = self
            .send(Verb::Put, path, Some(body), OnUnauthorized::Invalidate)
            .await?;
        Self::decode(response)
    }

    pub(crate) async fn put_unit<B: Serialize>(&self, path: &str, body: &B) -> Result<(), ApiError> {
        let body = Self::encode(body)?;
        self.send(Verb::Put, path, Some(body), OnUnauthorized::Invalidate)
            .await?;
        Ok(())
    }

    pub(crate) async fn patch_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let body = Self::encode(body)?;
        let response = self
            .send(Verb::Patch, path, Some(body), OnUnauthorized::Invalidate)
            .await?;
        Self::decode(response)
    }

    pub(crate) async fn delete_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self
            .send(Verb::Delete, path, None, OnUnauthorized::Invalidate)
            .await?;
        Self::decode(response)
    }

    pub(crate) async fn delete_unit(&self, path: &str) -> Result<(), ApiError> {
        self.send(Verb::Delete, path, None, OnUnauthorized::Invalidate)
            .await?;
        Ok(())
    }

    /// Multipart PUT for image uploads; decodes the JSON response.
    pub(crate) async fn put_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        part: FilePart,
    ) -> Result<T, ApiError> {
        let url = self.url(path);
        // No Content-Type here; the transport sets the multipart boundary.
        let mut headers = Headers::new();
        if let Some(token) = self.store.load().await {
            headers.insert("Authorization".to_string(), format!("Bearer {}", token));
        }
        let response = self.http.put_multipart(&url, part, &headers).await?;
        let response = self.check_status(response, OnUnauthorized::Invalidate)?;
        Self::decode(response)
    }
}

/// The `me`-or-username path segment used across account endpoints.
pub(crate) fn user_segment(username: Option<&str>) -> String {
    match username {
        Some(name) => urlencoding::encode(name).into_owned(),
        None => "me".to_string(),
    }
}
