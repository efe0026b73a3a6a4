//! Client builders wired to a wiremock server.

use std::sync::Arc;

use chirp::adapters::{InMemoryCredentials, ReqwestHttpClient};
use chirp::config::ClientConfig;
use chirp::gateway::{AccountClient, ContentClient, Gateway};

/// Gateway speaking real HTTP to the given base URL, with an in-memory
/// credential store.
pub fn test_gateway(base_url: &str, store: InMemoryCredentials) -> Arc<Gateway> {
    Gateway::with_config(
        Arc::new(ReqwestHttpClient::new()),
        Arc::new(store),
        ClientConfig::with_api_base(base_url),
    )
}

pub fn test_account_client(base_url: &str, store: InMemoryCredentials) -> AccountClient {
    AccountClient::new(test_gateway(base_url, store))
}

pub fn test_content_client(base_url: &str, store: InMemoryCredentials) -> ContentClient {
    ContentClient::new(test_gateway(base_url, store))
}
