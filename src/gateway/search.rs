//! Search API client: username search and the moderation user filter.

use std::sync::Arc;

use crate::error::ApiError;
use crate::models::{UserFilter, UserSummary};

use super::Gateway;

/// Client for the `/search` endpoints.
#[derive(Clone)]
pub struct SearchClient {
    gateway: Arc<Gateway>,
}

impl SearchClient {
    pub fn new(gateway: Arc<Gateway>) -> Self {
        Self { gateway }
    }

    /// Users whose names match the query fragment.
    pub async fn search(&self, query: &str) -> Result<Vec<UserSummary>, ApiError> {
        let path = format!("/search?username={}", urlencoding::encode(query));
        self.gateway.get_json(&path).await
    }

    /// Filtered user list for the moderation view.
    pub async fn filter(&self, filter: &UserFilter) -> Result<Vec<UserSummary>, ApiError> {
        self.gateway.post_json("/search/filter", filter).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::mock::{InMemoryCredentials, MockHttpClient, MockResponse};
    use crate::config::ClientConfig;
    use crate::models::Role;
    use crate::traits::Response;
    use bytes::Bytes;

    fn client_with(http: MockHttpClient) -> SearchClient {
        let gateway = Gateway::with_config(
            Arc::new(http),
            Arc::new(InMemoryCredentials::new()),
            ClientConfig::with_api_base("http://test"),
        );
        SearchClient::new(gateway)
    }

    #[tokio::test]
    async fn search_encodes_query() {
        let http = MockHttpClient::new();
        http.set_default_response(MockResponse::Success(Response::new(
            200,
            Bytes::from(r#"[{"id":1,"username":"ada"}]"#),
        )));
        let client = client_with(http.clone());

        let users = client.search("a d").await.unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(
            http.get_requests()[0].url,
            "http://test/search?username=a%20d"
        );
    }

    #[tokio::test]
    async fn filter_posts_filter_body() {
        let http = MockHttpClient::new();
        http.set_default_response(MockResponse::Success(Response::new(
            200,
            Bytes::from("[]"),
        )));
        let client = client_with(http.clone());

        let filter = UserFilter {
            username: "ad".to_string(),
            roles: vec![Role::Moderator],
            ..Default::default()
        };
        client.filter(&filter).await.unwrap();

        let requests = http.get_requests();
        assert_eq!(requests[0].method, "POST");
        assert_eq!(requests[0].url, "http://test/search/filter");
        assert_eq!(
            requests[0].body.as_deref(),
            Some(r#"{"username":"ad","roles":[1]}"#)
        );
    }
}
