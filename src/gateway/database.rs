//! Database API client: the admin SQL console.

use std::sync::Arc;

use crate::error::ApiError;
use crate::models::DatabaseOperation;

use super::Gateway;

/// Client for the `/database` endpoint. Admin only; authority is checked
/// server-side.
#[derive(Clone)]
pub struct DatabaseClient {
    gateway: Arc<Gateway>,
}

impl DatabaseClient {
    pub fn new(gateway: Arc<Gateway>) -> Self {
        Self { gateway }
    }

    /// Execute a raw SQL statement. The statement travels as a JSON
    /// string body; the result distinguishes row sets from row counts.
    pub async fn execute(&self, statement: &str) -> Result<DatabaseOperation, ApiError> {
        self.gateway.post_json("/database/execute", &statement).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::mock::{InMemoryCredentials, MockHttpClient, MockResponse};
    use crate::config::ClientConfig;
    use crate::traits::Response;
    use bytes::Bytes;

    fn client_with(http: MockHttpClient) -> DatabaseClient {
        let gateway = Gateway::with_config(
            Arc::new(http),
            Arc::new(InMemoryCredentials::new()),
            ClientConfig::with_api_base("http://test"),
        );
        DatabaseClient::new(gateway)
    }

    #[tokio::test]
    async fn statement_is_sent_as_json_string() {
        let http = MockHttpClient::new();
        http.set_response(
            "http://test/database/execute",
            MockResponse::Success(Response::new(
                200,
                Bytes::from(
                    r#"{"hasResult":true,"columns":["id"],"result":[["1"],["2"]]}"#,
                ),
            )),
        );
        let client = client_with(http.clone());

        let op = client.execute("SELECT id FROM users").await.unwrap();
        assert!(op.has_result);
        assert_eq!(op.columns.as_deref(), Some(&["id".to_string()][..]));
        assert_eq!(op.rows.as_ref().unwrap().len(), 2);

        let requests = http.get_requests();
        assert_eq!(
            requests[0].body.as_deref(),
            Some(r#""SELECT id FROM users""#)
        );
    }

    #[tokio::test]
    async fn update_reports_affected_rows() {
        let http = MockHttpClient::new();
        http.set_default_response(MockResponse::Success(Response::new(
            200,
            Bytes::from(r#"{"hasResult":false,"affectedRows":3}"#),
        )));
        let client = client_with(http);

        let op = client.execute("DELETE FROM posts WHERE id < 10").await.unwrap();
        assert!(!op.has_result);
        assert_eq!(op.affected_rows, Some(3));
    }
}
