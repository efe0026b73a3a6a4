//! Statistics API client: aggregate totals and per-day series for the
//! usage dashboard.

use serde::de::Error as _;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::error::ApiError;
use crate::models::{time_series_from_wire, TimeSeries};

use super::Gateway;

/// Client for the `/statistic` endpoints.
#[derive(Clone)]
pub struct StatisticsClient {
    gateway: Arc<Gateway>,
}

impl StatisticsClient {
    pub fn new(gateway: Arc<Gateway>) -> Self {
        Self { gateway }
    }

    async fn total(&self, subject: &str) -> Result<u64, ApiError> {
        let path = format!("/statistic/{}/total", subject);
        self.gateway.get_json(&path).await
    }

    async fn per_day(&self, subject: &str) -> Result<TimeSeries, ApiError> {
        let path = format!("/statistic/{}/perday", subject);
        let wire: BTreeMap<String, u64> = self.gateway.get_json(&path).await?;
        time_series_from_wire(wire)
            .map_err(|e| ApiError::Decode(serde_json::Error::custom(e.to_string())))
    }

    pub async fn total_users(&self) -> Result<u64, ApiError> {
        self.total("user").await
    }

    pub async fn total_logins(&self) -> Result<u64, ApiError> {
        self.total("login").await
    }

    pub async fn total_posts(&self) -> Result<u64, ApiError> {
        self.total("post").await
    }

    pub async fn total_comments(&self) -> Result<u64, ApiError> {
        self.total("comment").await
    }

    pub async fn users_per_day(&self) -> Result<TimeSeries, ApiError> {
        self.per_day("user").await
    }

    pub async fn logins_per_day(&self) -> Result<TimeSeries, ApiError> {
        self.per_day("login").await
    }

    pub async fn posts_per_day(&self) -> Result<TimeSeries, ApiError> {
        self.per_day("post").await
    }

    pub async fn comments_per_day(&self) -> Result<TimeSeries, ApiError> {
        self.per_day("comment").await
    }

    /// User counts keyed by gender label, as the backend reports them.
    pub async fn gender_distribution(&self) -> Result<BTreeMap<String, u64>, ApiError> {
        self.gateway.get_json("/statistic/user/gender").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::mock::{InMemoryCredentials, MockHttpClient, MockResponse};
    use crate::config::ClientConfig;
    use crate::traits::Response;
    use bytes::Bytes;
    use chrono::NaiveDate;

    fn client_with(http: MockHttpClient) -> StatisticsClient {
        let gateway = Gateway::with_config(
            Arc::new(http),
            Arc::new(InMemoryCredentials::new()),
            ClientConfig::with_api_base("http://test"),
        );
        StatisticsClient::new(gateway)
    }

    #[tokio::test]
    async fn totals_parse_bare_numbers() {
        let http = MockHttpClient::new();
        http.set_response(
            "http://test/statistic/user/total",
            MockResponse::Success(Response::new(200, Bytes::from("1234"))),
        );
        let client = client_with(http);

        assert_eq!(client.total_users().await.unwrap(), 1234);
    }

    #[tokio::test]
    async fn per_day_parses_datetime_keys() {
        let http = MockHttpClient::new();
        http.set_response(
            "http://test/statistic/post/perday",
            MockResponse::Success(Response::new(
                200,
                Bytes::from(r#"{"2024-02-01T00:00:00":3,"2024-02-02T00:00:00":5}"#),
            )),
        );
        let client = client_with(http);

        let series = client.posts_per_day().await.unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series[&NaiveDate::from_ymd_opt(2024, 2, 1).unwrap()], 3);
    }

    #[tokio::test]
    async fn per_day_with_bad_keys_is_a_decode_error() {
        let http = MockHttpClient::new();
        http.set_response(
            "http://test/statistic/login/perday",
            MockResponse::Success(Response::new(200, Bytes::from(r#"{"garbage":1}"#))),
        );
        let client = client_with(http);

        assert!(matches!(
            client.logins_per_day().await,
            Err(ApiError::Decode(_))
        ));
    }

    #[tokio::test]
    async fn gender_distribution_keeps_labels() {
        let http = MockHttpClient::new();
        http.set_response(
            "http://test/statistic/user/gender",
            MockResponse::Success(Response::new(
                200,
                Bytes::from(r#"{"Female":10,"Male":12,"NoAnswer":3}"#),
            )),
        );
        let client = client_with(http);

        let dist = client.gender_distribution().await.unwrap();
        assert_eq!(dist["Female"], 10);
        assert_eq!(dist.len(), 3);
    }
}
