//! Client configuration.

use std::time::Duration;

/// Default API base used when nothing else is configured.
pub const DEFAULT_API_BASE: &str = "https://api.chirp.social";

/// Default per-request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Environment variable overriding the API base URL.
pub const ENV_API_BASE: &str = "CHIRP_API_BASE";

/// Environment variable overriding the request timeout (seconds).
pub const ENV_REQUEST_TIMEOUT_SECS: &str = "CHIRP_REQUEST_TIMEOUT_SECS";

/// Configuration for the HTTP gateway.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Base URL of the backend API, without a trailing slash.
    pub api_base: String,
    /// Timeout applied to each request by the transport.
    pub request_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl ClientConfig {
    /// Create a config pointing at a specific API base.
    pub fn with_api_base(api_base: impl Into<String>) -> Self {
        let mut base: String = api_base.into();
        while base.ends_with('/') {
            base.pop();
        }
        Self {
            api_base: base,
            ..Self::default()
        }
    }

    /// Build a config from the environment, falling back to defaults.
    ///
    /// Honors `CHIRP_API_BASE` and `CHIRP_REQUEST_TIMEOUT_SECS`. Malformed
    /// values are logged and ignored.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(base) = std::env::var(ENV_API_BASE) {
            if base.starts_with("http://") || base.starts_with("https://") {
                config = Self::with_api_base(base);
            } else {
                tracing::warn!("{} is not an http(s) URL, ignoring: {}", ENV_API_BASE, base);
            }
        }

        if let Ok(raw) = std::env::var(ENV_REQUEST_TIMEOUT_SECS) {
            match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => {
                    config.request_timeout = Duration::from_secs(secs);
                }
                _ => {
                    tracing::warn!(
                        "{} is not a positive integer, ignoring: {}",
                        ENV_REQUEST_TIMEOUT_SECS,
                        raw
                    );
                }
            }
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_points_at_production() {
        let config = ClientConfig::default();
        assert_eq!(config.api_base, DEFAULT_API_BASE);
        assert_eq!(config.request_timeout, Duration::from_secs(30));
    }

    #[test]
    fn with_api_base_strips_trailing_slashes() {
        let config = ClientConfig::with_api_base("http://localhost:8080//");
        assert_eq!(config.api_base, "http://localhost:8080");
    }
}
