//! API client configuration.

use std::time::Duration;

use url::Url;

use crate::error::{ApiError, ApiResult};

/// Base URL used when none is configured. Includes the `/api/v1` prefix.
pub const DEFAULT_BASE_URL: &str = "http://localhost/api/v1";

/// Per-request timeout used when none is configured.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Configuration for [`ApiClient`](crate::ApiClient).
#[derive(Clone, Debug)]
pub struct ClientConfig {
    /// API root including the version prefix (e.g. `https://huddle.example/api/v1`).
    pub base_url: String,
    /// Upper bound for a single HTTP exchange.
    pub request_timeout: Duration,
    /// Refresh an already-expired access token before sending a request
    /// instead of waiting for the server to answer `401`.
    pub proactive_refresh: bool,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Reads configuration from environment variables with sensible defaults.
    ///
    /// | Variable                   | Default                   |
    /// |----------------------------|---------------------------|
    /// | `HUDDLE_API_URL`           | `http://localhost/api/v1` |
    /// | `HUDDLE_TIMEOUT_SECS`      | `30`                      |
    /// | `HUDDLE_PROACTIVE_REFRESH` | `true`                    |
    pub fn from_env() -> Self {
        Self {
            base_url: std::env::var("HUDDLE_API_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.into()),
            request_timeout: std::env::var("HUDDLE_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.trim().parse::<u64>().ok())
                .map(Duration::from_secs)
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT),
            proactive_refresh: std::env::var("HUDDLE_PROACTIVE_REFRESH")
                .map(|v| parse_flag(&v))
                .unwrap_or(true),
        }
    }

    /// Parse and check the base URL.
    pub(crate) fn parsed_base_url(&self) -> ApiResult<Url> {
        let url = Url::parse(self.base_url.trim())
            .map_err(|e| ApiError::Config(format!("invalid base URL '{}': {e}", self.base_url)))?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(ApiError::Config(format!(
                "unsupported URL scheme '{other}' in '{}'",
                self.base_url
            ))),
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            proactive_refresh: true,
        }
    }
}

/// Anything but an explicit "off" value counts as enabled.
fn parse_flag(value: &str) -> bool {
    !matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "0" | "false" | "no" | "off"
    )
}
