//! Runtime configuration.
//!
//! All credentials and endpoints live in an explicitly constructed [`Config`] that is handed to
//! each component; nothing is read from globals after startup.

use crate::{Error, Result};
use std::time::Duration;

/// Default base URL of the YouTube Data API v3.
pub const DEFAULT_YOUTUBE_API_URL: &str = "https://www.googleapis.com/youtube/v3";

const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
pub struct Config {
    pub youtube: YouTubeConfig,
    pub store: StoreConfig,
    /// Upper bound on any single outbound request.
    pub http_timeout: Duration,
}

#[derive(Clone)]
pub struct YouTubeConfig {
    /// Static key sent as the `key` query parameter.
    pub api_key: String,
    /// Base URL without a trailing slash, e.g. `https://www.googleapis.com/youtube/v3`.
    pub base_url: String,
}

#[derive(Clone)]
pub struct StoreConfig {
    /// Rows endpoint of the channel table, always ending in `/`.
    pub rows_url: String,
    /// Database token sent as `Authorization: Token <token>`.
    pub token: String,
}

// Keep secrets out of `{:?}` output, which ends up in traces.
impl std::fmt::Debug for YouTubeConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("YouTubeConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl std::fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreConfig")
            .field("rows_url", &self.rows_url)
            .field("token", &"<redacted>")
            .finish()
    }
}

impl Config {
    /// Builds a configuration from explicit values, normalising both URLs.
    pub fn new(
        youtube_api_key: impl Into<String>,
        youtube_base_url: impl Into<String>,
        store_rows_url: impl Into<String>,
        store_token: impl Into<String>,
    ) -> Self {
        let mut base_url = youtube_base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        let mut rows_url = store_rows_url.into();
        if !rows_url.ends_with('/') {
            rows_url.push('/');
        }
        Self {
            youtube: YouTubeConfig {
                api_key: youtube_api_key.into(),
                base_url,
            },
            store: StoreConfig {
                rows_url,
                token: store_token.into(),
            },
            http_timeout: DEFAULT_HTTP_TIMEOUT,
        }
    }

    /// Reads the configuration from the process environment.
    ///
    /// Required: `YOUTUBE_API_KEY`, `BASEROW_ROWS_URL`, `BASEROW_TOKEN`.
    /// Optional: `YOUTUBE_API_URL`, `HTTP_TIMEOUT_SECS`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let required = |key: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| Error::Config(format!("{key} must be set")))
        };

        let api_key = required("YOUTUBE_API_KEY")?;
        let rows_url = required("BASEROW_ROWS_URL")?;
        let token = required("BASEROW_TOKEN")?;
        let base_url =
            lookup("YOUTUBE_API_URL").unwrap_or_else(|| DEFAULT_YOUTUBE_API_URL.to_string());

        let mut config = Self::new(api_key, base_url, rows_url, token);
        if let Some(secs) = lookup("HTTP_TIMEOUT_SECS") {
            let secs: u64 = secs.trim().parse().map_err(|_| {
                Error::Config(format!("HTTP_TIMEOUT_SECS is not a number of seconds: {secs}"))
            })?;
            config.http_timeout = Duration::from_secs(secs);
        }
        Ok(config)
    }

    /// Builds the HTTP client shared by every component.
    pub fn http_client(&self) -> Result<reqwest::Client> {
        reqwest::ClientBuilder::new()
            // SSRF no thank you.
            .redirect(reqwest::redirect::Policy::none())
            .timeout(self.http_timeout)
            .build()
            .map_err(|e| Error::Config(format!("build HTTP client: {e}")))
    }
}
