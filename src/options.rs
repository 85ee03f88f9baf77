use std::fmt;
use std::time::Duration;

use reqwest::header::{self, HeaderMap, HeaderName, HeaderValue};

use crate::{GitLabError, MaxRetries, Result};

/// Server used when no URL is configured.
pub const DEFAULT_URL: &str = "https://gitlab.com";

/// User agent sent unless overridden with [`ClientConfig::with_user_agent`].
pub const USER_AGENT: &str = concat!("gitlaber/", env!("CARGO_PKG_VERSION"));

/// Path segment between the base URL and resource paths.
pub const API_PATH: &str = "/api/v4";

/// Header carrying the access token.
pub(crate) const PRIVATE_TOKEN_HEADER: &str = "private-token";

/// Connection parameters: where to send requests and how to authenticate.
///
/// Immutable once built; the client clones what it needs.
#[derive(Clone, PartialEq, Eq)]
pub struct ClientConfig {
    base_url: String,
    private_token: Option<String>,
    user_agent: String,
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field(
                "private_token",
                &self.private_token.as_ref().map(|_| "<redacted>"),
            )
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(None, None)
    }
}

impl ClientConfig {
    /// Builds a config from an optional server URL and access token.
    ///
    /// An absent or empty URL falls back to [`DEFAULT_URL`]. Trailing slashes
    /// are stripped. An empty token means unauthenticated requests.
    pub fn new(url: Option<&str>, private_token: Option<&str>) -> Self {
        Self {
            base_url: normalize_base_url(url),
            private_token: private_token
                .filter(|token| !token.is_empty())
                .map(str::to_owned),
            user_agent: USER_AGENT.to_owned(),
        }
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Server root, without trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `<base_url>/api/v4`
    pub fn api_url(&self) -> String {
        format!("{}{API_PATH}", self.base_url)
    }

    pub fn private_token(&self) -> Option<&str> {
        self.private_token.as_deref()
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// Returns a fresh header map for one request.
    ///
    /// Always carries `User-Agent`; carries `PRIVATE-TOKEN` when a token is
    /// configured. Callers may mutate the result freely.
    pub fn headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();

        let user_agent = HeaderValue::from_str(&self.user_agent)
            .map_err(|_| GitLabError::Config("user agent is not a valid header value".to_owned()))?;
        headers.insert(header::USER_AGENT, user_agent);

        if let Some(token) = &self.private_token {
            let mut value = HeaderValue::from_str(token).map_err(|_| {
                GitLabError::Config("private token is not a valid header value".to_owned())
            })?;
            value.set_sensitive(true);
            headers.insert(HeaderName::from_static(PRIVATE_TOKEN_HEADER), value);
        }

        Ok(headers)
    }
}

fn normalize_base_url(url: Option<&str>) -> String {
    match url.map(|url| url.trim_end_matches('/')) {
        Some(url) if !url.is_empty() => url.to_owned(),
        _ => DEFAULT_URL.to_owned(),
    }
}

/// Configures timeout and retry behavior of the request core.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ClientOptions {
    /// Per-request timeout in milliseconds. `None` waits indefinitely.
    pub timeout_ms: Option<u64>,
    /// Retries after a connection failure, used when a request sets none.
    pub max_retries: MaxRetries,
    /// Backoff unit; the n-th retry waits `retry_backoff * 2^n`.
    pub retry_backoff: Duration,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            timeout_ms: None,
            max_retries: MaxRetries::default(),
            retry_backoff: Duration::from_millis(100),
        }
    }
}
