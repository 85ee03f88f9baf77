/// Error type returned by this crate.
#[derive(Debug, thiserror::Error)]
pub enum GitLabError {
    /// Network or request execution error from `reqwest`.
    ///
    /// Connection failures only surface here once the retry budget is spent.
    #[error("transport error: {0}")]
    Transport(reqwest::Error),
    /// Non-2xx HTTP status code with raw response body.
    #[error("api error {status}: {body}")]
    Api { status: u16, body: String },
    /// Response body could not be decoded.
    #[error("decode error: {0}")]
    Decode(String),
    /// Missing or invalid configuration (config file, token, user agent).
    #[error("config error: {0}")]
    Config(String),
}

impl GitLabError {
    /// HTTP status code for [`GitLabError::Api`], `None` otherwise.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<::config::ConfigError> for GitLabError {
    fn from(err: ::config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}
