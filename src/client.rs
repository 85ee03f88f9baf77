use std::fmt;
use std::time::Duration;

use reqwest::{header, Response, StatusCode};
use tokio::time::sleep;

use crate::{
    request::JSON_CONTENT_TYPE, ClientConfig, ClientOptions, GetOptions, GetResponse,
    GitLabConfig, GitLabError, HttpRequest, Payload, Query, Result, RetryState,
};

#[derive(Clone)]
/// HTTP client for the GitLab REST API (`<base_url>/api/v4`).
pub struct GitLab {
    http: reqwest::Client,
    config: ClientConfig,
    headers: header::HeaderMap,
    options: ClientOptions,
}

impl fmt::Debug for GitLab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GitLab")
            .field("config", &self.config)
            .field("options", &self.options)
            .finish()
    }
}

impl GitLab {
    /// Creates a client from connection parameters.
    ///
    /// Fails only when the token or user agent cannot be sent as a header.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let headers = config.headers()?;
        Ok(Self {
            http: reqwest::Client::new(),
            config,
            headers,
            options: ClientOptions::default(),
        })
    }

    /// Creates a client from a loaded configuration file section.
    pub fn from_config(config: &GitLabConfig) -> Result<Self> {
        Self::new(ClientConfig::new(
            Some(&config.url),
            Some(&config.private_token),
        ))
    }

    /// Applies client options such as timeout and retry behavior.
    pub fn with_options(mut self, opts: ClientOptions) -> Self {
        self.options = opts;
        self
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn options(&self) -> &ClientOptions {
        &self.options
    }

    /// Fresh copy of the headers attached to every request.
    pub fn headers(&self) -> header::HeaderMap {
        self.headers.clone()
    }

    /// Absolute URL for an API path.
    ///
    /// Example: `"/projects/1"` → `"https://gitlab.com/api/v4/projects/1"`
    pub fn build_url(&self, path: &str) -> String {
        format!("{}{path}", self.config.api_url())
    }

    /// Executes one logical request.
    ///
    /// Connection failures are retried with exponential backoff until the
    /// request's (or the client's) retry budget runs out. Any response
    /// outside 2xx is returned as [`GitLabError::Api`] without retrying.
    pub async fn http_request(&self, request: HttpRequest) -> Result<Response> {
        let url = self.build_url(&request.path);
        let max_retries = request.max_retries.unwrap_or(self.options.max_retries);

        let mut headers = self.headers();
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static(
                request
                    .payload
                    .as_ref()
                    .map_or(JSON_CONTENT_TYPE, Payload::content_type),
            ),
        );

        let body = request
            .payload
            .as_ref()
            .map(Payload::to_body)
            .transpose()
            .map_err(|err| GitLabError::Decode(format!("payload is not valid JSON: {err}")))?;

        let mut retry = RetryState::new();
        loop {
            #[cfg(feature = "tracing")]
            tracing::debug!(method = %request.method, %url, attempt = retry.attempts(), "sending request");

            let mut builder = self
                .http
                .request(request.method.clone(), &url)
                .headers(headers.clone());
            if !request.query.is_empty() {
                builder = builder.query(request.query.pairs());
            }
            if let Some(body) = &body {
                builder = builder.body(body.clone());
            }
            if let Some(timeout_ms) = self.options.timeout_ms {
                builder = builder.timeout(Duration::from_millis(timeout_ms));
            }

            match builder.send().await {
                Ok(response) => return Self::check_status(response).await,
                Err(err) => {
                    if !is_connection_failure(&err) {
                        return Err(GitLabError::Transport(err));
                    }
                    let Some(delay) = retry.next_delay(max_retries, self.options.retry_backoff)
                    else {
                        #[cfg(feature = "tracing")]
                        tracing::warn!(%url, attempts = retry.attempts(), "giving up after connection failures: {err}");
                        return Err(GitLabError::Transport(err));
                    };

                    #[cfg(feature = "tracing")]
                    tracing::debug!(%url, "connection failed, retrying after {delay:?}: {err}");

                    sleep(delay).await;
                }
            }
        }
    }

    /// Issues a GET request.
    ///
    /// JSON bodies are parsed unless the caller asked for the raw or streamed
    /// response, in which case the response is returned unread.
    pub async fn http_get<Q: Into<Query>>(
        &self,
        path: &str,
        query: Q,
        opts: GetOptions,
    ) -> Result<GetResponse> {
        let response = self
            .http_request(HttpRequest::get(path).query(query))
            .await?;

        if is_json(&response) && !opts.streamed && !opts.raw {
            let body = response.text().await.map_err(GitLabError::Transport)?;
            return serde_json::from_str(&body)
                .map(GetResponse::Json)
                .map_err(|err| {
                    GitLabError::Decode(format!("invalid JSON response: {err}; body: {body}"))
                });
        }

        Ok(GetResponse::Raw(response))
    }

    /// Issues a PUT request. A missing payload is sent as an empty JSON object.
    pub async fn http_put<Q: Into<Query>>(
        &self,
        path: &str,
        query: Q,
        payload: Option<Payload>,
    ) -> Result<Response> {
        let payload = payload.unwrap_or_else(|| Payload::Json(serde_json::json!({})));
        self.http_request(HttpRequest::put(path).query(query).payload(Some(payload)))
            .await
    }

    async fn check_status(response: Response) -> Result<Response> {
        let status = response.status();
        if is_success(status) {
            return Ok(response);
        }

        let body = response.text().await.map_err(GitLabError::Transport)?;

        #[cfg(feature = "tracing")]
        tracing::debug!(status = status.as_u16(), "api returned error status");

        Err(GitLabError::Api {
            status: status.as_u16(),
            body,
        })
    }
}

/// Only 200..=299 counts as success.
pub fn is_success(status: StatusCode) -> bool {
    (200..300).contains(&status.as_u16())
}

/// The connection could not be established or was dropped before any
/// response arrived. Timeouts are not included.
fn is_connection_failure(err: &reqwest::Error) -> bool {
    err.is_connect() || (err.is_request() && !err.is_timeout())
}

fn is_json(response: &Response) -> bool {
    response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .is_some_and(|mime| mime.trim().eq_ignore_ascii_case(JSON_CONTENT_TYPE))
}

#[cfg(test)]
mod tests {
    use reqwest::StatusCode;

    use super::{is_success, GitLab};
    use crate::{ClientConfig, GitLabConfig};

    #[test]
    fn status_boundaries() {
        let status = |code| StatusCode::from_u16(code).unwrap();
        assert!(is_success(status(200)));
        assert!(is_success(status(204)));
        assert!(is_success(status(299)));
        assert!(!is_success(status(199)));
        assert!(!is_success(status(300)));
        assert!(!is_success(status(404)));
        assert!(!is_success(status(500)));
    }

    #[test]
    fn build_url_joins_api_path() {
        let gl = GitLab::new(ClientConfig::new(Some("https://example.com/"), None)).unwrap();
        assert_eq!(
            gl.build_url("/projects/1/merge_requests/2"),
            "https://example.com/api/v4/projects/1/merge_requests/2"
        );
    }

    #[test]
    fn from_config_uses_file_values() {
        let config = GitLabConfig {
            url: "https://git.example.org/".to_owned(),
            private_token: "t0ken".to_owned(),
            project_id: 7,
        };
        let gl = GitLab::from_config(&config).unwrap();
        assert_eq!(gl.config().base_url(), "https://git.example.org");
        assert_eq!(gl.headers()["private-token"], "t0ken");
    }

    #[test]
    fn debug_redacts_token() {
        let gl = GitLab::new(ClientConfig::new(None, Some("secret-token"))).unwrap();
        let debug = format!("{gl:?}");
        assert!(debug.contains("<redacted>"));
        assert!(!debug.contains("secret-token"));
    }
}
