//! `gitlaber` is a minimal async client for the GitLab REST API (v4).
//!
//! - [`GitLab::http_request`] sends one request, retrying connection
//!   failures with exponential backoff and rejecting non-2xx responses.
//! - [`GitLab::http_get`] / [`GitLab::http_put`] are thin verb helpers.
//! - [`ProjectMergeRequest`] reads and adds merge request labels.
//! - [`GitLabConfig`] loads credentials from an INI file (`gitlaber.cfg`).

mod client;
mod config;
mod error;
mod merge_request;
mod options;
mod request;
mod retry;

pub use client::{is_success, GitLab};
pub use config::{GitLabConfig, DEFAULT_CONFIG_FILE, DEFAULT_SECTION};
pub use error::GitLabError;
pub use merge_request::{MergeRequest, ProjectMergeRequest};
pub use options::{ClientConfig, ClientOptions, API_PATH, DEFAULT_URL, USER_AGENT};
pub use request::{GetOptions, GetResponse, HttpRequest, Payload, Query};
pub use retry::{backoff_delay, MaxRetries, RetryState};

pub type Result<T> = std::result::Result<T, GitLabError>;
