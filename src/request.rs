use reqwest::Method;

use crate::MaxRetries;

pub(crate) const JSON_CONTENT_TYPE: &str = "application/json";
pub(crate) const RAW_CONTENT_TYPE: &str = "application/octet-stream";

/// Request body.
#[derive(Clone, Debug, PartialEq)]
pub enum Payload {
    /// Serialized as a JSON document.
    Json(serde_json::Value),
    /// Sent unmodified as `application/octet-stream`.
    Raw(Vec<u8>),
}

impl Payload {
    /// Picks the encoding from a `raw` flag.
    ///
    /// With `raw` set and a non-empty value the data goes out as bytes:
    /// strings as their UTF-8 text, anything else as its JSON text.
    /// Otherwise the value is sent as a JSON document.
    pub fn from_data(value: serde_json::Value, raw: bool) -> Self {
        if !raw || is_empty(&value) {
            return Self::Json(value);
        }
        match value {
            serde_json::Value::String(text) => Self::Raw(text.into_bytes()),
            other => Self::Raw(other.to_string().into_bytes()),
        }
    }

    pub(crate) fn content_type(&self) -> &'static str {
        match self {
            Self::Json(_) => JSON_CONTENT_TYPE,
            Self::Raw(_) => RAW_CONTENT_TYPE,
        }
    }

    pub(crate) fn to_body(&self) -> Result<Vec<u8>, serde_json::Error> {
        match self {
            Self::Json(value) => serde_json::to_vec(value),
            Self::Raw(bytes) => Ok(bytes.clone()),
        }
    }
}

fn is_empty(value: &serde_json::Value) -> bool {
    match value {
        serde_json::Value::Null => true,
        serde_json::Value::String(text) => text.is_empty(),
        serde_json::Value::Array(items) => items.is_empty(),
        serde_json::Value::Object(map) => map.is_empty(),
        _ => false,
    }
}

impl From<serde_json::Value> for Payload {
    fn from(value: serde_json::Value) -> Self {
        Self::Json(value)
    }
}

impl From<Vec<u8>> for Payload {
    fn from(bytes: Vec<u8>) -> Self {
        Self::Raw(bytes)
    }
}

/// Query string parameters, kept in insertion order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Query(Vec<(String, String)>);

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one `key=value` pair.
    pub fn with(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.0.push((key.into(), value.to_string()));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn pairs(&self) -> &[(String, String)] {
        &self.0
    }
}

impl From<()> for Query {
    fn from(_: ()) -> Self {
        Self::default()
    }
}

impl<K: Into<String>, V: Into<String>> From<Vec<(K, V)>> for Query {
    fn from(pairs: Vec<(K, V)>) -> Self {
        Self(
            pairs
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }
}

impl<K: Into<String>, V: Into<String>, const N: usize> From<[(K, V); N]> for Query {
    fn from(pairs: [(K, V); N]) -> Self {
        Self::from(Vec::from(pairs))
    }
}

/// One logical request against the API.
#[derive(Clone, Debug, PartialEq)]
pub struct HttpRequest {
    /// HTTP verb.
    pub method: Method,
    /// Path appended to `<base_url>/api/v4`, e.g. `/projects/1`.
    pub path: String,
    /// Query string parameters.
    pub query: Query,
    /// Optional request body.
    pub payload: Option<Payload>,
    /// Overrides the client default when set.
    pub max_retries: Option<MaxRetries>,
}

impl HttpRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Query::default(),
            payload: None,
            max_retries: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn query<Q: Into<Query>>(mut self, query: Q) -> Self {
        self.query = query.into();
        self
    }

    pub fn payload(mut self, payload: Option<Payload>) -> Self {
        self.payload = payload;
        self
    }

    pub fn json(self, value: serde_json::Value) -> Self {
        self.payload(Some(Payload::Json(value)))
    }

    pub fn raw(self, bytes: impl Into<Vec<u8>>) -> Self {
        self.payload(Some(Payload::Raw(bytes.into())))
    }

    pub fn max_retries(mut self, max_retries: impl Into<MaxRetries>) -> Self {
        self.max_retries = Some(max_retries.into());
        self
    }
}

/// Response handling switches for [`crate::GitLab::http_get`].
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct GetOptions {
    /// Caller wants to stream the body itself.
    pub streamed: bool,
    /// Caller wants the response object even for JSON bodies.
    pub raw: bool,
}

/// Result of [`crate::GitLab::http_get`].
#[derive(Debug)]
pub enum GetResponse {
    /// Parsed JSON body.
    Json(serde_json::Value),
    /// Untouched response; the body has not been read.
    Raw(reqwest::Response),
}

impl GetResponse {
    pub fn into_json(self) -> Option<serde_json::Value> {
        match self {
            Self::Json(value) => Some(value),
            Self::Raw(_) => None,
        }
    }
}
