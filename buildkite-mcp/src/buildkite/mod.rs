//! Buildkite REST API seam
//!
//! Tools never talk HTTP directly. They describe the call as an [`ApiRequest`]
//! and hand it to a [`BuildkiteApi`], which keeps tool code testable against an
//! in-memory implementation.

mod client;

pub use client::{user_agent, HttpBuildkiteClient};

use crate::mcp::tool_registry::BaseToolImpl;
use rmcp::model::CallToolResult;
use serde_json::Value;
use thiserror::Error;

/// HTTP verbs used by the Buildkite REST API
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    /// Read a resource
    Get,
    /// Create a resource
    Post,
    /// Replace or trigger an action on a resource
    Put,
    /// Partially update a resource
    Patch,
}

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Patch => reqwest::Method::PATCH,
        }
    }
}

/// A single call against the REST API, relative to the configured base URL
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    /// HTTP verb
    pub method: HttpMethod,
    /// Unencoded path segments, e.g. `["v2", "organizations", "acme", "pipelines"]`
    pub segments: Vec<String>,
    /// Query string pairs in insertion order
    pub query: Vec<(String, String)>,
    /// JSON request body
    pub body: Option<Value>,
}

impl ApiRequest {
    /// Create a request with no query string or body
    pub fn new<I, S>(method: HttpMethod, segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            method,
            segments: segments.into_iter().map(Into::into).collect(),
            query: Vec::new(),
            body: None,
        }
    }

    /// Create a GET request
    pub fn get<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(HttpMethod::Get, segments)
    }

    /// Append a query string pair
    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Attach a JSON body
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// The request path joined with `/`, for logging
    pub fn path(&self) -> String {
        self.segments.join("/")
    }
}

/// Errors returned by the Buildkite API seam
#[derive(Debug, Error)]
pub enum ApiError {
    /// The token was rejected (HTTP 401)
    #[error("Buildkite API rejected the token (HTTP 401)")]
    Unauthorized,

    /// The token lacks a required scope (HTTP 403)
    #[error("Buildkite API denied access (HTTP 403): {detail}")]
    Forbidden {
        /// Response body returned by the API
        detail: String,
    },

    /// Any other non-success status
    #[error("Buildkite API returned HTTP {status}: {body}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Raw response body
        body: String,
    },

    /// The request never produced a response
    #[error("Request to Buildkite API failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The response body was not valid JSON
    #[error("Failed to decode Buildkite API response: {0}")]
    Decode(#[from] serde_json::Error),

    /// A URL could not be built or parsed
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// A download URL points somewhere other than the API host
    #[error("Refusing to download from {0}: only the Buildkite API host receives the token")]
    ForeignHost(String),

    /// A configured header name or value is not valid HTTP
    #[error("Invalid HTTP header '{0}'")]
    InvalidHeader(String),
}

impl ApiError {
    /// Classify a non-success HTTP status
    pub fn from_status(status: u16, body: String) -> Self {
        match status {
            401 => ApiError::Unauthorized,
            403 => ApiError::Forbidden { detail: body },
            _ => ApiError::Status { status, body },
        }
    }

    /// Message shown to the calling assistant when a tool call fails
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Unauthorized => "Authentication failed: Your API token is invalid or has expired. \
                 Please check your BUILDKITE_API_TOKEN and ensure it's still valid."
                .to_string(),
            ApiError::Forbidden { detail } => format!(
                "Permission denied: Your API token doesn't have the required permissions for this operation. {detail}"
            )
            .trim_end()
            .to_string(),
            ApiError::Status { body, .. } if !body.is_empty() => body.clone(),
            other => other.to_string(),
        }
    }

    /// Error result returned to the client instead of failing the call
    pub fn into_tool_result(self) -> CallToolResult {
        tracing::debug!(error = %self, "Buildkite API call failed");
        BaseToolImpl::create_error_response(self.user_message(), None)
    }
}

/// The operations tools need from the Buildkite platform
#[async_trait::async_trait]
pub trait BuildkiteApi: Send + Sync {
    /// Perform a JSON request. An empty response body decodes to `Value::Null`.
    async fn send(&self, request: ApiRequest) -> Result<Value, ApiError>;

    /// Download raw bytes from an absolute URL (artifact downloads)
    async fn download(&self, url: &str) -> Result<Vec<u8>, ApiError>;
}
