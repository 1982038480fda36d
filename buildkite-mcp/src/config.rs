//! Configuration management for the Buildkite MCP server
//!
//! Startup configuration is validated strictly: an unknown toolset name stops
//! the server from starting. Registry queries made after startup stay lenient
//! and silently skip unknown names.

use crate::mcp::toolsets::{is_valid_toolset, TOOLSET_ALL};
use thiserror::Error;
use url::Url;

/// Default Buildkite REST API endpoint
pub const DEFAULT_BASE_URL: &str = "https://api.buildkite.com/";

/// Errors that can occur while building configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// One or more requested toolsets do not exist
    #[error("invalid toolset names: {}", .names.join(", "))]
    InvalidToolsets {
        /// Every name that failed validation, in the order supplied
        names: Vec<String>,
    },

    /// Both a literal token and a 1Password reference were supplied
    #[error("cannot specify both --api-token and --api-token-from-1password")]
    ConflictingTokenSources,

    /// No token source was supplied
    #[error("must specify either --api-token or --api-token-from-1password")]
    MissingToken,

    /// A header was not in `Key: Value` form
    #[error("Invalid HTTP header '{header}': expected 'Key: Value'")]
    InvalidHeader {
        /// The header as supplied
        header: String,
    },

    /// The API base URL could not be parsed
    #[error("Invalid base URL '{value}': {source}")]
    InvalidBaseUrl {
        /// The URL as supplied
        value: String,
        /// Underlying parse error
        #[source]
        source: url::ParseError,
    },
}

/// Which tools a server instance exposes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Toolset names to enable; `"all"` enables every registered toolset
    pub enabled_toolsets: Vec<String>,
    /// Only expose tools annotated as read-only
    pub read_only: bool,
    /// Add the discovery tools and honour per-tool deferred loading
    pub dynamic_toolsets: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            enabled_toolsets: vec![TOOLSET_ALL.to_string()],
            read_only: false,
            dynamic_toolsets: false,
        }
    }
}

impl ServerConfig {
    /// Replace the enabled toolset list
    pub fn with_toolsets<I, S>(mut self, toolsets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.enabled_toolsets = toolsets.into_iter().map(Into::into).collect();
        self
    }

    /// Enable or disable read-only mode
    pub fn with_read_only(mut self, read_only: bool) -> Self {
        self.read_only = read_only;
        self
    }

    /// Enable or disable dynamic tool discovery
    pub fn with_dynamic_toolsets(mut self, dynamic_toolsets: bool) -> Self {
        self.dynamic_toolsets = dynamic_toolsets;
        self
    }

    /// Reject unknown toolset names
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_toolsets(&self.enabled_toolsets)
    }
}

/// Check that every name is a known toolset or the `"all"` sentinel
pub fn validate_toolsets<S: AsRef<str>>(names: &[S]) -> Result<(), ConfigError> {
    let invalid: Vec<String> = names
        .iter()
        .map(AsRef::as_ref)
        .filter(|name| !is_valid_toolset(name))
        .map(str::to_string)
        .collect();

    if invalid.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::InvalidToolsets { names: invalid })
    }
}

/// Connection settings for the Buildkite REST API
#[derive(Clone)]
pub struct ApiConfig {
    /// API access token
    pub token: String,
    /// API base URL
    pub base_url: Url,
    /// Extra headers sent with every request
    pub headers: Vec<(String, String)>,
}

impl std::fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiConfig")
            .field("token", &"<redacted>")
            .field("base_url", &self.base_url.as_str())
            .field("headers", &self.headers)
            .finish()
    }
}

impl ApiConfig {
    /// Create API settings with no extra headers
    pub fn new(token: impl Into<String>, base_url: &str) -> Result<Self, ConfigError> {
        let base_url = Url::parse(base_url).map_err(|source| ConfigError::InvalidBaseUrl {
            value: base_url.to_string(),
            source,
        })?;
        Ok(Self {
            token: token.into(),
            base_url,
            headers: Vec::new(),
        })
    }

    /// Replace the extra header list
    pub fn with_headers(mut self, headers: Vec<(String, String)>) -> Self {
        self.headers = headers;
        self
    }
}

/// Parse `Key: Value` header strings
pub fn parse_headers<S: AsRef<str>>(raw: &[S]) -> Result<Vec<(String, String)>, ConfigError> {
    raw.iter()
        .map(AsRef::as_ref)
        .filter(|header| !header.trim().is_empty())
        .map(|header| {
            let (key, value) = header
                .split_once(':')
                .ok_or_else(|| ConfigError::InvalidHeader {
                    header: header.to_string(),
                })?;
            let key = key.trim();
            if key.is_empty() {
                return Err(ConfigError::InvalidHeader {
                    header: header.to_string(),
                });
            }
            Ok((key.to_string(), value.trim().to_string()))
        })
        .collect()
}
