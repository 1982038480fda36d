//! # Buildkite MCP
//!
//! Exposes Buildkite pipelines, builds, jobs, logs and tests to AI assistants
//! through the Model Context Protocol.
//!
//! ## Features
//!
//! - **Toolsets**: Tools are grouped into named categories (`builds`, `logs`, ...)
//! - **Selection**: Enable a subset of toolsets, or restrict everything to read-only tools
//! - **Discovery**: `list_toolsets` and `search_tools` let a client find tools at runtime
//!   instead of loading the full catalog up front
//! - **MCP Support**: An `rmcp` server handler that dispatches tool calls and
//!   serves a prompt and a log debugging guide
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use buildkite_mcp::config::ServerConfig;
//! use buildkite_mcp::mcp::builtin_registry;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let registry = builtin_registry()?;
//! let config = ServerConfig::default().with_toolsets(["builds", "logs"]).with_read_only(true);
//! config.validate()?;
//!
//! for tool in registry.get_enabled_tools(&config.enabled_toolsets, config.read_only) {
//!     println!("{}", tool.name());
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

/// Buildkite REST API client seam
pub mod buildkite;

/// Server and API configuration
pub mod config;

/// Job log normalization and paging
pub mod logs;

/// Model Context Protocol (MCP) server support
pub mod mcp;

#[cfg(test)]
pub(crate) mod test_utils;

pub use buildkite::{ApiError, ApiRequest, BuildkiteApi, HttpBuildkiteClient, HttpMethod};
pub use config::{ApiConfig, ConfigError, ServerConfig};
pub use mcp::{
    McpServer, McpTool, SearchResult, ToolContext, ToolDefinition, Toolset, ToolsetMetadata,
    ToolsetRegistry,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Error types used throughout the library
pub mod error {
    use thiserror::Error;

    /// Main error type for the library
    #[derive(Debug, Error)]
    pub enum BuildkiteMcpError {
        /// Invalid startup configuration
        #[error("Configuration error: {0}")]
        Config(#[from] crate::config::ConfigError),

        /// Toolset registration failed
        #[error("Registry error: {0}")]
        Registry(#[from] crate::mcp::RegistryError),

        /// Buildkite API call failed
        #[error("API error: {0}")]
        Api(#[from] crate::buildkite::ApiError),

        /// JSON serialization/deserialization error
        #[error("JSON error: {0}")]
        Json(#[from] serde_json::Error),

        /// Other errors
        #[error("{0}")]
        Other(String),
    }

    /// Result type alias
    pub type Result<T> = std::result::Result<T, BuildkiteMcpError>;
}

pub use error::{BuildkiteMcpError, Result};
