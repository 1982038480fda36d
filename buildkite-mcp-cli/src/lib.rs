//! Buildkite MCP server command line
//!
//! Argument parsing, logging setup, API token resolution and the commands
//! behind the `buildkite-mcp-server` binary.

/// Buildkite API token resolution
pub mod api_token;
/// Command-line interface definitions and argument parsing
pub mod cli;
/// Errors carrying process exit codes
pub mod error;
/// Exit codes used by the CLI application
pub mod exit_codes;
/// Middleware for the HTTP transport
pub mod http_layers;
/// The `http` serving command
pub mod http_server;
/// stderr logging setup
pub mod logging;
/// The `stdio` serving command
pub mod serve;
/// The hidden `tools` listing command
pub mod tools_cmd;
