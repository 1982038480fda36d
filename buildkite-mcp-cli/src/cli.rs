use buildkite_mcp::config::{ServerConfig, DEFAULT_BASE_URL};
use clap::{Args, Parser, Subcommand};

pub const DEFAULT_LISTEN_ADDR: &str = "localhost:3000";

#[derive(Parser, Debug)]
#[command(name = "buildkite-mcp-server")]
#[command(version)]
#[command(about = "An MCP server exposing Buildkite pipelines, builds, logs and tests")]
#[command(long_about = "
buildkite-mcp-server is an MCP (Model Context Protocol) server that gives AI
assistants access to Buildkite: pipelines, builds, jobs, logs, artifacts,
annotations, Test Engine and clusters.

Example usage:
  buildkite-mcp-server stdio --api-token bkua_...            # Run as MCP server
  buildkite-mcp-server stdio --enabled-toolsets builds,logs  # Only some toolsets
  buildkite-mcp-server stdio --read-only --dynamic-toolsets  # Read-only, discover tools on demand
  buildkite-mcp-server http --listen 0.0.0.0:3000            # Serve Streamable HTTP at /mcp
")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable debug logging
    #[arg(long, env = "DEBUG", global = true)]
    pub debug: bool,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run as MCP server over stdio
    #[command(long_about = "
Runs the MCP server on stdin/stdout. Logs are written to stderr.

The API token is read from --api-token (BUILDKITE_API_TOKEN), or fetched
with the 1Password CLI from --api-token-from-1password
(BUILDKITE_API_TOKEN_FROM_1PASSWORD). Exactly one must be given.

Example:
  buildkite-mcp-server stdio --api-token-from-1password op://vault/buildkite/token
")]
    Stdio {
        #[command(flatten)]
        api: ApiArgs,

        #[command(flatten)]
        toolsets: ToolsetArgs,
    },
    /// Run as MCP server over HTTP
    #[command(long_about = "
Runs the MCP server over Streamable HTTP at /mcp, or over the older SSE
transport at /sse with --use-sse. GET /health always answers 200.

When --auth-token (BUILDKITE_MCP_AUTH_TOKEN) is set, MCP requests must carry
'Authorization: Bearer <token>'.

Example:
  buildkite-mcp-server http --listen 0.0.0.0:3000 --auth-token s3cret --trust-proxy
")]
    Http {
        #[command(flatten)]
        api: ApiArgs,

        #[command(flatten)]
        toolsets: ToolsetArgs,

        #[command(flatten)]
        http: HttpArgs,
    },
    /// List available tools as JSON, one per line
    #[command(hide = true)]
    Tools {
        #[command(flatten)]
        toolsets: ToolsetArgs,
    },
}

/// Buildkite API connection flags
#[derive(Args, Debug, Clone)]
pub struct ApiArgs {
    /// The Buildkite API token to use
    #[arg(long, env = "BUILDKITE_API_TOKEN", hide_env_values = true)]
    pub api_token: Option<String>,

    /// The 1Password item to read the Buildkite API token from. Format: 'op://vault/item/field'
    #[arg(long = "api-token-from-1password", env = "BUILDKITE_API_TOKEN_FROM_1PASSWORD")]
    pub api_token_from_1password: Option<String>,

    /// The base URL of the Buildkite API to use
    #[arg(long, env = "BUILDKITE_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Additional HTTP header to send with every request. Format: 'Key: Value'
    #[arg(long = "http-header", env = "BUILDKITE_HTTP_HEADERS", value_delimiter = ',')]
    pub http_headers: Vec<String>,
}

/// HTTP transport flags
#[derive(Args, Debug, Clone)]
pub struct HttpArgs {
    /// The address to listen on
    #[arg(long, env = "HTTP_LISTEN_ADDR", default_value = DEFAULT_LISTEN_ADDR)]
    pub listen: String,

    /// Use the deprecated SSE transport instead of Streamable HTTP
    #[arg(long)]
    pub use_sse: bool,

    /// Optional token clients must send as 'Authorization: Bearer <token>'
    #[arg(long, env = "BUILDKITE_MCP_AUTH_TOKEN", hide_env_values = true)]
    pub auth_token: Option<String>,

    /// Trust X-Forwarded-For and other proxy headers for client IP logging. Only enable behind a trusted reverse proxy.
    #[arg(long, env = "BUILDKITE_TRUST_PROXY")]
    pub trust_proxy: bool,
}

/// Tool selection flags
#[derive(Args, Debug, Clone)]
pub struct ToolsetArgs {
    /// Comma-separated list of toolsets to enable (e.g., 'pipelines,builds,clusters'). Use 'all' to enable all toolsets.
    #[arg(
        long,
        env = "BUILDKITE_TOOLSETS",
        value_delimiter = ',',
        default_value = "all"
    )]
    pub enabled_toolsets: Vec<String>,

    /// Only expose tools that do not modify anything
    #[arg(long, env = "BUILDKITE_READ_ONLY")]
    pub read_only: bool,

    /// Advertise only core tools plus list_toolsets and search_tools; other tools are found by search
    #[arg(long, env = "BUILDKITE_DYNAMIC_TOOLSETS")]
    pub dynamic_toolsets: bool,
}

impl ToolsetArgs {
    pub fn server_config(&self) -> ServerConfig {
        ServerConfig::default()
            .with_toolsets(self.enabled_toolsets.iter().map(|name| name.trim()))
            .with_read_only(self.read_only)
            .with_dynamic_toolsets(self.dynamic_toolsets)
    }
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    pub fn try_parse_from_args<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        <Self as Parser>::try_parse_from(args)
    }
}
