//! The `stdio` command and server setup shared with `http`

use crate::api_token::resolve_api_token;
use crate::cli::{ApiArgs, ToolsetArgs};
use crate::error::{CliError, CliResult, IntoCliResult};
use crate::exit_codes::EXIT_WARNING;
use buildkite_mcp::buildkite::user_agent;
use buildkite_mcp::config::{parse_headers, ApiConfig};
use buildkite_mcp::mcp::builtin_registry;
use buildkite_mcp::{HttpBuildkiteClient, McpServer};
use rmcp::serve_server;
use rmcp::transport::io::stdio;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Resolve the token, build the API client and assemble the server
pub(crate) async fn build_server(
    api: &ApiArgs,
    toolsets: &ToolsetArgs,
) -> CliResult<(McpServer, ApiConfig)> {
    let config = toolsets.server_config();
    config.validate().cli_config_error()?;

    let token = resolve_api_token(
        api.api_token.as_deref(),
        api.api_token_from_1password.as_deref(),
    )
    .await?;
    let headers = parse_headers(&api.http_headers).cli_config_error()?;
    let api_config = ApiConfig::new(token, &api.base_url)
        .cli_config_error()?
        .with_headers(headers);

    let client = HttpBuildkiteClient::new(&api_config, &user_agent(buildkite_mcp::VERSION))
        .cli_config_error()?;
    let registry = Arc::new(builtin_registry().cli_runtime_error()?);
    let server = McpServer::new(registry, config, Arc::new(client)).cli_config_error()?;

    Ok((server, api_config))
}

/// Cancelled on Ctrl-C
pub(crate) fn shutdown_token() -> CancellationToken {
    let ct = CancellationToken::new();
    let ct_signal = ct.clone();
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!("Failed to listen for ctrl+c: {}", e);
            return;
        }
        tracing::info!("Shutdown signal received");
        ct_signal.cancel();
    });
    ct
}

/// Serve MCP over stdin/stdout until the client disconnects or Ctrl-C
pub async fn run_stdio(api: ApiArgs, toolsets: ToolsetArgs) -> CliResult<()> {
    let (server, api_config) = build_server(&api, &toolsets).await?;

    tracing::info!(base_url = %api_config.base_url, "Starting MCP server over stdio");

    let ct = shutdown_token();

    let running = serve_server(server, stdio())
        .await
        .map_err(|e| CliError::new(format!("MCP server error: {e}"), EXIT_WARNING))?;

    tokio::select! {
        result = running.waiting() => {
            result.cli_runtime_error()?;
            tracing::info!("MCP client disconnected");
        }
        _ = ct.cancelled() => {
            tracing::info!("MCP server exited successfully");
        }
    }

    Ok(())
}
