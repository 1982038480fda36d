//! The `http` command: MCP over Streamable HTTP or SSE

use crate::cli::{ApiArgs, HttpArgs, ToolsetArgs};
use crate::error::{CliError, CliResult, IntoCliResult};
use crate::exit_codes::EXIT_ERROR;
use crate::http_layers::{client_ip, log_requests, require_bearer};
use crate::serve::{build_server, shutdown_token};
use axum::{http::StatusCode, middleware, routing::get, Router};
use buildkite_mcp::McpServer;
use rmcp::transport::sse_server::{SseServer, SseServerConfig};
use rmcp::transport::streamable_http_server::session::local::LocalSessionManager;
use rmcp::transport::{StreamableHttpServerConfig, StreamableHttpService};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

pub const HEALTH_PATH: &str = "/health";
pub const MCP_PATH: &str = "/mcp";
pub const SSE_PATH: &str = "/sse";
pub const SSE_MESSAGE_PATH: &str = "/message";

async fn health() -> StatusCode {
    StatusCode::OK
}

/// Streamable HTTP endpoint at [`MCP_PATH`], one session per client
pub fn streamable_routes(server: McpServer) -> Router {
    let service = StreamableHttpService::new(
        move || Ok(server.clone()),
        Arc::new(LocalSessionManager::default()),
        StreamableHttpServerConfig::default(),
    );
    Router::new().route_service(MCP_PATH, service)
}

/// SSE stream at [`SSE_PATH`] with messages posted to [`SSE_MESSAGE_PATH`]
pub fn sse_routes(server: McpServer, bind: SocketAddr, ct: CancellationToken) -> Router {
    let (sse, router) = SseServer::new(SseServerConfig {
        bind,
        sse_path: SSE_PATH.to_string(),
        post_path: SSE_MESSAGE_PATH.to_string(),
        ct,
        sse_keep_alive: None,
    });
    sse.with_service(move || server.clone());
    router
}

/// Wrap the MCP routes in the middleware stack and add [`HEALTH_PATH`].
///
/// The health check sits outside the middleware and never needs a token.
pub fn app(mcp: Router, auth_token: Option<&str>, trust_proxy: bool) -> Router {
    let mut mcp = mcp;
    if let Some(token) = auth_token.filter(|token| !token.is_empty()) {
        mcp = mcp.layer(middleware::from_fn_with_state(
            Arc::<str>::from(token),
            require_bearer,
        ));
    }
    let mcp = mcp
        .layer(middleware::from_fn(log_requests))
        .layer(middleware::from_fn_with_state(trust_proxy, client_ip));

    Router::new().route(HEALTH_PATH, get(health)).merge(mcp)
}

/// Serve MCP over HTTP until Ctrl-C
pub async fn run_http(api: ApiArgs, toolsets: ToolsetArgs, http: HttpArgs) -> CliResult<()> {
    let (server, api_config) = build_server(&api, &toolsets).await?;

    let listener = TcpListener::bind(&http.listen).await.map_err(|e| CliError {
        message: format!("Failed to listen on {}: {e}", http.listen),
        exit_code: EXIT_ERROR,
        source: Some(Box::new(e)),
    })?;
    let local_addr = listener.local_addr().cli_runtime_error()?;
    let ct = shutdown_token();

    let (routes, transport, endpoint) = if http.use_sse {
        (
            sse_routes(server, local_addr, ct.child_token()),
            "sse",
            SSE_PATH,
        )
    } else {
        (streamable_routes(server), "streamable-http", MCP_PATH)
    };
    let router = app(routes, http.auth_token.as_deref(), http.trust_proxy);

    tracing::info!(
        base_url = %api_config.base_url,
        address = %local_addr,
        transport,
        endpoint = %format!("http://{local_addr}{endpoint}"),
        auth = http.auth_token.as_deref().is_some_and(|token| !token.is_empty()),
        trust_proxy = http.trust_proxy,
        "Starting MCP HTTP server"
    );

    axum::serve(
        listener,
        router.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(ct.clone().cancelled_owned())
    .await
    .cli_runtime_error()?;

    ct.cancel();
    tracing::info!("MCP HTTP server exited successfully");
    Ok(())
}
