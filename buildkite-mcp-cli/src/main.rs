use std::process;

use buildkite_mcp_cli::cli::{Cli, Commands};
use buildkite_mcp_cli::error::handle_cli_result;
use buildkite_mcp_cli::exit_codes::EXIT_SUCCESS;
use buildkite_mcp_cli::{http_server, logging, serve, tools_cmd};
use clap::CommandFactory;

#[tokio::main]
async fn main() {
    let cli = Cli::parse_args();

    let Some(command) = cli.command else {
        if let Err(e) = Cli::command().print_help() {
            eprintln!("Failed to print help: {e}");
        }
        process::exit(EXIT_SUCCESS);
    };

    logging::init(logging::log_level(cli.quiet, cli.debug, cli.verbose));

    let exit_code = match command {
        Commands::Stdio { api, toolsets } => {
            tracing::info!(version = buildkite_mcp::VERSION, "Starting MCP server");
            handle_cli_result(serve::run_stdio(api, toolsets).await)
        }
        Commands::Http {
            api,
            toolsets,
            http,
        } => {
            tracing::info!(version = buildkite_mcp::VERSION, "Starting MCP server");
            handle_cli_result(http_server::run_http(api, toolsets, http).await)
        }
        Commands::Tools { toolsets } => handle_cli_result(tools_cmd::run_tools(toolsets)),
    };

    process::exit(exit_code);
}
