//! The hidden `tools` command

use crate::cli::ToolsetArgs;
use crate::error::{CliResult, IntoCliResult};
use buildkite_mcp::config::ServerConfig;
use buildkite_mcp::mcp::{assemble_tools, builtin_registry};
use std::sync::Arc;

/// One JSON document per tool the server would expose
pub fn render_tools(config: &ServerConfig) -> CliResult<Vec<String>> {
    config.validate().cli_config_error()?;
    let registry = Arc::new(builtin_registry().cli_runtime_error()?);

    assemble_tools(&registry, config)
        .iter()
        .map(|tool| {
            let mut value = serde_json::to_value(tool.tool()).cli_runtime_error()?;
            if tool.defer_loading() {
                if let Some(object) = value.as_object_mut() {
                    object.insert("defer_loading".to_string(), serde_json::Value::Bool(true));
                }
            }
            serde_json::to_string(&value).cli_runtime_error()
        })
        .collect()
}

/// Print the tool list to stdout
pub fn run_tools(toolsets: ToolsetArgs) -> CliResult<()> {
    for line in render_tools(&toolsets.server_config())? {
        println!("{line}");
    }
    Ok(())
}
