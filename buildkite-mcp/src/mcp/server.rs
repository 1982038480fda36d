//! MCP server handler
//!
//! The server's tool list is computed once from the registry and the
//! [`ServerConfig`]. It never changes while serving, so `list_tools` and
//! `call_tool` only read it.

use super::guides;
use super::tool_registry::{ToolContext, ToolDefinition};
use super::tools::discovery::discovery_tools;
use super::toolsets::ToolsetRegistry;
use crate::buildkite::BuildkiteApi;
use crate::config::{ConfigError, ServerConfig};
use rmcp::model::*;
use rmcp::service::RequestContext;
use rmcp::{Error as McpError, RoleServer, ServerHandler};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

const SERVER_NAME: &str = "buildkite-mcp-server";

const INSTRUCTIONS: &str = "Tools for the Buildkite CI/CD platform: pipelines, builds, jobs, logs, artifacts, Test Engine and clusters. Use list_builds and get_build to inspect builds, and the log tools to find why a job failed. When list_toolsets and search_tools are available, more tools exist than are listed: search for them by keyword and call them by name.";

/// Compute the tools a server exposes.
///
/// In dynamic mode the discovery tools come first. The deferred-loading
/// flag of each tool is kept only in dynamic mode and cleared otherwise.
/// When two tools share a name the first one wins.
pub fn assemble_tools(registry: &Arc<ToolsetRegistry>, config: &ServerConfig) -> Vec<ToolDefinition> {
    let mut candidates = Vec::new();
    if config.dynamic_toolsets {
        candidates.extend(discovery_tools(registry.clone()));
    }
    candidates.extend(
        registry
            .get_enabled_tools(&config.enabled_toolsets, config.read_only)
            .into_iter()
            .cloned(),
    );

    let mut seen = HashSet::new();
    let tools: Vec<ToolDefinition> = candidates
        .into_iter()
        .filter(|tool| seen.insert(tool.name().to_string()))
        .map(|tool| {
            let defer_loading = config.dynamic_toolsets && tool.defer_loading();
            tool.with_defer_loading(defer_loading)
        })
        .collect();

    let required_scopes =
        registry.get_required_scopes(&config.enabled_toolsets, config.read_only);
    tracing::info!(
        enabled_toolsets = ?config.enabled_toolsets,
        read_only = config.read_only,
        dynamic_toolsets = config.dynamic_toolsets,
        tool_count = tools.len(),
        required_scopes = ?required_scopes,
        "Assembled server tools"
    );

    tools
}

/// MCP server exposing Buildkite tools
#[derive(Clone)]
pub struct McpServer {
    tools: Arc<Vec<ToolDefinition>>,
    index: Arc<HashMap<String, usize>>,
    context: ToolContext,
    config: ServerConfig,
}

impl McpServer {
    /// Create a server over a populated registry.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration names an unknown toolset.
    pub fn new(
        registry: Arc<ToolsetRegistry>,
        config: ServerConfig,
        api: Arc<dyn BuildkiteApi>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let tools = assemble_tools(&registry, &config);
        let index = tools
            .iter()
            .enumerate()
            .map(|(i, tool)| (tool.name().to_string(), i))
            .collect();

        Ok(Self {
            tools: Arc::new(tools),
            index: Arc::new(index),
            context: ToolContext::new(api),
            config,
        })
    }

    /// Every callable tool, deferred or not
    pub fn tools(&self) -> &[ToolDefinition] {
        &self.tools
    }

    /// Tools returned by `list_tools`: everything not deferred
    pub fn advertised_tools(&self) -> Vec<Tool> {
        self.tools
            .iter()
            .filter(|tool| !tool.defer_loading())
            .map(|tool| tool.tool().clone())
            .collect()
    }

    /// Look up a callable tool by name
    pub fn get_tool(&self, name: &str) -> Option<&ToolDefinition> {
        self.index.get(name).map(|&i| &self.tools[i])
    }

    /// The configuration the server was built with
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Execute a tool by name
    pub async fn call(
        &self,
        name: &str,
        arguments: serde_json::Map<String, serde_json::Value>,
    ) -> std::result::Result<CallToolResult, McpError> {
        let Some(tool) = self.get_tool(name) else {
            return Err(McpError::invalid_request(
                format!("Unknown tool: {name}"),
                None,
            ));
        };

        tracing::debug!(tool = name, "Calling tool");
        tool.handler().execute(arguments, &self.context).await
    }

    /// Render a prompt by name
    pub fn prompt(&self, name: &str) -> std::result::Result<GetPromptResult, McpError> {
        guides::get_prompt(name)
            .ok_or_else(|| McpError::invalid_params(format!("Unknown prompt: {name}"), None))
    }

    /// Read a resource by URI
    pub fn resource(&self, uri: &str) -> std::result::Result<ReadResourceResult, McpError> {
        guides::read_resource(uri)
            .ok_or_else(|| McpError::resource_not_found(format!("Unknown resource: {uri}"), None))
    }
}

impl ServerHandler for McpServer {
    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> std::result::Result<ListToolsResult, McpError> {
        Ok(ListToolsResult {
            tools: self.advertised_tools(),
            next_cursor: None,
        })
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> std::result::Result<CallToolResult, McpError> {
        self.call(&request.name, request.arguments.unwrap_or_default())
            .await
    }

    async fn list_prompts(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> std::result::Result<ListPromptsResult, McpError> {
        Ok(ListPromptsResult {
            prompts: guides::list_prompts(),
            next_cursor: None,
        })
    }

    async fn get_prompt(
        &self,
        request: GetPromptRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> std::result::Result<GetPromptResult, McpError> {
        self.prompt(&request.name)
    }

    async fn list_resources(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> std::result::Result<ListResourcesResult, McpError> {
        Ok(ListResourcesResult {
            resources: guides::list_resources(),
            next_cursor: None,
        })
    }

    async fn read_resource(
        &self,
        request: ReadResourceRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> std::result::Result<ReadResourceResult, McpError> {
        self.resource(&request.uri)
    }

    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::default(),
            capabilities: ServerCapabilities {
                prompts: Some(PromptsCapability {
                    list_changed: Some(false),
                }),
                tools: Some(ToolsCapability {
                    list_changed: Some(false),
                }),
                resources: Some(ResourcesCapability {
                    subscribe: Some(false),
                    list_changed: Some(false),
                }),
                logging: None,
                completions: None,
                experimental: None,
            },
            server_info: Implementation {
                name: SERVER_NAME.into(),
                version: crate::VERSION.into(),
            },
            instructions: Some(INSTRUCTIONS.into()),
        }
    }
}
