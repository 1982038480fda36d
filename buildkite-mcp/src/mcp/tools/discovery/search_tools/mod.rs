//! Keyword tool search

use crate::mcp::search::MatchLocation;
use crate::mcp::tool_registry::{BaseToolImpl, McpTool, ToolContext};
use crate::mcp::toolsets::ToolsetRegistry;
use async_trait::async_trait;
use rmcp::model::CallToolResult;
use rmcp::Error as McpError;
use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;
use std::sync::Arc;

/// Maximum number of tools returned by one search
pub const SEARCH_LIMIT: NonZeroUsize = match NonZeroUsize::new(10) {
    Some(limit) => limit,
    None => panic!("search limit must be non-zero"),
};

const NO_RESULTS: &str = r#"{"results":[],"message":"No tools found. Try: 'build', 'pipeline', 'artifact', 'log', 'test', 'cluster'"}"#;

/// Request structure for searching tools
#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SearchToolsRequest {
    /// Search query (e.g., 'pipeline', 'artifact', 'log analysis')
    pub query: String,
}

#[derive(Debug, Serialize)]
struct SearchHit<'a> {
    name: &'a str,
    description: &'a str,
    toolset: &'a str,
    read_only: bool,
    matched_in: MatchLocation,
    required_scopes: &'a [String],
    input_schema: &'a serde_json::Map<String, serde_json::Value>,
}

/// Tool that finds other tools by keyword
pub struct SearchToolsTool {
    registry: Arc<ToolsetRegistry>,
}

impl SearchToolsTool {
    /// Creates a new instance over the shared registry
    pub fn new(registry: Arc<ToolsetRegistry>) -> Self {
        Self { registry }
    }
}

#[async_trait]
impl McpTool for SearchToolsTool {
    fn name(&self) -> &str {
        "search_tools"
    }

    fn description(&self) -> &str {
        include_str!("description.md")
    }

    fn schema(&self) -> serde_json::Value {
        serde_json::to_value(schemars::schema_for!(SearchToolsRequest))
            .unwrap_or_else(|_| serde_json::json!({"type": "object"}))
    }

    fn read_only_hint(&self) -> Option<bool> {
        Some(true)
    }

    async fn execute(
        &self,
        arguments: serde_json::Map<String, serde_json::Value>,
        _context: &ToolContext,
    ) -> std::result::Result<CallToolResult, McpError> {
        let request: SearchToolsRequest = BaseToolImpl::parse_arguments(arguments)?;
        let results = self
            .registry
            .search_tools_with_metadata(&request.query, SEARCH_LIMIT);

        tracing::debug!(query = %request.query, hits = results.len(), "Searched tools");

        if results.is_empty() {
            return Ok(BaseToolImpl::create_success_response(NO_RESULTS));
        }

        let hits: Vec<SearchHit<'_>> = results
            .iter()
            .map(|result| SearchHit {
                name: result.tool.name(),
                description: result.tool.summary(),
                toolset: result.toolset_name,
                read_only: result.read_only,
                matched_in: result.matched_in,
                required_scopes: result.required_scopes,
                input_schema: result.tool.input_schema(),
            })
            .collect();

        Ok(BaseToolImpl::create_json_response(&hits, "search results"))
    }
}
