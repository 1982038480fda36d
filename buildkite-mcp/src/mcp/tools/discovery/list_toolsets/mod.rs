//! Toolset browsing tool

use crate::mcp::tool_registry::{BaseToolImpl, McpTool, ToolContext};
use crate::mcp::toolsets::ToolsetRegistry;
use async_trait::async_trait;
use rmcp::model::CallToolResult;
use rmcp::Error as McpError;
use std::sync::Arc;

/// Tool returning the metadata of every registered toolset
pub struct ListToolsetsTool {
    registry: Arc<ToolsetRegistry>,
}

impl ListToolsetsTool {
    /// Creates a new instance over the shared registry
    pub fn new(registry: Arc<ToolsetRegistry>) -> Self {
        Self { registry }
    }
}

#[async_trait]
impl McpTool for ListToolsetsTool {
    fn name(&self) -> &str {
        "list_toolsets"
    }

    fn description(&self) -> &str {
        include_str!("description.md")
    }

    fn schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {}
        })
    }

    fn read_only_hint(&self) -> Option<bool> {
        Some(true)
    }

    async fn execute(
        &self,
        _arguments: serde_json::Map<String, serde_json::Value>,
        _context: &ToolContext,
    ) -> std::result::Result<CallToolResult, McpError> {
        let metadata = self.registry.get_metadata();
        Ok(BaseToolImpl::create_json_response(
            &metadata,
            "toolset metadata",
        ))
    }
}
