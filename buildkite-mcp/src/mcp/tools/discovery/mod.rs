//! Tools for browsing and searching the registry at runtime
//!
//! These are not registered in any toolset. In dynamic mode the server
//! prepends them to the tool list so a client can find deferred tools.

pub mod list_toolsets;
pub mod search_tools;

use crate::mcp::tool_registry::ToolDefinition;
use crate::mcp::toolsets::ToolsetRegistry;
use std::sync::Arc;

pub use list_toolsets::ListToolsetsTool;
pub use search_tools::SearchToolsTool;

/// `list_toolsets` and `search_tools` over the shared registry, in that order
pub fn discovery_tools(registry: Arc<ToolsetRegistry>) -> Vec<ToolDefinition> {
    vec![
        ToolDefinition::new(ListToolsetsTool::new(registry.clone())),
        ToolDefinition::new(SearchToolsTool::new(registry)),
    ]
}
