//! Model Context Protocol (MCP) server support

pub mod guides;
pub mod search;
pub mod server;
pub mod tool_registry;
pub mod tools;
pub mod toolsets;

pub use search::{MatchLocation, SearchResult};
pub use server::{assemble_tools, McpServer};
pub use tool_registry::{BaseToolImpl, McpTool, ToolContext, ToolDefinition};
pub use tools::{builtin_registry, create_builtin_toolsets};
pub use toolsets::{
    is_valid_toolset, RegistryError, Toolset, ToolsetMetadata, ToolsetRegistry, TOOLSET_ALL,
    VALID_TOOLSETS,
};
