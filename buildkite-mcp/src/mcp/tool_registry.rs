//! Tool descriptors for MCP operations
//!
//! Every callable operation implements [`McpTool`]. At startup each tool is
//! wrapped once into an immutable [`ToolDefinition`] that carries the
//! transport-facing [`Tool`] together with the handler, the Buildkite token
//! scopes it needs and its deferred-loading flag.

use crate::buildkite::BuildkiteApi;
use rmcp::model::{Annotated, CallToolResult, RawContent, RawTextContent, Tool, ToolAnnotations};
use rmcp::Error as McpError;
use serde::Serialize;
use std::sync::Arc;

/// Context shared by all tools during execution
#[derive(Clone)]
pub struct ToolContext {
    /// Buildkite REST API used by endpoint tools
    pub api: Arc<dyn BuildkiteApi>,
}

impl ToolContext {
    /// Create a new tool context
    pub fn new(api: Arc<dyn BuildkiteApi>) -> Self {
        Self { api }
    }
}

/// Trait defining the interface for all MCP tools
#[async_trait::async_trait]
pub trait McpTool: Send + Sync {
    /// Get the tool's name
    fn name(&self) -> &str;

    /// Get the tool's description
    fn description(&self) -> &str;

    /// Get the tool's JSON schema for arguments
    fn schema(&self) -> serde_json::Value;

    /// Read-only annotation; `None` and `Some(false)` both mean the tool mutates
    fn read_only_hint(&self) -> Option<bool> {
        None
    }

    /// Buildkite API token scopes the tool needs
    fn required_scopes(&self) -> Vec<String> {
        Vec::new()
    }

    /// Execute the tool with the given arguments and context
    async fn execute(
        &self,
        arguments: serde_json::Map<String, serde_json::Value>,
        context: &ToolContext,
    ) -> std::result::Result<CallToolResult, McpError>;
}

/// Immutable description of one registered tool
///
/// Changing any field means building a replacement, see
/// [`ToolDefinition::with_defer_loading`].
#[derive(Clone)]
pub struct ToolDefinition {
    tool: Tool,
    summary: String,
    handler: Arc<dyn McpTool>,
    required_scopes: Vec<String>,
    defer_loading: bool,
}

impl ToolDefinition {
    /// Wrap a tool that is advertised eagerly
    pub fn new<T: McpTool + 'static>(tool: T) -> Self {
        Self::from_handler(Arc::new(tool), false)
    }

    /// Wrap a tool that is only discovered through search in dynamic mode
    pub fn deferred<T: McpTool + 'static>(tool: T) -> Self {
        Self::from_handler(Arc::new(tool), true)
    }

    /// Wrap a shared handler
    pub fn from_handler(handler: Arc<dyn McpTool>, defer_loading: bool) -> Self {
        let schema_map = match handler.schema() {
            serde_json::Value::Object(map) => map,
            _ => serde_json::Map::new(),
        };

        let annotations = handler.read_only_hint().map(|read_only| ToolAnnotations {
            read_only_hint: Some(read_only),
            ..Default::default()
        });

        let tool = Tool {
            name: handler.name().to_string().into(),
            description: Some(handler.description().to_string().into()),
            input_schema: Arc::new(schema_map),
            annotations,
        };

        Self {
            summary: first_paragraph(handler.description()),
            tool,
            required_scopes: handler.required_scopes(),
            handler,
            defer_loading,
        }
    }

    /// Replacement descriptor with the given defer flag
    pub fn with_defer_loading(self, defer_loading: bool) -> Self {
        Self {
            defer_loading,
            ..self
        }
    }

    /// Tool name, unique across the registry
    pub fn name(&self) -> &str {
        &self.tool.name
    }

    /// Human readable description
    pub fn description(&self) -> &str {
        self.tool.description.as_deref().unwrap_or_default()
    }

    /// First paragraph of the description, joined onto one line.
    ///
    /// Search matches against this, so parameter and return sections of a
    /// longer markdown description do not produce hits.
    pub fn summary(&self) -> &str {
        &self.summary
    }

    /// The tri-state read-only annotation
    pub fn read_only_hint(&self) -> Option<bool> {
        self.tool
            .annotations
            .as_ref()
            .and_then(|annotations| annotations.read_only_hint)
    }

    /// Whether the tool is non-mutating. An absent annotation counts as a write.
    pub fn is_read_only(&self) -> bool {
        self.read_only_hint().unwrap_or(false)
    }

    /// Token scopes needed to call the tool
    pub fn required_scopes(&self) -> &[String] {
        &self.required_scopes
    }

    /// Whether the tool is withheld from `list_tools` in dynamic mode
    pub fn defer_loading(&self) -> bool {
        self.defer_loading
    }

    /// JSON schema of the tool's arguments
    pub fn input_schema(&self) -> &serde_json::Map<String, serde_json::Value> {
        &self.tool.input_schema
    }

    /// The descriptor handed to the MCP transport
    pub fn tool(&self) -> &Tool {
        &self.tool
    }

    /// The tool implementation
    pub fn handler(&self) -> &Arc<dyn McpTool> {
        &self.handler
    }
}

fn first_paragraph(description: &str) -> String {
    description
        .trim()
        .lines()
        .map(str::trim)
        .take_while(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

impl std::fmt::Debug for ToolDefinition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolDefinition")
            .field("name", &self.name())
            .field("read_only", &self.read_only_hint())
            .field("required_scopes", &self.required_scopes)
            .field("defer_loading", &self.defer_loading)
            .finish()
    }
}

/// Base implementation providing common utility methods for MCP tools
pub struct BaseToolImpl;

impl BaseToolImpl {
    /// Parse tool arguments from a JSON map into a typed struct
    ///
    /// # Arguments
    ///
    /// * `arguments` - The JSON map of arguments from the MCP request
    ///
    /// # Returns
    ///
    /// * `Result<T, McpError>` - The parsed arguments or an error
    pub fn parse_arguments<T: serde::de::DeserializeOwned>(
        arguments: serde_json::Map<String, serde_json::Value>,
    ) -> std::result::Result<T, McpError> {
        serde_json::from_value(serde_json::Value::Object(arguments))
            .map_err(|e| McpError::invalid_params(format!("Invalid arguments: {e}"), None))
    }

    /// Create a success response with text content
    pub fn create_success_response<T: Into<String>>(content: T) -> CallToolResult {
        CallToolResult {
            content: vec![Annotated::new(
                RawContent::Text(RawTextContent {
                    text: content.into(),
                }),
                None,
            )],
            is_error: Some(false),
        }
    }

    /// Serialize `value` as compact JSON into a success response.
    ///
    /// A value that cannot be encoded becomes an error response, never a
    /// protocol failure.
    pub fn create_json_response<T: Serialize + ?Sized>(value: &T, what: &str) -> CallToolResult {
        match serde_json::to_string(value) {
            Ok(json) => Self::create_success_response(json),
            Err(e) => Self::create_error_response(
                format!("failed to marshal {what}"),
                Some(e.to_string()),
            ),
        }
    }

    /// Create an error response with the given error message
    ///
    /// # Arguments
    ///
    /// * `error` - The error message
    /// * `details` - Optional additional details
    pub fn create_error_response<T: Into<String>>(
        error: T,
        details: Option<String>,
    ) -> CallToolResult {
        let error_text = match details {
            Some(details) => format!("{}: {}", error.into(), details),
            None => error.into(),
        };

        CallToolResult {
            content: vec![Annotated::new(
                RawContent::Text(RawTextContent { text: error_text }),
                None,
            )],
            is_error: Some(true),
        }
    }
}
