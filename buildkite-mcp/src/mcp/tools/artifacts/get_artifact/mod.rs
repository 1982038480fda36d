//! Artifact download tool

use crate::mcp::tool_registry::{BaseToolImpl, McpTool, ToolContext};
use async_trait::async_trait;
use base64::Engine;
use rmcp::model::CallToolResult;
use rmcp::Error as McpError;
use serde::{Deserialize, Serialize};

/// Request structure for downloading an artifact
#[derive(Debug, Deserialize)]
pub struct GetArtifactRequest {
    /// Artifact download URL
    pub url: String,
}

#[derive(Debug, Serialize)]
struct ArtifactContent<'a> {
    url: &'a str,
    size: usize,
    encoding: &'static str,
    data: String,
}

/// Tool for downloading artifact contents
#[derive(Default)]
pub struct GetArtifactTool;

impl GetArtifactTool {
    /// Creates a new instance of the GetArtifactTool
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl McpTool for GetArtifactTool {
    fn name(&self) -> &str {
        "get_artifact"
    }

    fn description(&self) -> &str {
        include_str!("description.md")
    }

    fn schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "url": {
                    "type": "string",
                    "description": "The URL of the artifact to get"
                }
            },
            "required": ["url"]
        })
    }

    fn read_only_hint(&self) -> Option<bool> {
        Some(true)
    }

    fn required_scopes(&self) -> Vec<String> {
        vec!["read_artifacts".to_string()]
    }

    async fn execute(
        &self,
        arguments: serde_json::Map<String, serde_json::Value>,
        context: &ToolContext,
    ) -> std::result::Result<CallToolResult, McpError> {
        let request: GetArtifactRequest = BaseToolImpl::parse_arguments(arguments)?;
        if request.url.trim().is_empty() {
            return Ok(BaseToolImpl::create_error_response(
                "url parameter is required",
                None,
            ));
        }

        let bytes = match context.api.download(&request.url).await {
            Ok(bytes) => bytes,
            Err(e) => return Ok(e.into_tool_result()),
        };

        let content = ArtifactContent {
            url: &request.url,
            size: bytes.len(),
            encoding: "base64",
            data: base64::engine::general_purpose::STANDARD.encode(&bytes),
        };
        Ok(BaseToolImpl::create_json_response(&content, "artifact response"))
    }
}
