//! Shared helpers for unit tests

use crate::buildkite::{ApiError, ApiRequest, BuildkiteApi};
use crate::mcp::tool_registry::{BaseToolImpl, McpTool, ToolContext, ToolDefinition};
use crate::mcp::toolsets::{Toolset, ToolsetRegistry};
use rmcp::model::{CallToolResult, RawContent};
use rmcp::Error as McpError;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// In-memory [`BuildkiteApi`] that replays queued responses and records requests
#[derive(Default)]
pub struct MockBuildkiteApi {
    responses: Mutex<VecDeque<Result<Value, ApiError>>>,
    downloads: Mutex<VecDeque<Result<Vec<u8>, ApiError>>>,
    requests: Mutex<Vec<ApiRequest>>,
    downloaded: Mutex<Vec<String>>,
}

impl MockBuildkiteApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_response(self, response: Value) -> Self {
        self.push_response(Ok(response));
        self
    }

    pub fn with_error(self, error: ApiError) -> Self {
        self.push_response(Err(error));
        self
    }

    pub fn with_download(self, bytes: &[u8]) -> Self {
        self.downloads
            .lock()
            .unwrap()
            .push_back(Ok(bytes.to_vec()));
        self
    }

    pub fn with_download_error(self, error: ApiError) -> Self {
        self.downloads.lock().unwrap().push_back(Err(error));
        self
    }

    fn push_response(&self, response: Result<Value, ApiError>) {
        self.responses.lock().unwrap().push_back(response);
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn downloaded(&self) -> Vec<String> {
        self.downloaded.lock().unwrap().clone()
    }

    pub fn context(self) -> (Arc<Self>, ToolContext) {
        let api = Arc::new(self);
        let context = ToolContext::new(api.clone());
        (api, context)
    }
}

#[async_trait::async_trait]
impl BuildkiteApi for MockBuildkiteApi {
    async fn send(&self, request: ApiRequest) -> Result<Value, ApiError> {
        self.requests.lock().unwrap().push(request);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Ok(Value::Null))
    }

    async fn download(&self, url: &str) -> Result<Vec<u8>, ApiError> {
        self.downloaded.lock().unwrap().push(url.to_string());
        self.downloads
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(Vec::new()))
    }
}

/// Configurable tool that echoes its name when executed
pub struct MockTool {
    name: String,
    description: String,
    read_only: Option<bool>,
    scopes: Vec<String>,
    schema: Value,
}

impl MockTool {
    pub fn new(name: &str, description: &str) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            read_only: None,
            scopes: Vec::new(),
            schema: serde_json::json!({
                "type": "object",
                "properties": {},
                "required": []
            }),
        }
    }

    pub fn read_only(mut self, read_only: bool) -> Self {
        self.read_only = Some(read_only);
        self
    }

    pub fn with_scopes<const N: usize>(mut self, scopes: [&str; N]) -> Self {
        self.scopes = scopes.iter().map(|scope| scope.to_string()).collect();
        self
    }

    pub fn with_schema(mut self, schema: Value) -> Self {
        self.schema = schema;
        self
    }
}

#[async_trait::async_trait]
impl McpTool for MockTool {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn schema(&self) -> Value {
        self.schema.clone()
    }

    fn read_only_hint(&self) -> Option<bool> {
        self.read_only
    }

    fn required_scopes(&self) -> Vec<String> {
        self.scopes.clone()
    }

    async fn execute(
        &self,
        _arguments: serde_json::Map<String, Value>,
        _context: &ToolContext,
    ) -> std::result::Result<CallToolResult, McpError> {
        Ok(BaseToolImpl::create_success_response(format!(
            "Mock tool {} executed",
            self.name
        )))
    }
}

/// `builds` = {list_builds (read-only), create_build (write_builds)},
/// `artifacts` = {get_artifact (read-only, read_artifacts)}
pub fn sample_registry() -> ToolsetRegistry {
    let mut registry = ToolsetRegistry::new();
    registry
        .register(
            "builds",
            Toolset::new("Build Operations", "Tools for managing builds and jobs").with_tools([
                ToolDefinition::new(MockTool::new("list_builds", "List all runs of a pipeline").read_only(true)),
                ToolDefinition::deferred(
                    MockTool::new("create_build", "Trigger a new run of a pipeline")
                        .read_only(false)
                        .with_scopes(["write_builds"]),
                ),
            ]),
        )
        .unwrap();
    registry
        .register(
            "artifacts",
            Toolset::new("Artifact Management", "Tools for managing build artifacts").with_tool(
                ToolDefinition::deferred(
                    MockTool::new("get_artifact", "Download an artifact")
                        .read_only(true)
                        .with_scopes(["read_artifacts"]),
                ),
            ),
        )
        .unwrap();
    registry
}

/// Text of the first content block
pub fn response_text(result: &CallToolResult) -> String {
    match result.content.first().map(|content| &content.raw) {
        Some(RawContent::Text(text)) => text.text.clone(),
        _ => panic!("Expected text content"),
    }
}

/// Build an argument map from a JSON object literal
pub fn arguments(value: Value) -> serde_json::Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => panic!("arguments must be a JSON object"),
    }
}
