//! Poll a build until it reaches a terminal state

use super::GET_BUILD;
use crate::mcp::tool_registry::{BaseToolImpl, McpTool, ToolContext};
use async_trait::async_trait;
use rmcp::model::CallToolResult;
use rmcp::Error as McpError;
use serde_json::{json, Map, Value};
use std::time::Duration;
use tokio::time::Instant;

/// Seconds to wait when no timeout is given
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;
/// Upper bound on the requested timeout
pub const MAX_TIMEOUT_SECS: u64 = 1800;

const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

const TERMINAL_STATES: &[&str] = &["passed", "failed", "canceled", "skipped", "not_run"];

/// Tool that waits for a build to finish
pub struct WaitForBuildTool {
    poll_interval: Duration,
}

impl Default for WaitForBuildTool {
    fn default() -> Self {
        Self::new()
    }
}

impl WaitForBuildTool {
    /// Creates a new instance of the WaitForBuildTool
    pub fn new() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    /// Use a different polling interval
    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    fn is_finished(build: &Value) -> bool {
        let finished_at = build.get("finished_at").is_some_and(|v| !v.is_null());
        let terminal_state = build
            .get("state")
            .and_then(Value::as_str)
            .is_some_and(|state| TERMINAL_STATES.contains(&state));
        finished_at || terminal_state
    }

    fn parse_timeout(arguments: &Map<String, Value>) -> Result<Duration, String> {
        let seconds = match arguments.get("timeout") {
            None | Some(Value::Null) => DEFAULT_TIMEOUT_SECS,
            Some(value) => value
                .as_u64()
                .filter(|seconds| *seconds > 0)
                .ok_or_else(|| "timeout must be a positive integer".to_string())?,
        };
        Ok(Duration::from_secs(seconds.min(MAX_TIMEOUT_SECS)))
    }
}

#[async_trait]
impl McpTool for WaitForBuildTool {
    fn name(&self) -> &str {
        "wait_for_build"
    }

    fn description(&self) -> &str {
        include_str!("description.md")
    }

    fn schema(&self) -> Value {
        let mut schema = GET_BUILD.schema();
        if let Some(properties) = schema.get_mut("properties").and_then(Value::as_object_mut) {
            properties.insert(
                "timeout".to_string(),
                json!({
                    "type": "integer",
                    "description": "Seconds to wait before giving up (default 300, max 1800)"
                }),
            );
        }
        schema
    }

    fn read_only_hint(&self) -> Option<bool> {
        Some(true)
    }

    fn required_scopes(&self) -> Vec<String> {
        vec!["read_builds".to_string()]
    }

    async fn execute(
        &self,
        arguments: Map<String, Value>,
        context: &ToolContext,
    ) -> std::result::Result<CallToolResult, McpError> {
        let timeout = match Self::parse_timeout(&arguments) {
            Ok(timeout) => timeout,
            Err(message) => return Ok(BaseToolImpl::create_error_response(message, None)),
        };
        let request = match GET_BUILD.build_request(&arguments) {
            Ok(request) => request,
            Err(message) => return Ok(BaseToolImpl::create_error_response(message, None)),
        };

        let deadline = Instant::now() + timeout;
        tracing::debug!(path = %request.path(), timeout_secs = timeout.as_secs(), "Waiting for build");

        loop {
            let build = match context.api.send(request.clone()).await {
                Ok(build) => build,
                Err(e) => return Ok(e.into_tool_result()),
            };

            if Self::is_finished(&build) {
                return Ok(BaseToolImpl::create_json_response(&build, "build"));
            }

            let now = Instant::now();
            if now >= deadline {
                let state = build
                    .get("state")
                    .and_then(Value::as_str)
                    .unwrap_or("unknown");
                return Ok(BaseToolImpl::create_error_response(
                    format!(
                        "Timed out after {}s waiting for build to finish",
                        timeout.as_secs()
                    ),
                    Some(format!("last state was '{state}'")),
                ));
            }

            tokio::time::sleep(self.poll_interval.min(deadline - now)).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buildkite::ApiError;
    use crate::test_utils::{arguments, response_text, MockBuildkiteApi};

    fn build_args(extra: Value) -> Map<String, Value> {
        let mut args = arguments(json!({
            "org_slug": "acme",
            "pipeline_slug": "web",
            "build_number": "42"
        }));
        if let Value::Object(extra) = extra {
            args.extend(extra);
        }
        args
    }

    #[tokio::test(start_paused = true)]
    async fn test_waits_until_terminal_state() {
        let (api, context) = MockBuildkiteApi::new()
            .with_response(json!({"number": 42, "state": "scheduled"}))
            .with_response(json!({"number": 42, "state": "running"}))
            .with_response(json!({"number": 42, "state": "passed", "finished_at": "2024-01-01T00:00:00Z"}))
            .context();

        let result = WaitForBuildTool::new()
            .execute(build_args(json!({})), &context)
            .await
            .unwrap();

        assert_eq!(result.is_error, Some(false));
        assert!(response_text(&result).contains("\"passed\""));
        assert_eq!(api.requests().len(), 3);
        assert_eq!(
            api.requests()[0].path(),
            "v2/organizations/acme/pipelines/web/builds/42"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_times_out() {
        let mut api = MockBuildkiteApi::new();
        for _ in 0..10 {
            api = api.with_response(json!({"number": 42, "state": "running"}));
        }
        let (_api, context) = api.context();

        let result = WaitForBuildTool::new()
            .with_poll_interval(Duration::from_secs(1))
            .execute(build_args(json!({"timeout": 3})), &context)
            .await
            .unwrap();

        assert_eq!(result.is_error, Some(true));
        let text = response_text(&result);
        assert!(text.starts_with("Timed out after 3s"));
        assert!(text.contains("running"));
    }

    #[tokio::test]
    async fn test_api_error_stops_polling() {
        let (api, context) = MockBuildkiteApi::new()
            .with_error(ApiError::Unauthorized)
            .context();

        let result = WaitForBuildTool::new()
            .execute(build_args(json!({})), &context)
            .await
            .unwrap();

        assert_eq!(result.is_error, Some(true));
        assert!(response_text(&result).starts_with("Authentication failed"));
        assert_eq!(api.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_invalid_timeout() {
        let (api, context) = MockBuildkiteApi::new().context();

        let result = WaitForBuildTool::new()
            .execute(build_args(json!({"timeout": -5})), &context)
            .await
            .unwrap();

        assert_eq!(result.is_error, Some(true));
        assert_eq!(response_text(&result), "timeout must be a positive integer");
        assert!(api.requests().is_empty());
    }

    #[test]
    fn test_timeout_is_capped() {
        let timeout = WaitForBuildTool::parse_timeout(&arguments(json!({"timeout": 99999}))).unwrap();
        assert_eq!(timeout, Duration::from_secs(MAX_TIMEOUT_SECS));
        let timeout = WaitForBuildTool::parse_timeout(&Map::new()).unwrap();
        assert_eq!(timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
    }

    #[test]
    fn test_schema_adds_timeout() {
        let schema = WaitForBuildTool::new().schema();
        assert_eq!(schema["properties"]["timeout"]["type"], "integer");
        assert_eq!(
            schema["required"],
            json!(["org_slug", "pipeline_slug", "build_number"])
        );
    }
}
