//! Job log tools
//!
//! All three tools fetch the job log once, normalize it with
//! [`crate::logs::normalize_log`] and return a slice of the resulting lines.

use super::endpoint::{Endpoint, BUILD_NUMBER, JOB_ID, ORG_SLUG, PIPELINE_SLUG};
use crate::buildkite::HttpMethod;
use crate::logs::{normalize_log, read_lines, search_lines, tail_lines, LogSearchOptions};
use crate::mcp::tool_registry::{BaseToolImpl, McpTool, ToolContext, ToolDefinition};
use crate::mcp::toolsets::Toolset;
use async_trait::async_trait;
use rmcp::model::CallToolResult;
use rmcp::Error as McpError;
use serde::Deserialize;
use serde_json::{json, Map, Value};

static JOB_LOG: Endpoint = Endpoint {
    name: "job_log",
    description: "Fetch the raw log of a job",
    method: HttpMethod::Get,
    path: "v2/organizations/{org_slug}/pipelines/{pipeline_slug}/builds/{build_number}/jobs/{job_id}/log",
    params: &[ORG_SLUG, PIPELINE_SLUG, BUILD_NUMBER, JOB_ID],
    fixed_query: &[],
    paginated: false,
    extract: None,
    scopes: &["read_build_logs"],
    read_only: true,
};

const DEFAULT_TAIL: usize = 10;
const DEFAULT_READ_LIMIT: usize = 100;
const DEFAULT_SEARCH_LIMIT: usize = 100;

#[derive(Debug, Deserialize)]
struct SearchLogsArgs {
    pattern: String,
    #[serde(default)]
    context: usize,
    #[serde(default)]
    case_sensitive: bool,
    #[serde(default)]
    invert_match: bool,
    limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct TailLogsArgs {
    tail: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct ReadLogsArgs {
    #[serde(default)]
    seek: usize,
    limit: Option<usize>,
}

/// Which slice of the log a [`LogTool`] returns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogToolKind {
    /// Regex search with context
    Search,
    /// Last lines
    Tail,
    /// A page from an offset
    Read,
}

/// Tool over a single job log
#[derive(Debug, Clone, Copy)]
pub struct LogTool {
    kind: LogToolKind,
}

impl LogTool {
    /// Creates a log tool of the given kind
    pub fn new(kind: LogToolKind) -> Self {
        Self { kind }
    }

    fn extra_properties(&self) -> Value {
        match self.kind {
            LogToolKind::Search => json!({
                "pattern": {"type": "string", "description": "Regular expression to search for"},
                "context": {"type": "integer", "description": "Lines of context before and after each match"},
                "case_sensitive": {"type": "boolean", "description": "Match case exactly (default false)"},
                "invert_match": {"type": "boolean", "description": "Return lines that do not match"},
                "limit": {"type": "integer", "description": "Maximum number of matches (default 100)"}
            }),
            LogToolKind::Tail => json!({
                "tail": {"type": "integer", "description": "Number of lines from the end (default 10)"}
            }),
            LogToolKind::Read => json!({
                "seek": {"type": "integer", "description": "0-based line to start reading from (default 0)"},
                "limit": {"type": "integer", "description": "Number of lines to read (default 100)"}
            }),
        }
    }

    async fn fetch_lines(
        context: &ToolContext,
        arguments: &Map<String, Value>,
    ) -> Result<Vec<String>, CallToolResult> {
        let request = JOB_LOG
            .build_request(arguments)
            .map_err(|message| BaseToolImpl::create_error_response(message, None))?;

        tracing::debug!(path = %request.path(), "Fetching job log");
        let log = context
            .api
            .send(request)
            .await
            .map_err(|e| e.into_tool_result())?;

        let content = log.get("content").and_then(Value::as_str).unwrap_or_default();
        Ok(normalize_log(content))
    }
}

#[async_trait]
impl McpTool for LogTool {
    fn name(&self) -> &str {
        match self.kind {
            LogToolKind::Search => "search_logs",
            LogToolKind::Tail => "tail_logs",
            LogToolKind::Read => "read_logs",
        }
    }

    fn description(&self) -> &str {
        match self.kind {
            LogToolKind::Search => include_str!("search_logs.md"),
            LogToolKind::Tail => include_str!("tail_logs.md"),
            LogToolKind::Read => include_str!("read_logs.md"),
        }
    }

    fn schema(&self) -> Value {
        let mut schema = JOB_LOG.schema();
        if let (Some(properties), Value::Object(extra)) = (
            schema.get_mut("properties").and_then(Value::as_object_mut),
            self.extra_properties(),
        ) {
            properties.extend(extra);
        }
        if self.kind == LogToolKind::Search {
            if let Some(required) = schema.get_mut("required").and_then(Value::as_array_mut) {
                required.push(json!("pattern"));
            }
        }
        schema
    }

    fn read_only_hint(&self) -> Option<bool> {
        Some(true)
    }

    fn required_scopes(&self) -> Vec<String> {
        vec!["read_build_logs".to_string()]
    }

    async fn execute(
        &self,
        arguments: Map<String, Value>,
        context: &ToolContext,
    ) -> std::result::Result<CallToolResult, McpError> {
        match self.kind {
            LogToolKind::Search => {
                let args: SearchLogsArgs = BaseToolImpl::parse_arguments(arguments.clone())?;
                let options = LogSearchOptions {
                    pattern: args.pattern,
                    case_sensitive: args.case_sensitive,
                    invert_match: args.invert_match,
                    context: args.context,
                    limit: args.limit.unwrap_or(DEFAULT_SEARCH_LIMIT),
                };
                let lines = match Self::fetch_lines(context, &arguments).await {
                    Ok(lines) => lines,
                    Err(result) => return Ok(result),
                };
                match search_lines(&lines, &options) {
                    Ok(result) => Ok(BaseToolImpl::create_json_response(&result, "log search results")),
                    Err(e) => Ok(BaseToolImpl::create_error_response(
                        "invalid search pattern",
                        Some(e.to_string()),
                    )),
                }
            }
            LogToolKind::Tail => {
                let args: TailLogsArgs = BaseToolImpl::parse_arguments(arguments.clone())?;
                let lines = match Self::fetch_lines(context, &arguments).await {
                    Ok(lines) => lines,
                    Err(result) => return Ok(result),
                };
                let page = tail_lines(&lines, args.tail.unwrap_or(DEFAULT_TAIL));
                Ok(BaseToolImpl::create_json_response(&page, "log lines"))
            }
            LogToolKind::Read => {
                let args: ReadLogsArgs = BaseToolImpl::parse_arguments(arguments.clone())?;
                let lines = match Self::fetch_lines(context, &arguments).await {
                    Ok(lines) => lines,
                    Err(result) => return Ok(result),
                };
                let page = read_lines(&lines, args.seek, args.limit.unwrap_or(DEFAULT_READ_LIMIT));
                Ok(BaseToolImpl::create_json_response(&page, "log lines"))
            }
        }
    }
}

/// The `logs` toolset
pub fn create_toolset() -> Toolset {
    Toolset::new(
        "Log Management",
        "Tools for searching, reading, and analyzing job logs",
    )
    .with_tools([
        ToolDefinition::new(LogTool::new(LogToolKind::Search)),
        ToolDefinition::new(LogTool::new(LogToolKind::Tail)),
        ToolDefinition::new(LogTool::new(LogToolKind::Read)),
    ])
}
