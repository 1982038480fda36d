//! Declarative REST endpoint tools
//!
//! Most Buildkite tools are a single API call: fill a path template from the
//! arguments, attach query parameters or a JSON body, and return the response.
//! Each such tool is a static [`Endpoint`] executed by [`EndpointTool`].

use crate::buildkite::{ApiRequest, HttpMethod};
use crate::mcp::tool_registry::{BaseToolImpl, McpTool, ToolContext};
use async_trait::async_trait;
use rmcp::model::CallToolResult;
use rmcp::Error as McpError;
use serde_json::{json, Map, Value};

/// JSON type of a parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    /// A string; numbers are accepted and converted
    String,
    /// An integer; numeric strings are accepted
    Integer,
    /// A boolean
    Boolean,
    /// A JSON object passed through unchanged
    Object,
    /// An array of strings
    StringArray,
}

impl ParamKind {
    fn schema(self) -> Value {
        match self {
            ParamKind::String => json!({"type": "string"}),
            ParamKind::Integer => json!({"type": "integer"}),
            ParamKind::Boolean => json!({"type": "boolean"}),
            ParamKind::Object => json!({"type": "object"}),
            ParamKind::StringArray => json!({"type": "array", "items": {"type": "string"}}),
        }
    }
}

/// Where a parameter goes in the request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamLocation {
    /// Substituted into a `{name}` placeholder of the path template
    Path,
    /// Appended to the query string
    Query,
    /// Set as a field of the JSON body
    Body,
}

/// One tool argument
#[derive(Debug, Clone, Copy)]
pub struct Param {
    /// Argument name, also the placeholder, query key or body field
    pub name: &'static str,
    /// Shown to the client in the schema
    pub description: &'static str,
    /// JSON type
    pub kind: ParamKind,
    /// Request placement
    pub location: ParamLocation,
    /// Whether the argument must be supplied
    pub required: bool,
}

impl Param {
    /// Required path placeholder
    pub const fn path(name: &'static str, description: &'static str) -> Self {
        Self {
            name,
            description,
            kind: ParamKind::String,
            location: ParamLocation::Path,
            required: true,
        }
    }

    /// Optional query parameter
    pub const fn query(name: &'static str, description: &'static str, kind: ParamKind) -> Self {
        Self {
            name,
            description,
            kind,
            location: ParamLocation::Query,
            required: false,
        }
    }

    /// Body field
    pub const fn body(
        name: &'static str,
        description: &'static str,
        kind: ParamKind,
        required: bool,
    ) -> Self {
        Self {
            name,
            description,
            kind,
            location: ParamLocation::Body,
            required,
        }
    }
}

/// Organization slug path parameter
pub const ORG_SLUG: Param = Param::path("org_slug", "The organization slug for the owner of the resource");
/// Pipeline slug path parameter
pub const PIPELINE_SLUG: Param = Param::path("pipeline_slug", "The slug of the pipeline");
/// Build number path parameter
pub const BUILD_NUMBER: Param = Param::path("build_number", "The number of the build");
/// Job ID path parameter
pub const JOB_ID: Param = Param::path("job_id", "The UUID of the job");

/// Page number query parameter added to paginated endpoints
pub const PAGE: Param = Param::query("page", "Page number for pagination (min 1)", ParamKind::Integer);
/// Page size query parameter added to paginated endpoints
pub const PER_PAGE: Param = Param::query("per_page", "Results per page for pagination (min 1, max 100)", ParamKind::Integer);

const PAGINATION: &[Param] = &[PAGE, PER_PAGE];

/// A single Buildkite REST API call exposed as a tool
#[derive(Debug, Clone, Copy)]
pub struct Endpoint {
    /// Tool name
    pub name: &'static str,
    /// Tool description
    pub description: &'static str,
    /// HTTP verb
    pub method: HttpMethod,
    /// Path template relative to the API base, e.g. `v2/organizations/{org_slug}/pipelines`
    pub path: &'static str,
    /// Arguments
    pub params: &'static [Param],
    /// Query pairs always sent
    pub fixed_query: &'static [(&'static str, &'static str)],
    /// Whether `page` and `per_page` are accepted
    pub paginated: bool,
    /// JSON pointer selecting part of the response; missing yields `null`
    pub extract: Option<&'static str>,
    /// Token scopes needed
    pub scopes: &'static [&'static str],
    /// Whether the call is non-mutating
    pub read_only: bool,
}

impl Endpoint {
    /// Arguments including pagination
    pub fn all_params(&self) -> impl Iterator<Item = &Param> {
        let pagination: &'static [Param] = if self.paginated { PAGINATION } else { &[] };
        self.params.iter().chain(pagination.iter())
    }

    /// JSON schema for the tool arguments
    pub fn schema(&self) -> Value {
        let mut properties = Map::new();
        let mut required = Vec::new();

        for param in self.all_params() {
            let mut schema = param.kind.schema();
            if let Value::Object(map) = &mut schema {
                map.insert("description".to_string(), json!(param.description));
            }
            properties.insert(param.name.to_string(), schema);
            if param.required {
                required.push(json!(param.name));
            }
        }

        json!({
            "type": "object",
            "properties": properties,
            "required": required
        })
    }

    /// Build the request for a set of arguments.
    ///
    /// Returns the message for the client when an argument is missing or has
    /// the wrong type.
    pub fn build_request(&self, arguments: &Map<String, Value>) -> Result<ApiRequest, String> {
        let mut path_values = Vec::new();
        let mut query = Vec::new();
        let mut body = Map::new();

        for param in self.all_params() {
            let value = match arguments.get(param.name) {
                Some(Value::Null) | None => {
                    if param.required {
                        return Err(format!("{} parameter is required", param.name));
                    }
                    continue;
                }
                Some(value) => value,
            };

            match param.location {
                ParamLocation::Path => {
                    let text = scalar_string(value)
                        .ok_or_else(|| format!("{} must be a string", param.name))?;
                    if text.is_empty() {
                        return Err(format!("{} parameter is required", param.name));
                    }
                    path_values.push((param.name, text));
                }
                ParamLocation::Query => append_query(&mut query, param, value)?,
                ParamLocation::Body => {
                    check_kind(param, value)?;
                    body.insert(param.name.to_string(), value.clone());
                }
            }
        }

        let mut segments = Vec::new();
        for segment in self.path.split('/') {
            match segment.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
                Some(placeholder) => {
                    let value = path_values
                        .iter()
                        .find(|(name, _)| *name == placeholder)
                        .map(|(_, value)| value.clone())
                        .ok_or_else(|| format!("{placeholder} parameter is required"))?;
                    segments.push(value);
                }
                None => segments.push(segment.to_string()),
            }
        }

        for (key, value) in self.fixed_query {
            query.push((key.to_string(), value.to_string()));
        }

        let mut request = ApiRequest::new(self.method, segments);
        request.query = query;
        if self.method != HttpMethod::Get {
            request.body = Some(Value::Object(body));
        }
        Ok(request)
    }
}

fn scalar_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn check_kind(param: &Param, value: &Value) -> Result<(), String> {
    let ok = match param.kind {
        ParamKind::String => value.is_string() || value.is_number(),
        ParamKind::Integer => {
            value.is_i64() || value.is_u64() || value.as_str().is_some_and(|s| s.parse::<i64>().is_ok())
        }
        ParamKind::Boolean => value.is_boolean(),
        ParamKind::Object => value.is_object(),
        ParamKind::StringArray => value
            .as_array()
            .is_some_and(|items| items.iter().all(Value::is_string)),
    };

    if ok {
        Ok(())
    } else {
        let expected = match param.kind {
            ParamKind::String => "a string",
            ParamKind::Integer => "an integer",
            ParamKind::Boolean => "a boolean",
            ParamKind::Object => "an object",
            ParamKind::StringArray => "an array of strings",
        };
        Err(format!("{} must be {expected}", param.name))
    }
}

fn append_query(
    query: &mut Vec<(String, String)>,
    param: &Param,
    value: &Value,
) -> Result<(), String> {
    check_kind(param, value)?;
    match value {
        Value::Array(items) => {
            let key = format!("{}[]", param.name);
            for item in items.iter().filter_map(scalar_string) {
                query.push((key.clone(), item));
            }
        }
        other => {
            if let Some(text) = scalar_string(other) {
                query.push((param.name.to_string(), text));
            }
        }
    }
    Ok(())
}

/// Extract part of a response with a JSON pointer
pub fn extract(value: Value, pointer: Option<&str>) -> Value {
    match pointer {
        Some(pointer) => value.pointer(pointer).cloned().unwrap_or(Value::Null),
        None => value,
    }
}

/// Tool backed by a static [`Endpoint`]
#[derive(Debug, Clone, Copy)]
pub struct EndpointTool {
    endpoint: &'static Endpoint,
}

impl EndpointTool {
    /// Wrap an endpoint
    pub fn new(endpoint: &'static Endpoint) -> Self {
        Self { endpoint }
    }
}

#[async_trait]
impl McpTool for EndpointTool {
    fn name(&self) -> &str {
        self.endpoint.name
    }

    fn description(&self) -> &str {
        self.endpoint.description
    }

    fn schema(&self) -> Value {
        self.endpoint.schema()
    }

    fn read_only_hint(&self) -> Option<bool> {
        Some(self.endpoint.read_only)
    }

    fn required_scopes(&self) -> Vec<String> {
        self.endpoint.scopes.iter().map(|s| s.to_string()).collect()
    }

    async fn execute(
        &self,
        arguments: Map<String, Value>,
        context: &ToolContext,
    ) -> std::result::Result<CallToolResult, McpError> {
        let request = match self.endpoint.build_request(&arguments) {
            Ok(request) => request,
            Err(message) => return Ok(BaseToolImpl::create_error_response(message, None)),
        };

        tracing::debug!(tool = self.endpoint.name, path = %request.path(), "Calling Buildkite API");

        match context.api.send(request).await {
            Ok(value) => {
                let value = extract(value, self.endpoint.extract);
                Ok(BaseToolImpl::create_json_response(&value, self.endpoint.name))
            }
            Err(e) => Ok(e.into_tool_result()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buildkite::ApiError;
    use crate::test_utils::{arguments, response_text, MockBuildkiteApi};

    static LIST_THINGS: Endpoint = Endpoint {
        name: "list_things",
        description: "List things in a pipeline",
        method: HttpMethod::Get,
        path: "v2/organizations/{org_slug}/pipelines/{pipeline_slug}/things",
        params: &[
            ORG_SLUG,
            PIPELINE_SLUG,
            Param::query("state", "Filter by state", ParamKind::StringArray),
            Param::query("include_retried", "Include retried jobs", ParamKind::Boolean),
        ],
        fixed_query: &[("include", "all")],
        paginated: true,
        extract: None,
        scopes: &["read_things"],
        read_only: true,
    };

    static CREATE_THING: Endpoint = Endpoint {
        name: "create_thing",
        description: "Create a thing",
        method: HttpMethod::Post,
        path: "v2/organizations/{org_slug}/things",
        params: &[
            ORG_SLUG,
            Param::body("name", "Name", ParamKind::String, true),
            Param::body("env", "Environment", ParamKind::Object, false),
        ],
        fixed_query: &[],
        paginated: false,
        extract: Some("/thing"),
        scopes: &["write_things"],
        read_only: false,
    };

    #[test]
    fn test_schema_lists_params_and_pagination() {
        let schema = LIST_THINGS.schema();
        let properties = schema["properties"].as_object().unwrap();

        assert!(properties.contains_key("org_slug"));
        assert!(properties.contains_key("page"));
        assert!(properties.contains_key("per_page"));
        assert_eq!(properties["state"]["type"], "array");
        assert_eq!(schema["required"], json!(["org_slug", "pipeline_slug"]));
    }

    #[test]
    fn test_build_request_fills_path_and_query() {
        let request = LIST_THINGS
            .build_request(&arguments(json!({
                "org_slug": "acme",
                "pipeline_slug": "web",
                "state": ["failed", "passed"],
                "include_retried": true,
                "page": 2
            })))
            .unwrap();

        assert_eq!(request.method, HttpMethod::Get);
        assert_eq!(request.path(), "v2/organizations/acme/pipelines/web/things");
        assert_eq!(
            request.query,
            vec![
                ("state[]".to_string(), "failed".to_string()),
                ("state[]".to_string(), "passed".to_string()),
                ("include_retried".to_string(), "true".to_string()),
                ("page".to_string(), "2".to_string()),
                ("include".to_string(), "all".to_string()),
            ]
        );
        assert!(request.body.is_none());
    }

    #[test]
    fn test_build_request_missing_required() {
        let err = LIST_THINGS
            .build_request(&arguments(json!({"org_slug": "acme"})))
            .unwrap_err();
        assert_eq!(err, "pipeline_slug parameter is required");

        let err = LIST_THINGS
            .build_request(&arguments(json!({"org_slug": "", "pipeline_slug": "web"})))
            .unwrap_err();
        assert_eq!(err, "org_slug parameter is required");
    }

    #[test]
    fn test_build_request_type_errors() {
        let err = LIST_THINGS
            .build_request(&arguments(json!({
                "org_slug": "acme",
                "pipeline_slug": "web",
                "page": "two"
            })))
            .unwrap_err();
        assert_eq!(err, "page must be an integer");

        let err = CREATE_THING
            .build_request(&arguments(json!({"org_slug": "acme", "name": "x", "env": "A=1"})))
            .unwrap_err();
        assert_eq!(err, "env must be an object");
    }

    #[test]
    fn test_numeric_path_values_are_accepted() {
        static GET_BUILD: Endpoint = Endpoint {
            name: "get_thing_build",
            description: "Get a build",
            method: HttpMethod::Get,
            path: "v2/builds/{build_number}",
            params: &[BUILD_NUMBER],
            fixed_query: &[],
            paginated: false,
            extract: None,
            scopes: &[],
            read_only: true,
        };

        let request = GET_BUILD
            .build_request(&arguments(json!({"build_number": 42})))
            .unwrap();
        assert_eq!(request.path(), "v2/builds/42");
    }

    #[tokio::test]
    async fn test_execute_posts_body_and_extracts() {
        let (api, context) = MockBuildkiteApi::new()
            .with_response(json!({"thing": {"id": 7}}))
            .context();
        let tool = EndpointTool::new(&CREATE_THING);

        let result = tool
            .execute(
                arguments(json!({"org_slug": "acme", "name": "widget", "env": {"A": "1"}})),
                &context,
            )
            .await
            .unwrap();

        assert_eq!(result.is_error, Some(false));
        assert_eq!(response_text(&result), r#"{"id":7}"#);

        let requests = api.requests();
        assert_eq!(requests[0].method, HttpMethod::Post);
        assert_eq!(
            requests[0].body,
            Some(json!({"name": "widget", "env": {"A": "1"}}))
        );
    }

    #[tokio::test]
    async fn test_execute_missing_argument_is_tool_error() {
        let (api, context) = MockBuildkiteApi::new().context();
        let tool = EndpointTool::new(&CREATE_THING);

        let result = tool
            .execute(arguments(json!({"org_slug": "acme"})), &context)
            .await
            .unwrap();

        assert_eq!(result.is_error, Some(true));
        assert_eq!(response_text(&result), "name parameter is required");
        assert!(api.requests().is_empty());
    }

    #[tokio::test]
    async fn test_execute_maps_api_errors() {
        let (_api, context) = MockBuildkiteApi::new()
            .with_error(ApiError::Forbidden {
                detail: "missing read_things".to_string(),
            })
            .context();
        let tool = EndpointTool::new(&LIST_THINGS);

        let result = tool
            .execute(
                arguments(json!({"org_slug": "acme", "pipeline_slug": "web"})),
                &context,
            )
            .await
            .unwrap();

        assert_eq!(result.is_error, Some(true));
        let text = response_text(&result);
        assert!(text.starts_with("Permission denied"));
        assert!(text.contains("missing read_things"));
    }

    #[test]
    fn test_tool_metadata() {
        let tool = EndpointTool::new(&CREATE_THING);
        assert_eq!(tool.name(), "create_thing");
        assert_eq!(tool.read_only_hint(), Some(false));
        assert_eq!(tool.required_scopes(), vec!["write_things".to_string()]);
    }

    #[test]
    fn test_extract_missing_pointer_is_null() {
        assert_eq!(extract(json!({"a": 1}), Some("/b")), Value::Null);
        assert_eq!(extract(json!([{"id": 1}]), Some("/0")), json!({"id": 1}));
        assert_eq!(extract(json!(1), None), json!(1));
    }
}
