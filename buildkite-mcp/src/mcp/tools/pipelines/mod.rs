//! Pipeline tools

use super::endpoint::{Endpoint, EndpointTool, Param, ParamKind, ORG_SLUG, PIPELINE_SLUG};
use crate::buildkite::HttpMethod;
use crate::mcp::tool_registry::ToolDefinition;
use crate::mcp::toolsets::Toolset;

static GET_PIPELINE: Endpoint = Endpoint {
    name: "get_pipeline",
    description: "Get detailed information about a specific pipeline including its configuration, steps, environment variables, and build statistics",
    method: HttpMethod::Get,
    path: "v2/organizations/{org_slug}/pipelines/{pipeline_slug}",
    params: &[ORG_SLUG, PIPELINE_SLUG],
    fixed_query: &[],
    paginated: false,
    extract: None,
    scopes: &["read_pipelines"],
    read_only: true,
};

static LIST_PIPELINES: Endpoint = Endpoint {
    name: "list_pipelines",
    description: "List all pipelines in an organization with their basic details, build counts, and current status",
    method: HttpMethod::Get,
    path: "v2/organizations/{org_slug}/pipelines",
    params: &[
        ORG_SLUG,
        Param::query("name", "Filter pipelines by name", ParamKind::String),
        Param::query("repository", "Filter pipelines by repository URL", ParamKind::String),
    ],
    fixed_query: &[],
    paginated: true,
    extract: None,
    scopes: &["read_pipelines"],
    read_only: true,
};

static CREATE_PIPELINE: Endpoint = Endpoint {
    name: "create_pipeline",
    description: "Set up a new CI/CD pipeline in Buildkite with YAML configuration, repository connection, and cluster assignment",
    method: HttpMethod::Post,
    path: "v2/organizations/{org_slug}/pipelines",
    params: &[
        ORG_SLUG,
        Param::body("name", "The name of the pipeline", ParamKind::String, true),
        Param::body("repository", "The Git repository URL to build", ParamKind::String, true),
        Param::body("cluster_id", "The ID of the cluster the pipeline runs in", ParamKind::String, true),
        Param::body("configuration", "The pipeline YAML configuration", ParamKind::String, true),
        Param::body("description", "A description of the pipeline", ParamKind::String, false),
        Param::body("default_branch", "The default branch to build", ParamKind::String, false),
        Param::body("skip_queued_branch_builds", "Skip intermediate builds on the same branch", ParamKind::Boolean, false),
        Param::body("cancel_running_branch_builds", "Cancel running builds when a new build starts on the same branch", ParamKind::Boolean, false),
        Param::body("tags", "Tags to apply to the pipeline", ParamKind::StringArray, false),
    ],
    fixed_query: &[],
    paginated: false,
    extract: None,
    scopes: &["write_pipelines"],
    read_only: false,
};

static UPDATE_PIPELINE: Endpoint = Endpoint {
    name: "update_pipeline",
    description: "Modify an existing Buildkite pipeline's configuration, repository, settings, or metadata",
    method: HttpMethod::Patch,
    path: "v2/organizations/{org_slug}/pipelines/{pipeline_slug}",
    params: &[
        ORG_SLUG,
        PIPELINE_SLUG,
        Param::body("name", "The name of the pipeline", ParamKind::String, false),
        Param::body("repository", "The Git repository URL to build", ParamKind::String, false),
        Param::body("cluster_id", "The ID of the cluster the pipeline runs in", ParamKind::String, false),
        Param::body("configuration", "The pipeline YAML configuration", ParamKind::String, false),
        Param::body("description", "A description of the pipeline", ParamKind::String, false),
        Param::body("default_branch", "The default branch to build", ParamKind::String, false),
        Param::body("skip_queued_branch_builds", "Skip intermediate builds on the same branch", ParamKind::Boolean, false),
        Param::body("cancel_running_branch_builds", "Cancel running builds when a new build starts on the same branch", ParamKind::Boolean, false),
        Param::body("tags", "Tags to apply to the pipeline", ParamKind::StringArray, false),
    ],
    fixed_query: &[],
    paginated: false,
    extract: None,
    scopes: &["write_pipelines"],
    read_only: false,
};

/// The `pipelines` toolset
pub fn create_toolset() -> Toolset {
    Toolset::new("Pipeline Management", "Tools for managing Buildkite pipelines").with_tools([
        ToolDefinition::deferred(EndpointTool::new(&GET_PIPELINE)),
        ToolDefinition::new(EndpointTool::new(&LIST_PIPELINES)),
        ToolDefinition::deferred(EndpointTool::new(&CREATE_PIPELINE)),
        ToolDefinition::deferred(EndpointTool::new(&UPDATE_PIPELINE)),
    ])
}
