//! Build and job tools
//!
//! Everything here is a plain endpoint except `wait_for_build`, which polls
//! until the build finishes.

pub mod wait_for_build;

use super::endpoint::{
    Endpoint, EndpointTool, Param, ParamKind, BUILD_NUMBER, JOB_ID, ORG_SLUG, PIPELINE_SLUG,
};
use crate::buildkite::HttpMethod;
use crate::mcp::tool_registry::ToolDefinition;
use crate::mcp::toolsets::Toolset;

static LIST_BUILDS: Endpoint = Endpoint {
    name: "list_builds",
    description: "List all builds for a pipeline with their status, commit information, and metadata",
    method: HttpMethod::Get,
    path: "v2/organizations/{org_slug}/pipelines/{pipeline_slug}/builds",
    params: &[
        ORG_SLUG,
        PIPELINE_SLUG,
        Param::query("branch", "Filter builds by branch name", ParamKind::String),
        Param::query("state", "Filter builds by state, e.g. running, passed, failed", ParamKind::StringArray),
        Param::query("commit", "Filter builds by commit SHA", ParamKind::String),
        Param::query("creator", "Filter builds by the ID of the user who created them", ParamKind::String),
    ],
    fixed_query: &[],
    paginated: true,
    extract: None,
    scopes: &["read_builds"],
    read_only: true,
};

static GET_BUILD: Endpoint = Endpoint {
    name: "get_build",
    description: "Get detailed information about a specific build including its jobs, timing, and execution details",
    method: HttpMethod::Get,
    path: "v2/organizations/{org_slug}/pipelines/{pipeline_slug}/builds/{build_number}",
    params: &[ORG_SLUG, PIPELINE_SLUG, BUILD_NUMBER],
    fixed_query: &[],
    paginated: false,
    extract: None,
    scopes: &["read_builds"],
    read_only: true,
};

static GET_BUILD_TEST_ENGINE_RUNS: Endpoint = Endpoint {
    name: "get_build_test_engine_runs",
    description: "Get the Test Engine runs recorded for a build, for use with the test tools",
    method: HttpMethod::Get,
    path: "v2/organizations/{org_slug}/pipelines/{pipeline_slug}/builds/{build_number}",
    params: &[ORG_SLUG, PIPELINE_SLUG, BUILD_NUMBER],
    fixed_query: &[("include_test_engine", "true")],
    paginated: false,
    extract: Some("/test_engine/runs"),
    scopes: &["read_builds"],
    read_only: true,
};

static CREATE_BUILD: Endpoint = Endpoint {
    name: "create_build",
    description: "Trigger a new build on a Buildkite pipeline for a specific commit and branch, with optional environment variables and metadata",
    method: HttpMethod::Post,
    path: "v2/organizations/{org_slug}/pipelines/{pipeline_slug}/builds",
    params: &[
        ORG_SLUG,
        PIPELINE_SLUG,
        Param::body("commit", "The commit SHA to build, or HEAD", ParamKind::String, true),
        Param::body("branch", "The branch to build", ParamKind::String, true),
        Param::body("message", "The build message", ParamKind::String, true),
        Param::body("env", "Environment variables for the build", ParamKind::Object, false),
        Param::body("meta_data", "Meta-data key/value pairs for the build", ParamKind::Object, false),
        Param::body(
            "ignore_pipeline_branch_filters",
            "Run the build even if the pipeline's branch filters exclude the branch",
            ParamKind::Boolean,
            false,
        ),
    ],
    fixed_query: &[],
    paginated: false,
    extract: None,
    scopes: &["write_builds"],
    read_only: false,
};

static UNBLOCK_JOB: Endpoint = Endpoint {
    name: "unblock_job",
    description: "Unblock a blocked job in a Buildkite build to allow it to continue execution",
    method: HttpMethod::Put,
    path: "v2/organizations/{org_slug}/pipelines/{pipeline_slug}/builds/{build_number}/jobs/{job_id}/unblock",
    params: &[
        ORG_SLUG,
        PIPELINE_SLUG,
        BUILD_NUMBER,
        JOB_ID,
        Param::body(
            "fields",
            "JSON object containing string values for block step fields",
            ParamKind::Object,
            false,
        ),
    ],
    fixed_query: &[],
    paginated: false,
    extract: None,
    scopes: &["write_builds"],
    read_only: false,
};

/// The `builds` toolset
pub fn create_toolset() -> Toolset {
    Toolset::new("Build Operations", "Tools for managing builds and jobs").with_tools([
        ToolDefinition::new(EndpointTool::new(&LIST_BUILDS)),
        ToolDefinition::new(EndpointTool::new(&GET_BUILD)),
        ToolDefinition::deferred(EndpointTool::new(&GET_BUILD_TEST_ENGINE_RUNS)),
        ToolDefinition::deferred(EndpointTool::new(&CREATE_BUILD)),
        ToolDefinition::deferred(wait_for_build::WaitForBuildTool::new()),
        ToolDefinition::deferred(EndpointTool::new(&UNBLOCK_JOB)),
    ])
}
