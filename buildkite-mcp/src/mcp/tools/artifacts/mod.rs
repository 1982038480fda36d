//! Artifact tools

pub mod get_artifact;

use super::endpoint::{Endpoint, EndpointTool, BUILD_NUMBER, JOB_ID, ORG_SLUG, PIPELINE_SLUG};
use crate::buildkite::HttpMethod;
use crate::mcp::tool_registry::ToolDefinition;
use crate::mcp::toolsets::Toolset;

static LIST_ARTIFACTS_FOR_BUILD: Endpoint = Endpoint {
    name: "list_artifacts_for_build",
    description: "List all artifacts uploaded by any job in a build, with their file names, sizes, paths and download URLs",
    method: HttpMethod::Get,
    path: "v2/organizations/{org_slug}/pipelines/{pipeline_slug}/builds/{build_number}/artifacts",
    params: &[ORG_SLUG, PIPELINE_SLUG, BUILD_NUMBER],
    fixed_query: &[],
    paginated: true,
    extract: None,
    scopes: &["read_artifacts"],
    read_only: true,
};

static LIST_ARTIFACTS_FOR_JOB: Endpoint = Endpoint {
    name: "list_artifacts_for_job",
    description: "List the artifacts uploaded by a single job, with their file names, sizes, paths and download URLs",
    method: HttpMethod::Get,
    path: "v2/organizations/{org_slug}/pipelines/{pipeline_slug}/builds/{build_number}/jobs/{job_id}/artifacts",
    params: &[ORG_SLUG, PIPELINE_SLUG, BUILD_NUMBER, JOB_ID],
    fixed_query: &[],
    paginated: true,
    extract: None,
    scopes: &["read_artifacts"],
    read_only: true,
};

/// The `artifacts` toolset
pub fn create_toolset() -> Toolset {
    Toolset::new("Artifact Management", "Tools for managing build artifacts").with_tools([
        ToolDefinition::new(EndpointTool::new(&LIST_ARTIFACTS_FOR_BUILD)),
        ToolDefinition::deferred(EndpointTool::new(&LIST_ARTIFACTS_FOR_JOB)),
        ToolDefinition::deferred(get_artifact::GetArtifactTool::new()),
    ])
}
