//! Build annotation tools

use super::endpoint::{Endpoint, EndpointTool, BUILD_NUMBER, ORG_SLUG, PIPELINE_SLUG};
use crate::buildkite::HttpMethod;
use crate::mcp::tool_registry::ToolDefinition;
use crate::mcp::toolsets::Toolset;

static LIST_ANNOTATIONS: Endpoint = Endpoint {
    name: "list_annotations",
    description: "List all annotations for a build, including their context, style (success/info/warning/error), rendered HTML content, and creation timestamps",
    method: HttpMethod::Get,
    path: "v2/organizations/{org_slug}/pipelines/{pipeline_slug}/builds/{build_number}/annotations",
    params: &[ORG_SLUG, PIPELINE_SLUG, BUILD_NUMBER],
    fixed_query: &[],
    paginated: true,
    extract: None,
    scopes: &["read_builds"],
    read_only: true,
};

/// The `annotations` toolset
pub fn create_toolset() -> Toolset {
    Toolset::new("Annotation Management", "Tools for managing build annotations")
        .with_tool(ToolDefinition::deferred(EndpointTool::new(&LIST_ANNOTATIONS)))
}
