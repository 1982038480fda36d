//! Cluster and cluster queue tools

use super::endpoint::{Endpoint, EndpointTool, Param, ORG_SLUG};
use crate::buildkite::HttpMethod;
use crate::mcp::tool_registry::ToolDefinition;
use crate::mcp::toolsets::Toolset;

const CLUSTER_ID: Param = Param::path("cluster_id", "The ID of the cluster");
const QUEUE_ID: Param = Param::path("queue_id", "The ID of the queue");

static GET_CLUSTER: Endpoint = Endpoint {
    name: "get_cluster",
    description: "Get detailed information about a specific cluster including its name, description, default queue, and configuration",
    method: HttpMethod::Get,
    path: "v2/organizations/{org_slug}/clusters/{cluster_id}",
    params: &[ORG_SLUG, CLUSTER_ID],
    fixed_query: &[],
    paginated: false,
    extract: None,
    scopes: &["read_clusters"],
    read_only: true,
};

static LIST_CLUSTERS: Endpoint = Endpoint {
    name: "list_clusters",
    description: "List all clusters in an organization with their names, descriptions, default queues, and creation details",
    method: HttpMethod::Get,
    path: "v2/organizations/{org_slug}/clusters",
    params: &[ORG_SLUG],
    fixed_query: &[],
    paginated: true,
    extract: None,
    scopes: &["read_clusters"],
    read_only: true,
};

static GET_CLUSTER_QUEUE: Endpoint = Endpoint {
    name: "get_cluster_queue",
    description: "Get detailed information about a specific queue including its key, description, dispatch status, and hosted agent configuration",
    method: HttpMethod::Get,
    path: "v2/organizations/{org_slug}/clusters/{cluster_id}/queues/{queue_id}",
    params: &[ORG_SLUG, CLUSTER_ID, QUEUE_ID],
    fixed_query: &[],
    paginated: false,
    extract: None,
    scopes: &["read_clusters"],
    read_only: true,
};

static LIST_CLUSTER_QUEUES: Endpoint = Endpoint {
    name: "list_cluster_queues",
    description: "List all queues in a cluster with their keys, descriptions, dispatch status, and agent configuration",
    method: HttpMethod::Get,
    path: "v2/organizations/{org_slug}/clusters/{cluster_id}/queues",
    params: &[ORG_SLUG, CLUSTER_ID],
    fixed_query: &[],
    paginated: true,
    extract: None,
    scopes: &["read_clusters"],
    read_only: true,
};

/// The `clusters` toolset
pub fn create_toolset() -> Toolset {
    Toolset::new(
        "Cluster Management",
        "Tools for managing Buildkite clusters and cluster queues",
    )
    .with_tools([
        ToolDefinition::deferred(EndpointTool::new(&GET_CLUSTER)),
        ToolDefinition::deferred(EndpointTool::new(&LIST_CLUSTERS)),
        ToolDefinition::deferred(EndpointTool::new(&GET_CLUSTER_QUEUE)),
        ToolDefinition::deferred(EndpointTool::new(&LIST_CLUSTER_QUEUES)),
    ])
}
