//! User, organization and token tools

use super::endpoint::{Endpoint, EndpointTool};
use crate::buildkite::HttpMethod;
use crate::mcp::tool_registry::ToolDefinition;
use crate::mcp::toolsets::Toolset;

static CURRENT_USER: Endpoint = Endpoint {
    name: "current_user",
    description: "Get details about the user account that owns the API token, including name, email, avatar, and account creation date",
    method: HttpMethod::Get,
    path: "v2/user",
    params: &[],
    fixed_query: &[],
    paginated: false,
    extract: None,
    scopes: &["read_user"],
    read_only: true,
};

static USER_TOKEN_ORGANIZATION: Endpoint = Endpoint {
    name: "user_token_organization",
    description: "Get the organization associated with the user token used for this request",
    method: HttpMethod::Get,
    path: "v2/organizations",
    params: &[],
    fixed_query: &[],
    paginated: false,
    extract: Some("/0"),
    scopes: &["read_organizations"],
    read_only: true,
};

static ACCESS_TOKEN: Endpoint = Endpoint {
    name: "access_token",
    description: "Get information about the current API access token including its scopes and UUID",
    method: HttpMethod::Get,
    path: "v2/access-token",
    params: &[],
    fixed_query: &[],
    paginated: false,
    extract: None,
    scopes: &[],
    read_only: true,
};

/// The `user` toolset
pub fn create_toolset() -> Toolset {
    Toolset::new("User & Organization", "Tools for user and organization information").with_tools([
        ToolDefinition::new(EndpointTool::new(&CURRENT_USER)),
        ToolDefinition::deferred(EndpointTool::new(&USER_TOKEN_ORGANIZATION)),
        ToolDefinition::deferred(EndpointTool::new(&ACCESS_TOKEN)),
    ])
}
