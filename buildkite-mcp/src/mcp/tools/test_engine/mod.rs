//! Test Engine tools

use super::endpoint::{Endpoint, EndpointTool, Param, ParamKind, ORG_SLUG};
use crate::buildkite::HttpMethod;
use crate::mcp::tool_registry::ToolDefinition;
use crate::mcp::toolsets::Toolset;

const TEST_SUITE_SLUG: Param = Param::path("test_suite_slug", "The slug of the test suite");
const RUN_ID: Param = Param::path("run_id", "The ID of the test run");
const TEST_ID: Param = Param::path("test_id", "The ID of the test");

static LIST_TEST_RUNS: Endpoint = Endpoint {
    name: "list_test_runs",
    description: "List all test runs for a test suite in Test Engine, with their status, branch and commit",
    method: HttpMethod::Get,
    path: "v2/analytics/organizations/{org_slug}/suites/{test_suite_slug}/runs",
    params: &[ORG_SLUG, TEST_SUITE_SLUG],
    fixed_query: &[],
    paginated: true,
    extract: None,
    scopes: &["read_suites"],
    read_only: true,
};

static GET_TEST_RUN: Endpoint = Endpoint {
    name: "get_test_run",
    description: "Get a specific test run in Test Engine including its result counts and timing",
    method: HttpMethod::Get,
    path: "v2/analytics/organizations/{org_slug}/suites/{test_suite_slug}/runs/{run_id}",
    params: &[ORG_SLUG, TEST_SUITE_SLUG, RUN_ID],
    fixed_query: &[],
    paginated: false,
    extract: None,
    scopes: &["read_suites"],
    read_only: true,
};

static GET_FAILED_TEST_EXECUTIONS: Endpoint = Endpoint {
    name: "get_failed_test_executions",
    description: "Get the failed test executions of a test run in Test Engine, optionally with expanded failure details",
    method: HttpMethod::Get,
    path: "v2/analytics/organizations/{org_slug}/suites/{test_suite_slug}/runs/{run_id}/failed_executions",
    params: &[
        ORG_SLUG,
        TEST_SUITE_SLUG,
        RUN_ID,
        Param::query(
            "include_failure_expanded",
            "Include the expanded failure details such as stack traces",
            ParamKind::Boolean,
        ),
    ],
    fixed_query: &[],
    paginated: true,
    extract: None,
    scopes: &["read_suites"],
    read_only: true,
};

static GET_TEST: Endpoint = Endpoint {
    name: "get_test",
    description: "Get a specific test in Test Engine including its name, scope, location and reliability",
    method: HttpMethod::Get,
    path: "v2/analytics/organizations/{org_slug}/suites/{test_suite_slug}/tests/{test_id}",
    params: &[ORG_SLUG, TEST_SUITE_SLUG, TEST_ID],
    fixed_query: &[],
    paginated: false,
    extract: None,
    scopes: &["read_suites"],
    read_only: true,
};

/// The `tests` toolset
pub fn create_toolset() -> Toolset {
    Toolset::new("Test Engine", "Tools for managing test runs and test results").with_tools([
        ToolDefinition::deferred(EndpointTool::new(&LIST_TEST_RUNS)),
        ToolDefinition::deferred(EndpointTool::new(&GET_TEST_RUN)),
        ToolDefinition::deferred(EndpointTool::new(&GET_FAILED_TEST_EXECUTIONS)),
        ToolDefinition::deferred(EndpointTool::new(&GET_TEST)),
    ])
}
