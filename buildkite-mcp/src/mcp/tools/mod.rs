//! Builtin Buildkite tools, grouped by toolset
//!
//! Each category module exposes `create_toolset()`. Most tools are static
//! [`endpoint::Endpoint`] descriptions; the few that do more than one API call
//! or post-process the response implement [`McpTool`](crate::mcp::McpTool)
//! directly.

pub mod annotations;
pub mod artifacts;
pub mod builds;
pub mod clusters;
pub mod discovery;
pub mod endpoint;
pub mod logs;
pub mod pipelines;
pub mod test_engine;
pub mod user;

use crate::mcp::toolsets::{
    RegistryError, Toolset, ToolsetRegistry, TOOLSET_ANNOTATIONS, TOOLSET_ARTIFACTS,
    TOOLSET_BUILDS, TOOLSET_CLUSTERS, TOOLSET_LOGS, TOOLSET_PIPELINES, TOOLSET_TESTS,
    TOOLSET_USER,
};

/// Every builtin toolset keyed by its registry name
pub fn create_builtin_toolsets() -> Vec<(&'static str, Toolset)> {
    vec![
        (TOOLSET_CLUSTERS, clusters::create_toolset()),
        (TOOLSET_PIPELINES, pipelines::create_toolset()),
        (TOOLSET_BUILDS, builds::create_toolset()),
        (TOOLSET_ARTIFACTS, artifacts::create_toolset()),
        (TOOLSET_LOGS, logs::create_toolset()),
        (TOOLSET_TESTS, test_engine::create_toolset()),
        (TOOLSET_ANNOTATIONS, annotations::create_toolset()),
        (TOOLSET_USER, user::create_toolset()),
    ]
}

/// A registry populated with every builtin toolset
///
/// # Errors
///
/// Returns an error if two builtin tools share a name.
pub fn builtin_registry() -> Result<ToolsetRegistry, RegistryError> {
    let mut registry = ToolsetRegistry::new();
    registry.register_toolsets(create_builtin_toolsets())?;
    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mcp::toolsets::{TOOLSET_ALL, VALID_TOOLSETS};
    use std::collections::HashSet;

    #[test]
    fn test_every_valid_toolset_is_builtin() {
        let registry = builtin_registry().unwrap();
        let expected: Vec<&str> = {
            let mut names: Vec<&str> = VALID_TOOLSETS
                .iter()
                .copied()
                .filter(|name| *name != TOOLSET_ALL)
                .collect();
            names.sort_unstable();
            names
        };
        assert_eq!(registry.list(), expected);
    }

    #[test]
    fn test_builtin_tool_names_are_unique() {
        let registry = builtin_registry().unwrap();
        let names: HashSet<&str> = registry.all_tools().map(|tool| tool.name()).collect();
        assert_eq!(names.len(), registry.all_tools().count());
        assert_eq!(names.len(), 28);
    }

    #[test]
    fn test_eager_tools() {
        let registry = builtin_registry().unwrap();
        let mut eager: Vec<&str> = registry
            .all_tools()
            .filter(|tool| !tool.defer_loading())
            .map(|tool| tool.name())
            .collect();
        eager.sort_unstable();

        assert_eq!(
            eager,
            vec![
                "current_user",
                "get_build",
                "list_artifacts_for_build",
                "list_builds",
                "list_pipelines",
                "read_logs",
                "search_logs",
                "tail_logs",
            ]
        );
    }

    #[test]
    fn test_write_tools() {
        let registry = builtin_registry().unwrap();
        let mut writes: Vec<&str> = registry
            .all_tools()
            .filter(|tool| !tool.is_read_only())
            .map(|tool| tool.name())
            .collect();
        writes.sort_unstable();

        assert_eq!(
            writes,
            vec!["create_build", "create_pipeline", "unblock_job", "update_pipeline"]
        );
    }

    #[test]
    fn test_scopes_for_read_only_builds() {
        let registry = builtin_registry().unwrap();
        let scopes = registry.get_required_scopes(&[TOOLSET_BUILDS], true);
        assert_eq!(scopes, vec!["read_builds".to_string()]);

        let scopes = registry.get_required_scopes(&[TOOLSET_BUILDS], false);
        assert_eq!(
            scopes,
            vec!["read_builds".to_string(), "write_builds".to_string()]
        );
    }

    #[test]
    fn test_every_tool_has_object_schema() {
        let registry = builtin_registry().unwrap();
        for tool in registry.all_tools() {
            assert_eq!(
                tool.input_schema().get("type"),
                Some(&serde_json::json!("object")),
                "{} schema",
                tool.name()
            );
            assert!(!tool.description().is_empty(), "{} description", tool.name());
        }
    }
}
