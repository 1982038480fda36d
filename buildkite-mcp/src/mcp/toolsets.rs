//! Toolsets and the toolset registry
//!
//! A [`Toolset`] groups the tools of one functional category. The
//! [`ToolsetRegistry`] owns every toolset, resolves an enabled-toolset
//! selection into a concrete tool list and reports the token scopes that
//! selection needs.
//!
//! The registry is populated once during startup and only read afterwards.
//! Nothing mutates it after that point, so it is shared as
//! `Arc<ToolsetRegistry>` and queried concurrently without locking.

use super::tool_registry::ToolDefinition;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use thiserror::Error;

/// Selection sentinel that enables every registered toolset
pub const TOOLSET_ALL: &str = "all";
/// Clusters and cluster queues
pub const TOOLSET_CLUSTERS: &str = "clusters";
/// Pipelines
pub const TOOLSET_PIPELINES: &str = "pipelines";
/// Builds and jobs
pub const TOOLSET_BUILDS: &str = "builds";
/// Build artifacts
pub const TOOLSET_ARTIFACTS: &str = "artifacts";
/// Job logs
pub const TOOLSET_LOGS: &str = "logs";
/// Test Engine runs and tests
pub const TOOLSET_TESTS: &str = "tests";
/// Build annotations
pub const TOOLSET_ANNOTATIONS: &str = "annotations";
/// Current user and organization
pub const TOOLSET_USER: &str = "user";

/// Every name accepted in a startup toolset selection
pub const VALID_TOOLSETS: &[&str] = &[
    TOOLSET_ALL,
    TOOLSET_CLUSTERS,
    TOOLSET_PIPELINES,
    TOOLSET_BUILDS,
    TOOLSET_ARTIFACTS,
    TOOLSET_LOGS,
    TOOLSET_TESTS,
    TOOLSET_ANNOTATIONS,
    TOOLSET_USER,
];

/// Check whether `name` may appear in a startup toolset selection
pub fn is_valid_toolset(name: &str) -> bool {
    VALID_TOOLSETS.contains(&name)
}

/// Errors raised while populating the registry
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// A tool name is already taken by another toolset, or repeats within one
    #[error("tool '{tool}' in toolset '{toolset}' is already registered by toolset '{existing}'")]
    DuplicateToolName {
        /// The clashing tool name
        tool: String,
        /// Toolset being registered
        toolset: String,
        /// Toolset that already owns the name
        existing: String,
    },

    /// The toolset key collides with the selection sentinel
    #[error("toolset name '{0}' is reserved")]
    ReservedName(String),
}

/// A named, described group of related tools
#[derive(Debug, Clone)]
pub struct Toolset {
    display_name: String,
    description: String,
    tools: Vec<ToolDefinition>,
}

impl Toolset {
    /// Create an empty toolset
    pub fn new(display_name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            description: description.into(),
            tools: Vec::new(),
        }
    }

    /// Append a tool, keeping insertion order
    pub fn with_tool(mut self, tool: ToolDefinition) -> Self {
        self.tools.push(tool);
        self
    }

    /// Append several tools, keeping insertion order
    pub fn with_tools(mut self, tools: impl IntoIterator<Item = ToolDefinition>) -> Self {
        self.tools.extend(tools);
        self
    }

    /// Human readable name, e.g. "Build Operations"
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// What the toolset is for
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Every tool, in insertion order
    pub fn all_tools(&self) -> &[ToolDefinition] {
        &self.tools
    }

    /// Tools annotated as read-only, in insertion order
    pub fn read_only_tools(&self) -> Vec<&ToolDefinition> {
        self.tools.iter().filter(|tool| tool.is_read_only()).collect()
    }

    /// Tools visible under the given read-only mode
    pub fn tools_for_mode(&self, read_only: bool) -> Vec<&ToolDefinition> {
        if read_only {
            self.read_only_tools()
        } else {
            self.tools.iter().collect()
        }
    }

    /// Sorted, de-duplicated union of every tool's scopes
    pub fn required_scopes(&self) -> Vec<String> {
        collect_scopes(self.tools.iter())
    }
}

/// Introspection data for one registered toolset
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolsetMetadata {
    /// Registry key
    pub name: String,
    /// Human readable name
    pub display_name: String,
    /// What the toolset is for
    pub description: String,
    /// Number of tools in the toolset
    pub tool_count: usize,
    /// Number of read-only tools in the toolset
    pub read_only_count: usize,
}

/// Registry for managing toolsets
#[derive(Debug, Default)]
pub struct ToolsetRegistry {
    toolsets: BTreeMap<String, Toolset>,
    /// Tool name to owning toolset key
    tool_index: HashMap<String, String>,
}

impl ToolsetRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the toolset stored under `name`.
    ///
    /// Tool names must be unique across the whole registry. A clash with a
    /// tool from a different toolset, or a name repeated inside `toolset`,
    /// leaves the registry unchanged and returns an error.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        toolset: Toolset,
    ) -> Result<(), RegistryError> {
        let name = name.into();
        if name == TOOLSET_ALL {
            return Err(RegistryError::ReservedName(name));
        }

        let mut seen = HashSet::new();
        for tool in &toolset.tools {
            let tool_name = tool.name();
            if !seen.insert(tool_name) {
                return Err(RegistryError::DuplicateToolName {
                    tool: tool_name.to_string(),
                    toolset: name.clone(),
                    existing: name.clone(),
                });
            }
            if let Some(existing) = self.tool_index.get(tool_name) {
                if existing != &name {
                    return Err(RegistryError::DuplicateToolName {
                        tool: tool_name.to_string(),
                        toolset: name.clone(),
                        existing: existing.clone(),
                    });
                }
            }
        }

        if let Some(previous) = self.toolsets.remove(&name) {
            for tool in &previous.tools {
                self.tool_index.remove(tool.name());
            }
        }
        for tool in &toolset.tools {
            self.tool_index.insert(tool.name().to_string(), name.clone());
        }

        tracing::debug!(toolset = %name, tools = toolset.tools.len(), "Registered toolset");
        self.toolsets.insert(name, toolset);
        Ok(())
    }

    /// Register several toolsets.
    ///
    /// Keys are registered in sorted order so the outcome, including which
    /// duplicate is reported, does not depend on the input order. Stops at
    /// the first error; toolsets registered before it are kept.
    pub fn register_toolsets<I, S>(&mut self, toolsets: I) -> Result<(), RegistryError>
    where
        I: IntoIterator<Item = (S, Toolset)>,
        S: Into<String>,
    {
        let sorted: BTreeMap<String, Toolset> = toolsets
            .into_iter()
            .map(|(name, toolset)| (name.into(), toolset))
            .collect();

        for (name, toolset) in sorted {
            self.register(name, toolset)?;
        }
        Ok(())
    }

    /// Look up a toolset by key
    pub fn get(&self, name: &str) -> Option<&Toolset> {
        self.toolsets.get(name)
    }

    /// Look up a tool by name, returning its toolset key and descriptor
    pub fn find_tool(&self, name: &str) -> Option<(&str, &ToolDefinition)> {
        let toolset_name = self.tool_index.get(name)?;
        let toolset = self.toolsets.get(toolset_name)?;
        let tool = toolset.tools.iter().find(|tool| tool.name() == name)?;
        Some((toolset_name.as_str(), tool))
    }

    /// Registered toolset keys, sorted
    pub fn list(&self) -> Vec<&str> {
        self.toolsets.keys().map(String::as_str).collect()
    }

    /// Toolsets in sorted key order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Toolset)> {
        self.toolsets
            .iter()
            .map(|(name, toolset)| (name.as_str(), toolset))
    }

    /// Every tool, in sorted toolset order then insertion order
    pub fn all_tools(&self) -> impl Iterator<Item = &ToolDefinition> {
        self.toolsets.values().flat_map(|toolset| toolset.tools.iter())
    }

    /// Number of registered toolsets
    pub fn len(&self) -> usize {
        self.toolsets.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.toolsets.is_empty()
    }

    /// Resolve a selection into toolsets. `"all"` anywhere expands to every
    /// toolset in sorted order; unknown names are skipped.
    fn resolve<S: AsRef<str>>(&self, enabled: &[S]) -> Vec<&Toolset> {
        if enabled.iter().any(|name| name.as_ref() == TOOLSET_ALL) {
            return self.toolsets.values().collect();
        }

        enabled
            .iter()
            .filter_map(|name| self.toolsets.get(name.as_ref()))
            .collect()
    }

    /// Tools of the enabled toolsets, in selection order.
    ///
    /// Unknown toolset names contribute nothing. A name repeated in the
    /// selection yields its tools twice.
    pub fn get_enabled_tools<S: AsRef<str>>(
        &self,
        enabled: &[S],
        read_only: bool,
    ) -> Vec<&ToolDefinition> {
        self.resolve(enabled)
            .into_iter()
            .flat_map(|toolset| toolset.tools_for_mode(read_only))
            .collect()
    }

    /// Sorted, de-duplicated scopes needed by [`Self::get_enabled_tools`]
    pub fn get_required_scopes<S: AsRef<str>>(&self, enabled: &[S], read_only: bool) -> Vec<String> {
        collect_scopes(self.get_enabled_tools(enabled, read_only).into_iter())
    }

    /// Metadata for every toolset, sorted by key
    pub fn get_metadata(&self) -> Vec<ToolsetMetadata> {
        self.iter()
            .map(|(name, toolset)| ToolsetMetadata {
                name: name.to_string(),
                display_name: toolset.display_name.clone(),
                description: toolset.description.clone(),
                tool_count: toolset.tools.len(),
                read_only_count: toolset.read_only_tools().len(),
            })
            .collect()
    }
}

fn collect_scopes<'a>(tools: impl Iterator<Item = &'a ToolDefinition>) -> Vec<String> {
    tools
        .flat_map(|tool| tool.required_scopes().iter().cloned())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{sample_registry, MockTool};

    fn names(tools: &[&ToolDefinition]) -> Vec<String> {
        tools.iter().map(|tool| tool.name().to_string()).collect()
    }

    #[test]
    fn test_registry_creation() {
        let registry = ToolsetRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.len(), 0);
        assert!(registry.list().is_empty());
        assert!(registry.get_metadata().is_empty());
    }

    #[test]
    fn test_list_is_sorted() {
        let mut registry = ToolsetRegistry::new();
        for name in ["logs", "builds", "artifacts", "user"] {
            registry
                .register(name, Toolset::new(name, format!("{name} tools")))
                .unwrap();
        }
        assert_eq!(registry.list(), vec!["artifacts", "builds", "logs", "user"]);
    }

    #[test]
    fn test_enabled_tools_all_read_only() {
        let registry = sample_registry();
        let tools = registry.get_enabled_tools(&["all"], true);
        assert_eq!(names(&tools), vec!["get_artifact", "list_builds"]);
    }

    #[test]
    fn test_enabled_tools_all_writable() {
        let registry = sample_registry();
        let tools = registry.get_enabled_tools(&["all"], false);
        assert_eq!(
            names(&tools),
            vec!["get_artifact", "list_builds", "create_build"]
        );
    }

    #[test]
    fn test_required_scopes_for_all() {
        let registry = sample_registry();
        assert_eq!(
            registry.get_required_scopes(&["all"], false),
            vec!["read_artifacts", "write_builds"]
        );
        assert_eq!(
            registry.get_required_scopes(&["all"], true),
            vec!["read_artifacts"]
        );
    }

    #[test]
    fn test_all_sentinel_matches_explicit_list() {
        let registry = sample_registry();
        let explicit = registry.list();

        for read_only in [true, false] {
            assert_eq!(
                names(&registry.get_enabled_tools(&["all"], read_only)),
                names(&registry.get_enabled_tools(&explicit, read_only))
            );
            assert_eq!(
                registry.get_required_scopes(&["builds", "all"], read_only),
                registry.get_required_scopes(&explicit, read_only)
            );
        }
    }

    #[test]
    fn test_selection_order_is_preserved() {
        let registry = sample_registry();
        let tools = registry.get_enabled_tools(&["builds", "artifacts"], false);
        assert_eq!(
            names(&tools),
            vec!["list_builds", "create_build", "get_artifact"]
        );
    }

    #[test]
    fn test_repeated_selection_is_not_deduplicated() {
        let registry = sample_registry();
        let tools = registry.get_enabled_tools(&["artifacts", "artifacts"], false);
        assert_eq!(names(&tools), vec!["get_artifact", "get_artifact"]);
    }

    #[test]
    fn test_unknown_toolsets_contribute_nothing() {
        let registry = sample_registry();
        assert!(registry.get_enabled_tools(&["nope"], false).is_empty());
        assert!(registry.get_required_scopes(&["nope"], false).is_empty());

        let tools = registry.get_enabled_tools(&["nope", "artifacts"], false);
        assert_eq!(names(&tools), vec!["get_artifact"]);
        assert!(registry.get("nope").is_none());
    }

    #[test]
    fn test_empty_selection() {
        let registry = sample_registry();
        let empty: [&str; 0] = [];
        assert!(registry.get_enabled_tools(&empty, false).is_empty());
        assert!(registry.get_required_scopes(&empty, false).is_empty());
    }

    #[test]
    fn test_toolset_views() {
        let registry = sample_registry();
        let builds = registry.get("builds").unwrap();

        assert_eq!(builds.all_tools().len(), 2);
        assert_eq!(names(&builds.read_only_tools()), vec!["list_builds"]);
        assert_eq!(builds.required_scopes(), vec!["write_builds"]);
        assert_eq!(builds.display_name(), "Build Operations");
    }

    #[test]
    fn test_metadata() {
        let registry = sample_registry();
        let metadata = registry.get_metadata();

        assert_eq!(metadata.len(), 2);
        assert_eq!(metadata[0].name, "artifacts");
        assert_eq!(metadata[0].tool_count, 1);
        assert_eq!(metadata[0].read_only_count, 1);
        assert_eq!(metadata[1].name, "builds");
        assert_eq!(metadata[1].tool_count, 2);
        assert_eq!(metadata[1].read_only_count, 1);

        let json = serde_json::to_value(&metadata[1]).unwrap();
        assert_eq!(json["read_only_count"], 1);
        assert_eq!(json["display_name"], "Build Operations");
    }

    #[test]
    fn test_metadata_reflects_replacement() {
        let mut registry = sample_registry();
        registry
            .register(
                "builds",
                Toolset::new("Builds", "Only reads").with_tool(ToolDefinition::new(
                    MockTool::new("get_build", "Get a build").read_only(true),
                )),
            )
            .unwrap();

        let builds = &registry.get_metadata()[1];
        assert_eq!(builds.description, "Only reads");
        assert_eq!(builds.tool_count, 1);
        assert_eq!(builds.read_only_count, 1);

        assert!(registry.find_tool("create_build").is_none());
        assert!(registry.find_tool("get_build").is_some());
    }

    #[test]
    fn test_find_tool() {
        let registry = sample_registry();
        let (toolset, tool) = registry.find_tool("create_build").unwrap();
        assert_eq!(toolset, "builds");
        assert_eq!(tool.name(), "create_build");
        assert!(registry.find_tool("missing").is_none());
    }

    #[test]
    fn test_duplicate_tool_across_toolsets_is_rejected() {
        let mut registry = sample_registry();
        let clash = Toolset::new("Clash", "Reuses a name")
            .with_tool(ToolDefinition::new(MockTool::new("list_builds", "Again")));

        let err = registry.register("clash", clash).unwrap_err();
        assert_eq!(
            err,
            RegistryError::DuplicateToolName {
                tool: "list_builds".to_string(),
                toolset: "clash".to_string(),
                existing: "builds".to_string(),
            }
        );
        assert!(registry.get("clash").is_none());
        assert_eq!(registry.find_tool("list_builds").unwrap().0, "builds");
    }

    #[test]
    fn test_duplicate_tool_within_toolset_is_rejected() {
        let mut registry = ToolsetRegistry::new();
        let toolset = Toolset::new("Twice", "Same tool twice").with_tools([
            ToolDefinition::new(MockTool::new("same", "first")),
            ToolDefinition::new(MockTool::new("same", "second")),
        ]);

        assert!(matches!(
            registry.register("twice", toolset),
            Err(RegistryError::DuplicateToolName { .. })
        ));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_all_is_reserved() {
        let mut registry = ToolsetRegistry::new();
        assert_eq!(
            registry.register("all", Toolset::new("All", "nope")),
            Err(RegistryError::ReservedName("all".to_string()))
        );
    }

    #[test]
    fn test_register_toolsets_order_independent() {
        let build = || {
            vec![
                (
                    "builds",
                    Toolset::new("Builds", "b")
                        .with_tool(ToolDefinition::new(MockTool::new("list_builds", "l"))),
                ),
                (
                    "artifacts",
                    Toolset::new("Artifacts", "a")
                        .with_tool(ToolDefinition::new(MockTool::new("get_artifact", "g"))),
                ),
            ]
        };

        let mut forward = ToolsetRegistry::new();
        forward.register_toolsets(build()).unwrap();

        let mut reverse = ToolsetRegistry::new();
        reverse
            .register_toolsets(build().into_iter().rev())
            .unwrap();

        assert_eq!(forward.list(), reverse.list());
        assert_eq!(forward.get_metadata(), reverse.get_metadata());
    }

    #[test]
    fn test_valid_toolset_names() {
        assert!(is_valid_toolset("all"));
        assert!(is_valid_toolset("builds"));
        assert!(!is_valid_toolset("nope"));
        assert!(!is_valid_toolset(""));
    }
}
