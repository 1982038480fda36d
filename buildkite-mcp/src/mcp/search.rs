//! Keyword search over registered tools

use super::tool_registry::ToolDefinition;
use super::toolsets::ToolsetRegistry;
use serde::Serialize;
use std::num::NonZeroUsize;

/// Where a query matched a tool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchLocation {
    /// Only the tool name contains the query
    Name,
    /// Only the description contains the query
    Description,
    /// Both name and description contain the query
    Both,
}

impl MatchLocation {
    fn classify(name_match: bool, description_match: bool) -> Option<Self> {
        match (name_match, description_match) {
            (true, true) => Some(MatchLocation::Both),
            (true, false) => Some(MatchLocation::Name),
            (false, true) => Some(MatchLocation::Description),
            (false, false) => None,
        }
    }

    /// Wire name: `"name"`, `"description"` or `"both"`
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchLocation::Name => "name",
            MatchLocation::Description => "description",
            MatchLocation::Both => "both",
        }
    }
}

/// One search hit
#[derive(Debug, Clone)]
pub struct SearchResult<'a> {
    /// The matching tool
    pub tool: &'a ToolDefinition,
    /// Key of the toolset that owns the tool
    pub toolset_name: &'a str,
    /// Where the query matched
    pub matched_in: MatchLocation,
    /// Token scopes the tool needs
    pub required_scopes: &'a [String],
    /// Whether the tool is read-only
    pub read_only: bool,
}

impl ToolsetRegistry {
    /// Case-insensitive substring search over tool names and description
    /// summaries.
    ///
    /// Toolsets are scanned in sorted order and tools in insertion order.
    /// Scanning stops once `limit` hits are collected; the hits are then
    /// sorted by tool name. An empty query matches every tool.
    pub fn search_tools_with_metadata(&self, query: &str, limit: NonZeroUsize) -> Vec<SearchResult<'_>> {
        let limit = limit.get();
        let query = query.to_lowercase();
        let mut results = Vec::new();

        'scan: for (toolset_name, toolset) in self.iter() {
            for tool in toolset.all_tools() {
                let name_match = tool.name().to_lowercase().contains(&query);
                let description_match = tool.summary().to_lowercase().contains(&query);

                let Some(matched_in) = MatchLocation::classify(name_match, description_match) else {
                    continue;
                };

                results.push(SearchResult {
                    tool,
                    toolset_name,
                    matched_in,
                    required_scopes: tool.required_scopes(),
                    read_only: tool.is_read_only(),
                });

                if results.len() >= limit {
                    break 'scan;
                }
            }
        }

        results.sort_by(|a, b| a.tool.name().cmp(b.tool.name()));
        results
    }
}
