//! Prompts and resources served alongside the tools

use rmcp::model::{
    GetPromptResult, Prompt, PromptMessage, PromptMessageContent, PromptMessageRole, RawResource,
    ReadResourceResult, Resource, ResourceContents,
};

/// Prompt that points the assistant at the token's organization first
pub const USER_TOKEN_ORGANIZATION_PROMPT: &str = "user_token_organization_prompt";

/// URI of the log debugging guide
pub const DEBUG_LOGS_GUIDE_URI: &str = "debug-logs-guide";

const MARKDOWN: &str = "text/markdown";

/// Every prompt the server offers
pub fn list_prompts() -> Vec<Prompt> {
    vec![Prompt {
        name: USER_TOKEN_ORGANIZATION_PROMPT.to_string(),
        description: Some(
            "When asked for detail of a users pipelines start by looking up the user's token organization"
                .to_string(),
        ),
        arguments: None,
    }]
}

/// Render a prompt by name, `None` if it does not exist
pub fn get_prompt(name: &str) -> Option<GetPromptResult> {
    let prompt = list_prompts().into_iter().find(|prompt| prompt.name == name)?;
    let text = match name {
        USER_TOKEN_ORGANIZATION_PROMPT => include_str!("user_token_organization_prompt.md"),
        _ => return None,
    };

    Some(GetPromptResult {
        description: prompt.description,
        messages: vec![PromptMessage {
            role: PromptMessageRole::User,
            content: PromptMessageContent::Text {
                text: text.trim_end().to_string(),
            },
        }],
    })
}

/// Every resource the server offers
pub fn list_resources() -> Vec<Resource> {
    let mut guide = RawResource::new(DEBUG_LOGS_GUIDE_URI, "Debug Logs Guide");
    guide.description =
        Some("Comprehensive guide for debugging Buildkite build failures using logs".to_string());
    guide.mime_type = Some(MARKDOWN.to_string());

    vec![Resource::new(guide, None)]
}

/// Read a resource by URI, `None` if it does not exist
pub fn read_resource(uri: &str) -> Option<ReadResourceResult> {
    let text = match uri {
        DEBUG_LOGS_GUIDE_URI => include_str!("debug_logs_guide.md"),
        _ => return None,
    };

    Some(ReadResourceResult {
        contents: vec![ResourceContents::TextResourceContents {
            uri: uri.to_string(),
            mime_type: Some(MARKDOWN.to_string()),
            text: text.to_string(),
        }],
    })
}
