//! Buildkite API token resolution

use crate::error::{CliError, CliResult};
use crate::exit_codes::EXIT_ERROR;
use anyhow::{bail, Context};
use buildkite_mcp::ConfigError;
use tokio::process::Command;

/// Pick the API token from exactly one of the two sources.
///
/// Empty values count as absent. A 1Password reference is read with
/// `op read -n <reference>`.
pub async fn resolve_api_token(
    token: Option<&str>,
    token_from_1password: Option<&str>,
) -> CliResult<String> {
    let token = token.filter(|value| !value.is_empty());
    let reference = token_from_1password.filter(|value| !value.is_empty());

    match (token, reference) {
        (Some(_), Some(_)) => Err(CliError::config(ConfigError::ConflictingTokenSources)),
        (None, None) => Err(CliError::config(ConfigError::MissingToken)),
        (Some(token), None) => Ok(token.to_string()),
        (None, Some(reference)) => fetch_token_from_1password(reference)
            .await
            .map_err(|e| {
                CliError::new(
                    format!("failed to fetch API token from 1Password: {e:#}"),
                    EXIT_ERROR,
                )
            }),
    }
}

async fn fetch_token_from_1password(reference: &str) -> anyhow::Result<String> {
    // -n: no trailing newline
    let output = Command::new("op")
        .args(["read", "-n", reference])
        .output()
        .await
        .context("failed to run the 1Password CLI")?;

    if !output.status.success() {
        bail!(
            "command failed: {}",
            String::from_utf8_lossy(&output.stderr).trim()
        );
    }

    tracing::info!("Fetched API token from 1Password");
    String::from_utf8(output.stdout).context("1Password returned a token that is not UTF-8")
}
