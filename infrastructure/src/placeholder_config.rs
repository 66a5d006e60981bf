use anyhow::Context;
use domain::{PlaceholderMap, SupportBotError};
use std::path::Path;

pub fn try_load_placeholders(path: &Path) -> Result<PlaceholderMap, SupportBotError> {
    let load = || -> shared::types::Result<PlaceholderMap> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let map = serde_json::from_str(&raw)
            .with_context(|| format!("parsing {}", path.display()))?;
        Ok(map)
    };
    load().map_err(SupportBotError::placeholder_config)
}

/// Placeholder values for the process. A missing or corrupt file is not fatal: the bot
/// runs with no substitutions.
pub fn load_placeholders(path: &Path) -> PlaceholderMap {
    match try_load_placeholders(path) {
        Ok(map) => {
            tracing::info!(path = %path.display(), entries = map.len(), "placeholders loaded");
            map
        }
        Err(err) => {
            tracing::warn!(%err, "continuing without placeholder values");
            PlaceholderMap::new()
        }
    }
}
