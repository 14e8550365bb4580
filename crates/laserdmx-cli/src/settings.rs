use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use laserdmx_core::SessionConfig;

/// Read a TOML session file; a missing path yields the defaults.
pub fn load(path: Option<&Path>) -> Result<SessionConfig> {
    let Some(path) = path else {
        return Ok(SessionConfig::default());
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    parse(&text).with_context(|| format!("Invalid config file: {}", path.display()))
}

pub fn parse(text: &str) -> Result<SessionConfig> {
    Ok(toml::from_str(text)?)
}
