//! TOML configuration for the `trace` command.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use tetwalk_trace::TraceOptions;

/// Top-level config file layout.
///
/// ```toml
/// [trace]
/// max_depth = 200
/// timeout_ms = 50
/// check_origin = true
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub trace: TraceOptions,
}

impl Config {
    pub fn from_toml(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_toml(&text).with_context(|| format!("parsing config {}", path.display()))
    }
}
