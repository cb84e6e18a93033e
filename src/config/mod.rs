//! Configuration loading and validation

mod schema;

pub use schema::*;

use anyhow::{Context, Result};
use std::path::Path;

/// Load configuration from a YAML file
pub fn load_config(path: &Path) -> Result<SoundbedConfig> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config {:?}", path))?;
    let config: SoundbedConfig = serde_yaml::from_str(&contents)
        .with_context(|| format!("failed to parse config {:?}", path))?;
    config.validate()?;
    Ok(config)
}

/// Load `path` if it exists, otherwise fall back to the defaults
pub fn load_or_default(path: &Path) -> Result<SoundbedConfig> {
    if path.exists() {
        load_config(path)
    } else {
        tracing::debug!("no config at {:?}, using defaults", path);
        Ok(SoundbedConfig::default())
    }
}
