//! Configuration loading.

use anyhow::{bail, Context, Result};
use std::fs;
use std::path::Path;

use lingua_catalog::config::LinguaConfig;

/// Default config file name, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "lingua.config.json";

/// Load and validate project configuration.
pub fn load_config(path: &Path) -> Result<LinguaConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("cannot read config file {}", path.display()))?;
    let config: LinguaConfig = serde_json::from_str(&content)
        .with_context(|| format!("malformed config file {}", path.display()))?;
    validate(&config).with_context(|| format!("invalid config file {}", path.display()))?;
    Ok(config)
}

fn validate(config: &LinguaConfig) -> Result<()> {
    if config.locales.is_empty() {
        bail!("no locales are configured");
    }
    if config.catalogs.is_empty() {
        bail!("no catalogs are configured");
    }
    if let Some(source_locale) = &config.source_locale {
        if !config.locales.contains(source_locale) {
            bail!("source locale \"{source_locale}\" is not in the locales list");
        }
    }
    Ok(())
}
