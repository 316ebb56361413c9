use anyhow::{Context, Result};
use opmerge_core::GameConfig;
use std::path::Path;

/// Rules from `path`, or the standard rules when no file is given.
pub fn load(path: Option<&Path>) -> Result<GameConfig> {
    let Some(path) = path else {
        return Ok(GameConfig::standard());
    };

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let config = parse(&content).with_context(|| format!("Invalid config {}", path.display()))?;
    log::debug!("Loaded rules from {}: {:?}", path.display(), config);
    Ok(config)
}

fn parse(content: &str) -> Result<GameConfig> {
    let config: GameConfig = toml::from_str(content).context("Failed to parse config TOML")?;
    config.validate()?;
    Ok(config)
}
