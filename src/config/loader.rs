//! Config file loading

use crate::domain::Config;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

pub fn load_config(anchor: &Path, config_path: Option<&Path>) -> Result<Config> {
    let config_path_provided = config_path.is_some();

    let discovered = match config_path {
        Some(path) => Some(path.to_path_buf()),
        None => discover_config(anchor),
    };

    let Some(config_file) = discovered else {
        return Ok(Config::default());
    };

    let content = fs::read_to_string(&config_file)
        .with_context(|| format!("failed reading config file: {}", config_file.display()))?;

    let ext = config_file.extension().and_then(|e| e.to_str()).unwrap_or("").to_ascii_lowercase();

    // An explicitly provided file must parse; an auto-discovered one that
    // does not is warned about and replaced by defaults.
    let parsed = match ext.as_str() {
        "toml" => parse_toml_config(&content, &config_file),
        "yaml" | "yml" => parse_yaml_config(&content, &config_file),
        other => Err(anyhow::anyhow!(
            "unsupported config extension '.{}' for file {}",
            other,
            config_file.display()
        )),
    };

    match parsed {
        Ok(config) => Ok(config),
        Err(err) => {
            if config_path_provided {
                return Err(err);
            }
            tracing::warn!(
                "ignoring auto-discovered config {}: {}",
                config_file.display(),
                err
            );
            Ok(Config::default())
        }
    }
}

/// Parse TOML config, supporting a nested [code-extract] section so the
/// settings can live inside a larger project file.
fn parse_toml_config(content: &str, config_file: &Path) -> Result<Config> {
    let raw: toml::Value = toml::from_str(content)
        .with_context(|| format!("invalid TOML syntax: {}", config_file.display()))?;

    let config_val = match raw.get("code-extract") {
        Some(nested) => nested.clone(),
        None => raw,
    };

    config_val
        .try_into()
        .with_context(|| format!("invalid TOML config: {}", config_file.display()))
}

/// Parse YAML config, with the same nested-section support.
fn parse_yaml_config(content: &str, config_file: &Path) -> Result<Config> {
    let raw: serde_yaml::Value = serde_yaml::from_str(content)
        .with_context(|| format!("invalid YAML syntax: {}", config_file.display()))?;

    let config_val = match raw.get("code-extract") {
        Some(nested) => nested.clone(),
        None => raw,
    };

    serde_yaml::from_value(config_val)
        .with_context(|| format!("invalid YAML config: {}", config_file.display()))
}

fn discover_config(anchor: &Path) -> Option<PathBuf> {
    let candidates = [
        "code-extract.toml",
        ".code-extract.toml",
        ".code-extract.yml",
        ".code-extract.yaml",
    ];

    candidates.iter().map(|name| anchor.join(name)).find(|path| path.exists())
}
