//! `jmc.toml` loading

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use jmc_layout::SyncConfig;
use serde::Deserialize;

/// File name looked up in the module directory
pub const CONFIG_FILE: &str = "jmc.toml";

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ConfigFile {
    sync: SyncConfig,
}

/// Load sync settings
///
/// An explicit `path` must exist; otherwise `jmc.toml` in `module_dir` is
/// used when present, else the defaults.
///
/// # Errors
/// Returns error if the file cannot be read or parsed
pub fn load(path: Option<&Path>, module_dir: &Path) -> Result<SyncConfig> {
    let candidate = module_dir.join(CONFIG_FILE);
    let path = match path {
        Some(path) => path,
        None if candidate.is_file() => candidate.as_path(),
        None => return Ok(SyncConfig::default()),
    };

    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    let file: ConfigFile = toml::from_str(&text)
        .with_context(|| format!("invalid config {}", path.display()))?;

    tracing::debug!("Loaded config from {}", path.display());
    Ok(file.sync)
}
