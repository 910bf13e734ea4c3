//! Settings file loading.
//!
//! Resolution order, highest first:
//! 1. `--config <PATH>` (clap also fills this from `CALLPRICE_CONFIG`)
//! 2. `<config_dir>/callprice/config.toml`
//! 3. compiled defaults

use std::path::{Path, PathBuf};

use anyhow::Context;
use callprice_core::Thresholds;
use serde::Deserialize;
use tracing::{debug, warn};

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub thresholds: Thresholds,
}

impl Settings {
    pub fn from_toml(content: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(content)?)
    }
}

/// Default settings path for the platform, if one exists on disk.
fn user_config_file() -> Option<PathBuf> {
    dirs::config_dir()
        .map(|d| d.join("callprice").join("config.toml"))
        .filter(|p| p.exists())
}

/// Load settings from an explicit path, the user config file, or defaults.
///
/// An explicit path that cannot be read is an error. A malformed user config
/// file is logged and skipped.
pub fn load_settings(explicit: Option<&Path>) -> anyhow::Result<Settings> {
    if let Some(path) = explicit {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let settings = Settings::from_toml(&content)
            .with_context(|| format!("parsing config {}", path.display()))?;
        debug!(path = %path.display(), "loaded config");
        return Ok(settings);
    }

    if let Some(path) = user_config_file() {
        match std::fs::read_to_string(&path)
            .map_err(anyhow::Error::from)
            .and_then(|c| Settings::from_toml(&c))
        {
            Ok(settings) => {
                debug!(path = %path.display(), "loaded config");
                return Ok(settings);
            }
            Err(e) => warn!(path = %path.display(), error = %e, "ignoring unreadable config"),
        }
    }

    Ok(Settings::default())
}
