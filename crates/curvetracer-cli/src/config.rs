//! Settings file loading.
//!
//! ```toml
//! [entry_angle]
//! tolerance = 0.001
//! no_intersection = "zero"
//! ```

use std::path::Path;

use anyhow::{Context, Result};
use curvetracer::Settings;
use serde::Deserialize;

/// Top-level layout of a settings file.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    /// Entry angle parameters.
    pub entry_angle: Settings,
}

impl ConfigFile {
    /// Parse settings from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: ConfigFile = toml::from_str(text).context("invalid settings file")?;
        config.entry_angle.validate()?;
        Ok(config)
    }

    /// Read settings from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::from_toml_str(&text).with_context(|| format!("in {}", path.display()))
    }
}
