use std::path::Path;

use anyhow::{Context, Result};
use log::info;
use serde::{Deserialize, Serialize};

fn default_lazy_loading() -> bool {
    true
}

/// User-facing loader options.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct LoaderSettings {
    // Defer parsing per-side map configs until a side is randomized.
    #[serde(default = "default_lazy_loading")]
    pub lazy_loading: bool,
}

impl Default for LoaderSettings {
    fn default() -> Self {
        LoaderSettings {
            lazy_loading: true,
        }
    }
}

impl LoaderSettings {
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            info!("No settings at {}, using defaults", path.display());
            return Ok(LoaderSettings::default());
        }
        let settings_str = std::fs::read_to_string(path)
            .with_context(|| format!("Unable to read settings at {}", path.display()))?;
        let settings: LoaderSettings = serde_json::from_str(&settings_str)
            .with_context(|| format!("Unable to parse settings at {}", path.display()))?;
        Ok(settings)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let settings_str = serde_json::to_string_pretty(self)?;
        std::fs::write(path, settings_str)
            .with_context(|| format!("Unable to write settings to {}", path.display()))?;
        Ok(())
    }
}
