use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{city::CityId, source::open_meteo::OpenMeteoConfig};

/// Top-level configuration stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    /// Optional default city id, e.g. "elobour" or "october".
    pub default_city: Option<String>,

    /// Example TOML:
    /// [open_meteo]
    /// forecast_base_url = "https://api.open-meteo.com/v1"
    /// timeout_secs = 10
    #[serde(default)]
    pub open_meteo: OpenMeteoConfig,
}

impl Config {
    /// Return the default city as a strongly-typed CityId.
    pub fn default_city_id(&self) -> Result<CityId> {
        let s = self.default_city.as_ref().ok_or_else(|| {
            anyhow!(
                "No city given and no default city configured.\n\
                 Hint: pass a city (e.g. `citytemp show elobour`) or run `citytemp configure`."
            )
        })?;

        CityId::try_from(s.as_str())
    }

    pub fn set_default_city(&mut self, id: CityId) {
        self.default_city = Some(id.as_str().to_string());
    }

    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_file_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "citytemp", "citytemp-cli")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}
