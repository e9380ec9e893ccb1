use anyhow::{Context, Result, anyhow, bail};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    collections::HashSet,
    fs,
    path::{Path, PathBuf},
};

use crate::{
    model::Location,
    params::QueryParams,
    pipeline::DEFAULT_DATA_KEY,
    provider::open_meteo::DEFAULT_BASE_URL,
};

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// base_url = "https://api.open-meteo.com/v1/forecast"
/// data_key = "hourly"
/// output = "weather.csv"
///
/// [params]
/// hourly = ["temperature_2m", "precipitation"]
///
/// [[locations]]
/// name = "Pune"
/// latitude = 18.5204
/// longitude = 73.8567
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub base_url: String,

    #[serde(default = "default_data_key")]
    pub data_key: String,

    /// Where `meteo run` writes the combined table.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,

    /// Shared query parameters sent for every location.
    #[serde(default)]
    pub params: QueryParams,

    #[serde(default)]
    pub locations: Vec<Location>,
}

fn default_data_key() -> String {
    DEFAULT_DATA_KEY.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            data_key: default_data_key(),
            output: None,
            params: QueryParams::default(),
            locations: Vec::new(),
        }
    }
}

impl Config {
    /// Load config from `path`, or from the platform config file when `path` is `None`.
    ///
    /// A missing platform file yields the defaults; a missing explicit file is an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => {
                let p = Self::config_file_path()?;
                if !p.exists() {
                    // First run: no config file, return defaults.
                    return Ok(Self::default());
                }
                p
            }
        };

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        let cfg: Config = toml::from_str(contents)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Save config to `path` (or the platform config file), creating parent directories as needed.
    pub fn save(&self, path: Option<&Path>) -> Result<PathBuf> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => Self::config_file_path()?,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(path)
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "meteo", "meteo")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    pub fn validate(&self) -> Result<()> {
        if self.base_url.trim().is_empty() {
            bail!("`base_url` must not be empty");
        }
        if self.data_key.trim().is_empty() {
            bail!("`data_key` must not be empty");
        }

        let mut names = HashSet::new();
        for location in &self.locations {
            if !names.insert(location.name.as_str()) {
                bail!("Location '{}' is listed more than once", location.name);
            }
        }

        Ok(())
    }

    /// Add a location, or move an existing one with the same name to new coordinates.
    pub fn upsert_location(&mut self, location: Location) {
        match self.locations.iter_mut().find(|l| l.name == location.name) {
            Some(existing) => *existing = location,
            None => self.locations.push(location),
        }
    }
}
