use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{env, fs, path::PathBuf};

use crate::model::Units;

/// Environment variable that overrides the stored OpenWeather API key.
pub const API_KEY_ENV: &str = "OPENWEATHER_API_KEY";

/// Fallback city when neither the command line nor the config names one.
pub const DEFAULT_CITY: &str = "Москва";

/// Fallback language for localized descriptions.
pub const DEFAULT_LANG: &str = "ru";

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// api_key = "..."
/// default_city = "Москва"
/// units = "metric"
/// lang = "ru"
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    pub api_key: Option<String>,
    pub default_city: Option<String>,
    pub units: Option<String>,
    pub lang: Option<String>,
}

impl Config {
    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "advisor", "advisor-cli")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// API key resolution: environment variable first, then the stored key.
    pub fn resolved_api_key(&self) -> Result<String> {
        if let Ok(key) = env::var(API_KEY_ENV) {
            let key = key.trim().to_string();
            if !key.is_empty() {
                return Ok(key);
            }
        }

        self.api_key
            .as_deref()
            .map(|k| k.trim())
            .filter(|k| !k.is_empty())
            .map(str::to_string)
            .ok_or_else(|| {
                anyhow!(
                    "No OpenWeather API key configured.\n\
                     Hint: run `advisor configure` or set {API_KEY_ENV}."
                )
            })
    }

    /// City resolution: explicit argument, stored preference, built-in default.
    pub fn resolved_city(&self, flag: Option<&str>) -> String {
        flag.map(str::trim)
            .filter(|c| !c.is_empty())
            .or_else(|| self.default_city.as_deref().map(str::trim).filter(|c| !c.is_empty()))
            .unwrap_or(DEFAULT_CITY)
            .to_string()
    }

    /// Unit system resolution: explicit argument, stored preference, metric.
    pub fn resolved_units(&self, flag: Option<&str>) -> Result<Units> {
        let source = flag.or(self.units.as_deref());
        match source {
            Some(s) => Units::try_from(s),
            None => Ok(Units::default()),
        }
    }

    /// Language resolution: explicit argument, stored preference, "ru".
    pub fn resolved_lang(&self, flag: Option<&str>) -> String {
        flag.map(str::trim)
            .filter(|l| !l.is_empty())
            .or_else(|| self.lang.as_deref().map(str::trim).filter(|l| !l.is_empty()))
            .unwrap_or(DEFAULT_LANG)
            .to_string()
    }
}
