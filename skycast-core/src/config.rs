use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};
use tracing::debug;

use crate::provider::openweather::DEFAULT_BASE_URL;

pub const WEATHER_KEY_VAR: &str = "OPENWEATHER_API_KEY";
pub const LLM_KEY_VAR: &str = "OPENAI_API_KEY";
pub const BASE_URL_VAR: &str = "SKYCAST_BASE_URL";

/// Dotenv file read from the working directory.
pub const DOTENV_FILE: &str = ".env";

/// Credentials and endpoint settings.
///
/// Example TOML:
/// ```toml
/// api_key = "..."
/// llm_api_key = "..."
/// base_url = "https://api.openweathermap.org/data/2.5"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// OpenWeatherMap key. Required before any fetch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// LLM provider key; loaded and reported but not used by any lookup.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub llm_api_key: Option<String>,

    #[serde(default = "default_base_url")]
    pub base_url: String,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            llm_api_key: None,
            base_url: default_base_url(),
        }
    }
}

impl Config {
    /// Load the config file (if any), then apply `./.env` and environment overrides.
    pub fn load() -> Result<Self> {
        Self::load_layered(&Self::config_file_path()?, Path::new(DOTENV_FILE))
    }

    /// Precedence, highest first: process environment, `dotenv_path`, `config_path`.
    ///
    /// Both files are optional. The dotenv file never modifies the process environment.
    pub fn load_layered(config_path: &Path, dotenv_path: &Path) -> Result<Self> {
        let mut cfg = Self::load_from(config_path)?;
        let dotenv = read_dotenv(dotenv_path)?;

        cfg.apply_env(|name| {
            std::env::var(name)
                .ok()
                .filter(|v| !v.trim().is_empty())
                .or_else(|| dotenv.get(name).cloned())
        });

        Ok(cfg)
    }

    /// Load config from `path`, or return an empty default if it doesn't exist yet.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Override fields from variables returned by `lookup`. Empty values are ignored.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(key) = get(WEATHER_KEY_VAR) {
            self.api_key = Some(key);
        }
        if let Some(key) = get(LLM_KEY_VAR) {
            self.llm_api_key = Some(key);
        }
        if let Some(url) = get(BASE_URL_VAR) {
            self.base_url = url;
        }
    }

    /// Save config to `path`, creating parent directories as needed.
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
        let dirs = ProjectDirs::from("dev", "skycast", "skycast")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// The OpenWeather key, or an error explaining how to provide one.
    pub fn weather_api_key(&self) -> Result<&str> {
        self.api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| {
                anyhow!(
                    "No OpenWeather API key configured.\n\
                     Hint: set {WEATHER_KEY_VAR} or run `skycast configure`."
                )
            })
    }

    pub fn has_llm_api_key(&self) -> bool {
        self.llm_api_key
            .as_deref()
            .is_some_and(|k| !k.trim().is_empty())
    }
}

/// Variables from a dotenv file, or none if the file doesn't exist.
fn read_dotenv(path: &Path) -> Result<HashMap<String, String>> {
    if !path.exists() {
        return Ok(HashMap::new());
    }

    let vars = dotenvy::from_path_iter(path)
        .with_context(|| format!("Failed to read dotenv file: {}", path.display()))?
        .collect::<Result<HashMap<_, _>, _>>()
        .with_context(|| format!("Failed to parse dotenv file: {}", path.display()))?;

    debug!(path = %path.display(), count = vars.len(), "loaded dotenv file");
    Ok(vars)
}
