use crate::infra::generation::GenerationMode;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_TIMEOUT_SECS: u64 = 20;

/// Environment variables checked for the API key, in priority order.
pub const API_KEY_VARS: &[&str] = &["GENA_GEMINI_API_KEY", "GEMINI_API_KEY"];
pub const MODEL_VAR: &str = "GENA_GEMINI_MODEL";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub endpoint: String,
    pub request_timeout_secs: u64,
    pub mode: GenerationMode,
    /// Directory holding the built-in `images/` artwork.
    pub assets_dir: Option<PathBuf>,
    /// Where exported cards are written; defaults to the download directory.
    pub output_dir: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
            mode: GenerationMode::default(),
            assets_dir: None,
            output_dir: None,
        }
    }
}

impl AppConfig {
    /// API key with surrounding whitespace removed; blank counts as missing.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }

    pub fn masked_api_key(&self) -> String {
        match self.api_key() {
            Some(key) if key.chars().count() > 4 => {
                let tail: String = key.chars().skip(key.chars().count() - 4).collect();
                format!("****{tail}")
            }
            Some(_) => "****".to_string(),
            None => "(not set)".to_string(),
        }
    }

    pub fn assets_dir(&self) -> PathBuf {
        self.assets_dir
            .clone()
            .unwrap_or_else(|| app_data_dir().join("assets"))
    }

    pub fn output_dir(&self) -> PathBuf {
        self.output_dir
            .clone()
            .or_else(dirs::download_dir)
            .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
    }

    /// Applies environment overrides using the given lookup.
    pub fn with_env_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = API_KEY_VARS
            .iter()
            .filter_map(|var| lookup(var))
            .find(|value| !value.trim().is_empty())
        {
            self.api_key = Some(key);
        }
        if let Some(model) = lookup(MODEL_VAR).filter(|value| !value.trim().is_empty()) {
            self.model = model.trim().to_string();
        }
        self
    }
}

/// Loads the config file (if any), then applies process environment overrides.
pub fn load_config() -> AppConfig {
    load_config_from(&config_path()).with_env_overrides(|var| std::env::var(var).ok())
}

/// Missing or malformed files yield defaults.
pub fn load_config_from(path: &Path) -> AppConfig {
    let Ok(contents) = std::fs::read_to_string(path) else {
        return AppConfig::default();
    };
    match toml::from_str(&contents) {
        Ok(config) => config,
        Err(err) => {
            log::warn!("Ignoring invalid config at {}: {}", path.display(), err);
            AppConfig::default()
        }
    }
}

pub fn save_config(config: &AppConfig) -> Result<()> {
    save_config_to(config, &config_path())
}

pub fn save_config_to(config: &AppConfig, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create config dir {}", parent.display()))?;
    }
    let contents = toml::to_string_pretty(config).context("serialize config")?;
    std::fs::write(path, contents).with_context(|| format!("write config {}", path.display()))
}

pub fn config_path() -> PathBuf {
    if let Ok(path) = std::env::var("GENA_CARD_CONFIG_PATH") {
        return PathBuf::from(path);
    }

    app_data_dir().join("config.toml")
}

fn app_data_dir() -> PathBuf {
    if let Ok(path) = std::env::var("GENA_CARD_DATA_HOME") {
        return PathBuf::from(path);
    }

    #[cfg(target_os = "macos")]
    {
        if let Some(home) = home::home_dir() {
            return home
                .join("Library")
                .join("Application Support")
                .join("GenaCard");
        }
    }

    #[cfg(target_os = "windows")]
    {
        if let Some(appdata) = std::env::var_os("APPDATA") {
            return PathBuf::from(appdata).join("GenaCard");
        }
    }

    #[cfg(target_os = "linux")]
    {
        if let Some(xdg) = std::env::var_os("XDG_DATA_HOME") {
            return PathBuf::from(xdg).join("gena-card");
        }
        if let Some(home) = home::home_dir() {
            return home.join(".local").join("share").join("gena-card");
        }
    }

    std::env::current_dir()
        .unwrap_or_else(|_| PathBuf::from("."))
        .join(".gena-card")
}
