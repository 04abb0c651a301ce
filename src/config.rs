//! Application configuration.
//!
//! Values are layered: built-in defaults, then a JSON config file, then
//! environment variables, then command-line flags (applied by the binary).
//!
//! Environment variables:
//! - `PROPVAL_MODEL_PATH` - model artifact path
//! - `PROPVAL_DATASET_PATH` - reference dataset path
//! - `PROPVAL_HOST` - bind address for `serve`
//! - `PROPVAL_PORT` - port for `serve`
//! - `PROPVAL_STRICT` - `false`/`0`/`no` disables record validation

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

const APP_NAME: &str = "propval";
const CONFIG_FILE: &str = "config.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Path to the model artifact.
    pub model_path: PathBuf,
    /// Path to the reference dataset (CSV with a `Suburb` column).
    pub dataset_path: PathBuf,
    pub host: String,
    pub port: u16,
    /// Reject out-of-range values and unknown suburbs before inference.
    pub strict_validation: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from("melb_price_model.json"),
            dataset_path: PathBuf::from("melb_data_cleaned.csv"),
            host: "127.0.0.1".to_string(),
            port: 8501,
            strict_validation: true,
        }
    }
}

impl AppConfig {
    /// Load configuration and apply environment overrides.
    ///
    /// An explicit `path` must exist. Without one, the user config file is
    /// read when present and defaults are used otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => match default_config_path() {
                Some(path) if path.exists() => Self::from_file(&path)?,
                _ => Self::default(),
            },
        };
        Ok(config.with_env_overrides(|key| std::env::var(key).ok()))
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Apply overrides from a variable lookup (normally the process environment).
    ///
    /// Unparseable values are ignored with a warning.
    pub fn with_env_overrides(mut self, var: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(path) = var("PROPVAL_MODEL_PATH") {
            self.model_path = PathBuf::from(path);
        }
        if let Some(path) = var("PROPVAL_DATASET_PATH") {
            self.dataset_path = PathBuf::from(path);
        }
        if let Some(host) = var("PROPVAL_HOST") {
            self.host = host;
        }
        if let Some(port) = var("PROPVAL_PORT") {
            match port.parse() {
                Ok(port) => self.port = port,
                Err(_) => tracing::warn!("Ignoring invalid PROPVAL_PORT: {}", port),
            }
        }
        if let Some(strict) = var("PROPVAL_STRICT") {
            match parse_bool(&strict) {
                Some(strict) => self.strict_validation = strict,
                None => tracing::warn!("Ignoring invalid PROPVAL_STRICT: {}", strict),
            }
        }
        self
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// `<config dir>/propval/config.json` for the current user.
pub fn default_config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", APP_NAME)
        .map(|dirs| dirs.config_dir().join(CONFIG_FILE))
}
