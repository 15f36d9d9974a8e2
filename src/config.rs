//! Client Configuration
//!
//! Backend location and request settings, read from `config.json` in the
//! data directory with environment overrides on top.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::Url;

use crate::error::{GroceryError, GroceryResult};

pub const DEFAULT_API_URL: &str = "https://api.everlive.com/v1/";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const CONFIG_FILE: &str = "config.json";

const ENV_HOME: &str = "GROCERIES_HOME";
const ENV_API_URL: &str = "GROCERIES_API_URL";
const ENV_API_KEY: &str = "GROCERIES_API_KEY";
const ENV_TIMEOUT: &str = "GROCERIES_TIMEOUT_SECS";

/// Client configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Everlive API root
    pub api_url: String,
    /// Application key, appended to `api_url` as a path segment
    pub api_key: Option<String>,
    pub request_timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            api_key: None,
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl ClientConfig {
    /// Load `<data_dir>/config.json` (if any), then apply environment overrides
    pub fn load(data_dir: &Path) -> GroceryResult<Self> {
        let path = data_dir.join(CONFIG_FILE);
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            serde_json::from_str(&content).map_err(|e| {
                GroceryError::Config(format!("{}: {}", path.display(), e))
            })?
        } else {
            Self::default()
        };

        config.apply_overrides(|key| std::env::var(key).ok())?;
        log::debug!("Loaded client config: {:?}", config);
        Ok(config)
    }

    /// Apply overrides from a variable lookup (the process environment in `load`)
    pub fn apply_overrides(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> GroceryResult<()> {
        if let Some(url) = lookup(ENV_API_URL) {
            self.api_url = url;
        }
        if let Some(key) = lookup(ENV_API_KEY) {
            self.api_key = Some(key);
        }
        if let Some(timeout) = lookup(ENV_TIMEOUT) {
            self.request_timeout_secs = timeout.trim().parse().map_err(|_| {
                GroceryError::Config(format!("{} must be a number of seconds, got {:?}", ENV_TIMEOUT, timeout))
            })?;
        }
        Ok(())
    }

    /// Base URL every request path is joined onto; always ends in `/`
    pub fn base_url(&self) -> GroceryResult<Url> {
        let mut raw = self.api_url.trim_end_matches('/').to_string();
        if let Some(key) = self.api_key.as_deref().filter(|k| !k.is_empty()) {
            raw.push('/');
            raw.push_str(key.trim_matches('/'));
        }
        raw.push('/');

        Url::parse(&raw).map_err(|e| GroceryError::Config(format!("invalid api url {:?}: {}", raw, e)))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// `$GROCERIES_HOME`, else `~/.groceries`, else `./.groceries`
pub fn default_data_dir() -> PathBuf {
    if let Some(home) = std::env::var_os(ENV_HOME) {
        return PathBuf::from(home);
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".groceries")
}
