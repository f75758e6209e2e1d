use std::env;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

pub const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:5000";

const CONFIG_DIR_NAME: &str = "ticketdesk";
const CONFIG_FILE_NAME: &str = "config.json";
const API_URL_ENV: &str = "TICKETDESK_API_URL";
const TIMEOUT_ENV: &str = "TICKETDESK_TIMEOUT_SECS";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub api_base_url: String,
    pub request_timeout: Option<Duration>,
}

/// Values persisted by `ticketdesk config init`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredConfig {
    pub api_base_url: Option<String>,
    pub request_timeout_secs: Option<u64>,
}

impl AppConfig {
    /// Stored file, then environment, then the command-line override.
    pub fn load(api_url_override: Option<String>) -> AppResult<Self> {
        let stored = StoredConfig::load()?;
        let env_url = env::var(API_URL_ENV).ok();
        let env_timeout = env::var(TIMEOUT_ENV).ok();
        Self::resolve(stored, env_url, env_timeout, api_url_override)
    }

    fn resolve(
        stored: StoredConfig,
        env_url: Option<String>,
        env_timeout: Option<String>,
        api_url_override: Option<String>,
    ) -> AppResult<Self> {
        let api_base_url = api_url_override
            .or(env_url)
            .or(stored.api_base_url)
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());

        if !api_base_url.starts_with("http://") && !api_base_url.starts_with("https://") {
            return Err(AppError::Configuration(format!(
                "API base URL must start with http:// or https://, got '{api_base_url}'"
            )));
        }

        let timeout_secs = match env_timeout.as_deref().map(str::trim) {
            Some(raw) if !raw.is_empty() => Some(raw.parse::<u64>().map_err(|_| {
                AppError::Configuration(format!("{TIMEOUT_ENV} must be a number of seconds"))
            })?),
            _ => stored.request_timeout_secs,
        };

        Ok(Self {
            api_base_url,
            request_timeout: timeout_secs
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs),
        })
    }
}

impl StoredConfig {
    pub fn load() -> AppResult<Self> {
        let path = config_file_path()?;
        match fs::read_to_string(&path) {
            Ok(contents) => serde_json::from_str(&contents).map_err(|err| {
                AppError::Configuration(format!("invalid config file {}: {err}", path.display()))
            }),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(AppError::Io(err)),
        }
    }

    pub fn save(&self) -> AppResult<()> {
        let path = config_file_path()?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_string_pretty(self)
            .map_err(|err| AppError::Configuration(format!("failed to write config: {err}")))?;
        fs::write(&path, data)?;
        Ok(())
    }
}

pub fn config_directory() -> AppResult<PathBuf> {
    dirs::config_dir()
        .map(|dir| dir.join(CONFIG_DIR_NAME))
        .ok_or_else(|| {
            AppError::Configuration("unable to determine the user config directory".to_string())
        })
}

pub fn config_file_path() -> AppResult<PathBuf> {
    Ok(config_directory()?.join(CONFIG_FILE_NAME))
}
