use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::workflow::list::DEFAULT_SEARCH_DEBOUNCE;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/api";
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_LOG_LEVEL: &str = "warn";

const CONFIG_DIR_NAME: &str = "ticket-desk";
const CONFIG_FILE_NAME: &str = "config.json";

const ENV_BASE_URL: &str = "TICKET_DESK_BASE_URL";
const ENV_SEARCH_DEBOUNCE_MS: &str = "TICKET_DESK_SEARCH_DEBOUNCE_MS";
const ENV_REQUEST_TIMEOUT_SECS: &str = "TICKET_DESK_REQUEST_TIMEOUT_SECS";
const ENV_LOG: &str = "TICKET_DESK_LOG";

/// Effective configuration: defaults, then the stored file, then environment
/// variables, then command-line overrides.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub base_url: String,
    pub search_debounce: Duration,
    pub request_timeout: Duration,
    pub log_level: String,
}

/// Values persisted by `config init`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoredConfig {
    pub base_url: Option<String>,
    pub search_debounce_ms: Option<u64>,
    pub request_timeout_secs: Option<u64>,
    pub log_level: Option<String>,
}

impl StoredConfig {
    pub fn load() -> AppResult<Self> {
        Self::load_from(&config_file_path()?)
    }

    pub fn save(&self) -> AppResult<()> {
        self.save_to(&config_file_path()?)
    }

    pub fn load_from(path: &Path) -> AppResult<Self> {
        match fs::read_to_string(path) {
            Ok(contents) => serde_json::from_str(&contents).map_err(|err| {
                AppError::Configuration(format!("invalid config file {}: {err}", path.display()))
            }),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(AppError::Io(err)),
        }
    }

    pub fn save_to(&self, path: &Path) -> AppResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_string_pretty(self)
            .map_err(|err| AppError::Configuration(format!("failed to write config: {err}")))?;
        fs::write(path, data)?;
        Ok(())
    }
}

impl AppConfig {
    pub fn load(base_url_override: Option<String>) -> AppResult<Self> {
        let stored = StoredConfig::load()?;
        Self::resolve(stored, |key| env::var(key).ok(), base_url_override)
    }

    fn resolve(
        stored: StoredConfig,
        env: impl Fn(&str) -> Option<String>,
        base_url_override: Option<String>,
    ) -> AppResult<Self> {
        let base_url = base_url_override
            .or_else(|| env(ENV_BASE_URL))
            .or(stored.base_url)
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let search_debounce = match env(ENV_SEARCH_DEBOUNCE_MS) {
            Some(raw) => Duration::from_millis(parse_number(ENV_SEARCH_DEBOUNCE_MS, &raw)?),
            None => stored
                .search_debounce_ms
                .map(Duration::from_millis)
                .unwrap_or(DEFAULT_SEARCH_DEBOUNCE),
        };

        let request_timeout = match env(ENV_REQUEST_TIMEOUT_SECS) {
            Some(raw) => Duration::from_secs(parse_number(ENV_REQUEST_TIMEOUT_SECS, &raw)?),
            None => stored
                .request_timeout_secs
                .map(Duration::from_secs)
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT),
        };
        if request_timeout.is_zero() {
            return Err(AppError::Configuration(
                "request timeout must be greater than zero".to_string(),
            ));
        }

        let log_level = env(ENV_LOG)
            .or(stored.log_level)
            .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string());

        Ok(Self {
            base_url,
            search_debounce,
            request_timeout,
            log_level,
        })
    }
}

fn parse_number(key: &str, raw: &str) -> AppResult<u64> {
    raw.trim()
        .parse()
        .map_err(|_| AppError::Configuration(format!("{key} must be a whole number, got '{raw}'")))
}

pub fn config_directory() -> AppResult<PathBuf> {
    dirs::config_dir()
        .map(|dir| dir.join(CONFIG_DIR_NAME))
        .ok_or_else(|| {
            AppError::Configuration("cannot locate the user config directory".to_string())
        })
}

pub fn config_file_path() -> AppResult<PathBuf> {
    Ok(config_directory()?.join(CONFIG_FILE_NAME))
}
