use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use crate::model::fold_case;
use crate::suggestions::{default_pool, DEFAULT_SUGGESTION_LIMIT};

pub const API_URL_ENV: &str = "FURQAAN_API_URL";
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:5000";
const APP_DIR_NAME: &str = "furqaan-search";
const CONFIG_FILE_NAME: &str = "config.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid TOML in {path}: {source}")]
    Toml {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("invalid JSON5 in {path}: {source}")]
    Json5 {
        path: PathBuf,
        source: json5::Error,
    },
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("{0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_base_url: String,
    pub suggestion_limit: usize,
    pub popular_terms: Vec<String>,
    pub request_timeout_secs: u64,
    #[serde(skip)]
    pub config_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            suggestion_limit: DEFAULT_SUGGESTION_LIMIT,
            popular_terms: default_pool(),
            request_timeout_secs: 15,
            config_path: default_config_path(),
        }
    }
}

impl Config {
    pub fn api_url(&self) -> Result<Url, ConfigError> {
        let url = Url::parse(self.api_base_url.trim())
            .map_err(|e| ConfigError::Invalid(format!("api_base_url is not a valid URL: {e}")))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::Invalid(
                "api_base_url must use http or https".to_string(),
            ));
        }
        Ok(url)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

pub fn stable_app_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(APP_DIR_NAME)
}

pub fn default_config_path() -> PathBuf {
    stable_app_data_dir().join(CONFIG_FILE_NAME)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Toml,
    Json5,
}

impl ConfigFormat {
    pub fn for_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            Some("json" | "json5") => Self::Json5,
            _ => Self::Toml,
        }
    }
}

/// Loads `path` (or the default location). A missing file yields defaults.
/// The environment override for the API URL is applied before validation.
pub fn load(path: Option<&Path>) -> Result<Config, ConfigError> {
    let path = path.map(Path::to_path_buf).unwrap_or_else(default_config_path);
    let mut config = load_file(&path)?;
    apply_api_url_override(&mut config, std::env::var(API_URL_ENV).ok());
    validate(&config)?;
    Ok(config)
}

pub fn load_file(path: &Path) -> Result<Config, ConfigError> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return Ok(Config {
                config_path: path.to_path_buf(),
                ..Config::default()
            });
        }
        Err(source) => {
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    let mut config = parse(&raw, ConfigFormat::for_path(path), path)?;
    config.config_path = path.to_path_buf();
    config.api_base_url = config.api_base_url.trim().to_string();
    config.popular_terms = config
        .popular_terms
        .into_iter()
        .map(|term| term.trim().to_string())
        .collect();
    Ok(config)
}

fn parse(raw: &str, format: ConfigFormat, path: &Path) -> Result<Config, ConfigError> {
    match format {
        ConfigFormat::Toml => toml::from_str(raw).map_err(|source| ConfigError::Toml {
            path: path.to_path_buf(),
            source,
        }),
        ConfigFormat::Json5 => json5::from_str(raw).map_err(|source| ConfigError::Json5 {
            path: path.to_path_buf(),
            source,
        }),
    }
}

pub fn apply_api_url_override(config: &mut Config, api_url: Option<String>) {
    if let Some(url) = api_url.map(|u| u.trim().to_string()).filter(|u| !u.is_empty()) {
        config.api_base_url = url;
    }
}

pub fn save(config: &Config) -> Result<(), ConfigError> {
    if let Some(parent) = config.config_path.parent() {
        fs::create_dir_all(parent).map_err(|source| ConfigError::Write {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    let encoded = toml::to_string_pretty(config)?;
    fs::write(&config.config_path, encoded).map_err(|source| ConfigError::Write {
        path: config.config_path.clone(),
        source,
    })
}

pub fn validate(cfg: &Config) -> Result<(), ConfigError> {
    cfg.api_url()?;

    if !(1..=10).contains(&cfg.suggestion_limit) {
        return Err(ConfigError::Invalid(
            "suggestion_limit must be between 1 and 10".into(),
        ));
    }

    if !(1..=120).contains(&cfg.request_timeout_secs) {
        return Err(ConfigError::Invalid(
            "request_timeout_secs must be between 1 and 120".into(),
        ));
    }

    if cfg.popular_terms.is_empty() {
        return Err(ConfigError::Invalid("popular_terms must not be empty".into()));
    }

    if cfg.popular_terms.iter().any(|term| term.trim().is_empty()) {
        return Err(ConfigError::Invalid(
            "popular_terms must not contain blank entries".into(),
        ));
    }

    let mut seen = HashSet::new();
    if let Some(repeated) = cfg
        .popular_terms
        .iter()
        .find(|term| !seen.insert(fold_case(term.trim())))
    {
        return Err(ConfigError::Invalid(format!(
            "popular_terms lists '{repeated}' more than once"
        )));
    }

    Ok(())
}
