use crate::error::ConfigError;
use crate::users::FieldSet;
use reqwest::Url;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const ENDPOINT_ENV: &str = "USERTUI_ENDPOINT";
pub const API_KEY_ENV: &str = "USERTUI_API_KEY";

const DEFAULT_TITLE: &str = "Users";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Contents of `config.toml`. Every key is optional.
#[derive(Debug, Default, Deserialize)]
pub struct FileConfig {
    pub endpoint: Option<String>,
    pub api_key: Option<String>,
    pub fields: Option<FieldSet>,
    pub title: Option<String>,
    pub timeout_secs: Option<u64>,
    pub log_file: Option<PathBuf>,
}

/// Values given on the command line. These win over everything else.
#[derive(Debug, Default)]
pub struct Overrides {
    pub endpoint: Option<String>,
    pub fields: Option<FieldSet>,
    pub log_file: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub endpoint: Url,
    pub api_key: String,
    pub fields: FieldSet,
    pub title: String,
    pub timeout: Duration,
    pub log_file: Option<PathBuf>,
}

impl Config {
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("usertui").join("config.toml"))
    }

    /// Load from `path`, or from the default location when `path` is `None`.
    ///
    /// A missing default file is fine; a missing explicit file is not.
    pub fn load(path: Option<&Path>, overrides: Overrides) -> Result<Self, ConfigError> {
        let file = match path {
            Some(path) => Self::read_file(path)?,
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::read_file(&path)?,
                _ => FileConfig::default(),
            },
        };

        Self::resolve(file, overrides, |key| std::env::var(key).ok())
    }

    pub fn read_file(path: &Path) -> Result<FileConfig, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Merge sources with precedence CLI > environment > file > defaults.
    pub fn resolve(
        file: FileConfig,
        overrides: Overrides,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let endpoint = non_blank(overrides.endpoint)
            .or_else(|| non_blank(env(ENDPOINT_ENV)))
            .or_else(|| non_blank(file.endpoint))
            .ok_or(ConfigError::MissingEndpoint)?;

        let api_key = non_blank(env(API_KEY_ENV))
            .or_else(|| non_blank(file.api_key))
            .ok_or(ConfigError::MissingApiKey)?;

        let endpoint = parse_endpoint(&endpoint)?;

        Ok(Self {
            endpoint,
            api_key,
            fields: overrides.fields.or(file.fields).unwrap_or_default(),
            title: non_blank(file.title).unwrap_or_else(|| DEFAULT_TITLE.to_string()),
            timeout: Duration::from_secs(
                file.timeout_secs
                    .filter(|secs| *secs > 0)
                    .unwrap_or(DEFAULT_TIMEOUT_SECS),
            ),
            log_file: overrides.log_file.or(file.log_file),
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_endpoint(raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw).map_err(|e| ConfigError::InvalidEndpoint {
        url: raw.to_string(),
        reason: e.to_string(),
    })?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ConfigError::InvalidEndpoint {
            url: raw.to_string(),
            reason: format!("unsupported scheme '{}'", other),
        }),
    }
}
