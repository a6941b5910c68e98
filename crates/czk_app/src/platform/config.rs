//! App configuration, read from a RON file.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use czk_core::{DEFAULT_FEED_URL, DEFAULT_ROWS_PER_PAGE};
use czk_engine::FetchSettings;
use serde::Deserialize;
use thiserror::Error;

use super::logging::LogDestination;

pub const CONFIG_FILENAME: &str = "czk_converter.ron";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse config {path:?}: {message}")]
    Parse { path: PathBuf, message: String },
    #[error("feed_url {url:?} is not a valid http(s) url: {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("rows_per_page must be greater than zero")]
    InvalidRowsPerPage,
    #[error("missing value for {0}")]
    MissingArgumentValue(String),
    #[error("unknown argument {0:?}")]
    UnknownArgument(String),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub feed_url: String,
    pub rows_per_page: usize,
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
    pub max_bytes: u64,
    pub log_destination: LogDestination,
}

impl Default for AppConfig {
    fn default() -> Self {
        let fetch = FetchSettings::default();
        Self {
            feed_url: DEFAULT_FEED_URL.to_string(),
            rows_per_page: DEFAULT_ROWS_PER_PAGE,
            connect_timeout_secs: fetch.connect_timeout.as_secs(),
            request_timeout_secs: fetch.request_timeout.as_secs(),
            max_bytes: fetch.max_bytes,
            log_destination: LogDestination::default(),
        }
    }
}

impl AppConfig {
    /// Load from `explicit` (must exist), else `./czk_converter.ron` if present, else defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match explicit {
            Some(path) => Self::from_file(path)?,
            None => {
                let default_path = Path::new(".").join(CONFIG_FILENAME);
                if default_path.is_file() {
                    Self::from_file(&default_path)?
                } else {
                    Self::default()
                }
            }
        };
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_ron(&text).map_err(|message| ConfigError::Parse {
            path: path.to_path_buf(),
            message,
        })
    }

    fn from_ron(text: &str) -> Result<Self, String> {
        ron::from_str(text).map_err(|err| err.to_string())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |reason: String| ConfigError::InvalidUrl {
            url: self.feed_url.clone(),
            reason,
        };
        let url = url::Url::parse(&self.feed_url).map_err(|err| invalid(err.to_string()))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(invalid(format!("unsupported scheme {}", url.scheme())));
        }
        if self.rows_per_page == 0 {
            return Err(ConfigError::InvalidRowsPerPage);
        }
        Ok(())
    }

    pub fn fetch_settings(&self) -> FetchSettings {
        FetchSettings {
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            max_bytes: self.max_bytes,
            ..FetchSettings::default()
        }
    }
}

/// Command-line options: `czk_app [--config <path>]`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CliOptions {
    pub config_path: Option<PathBuf>,
}

impl CliOptions {
    pub fn parse(args: impl IntoIterator<Item = String>) -> Result<Self, ConfigError> {
        let mut options = Self::default();
        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--config" | "-c" => {
                    let path = args
                        .next()
                        .ok_or_else(|| ConfigError::MissingArgumentValue(arg.clone()))?;
                    options.config_path = Some(PathBuf::from(path));
                }
                _ => return Err(ConfigError::UnknownArgument(arg)),
            }
        }
        Ok(options)
    }
}
