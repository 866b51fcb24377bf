use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use qa_core::{Mode, DEFAULT_TOP_K};
use qa_engine::DispatchSettings;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use super::cli::Cli;

pub const DEFAULT_CONFIG_FILENAME: &str = "grounded_qa.ron";
pub const DEFAULT_LOG_FILENAME: &str = "grounded_qa.log";
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8000";
pub const DEFAULT_SITE_URL: &str = "http://localhost:3000";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config {path:?}: {message}")]
    Parse { path: PathBuf, message: String },
    #[error("invalid {field} `{value}`: {reason}")]
    InvalidUrl {
        field: &'static str,
        value: String,
        reason: String,
    },
    #[error("top_k must be at least 1")]
    InvalidTopK,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
pub enum ModeSetting {
    #[default]
    Chat,
    Site,
}

impl From<ModeSetting> for Mode {
    fn from(value: ModeSetting) -> Self {
        match value {
            ModeSetting::Chat => Mode::Chat,
            ModeSetting::Site => Mode::Site,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub mode: ModeSetting,
    pub backend_url: String,
    pub site_url: String,
    pub top_k: u32,
    pub request_timeout_secs: Option<u64>,
    pub log_file: PathBuf,
    /// File the values came from; `None` when running on defaults.
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            mode: ModeSetting::Chat,
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            site_url: DEFAULT_SITE_URL.to_string(),
            top_k: DEFAULT_TOP_K,
            request_timeout_secs: None,
            log_file: PathBuf::from(DEFAULT_LOG_FILENAME),
            source: None,
        }
    }
}

impl ClientConfig {
    /// Loads `explicit` (which must exist) or the default file if present.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        match explicit {
            Some(path) => Self::load_from(path, true),
            None => Self::load_from(Path::new(DEFAULT_CONFIG_FILENAME), false),
        }
    }

    pub fn load_from(path: &Path, required: bool) -> Result<Self, ConfigError> {
        let content = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound && !required => {
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        let config: Self = ron::from_str(&content).map_err(|err| ConfigError::Parse {
            path: path.to_path_buf(),
            message: err.to_string(),
        })?;
        Ok(Self {
            source: Some(path.to_path_buf()),
            ..config
        })
    }

    /// Command-line values win over file values.
    pub fn merged_with(mut self, cli: &Cli) -> Self {
        if let Some(mode) = cli.mode {
            self.mode = mode;
        }
        if let Some(url) = &cli.backend_url {
            self.backend_url = url.clone();
        }
        if let Some(url) = &cli.site_url {
            self.site_url = url.clone();
        }
        if let Some(top_k) = cli.top_k {
            self.top_k = top_k;
        }
        if let Some(secs) = cli.timeout {
            self.request_timeout_secs = Some(secs);
        }
        if let Some(path) = &cli.log_file {
            self.log_file = path.clone();
        }
        self
    }

    pub fn dispatch_settings(&self) -> Result<DispatchSettings, ConfigError> {
        if self.top_k == 0 {
            return Err(ConfigError::InvalidTopK);
        }
        let backend_url = parse_http_url("backend_url", &self.backend_url)?;
        let site_url = parse_http_url("site_url", &self.site_url)?;
        let mut settings = DispatchSettings::new(backend_url, site_url);
        settings.request_timeout = self.request_timeout_secs.map(Duration::from_secs);
        Ok(settings)
    }
}

fn parse_http_url(field: &'static str, raw: &str) -> Result<Url, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidUrl {
        field,
        value: raw.to_string(),
        reason,
    };
    let url = Url::parse(raw.trim()).map_err(|err| invalid(err.to_string()))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(invalid(format!("unsupported scheme {other}"))),
    }
}
