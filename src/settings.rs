//! Layered runtime settings: CLI flags win over environment variables, which
//! win over the optional TOML file, which wins over built-in defaults.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::cli::CliArgs;
use crate::detector::{Backend, Configuration, DEFAULT_CONFIDENCE_THRESHOLD};
use crate::geocode::{DEFAULT_TIMEOUT, DEFAULT_USER_AGENT};

const CONFIG_ENV: &str = "POTHOLE_CONFIG";
const BACKEND_ENV: &str = "POTHOLE_BACKEND";
const CONFIDENCE_ENV: &str = "POTHOLE_CONFIDENCE";
const OUTPUT_DIR_ENV: &str = "POTHOLE_OUTPUT_DIR";
const DEFAULT_OUTPUT_DIR: &str = "results";

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FileConfig {
    backend: Option<String>,
    confidence_threshold: Option<f32>,
    output_dir: Option<String>,
    geocode: Option<GeocodeFileConfig>,
}

#[derive(Debug, Default, Deserialize, Clone)]
#[serde(default)]
struct GeocodeFileConfig {
    offline: Option<bool>,
    user_agent: Option<String>,
    timeout_secs: Option<u64>,
}

#[derive(Debug)]
pub struct EffectiveSettings {
    pub backend: Backend,
    pub confidence_threshold: f32,
    pub output_dir: PathBuf,
    pub offline: bool,
    pub user_agent: String,
    pub timeout: Duration,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("invalid value for {field}: {value}")]
    InvalidValue { field: &'static str, value: String },
}

impl EffectiveSettings {
    pub fn resolve(cli: &CliArgs) -> Result<Self, ConfigError> {
        let file_path = cli
            .config
            .clone()
            .or_else(|| env::var(CONFIG_ENV).ok().map(PathBuf::from));
        let file = match file_path {
            Some(path) => load_file_config(&path)?,
            None => FileConfig::default(),
        };

        let backend_name = cli
            .backend
            .clone()
            .or_else(|| env::var(BACKEND_ENV).ok())
            .or(file.backend);
        let backend = match backend_name {
            Some(name) => parse_backend(&name)?,
            None => Configuration::default().backend,
        };

        let confidence_threshold = match cli.confidence {
            Some(value) => value,
            None => match env::var(CONFIDENCE_ENV) {
                Ok(raw) => raw.parse::<f32>().map_err(|_| ConfigError::InvalidValue {
                    field: "confidence_threshold",
                    value: raw.clone(),
                })?,
                Err(_) => file
                    .confidence_threshold
                    .unwrap_or(DEFAULT_CONFIDENCE_THRESHOLD),
            },
        };
        if !confidence_threshold.is_finite()
            || !(0.0..=1.0).contains(&confidence_threshold)
        {
            return Err(ConfigError::InvalidValue {
                field: "confidence_threshold",
                value: confidence_threshold.to_string(),
            });
        }

        let output_dir = cli
            .output_dir
            .clone()
            .or_else(|| env::var(OUTPUT_DIR_ENV).ok().map(PathBuf::from))
            .or_else(|| file.output_dir.map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR));

        let geocode = file.geocode.unwrap_or_default();
        let offline = cli.offline || geocode.offline.unwrap_or(false);
        let user_agent = geocode
            .user_agent
            .unwrap_or_else(|| DEFAULT_USER_AGENT.to_owned());
        let timeout = geocode
            .timeout_secs
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_TIMEOUT);

        Ok(Self {
            backend,
            confidence_threshold,
            output_dir,
            offline,
            user_agent,
            timeout,
        })
    }
}

fn parse_backend(name: &str) -> Result<Backend, ConfigError> {
    Backend::from_str(name).map_err(|_| ConfigError::InvalidValue {
        field: "backend",
        value: name.to_owned(),
    })
}

fn load_file_config(path: &Path) -> Result<FileConfig, ConfigError> {
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&raw).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
