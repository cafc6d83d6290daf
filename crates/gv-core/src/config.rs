//! Configuration loading and validation for gv-core.
//!
//! Resolution order for the config file:
//! 1. Explicit CLI path (`--config`)
//! 2. `GV_CONFIG` environment variable
//! 3. XDG config directory (`~/.config/gamma-variate/config.toml`)
//! 4. Built-in defaults
//!
//! After the file is loaded, `GV_SEED` overrides `sampler.seed`.
//!
//! ```toml
//! [sampler]
//! max_iterations = 100000
//! seed = 42
//!
//! [logging]
//! level = "debug"
//! format = "jsonl"
//! ```

use crate::logging::{LogFormat, LogLevel};
use crate::variate::DEFAULT_MAX_ITERATIONS;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Environment variable names.
pub const ENV_CONFIG_PATH: &str = "GV_CONFIG";
pub const ENV_SEED: &str = "GV_SEED";

/// Application directory under the XDG config home.
const APP_NAME: &str = "gamma-variate";
const CONFIG_FILENAME: &str = "config.toml";

/// Errors that can occur during config loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config file not found: {path}")]
    NotFound { path: PathBuf },

    #[error("I/O error reading {path}: {source}")]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid TOML in config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },
}

impl ConfigError {
    /// Error code for structured error reporting.
    pub fn code(&self) -> u32 {
        match self {
            ConfigError::NotFound { .. } => 11,
            ConfigError::IoError { .. } => 12,
            ConfigError::ParseError { .. } => 13,
            ConfigError::InvalidValue { .. } => 14,
        }
    }
}

/// Sampler settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SamplerConfig {
    /// Cap on standard-normal draws per variate.
    pub max_iterations: u64,
    /// Seed for a reproducible stream; OS entropy when absent.
    pub seed: Option<u64>,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        SamplerConfig {
            max_iterations: DEFAULT_MAX_ITERATIONS,
            seed: None,
        }
    }
}

/// Logging settings from the config file. CLI flags and env vars win.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingSection {
    pub level: Option<LogLevel>,
    pub format: Option<LogFormat>,
}

/// Top-level config file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub sampler: SamplerConfig,
    pub logging: LoggingSection,
}

impl Config {
    /// Parse a TOML config file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::IoError {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::ParseError {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Semantic validation beyond what serde checks.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sampler.max_iterations == 0 {
            return Err(ConfigError::InvalidValue {
                field: "sampler.max_iterations".to_string(),
                message: "must be > 0".to_string(),
            });
        }
        Ok(())
    }
}

/// Where the config file was found.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfigSource {
    /// Explicitly provided via CLI argument.
    CliArgument,
    /// Set via environment variable.
    Environment,
    /// Found in XDG config directory.
    XdgConfig,
    /// Using built-in defaults.
    #[default]
    BuiltinDefault,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSource::CliArgument => write!(f, "CLI argument"),
            ConfigSource::Environment => write!(f, "environment variable"),
            ConfigSource::XdgConfig => write!(f, "XDG config"),
            ConfigSource::BuiltinDefault => write!(f, "builtin default"),
        }
    }
}

/// Resolved configuration with provenance information.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub config: Config,
    /// Path to the config file (None if using defaults).
    pub path: Option<PathBuf>,
    pub source: ConfigSource,
}

/// Find the config file using the standard resolution order.
///
/// An explicit CLI or environment path must exist; a missing XDG file just
/// falls through to defaults.
pub fn resolve_config_path(
    cli_path: Option<&Path>,
) -> Result<(Option<PathBuf>, ConfigSource), ConfigError> {
    if let Some(path) = cli_path {
        return existing(path.to_path_buf()).map(|p| (Some(p), ConfigSource::CliArgument));
    }

    if let Ok(env_path) = std::env::var(ENV_CONFIG_PATH) {
        if !env_path.is_empty() {
            return existing(PathBuf::from(env_path))
                .map(|p| (Some(p), ConfigSource::Environment));
        }
    }

    if let Some(dir) = dirs::config_dir() {
        let path = dir.join(APP_NAME).join(CONFIG_FILENAME);
        if path.is_file() {
            return Ok((Some(path), ConfigSource::XdgConfig));
        }
    }

    Ok((None, ConfigSource::BuiltinDefault))
}

fn existing(path: PathBuf) -> Result<PathBuf, ConfigError> {
    if path.is_file() {
        Ok(path)
    } else {
        Err(ConfigError::NotFound { path })
    }
}

/// Resolve, parse, validate, and apply environment overrides.
pub fn load_config(cli_path: Option<&Path>) -> Result<ResolvedConfig, ConfigError> {
    let (path, source) = resolve_config_path(cli_path)?;

    let mut config = match &path {
        Some(p) => Config::from_file(p)?,
        None => Config::default(),
    };

    if let Ok(raw) = std::env::var(ENV_SEED) {
        let seed = raw.trim().parse::<u64>().map_err(|e| ConfigError::InvalidValue {
            field: ENV_SEED.to_string(),
            message: format!("{raw:?} is not an unsigned integer: {e}"),
        })?;
        config.sampler.seed = Some(seed);
    }

    config.validate()?;

    Ok(ResolvedConfig {
        config,
        path,
        source,
    })
}
