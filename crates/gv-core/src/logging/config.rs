//! Logging configuration.
//!
//! Sources, lowest to highest precedence:
//! - config file `[logging]` section
//! - environment variables (GV_LOG, RUST_LOG, GV_LOG_FORMAT)
//! - CLI flags (-v/-q, --log-format)

use serde::{Deserialize, Serialize};

pub const ENV_LOG: &str = "GV_LOG";
pub const ENV_LOG_FORMAT: &str = "GV_LOG_FORMAT";

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable console format (default).
    #[default]
    Human,
    /// One JSON object per line.
    Jsonl,
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "human" | "console" | "pretty" => Ok(LogFormat::Human),
            "jsonl" | "json" => Ok(LogFormat::Jsonl),
            _ => Err(format!("unknown log format: {}", s)),
        }
    }
}

impl std::fmt::Display for LogFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogFormat::Human => write!(f, "human"),
            LogFormat::Jsonl => write!(f, "jsonl"),
        }
    }
}

/// Log level filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    /// Default: the CLI is quiet unless something goes wrong.
    #[default]
    Warn,
    Error,
    Off,
}

impl LogLevel {
    /// One step more verbose, saturating at `Trace`.
    pub fn louder(self) -> Self {
        match self {
            LogLevel::Off => LogLevel::Error,
            LogLevel::Error => LogLevel::Warn,
            LogLevel::Warn => LogLevel::Info,
            LogLevel::Info => LogLevel::Debug,
            LogLevel::Debug | LogLevel::Trace => LogLevel::Trace,
        }
    }
}

impl std::str::FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            "off" | "none" | "quiet" => Ok(LogLevel::Off),
            _ => Err(format!("unknown log level: {}", s)),
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Trace => write!(f, "trace"),
            LogLevel::Debug => write!(f, "debug"),
            LogLevel::Info => write!(f, "info"),
            LogLevel::Warn => write!(f, "warn"),
            LogLevel::Error => write!(f, "error"),
            LogLevel::Off => write!(f, "off"),
        }
    }
}

impl From<LogLevel> for tracing_subscriber::filter::LevelFilter {
    fn from(level: LogLevel) -> Self {
        use tracing_subscriber::filter::LevelFilter;
        match level {
            LogLevel::Trace => LevelFilter::TRACE,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Error => LevelFilter::ERROR,
            LogLevel::Off => LevelFilter::OFF,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone)]
pub struct LogConfig {
    pub format: LogFormat,
    pub level: LogLevel,
    /// Include timestamps in human output.
    pub timestamps: bool,
    /// Full `RUST_LOG` directive, used verbatim when set and GV_LOG is not.
    pub directive: Option<String>,
}

impl Default for LogConfig {
    fn default() -> Self {
        LogConfig {
            format: LogFormat::Human,
            level: LogLevel::Warn,
            timestamps: true,
            directive: None,
        }
    }
}

impl LogConfig {
    /// Create config from the environment with CLI overrides on top.
    pub fn from_env(cli_level: Option<LogLevel>, cli_format: Option<LogFormat>) -> Self {
        Self::default().layered(cli_level, cli_format)
    }

    /// Apply environment variables then CLI overrides to `self`.
    ///
    /// Unparseable env values are ignored.
    pub fn layered(mut self, cli_level: Option<LogLevel>, cli_format: Option<LogFormat>) -> Self {
        // GV_LOG takes precedence over RUST_LOG
        if let Ok(val) = std::env::var(ENV_LOG) {
            if let Ok(level) = val.parse::<LogLevel>() {
                self.level = level;
            }
        } else if let Ok(val) = std::env::var("RUST_LOG") {
            if !val.trim().is_empty() {
                self.directive = Some(val);
            }
        }

        if let Ok(val) = std::env::var(ENV_LOG_FORMAT) {
            if let Ok(format) = val.parse::<LogFormat>() {
                self.format = format;
            }
        }

        if let Some(level) = cli_level {
            self.level = level;
            self.directive = None;
        }
        if let Some(format) = cli_format {
            self.format = format;
        }

        self
    }

    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    pub fn with_timestamps(mut self, enabled: bool) -> Self {
        self.timestamps = enabled;
        self
    }

    /// Filter directive handed to `EnvFilter`.
    pub fn filter_directive(&self) -> String {
        match &self.directive {
            Some(directive) => directive.clone(),
            None => format!("gv_core={level},gv={level}", level = self.level),
        }
    }
}
