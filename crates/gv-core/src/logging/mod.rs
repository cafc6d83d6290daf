//! Structured logging for gv-core.
//!
//! - stdout is reserved for command payloads
//! - stderr receives all log output, human or JSONL
//!
//! ```ignore
//! use gv_core::logging::{init_logging, LogConfig};
//!
//! let config = LogConfig::from_env(None, None);
//! init_logging(&config);
//! ```

pub mod config;

pub use config::{LogConfig, LogFormat, LogLevel};

use std::io::IsTerminal;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Standard event names, carried in the `event` field.
pub mod event_names {
    pub const CONFIG_LOADED: &str = "config.loaded";
    pub const CLOSURE_BOUND: &str = "sample.closure_bound";
    pub const SAMPLE_ACCEPTED: &str = "sample.accepted";
    pub const SAMPLE_STALLED: &str = "sample.stalled";
    pub const BATCH_STARTED: &str = "batch.started";
    pub const BATCH_FINISHED: &str = "batch.finished";
}

/// Initialize the global subscriber.
///
/// Call once at startup. Returns false if a subscriber was already installed.
pub fn init_logging(config: &LogConfig) -> bool {
    let filter = EnvFilter::try_new(config.filter_directive())
        .unwrap_or_else(|_| EnvFilter::new(format!("gv_core={}", config.level)));

    match config.format {
        LogFormat::Human => {
            let use_ansi = std::io::stderr().is_terminal();
            let fmt_layer = fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_ansi(use_ansi);

            if config.timestamps {
                tracing_subscriber::registry()
                    .with(filter)
                    .with(fmt_layer)
                    .try_init()
                    .is_ok()
            } else {
                tracing_subscriber::registry()
                    .with(filter)
                    .with(fmt_layer.without_time())
                    .try_init()
                    .is_ok()
            }
        }
        LogFormat::Jsonl => tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .json()
                    .flatten_event(true)
                    .with_current_span(false)
                    .with_writer(std::io::stderr),
            )
            .try_init()
            .is_ok(),
    }
}
