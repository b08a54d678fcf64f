//! Logging setup for the CLI
//!
//! Logs always go to stderr so stdout carries only command output. The
//! level comes from `-v`/`-q` unless `RUST_LOG` is set; `ICANN_LOG_FORMAT`
//! picks compact, full or JSON lines.

use crate::error::{Error, Result};
use is_terminal::IsTerminal;
use std::str::FromStr;
use tracing_subscriber::EnvFilter;

pub const LOG_FORMAT_ENV: &str = "ICANN_LOG_FORMAT";

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    /// Filter directives, e.g. `warn` or `icann_client=debug`
    pub level: String,
    pub format: LogFormat,
    /// Colourise when stderr is a terminal
    pub ansi: bool,
    pub thread_ids: bool,
    /// Include file and line numbers
    pub source_location: bool,
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Full,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "compact" => Ok(LogFormat::Compact),
            "full" => Ok(LogFormat::Full),
            "json" => Ok(LogFormat::Json),
            other => Err(format!("invalid log format {:?}, expected compact, full or json", other)),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            format: LogFormat::Compact,
            ansi: true,
            thread_ids: false,
            source_location: false,
        }
    }
}

impl LoggingConfig {
    /// Create logging config from verbosity level
    pub fn from_verbosity(verbosity: u8) -> Self {
        let mut config = Self::default();

        match verbosity {
            0 => {}
            1 => {
                config.level = "info".to_string();
            }
            2 => {
                config.level = "debug".to_string();
                config.source_location = true;
            }
            _ => {
                config.level = "trace".to_string();
                config.format = LogFormat::Full;
                config.source_location = true;
                config.thread_ids = true;
            }
        }

        config
    }

    /// Only errors are logged
    pub fn quiet() -> Self {
        Self {
            level: "error".to_string(),
            ..Self::default()
        }
    }

    /// Apply `RUST_LOG` and `ICANN_LOG_FORMAT`
    pub fn merge_with_env(&mut self) -> Result<()> {
        self.apply_overrides(
            std::env::var("RUST_LOG").ok(),
            std::env::var(LOG_FORMAT_ENV).ok(),
        )
    }

    fn apply_overrides(&mut self, rust_log: Option<String>, format: Option<String>) -> Result<()> {
        if let Some(level) = rust_log.filter(|v| !v.trim().is_empty()) {
            self.level = level;
        }
        if let Some(format) = format.filter(|v| !v.trim().is_empty()) {
            self.format = format.parse().map_err(Error::Logging)?;
        }
        Ok(())
    }
}

/// Initialize the global logging system
pub fn init_logging(config: LoggingConfig) -> Result<()> {
    let filter = EnvFilter::try_new(&config.level)
        .map_err(|e| Error::Logging(format!("invalid filter {:?}: {}", config.level, e)))?;
    let ansi = config.ansi && std::io::stderr().is_terminal();

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(config.thread_ids)
        .with_file(config.source_location)
        .with_line_number(config.source_location);

    let result = match config.format {
        LogFormat::Compact => builder.with_ansi(ansi).compact().try_init(),
        LogFormat::Full => builder.with_ansi(ansi).try_init(),
        LogFormat::Json => builder.with_ansi(false).json().try_init(),
    };
    result.map_err(|e| Error::Logging(e.to_string()))?;

    tracing::debug!(config = ?config, "logging initialized");
    Ok(())
}
