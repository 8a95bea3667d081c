//! Logging configuration module
//!
//! Provides configurable JSON/Pretty/TUI logging output
//!
//! # Environment Variables
//! - `LOG_FORMAT`: Output format - `tui` (default), `json`, or `pretty`
//! - `RUST_LOG`: Log level filter (default: `info`)
//!
//! In `tui` mode the terminal belongs to the dashboard, so tracing output is
//! written as JSON lines to the configured log file instead of stdout.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::error::AppError;

/// Where tracing output goes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// JSON lines appended to the log file
    Tui,
    /// JSON lines on stdout
    Json,
    /// Human-readable output on stdout
    Pretty,
}

impl LogFormat {
    /// Parse a `LOG_FORMAT` value; anything unrecognized means TUI mode
    pub fn parse(raw: &str) -> Self {
        match raw {
            "json" => LogFormat::Json,
            "pretty" => LogFormat::Pretty,
            _ => LogFormat::Tui,
        }
    }

    /// Read `LOG_FORMAT` from the environment
    pub fn from_env() -> Self {
        std::env::var("LOG_FORMAT")
            .map(|f| Self::parse(&f))
            .unwrap_or(LogFormat::Tui)
    }
}

/// Initialize logging with configurable format
///
/// Also respects `RUST_LOG` for log level filtering (default: `info`).
/// Must be called at most once per process.
pub fn init_logging(format: LogFormat, log_file: &Path) -> Result<(), AppError> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    match format {
        LogFormat::Pretty => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .pretty()
                .init();
        }
        LogFormat::Json => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .json()
                .init();
        }
        LogFormat::Tui => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(log_file)
                .map_err(|e| {
                    AppError::Config(format!(
                        "Cannot open log file '{}': {}",
                        log_file.display(),
                        e
                    ))
                })?;

            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .json()
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
    }

    Ok(())
}
