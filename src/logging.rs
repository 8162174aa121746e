//! Logging setup for sweeper.
//!
//! Console output plus a daily-rolling log file in the platform data
//! directory. The default level is `info`; set `RUST_LOG` to override.

use anyhow::{Context as _, Result};
use std::path::PathBuf;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt as _, util::SubscriberInitExt as _, EnvFilter};

/// Log directory based on platform conventions:
/// - Windows: `%APPDATA%/sweeper/logs`
/// - macOS: `~/Library/Application Support/sweeper/logs`
/// - Linux: `~/.local/share/sweeper/logs`
pub fn log_dir() -> Result<PathBuf> {
    let base_dir = dirs::data_dir().context("Failed to determine data directory")?;
    let log_dir = base_dir.join("sweeper").join("logs");

    if !log_dir.exists() {
        std::fs::create_dir_all(&log_dir)
            .with_context(|| format!("Failed to create log directory: {}", log_dir.display()))?;
    }

    Ok(log_dir)
}

/// Initialize console and file logging. Call once at startup.
///
/// # Errors
///
/// Returns an error if the log directory cannot be created or the file
/// appender fails; the caller may continue without file logging.
pub fn init() -> Result<()> {
    let log_dir = log_dir()?;

    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .max_log_files(10)
        .filename_prefix("sweeper")
        .filename_suffix("log")
        .build(&log_dir)
        .context("Failed to create log file appender")?;

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .context("Failed to create env filter")?;

    let console_layer = fmt::layer()
        .compact()
        .with_target(false)
        .with_writer(std::io::stderr);

    let file_layer = fmt::layer()
        .with_target(true)
        .with_ansi(false)
        .with_writer(file_appender);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .init();

    tracing::debug!("logging initialized, log directory: {:?}", log_dir);

    Ok(())
}

/// Path of today's log file.
pub fn current_log_path() -> Result<PathBuf> {
    let log_dir = log_dir()?;
    let today = chrono::Local::now().format("%Y-%m-%d").to_string();
    Ok(log_dir.join(format!("sweeper.{today}.log")))
}
