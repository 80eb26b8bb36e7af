//! Logging system initialization
//!
//! Sets up `tracing` from the `[logging]` section: level filter, text or JSON
//! output, and an optional log file with daily rotation.

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling;
use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;
use crate::errors::{Result, ShortlyError};

const DEFAULT_LOG_FILENAME: &str = "shortly.log";

type BoxedWriter = Box<dyn std::io::Write + Send + Sync>;

/// Initialize logging system based on configuration
///
/// `RUST_LOG` takes precedence over `logging.level` when set.
///
/// # Returns
/// * `WorkerGuard` - Must be kept alive for the duration of the program
///   to ensure non-blocking log writes are flushed
pub fn init_logging(config: &LoggingConfig) -> Result<WorkerGuard> {
    let writer = build_writer(config)?;

    let (non_blocking_writer, guard) = tracing_appender::non_blocking(writer);
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .map_err(|e| ShortlyError::config(format!("Invalid log level '{}': {}", config.level, e)))?;

    let subscriber_builder = tracing_subscriber::fmt()
        .with_writer(non_blocking_writer)
        .with_env_filter(filter)
        .with_level(true)
        .with_ansi(log_file(config).is_none());

    let result = if config.format == "json" {
        subscriber_builder.json().try_init()
    } else {
        subscriber_builder.try_init()
    };
    result.map_err(|e| ShortlyError::config(format!("Failed to install logger: {}", e)))?;

    Ok(guard)
}

/// 非空的日志文件路径
fn log_file(config: &LoggingConfig) -> Option<&str> {
    config.file.as_deref().filter(|f| !f.is_empty())
}

fn build_writer(config: &LoggingConfig) -> Result<BoxedWriter> {
    let Some(log_file) = log_file(config) else {
        return Ok(Box::new(std::io::stdout()));
    };

    let path = Path::new(log_file);
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));

    if config.enable_rotation {
        let filename = path
            .file_name()
            .and_then(|f| f.to_str())
            .unwrap_or(DEFAULT_LOG_FILENAME);

        let appender = rolling::Builder::new()
            .rotation(rolling::Rotation::DAILY)
            .filename_prefix(filename.trim_end_matches(".log"))
            .filename_suffix("log")
            .max_log_files(config.max_backups.max(1) as usize)
            .build(dir)
            .map_err(|e| {
                ShortlyError::file_operation(format!("Failed to create rolling log appender: {}", e))
            })?;
        Ok(Box::new(appender))
    } else {
        std::fs::create_dir_all(dir)?;
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| {
                ShortlyError::file_operation(format!("Failed to open log file {}: {}", log_file, e))
            })?;
        Ok(Box::new(file))
    }
}
