use std::path::Path;
use std::sync::OnceLock;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::error::{AppError, Result};

/// Number of daily log files kept.
const MAX_LOG_FILES: usize = 7;

static GUARD: OnceLock<WorkerGuard> = OnceLock::new();

/// Initialize tracing with a daily rolling log file in `log_dir`.
///
/// The terminal belongs to the UI, so there is no console layer. `RUST_LOG`
/// takes precedence over `default_level`.
pub fn init(log_dir: &Path, default_level: &str) -> Result<()> {
    std::fs::create_dir_all(log_dir)?;

    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("bmt")
        .filename_suffix("log")
        .max_log_files(MAX_LOG_FILES)
        .build(log_dir)
        .map_err(|e| AppError::Logging(format!("{}: {}", log_dir.display(), e)))?;

    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
    // Dropping the guard would flush and stop the writer thread
    let _ = GUARD.set(guard);

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new(crate::config::DEFAULT_LOG_LEVEL));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_target(true)
                .with_ansi(false),
        )
        .try_init()
        .map_err(|e| AppError::Logging(e.to_string()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_creates_log_directory() {
        let dir = tempfile::tempdir().unwrap();
        let logs = dir.path().join("nested").join("logs");
        // A global subscriber can only be installed once per process
        let _ = init(&logs, "debug");
        assert!(logs.is_dir());
    }
}
