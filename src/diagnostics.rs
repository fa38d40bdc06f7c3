use crate::error::EstimatorError;
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const LOG_FILE_NAME: &str = "ambient_light.log";

/// Open the log file under `log_dir`, creating the directory if needed
pub fn log_file_appender(log_dir: &Path) -> Result<RollingFileAppender, EstimatorError> {
    std::fs::create_dir_all(log_dir)?;

    let appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(LOG_FILE_NAME)
        .build(log_dir)?;
    Ok(appender)
}

/// Initialize tracing with both console and file output.
///
/// The returned guard flushes the file writer on drop; keep it alive for the
/// whole run. Fails without installing anything if the log file can't be opened.
pub fn init_diagnostics(log_dir: &Path) -> Result<WorkerGuard, EstimatorError> {
    let file_appender = log_file_appender(log_dir)?;
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .with(fmt::layer().with_writer(std::io::stdout)) // Console output
        .with(fmt::layer().with_writer(non_blocking).with_ansi(false)) // File output
        .init();

    tracing::info!("Diagnostics initialized. Logs: {:?}", log_dir);

    Ok(guard)
}
