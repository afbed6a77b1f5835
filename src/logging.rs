use anyhow::Result;
use std::path::Path;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Directory that receives the rolling log files
pub const LOGS_DIR: &str = "logs";

/// Initialize the logging system
///
/// Logs go to the logs/ directory only so the interactive prompt stays
/// clean. Agent steps (thoughts, actions, observations) are logged at
/// INFO level.
pub fn init_logging() -> Result<()> {
    init_logging_in(LOGS_DIR)
}

/// Initialize logging into a specific directory
pub fn init_logging_in(dir: impl AsRef<Path>) -> Result<()> {
    let dir = dir.as_ref();
    std::fs::create_dir_all(dir)?;

    // Daily rotation
    let file_appender = RollingFileAppender::new(Rotation::DAILY, dir, "agent.log");

    let file_layer = fmt::layer()
        .with_writer(file_appender)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true)
        .with_line_number(true);

    // Default to INFO level, can be overridden with RUST_LOG env var
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .try_init()?;

    tracing::info!("Logging system initialized");
    tracing::info!("Log files location: {}/agent.log", dir.display());

    Ok(())
}
