//! File logging; the terminal belongs to the UI.

use color_eyre::{eyre::eyre, Result};
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter directive
pub const LOG_ENV: &str = "POKEDEX_LOG";

/// Directory for log files: $XDG_DATA_HOME/pokedex/logs
pub fn log_dir() -> Option<PathBuf> {
  dirs::data_dir()
    .or_else(|| dirs::home_dir().map(|p| p.join(".local/share")))
    .map(|p| p.join("pokedex").join("logs"))
}

fn env_filter() -> EnvFilter {
  EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Install a daily rolling file subscriber.
///
/// The returned guard flushes pending lines when dropped, so keep it alive
/// until exit. Returns `None` when no data directory can be determined.
pub fn init() -> Result<Option<WorkerGuard>> {
  let dir = match log_dir() {
    Some(dir) => dir,
    None => return Ok(None),
  };

  std::fs::create_dir_all(&dir)
    .map_err(|e| eyre!("Failed to create log directory {}: {}", dir.display(), e))?;

  let appender = tracing_appender::rolling::daily(&dir, "pokedex.log");
  let (writer, guard) = tracing_appender::non_blocking(appender);

  tracing_subscriber::fmt()
    .with_env_filter(env_filter())
    .with_writer(writer)
    .with_ansi(false)
    .try_init()
    .map_err(|e| eyre!("Failed to initialize logging: {}", e))?;

  tracing::info!(dir = %dir.display(), "logging initialized");

  Ok(Some(guard))
}
