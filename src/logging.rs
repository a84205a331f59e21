use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;

pub fn default_log_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|p| p.join("taskboard").join("taskboard.log"))
}

/// Where logs go: `--log-file`, then `[logging] file`, then the data dir.
pub fn resolve_log_path(config: &LoggingConfig, cli_override: Option<&Path>) -> Option<PathBuf> {
    cli_override
        .map(Path::to_path_buf)
        .or_else(|| config.file.clone())
        .or_else(default_log_path)
}

/// `RUST_LOG` wins over the configured level.
pub fn build_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Installs the file subscriber. Returns the log path on success.
///
/// Stdout belongs to the terminal UI, so logs only ever go to a file. Any
/// failure leaves logging off and startup continues.
pub fn init(config: &LoggingConfig, cli_override: Option<&Path>) -> Option<PathBuf> {
    if !config.enabled && cli_override.is_none() {
        return None;
    }
    let path = resolve_log_path(config, cli_override)?;
    let file = open_log_file(&path).ok()?;

    let subscriber = tracing_subscriber::fmt()
        .with_ansi(false)
        .with_target(false)
        .with_env_filter(build_filter(&config.level))
        .with_writer(Arc::new(file))
        .finish();

    tracing::subscriber::set_global_default(subscriber).ok()?;
    tracing::info!(path = %path.display(), "logging started");
    Some(path)
}

fn open_log_file(path: &Path) -> std::io::Result<File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}
