//! Log file setup

use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::Context;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use crate::config::{app_dir, LogConfig};

/// Install a global subscriber writing to the configured log file.
///
/// `RUST_LOG` overrides the configured level. Returns the log path. A
/// subscriber installed earlier stays in place.
pub fn init(config: &LogConfig) -> anyhow::Result<PathBuf> {
    let path = match &config.file {
        Some(path) => path.clone(),
        None => app_dir()
            .context("Could not determine home directory")?
            .join("termbridge.log"),
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).with_context(|| format!("Failed to create {}", parent.display()))?;
    }

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("Failed to open log file {}", path.display()))?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);

    Ok(path)
}
