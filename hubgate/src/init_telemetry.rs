use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

/// Filter from `RUST_LOG`, falling back to the configured level and then `info`.
pub fn build_loglevel_filter(level: Option<&str>) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level.unwrap_or("info")))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Install the global subscriber. Output goes to stderr unless a log file is
/// given; stdout stays free for the credential-helper protocol.
pub fn init_tracing(level: Option<&str>, file: Option<&Path>) -> Result<()> {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(build_loglevel_filter(level))
        .with_timer(tracing_subscriber::fmt::time::SystemTime)
        .with_target(true);

    match file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            builder
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
                .map_err(|e| anyhow::anyhow!(e))?;
        }
        None => {
            builder
                .with_writer(std::io::stderr)
                .try_init()
                .map_err(|e| anyhow::anyhow!(e))?;
        }
    }

    Ok(())
}
