use std::path::PathBuf;

use serde::Deserialize;

#[derive(Debug, Deserialize, Clone, Default)]
#[allow(unused)]
#[readonly::make]
pub struct LoggingSettings {
    /// Append log output to this file instead of stderr.
    pub file: Option<PathBuf>,
    /// Default filter directive when `RUST_LOG` is unset.
    #[serde(default)]
    pub level: Option<String>,
}
