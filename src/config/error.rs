//! Config errors

use std::path::PathBuf;

use thiserror::Error;

/// Errors that make a config document unusable as a whole
///
/// Problems inside individual bindings are not errors; they are reported as
/// warnings when the table is built.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON in {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid config structure: {0}")]
    Structure(String),

    #[error("no config directory on this system; pass --config or set {}", super::CONFIG_ENV)]
    NoConfigDir,

    #[error("failed to watch config file: {0}")]
    Watch(#[from] notify::Error),
}
