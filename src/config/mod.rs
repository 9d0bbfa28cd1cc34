//! Configuration discovery and loading
//!
//! The config is a JSON document with a `bindings` list. Its location is
//! resolved once at startup; if nothing exists there yet, a default config
//! with the stock mouse chords is written first.

mod error;
mod watcher;

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{json, Value};
use tracing::info;

pub use error::ConfigError;
pub use watcher::{ConfigWatcher, ReloadRequest};

/// Environment variable naming the config file
pub const CONFIG_ENV: &str = "CHORDKEY_CONFIG";

/// Config file name, both in the working directory and the config dir
pub const CONFIG_FILE_NAME: &str = "config.json";

/// Daemon configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to the bindings document
    pub config_path: PathBuf,
}

impl Config {
    /// Resolve the config location and make sure a file exists there.
    ///
    /// Order: explicit path, then `CHORDKEY_CONFIG`, then `config.json` in
    /// the working directory if present, then the user config directory.
    pub fn load(explicit: Option<PathBuf>) -> Result<Self, ConfigError> {
        let config_path = resolve_path(
            explicit,
            std::env::var_os(CONFIG_ENV),
            Path::new(CONFIG_FILE_NAME),
            dirs::config_dir(),
        )?;

        let config = Self { config_path };
        if config.ensure_exists()? {
            info!(path = %config.config_path.display(), "wrote default config");
        }
        Ok(config)
    }

    /// Write the default document if the file is missing.
    ///
    /// Returns true if a file was written.
    pub fn ensure_exists(&self) -> Result<bool, ConfigError> {
        if self.config_path.exists() {
            return Ok(false);
        }

        let io_error = |source| ConfigError::Io {
            path: self.config_path.clone(),
            source,
        };

        if let Some(parent) = self.config_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_error)?;
        }

        let contents = serde_json::to_string_pretty(&default_document()).map_err(|source| {
            ConfigError::Json {
                path: self.config_path.clone(),
                source,
            }
        })?;
        fs::write(&self.config_path, contents + "\n").map_err(io_error)?;
        Ok(true)
    }

    /// Read and parse the config file
    pub fn read_document(&self) -> Result<Value, ConfigError> {
        let contents = fs::read_to_string(&self.config_path).map_err(|source| ConfigError::Io {
            path: self.config_path.clone(),
            source,
        })?;

        serde_json::from_str(&contents).map_err(|source| ConfigError::Json {
            path: self.config_path.clone(),
            source,
        })
    }
}

fn resolve_path(
    explicit: Option<PathBuf>,
    from_env: Option<OsString>,
    local: &Path,
    config_dir: Option<PathBuf>,
) -> Result<PathBuf, ConfigError> {
    if let Some(path) = explicit {
        return Ok(path);
    }

    if let Some(path) = from_env.filter(|p| !p.is_empty()) {
        return Ok(PathBuf::from(path));
    }

    if local.is_file() {
        return Ok(local.to_path_buf());
    }

    config_dir
        .map(|dir| dir.join("chordkey").join(CONFIG_FILE_NAME))
        .ok_or(ConfigError::NoConfigDir)
}

/// Stock bindings: media control on the mouse while the left Windows key is held
pub fn default_document() -> Value {
    let stock = [
        ("wheel_up", "volume_up"),
        ("wheel_down", "volume_down"),
        ("mouse_x2", "next_track"),
        ("mouse_x1", "prev_track"),
        ("mouse_middle", "play_pause"),
    ];

    // Every field spelled out so the stock file loads without warnings
    let bindings: Vec<Value> = stock
        .iter()
        .map(|(trigger, action)| {
            json!({
                "ctrl": "none",
                "shift": "none",
                "alt": "none",
                "free": "left",
                "trigger": trigger,
                "action": action
            })
        })
        .collect();

    json!({ "bindings": bindings })
}
