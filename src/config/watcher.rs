//! Config file watcher for live reload
//!
//! Watches the directory holding the config file, so saves that replace the
//! file by rename are seen as well as in-place writes.

use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

use notify::{Config as WatchConfig, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::{debug, info, warn};

use super::ConfigError;

/// Signal that the config file changed on disk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReloadRequest;

/// Keeps the OS watch alive; dropping it stops the notifications
pub struct ConfigWatcher {
    _watcher: RecommendedWatcher,
}

impl ConfigWatcher {
    /// Start watching `config_path`, sending a request on every change.
    ///
    /// Requests are sent with `try_send`: while one is still queued, further
    /// changes collapse into it.
    pub fn spawn(
        config_path: &Path,
        requests: mpsc::Sender<ReloadRequest>,
    ) -> Result<Self, ConfigError> {
        let file_name = config_path
            .file_name()
            .map(OsStr::to_os_string)
            .unwrap_or_else(|| OsString::from(super::CONFIG_FILE_NAME));
        let directory = watched_directory(config_path);

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) if touches_file(&event, &file_name) => {
                    match requests.try_send(ReloadRequest) {
                        Ok(()) => debug!(kind = ?event.kind, "config change detected"),
                        Err(TrySendError::Full(_)) => {}
                        Err(TrySendError::Closed(_)) => {
                            debug!("reload channel closed, ignoring config change")
                        }
                    }
                }
                Ok(_) => {}
                Err(e) => warn!(error = %e, "config watch error"),
            },
            WatchConfig::default(),
        )?;

        watcher.watch(&directory, RecursiveMode::NonRecursive)?;
        info!(path = %config_path.display(), "watching config for changes");

        Ok(Self { _watcher: watcher })
    }
}

fn watched_directory(config_path: &Path) -> PathBuf {
    match config_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Whether a watch event wrote or created the config file
fn touches_file(event: &Event, file_name: &OsStr) -> bool {
    matches!(event.kind, EventKind::Create(_) | EventKind::Modify(_))
        && event.paths.iter().any(|path| path.file_name() == Some(file_name))
}
