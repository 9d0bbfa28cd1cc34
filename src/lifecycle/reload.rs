//! Live reload loop

use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{error, info};

use crate::config::{Config, ReloadRequest};
use crate::engine::Engine;

/// Pause after a change notification before reading the file
const SETTLE_DELAY: Duration = Duration::from_millis(100);

/// Reload the bindings for every request until the channel closes.
///
/// A document that fails to read or parse leaves the active table in place.
pub async fn run(engine: &Engine, config: &Config, mut requests: mpsc::Receiver<ReloadRequest>) {
    info!("config reload loop started");

    while requests.recv().await.is_some() {
        tokio::time::sleep(SETTLE_DELAY).await;
        // Changes that arrived while settling are covered by this read
        while requests.try_recv().is_ok() {}

        match config.read_document().and_then(|document| engine.reload(&document)) {
            Ok(report) => info!(
                loaded = report.loaded,
                warnings = report.warnings.len(),
                "config reloaded"
            ),
            Err(e) => error!(error = %e, "config reload failed, keeping current bindings"),
        }
    }

    info!("config reload loop stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::tests::test_engine;
    use std::fs;
    use std::sync::Arc;

    fn write_config(config: &Config, contents: &str) {
        fs::write(&config.config_path, contents).unwrap();
    }

    #[test]
    fn test_reload_applies_and_rejects() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            config_path: dir.path().join("config.json"),
        };
        let engine = test_engine(Arc::default(), Arc::default());

        write_config(
            &config,
            r#"{ "bindings": [
                { "free": "left", "trigger": "wheel_up", "action": "volume_up" },
                { "free": "left", "trigger": "wheel_down", "action": "volume_down" }
            ] }"#,
        );

        let (tx, rx) = mpsc::channel(1);
        tx.try_send(ReloadRequest).unwrap();
        drop(tx);
        tokio_test::block_on(run(&engine, &config, rx));
        assert_eq!(engine.active_bindings().len(), 2);

        write_config(&config, r#"{ "bindings": 7 }"#);
        let (tx, rx) = mpsc::channel(1);
        tx.try_send(ReloadRequest).unwrap();
        drop(tx);
        tokio_test::block_on(run(&engine, &config, rx));
        assert_eq!(engine.active_bindings().len(), 2);

        write_config(&config, "not json");
        let (tx, rx) = mpsc::channel(1);
        tx.try_send(ReloadRequest).unwrap();
        drop(tx);
        tokio_test::block_on(run(&engine, &config, rx));
        assert_eq!(engine.active_bindings().len(), 2);
    }

    #[test]
    fn test_loop_ends_when_channel_closes() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            config_path: dir.path().join("missing.json"),
        };
        let engine = test_engine(Arc::default(), Arc::default());

        let (tx, rx) = mpsc::channel::<ReloadRequest>(1);
        drop(tx);
        tokio_test::block_on(run(&engine, &config, rx));
        assert!(engine.active_bindings().is_empty());
    }
}
