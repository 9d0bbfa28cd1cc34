//! chordkey-daemon: system-wide chord remapping daemon
//!
//! Watches every key and mouse event and turns configured chords (a mouse
//! button, wheel tick or key plus a set of held modifiers) into media,
//! volume and screenshot actions:
//! - Global low-level input hooks on a dedicated thread
//! - Ordered, bounded binding table with first-match-wins lookup
//! - Windows key release guard so chords never open the Start menu
//! - Live reload of the JSON config

mod actions;
mod bindings;
mod cli;
mod config;
mod engine;
mod hotkey;
mod lifecycle;
mod platform;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::sync::mpsc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::bindings::{BindingTable, LoadReport};
use crate::cli::CliArgs;
use crate::config::{Config, ConfigWatcher};
use crate::engine::Engine;
use crate::hotkey::HotkeyListener;
use crate::lifecycle::{reload, ShutdownSignal};

#[tokio::main]
async fn main() -> Result<()> {
    let args = CliArgs::parse();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!(version = env!("CARGO_PKG_VERSION"), "chordkey-daemon starting");

    // Load configuration; a broken document at startup is fatal
    let config = Config::load(args.config).context("failed to locate configuration")?;
    info!(path = %config.config_path.display(), "configuration loaded");

    let document = config.read_document()?;
    let (table, report) = BindingTable::from_document(&document)
        .with_context(|| format!("rejected config {}", config.config_path.display()))?;

    if args.check {
        print_check(&config, &table, &report);
        return Ok(());
    }

    let capabilities = platform::capabilities().context("input hooks unavailable")?;
    let engine = Engine::new(table, capabilities);
    info!(
        loaded = report.loaded,
        skipped = report.skipped,
        dropped = report.dropped,
        "bindings active"
    );

    // Install the hooks (runs on dedicated thread)
    let listener = HotkeyListener::new();
    listener
        .start(engine.sink())
        .context("failed to install input hooks")?;
    info!("input hooks started");

    // Watch the config; the sender stays alive here so the reload loop only
    // ends on shutdown
    let (reload_tx, reload_rx) = mpsc::channel(1);
    let _watcher = ConfigWatcher::spawn(&config.config_path, reload_tx.clone())
        .map_err(|e| warn!(error = %e, "live reload disabled"))
        .ok();

    let shutdown = ShutdownSignal::new();

    info!("daemon initialized, entering main loop");

    tokio::select! {
        _ = reload::run(&engine, &config, reload_rx) => {
            info!("reload loop exited");
        }

        _ = shutdown.wait() => {
            info!("shutdown signal received");
        }
    }

    // Cleanup
    info!("shutting down...");
    drop(reload_tx);
    listener.stop();

    info!("chordkey-daemon stopped");

    Ok(())
}

/// Report for `--check`
fn print_check(config: &Config, table: &BindingTable, report: &LoadReport) {
    println!("config: {}", config.config_path.display());

    for (index, binding) in table.iter().enumerate() {
        println!("  {index:>2}: {binding}");
    }

    for warning in &report.warnings {
        println!("warning: {warning}");
    }

    println!(
        "{} active, {} skipped, {} dropped",
        report.loaded, report.skipped, report.dropped
    );
}
