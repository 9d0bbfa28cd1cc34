//! Daemon lifecycle: shutdown signals and live config reload

pub mod reload;
mod shutdown;

pub use shutdown::ShutdownSignal;
