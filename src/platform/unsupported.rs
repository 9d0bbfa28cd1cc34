//! Fallback for platforms without global low-level input hooks

use std::sync::mpsc::Sender;
use std::sync::Weak;

use tracing::warn;

use crate::hotkey::{HotkeyError, InputSink};

use super::Capabilities;

pub type HookThreadId = u32;

pub fn capabilities() -> Result<Capabilities, HotkeyError> {
    Err(HotkeyError::Unsupported)
}

pub fn run_hooks(
    _sink: Weak<dyn InputSink>,
    ready: Sender<Result<HookThreadId, HotkeyError>>,
) -> Result<(), HotkeyError> {
    let _ = ready.send(Err(HotkeyError::Unsupported));
    Err(HotkeyError::Unsupported)
}

pub fn stop_hooks(_thread_id: HookThreadId) {
    warn!("no input hooks to stop on this platform");
}
