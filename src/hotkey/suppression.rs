//! Free-modifier release guard
//!
//! Releasing the Windows key on its own opens the Start menu. When a chord
//! that used the Windows key has fired, the release that follows must not
//! look like a lone tap. The guard remembers that an action fired while the
//! key was held and, on the next release, swallows the physical release and
//! replays it behind an inert key tap, so the OS sees the Windows key
//! released together with another key.

use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{debug, warn};

use crate::actions::{InputInjector, KeyStroke};

use super::keys::{is_free_modifier, vk};
use super::modifiers::{Modifier, ModifierStateSource};

/// Key tapped to neutralize a lone free-modifier release
pub const INERT_KEY: u16 = vk::CONTROL;

/// Single-flag state machine: Idle <-> Pending
#[derive(Debug, Default)]
pub struct SuppressionGuard {
    pending: AtomicBool,
}

impl SuppressionGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the next free-modifier release will be neutralized
    #[cfg(test)]
    pub fn is_pending(&self) -> bool {
        self.pending.load(Ordering::SeqCst)
    }

    /// Call right before an action fires.
    ///
    /// Arms the guard if either side of the free modifier is down; a no-op
    /// otherwise. Idempotent while armed.
    pub fn mark_pending(&self, source: &dyn ModifierStateSource) {
        let (left, right) = source.sides_down(Modifier::Free);
        if (left || right) && !self.pending.swap(true, Ordering::SeqCst) {
            debug!("free modifier release will be neutralized");
        }
    }

    /// Handle a key release; returns true if the release must be suppressed.
    ///
    /// If the released key is the free modifier and the guard is armed, the
    /// guard disarms and injects an inert press/release followed by a
    /// synthetic release of the same key, which replaces the physical one.
    /// If that injection fails the physical release is left to propagate,
    /// otherwise the OS would consider the key still held.
    pub fn on_key_release(&self, code: u16, injector: &dyn InputInjector) -> bool {
        if !is_free_modifier(code) {
            return false;
        }

        if !self.pending.swap(false, Ordering::SeqCst) {
            return false;
        }

        let replacement = [
            KeyStroke::press(INERT_KEY),
            KeyStroke::release(INERT_KEY),
            KeyStroke::release(code),
        ];

        match injector.send(&replacement) {
            Ok(()) => {
                debug!(code, "free modifier release neutralized");
                true
            }
            Err(e) => {
                warn!(error = %e, "failed to neutralize free modifier release");
                false
            }
        }
    }
}
