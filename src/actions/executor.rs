//! Action dispatch
//!
//! Media and volume actions become a synthetic tap of the matching media key.
//! Screenshot actions are handed to the capture collaborator. Failures are
//! logged and dropped: a broken action must never stall input processing.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::bindings::Action;
use crate::hotkey::vk;

use super::injector::InputInjector;
use super::screenshot::{CaptureOutcome, ScreenCapture};

/// What happened when an action was fired
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    /// A media key was tapped
    Tapped(u16),
    /// The capture collaborator ran
    Captured(CaptureOutcome),
    /// The action did nothing (no-op action or a failure that was logged)
    Skipped,
}

/// Runs bound actions through the injected capabilities
pub struct ActionExecutor {
    injector: Arc<dyn InputInjector>,
    capture: Arc<dyn ScreenCapture>,
}

impl ActionExecutor {
    pub fn new(injector: Arc<dyn InputInjector>, capture: Arc<dyn ScreenCapture>) -> Self {
        Self { injector, capture }
    }

    /// The injector, shared with the suppression guard
    pub fn injector(&self) -> &dyn InputInjector {
        self.injector.as_ref()
    }

    /// Fire an action. Never fails.
    pub fn execute(&self, action: Action) -> Dispatch {
        let code = match action {
            Action::None => return Dispatch::Skipped,
            Action::VolumeUp => vk::VOLUME_UP,
            Action::VolumeDown => vk::VOLUME_DOWN,
            Action::VolumeMute => vk::VOLUME_MUTE,
            Action::PlayPause => vk::MEDIA_PLAY_PAUSE,
            Action::PrevTrack => vk::MEDIA_PREV_TRACK,
            Action::NextTrack => vk::MEDIA_NEXT_TRACK,
            Action::Screenshot(mode) => {
                let outcome = self.capture.capture(mode);
                match &outcome {
                    CaptureOutcome::Saved { path } => debug!(?mode, ?path, "screenshot captured"),
                    CaptureOutcome::Failed { reason } => {
                        debug!(?mode, %reason, "screenshot skipped")
                    }
                }
                return Dispatch::Captured(outcome);
            }
        };

        match self.injector.tap(code) {
            Ok(()) => {
                debug!(%action, code, "media key sent");
                Dispatch::Tapped(code)
            }
            Err(e) => {
                warn!(%action, error = %e, "failed to send media key");
                Dispatch::Skipped
            }
        }
    }
}
