//! Screenshot dispatch boundary
//!
//! The engine only decides *that* a capture should happen and in which mode.
//! Grabbing and encoding pixels belongs to a [`ScreenCapture`] implementation.

use std::path::PathBuf;

use tracing::warn;

/// Where the captured client area goes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CaptureMode {
    /// Bitmap placed on the clipboard
    Clipboard,
    /// Image written to a file
    File,
    /// Image written to a file, file reference placed on the clipboard
    FileAndClipboard,
}

impl CaptureMode {
    pub fn writes_file(self) -> bool {
        matches!(self, CaptureMode::File | CaptureMode::FileAndClipboard)
    }
}

/// Result reported by a capture implementation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureOutcome {
    /// Capture succeeded; file modes carry the written path
    Saved { path: Option<PathBuf> },
    /// Nothing captured (no window, allocation or encode failure, ...)
    Failed { reason: String },
}

/// External screenshot collaborator
///
/// Implementations log their own failures. The engine treats a failure as a
/// no-op and keeps processing input.
pub trait ScreenCapture: Send + Sync {
    fn capture(&self, mode: CaptureMode) -> CaptureOutcome;
}

/// Capture used when no screenshot backend is installed
#[derive(Debug, Default, Clone, Copy)]
pub struct UnavailableCapture;

impl ScreenCapture for UnavailableCapture {
    fn capture(&self, mode: CaptureMode) -> CaptureOutcome {
        warn!(?mode, "screenshot requested but no capture backend is installed");
        CaptureOutcome::Failed {
            reason: "no capture backend".to_string(),
        }
    }
}
