//! Platform adapters
//!
//! Everything that touches the OS input stack lives here: hook installation,
//! physical key state and synthetic input. The rest of the crate only sees
//! the capability traits.

use std::sync::Arc;

use crate::actions::{InputInjector, ScreenCapture};
use crate::hotkey::ModifierStateSource;

#[cfg(windows)]
mod windows;
#[cfg(windows)]
pub use self::windows::{capabilities, run_hooks, stop_hooks, HookThreadId};

#[cfg(not(windows))]
mod unsupported;
#[cfg(not(windows))]
pub use self::unsupported::{capabilities, run_hooks, stop_hooks, HookThreadId};

/// OS capabilities the engine is built from
pub struct Capabilities {
    pub modifiers: Arc<dyn ModifierStateSource>,
    pub injector: Arc<dyn InputInjector>,
    pub capture: Arc<dyn ScreenCapture>,
}

/// `dwExtraInfo` stamped on every event this process injects
#[cfg_attr(not(windows), allow(dead_code))]
pub const INJECTION_TAG: usize = 0x4348_4B59;

/// Whether a hooked event is one of ours coming back.
///
/// Input injected by other programs (mouse utilities, remote desktop,
/// on-screen keyboards) is matched like physical input.
#[cfg_attr(not(windows), allow(dead_code))]
pub fn is_self_injected(injected: bool, extra_info: usize) -> bool {
    injected && extra_info == INJECTION_TAG
}
