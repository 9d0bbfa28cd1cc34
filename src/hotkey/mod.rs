//! Hotkey module: system-wide chord interception
//!
//! The platform hook delivers every key and mouse event to an [`InputSink`].
//! The [`Interceptor`] evaluates live modifier state, matches the event
//! against the binding table and fires actions, while the suppression guard
//! keeps the Windows key from opening the Start menu after a chord.

mod interceptor;
mod keys;
mod listener;
pub(crate) mod modifiers;
mod suppression;

pub use interceptor::{
    InputSink, Interceptor, KeyEvent, KeyTransition, MouseEvent, MouseEventKind, Verdict,
};
pub use keys::{is_modifier_key, key_code_from_name, vk};
pub use listener::{HotkeyError, HotkeyListener};
pub use modifiers::{Modifier, ModifierRequirement, ModifierSet, ModifierStateSource};
