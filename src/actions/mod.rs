//! Action module
//!
//! Executes the action of a matched binding: media and volume keys through
//! an [`InputInjector`], screenshots through a [`ScreenCapture`].

mod executor;
pub(crate) mod injector;
mod screenshot;

pub use executor::{ActionExecutor, Dispatch};
pub use injector::{InjectError, InputInjector, KeyDirection, KeyStroke};
pub use screenshot::{CaptureMode, CaptureOutcome, ScreenCapture, UnavailableCapture};
