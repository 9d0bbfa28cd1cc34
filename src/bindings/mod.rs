//! Binding table module
//!
//! Turns config records into an ordered, bounded table of chord bindings
//! and publishes it to the hook thread as an immutable snapshot.

mod record;
mod table;
mod types;

pub use record::{BindingDocument, BindingRecord};
pub use table::{BindingTable, FieldWarning, LoadReport, SharedBindings};
pub use types::{Action, Binding, MouseButton, Trigger, WheelDirection};
