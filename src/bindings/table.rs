//! The bounded, ordered binding table and its shared snapshot
//!
//! Tables are immutable once built. A reload builds a complete new table off
//! the hook thread and swaps the shared `Arc` in one step, so the hook never
//! sees a half-populated table.

use std::sync::Arc;

use parking_lot::RwLock;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::ConfigError;
use crate::hotkey::{
    is_modifier_key, Modifier, ModifierRequirement, ModifierSet, ModifierStateSource,
};

use super::record::{BindingDocument, BindingRecord};
use super::types::{Action, Binding, Trigger};

/// Problems with a single binding field
///
/// A warning never invalidates other bindings.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldWarning {
    #[error("binding {index}: no {modifier} requirement given, using \"none\"")]
    MissingModifier { index: usize, modifier: Modifier },

    #[error("binding {index}: unrecognized {modifier} value {value}, using \"none\"")]
    UnknownModifier {
        index: usize,
        modifier: Modifier,
        value: String,
    },

    #[error("binding {index}: missing trigger, binding skipped")]
    MissingTrigger { index: usize },

    #[error("binding {index}: unrecognized trigger {value}, binding skipped")]
    UnknownTrigger { index: usize, value: String },

    #[error("binding {index}: trigger {value} is a modifier key and will never fire")]
    ModifierTrigger { index: usize, value: String },

    #[error("binding {index}: missing action, binding does nothing")]
    MissingAction { index: usize },

    #[error("binding {index}: unrecognized action {value}, binding does nothing")]
    UnknownAction { index: usize, value: String },

    #[error(
        "binding table full ({capacity} entries), dropped {count} records from binding {index} on"
    )]
    CapacityExceeded {
        index: usize,
        capacity: usize,
        count: usize,
    },
}

/// Outcome of building a table from records
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Bindings in the new table
    pub loaded: usize,
    /// Records rejected for a missing or unrecognized trigger
    pub skipped: usize,
    /// Records beyond the capacity bound
    pub dropped: usize,
    pub warnings: Vec<FieldWarning>,
}

/// Ordered bindings; earlier entries take priority
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BindingTable {
    bindings: Vec<Binding>,
}

impl BindingTable {
    /// Maximum number of bindings in a table
    pub const CAPACITY: usize = 64;

    /// Build a table from a parsed config document.
    ///
    /// Fails only on structural problems; field problems become warnings.
    pub fn from_document(document: &Value) -> Result<(Self, LoadReport), ConfigError> {
        let document = BindingDocument::from_value(document)?;
        Ok(Self::from_records(&document.records()))
    }

    /// Build a table from records, in document order
    pub fn from_records(records: &[BindingRecord]) -> (Self, LoadReport) {
        let mut bindings = Vec::with_capacity(records.len().min(Self::CAPACITY));
        let mut report = LoadReport::default();

        for (index, record) in records.iter().enumerate() {
            if bindings.len() == Self::CAPACITY {
                let count = records.len() - index;
                report.dropped = count;
                report.warnings.push(FieldWarning::CapacityExceeded {
                    index,
                    capacity: Self::CAPACITY,
                    count,
                });
                break;
            }

            match parse_record(index, record, &mut report.warnings) {
                Some(binding) => bindings.push(binding),
                None => report.skipped += 1,
            }
        }

        for warning in &report.warnings {
            warn!(%warning, "binding config");
        }

        report.loaded = bindings.len();
        (Self { bindings }, report)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Binding> {
        self.bindings.iter()
    }

    /// First binding whose trigger equals `trigger` and whose modifiers hold
    /// right now.
    ///
    /// Linear in table size; the modifier checks dominate the cost.
    pub fn find(&self, trigger: Trigger, source: &dyn ModifierStateSource) -> Option<&Binding> {
        self.bindings
            .iter()
            .filter(|binding| binding.trigger == trigger)
            .find(|binding| binding.modifiers.check_all(source))
    }
}

/// Interpret one record; `None` means the record is skipped
fn parse_record(
    index: usize,
    record: &BindingRecord,
    warnings: &mut Vec<FieldWarning>,
) -> Option<Binding> {
    let Some(trigger_value) = &record.trigger else {
        warnings.push(FieldWarning::MissingTrigger { index });
        return None;
    };

    let Some(trigger) = trigger_value.as_str().and_then(Trigger::from_config) else {
        warnings.push(FieldWarning::UnknownTrigger {
            index,
            value: trigger_value.to_string(),
        });
        return None;
    };

    if let Trigger::Key(code) = trigger {
        if is_modifier_key(code) {
            warnings.push(FieldWarning::ModifierTrigger {
                index,
                value: trigger_value.to_string(),
            });
        }
    }

    let mut requirement = |channel: Modifier, value: &Option<Value>| -> ModifierRequirement {
        let Some(value) = value else {
            warnings.push(FieldWarning::MissingModifier {
                index,
                modifier: channel,
            });
            return ModifierRequirement::None;
        };

        value
            .as_str()
            .and_then(ModifierRequirement::from_config)
            .unwrap_or_else(|| {
                warnings.push(FieldWarning::UnknownModifier {
                    index,
                    modifier: channel,
                    value: value.to_string(),
                });
                ModifierRequirement::None
            })
    };

    let modifiers = ModifierSet {
        ctrl: requirement(Modifier::Ctrl, &record.ctrl),
        shift: requirement(Modifier::Shift, &record.shift),
        alt: requirement(Modifier::Alt, &record.alt),
        free: requirement(Modifier::Free, &record.free),
    };

    let action = match &record.action {
        None => {
            warnings.push(FieldWarning::MissingAction { index });
            Action::None
        }
        Some(value) => value
            .as_str()
            .and_then(Action::from_config)
            .unwrap_or_else(|| {
                warnings.push(FieldWarning::UnknownAction {
                    index,
                    value: value.to_string(),
                });
                Action::None
            }),
    };

    let binding = Binding {
        modifiers,
        trigger,
        action,
    };
    debug!(index, %binding, "binding parsed");
    Some(binding)
}

/// The active table, shared between the reload path and the hook thread
#[derive(Debug, Clone, Default)]
pub struct SharedBindings {
    current: Arc<RwLock<Arc<BindingTable>>>,
}

impl SharedBindings {
    pub fn new(table: BindingTable) -> Self {
        Self {
            current: Arc::new(RwLock::new(Arc::new(table))),
        }
    }

    /// The complete table in effect right now
    pub fn snapshot(&self) -> Arc<BindingTable> {
        Arc::clone(&self.current.read())
    }

    /// Publish a new table, returning the one it replaced
    pub fn replace(&self, table: BindingTable) -> Arc<BindingTable> {
        let next = Arc::new(table);
        std::mem::replace(&mut *self.current.write(), next)
    }
}
