//! Raw binding records as they appear in the config document
//!
//! Records are kept close to the JSON: every field is optional and may hold
//! any JSON value. Interpretation (and the warnings that go with it) happens
//! when the table is built.

use serde::Deserialize;
use serde_json::Value;

use crate::config::ConfigError;

/// Top-level config document shape
///
/// Only the presence and type of `bindings` is structural; the contents of
/// each entry are validated field by field later.
#[derive(Debug, Clone, Deserialize)]
pub struct BindingDocument {
    pub bindings: Vec<Value>,
}

impl BindingDocument {
    /// Check the document structure
    pub fn from_value(document: &Value) -> Result<Self, ConfigError> {
        Self::deserialize(document).map_err(|e| ConfigError::Structure(e.to_string()))
    }

    /// Records in document order
    pub fn records(&self) -> Vec<BindingRecord> {
        self.bindings.iter().map(BindingRecord::from_value).collect()
    }
}

/// One unvalidated binding entry
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BindingRecord {
    pub ctrl: Option<Value>,
    pub shift: Option<Value>,
    pub alt: Option<Value>,
    /// Windows key requirement; `win` is accepted as an alias
    pub free: Option<Value>,
    pub trigger: Option<Value>,
    pub action: Option<Value>,
}

impl BindingRecord {
    /// Extract the known fields of an entry.
    ///
    /// Entries that are not objects yield an empty record, which is later
    /// skipped for lacking a trigger.
    pub fn from_value(value: &Value) -> Self {
        let field = |name: &str| value.get(name).filter(|v| !v.is_null()).cloned();

        Self {
            ctrl: field("ctrl"),
            shift: field("shift"),
            alt: field("alt"),
            free: field("free").or_else(|| field("win")),
            trigger: field("trigger"),
            action: field("action"),
        }
    }

    /// Convenience constructor for string-valued records
    pub fn new(trigger: &str, action: &str) -> Self {
        Self {
            trigger: Some(Value::from(trigger)),
            action: Some(Value::from(action)),
            ..Default::default()
        }
    }

    /// Set the free modifier requirement
    pub fn with_free(mut self, requirement: &str) -> Self {
        self.free = Some(Value::from(requirement));
        self
    }

    /// Set the ctrl requirement
    pub fn with_ctrl(mut self, requirement: &str) -> Self {
        self.ctrl = Some(Value::from(requirement));
        self
    }
}
