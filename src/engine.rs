//! Engine: the active binding table plus the interceptor that reads it

use std::sync::{Arc, Weak};

use serde_json::Value;
use tracing::info;

use crate::actions::ActionExecutor;
use crate::bindings::{BindingTable, LoadReport, SharedBindings};
use crate::config::ConfigError;
use crate::hotkey::{InputSink, Interceptor};
use crate::platform::Capabilities;

/// Owns the binding table and the sink the platform hooks report to
pub struct Engine {
    bindings: SharedBindings,
    interceptor: Arc<Interceptor>,
}

impl Engine {
    pub fn new(table: BindingTable, capabilities: Capabilities) -> Self {
        let bindings = SharedBindings::new(table);
        let executor = ActionExecutor::new(capabilities.injector, capabilities.capture);
        let interceptor = Interceptor::new(bindings.clone(), capabilities.modifiers, executor);

        Self {
            bindings,
            interceptor: Arc::new(interceptor),
        }
    }

    /// Weak handle for the hook thread
    pub fn sink(&self) -> Weak<dyn InputSink> {
        let sink: Arc<dyn InputSink> = self.interceptor.clone();
        Arc::downgrade(&sink)
    }

    /// Rebuild the table from a new document and swap it in.
    ///
    /// On a structural error the current table stays active.
    pub fn reload(&self, document: &Value) -> Result<LoadReport, ConfigError> {
        let (table, report) = BindingTable::from_document(document)?;
        let previous = self.bindings.replace(table);
        info!(
            previous = previous.len(),
            loaded = report.loaded,
            skipped = report.skipped,
            dropped = report.dropped,
            "bindings reloaded"
        );
        Ok(report)
    }

    /// The table in effect right now
    #[cfg(test)]
    pub fn active_bindings(&self) -> Arc<BindingTable> {
        self.bindings.snapshot()
    }
}
