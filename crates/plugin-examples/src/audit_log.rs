//! Records plugin loads and domain object changes, and exposes them
//! through an action.

use std::sync::{Arc, Mutex};

use indexmap::IndexMap;
use serde_json::{Value, json};
use tracing::info;

use datahub_plugin::prelude::*;

/// Configuration name of the plugin.
pub const NAME: &str = "audit_log";

/// Name of the action listing recorded entries.
pub const LIST_ACTION: &str = "audit_log_list";

/// Keeps an in-memory audit trail.
#[derive(Debug, Default)]
pub struct AuditLogPlugin {
    entries: Arc<Mutex<Vec<Value>>>,
}

impl AuditLogPlugin {
    /// Creates the plugin with an empty trail.
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorded entries, oldest first.
    pub fn entries(&self) -> Vec<Value> {
        self.entries
            .lock()
            .map(|entries| entries.clone())
            .unwrap_or_default()
    }

    fn record(&self, entry: Value) -> AppResult<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| AppError::internal("Audit log lock poisoned"))?;
        entries.push(entry);
        Ok(())
    }
}

impl PluginObserver for AuditLogPlugin {
    fn after_load(&self, plugin: &PluginInfo) -> AppResult<()> {
        info!(plugin = %plugin.name, version = %plugin.version, "Audit: plugin loaded");
        self.record(json!({"event": "plugin_loaded", "plugin": plugin.name}))
    }

    fn after_unload(&self, plugin: &PluginInfo) -> AppResult<()> {
        info!(plugin = %plugin.name, "Audit: plugin unloaded");
        self.record(json!({"event": "plugin_unloaded", "plugin": plugin.name}))
    }
}

impl DomainObjectModification for AuditLogPlugin {
    fn notify(&self, entity: &DataDict, operation: DomainOperation) -> AppResult<()> {
        let id = entity.get("id").cloned().unwrap_or(Value::Null);
        info!(operation = %operation, id = %id, "Audit: domain object modified");
        self.record(json!({
            "event": "domain_object",
            "operation": operation.to_string(),
            "id": id,
        }))
    }
}

impl Actions for AuditLogPlugin {
    fn get_actions(&self) -> IndexMap<String, Action> {
        let entries = Arc::clone(&self.entries);
        let mut actions = IndexMap::new();
        actions.insert(
            LIST_ACTION.to_string(),
            Action::new(move |_ctx, _data| {
                let entries = entries
                    .lock()
                    .map_err(|_| AppError::internal("Audit log lock poisoned"))?;
                Ok(Value::Array(entries.clone()))
            })
            .side_effect_free(),
        );
        actions
    }
}

/// Builds the plugin export.
pub fn export() -> AppResult<PluginExport> {
    let info = plugin_info!(
        name: NAME,
        version: "1.0.0",
        description: "In-memory audit trail of plugin loads and object changes",
        author: "DataHub"
    );
    Ok(plugin_export!(
        info,
        Arc::new(AuditLogPlugin::new()),
        [PluginObserver, DomainObjectModification, Actions]
    ))
}
