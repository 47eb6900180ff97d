//! The process-wide registry.
//!
//! Installed once after startup loading finishes and read by request
//! handling from then on. Tests install and reset it explicitly.

use std::sync::{Arc, RwLock};

use tracing::info;

use datahub_core::error::AppError;
use datahub_core::result::AppResult;

use crate::registry::PluginRegistry;

static REGISTRY: RwLock<Option<Arc<PluginRegistry>>> = RwLock::new(None);

/// Installs the process-wide registry. Fails if one is already installed.
pub fn install(registry: Arc<PluginRegistry>) -> AppResult<()> {
    let mut slot = REGISTRY
        .write()
        .map_err(|_| AppError::internal("Plugin registry lock poisoned"))?;
    if slot.is_some() {
        return Err(AppError::configuration(
            "A plugin registry is already installed",
        ));
    }
    info!(plugins = registry.len(), "Installing plugin registry");
    *slot = Some(registry);
    Ok(())
}

/// The process-wide registry.
pub fn current() -> AppResult<Arc<PluginRegistry>> {
    REGISTRY
        .read()
        .map_err(|_| AppError::internal("Plugin registry lock poisoned"))?
        .clone()
        .ok_or_else(|| AppError::configuration("No plugin registry is installed"))
}

/// Returns whether a registry is installed.
pub fn is_installed() -> bool {
    REGISTRY.read().map(|slot| slot.is_some()).unwrap_or(false)
}

/// Removes the process-wide registry and returns it.
pub fn reset() -> Option<Arc<PluginRegistry>> {
    let mut slot = match REGISTRY.write() {
        Ok(slot) => slot,
        Err(poisoned) => poisoned.into_inner(),
    };
    let previous = slot.take();
    if previous.is_some() {
        info!("Plugin registry reset");
    }
    previous
}
