//! Plugin manager: loads plugins into a registry in configured order and
//! tells plugin observers about it.

use std::sync::Arc;

use tracing::{debug, info};

use datahub_core::config::{AppConfig, PluginConfig};
use datahub_core::result::AppResult;
use datahub_core::types::Settings;

use crate::exports::PluginExport;
use crate::hooks::HookDispatcher;
use crate::interfaces::PluginObserver;
use crate::loader::PluginCatalog;
use crate::registry::{PluginInfo, PluginRegistry};

/// Builds the registry by loading plugins one at a time.
#[derive(Debug, Default)]
pub struct PluginManager {
    registry: PluginRegistry,
}

impl PluginManager {
    /// Creates a manager over an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a manager over a prepared registry, e.g. one holding extra
    /// core functions.
    pub fn with_registry(registry: PluginRegistry) -> Self {
        Self { registry }
    }

    /// Loads one plugin.
    ///
    /// Loaded observers get `before_load`, the plugin is registered, then
    /// every observer, including the new plugin, gets `after_load`. A failure
    /// at any step drops the manager along with the partly built registry.
    pub fn load(mut self, export: PluginExport) -> AppResult<Self> {
        let info = export.info.clone();

        notify_observers(&self.registry, "before_load", |observer| {
            observer.before_load(&info)
        })?;
        self.registry.register(export)?;
        notify_observers(&self.registry, "after_load", |observer| {
            observer.after_load(&info)
        })?;

        info!(plugin = %info.name, version = %info.version, "Plugin loaded");
        Ok(self)
    }

    /// Loads the enabled plugins from the catalog, in configured order.
    pub fn load_enabled(mut self, catalog: &PluginCatalog, config: &PluginConfig) -> AppResult<Self> {
        for name in &config.enabled {
            debug!(plugin = %name, "Loading plugin from catalog");
            let export = catalog.create(name)?;
            self = self.load(export)?;
        }
        info!(count = self.registry.len(), "Plugins loaded");
        Ok(self)
    }

    /// The registry being built.
    pub fn registry(&self) -> &PluginRegistry {
        &self.registry
    }

    /// Freezes the registry.
    pub fn finish(self) -> Arc<PluginRegistry> {
        Arc::new(self.registry)
    }
}

/// Tells observers every plugin is being unloaded, in reverse load order.
pub fn unload_all(registry: &PluginRegistry) -> AppResult<()> {
    let plugins: Vec<&PluginInfo> = registry.plugins().collect();
    for info in plugins.into_iter().rev() {
        notify_observers(registry, "before_unload", |observer| {
            observer.before_unload(info)
        })?;
        notify_observers(registry, "after_unload", |observer| {
            observer.after_unload(info)
        })?;
        info!(plugin = %info.name, "Plugin unloaded");
    }
    Ok(())
}

/// A loaded, configured plugin set.
#[derive(Debug, Clone)]
pub struct LoadedPlugins {
    /// The frozen registry.
    pub registry: Arc<PluginRegistry>,
    /// Settings after every configurer has run.
    pub settings: Settings,
}

/// Loads the configured plugins and runs the configuration hooks.
pub fn bootstrap(catalog: &PluginCatalog, config: &AppConfig) -> AppResult<LoadedPlugins> {
    let registry = PluginManager::new()
        .load_enabled(catalog, &config.plugins)?
        .finish();
    let settings = HookDispatcher::new(Arc::clone(&registry)).configure(config.settings.clone())?;
    Ok(LoadedPlugins { registry, settings })
}

fn notify_observers<F>(registry: &PluginRegistry, hook: &str, mut call: F) -> AppResult<()>
where
    F: FnMut(&dyn PluginObserver) -> AppResult<()>,
{
    for implementation in registry.implementations::<dyn PluginObserver>() {
        debug!(plugin = %implementation.plugin.name, hook = hook, "Notifying plugin observer");
        call(implementation.hook.as_ref())?;
    }
    Ok(())
}
