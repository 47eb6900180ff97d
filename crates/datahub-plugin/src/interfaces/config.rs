//! Plugin-loading and configuration interfaces.

use datahub_core::result::AppResult;
use datahub_core::types::Settings;

use crate::registry::PluginInfo;

/// Observes the plugin loading mechanism.
pub trait PluginObserver: Send + Sync {
    /// Called before a plugin is registered.
    fn before_load(&self, _plugin: &PluginInfo) -> AppResult<()> {
        Ok(())
    }

    /// Called after a plugin has been registered.
    fn after_load(&self, _plugin: &PluginInfo) -> AppResult<()> {
        Ok(())
    }

    /// Called before a plugin is unloaded.
    fn before_unload(&self, _plugin: &PluginInfo) -> AppResult<()> {
        Ok(())
    }

    /// Called after a plugin has been unloaded.
    fn after_unload(&self, _plugin: &PluginInfo) -> AppResult<()> {
        Ok(())
    }
}

/// Receives the final configuration.
pub trait Configurable: Send + Sync {
    /// Called once every configurer has run.
    fn configure(&self, _settings: &Settings) -> AppResult<()> {
        Ok(())
    }
}

/// Updates the configuration at the earliest point it is available.
pub trait Configurer: Send + Sync {
    /// Returns the settings, possibly modified.
    fn update_config(&self, settings: Settings) -> AppResult<Settings> {
        Ok(settings)
    }
}
