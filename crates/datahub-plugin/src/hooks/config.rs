use tracing::info;

use datahub_core::result::AppResult;
use datahub_core::types::Settings;

use crate::interfaces::{Configurable, Configurer};

use super::HookDispatcher;

impl HookDispatcher {
    /// Runs every configurer over `settings`, in load order.
    pub fn update_config(&self, settings: Settings) -> AppResult<Settings> {
        self.filter::<dyn Configurer, _, _>("update_config", settings, |hook, settings| {
            hook.update_config(settings)
        })
    }

    /// Hands the final settings to every configurable plugin.
    pub fn configure_plugins(&self, settings: &Settings) -> AppResult<()> {
        self.notify::<dyn Configurable, _>("configure", |hook| hook.configure(settings))
    }

    /// Runs the configurers, then hands the result to the configurables.
    /// Returns the final settings.
    pub fn configure(&self, settings: Settings) -> AppResult<Settings> {
        let settings = self.update_config(settings)?;
        self.configure_plugins(&settings)?;
        info!(settings = settings.len(), "Plugins configured");
        Ok(settings)
    }
}
