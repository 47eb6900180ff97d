//! Template helpers, plus a configurer that fills in their defaults.

use std::sync::{Arc, RwLock};

use indexmap::IndexMap;
use serde_json::Value;

use datahub_plugin::prelude::*;

/// Configuration name of the plugin.
pub const NAME: &str = "example_itemplatehelpers";

/// Setting holding the greeting the helper renders.
pub const GREETING_SETTING: &str = "example_itemplatehelpers.greeting";

const DEFAULT_GREETING: &str = "This is some example text.";

/// Contributes `example_itemplatehelpers_greeting` and
/// `example_itemplatehelpers_emphasize`.
#[derive(Debug, Default)]
pub struct TemplateHelpersPlugin {
    greeting: Arc<RwLock<String>>,
}

impl TemplateHelpersPlugin {
    /// Creates the plugin.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Configurer for TemplateHelpersPlugin {
    fn update_config(&self, mut settings: Settings) -> AppResult<Settings> {
        settings
            .entry(GREETING_SETTING.to_string())
            .or_insert_with(|| DEFAULT_GREETING.to_string());
        Ok(settings)
    }
}

impl Configurable for TemplateHelpersPlugin {
    fn configure(&self, settings: &Settings) -> AppResult<()> {
        let greeting = settings
            .get(GREETING_SETTING)
            .cloned()
            .unwrap_or_else(|| DEFAULT_GREETING.to_string());
        let mut slot = self
            .greeting
            .write()
            .map_err(|_| AppError::internal("Greeting lock poisoned"))?;
        *slot = greeting;
        Ok(())
    }
}

impl TemplateHelpers for TemplateHelpersPlugin {
    fn get_helpers(&self) -> IndexMap<String, HelperFn> {
        let greeting = Arc::clone(&self.greeting);
        let mut helpers: IndexMap<String, HelperFn> = IndexMap::new();
        helpers.insert(
            "example_itemplatehelpers_greeting".to_string(),
            Arc::new(move |_args| {
                let greeting = greeting
                    .read()
                    .map_err(|_| AppError::internal("Greeting lock poisoned"))?;
                Ok(Value::String(greeting.clone()))
            }),
        );
        helpers.insert(
            "example_itemplatehelpers_emphasize".to_string(),
            Arc::new(|args| match args.first().and_then(Value::as_str) {
                Some(text) => Ok(Value::String(format!("{}!", text.to_uppercase()))),
                None => Err(AppError::validation("emphasize expects one string argument")),
            }),
        );
        helpers
    }
}

/// Builds the plugin export.
pub fn export() -> AppResult<PluginExport> {
    let info = plugin_info!(
        name: NAME,
        version: "1.0.0",
        description: "Example template helpers",
        author: "DataHub"
    );
    Ok(plugin_export!(
        info,
        Arc::new(TemplateHelpersPlugin::new()),
        [TemplateHelpers, Configurer, Configurable]
    ))
}
