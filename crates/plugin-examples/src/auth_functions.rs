//! Restricts group creation to a configured set of curators.

use std::sync::{Arc, RwLock};

use indexmap::IndexMap;
use tracing::info;

use datahub_plugin::prelude::*;

/// Configuration name of the plugin.
pub const NAME: &str = "example_iauthfunctions";

/// Setting holding the space-separated curator user names.
pub const CURATORS_SETTING: &str = "example_iauthfunctions.curators";

/// Only curators may create groups.
#[derive(Debug, Default)]
pub struct AuthFunctionsPlugin {
    curators: Arc<RwLock<Vec<String>>>,
}

impl AuthFunctionsPlugin {
    /// Creates the plugin with no curators.
    pub fn new() -> Self {
        Self::default()
    }

    /// The configured curators.
    pub fn curators(&self) -> Vec<String> {
        self.curators
            .read()
            .map(|curators| curators.clone())
            .unwrap_or_default()
    }
}

impl Configurable for AuthFunctionsPlugin {
    fn configure(&self, settings: &Settings) -> AppResult<()> {
        let curators: Vec<String> = settings
            .get(CURATORS_SETTING)
            .map(|value| value.split_whitespace().map(str::to_string).collect())
            .unwrap_or_default();
        info!(plugin = NAME, curators = curators.len(), "Curators configured");

        let mut slot = self
            .curators
            .write()
            .map_err(|_| AppError::internal("Curator list lock poisoned"))?;
        *slot = curators;
        Ok(())
    }
}

impl AuthFunctions for AuthFunctionsPlugin {
    fn get_auth_functions(&self) -> IndexMap<String, AuthFunction> {
        let curators = Arc::clone(&self.curators);
        let mut functions = IndexMap::new();
        functions.insert(
            "group_create".to_string(),
            AuthFunction::new(move |ctx, _data| {
                let Some(user) = ctx.user.as_deref() else {
                    return AuthResult::deny("Anonymous users cannot create groups");
                };
                let is_curator = curators
                    .read()
                    .map(|curators| curators.iter().any(|c| c == user))
                    .unwrap_or(false);
                if is_curator {
                    AuthResult::allow()
                } else {
                    AuthResult::deny(&format!("User {user} not authorized to create groups"))
                }
            }),
        );
        functions
    }
}

/// Builds the plugin export.
pub fn export() -> AppResult<PluginExport> {
    let info = plugin_info!(
        name: NAME,
        version: "1.0.0",
        description: "Only curators may create groups",
        author: "DataHub"
    );
    Ok(plugin_export!(
        info,
        Arc::new(AuthFunctionsPlugin::new()),
        [AuthFunctions, Configurable]
    ))
}
