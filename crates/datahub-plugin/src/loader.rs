//! Plugin catalog: resolves configured plugin names to plugin exports.
//!
//! Plugins are compiled in. Each crate providing plugins registers a
//! factory per plugin name, and the configuration picks which names load
//! and in what order.

use std::fmt;

use indexmap::IndexMap;

use datahub_core::error::AppError;
use datahub_core::result::AppResult;

use crate::exports::PluginExport;

/// Builds a plugin's export.
pub type PluginFactory = Box<dyn Fn() -> AppResult<PluginExport> + Send + Sync>;

/// Name → factory of every plugin that can be loaded.
#[derive(Default)]
pub struct PluginCatalog {
    factories: IndexMap<String, PluginFactory>,
}

impl PluginCatalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a plugin factory under `name`.
    pub fn register<F>(&mut self, name: &str, factory: F) -> AppResult<()>
    where
        F: Fn() -> AppResult<PluginExport> + Send + Sync + 'static,
    {
        if self.factories.contains_key(name) {
            return Err(AppError::configuration(format!(
                "Plugin '{name}' is already in the catalog"
            )));
        }
        self.factories.insert(name.to_string(), Box::new(factory));
        Ok(())
    }

    /// Merges another catalog into this one.
    pub fn extend(&mut self, other: PluginCatalog) -> AppResult<()> {
        for (name, factory) in other.factories {
            if self.factories.contains_key(&name) {
                return Err(AppError::configuration(format!(
                    "Plugin '{name}' is already in the catalog"
                )));
            }
            self.factories.insert(name, factory);
        }
        Ok(())
    }

    /// Builds the export of the named plugin.
    pub fn create(&self, name: &str) -> AppResult<PluginExport> {
        let factory = self.factories.get(name).ok_or_else(|| {
            AppError::configuration(format!("Plugin '{name}' not found in the plugin catalog"))
        })?;

        let export = factory()?;
        if export.info.name != name {
            return Err(AppError::configuration(format!(
                "Plugin factory '{name}' built a plugin named '{}'",
                export.info.name
            )));
        }
        Ok(export)
    }

    /// Catalog names, in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }

    /// Returns whether the catalog knows the name.
    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Number of catalog entries.
    pub fn len(&self) -> usize {
        self.factories.len()
    }

    /// Returns whether the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

impl fmt::Debug for PluginCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PluginCatalog")
            .field("plugins", &self.factories.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::PluginInfo;
    use datahub_core::error::ErrorKind;

    #[test]
    fn test_unknown_name_is_configuration_error() {
        let catalog = PluginCatalog::new();
        let err = catalog.create("missing").unwrap_err();
        assert!(err.is(ErrorKind::Configuration));
    }

    #[test]
    fn test_factory_name_must_match() {
        let mut catalog = PluginCatalog::new();
        catalog
            .register("a", || Ok(PluginExport::new(PluginInfo::new("b", "1.0.0"))))
            .expect("register");
        assert!(catalog.create("a").is_err());
    }

    #[test]
    fn test_duplicate_catalog_entry_rejected() {
        let mut catalog = PluginCatalog::new();
        let factory = || Ok(PluginExport::new(PluginInfo::new("a", "1.0.0")));
        catalog.register("a", factory).expect("first");
        assert!(catalog.register("a", factory).is_err());
        assert_eq!(catalog.names().collect::<Vec<_>>(), vec!["a"]);
    }
}
