//! Export bundles: a plugin's metadata plus the capabilities it declares.

use std::sync::Arc;

use crate::interfaces::{Capability, Hook, Interface};
use crate::registry::PluginInfo;

/// A plugin ready for registration.
///
/// The capability list is the plugin's complete, explicit set of
/// implemented interfaces. Implementing a trait without listing it here
/// does not make the plugin a provider.
#[derive(Debug, Clone)]
pub struct PluginExport {
    /// Plugin metadata.
    pub info: PluginInfo,
    /// Declared interface implementations, in declaration order.
    pub capabilities: Vec<Capability>,
}

impl PluginExport {
    /// Creates an export with no capabilities.
    pub fn new(info: PluginInfo) -> Self {
        Self {
            info,
            capabilities: Vec::new(),
        }
    }

    /// Declares an implementation of the interface `H` stands for.
    ///
    /// ```rust,ignore
    /// let plugin = Arc::new(MyPlugin);
    /// PluginExport::new(info)
    ///     .implements::<dyn Facets>(plugin.clone())
    ///     .implements::<dyn DatasetForm>(plugin);
    /// ```
    pub fn implements<H: Hook + ?Sized>(self, hook: Arc<H>) -> Self {
        self.with_capability(H::into_capability(hook))
    }

    /// Adds a capability.
    pub fn with_capability(mut self, capability: Capability) -> Self {
        self.capabilities.push(capability);
        self
    }

    /// The declared interfaces, in declaration order.
    pub fn interfaces(&self) -> Vec<Interface> {
        self.capabilities.iter().map(Capability::interface).collect()
    }

    /// The plugin name.
    pub fn name(&self) -> &str {
        &self.info.name
    }
}
