//! Capability registry: which plugin implements which interface.
//!
//! The registry is built once at startup through `&mut self` and then
//! frozen behind an `Arc`, after which every lookup is a plain read.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use datahub_core::error::AppError;
use datahub_core::result::AppResult;

use crate::defaults::{DefaultDatasetForm, DefaultGroupForm};
use crate::exports::PluginExport;
use crate::interfaces::{Capability, DatasetForm, GroupForm, Hook, Interface};
use crate::routing::{Route, RouteInfo, RoutingTable};
use crate::tables::{Contributions, FunctionTables};

/// Metadata about a registered plugin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginInfo {
    /// Unique plugin name, as listed in the configuration.
    pub name: String,
    /// Plugin version string.
    pub version: String,
    /// Plugin description.
    #[serde(default)]
    pub description: String,
    /// Author or maintainer.
    #[serde(default)]
    pub author: String,
}

impl PluginInfo {
    /// Metadata with just a name and version.
    pub fn new(name: &str, version: &str) -> Self {
        Self {
            name: name.to_string(),
            version: version.to_string(),
            description: String::new(),
            author: String::new(),
        }
    }
}

#[derive(Debug)]
struct RegisteredPlugin {
    info: PluginInfo,
    interfaces: Vec<Interface>,
}

#[derive(Debug)]
struct Provider {
    /// Index into `PluginRegistry::plugins`.
    plugin: usize,
    capability: Capability,
}

/// One plugin's implementation of the interface `H` stands for.
pub struct Implementation<'a, H: ?Sized> {
    /// The implementing plugin.
    pub plugin: &'a PluginInfo,
    /// Its hook object.
    pub hook: &'a Arc<H>,
}

/// Registry of plugins and the interfaces they implement.
pub struct PluginRegistry {
    /// Registered plugins, in registration order.
    plugins: Vec<RegisteredPlugin>,
    /// Interface → providers, in registration order.
    providers: HashMap<Interface, Vec<Provider>>,
    dataset_forms: RoutingTable<dyn DatasetForm>,
    group_forms: RoutingTable<dyn GroupForm>,
    functions: FunctionTables,
}

impl PluginRegistry {
    /// Creates an empty registry with the default forms and core functions.
    pub fn new() -> Self {
        Self::with_core_functions(FunctionTables::new())
    }

    /// Creates an empty registry over the given core function tables.
    pub fn with_core_functions(functions: FunctionTables) -> Self {
        Self {
            plugins: Vec::new(),
            providers: HashMap::new(),
            dataset_forms: RoutingTable::new(Interface::DatasetForm, Arc::new(DefaultDatasetForm)),
            group_forms: RoutingTable::new(Interface::GroupForm, Arc::new(DefaultGroupForm)),
            functions,
        }
    }

    /// Registers a plugin and its declared capabilities.
    ///
    /// Everything is checked before anything is recorded, so a rejected
    /// plugin leaves the registry exactly as it was.
    pub fn register(&mut self, export: PluginExport) -> AppResult<()> {
        let PluginExport { info, capabilities } = export;
        let name = info.name.clone();

        if self.contains(&name) {
            return Err(AppError::configuration(format!(
                "Plugin '{name}' is already registered"
            )));
        }

        let mut interfaces = Vec::with_capacity(capabilities.len());
        for capability in &capabilities {
            let interface = capability.interface();
            if interfaces.contains(&interface) {
                return Err(AppError::configuration(format!(
                    "Plugin '{name}' declares interface '{interface}' more than once"
                )));
            }
            interfaces.push(interface);
        }

        let dataset_claim = capabilities
            .iter()
            .find_map(<dyn DatasetForm>::from_capability)
            .map(|form| (Arc::clone(form), form.package_types(), form.is_fallback()));
        if let Some((_, keys, is_fallback)) = &dataset_claim {
            self.dataset_forms.check(&name, keys, *is_fallback)?;
        }

        let group_claim = capabilities
            .iter()
            .find_map(<dyn GroupForm>::from_capability)
            .map(|form| (Arc::clone(form), form.group_types(), form.is_fallback()));
        if let Some((_, keys, is_fallback)) = &group_claim {
            self.group_forms.check(&name, keys, *is_fallback)?;
        }

        let contributions = Contributions::collect(&capabilities);
        self.functions.check(&name, &contributions)?;

        // Nothing below can fail.
        if let Some((form, keys, is_fallback)) = dataset_claim {
            self.dataset_forms.insert(&name, form, keys, is_fallback);
        }
        if let Some((form, keys, is_fallback)) = group_claim {
            self.group_forms.insert(&name, form, keys, is_fallback);
        }
        self.functions.merge(&name, contributions);

        let index = self.plugins.len();
        for capability in capabilities {
            debug!(plugin = %name, interface = %capability.interface(), "Registering capability");
            self.providers
                .entry(capability.interface())
                .or_default()
                .push(Provider {
                    plugin: index,
                    capability,
                });
        }

        info!(
            plugin = %name,
            version = %info.version,
            interfaces = interfaces.len(),
            "Plugin registered"
        );

        self.plugins.push(RegisteredPlugin { info, interfaces });
        Ok(())
    }

    /// Plugins implementing `interface`, in registration order.
    pub fn providers_of(&self, interface: Interface) -> Vec<&PluginInfo> {
        self.providers
            .get(&interface)
            .map(|providers| {
                providers
                    .iter()
                    .map(|provider| &self.plugins[provider.plugin].info)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// The hook objects of one interface, in registration order.
    ///
    /// ```rust,ignore
    /// for facets in registry.implementations::<dyn Facets>() {
    ///     current = facets.hook.dataset_facets(current, "dataset")?;
    /// }
    /// ```
    pub fn implementations<H: Hook + ?Sized>(&self) -> impl Iterator<Item = Implementation<'_, H>> {
        self.providers
            .get(&H::INTERFACE)
            .into_iter()
            .flatten()
            .filter_map(move |provider| {
                H::from_capability(&provider.capability).map(|hook| Implementation {
                    plugin: &self.plugins[provider.plugin].info,
                    hook,
                })
            })
    }

    /// Returns whether any plugin implements `interface`.
    pub fn is_implemented(&self, interface: Interface) -> bool {
        self.providers
            .get(&interface)
            .is_some_and(|providers| !providers.is_empty())
    }

    /// Registered plugins, in registration order.
    pub fn plugins(&self) -> impl Iterator<Item = &PluginInfo> {
        self.plugins.iter().map(|plugin| &plugin.info)
    }

    /// Looks up a plugin by name.
    pub fn plugin(&self, name: &str) -> Option<&PluginInfo> {
        self.plugins
            .iter()
            .find(|plugin| plugin.info.name == name)
            .map(|plugin| &plugin.info)
    }

    /// Interfaces the named plugin declared, in declaration order.
    pub fn interfaces_of(&self, name: &str) -> Option<&[Interface]> {
        self.plugins
            .iter()
            .find(|plugin| plugin.info.name == name)
            .map(|plugin| plugin.interfaces.as_slice())
    }

    /// Returns whether a plugin of that name is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.plugin(name).is_some()
    }

    /// Number of registered plugins.
    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    /// Returns whether no plugin is registered.
    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }

    /// Resolves which plugin serves `type_key` on a type-routed interface.
    pub fn route(&self, interface: Interface, type_key: &str) -> AppResult<RouteInfo<'_>> {
        match interface {
            Interface::DatasetForm => Ok(self.dataset_form(type_key).info()),
            Interface::GroupForm => Ok(self.group_form(type_key).info()),
            other => Err(AppError::configuration(format!(
                "Interface '{other}' is not routed by type"
            ))),
        }
    }

    /// The dataset form serving `package_type`.
    pub fn dataset_form(&self, package_type: &str) -> Route<'_, dyn DatasetForm> {
        self.dataset_forms.route(package_type)
    }

    /// The group form serving `group_type`.
    pub fn group_form(&self, group_type: &str) -> Route<'_, dyn GroupForm> {
        self.group_forms.route(group_type)
    }

    /// Claimed `(type key, plugin)` pairs of a type-routed interface.
    pub fn type_keys(&self, interface: Interface) -> Vec<(&str, &str)> {
        match interface {
            Interface::DatasetForm => self.dataset_forms.claims(),
            Interface::GroupForm => self.group_forms.claims(),
            _ => Vec::new(),
        }
    }

    /// The fallback plugin of a type-routed interface.
    pub fn fallback_of(&self, interface: Interface) -> Option<&str> {
        match interface {
            Interface::DatasetForm => self.dataset_forms.fallback_plugin(),
            Interface::GroupForm => self.group_forms.fallback_plugin(),
            _ => None,
        }
    }

    /// The merged function tables.
    pub fn functions(&self) -> &FunctionTables {
        &self.functions
    }

    /// Mutable access to the function tables, for adding core functions
    /// while the registry is being built.
    pub fn functions_mut(&mut self) -> &mut FunctionTables {
        &mut self.functions
    }
}

impl Default for PluginRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for PluginRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PluginRegistry")
            .field("plugins", &self.plugins)
            .field("dataset_forms", &self.dataset_forms)
            .field("group_forms", &self.group_forms)
            .field("functions", &self.functions)
            .finish()
    }
}
