//! Plugin inspection CLI commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use datahub_core::config::AppConfig;
use datahub_core::error::AppError;
use datahub_core::result::AppResult;
use datahub_plugin::Interface;

use crate::output::{self, OutputFormat};

/// Arguments for plugin commands
#[derive(Debug, Args)]
pub struct PluginsArgs {
    /// Plugin subcommand
    #[command(subcommand)]
    pub command: PluginsCommand,
}

/// Plugin subcommands
#[derive(Debug, Subcommand)]
pub enum PluginsCommand {
    /// List loaded plugins in load order
    List,
    /// List every plugin in the catalog and whether it is enabled
    Available,
    /// List the plugins implementing an interface, in dispatch order
    Providers {
        /// Interface name, e.g. `facets` or `dataset_form`
        interface: String,
    },
    /// Show the type routing table of a routed interface
    Routes {
        /// `dataset_form` or `group_form`
        #[arg(default_value = "dataset_form")]
        interface: String,
    },
    /// Resolve the plugin serving a type key
    Route {
        /// `dataset_form` or `group_form`
        interface: String,
        /// Dataset or group type
        type_key: String,
    },
}

#[derive(Debug, Serialize, Tabled)]
struct PluginRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Version")]
    version: String,
    #[tabled(rename = "Interfaces")]
    interfaces: String,
    #[tabled(rename = "Description")]
    description: String,
}

#[derive(Debug, Serialize, Tabled)]
struct CatalogRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Enabled")]
    enabled: bool,
    #[tabled(rename = "Position")]
    position: String,
}

#[derive(Debug, Serialize, Tabled)]
struct RouteRow {
    #[tabled(rename = "Type")]
    type_key: String,
    #[tabled(rename = "Plugin")]
    plugin: String,
}

/// Execute plugin commands
pub fn execute(args: &PluginsArgs, config: &AppConfig, format: OutputFormat) -> AppResult<()> {
    super::with_session(config, |session| {
        let registry = session.dispatcher.registry();

        match &args.command {
            PluginsCommand::List => {
                let rows: Vec<PluginRow> = registry
                    .plugins()
                    .map(|info| PluginRow {
                        name: info.name.clone(),
                        version: info.version.clone(),
                        interfaces: registry
                            .interfaces_of(&info.name)
                            .unwrap_or_default()
                            .iter()
                            .map(Interface::as_str)
                            .collect::<Vec<_>>()
                            .join(", "),
                        description: info.description.clone(),
                    })
                    .collect();
                output::print_list(&rows, format, "No plugins are loaded.");
            }
            PluginsCommand::Providers { interface } => {
                let interface: Interface = interface.parse()?;
                let providers: Vec<&str> = registry
                    .providers_of(interface)
                    .into_iter()
                    .map(|info| info.name.as_str())
                    .collect();
                if providers.is_empty() {
                    output::print_warning(&format!("No plugin implements '{interface}'"));
                } else {
                    output::print_item(&providers, format);
                }
            }
            PluginsCommand::Routes { interface } => {
                let interface: Interface = interface.parse()?;
                if !interface.is_type_routed() {
                    return Err(AppError::configuration(format!(
                        "Interface '{interface}' is not routed by type"
                    )));
                }
                let rows: Vec<RouteRow> = registry
                    .type_keys(interface)
                    .into_iter()
                    .map(|(type_key, plugin)| RouteRow {
                        type_key: type_key.to_string(),
                        plugin: plugin.to_string(),
                    })
                    .collect();
                output::print_list(&rows, format, "No type is claimed.");
                match registry.fallback_of(interface) {
                    Some(plugin) => output::print_kv("Fallback", plugin),
                    None => output::print_kv("Fallback", "built-in default"),
                }
            }
            PluginsCommand::Route { interface, type_key } => {
                let interface: Interface = interface.parse()?;
                let route = registry.route(interface, type_key)?;
                output::print_item(&route, format);
            }
            PluginsCommand::Available => {
                let catalog = plugin_examples::catalog()?;
                let rows: Vec<CatalogRow> = catalog
                    .names()
                    .map(|name| {
                        let position = registry.plugins().position(|info| info.name == name);
                        CatalogRow {
                            name: name.to_string(),
                            enabled: position.is_some(),
                            position: position.map(|p| (p + 1).to_string()).unwrap_or_default(),
                        }
                    })
                    .collect();
                output::print_list(&rows, format, "The catalog is empty.");
            }
        }

        Ok(())
    })
}
