//! CLI command definitions and dispatch.

pub mod config;
pub mod facets;
pub mod functions;
pub mod plugins;

use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::info;

use datahub_core::config::AppConfig;
use datahub_core::result::AppResult;
use datahub_core::types::Settings;
use datahub_plugin::{HookDispatcher, PluginCatalog, bootstrap, global, unload_all};

use crate::output::OutputFormat;

/// DataHub plugin registry administration
#[derive(Debug, Parser)]
#[command(name = "datahub", version, about, long_about = None)]
pub struct Cli {
    /// Configuration environment; `config/{env}.toml` overlays the defaults
    #[arg(short, long, env = "DATAHUB_ENV", default_value = "development")]
    pub env: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Inspect loaded plugins, interface providers and type routing
    Plugins(plugins::PluginsArgs),
    /// Show the search facets after every facets plugin has run
    Facets(facets::FacetsArgs),
    /// Inspect function tables, check access and call template helpers
    Functions(functions::FunctionsArgs),
    /// Configuration management
    Config(config::ConfigArgs),
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(&self, config: AppConfig) -> AppResult<()> {
        match &self.command {
            Commands::Plugins(args) => plugins::execute(args, &config, self.format),
            Commands::Facets(args) => facets::execute(args, &config, self.format),
            Commands::Functions(args) => functions::execute(args, &config, self.format),
            Commands::Config(args) => config::execute(args, &config, self.format),
        }
    }
}

/// The configured plugin set, installed as the process-wide registry.
pub struct Session {
    /// Dispatcher over the installed registry.
    pub dispatcher: HookDispatcher,
    /// Settings after every configurer has run.
    pub settings: Settings,
    closed: bool,
}

impl Session {
    /// Unloads every plugin and uninstalls the registry.
    ///
    /// The registry is uninstalled even when an unload observer fails; the
    /// first failure is returned.
    pub fn close(mut self) -> AppResult<()> {
        self.closed = true;
        let unloaded = unload_all(self.dispatcher.registry());
        global::reset();
        unloaded
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        if self.closed {
            return;
        }
        if let Err(e) = unload_all(self.dispatcher.registry()) {
            tracing::warn!(error = %e, "Plugin unload failed");
        }
        global::reset();
    }
}

/// Helper: load the configured plugins and install the registry
pub fn start_session(config: &AppConfig) -> AppResult<Session> {
    open_session(&plugin_examples::catalog()?, config)
}

fn open_session(catalog: &PluginCatalog, config: &AppConfig) -> AppResult<Session> {
    let loaded = bootstrap(catalog, config)?;
    global::install(Arc::clone(&loaded.registry))?;
    info!(plugins = loaded.registry.len(), "Plugin registry ready");

    Ok(Session {
        dispatcher: HookDispatcher::current()?,
        settings: loaded.settings,
        closed: false,
    })
}

/// Helper: run `command` against a fresh session, then close it.
///
/// A command error takes precedence over an unload error.
pub fn with_session<T>(
    config: &AppConfig,
    command: impl FnOnce(&Session) -> AppResult<T>,
) -> AppResult<T> {
    let session = start_session(config)?;
    let result = command(&session);
    let closed = session.close();
    result.and_then(|value| closed.map(|()| value))
}
