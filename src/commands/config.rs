//! Configuration management CLI commands.

use clap::{Args, Subcommand};

use datahub_core::config::AppConfig;
use datahub_core::result::AppResult;

use crate::output::{self, OutputFormat};

/// Arguments for config commands
#[derive(Debug, Args)]
pub struct ConfigArgs {
    /// Config subcommand
    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Config subcommands
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show the merged configuration
    Show,
    /// Show the settings after every configurer plugin has run
    Settings,
    /// Load every enabled plugin and report whether the set is consistent
    Validate,
}

/// Execute config commands
pub fn execute(args: &ConfigArgs, config: &AppConfig, format: OutputFormat) -> AppResult<()> {
    match &args.command {
        ConfigCommand::Show => output::print_item(config, format),
        ConfigCommand::Settings => {
            super::with_session(config, |session| {
                output::print_item(&session.settings, format);
                Ok(())
            })?;
        }
        ConfigCommand::Validate => {
            let counts = super::with_session(config, |session| {
                let functions = session.dispatcher.registry().functions();
                Ok((functions.actions.len(), functions.auth.len()))
            });
            match counts {
                Ok((actions, auth)) => {
                    output::print_success("Configuration is valid");
                    output::print_kv("Plugins", &config.plugins.enabled.join(", "));
                    output::print_kv("Log level", &config.logging.level);
                    output::print_kv("Log format", &config.logging.format);
                    output::print_kv("Actions", &actions.to_string());
                    output::print_kv("Auth functions", &auth.to_string());
                }
                Err(e) => {
                    output::print_error(&format!("Configuration invalid: {e}"));
                    return Err(e);
                }
            }
        }
    }

    Ok(())
}
