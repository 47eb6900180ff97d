//! Function table CLI commands.

use clap::{Args, Subcommand, ValueEnum};
use serde::Serialize;
use serde_json::Value;
use tabled::Tabled;

use datahub_core::config::AppConfig;
use datahub_core::result::AppResult;
use datahub_core::types::{Context, DataDict};
use datahub_plugin::FunctionTables;

use crate::output::{self, OutputFormat};

/// A function table
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TableKind {
    /// Logic-layer actions
    Actions,
    /// Schema validators
    Validators,
    /// Authorization functions
    Auth,
    /// Template helpers
    Helpers,
}

/// Arguments for function commands
#[derive(Debug, Args)]
pub struct FunctionsArgs {
    /// Function subcommand
    #[command(subcommand)]
    pub command: FunctionsCommand,
}

/// Function subcommands
#[derive(Debug, Subcommand)]
pub enum FunctionsCommand {
    /// List a function table with each entry's origin
    List {
        /// Table to list
        #[arg(value_enum)]
        table: TableKind,
    },
    /// Check whether a user may perform an action
    CheckAccess {
        /// Authorization function name, e.g. `group_create`
        action: String,
        /// Acting user; anonymous when omitted
        #[arg(short, long)]
        user: Option<String>,
        /// Treat the user as a sysadmin
        #[arg(long)]
        sysadmin: bool,
        /// Data dict passed to the function, as a JSON object
        #[arg(short, long, default_value = "{}")]
        data: String,
    },
    /// Call an action
    Call {
        /// Action name
        action: String,
        /// Acting user; anonymous when omitted
        #[arg(short, long)]
        user: Option<String>,
        /// Data dict passed to the action, as a JSON object
        #[arg(short, long, default_value = "{}")]
        data: String,
    },
    /// Call a template helper
    Helper {
        /// Helper name
        name: String,
        /// Helper arguments, each parsed as JSON or taken as a string
        args: Vec<String>,
    },
}

#[derive(Debug, Serialize, Tabled)]
struct FunctionRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Origin")]
    origin: String,
}

/// Execute function commands
pub fn execute(args: &FunctionsArgs, config: &AppConfig, format: OutputFormat) -> AppResult<()> {
    super::with_session(config, |session| {
        let tables = session.dispatcher.registry().functions();

        match &args.command {
            FunctionsCommand::List { table } => {
                output::print_list(&rows(tables, *table), format, "The table is empty.");
            }
            FunctionsCommand::CheckAccess {
                action,
                user,
                sysadmin,
                data,
            } => {
                let ctx = context(user.as_deref(), *sysadmin);
                match tables.check_access(action, &ctx, &parse_dict(data)?) {
                    Ok(()) => output::print_success(&format!("Access to '{action}' granted")),
                    Err(e) => output::print_warning(&format!("Access to '{action}' denied: {}", e.message)),
                }
            }
            FunctionsCommand::Call { action, user, data } => {
                let ctx = context(user.as_deref(), false);
                let result = tables.action(action)?.call(&ctx, &parse_dict(data)?)?;
                output::print_item(&result, format);
            }
            FunctionsCommand::Helper { name, args } => {
                let args: Vec<Value> = args
                    .iter()
                    .map(|arg| serde_json::from_str(arg).unwrap_or_else(|_| Value::String(arg.clone())))
                    .collect();
                let result = tables.call_helper(name, &args)?;
                output::print_item(&result, format);
            }
        }

        Ok(())
    })
}

fn rows(tables: &FunctionTables, kind: TableKind) -> Vec<FunctionRow> {
    let entries: Vec<(&str, String)> = match kind {
        TableKind::Actions => collect(tables.actions.entries()),
        TableKind::Validators => collect(tables.validators.entries()),
        TableKind::Auth => collect(tables.auth.entries()),
        TableKind::Helpers => collect(tables.helpers.entries()),
    };
    entries
        .into_iter()
        .map(|(name, origin)| FunctionRow {
            name: name.to_string(),
            origin,
        })
        .collect()
}

fn collect<'a>(
    entries: impl Iterator<Item = (&'a str, &'a datahub_plugin::Origin)>,
) -> Vec<(&'a str, String)> {
    entries.map(|(name, origin)| (name, origin.to_string())).collect()
}

fn context(user: Option<&str>, sysadmin: bool) -> Context {
    match user {
        Some(user) if sysadmin => Context::sysadmin(user),
        Some(user) => Context::for_user(user),
        None => Context::anonymous(),
    }
}

fn parse_dict(source: &str) -> AppResult<DataDict> {
    Ok(serde_json::from_str(source)?)
}
