//! Name → function tables merged from the actions, validators,
//! authorization-functions, and template-helpers interfaces.

use std::fmt;

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use datahub_core::error::AppError;
use datahub_core::result::AppResult;
use datahub_core::types::{Context, DataDict};

use crate::interfaces::{
    Action, Actions, AuthFunction, AuthFunctions, Capability, HelperFn, Hook, TemplateHelpers,
    ValidatorFn, Validators,
};
use crate::schema;

/// Where a table entry came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Origin {
    /// Built into the core.
    Core,
    /// Contributed by the named plugin.
    Plugin(String),
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Core => write!(f, "core"),
            Self::Plugin(name) => write!(f, "{name}"),
        }
    }
}

struct Entry<F> {
    function: F,
    origin: Origin,
}

/// One name → function table.
///
/// A plugin entry replaces a core entry of the same name. Two plugins may
/// not contribute the same name.
pub struct FunctionTable<F> {
    kind: &'static str,
    entries: IndexMap<String, Entry<F>>,
}

impl<F> FunctionTable<F> {
    /// Creates an empty table. `kind` names the table in errors and logs.
    pub fn new(kind: &'static str) -> Self {
        Self {
            kind,
            entries: IndexMap::new(),
        }
    }

    /// Creates a table holding the given core functions.
    pub fn with_core(kind: &'static str, functions: IndexMap<String, F>) -> Self {
        let mut table = Self::new(kind);
        for (name, function) in functions {
            table.insert_core(&name, function);
        }
        table
    }

    /// Adds a core function. A plugin entry of the same name is kept.
    pub fn insert_core(&mut self, name: &str, function: F) {
        if let Some(Origin::Plugin(plugin)) = self.origin(name) {
            debug!(kind = self.kind, name = %name, plugin = %plugin, "Core function already overridden");
            return;
        }
        self.entries.insert(
            name.to_string(),
            Entry {
                function,
                origin: Origin::Core,
            },
        );
    }

    /// Checks that `plugin` may contribute `names`. Does not modify the
    /// table.
    pub fn check<'a>(&self, plugin: &str, names: impl IntoIterator<Item = &'a str>) -> AppResult<()> {
        for name in names {
            if let Some(Origin::Plugin(owner)) = self.origin(name) {
                return Err(AppError::configuration(format!(
                    "The {} '{name}' is provided by both plugin '{owner}' and plugin '{plugin}'",
                    self.kind
                )));
            }
        }
        Ok(())
    }

    /// Adds the functions of `plugin`. Callers run [`check`](Self::check)
    /// first.
    pub(crate) fn merge(&mut self, plugin: &str, functions: IndexMap<String, F>) {
        for (name, function) in functions {
            if matches!(self.origin(&name), Some(Origin::Core)) {
                warn!(kind = self.kind, name = %name, plugin = %plugin, "Plugin overrides core function");
            }
            self.entries.insert(
                name,
                Entry {
                    function,
                    origin: Origin::Plugin(plugin.to_string()),
                },
            );
        }
    }

    /// Looks up a function by name.
    pub fn get(&self, name: &str) -> Option<&F> {
        self.entries.get(name).map(|entry| &entry.function)
    }

    /// Where the named function came from.
    pub fn origin(&self, name: &str) -> Option<&Origin> {
        self.entries.get(name).map(|entry| &entry.origin)
    }

    /// `(name, origin)` of every entry in insertion order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &Origin)> {
        self.entries
            .iter()
            .map(|(name, entry)| (name.as_str(), &entry.origin))
    }

    /// Returns whether a function of that name exists.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The table's kind, e.g. `action`.
    pub fn kind(&self) -> &'static str {
        self.kind
    }
}

impl<F> fmt::Debug for FunctionTable<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.entries.iter().map(|(name, entry)| (name, &entry.origin)))
            .finish()
    }
}

/// Functions one plugin contributes, collected from its capabilities.
#[derive(Default)]
pub(crate) struct Contributions {
    actions: IndexMap<String, Action>,
    validators: IndexMap<String, ValidatorFn>,
    auth: IndexMap<String, AuthFunction>,
    helpers: IndexMap<String, HelperFn>,
}

impl Contributions {
    pub(crate) fn collect(capabilities: &[Capability]) -> Self {
        let mut contributions = Self::default();
        for capability in capabilities {
            if let Some(hook) = <dyn Actions>::from_capability(capability) {
                contributions.actions.extend(hook.get_actions());
            }
            if let Some(hook) = <dyn Validators>::from_capability(capability) {
                contributions.validators.extend(hook.get_validators());
            }
            if let Some(hook) = <dyn AuthFunctions>::from_capability(capability) {
                contributions.auth.extend(hook.get_auth_functions());
            }
            if let Some(hook) = <dyn TemplateHelpers>::from_capability(capability) {
                contributions.helpers.extend(hook.get_helpers());
            }
        }
        contributions
    }
}

/// The merged action, validator, authorization, and helper tables.
#[derive(Debug)]
pub struct FunctionTables {
    /// Logic-layer actions.
    pub actions: FunctionTable<Action>,
    /// Validators available to schemas.
    pub validators: FunctionTable<ValidatorFn>,
    /// Authorization functions, by the name of the action they guard.
    pub auth: FunctionTable<AuthFunction>,
    /// Template helpers.
    pub helpers: FunctionTable<HelperFn>,
}

impl FunctionTables {
    /// Tables holding only the core validators.
    pub fn new() -> Self {
        Self {
            actions: FunctionTable::new("action"),
            validators: FunctionTable::with_core("validator", schema::core_validators()),
            auth: FunctionTable::new("auth function"),
            helpers: FunctionTable::new("template helper"),
        }
    }

    pub(crate) fn check(&self, plugin: &str, contributions: &Contributions) -> AppResult<()> {
        self.actions
            .check(plugin, contributions.actions.keys().map(String::as_str))?;
        self.validators
            .check(plugin, contributions.validators.keys().map(String::as_str))?;
        self.auth
            .check(plugin, contributions.auth.keys().map(String::as_str))?;
        self.helpers
            .check(plugin, contributions.helpers.keys().map(String::as_str))
    }

    pub(crate) fn merge(&mut self, plugin: &str, contributions: Contributions) {
        self.actions.merge(plugin, contributions.actions);
        self.validators.merge(plugin, contributions.validators);
        self.auth.merge(plugin, contributions.auth);
        self.helpers.merge(plugin, contributions.helpers);
    }

    /// Checks whether the caller in `ctx` may perform `action`.
    ///
    /// Access is denied unless an authorization function for the action
    /// exists and reports success. Anonymous callers are denied without
    /// running the function unless it allows anonymous access. Sysadmins
    /// pass any action that has an authorization function.
    pub fn check_access(&self, action: &str, ctx: &Context, data: &DataDict) -> AppResult<()> {
        let Some(auth) = self.auth.get(action) else {
            return Err(AppError::authorization(format!(
                "Authorization function not found: {action}"
            )));
        };

        if ctx.is_sysadmin {
            return Ok(());
        }

        if ctx.is_anonymous() && !auth.allow_anonymous {
            return Err(AppError::authorization(format!(
                "Action {action} requires an authenticated user"
            )));
        }

        let result = (auth.function)(ctx, data);
        if result.success {
            Ok(())
        } else {
            debug!(action = %action, user = ?ctx.user, "Access denied");
            Err(AppError::authorization(result.msg.unwrap_or_else(|| {
                format!("User not authorized to perform {action}")
            })))
        }
    }

    /// Looks up an action.
    pub fn action(&self, name: &str) -> AppResult<&Action> {
        self.actions
            .get(name)
            .ok_or_else(|| AppError::not_found(format!("Action '{name}' not found")))
    }

    /// Looks up a validator.
    pub fn validator(&self, name: &str) -> AppResult<&ValidatorFn> {
        self.validators
            .get(name)
            .ok_or_else(|| AppError::not_found(format!("Validator '{name}' not found")))
    }

    /// Calls a template helper.
    pub fn call_helper(&self, name: &str, args: &[Value]) -> AppResult<Value> {
        let helper = self
            .helpers
            .get(name)
            .ok_or_else(|| AppError::not_found(format!("Template helper '{name}' not found")))?;
        helper(args)
    }
}

impl Default for FunctionTables {
    fn default() -> Self {
        Self::new()
    }
}
