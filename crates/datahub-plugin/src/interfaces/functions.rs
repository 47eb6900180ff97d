//! Interfaces that contribute named functions: actions, validators,
//! authorization functions, and template helpers.
//!
//! Each returns a name → function map once, at registration. The maps of
//! all plugins are merged into the registry's function tables.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use datahub_core::result::AppResult;
use datahub_core::types::{Context, DataDict};

/// Signature of a logic-layer action.
pub type ActionFn = Arc<dyn Fn(&Context, &DataDict) -> AppResult<Value> + Send + Sync>;

/// A logic-layer action.
#[derive(Clone)]
pub struct Action {
    /// The action body.
    pub function: ActionFn,
    /// Whether the action has no side effects and may be called via GET.
    pub side_effect_free: bool,
}

impl Action {
    /// Wraps a function as an action with side effects.
    pub fn new<F>(function: F) -> Self
    where
        F: Fn(&Context, &DataDict) -> AppResult<Value> + Send + Sync + 'static,
    {
        Self {
            function: Arc::new(function),
            side_effect_free: false,
        }
    }

    /// Marks the action as side-effect free.
    pub fn side_effect_free(mut self) -> Self {
        self.side_effect_free = true;
        self
    }

    /// Runs the action.
    pub fn call(&self, ctx: &Context, data: &DataDict) -> AppResult<Value> {
        (self.function)(ctx, data)
    }
}

impl fmt::Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Action")
            .field("side_effect_free", &self.side_effect_free)
            .finish()
    }
}

/// Adds or overrides logic-layer actions.
pub trait Actions: Send + Sync {
    /// Action name → action.
    fn get_actions(&self) -> IndexMap<String, Action> {
        IndexMap::new()
    }
}

/// Outcome of one validator on one field value.
#[derive(Debug, Clone, PartialEq)]
pub enum Validation {
    /// The (possibly converted) value; the next validator receives it.
    Value(Value),
    /// Drop the field and skip the remaining validators for it.
    Skip,
}

/// Signature of a validator. Missing fields are passed as `Value::Null`.
/// An `Err` is a message recorded against the field.
pub type ValidatorFn = Arc<dyn Fn(Value, &Context) -> Result<Validation, String> + Send + Sync>;

/// Adds or overrides validators available to schemas.
pub trait Validators: Send + Sync {
    /// Validator name → validator.
    fn get_validators(&self) -> IndexMap<String, ValidatorFn> {
        IndexMap::new()
    }
}

/// Result of an authorization function.
///
/// The default is a denial: an authorization function that does not
/// explicitly report success does not grant access.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthResult {
    /// Whether the action is allowed.
    #[serde(default)]
    pub success: bool,
    /// Reason for a denial.
    #[serde(default)]
    pub msg: Option<String>,
}

impl AuthResult {
    /// Allows the action.
    pub fn allow() -> Self {
        Self {
            success: true,
            msg: None,
        }
    }

    /// Denies the action with a reason.
    pub fn deny(msg: &str) -> Self {
        Self {
            success: false,
            msg: Some(msg.to_string()),
        }
    }
}

/// Signature of an authorization function.
pub type AuthFn = Arc<dyn Fn(&Context, &DataDict) -> AuthResult + Send + Sync>;

/// An authorization function.
#[derive(Clone)]
pub struct AuthFunction {
    /// The check.
    pub function: AuthFn,
    /// Whether anonymous callers reach the check at all. When `false`,
    /// anonymous requests are denied before the function runs.
    pub allow_anonymous: bool,
}

impl AuthFunction {
    /// Wraps a function as an authorization function that requires an
    /// authenticated user.
    pub fn new<F>(function: F) -> Self
    where
        F: Fn(&Context, &DataDict) -> AuthResult + Send + Sync + 'static,
    {
        Self {
            function: Arc::new(function),
            allow_anonymous: false,
        }
    }

    /// Lets anonymous callers reach this function.
    pub fn allow_anonymous(mut self) -> Self {
        self.allow_anonymous = true;
        self
    }
}

impl fmt::Debug for AuthFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthFunction")
            .field("allow_anonymous", &self.allow_anonymous)
            .finish()
    }
}

/// Adds or overrides authorization functions.
///
/// When an action is checked, the authorization function with the same
/// name decides. A plugin function with the name of a core function
/// replaces the core one.
pub trait AuthFunctions: Send + Sync {
    /// Function name → authorization function.
    fn get_auth_functions(&self) -> IndexMap<String, AuthFunction> {
        IndexMap::new()
    }
}

/// Signature of a template helper.
pub type HelperFn = Arc<dyn Fn(&[Value]) -> AppResult<Value> + Send + Sync>;

/// Adds template helper functions.
pub trait TemplateHelpers: Send + Sync {
    /// Helper name → helper. Names should start with the plugin's name.
    fn get_helpers(&self) -> IndexMap<String, HelperFn> {
        IndexMap::new()
    }
}
