//! Request-scoped context passed to hooks.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::dict::DataDict;

/// Context of the request a hook is running for.
///
/// Carries the acting user and whatever request-scoped values the request
/// layer wants to thread through. Hooks may read it; the dispatcher passes
/// it along untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Context {
    /// Name of the authenticated user, `None` for anonymous requests.
    pub user: Option<String>,
    /// Whether the authenticated user is a sysadmin.
    #[serde(default)]
    pub is_sysadmin: bool,
    /// Additional request-scoped values.
    #[serde(default)]
    pub extras: DataDict,
}

impl Context {
    /// Context for an anonymous request.
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Context for a request made by the given user.
    pub fn for_user(user: impl Into<String>) -> Self {
        Self {
            user: Some(user.into()),
            ..Self::default()
        }
    }

    /// Context for a request made by a sysadmin.
    pub fn sysadmin(user: impl Into<String>) -> Self {
        Self {
            user: Some(user.into()),
            is_sysadmin: true,
            extras: DataDict::new(),
        }
    }

    /// Sets an extra value.
    pub fn with_extra(mut self, key: &str, value: Value) -> Self {
        self.extras.insert(key.to_string(), value);
        self
    }

    /// Gets an extra value by key.
    pub fn extra(&self, key: &str) -> Option<&Value> {
        self.extras.get(key)
    }

    /// Returns whether no user is attached to this request.
    pub fn is_anonymous(&self) -> bool {
        self.user.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_anonymous() {
        let ctx = Context::anonymous();
        assert!(ctx.is_anonymous());
        assert!(!ctx.is_sysadmin);
    }

    #[test]
    fn test_extras() {
        let ctx = Context::for_user("alice").with_extra("api_version", json!(3));
        assert_eq!(ctx.user.as_deref(), Some("alice"));
        assert_eq!(ctx.extra("api_version"), Some(&json!(3)));
        assert!(ctx.extra("missing").is_none());
    }
}
