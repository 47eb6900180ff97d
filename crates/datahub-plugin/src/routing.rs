//! Type-key routing for the dataset-form and group-form interfaces.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use serde::Serialize;

use datahub_core::error::AppError;

use crate::interfaces::Interface;

/// Which rule selected a route target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteMatch {
    /// A plugin claims the type key.
    Owner,
    /// Nobody claims the key; the fallback plugin was chosen.
    Fallback,
    /// Nobody claims the key and there is no fallback plugin.
    Default,
}

/// A resolved route: the plugin (if any) and the hook object to call.
pub struct Route<'a, H: ?Sized> {
    /// The owning or fallback plugin; `None` for the built-in default.
    pub plugin: Option<&'a str>,
    /// Which rule matched.
    pub matched: RouteMatch,
    /// The hook object.
    pub hook: &'a Arc<H>,
}

impl<'a, H: ?Sized> Route<'a, H> {
    /// The route without its hook object.
    pub fn info(&self) -> RouteInfo<'a> {
        RouteInfo {
            plugin: self.plugin,
            matched: self.matched,
        }
    }
}

/// A resolved route, untyped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RouteInfo<'a> {
    /// The owning or fallback plugin; `None` for the built-in default.
    pub plugin: Option<&'a str>,
    /// Which rule matched.
    pub matched: RouteMatch,
}

struct Claim<H: ?Sized> {
    plugin: String,
    hook: Arc<H>,
}

/// Type key → owning plugin, plus an optional fallback and the built-in
/// default used when neither applies.
pub struct RoutingTable<H: ?Sized> {
    interface: Interface,
    owners: IndexMap<String, Claim<H>>,
    fallback: Option<Claim<H>>,
    default: Arc<H>,
}

impl<H: ?Sized> RoutingTable<H> {
    /// Creates an empty table that routes everything to `default`.
    pub fn new(interface: Interface, default: Arc<H>) -> Self {
        Self {
            interface,
            owners: IndexMap::new(),
            fallback: None,
            default,
        }
    }

    /// Checks that `plugin` may claim `keys` (and the fallback slot, when
    /// `is_fallback`). Does not modify the table.
    pub fn check(&self, plugin: &str, keys: &[String], is_fallback: bool) -> Result<(), AppError> {
        for (i, key) in keys.iter().enumerate() {
            if let Some(owner) = self.owners.get(key) {
                return Err(AppError::configuration(format!(
                    "Plugin '{plugin}' claims {} type '{key}', which is already handled by plugin '{}'",
                    self.interface, owner.plugin
                )));
            }
            if keys[..i].contains(key) {
                return Err(AppError::configuration(format!(
                    "Plugin '{plugin}' claims {} type '{key}' more than once",
                    self.interface
                )));
            }
        }

        if is_fallback {
            if let Some(existing) = &self.fallback {
                return Err(AppError::configuration(format!(
                    "Plugin '{plugin}' cannot be the {} fallback: plugin '{}' already is",
                    self.interface, existing.plugin
                )));
            }
        }

        Ok(())
    }

    /// Records the claims of `plugin`. Callers run [`check`](Self::check)
    /// first.
    pub(crate) fn insert(&mut self, plugin: &str, hook: Arc<H>, keys: Vec<String>, is_fallback: bool) {
        for key in keys {
            self.owners.insert(
                key,
                Claim {
                    plugin: plugin.to_string(),
                    hook: Arc::clone(&hook),
                },
            );
        }
        if is_fallback {
            self.fallback = Some(Claim {
                plugin: plugin.to_string(),
                hook,
            });
        }
    }

    /// Resolves a type key: its owner, else the fallback, else the default.
    pub fn route(&self, type_key: &str) -> Route<'_, H> {
        if let Some(owner) = self.owners.get(type_key) {
            return Route {
                plugin: Some(&owner.plugin),
                matched: RouteMatch::Owner,
                hook: &owner.hook,
            };
        }
        match &self.fallback {
            Some(fallback) => Route {
                plugin: Some(&fallback.plugin),
                matched: RouteMatch::Fallback,
                hook: &fallback.hook,
            },
            None => Route {
                plugin: None,
                matched: RouteMatch::Default,
                hook: &self.default,
            },
        }
    }

    /// Claimed `(type key, plugin)` pairs in claim order.
    pub fn claims(&self) -> Vec<(&str, &str)> {
        self.owners
            .iter()
            .map(|(key, claim)| (key.as_str(), claim.plugin.as_str()))
            .collect()
    }

    /// The fallback plugin, if one is registered.
    pub fn fallback_plugin(&self) -> Option<&str> {
        self.fallback.as_ref().map(|claim| claim.plugin.as_str())
    }
}

impl<H: ?Sized> fmt::Debug for RoutingTable<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RoutingTable")
            .field("interface", &self.interface)
            .field("owners", &self.claims())
            .field("fallback", &self.fallback_plugin())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> RoutingTable<str> {
        RoutingTable::new(Interface::DatasetForm, Arc::from("default"))
    }

    fn keys(keys: &[&str]) -> Vec<String> {
        keys.iter().map(|k| k.to_string()).collect()
    }

    #[test]
    fn test_empty_table_routes_to_default() {
        let table = table();
        let route = table.route("dataset");
        assert_eq!(route.matched, RouteMatch::Default);
        assert_eq!(route.plugin, None);
        assert_eq!(&**route.hook, "default");
    }

    #[test]
    fn test_owner_then_fallback() {
        let mut table = table();
        table.insert("a", Arc::from("a-hook"), keys(&["dataset"]), false);
        table.insert("b", Arc::from("b-hook"), Vec::new(), true);

        let owned = table.route("dataset");
        assert_eq!(owned.plugin, Some("a"));
        assert_eq!(owned.matched, RouteMatch::Owner);

        let other = table.route("other");
        assert_eq!(other.plugin, Some("b"));
        assert_eq!(other.matched, RouteMatch::Fallback);
        assert_eq!(&**other.hook, "b-hook");
    }

    #[test]
    fn test_check_rejects_claimed_key() {
        let mut table = table();
        table.insert("a", Arc::from("a-hook"), keys(&["dataset"]), false);

        let err = table
            .check("b", &keys(&["harvest", "dataset"]), false)
            .unwrap_err();
        assert!(err.message.contains("'dataset'"));
        assert!(err.message.contains("'a'"));
    }

    #[test]
    fn test_check_rejects_repeated_key_in_one_claim() {
        let err = table()
            .check("a", &keys(&["dataset", "dataset"]), false)
            .unwrap_err();
        assert!(err.message.contains("more than once"));
    }

    #[test]
    fn test_check_rejects_second_fallback() {
        let mut table = table();
        table.insert("a", Arc::from("a-hook"), Vec::new(), true);
        assert!(table.check("b", &[], true).is_err());
        assert!(table.check("b", &[], false).is_ok());
    }
}
