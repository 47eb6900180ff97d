//! Hook interfaces plugins implement, and the explicit capability set a
//! plugin declares when it is exported.
//!
//! Every interface is an object-safe trait whose methods have no-op or
//! identity defaults, so a plugin only overrides what it cares about. A
//! plugin does not become a provider of an interface by implementing the
//! trait; it must list the interface in its [`PluginExport`] as a
//! [`Capability`].
//!
//! [`PluginExport`]: crate::exports::PluginExport

pub mod config;
pub mod controllers;
pub mod facets;
pub mod forms;
pub mod functions;
pub mod orm;
pub mod views;
pub mod web;

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use datahub_core::error::AppError;

pub use self::config::{Configurable, Configurer, PluginObserver};
pub use self::controllers::{
    GroupController, OrganizationController, PackageController, ResourceController,
    RoleAssignment, SearchResults, TagController,
};
pub use self::facets::Facets;
pub use self::forms::{DatasetForm, GroupForm, ValidationOutcome};
pub use self::functions::{
    Action, ActionFn, Actions, AuthFn, AuthFunction, AuthFunctions, AuthResult, HelperFn,
    TemplateHelpers, Validation, ValidatorFn, Validators,
};
pub use self::orm::{
    DomainObjectModification, DomainOperation, Mapper, RecordEvent, ResourceUrlChange, Session,
    SessionEvent,
};
pub use self::views::{PreviewSupport, ResourcePreview, ResourceView, ViewInfo};
pub use self::web::{
    AbortResponse, App, Application, Authenticator, Middleware, RouteEntry, RouteMap, Routes,
    StreamFilter,
};

/// Binds an interface trait object type to its [`Interface`] identity and
/// its [`Capability`] variant.
///
/// Implemented for `dyn Trait` of every hook trait, which lets the
/// registry hand out typed, ordered views such as
/// `registry.implementations::<dyn Facets>()`.
pub trait Hook: Send + Sync + 'static {
    /// The interface this trait object type stands for.
    const INTERFACE: Interface;

    /// Extracts the hook object if the capability belongs to this interface.
    fn from_capability(capability: &Capability) -> Option<&Arc<Self>>;

    /// Wraps a hook object into its capability.
    fn into_capability(hook: Arc<Self>) -> Capability;
}

macro_rules! interfaces {
    (
        $(
            $(#[$meta:meta])*
            $variant:ident => $name:literal, $hook:ident;
        )*
    ) => {
        /// Identity of a hook interface.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum Interface {
            $(
                $(#[$meta])*
                $variant,
            )*
        }

        impl Interface {
            /// Every interface, in declaration order.
            pub const ALL: &'static [Interface] = &[$(Interface::$variant),*];

            /// Returns the stable name of this interface.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $name,)*
                }
            }
        }

        impl FromStr for Interface {
            type Err = AppError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($name => Ok(Self::$variant),)*
                    other => Err(AppError::configuration(format!(
                        "Unknown plugin interface '{other}'"
                    ))),
                }
            }
        }

        /// One interface implementation a plugin declares.
        #[derive(Clone)]
        pub enum Capability {
            $(
                $(#[$meta])*
                $variant(Arc<dyn $hook>),
            )*
        }

        impl Capability {
            /// Returns the interface this capability implements.
            pub fn interface(&self) -> Interface {
                match self {
                    $(Self::$variant(_) => Interface::$variant,)*
                }
            }
        }

        $(
            impl Hook for dyn $hook {
                const INTERFACE: Interface = Interface::$variant;

                fn from_capability(capability: &Capability) -> Option<&Arc<Self>> {
                    match capability {
                        Capability::$variant(hook) => Some(hook),
                        _ => None,
                    }
                }

                fn into_capability(hook: Arc<Self>) -> Capability {
                    Capability::$variant(hook)
                }
            }
        )*
    };
}

interfaces! {
    /// Wraps the web application in middleware.
    Middleware => "middleware", Middleware;
    /// Rewrites rendered template streams.
    StreamFilter => "stream_filter", StreamFilter;
    /// Adds URL routes before and after the core map.
    Routes => "routes", Routes;
    /// Observes record insert/update/delete in the persistence layer.
    Mapper => "mapper", Mapper;
    /// Observes database session and transaction events.
    Session => "session", Session;
    /// Receives notification of new, changed, and deleted domain objects.
    DomainObjectModification => "domain_object_modification", DomainObjectModification;
    /// Receives notification of changed resource URLs.
    ResourceUrlChange => "resource_url_change", ResourceUrlChange;
    /// Provides a custom data view for resources.
    ResourceView => "resource_view", ResourceView;
    /// Provides a resource preview.
    ResourcePreview => "resource_preview", ResourcePreview;
    /// Hooks into tag display.
    TagController => "tag_controller", TagController;
    /// Hooks into group CRUD and display.
    GroupController => "group_controller", GroupController;
    /// Hooks into organization CRUD and display.
    OrganizationController => "organization_controller", OrganizationController;
    /// Hooks into dataset CRUD, search, indexing, and display.
    PackageController => "package_controller", PackageController;
    /// Hooks into resource CRUD and display.
    ResourceController => "resource_controller", ResourceController;
    /// Observes plugins being loaded and unloaded.
    PluginObserver => "plugin_observer", PluginObserver;
    /// Receives the final configuration.
    Configurable => "configurable", Configurable;
    /// Updates the configuration before it is final.
    Configurer => "configurer", Configurer;
    /// Adds or overrides logic-layer actions.
    Actions => "actions", Actions;
    /// Adds or overrides validators.
    Validators => "validators", Validators;
    /// Adds or overrides authorization functions.
    AuthFunctions => "auth_functions", AuthFunctions;
    /// Adds template helper functions.
    TemplateHelpers => "template_helpers", TemplateHelpers;
    /// Customizes dataset schemas and forms for a set of dataset types.
    DatasetForm => "dataset_form", DatasetForm;
    /// Customizes group and organization schemas and forms for a set of group types.
    GroupForm => "group_form", GroupForm;
    /// Customizes the search facets shown on search pages.
    Facets => "facets", Facets;
    /// Integrates custom authentication.
    Authenticator => "authenticator", Authenticator;
}

impl Interface {
    /// Returns whether the interface routes requests to a single owner by type key.
    pub fn is_type_routed(&self) -> bool {
        matches!(self, Self::DatasetForm | Self::GroupForm)
    }
}

impl fmt::Display for Interface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Debug for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Capability")
            .field(&self.interface().as_str())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_round_trip() {
        for interface in Interface::ALL {
            let parsed: Interface = interface.as_str().parse().expect("known name");
            assert_eq!(parsed, *interface);
        }
    }

    #[test]
    fn test_serde_name_matches_as_str() {
        let json = serde_json::to_string(&Interface::DomainObjectModification).expect("serialize");
        assert_eq!(json, "\"domain_object_modification\"");
    }

    #[test]
    fn test_unknown_name_is_configuration_error() {
        let err = "ifacets".parse::<Interface>().unwrap_err();
        assert!(err.is(datahub_core::error::ErrorKind::Configuration));
        assert!(err.message.contains("ifacets"));
    }

    #[test]
    fn test_type_routed_interfaces() {
        let routed: Vec<Interface> = Interface::ALL
            .iter()
            .copied()
            .filter(Interface::is_type_routed)
            .collect();
        assert_eq!(routed, vec![Interface::DatasetForm, Interface::GroupForm]);
    }
}
