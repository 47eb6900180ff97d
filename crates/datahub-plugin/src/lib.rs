//! # datahub-plugin
//!
//! Plugin extension framework for DataHub. Provides:
//!
//! - The hook interfaces plugins implement, and the explicit capability
//!   set a plugin declares when exported
//! - A capability registry with type-routed dataset and group forms
//! - A hook dispatcher with filter, notify, routed, first-match, and
//!   best-match disciplines
//! - Merged action, validator, authorization, and helper tables
//! - A catalog-driven plugin manager and the process-wide registry

pub mod defaults;
pub mod exports;
pub mod global;
pub mod hooks;
pub mod interfaces;
pub mod loader;
pub mod macros;
pub mod manager;
pub mod prelude;
pub mod registry;
pub mod routing;
pub mod schema;
pub mod tables;

pub use exports::PluginExport;
pub use hooks::HookDispatcher;
pub use interfaces::{Capability, Hook, Interface};
pub use loader::PluginCatalog;
pub use manager::{LoadedPlugins, PluginManager, bootstrap, unload_all};
pub use registry::{PluginInfo, PluginRegistry};
pub use routing::{RouteInfo, RouteMatch};
pub use tables::{FunctionTables, Origin};
