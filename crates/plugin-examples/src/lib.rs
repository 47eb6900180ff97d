//! Example extensions for the DataHub plugin framework.
//!
//! Each module is one plugin showing how a family of interfaces is used.
//! [`catalog`] lists them all under their configuration names.

pub mod audit_log;
pub mod auth_functions;
pub mod dataset_form;
pub mod facets;
pub mod template_helpers;

use datahub_core::result::AppResult;
use datahub_plugin::loader::PluginCatalog;

pub use audit_log::AuditLogPlugin;
pub use auth_functions::AuthFunctionsPlugin;
pub use dataset_form::DatasetFormPlugin;
pub use facets::FacetsPlugin;
pub use template_helpers::TemplateHelpersPlugin;

/// Every example plugin, by configuration name.
pub fn catalog() -> AppResult<PluginCatalog> {
    let mut catalog = PluginCatalog::new();
    catalog.register(dataset_form::NAME, dataset_form::export)?;
    catalog.register(facets::NAME, facets::export)?;
    catalog.register(auth_functions::NAME, auth_functions::export)?;
    catalog.register(template_helpers::NAME, template_helpers::export)?;
    catalog.register(audit_log::NAME, audit_log::export)?;
    Ok(catalog)
}
