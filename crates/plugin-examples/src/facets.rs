//! Relabels and extends the search facets.

use std::sync::Arc;

use datahub_plugin::prelude::*;

/// Configuration name of the plugin.
pub const NAME: &str = "example_ifacets";

/// Shows groups as publishers and adds a secondary-publisher facet on
/// dataset searches. Organization pages drop the organization facet.
#[derive(Debug, Default)]
pub struct FacetsPlugin;

impl Facets for FacetsPlugin {
    fn dataset_facets(&self, mut facets: FacetsDict, _package_type: &str) -> AppResult<FacetsDict> {
        facets.insert("groups".to_string(), "Publisher".to_string());
        facets.insert("secondary_publisher".to_string(), "Secondary Publisher".to_string());
        Ok(facets)
    }

    fn group_facets(
        &self,
        mut facets: FacetsDict,
        _group_type: &str,
        _package_type: Option<&str>,
    ) -> AppResult<FacetsDict> {
        facets.insert("groups".to_string(), "Publisher".to_string());
        Ok(facets)
    }

    fn organization_facets(
        &self,
        mut facets: FacetsDict,
        _organization_type: &str,
        _package_type: Option<&str>,
    ) -> AppResult<FacetsDict> {
        facets.shift_remove("organization");
        Ok(facets)
    }
}

/// Builds the plugin export.
pub fn export() -> AppResult<PluginExport> {
    let info = plugin_info!(
        name: NAME,
        version: "1.0.0",
        description: "Relabels search facets",
        author: "DataHub"
    );
    Ok(plugin_export!(info, Arc::new(FacetsPlugin), [Facets]))
}
