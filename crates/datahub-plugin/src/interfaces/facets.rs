//! Search facet customization.

use datahub_core::result::AppResult;
use datahub_core::types::FacetsDict;

/// Customizes the search facets on the dataset search, group, and
/// organization pages.
///
/// Every provider runs in load order and receives the facets returned by
/// the previous one. Add or relabel facets with `insert` so that existing
/// keys keep their position.
pub trait Facets: Send + Sync {
    /// Facets for the dataset search page of `package_type` datasets.
    fn dataset_facets(&self, facets: FacetsDict, _package_type: &str) -> AppResult<FacetsDict> {
        Ok(facets)
    }

    /// Facets for a group page.
    fn group_facets(
        &self,
        facets: FacetsDict,
        _group_type: &str,
        _package_type: Option<&str>,
    ) -> AppResult<FacetsDict> {
        Ok(facets)
    }

    /// Facets for an organization page.
    fn organization_facets(
        &self,
        facets: FacetsDict,
        _organization_type: &str,
        _package_type: Option<&str>,
    ) -> AppResult<FacetsDict> {
        Ok(facets)
    }
}
