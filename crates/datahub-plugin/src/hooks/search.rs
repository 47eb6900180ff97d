use datahub_core::result::AppResult;
use datahub_core::types::{DataDict, FacetsDict};

use crate::defaults::default_facets;
use crate::interfaces::{Facets, PackageController, SearchResults};

use super::HookDispatcher;

impl HookDispatcher {
    /// Facets for the dataset search page, starting from the defaults.
    pub fn dataset_facets(&self, package_type: &str) -> AppResult<FacetsDict> {
        self.filter::<dyn Facets, _, _>("dataset_facets", default_facets(), |hook, facets| {
            hook.dataset_facets(facets, package_type)
        })
    }

    /// Facets for a group page, starting from the defaults.
    pub fn group_facets(&self, group_type: &str, package_type: Option<&str>) -> AppResult<FacetsDict> {
        self.filter::<dyn Facets, _, _>("group_facets", default_facets(), |hook, facets| {
            hook.group_facets(facets, group_type, package_type)
        })
    }

    /// Facets for an organization page, starting from the defaults.
    pub fn organization_facets(
        &self,
        organization_type: &str,
        package_type: Option<&str>,
    ) -> AppResult<FacetsDict> {
        self.filter::<dyn Facets, _, _>("organization_facets", default_facets(), |hook, facets| {
            hook.organization_facets(facets, organization_type, package_type)
        })
    }

    /// Search parameters after every package controller has seen them.
    pub fn before_search(&self, params: DataDict) -> AppResult<DataDict> {
        self.filter::<dyn PackageController, _, _>("before_search", params, |hook, params| {
            hook.before_search(params)
        })
    }

    /// Search results after every package controller has seen them.
    pub fn after_search(&self, results: SearchResults, params: &DataDict) -> AppResult<SearchResults> {
        self.filter::<dyn PackageController, _, _>("after_search", results, |hook, results| {
            hook.after_search(results, params)
        })
    }

    /// The search-index document for a dataset.
    pub fn before_index(&self, document: DataDict) -> AppResult<DataDict> {
        self.filter::<dyn PackageController, _, _>("before_index", document, |hook, document| {
            hook.before_index(document)
        })
    }
}
