//! Controller hooks for tags, groups, organizations, datasets, and
//! resources.
//!
//! These run just before an object is committed or returned, after
//! validation and authorization have completed. `before_*` display and
//! search hooks transform the dict they receive; everything else is a
//! notification.

use serde::{Deserialize, Serialize};

use datahub_core::result::AppResult;
use datahub_core::types::{Context, DataDict};

/// A role granted to or revoked from a user on an object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleAssignment {
    /// The user the role applies to.
    pub user: String,
    /// The role, e.g. `editor`.
    pub role: String,
    /// The object (dataset, group, organization) the role is on.
    pub object_id: String,
}

/// Results of a dataset search.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResults {
    /// Total number of matches.
    pub count: u64,
    /// The matching datasets on this page.
    pub results: Vec<DataDict>,
    /// Facet counts keyed by facet name.
    #[serde(default)]
    pub facets: DataDict,
}

/// Hooks into tag display.
pub trait TagController: Send + Sync {
    /// Receives the tag dict before it goes to the template.
    fn before_view(&self, tag: DataDict) -> AppResult<DataDict> {
        Ok(tag)
    }
}

/// Hooks into the group controller.
pub trait GroupController: Send + Sync {
    /// A group was read.
    fn read(&self, _entity: &DataDict) -> AppResult<()> {
        Ok(())
    }

    /// A group was created.
    fn create(&self, _entity: &DataDict) -> AppResult<()> {
        Ok(())
    }

    /// A group was edited.
    fn edit(&self, _entity: &DataDict) -> AppResult<()> {
        Ok(())
    }

    /// A group was deleted.
    fn delete(&self, _entity: &DataDict) -> AppResult<()> {
        Ok(())
    }

    /// A role was granted on a group.
    fn authz_add_role(&self, _role: &RoleAssignment) -> AppResult<()> {
        Ok(())
    }

    /// A role was revoked on a group.
    fn authz_remove_role(&self, _role: &RoleAssignment) -> AppResult<()> {
        Ok(())
    }

    /// Receives the group dict before it goes to the template.
    fn before_view(&self, group: DataDict) -> AppResult<DataDict> {
        Ok(group)
    }
}

/// Hooks into the organization controller.
pub trait OrganizationController: Send + Sync {
    /// An organization was read.
    fn read(&self, _entity: &DataDict) -> AppResult<()> {
        Ok(())
    }

    /// An organization was created.
    fn create(&self, _entity: &DataDict) -> AppResult<()> {
        Ok(())
    }

    /// An organization was edited.
    fn edit(&self, _entity: &DataDict) -> AppResult<()> {
        Ok(())
    }

    /// An organization was deleted.
    fn delete(&self, _entity: &DataDict) -> AppResult<()> {
        Ok(())
    }

    /// A role was granted on an organization.
    fn authz_add_role(&self, _role: &RoleAssignment) -> AppResult<()> {
        Ok(())
    }

    /// A role was revoked on an organization.
    fn authz_remove_role(&self, _role: &RoleAssignment) -> AppResult<()> {
        Ok(())
    }

    /// Receives the organization dict before it goes to the template.
    fn before_view(&self, organization: DataDict) -> AppResult<DataDict> {
        Ok(organization)
    }
}

/// Hooks into the dataset (package) controller.
pub trait PackageController: Send + Sync {
    /// A dataset was read.
    fn read(&self, _entity: &DataDict) -> AppResult<()> {
        Ok(())
    }

    /// A dataset was created.
    fn create(&self, _entity: &DataDict) -> AppResult<()> {
        Ok(())
    }

    /// A dataset was edited.
    fn edit(&self, _entity: &DataDict) -> AppResult<()> {
        Ok(())
    }

    /// A dataset was deleted.
    fn delete(&self, _entity: &DataDict) -> AppResult<()> {
        Ok(())
    }

    /// A role was granted on a dataset.
    fn authz_add_role(&self, _role: &RoleAssignment) -> AppResult<()> {
        Ok(())
    }

    /// A role was revoked on a dataset.
    fn authz_remove_role(&self, _role: &RoleAssignment) -> AppResult<()> {
        Ok(())
    }

    /// Receives the validated dataset dict (including its new id) after creation.
    fn after_create(&self, _ctx: &Context, _dataset: &DataDict) -> AppResult<()> {
        Ok(())
    }

    /// Receives the validated dataset dict after an update.
    fn after_update(&self, _ctx: &Context, _dataset: &DataDict) -> AppResult<()> {
        Ok(())
    }

    /// Receives the dataset dict (usually only the id) after deletion.
    fn after_delete(&self, _ctx: &Context, _dataset: &DataDict) -> AppResult<()> {
        Ok(())
    }

    /// Receives the validated dataset dict once it is ready for display.
    fn after_show(&self, _ctx: &Context, _dataset: &DataDict) -> AppResult<()> {
        Ok(())
    }

    /// Receives the search parameters and returns them, possibly modified.
    ///
    /// Parameters include an `extras` object with every `ext_*` field of
    /// the request.
    fn before_search(&self, params: DataDict) -> AppResult<DataDict> {
        Ok(params)
    }

    /// Receives the search results and returns them, possibly modified.
    /// `count` and `facets` must be kept consistent with `results`.
    fn after_search(&self, results: SearchResults, _params: &DataDict) -> AppResult<SearchResults> {
        Ok(results)
    }

    /// Receives the flattened document about to be indexed and returns it,
    /// possibly modified.
    fn before_index(&self, document: DataDict) -> AppResult<DataDict> {
        Ok(document)
    }

    /// Receives the dataset dict before it goes to the template.
    fn before_view(&self, dataset: DataDict) -> AppResult<DataDict> {
        Ok(dataset)
    }
}

/// Hooks into the resource controller.
pub trait ResourceController: Send + Sync {
    /// A resource is about to be created.
    fn before_create(&self, _ctx: &Context, _resource: &DataDict) -> AppResult<()> {
        Ok(())
    }

    /// A resource was created. `url_type` is `upload` for uploaded files.
    fn after_create(&self, _ctx: &Context, _resource: &DataDict) -> AppResult<()> {
        Ok(())
    }

    /// `current` is about to be replaced by `resource`.
    fn before_update(
        &self,
        _ctx: &Context,
        _current: &DataDict,
        _resource: &DataDict,
    ) -> AppResult<()> {
        Ok(())
    }

    /// A resource was updated.
    fn after_update(&self, _ctx: &Context, _resource: &DataDict) -> AppResult<()> {
        Ok(())
    }

    /// `resource` (holding only its `id`) is about to be removed from
    /// `resources`.
    fn before_delete(
        &self,
        _ctx: &Context,
        _resource: &DataDict,
        _resources: &[DataDict],
    ) -> AppResult<()> {
        Ok(())
    }

    /// A resource was removed; `resources` are the ones that remain.
    fn after_delete(&self, _ctx: &Context, _resources: &[DataDict]) -> AppResult<()> {
        Ok(())
    }

    /// Receives the resource dict before it is shown, and returns it,
    /// possibly modified. Also runs when a dataset is shown internally,
    /// not only for display.
    fn before_show(&self, resource: DataDict) -> AppResult<DataDict> {
        Ok(resource)
    }
}
