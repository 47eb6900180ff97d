//! Type-routed form interfaces.
//!
//! Several dataset-form and group-form plugins can be active at once. Each
//! claims a set of type keys, and at most one may declare itself the
//! fallback. A request for a dataset or group is delegated to the owner of
//! its type, else the fallback, else the built-in default form.
//!
//! Methods returning `Option` answer `None` when the plugin keeps the
//! default behaviour; the default form supplies it.

use serde::{Deserialize, Serialize};

use datahub_core::result::AppResult;
use datahub_core::types::{Context, DataDict, ErrorDict, Schema};

/// A validated dict and the errors found while validating it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationOutcome {
    /// The converted data.
    pub data: DataDict,
    /// Field → error messages. Empty when the data is valid.
    pub errors: ErrorDict,
}

impl ValidationOutcome {
    /// Returns whether validation found no errors.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Customizes dataset schemas and forms for a set of dataset types.
pub trait DatasetForm: Send + Sync {
    /// Dataset types this plugin handles. No two plugins may claim the
    /// same type.
    fn package_types(&self) -> Vec<String> {
        Vec::new()
    }

    /// Whether this plugin handles datasets whose type nobody claims. At
    /// most one plugin may be the fallback.
    fn is_fallback(&self) -> bool {
        false
    }

    /// Schema for validating new dataset dicts.
    fn create_package_schema(&self) -> Option<Schema> {
        None
    }

    /// Schema for validating updated dataset dicts.
    fn update_package_schema(&self) -> Option<Schema> {
        None
    }

    /// Schema applied to datasets read from the database before they are
    /// shown.
    fn show_package_schema(&self) -> Option<Schema> {
        None
    }

    /// Extra variables for dataset templates.
    fn setup_template_variables(&self, _ctx: &Context, _data: &DataDict) -> AppResult<DataDict> {
        Ok(DataDict::new())
    }

    /// Template of the new dataset page.
    fn new_template(&self) -> Option<String> {
        None
    }

    /// Template of the dataset read page.
    fn read_template(&self) -> Option<String> {
        None
    }

    /// Template of the dataset edit page.
    fn edit_template(&self) -> Option<String> {
        None
    }

    /// Template for one dataset in search results.
    fn search_template(&self) -> Option<String> {
        None
    }

    /// Template of the dataset history page.
    fn history_template(&self) -> Option<String> {
        None
    }

    /// Template of the resource read page.
    fn resource_template(&self) -> Option<String> {
        None
    }

    /// Template of the dataset form.
    fn package_form(&self) -> Option<String> {
        None
    }

    /// Template of the resource form.
    fn resource_form(&self) -> Option<String> {
        None
    }

    /// Replaces schema validation entirely for this plugin's datasets.
    ///
    /// `action` is `package_show`, `package_create`, or `package_update`.
    /// Return `None` to use the default schema-driven validation.
    fn validate(
        &self,
        _ctx: &Context,
        _data: &DataDict,
        _schema: &Schema,
        _action: &str,
    ) -> Option<AppResult<ValidationOutcome>> {
        None
    }
}

/// Customizes group and organization schemas and forms for a set of group
/// types.
pub trait GroupForm: Send + Sync {
    /// Group types this plugin handles. No two plugins may claim the same
    /// type.
    fn group_types(&self) -> Vec<String> {
        Vec::new()
    }

    /// Whether this plugin handles groups whose type nobody claims. At most
    /// one plugin may be the fallback.
    fn is_fallback(&self) -> bool {
        false
    }

    /// Template of the new group page.
    fn new_template(&self) -> Option<String> {
        None
    }

    /// Template of the group index page.
    fn index_template(&self) -> Option<String> {
        None
    }

    /// Template of the group read page.
    fn read_template(&self) -> Option<String> {
        None
    }

    /// Template of the group history page.
    fn history_template(&self) -> Option<String> {
        None
    }

    /// Template of the group edit page.
    fn edit_template(&self) -> Option<String> {
        None
    }

    /// Template of the group form.
    fn package_form(&self) -> Option<String> {
        None
    }

    /// Schema mapping form data to the database format.
    fn form_to_db_schema(&self) -> Option<Schema> {
        None
    }

    /// Schema mapping database data to the form format.
    fn db_to_form_schema(&self) -> Option<Schema> {
        None
    }

    /// Checks a group dict; an error rejects it.
    fn check_data_dict(&self, _data: &DataDict) -> AppResult<()> {
        Ok(())
    }

    /// Extra variables for group templates.
    fn setup_template_variables(&self, _ctx: &Context, _data: &DataDict) -> AppResult<DataDict> {
        Ok(DataDict::new())
    }

    /// Replaces schema validation entirely for this plugin's groups.
    ///
    /// `action` is one of `group_show`, `group_create`, `group_update`,
    /// `organization_show`, `organization_create`, `organization_update`.
    /// Return `None` to use the default schema-driven validation.
    fn validate(
        &self,
        _ctx: &Context,
        _data: &DataDict,
        _schema: &Schema,
        _action: &str,
    ) -> Option<AppResult<ValidationOutcome>> {
        None
    }
}
