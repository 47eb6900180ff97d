use serde::Serialize;
use tracing::debug;

use datahub_core::error::AppError;
use datahub_core::result::AppResult;
use datahub_core::types::{Context, DataDict, Schema};

use crate::defaults::{DefaultDatasetForm, DefaultGroupForm};
use crate::interfaces::{DatasetForm, GroupForm, ValidationOutcome};
use crate::schema;

use super::HookDispatcher;

/// A dataset page or form template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DatasetTemplate {
    /// New dataset page.
    New,
    /// Dataset read page.
    Read,
    /// Dataset edit page.
    Edit,
    /// One dataset in search results.
    Search,
    /// Dataset history page.
    History,
    /// Resource read page.
    Resource,
    /// Dataset form.
    PackageForm,
    /// Resource form.
    ResourceForm,
}

impl DatasetTemplate {
    /// Every dataset template.
    pub const ALL: &'static [DatasetTemplate] = &[
        Self::New,
        Self::Read,
        Self::Edit,
        Self::Search,
        Self::History,
        Self::Resource,
        Self::PackageForm,
        Self::ResourceForm,
    ];

    fn of(self, form: &dyn DatasetForm) -> Option<String> {
        match self {
            Self::New => form.new_template(),
            Self::Read => form.read_template(),
            Self::Edit => form.edit_template(),
            Self::Search => form.search_template(),
            Self::History => form.history_template(),
            Self::Resource => form.resource_template(),
            Self::PackageForm => form.package_form(),
            Self::ResourceForm => form.resource_form(),
        }
    }
}

/// A group page or form template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupTemplate {
    /// New group page.
    New,
    /// Group index page.
    Index,
    /// Group read page.
    Read,
    /// Group history page.
    History,
    /// Group edit page.
    Edit,
    /// Group form.
    PackageForm,
}

impl GroupTemplate {
    /// Every group template.
    pub const ALL: &'static [GroupTemplate] = &[
        Self::New,
        Self::Index,
        Self::Read,
        Self::History,
        Self::Edit,
        Self::PackageForm,
    ];

    fn of(self, form: &dyn GroupForm) -> Option<String> {
        match self {
            Self::New => form.new_template(),
            Self::Index => form.index_template(),
            Self::Read => form.read_template(),
            Self::History => form.history_template(),
            Self::Edit => form.edit_template(),
            Self::PackageForm => form.package_form(),
        }
    }
}

/// The logic action a dataset dict is validated for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageAction {
    /// `package_show`
    Show,
    /// `package_create`
    Create,
    /// `package_update`
    Update,
}

impl PackageAction {
    /// The action name handed to `validate`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Show => "package_show",
            Self::Create => "package_create",
            Self::Update => "package_update",
        }
    }

    fn schema_of(self, form: &dyn DatasetForm) -> Option<Schema> {
        match self {
            Self::Show => form.show_package_schema(),
            Self::Create => form.create_package_schema(),
            Self::Update => form.update_package_schema(),
        }
    }
}

/// The logic action a group or organization dict is validated for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupAction {
    /// `group_show`
    GroupShow,
    /// `group_create`
    GroupCreate,
    /// `group_update`
    GroupUpdate,
    /// `organization_show`
    OrganizationShow,
    /// `organization_create`
    OrganizationCreate,
    /// `organization_update`
    OrganizationUpdate,
}

impl GroupAction {
    /// The action name handed to `validate`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GroupShow => "group_show",
            Self::GroupCreate => "group_create",
            Self::GroupUpdate => "group_update",
            Self::OrganizationShow => "organization_show",
            Self::OrganizationCreate => "organization_create",
            Self::OrganizationUpdate => "organization_update",
        }
    }

    fn is_show(self) -> bool {
        matches!(self, Self::GroupShow | Self::OrganizationShow)
    }
}

impl HookDispatcher {
    /// The template the form serving `package_type` uses.
    pub fn dataset_template(&self, package_type: &str, template: DatasetTemplate) -> AppResult<String> {
        let route = self.registry().dataset_form(package_type);
        debug!(package_type = %package_type, plugin = ?route.plugin, template = ?template, "Routing dataset template");
        template
            .of(route.hook.as_ref())
            .or_else(|| template.of(&DefaultDatasetForm))
            .ok_or_else(|| AppError::not_found(format!("No {template:?} template for '{package_type}'")))
    }

    /// The schema the form serving `package_type` validates `action` with.
    pub fn package_schema(&self, package_type: &str, action: PackageAction) -> AppResult<Schema> {
        let route = self.registry().dataset_form(package_type);
        action
            .schema_of(route.hook.as_ref())
            .or_else(|| action.schema_of(&DefaultDatasetForm))
            .ok_or_else(|| {
                AppError::not_found(format!("No {} schema for '{package_type}'", action.as_str()))
            })
    }

    /// Extra template variables from the form serving `package_type`.
    pub fn dataset_template_variables(
        &self,
        package_type: &str,
        ctx: &Context,
        data: &DataDict,
    ) -> AppResult<DataDict> {
        self.registry()
            .dataset_form(package_type)
            .hook
            .setup_template_variables(ctx, data)
    }

    /// Validates a dataset dict with the form serving `package_type`.
    ///
    /// The form's own `validate` wins; otherwise the dict is validated
    /// against the form's schema for `action`.
    pub fn validate_dataset(
        &self,
        package_type: &str,
        ctx: &Context,
        data: &DataDict,
        action: PackageAction,
    ) -> AppResult<ValidationOutcome> {
        let schema = self.package_schema(package_type, action)?;
        let route = self.registry().dataset_form(package_type);
        match route.hook.validate(ctx, data, &schema, action.as_str()) {
            Some(outcome) => outcome,
            None => Ok(schema::validate(
                ctx,
                data,
                &schema,
                &self.registry().functions().validators,
            )),
        }
    }

    /// The template the form serving `group_type` uses.
    pub fn group_template(&self, group_type: &str, template: GroupTemplate) -> AppResult<String> {
        let route = self.registry().group_form(group_type);
        debug!(group_type = %group_type, plugin = ?route.plugin, template = ?template, "Routing group template");
        template
            .of(route.hook.as_ref())
            .or_else(|| template.of(&DefaultGroupForm))
            .ok_or_else(|| AppError::not_found(format!("No {template:?} template for '{group_type}'")))
    }

    /// The schema mapping form data of `group_type` to the database
    /// format, or the reverse when `to_db` is false.
    pub fn group_schema(&self, group_type: &str, to_db: bool) -> AppResult<Schema> {
        let route = self.registry().group_form(group_type);
        let pick = |form: &dyn GroupForm| {
            if to_db {
                form.form_to_db_schema()
            } else {
                form.db_to_form_schema()
            }
        };
        pick(route.hook.as_ref())
            .or_else(|| pick(&DefaultGroupForm))
            .ok_or_else(|| AppError::not_found(format!("No group schema for '{group_type}'")))
    }

    /// Checks a group dict with the form serving `group_type`.
    pub fn check_group_data(&self, group_type: &str, data: &DataDict) -> AppResult<()> {
        self.registry().group_form(group_type).hook.check_data_dict(data)
    }

    /// Extra template variables from the form serving `group_type`.
    pub fn group_template_variables(
        &self,
        group_type: &str,
        ctx: &Context,
        data: &DataDict,
    ) -> AppResult<DataDict> {
        self.registry()
            .group_form(group_type)
            .hook
            .setup_template_variables(ctx, data)
    }

    /// Validates a group or organization dict with the form serving
    /// `group_type`.
    pub fn validate_group(
        &self,
        group_type: &str,
        ctx: &Context,
        data: &DataDict,
        action: GroupAction,
    ) -> AppResult<ValidationOutcome> {
        let schema = self.group_schema(group_type, !action.is_show())?;
        let route = self.registry().group_form(group_type);
        match route.hook.validate(ctx, data, &schema, action.as_str()) {
            Some(outcome) => outcome,
            None => Ok(schema::validate(
                ctx,
                data,
                &schema,
                &self.registry().functions().validators,
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use super::*;
    use crate::exports::PluginExport;
    use crate::registry::{PluginInfo, PluginRegistry};
    use datahub_core::types::dict::{data_dict, schema as schema_of};

    struct Harvest;

    impl DatasetForm for Harvest {
        fn package_types(&self) -> Vec<String> {
            vec!["harvest".to_string()]
        }

        fn read_template(&self) -> Option<String> {
            Some("harvest/read.html".to_string())
        }

        fn create_package_schema(&self) -> Option<Schema> {
            Some(schema_of([("url", vec!["not_empty"])]))
        }
    }

    fn dispatcher() -> HookDispatcher {
        let mut registry = PluginRegistry::new();
        registry
            .register(
                PluginExport::new(PluginInfo::new("harvest", "1.0.0"))
                    .implements::<dyn DatasetForm>(Arc::new(Harvest)),
            )
            .expect("register");
        HookDispatcher::new(Arc::new(registry))
    }

    #[test]
    fn test_owner_template_with_default_for_the_rest() {
        let dispatcher = dispatcher();
        assert_eq!(
            dispatcher.dataset_template("harvest", DatasetTemplate::Read).expect("template"),
            "harvest/read.html"
        );
        assert_eq!(
            dispatcher.dataset_template("harvest", DatasetTemplate::Edit).expect("template"),
            "package/edit.html"
        );
        assert_eq!(
            dispatcher.dataset_template("dataset", DatasetTemplate::Read).expect("template"),
            "package/read.html"
        );
    }

    #[test]
    fn test_validate_uses_routed_schema() {
        let dispatcher = dispatcher();
        let data = data_dict(json!({"name": "x"})).expect("object");

        let outcome = dispatcher
            .validate_dataset("harvest", &Context::anonymous(), &data, PackageAction::Create)
            .expect("validate");
        assert_eq!(outcome.errors.keys().collect::<Vec<_>>(), vec!["url"]);

        let outcome = dispatcher
            .validate_dataset("dataset", &Context::anonymous(), &data, PackageAction::Create)
            .expect("validate");
        assert!(outcome.is_valid());
    }

    #[test]
    fn test_group_defaults() {
        let dispatcher = dispatcher();
        assert_eq!(
            dispatcher.group_template("group", GroupTemplate::Index).expect("template"),
            "group/index.html"
        );
        let data = data_dict(json!({"title": "No name"})).expect("object");
        let outcome = dispatcher
            .validate_group("organization", &Context::anonymous(), &data, GroupAction::OrganizationCreate)
            .expect("validate");
        assert!(outcome.errors.contains_key("name"));
    }
}
