//! Built-in behaviour used when no plugin overrides a hook.

use datahub_core::types::dict::{facets, schema};
use datahub_core::types::{FacetsDict, Schema};

use crate::interfaces::{DatasetForm, GroupForm};

/// Facets shown on every search page before facet plugins run.
pub fn default_facets() -> FacetsDict {
    facets([
        ("organization", "Organizations"),
        ("groups", "Groups"),
        ("tags", "Tags"),
        ("res_format", "Formats"),
        ("license_id", "Licenses"),
    ])
}

/// Schema for new and updated datasets.
pub fn default_create_package_schema() -> Schema {
    schema([
        ("id", vec!["ignore_missing", "unicode_safe"]),
        ("name", vec!["not_empty", "unicode_safe", "strip_value"]),
        ("title", vec!["ignore_missing", "unicode_safe"]),
        ("author", vec!["ignore_missing", "unicode_safe"]),
        ("author_email", vec!["ignore_missing", "unicode_safe"]),
        ("maintainer", vec!["ignore_missing", "unicode_safe"]),
        ("maintainer_email", vec!["ignore_missing", "unicode_safe"]),
        ("license_id", vec!["ignore_missing", "unicode_safe"]),
        ("notes", vec!["ignore_missing", "unicode_safe"]),
        ("url", vec!["ignore_missing", "unicode_safe"]),
        ("version", vec!["ignore_missing", "unicode_safe"]),
        ("state", vec!["ignore_missing", "unicode_safe"]),
        ("type", vec!["ignore_missing", "unicode_safe"]),
        ("owner_org", vec!["ignore_missing", "unicode_safe"]),
        ("private", vec!["ignore_missing", "boolean_validator"]),
    ])
}

/// Schema for datasets read from the database.
pub fn default_show_package_schema() -> Schema {
    let mut schema = default_create_package_schema();
    schema.insert("name".to_string(), vec!["unicode_safe".to_string()]);
    schema.insert(
        "num_resources".to_string(),
        vec!["ignore_missing".to_string(), "int_validator".to_string()],
    );
    schema.insert(
        "num_tags".to_string(),
        vec!["ignore_missing".to_string(), "int_validator".to_string()],
    );
    schema
}

/// Schema mapping group form data to the database format.
pub fn default_group_schema() -> Schema {
    schema([
        ("id", vec!["ignore_missing", "unicode_safe"]),
        ("name", vec!["not_empty", "unicode_safe", "strip_value"]),
        ("title", vec!["ignore_missing", "unicode_safe"]),
        ("description", vec!["ignore_missing", "unicode_safe"]),
        ("image_url", vec!["ignore_missing", "unicode_safe"]),
        ("state", vec!["ignore_missing", "unicode_safe"]),
        ("type", vec!["ignore_missing", "unicode_safe"]),
        ("is_organization", vec!["ignore_missing", "boolean_validator"]),
        ("approval_status", vec!["ignore_missing", "unicode_safe"]),
    ])
}

/// The dataset form used for types no plugin handles.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultDatasetForm;

impl DatasetForm for DefaultDatasetForm {
    fn create_package_schema(&self) -> Option<Schema> {
        Some(default_create_package_schema())
    }

    fn update_package_schema(&self) -> Option<Schema> {
        Some(default_create_package_schema())
    }

    fn show_package_schema(&self) -> Option<Schema> {
        Some(default_show_package_schema())
    }

    fn new_template(&self) -> Option<String> {
        Some("package/new.html".to_string())
    }

    fn read_template(&self) -> Option<String> {
        Some("package/read.html".to_string())
    }

    fn edit_template(&self) -> Option<String> {
        Some("package/edit.html".to_string())
    }

    fn search_template(&self) -> Option<String> {
        Some("package/search.html".to_string())
    }

    fn history_template(&self) -> Option<String> {
        Some("package/history.html".to_string())
    }

    fn resource_template(&self) -> Option<String> {
        Some("package/resource_read.html".to_string())
    }

    fn package_form(&self) -> Option<String> {
        Some("package/new_package_form.html".to_string())
    }

    fn resource_form(&self) -> Option<String> {
        Some("package/snippets/resource_form.html".to_string())
    }
}

/// The group form used for types no plugin handles.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultGroupForm;

impl GroupForm for DefaultGroupForm {
    fn new_template(&self) -> Option<String> {
        Some("group/new.html".to_string())
    }

    fn index_template(&self) -> Option<String> {
        Some("group/index.html".to_string())
    }

    fn read_template(&self) -> Option<String> {
        Some("group/read.html".to_string())
    }

    fn history_template(&self) -> Option<String> {
        Some("group/history.html".to_string())
    }

    fn edit_template(&self) -> Option<String> {
        Some("group/edit.html".to_string())
    }

    fn package_form(&self) -> Option<String> {
        Some("group/new_group_form.html".to_string())
    }

    fn form_to_db_schema(&self) -> Option<Schema> {
        Some(default_group_schema())
    }

    fn db_to_form_schema(&self) -> Option<Schema> {
        Some(default_group_schema())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_facet_order() {
        let facets = default_facets();
        let keys: Vec<&str> = facets.keys().map(String::as_str).collect();
        assert_eq!(
            keys,
            vec!["organization", "groups", "tags", "res_format", "license_id"]
        );
    }

    #[test]
    fn test_default_forms_supply_every_template() {
        let dataset = DefaultDatasetForm;
        assert_eq!(dataset.read_template().as_deref(), Some("package/read.html"));
        assert!(dataset.resource_form().is_some());

        let group = DefaultGroupForm;
        assert_eq!(group.index_template().as_deref(), Some("group/index.html"));
        assert!(group.form_to_db_schema().is_some());
    }
}
