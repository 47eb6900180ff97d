//! A custom dataset type with an extra field and a country-code validator.

use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::Value;

use datahub_plugin::defaults::{default_create_package_schema, default_show_package_schema};
use datahub_plugin::prelude::*;

/// Configuration name of the plugin.
pub const NAME: &str = "example_idatasetform";

/// The dataset type this plugin handles.
pub const PACKAGE_TYPE: &str = "example_dataset";

const COUNTRY_CODES: &[&str] = &["de", "es", "fr", "it", "uk"];

/// Adds a `custom_text` field and a `country_code` field to
/// `example_dataset` datasets.
#[derive(Debug, Default)]
pub struct DatasetFormPlugin;

impl DatasetFormPlugin {
    fn with_custom_fields(mut schema: Schema) -> Schema {
        schema.insert(
            "custom_text".to_string(),
            vec!["ignore_missing".to_string(), "unicode_safe".to_string()],
        );
        schema.insert(
            "country_code".to_string(),
            vec!["ignore_missing".to_string(), "example_country_code".to_string()],
        );
        schema
    }
}

impl DatasetForm for DatasetFormPlugin {
    fn package_types(&self) -> Vec<String> {
        vec![PACKAGE_TYPE.to_string()]
    }

    fn create_package_schema(&self) -> Option<Schema> {
        Some(Self::with_custom_fields(default_create_package_schema()))
    }

    fn update_package_schema(&self) -> Option<Schema> {
        Some(Self::with_custom_fields(default_create_package_schema()))
    }

    fn show_package_schema(&self) -> Option<Schema> {
        Some(Self::with_custom_fields(default_show_package_schema()))
    }

    fn setup_template_variables(&self, _ctx: &Context, _data: &DataDict) -> AppResult<DataDict> {
        let mut variables = DataDict::new();
        variables.insert(
            "country_codes".to_string(),
            Value::from(COUNTRY_CODES.to_vec()),
        );
        Ok(variables)
    }

    fn read_template(&self) -> Option<String> {
        Some("example_dataset/read.html".to_string())
    }

    fn package_form(&self) -> Option<String> {
        Some("example_dataset/package_form.html".to_string())
    }
}

impl Validators for DatasetFormPlugin {
    fn get_validators(&self) -> IndexMap<String, ValidatorFn> {
        let mut validators: IndexMap<String, ValidatorFn> = IndexMap::new();
        validators.insert(
            "example_country_code".to_string(),
            Arc::new(|value, _| match value.as_str() {
                Some(code) if COUNTRY_CODES.contains(&code.to_lowercase().as_str()) => {
                    Ok(Validation::Value(Value::String(code.to_lowercase())))
                }
                _ => Err(format!("Unknown country code: {value}")),
            }),
        );
        validators
    }
}

/// Builds the plugin export.
pub fn export() -> AppResult<PluginExport> {
    let info = plugin_info!(
        name: NAME,
        version: "1.0.0",
        description: "Custom dataset type with extra fields",
        author: "DataHub"
    );
    Ok(plugin_export!(info, Arc::new(DatasetFormPlugin), [DatasetForm, Validators]))
}
