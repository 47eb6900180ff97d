//! The example plugins loaded together through the catalog.

use pretty_assertions::assert_eq;
use serde_json::{Value, json};

use datahub_core::config::AppConfig;
use datahub_core::error::ErrorKind;
use datahub_plugin::hooks::{DatasetTemplate, PackageAction};
use datahub_plugin::prelude::*;
use datahub_plugin::{HookDispatcher, LoadedPlugins, bootstrap, unload_all};
use plugin_examples::{audit_log, auth_functions, catalog, dataset_form, template_helpers};

const CONFIG: &str = r#"
[plugins]
enabled = [
    "audit_log",
    "example_idatasetform",
    "example_ifacets",
    "example_iauthfunctions",
    "example_itemplatehelpers",
]

[settings]
site_title = "Open Data"
"#;

fn load() -> LoadedPlugins {
    let mut config = AppConfig::from_toml(CONFIG).expect("config");
    config.settings.insert(
        auth_functions::CURATORS_SETTING.to_string(),
        "alice carol".to_string(),
    );
    bootstrap(&catalog().expect("catalog"), &config).expect("bootstrap")
}

fn dict(value: Value) -> DataDict {
    match value {
        Value::Object(map) => map,
        other => panic!("expected an object, got {other}"),
    }
}

#[test]
fn catalog_loads_in_configured_order() {
    let loaded = load();

    let names: Vec<&str> = loaded.registry.plugins().map(|p| p.name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            audit_log::NAME,
            dataset_form::NAME,
            "example_ifacets",
            auth_functions::NAME,
            template_helpers::NAME,
        ]
    );
    assert_eq!(
        loaded.settings[template_helpers::GREETING_SETTING],
        "This is some example text."
    );
}

#[test]
fn facets_are_relabelled() {
    let dispatcher = HookDispatcher::new(load().registry);

    let dataset = dispatcher.dataset_facets("dataset").expect("facets");
    assert_eq!(dataset["groups"], "Publisher");
    assert_eq!(dataset.get_index(dataset.len() - 1).map(|(k, _)| k.as_str()), Some("secondary_publisher"));

    let organization = dispatcher
        .organization_facets("organization", None)
        .expect("facets");
    assert!(!organization.contains_key("organization"));
}

#[test]
fn only_curators_create_groups() {
    let loaded = load();
    let tables = loaded.registry.functions();
    let data = DataDict::new();

    assert!(tables.check_access("group_create", &Context::for_user("alice"), &data).is_ok());
    assert!(tables.check_access("group_create", &Context::for_user("carol"), &data).is_ok());

    let err = tables
        .check_access("group_create", &Context::for_user("bob"), &data)
        .unwrap_err();
    assert!(err.is(ErrorKind::Authorization));
    assert_eq!(err.message, "User bob not authorized to create groups");

    assert!(tables.check_access("group_create", &Context::anonymous(), &data).is_err());
}

#[test]
fn helpers_use_configured_greeting() {
    let loaded = load();
    let tables = loaded.registry.functions();

    assert_eq!(
        tables
            .call_helper("example_itemplatehelpers_greeting", &[])
            .expect("greeting"),
        json!("This is some example text.")
    );
    assert_eq!(
        tables
            .call_helper("example_itemplatehelpers_emphasize", &[json!("hello")])
            .expect("emphasize"),
        json!("HELLO!")
    );
    assert!(
        tables
            .call_helper("example_itemplatehelpers_emphasize", &[json!(3)])
            .is_err()
    );
}

#[test]
fn audit_log_records_loads_and_changes() {
    let loaded = load();
    let dispatcher = HookDispatcher::new(std::sync::Arc::clone(&loaded.registry));

    dispatcher
        .domain_object_modified(&dict(json!({"id": "ds-1"})), DomainOperation::New)
        .expect("notify");

    let action = loaded
        .registry
        .functions()
        .action(audit_log::LIST_ACTION)
        .expect("action");
    assert!(action.side_effect_free);
    let entries = action
        .call(&Context::anonymous(), &DataDict::new())
        .expect("entries");
    let entries = entries.as_array().expect("array");

    let loaded_plugins: Vec<&str> = entries
        .iter()
        .filter(|e| e["event"] == "plugin_loaded")
        .filter_map(|e| e["plugin"].as_str())
        .collect();
    assert_eq!(loaded_plugins.first(), Some(&audit_log::NAME));
    assert_eq!(loaded_plugins.len(), 5);

    let last = entries.last().expect("entry");
    assert_eq!(last["event"], "domain_object");
    assert_eq!(last["id"], "ds-1");

    unload_all(&loaded.registry).expect("unload");
    let entries = action
        .call(&Context::anonymous(), &DataDict::new())
        .expect("entries");
    let unloaded: Vec<&str> = entries
        .as_array()
        .expect("array")
        .iter()
        .filter(|e| e["event"] == "plugin_unloaded")
        .filter_map(|e| e["plugin"].as_str())
        .collect();
    assert_eq!(unloaded.first(), Some(&template_helpers::NAME));
    assert_eq!(unloaded.last(), Some(&audit_log::NAME));
}

#[test]
fn example_dataset_routes_to_its_form() {
    let dispatcher = HookDispatcher::new(load().registry);

    assert_eq!(
        dispatcher
            .dataset_template(dataset_form::PACKAGE_TYPE, DatasetTemplate::Read)
            .expect("template"),
        "example_dataset/read.html"
    );
    assert_eq!(
        dispatcher
            .dataset_template(dataset_form::PACKAGE_TYPE, DatasetTemplate::Edit)
            .expect("template"),
        "package/edit.html"
    );
    assert_eq!(
        dispatcher
            .dataset_template("dataset", DatasetTemplate::Read)
            .expect("template"),
        "package/read.html"
    );

    let ctx = Context::for_user("alice");
    let valid = dispatcher
        .validate_dataset(
            dataset_form::PACKAGE_TYPE,
            &ctx,
            &dict(json!({"name": "rivers", "country_code": "FR"})),
            PackageAction::Create,
        )
        .expect("validate");
    assert!(valid.is_valid());
    assert_eq!(valid.data["country_code"], "fr");

    let invalid = dispatcher
        .validate_dataset(
            dataset_form::PACKAGE_TYPE,
            &ctx,
            &dict(json!({"name": "rivers", "country_code": "xx"})),
            PackageAction::Create,
        )
        .expect("validate");
    assert_eq!(
        invalid.errors["country_code"],
        vec!["Unknown country code: \"xx\"".to_string()]
    );

    let plain = dispatcher
        .validate_dataset(
            "dataset",
            &ctx,
            &dict(json!({"name": "rivers", "country_code": "xx"})),
            PackageAction::Create,
        )
        .expect("validate");
    assert!(plain.is_valid());
}
