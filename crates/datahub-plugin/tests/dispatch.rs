//! Dispatch disciplines end to end: facet accumulation, chain aborts,
//! fail-fast notification, and deny-by-default authorization.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use indexmap::IndexMap;
use pretty_assertions::assert_eq;

use datahub_core::error::ErrorKind;
use datahub_plugin::defaults::default_facets;
use datahub_plugin::prelude::*;
use datahub_plugin::{HookDispatcher, PluginRegistry};

/// Adds `key → label` to the facets, failing instead when `fail` is set.
struct FacetStep {
    key: &'static str,
    label: &'static str,
    fail: bool,
    calls: Arc<AtomicUsize>,
}

impl Facets for FacetStep {
    fn dataset_facets(&self, mut facets: FacetsDict, _package_type: &str) -> AppResult<FacetsDict> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(AppError::plugin(format!("facet plugin for '{}' failed", self.key)));
        }
        facets.insert(self.key.to_string(), self.label.to_string());
        Ok(facets)
    }
}

fn facet_dispatcher(steps: &[(&'static str, &'static str, bool)]) -> (HookDispatcher, Vec<Arc<AtomicUsize>>) {
    let mut registry = PluginRegistry::new();
    let mut counters = Vec::new();
    for (i, (key, label, fail)) in steps.iter().enumerate() {
        let calls = Arc::new(AtomicUsize::new(0));
        counters.push(Arc::clone(&calls));
        registry
            .register(
                PluginExport::new(PluginInfo::new(&format!("facets_{i}"), "1.0.0"))
                    .implements::<dyn Facets>(Arc::new(FacetStep {
                        key,
                        label,
                        fail: *fail,
                        calls,
                    })),
            )
            .expect("register");
    }
    (HookDispatcher::new(Arc::new(registry)), counters)
}

fn labels(facets: &FacetsDict) -> Vec<(&str, &str)> {
    facets
        .iter()
        .map(|(k, v)| (k.as_str(), v.as_str()))
        .collect()
}

#[test]
fn facets_accumulate_in_load_order() {
    let (dispatcher, _) = facet_dispatcher(&[
        ("publisher", "Publisher", false),
        ("tags", "Keywords", false),
        ("license_id", "Licence", false),
        ("country", "Country", false),
    ]);

    let facets = dispatcher.dataset_facets("dataset").expect("facets");

    assert_eq!(
        labels(&facets),
        vec![
            ("organization", "Organizations"),
            ("groups", "Groups"),
            ("tags", "Keywords"),
            ("res_format", "Formats"),
            ("license_id", "Licence"),
            ("publisher", "Publisher"),
            ("country", "Country"),
        ]
    );
}

#[test]
fn later_plugin_overwrites_label_in_place() {
    let (dispatcher, _) = facet_dispatcher(&[
        ("first", "First", false),
        ("second", "Second", false),
        ("first", "First again", false),
    ]);

    let facets = dispatcher.dataset_facets("dataset").expect("facets");
    let keys: Vec<&str> = facets.keys().map(String::as_str).collect();
    let defaults = default_facets();
    let mut expected: Vec<&str> = defaults.keys().map(String::as_str).collect();
    expected.extend(["first", "second"]);

    assert_eq!(keys, expected);
    assert_eq!(facets["first"], "First again");
}

#[test]
fn failing_plugin_aborts_the_chain() {
    let (dispatcher, counters) = facet_dispatcher(&[
        ("a", "A", false),
        ("b", "B", true),
        ("c", "C", false),
    ]);

    let err = dispatcher.dataset_facets("dataset").unwrap_err();

    assert!(err.is(ErrorKind::Plugin));
    assert_eq!(err.message, "facet plugin for 'b' failed");
    let calls: Vec<usize> = counters.iter().map(|c| c.load(Ordering::SeqCst)).collect();
    assert_eq!(calls, vec![1, 1, 0]);
}

struct Listener {
    name: &'static str,
    fail: bool,
    log: Arc<Mutex<Vec<&'static str>>>,
}

impl PackageController for Listener {
    fn after_create(&self, _ctx: &Context, _dataset: &DataDict) -> AppResult<()> {
        self.log.lock().expect("lock").push(self.name);
        if self.fail {
            return Err(AppError::plugin(format!("{} failed", self.name)));
        }
        Ok(())
    }
}

#[test]
fn notification_fails_fast() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let mut registry = PluginRegistry::new();
    for (name, fail) in [("one", false), ("two", true), ("three", false)] {
        registry
            .register(
                PluginExport::new(PluginInfo::new(name, "1.0.0")).implements::<dyn PackageController>(
                    Arc::new(Listener {
                        name,
                        fail,
                        log: Arc::clone(&log),
                    }),
                ),
            )
            .expect("register");
    }
    let dispatcher = HookDispatcher::new(Arc::new(registry));

    let err = dispatcher
        .package_after_create(&Context::for_user("alice"), &DataDict::new())
        .unwrap_err();

    assert_eq!(err.message, "two failed");
    assert_eq!(*log.lock().expect("lock"), vec!["one", "two"]);
}

struct Guard;

impl AuthFunctions for Guard {
    fn get_auth_functions(&self) -> IndexMap<String, AuthFunction> {
        let mut functions = IndexMap::new();
        functions.insert(
            "package_update".to_string(),
            AuthFunction::new(|ctx, data| {
                let owner = data.get("creator_user_id").and_then(|v| v.as_str());
                if owner.is_some() && owner == ctx.user.as_deref() {
                    AuthResult::allow()
                } else {
                    AuthResult::default()
                }
            }),
        );
        functions.insert(
            "package_show".to_string(),
            AuthFunction::new(|_, _| AuthResult::allow()).allow_anonymous(),
        );
        functions
    }
}

#[test]
fn authorization_denies_by_default() {
    let mut registry = PluginRegistry::new();
    registry
        .register(
            PluginExport::new(PluginInfo::new("guard", "1.0.0"))
                .implements::<dyn AuthFunctions>(Arc::new(Guard)),
        )
        .expect("register");
    let tables = registry.functions();

    let mut data = DataDict::new();
    data.insert("creator_user_id".into(), "alice".into());

    assert!(tables.check_access("package_update", &Context::for_user("alice"), &data).is_ok());

    let err = tables
        .check_access("package_update", &Context::for_user("bob"), &data)
        .unwrap_err();
    assert!(err.is(ErrorKind::Authorization));

    assert!(tables.check_access("package_update", &Context::anonymous(), &data).is_err());
    assert!(tables.check_access("package_show", &Context::anonymous(), &data).is_ok());
    assert!(tables.check_access("package_delete", &Context::for_user("alice"), &data).is_err());
}

struct Named(&'static str);

impl Actions for Named {
    fn get_actions(&self) -> IndexMap<String, Action> {
        let name = self.0;
        let mut actions = IndexMap::new();
        actions.insert(
            "site_status".to_string(),
            Action::new(move |_, _| Ok(name.into())).side_effect_free(),
        );
        actions
    }
}

#[test]
fn two_plugins_cannot_share_an_action_name() {
    let mut registry = PluginRegistry::new();
    registry
        .register(PluginExport::new(PluginInfo::new("a", "1.0.0")).implements::<dyn Actions>(Arc::new(Named("a"))))
        .expect("a");

    let err = registry
        .register(PluginExport::new(PluginInfo::new("b", "1.0.0")).implements::<dyn Actions>(Arc::new(Named("b"))))
        .unwrap_err();

    assert!(err.is(ErrorKind::Configuration));
    assert!(!registry.contains("b"));
    let action = registry.functions().action("site_status").expect("action");
    assert_eq!(
        action.call(&Context::anonymous(), &DataDict::new()).expect("call"),
        serde_json::Value::from("a")
    );
}

struct Previewer {
    quality: Option<u8>,
    template: &'static str,
}

impl ResourcePreview for Previewer {
    fn can_preview(&self, _data: &DataDict) -> PreviewSupport {
        match self.quality {
            Some(quality) => PreviewSupport::supported(quality),
            None => PreviewSupport::fixable("Enable resource_proxy"),
        }
    }

    fn preview_template(&self, _ctx: &Context, _data: &DataDict) -> String {
        self.template.to_string()
    }
}

#[test]
fn best_preview_wins_and_ties_keep_load_order() {
    let mut registry = PluginRegistry::new();
    for (name, quality, template) in [
        ("text", Some(1), "text.html"),
        ("pdf", None, "pdf.html"),
        ("recline", Some(3), "recline.html"),
        ("grid", Some(3), "grid.html"),
    ] {
        registry
            .register(
                PluginExport::new(PluginInfo::new(name, "1.0.0"))
                    .implements::<dyn ResourcePreview>(Arc::new(Previewer { quality, template })),
            )
            .expect("register");
    }
    let dispatcher = HookDispatcher::new(Arc::new(registry));
    let data = DataDict::new();

    let selected = dispatcher.select_preview(&data).expect("a preview");
    assert_eq!(selected.plugin.name, "recline");
    let (_, template) = selected.render(&Context::anonymous(), &data).expect("render");
    assert_eq!(template, "recline.html");

    assert_eq!(
        dispatcher.fixable_previews(&data),
        vec![("pdf".to_string(), "Enable resource_proxy".to_string())]
    );
}

struct Identifier(Option<&'static str>);

impl Authenticator for Identifier {
    fn identify(&self, _ctx: &Context) -> AppResult<Option<String>> {
        Ok(self.0.map(str::to_string))
    }
}

#[test]
fn first_identifying_plugin_wins() {
    let mut registry = PluginRegistry::new();
    for (name, user) in [("header", None), ("cookie", Some("alice")), ("token", Some("bob"))] {
        registry
            .register(
                PluginExport::new(PluginInfo::new(name, "1.0.0"))
                    .implements::<dyn Authenticator>(Arc::new(Identifier(user))),
            )
            .expect("register");
    }
    let dispatcher = HookDispatcher::new(Arc::new(registry));

    assert_eq!(
        dispatcher.identify(&Context::anonymous()).expect("identify"),
        Some("alice".to_string())
    );
}

struct Suffix(&'static str);

impl Configurer for Suffix {
    fn update_config(&self, mut settings: Settings) -> AppResult<Settings> {
        let trail = settings.get("trail").cloned().unwrap_or_default();
        settings.insert("trail".to_string(), format!("{trail}{}", self.0));
        Ok(settings)
    }
}

#[test]
fn configured_order_drives_dispatch_order() {
    let mut catalog = PluginCatalog::new();
    for name in ["x", "y", "z"] {
        catalog
            .register(name, move || {
                Ok(PluginExport::new(PluginInfo::new(name, "1.0.0"))
                    .implements::<dyn Configurer>(Arc::new(Suffix(name))))
            })
            .expect("catalog");
    }

    for (enabled, expected) in [(["x", "y", "z"], "xyz"), (["z", "x", "y"], "zxy")] {
        let config = datahub_core::config::AppConfig {
            plugins: datahub_core::config::PluginConfig {
                enabled: enabled.iter().map(|n| n.to_string()).collect(),
            },
            ..Default::default()
        };

        let loaded = datahub_plugin::bootstrap(&catalog, &config).expect("bootstrap");

        assert_eq!(loaded.settings["trail"], expected);
        let order: Vec<&str> = loaded.registry.plugins().map(|p| p.name.as_str()).collect();
        assert_eq!(order, enabled.to_vec());
    }
}
