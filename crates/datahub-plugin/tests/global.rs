//! The process-wide registry slot.
//!
//! Everything runs in one test because the slot is shared by every test in
//! this binary.

use std::sync::Arc;

use datahub_core::error::ErrorKind;
use datahub_plugin::prelude::*;
use datahub_plugin::{HookDispatcher, PluginRegistry, global};

struct Renamer;

impl Facets for Renamer {
    fn dataset_facets(&self, mut facets: FacetsDict, _package_type: &str) -> AppResult<FacetsDict> {
        facets.insert("groups".to_string(), "Publishers".to_string());
        Ok(facets)
    }
}

#[test]
fn install_current_and_reset() {
    global::reset();
    assert!(!global::is_installed());
    assert!(global::current().unwrap_err().is(ErrorKind::Configuration));
    assert!(HookDispatcher::current().is_err());

    let mut registry = PluginRegistry::new();
    registry
        .register(
            PluginExport::new(PluginInfo::new("renamer", "1.0.0"))
                .implements::<dyn Facets>(Arc::new(Renamer)),
        )
        .expect("register");
    let registry = Arc::new(registry);

    global::install(Arc::clone(&registry)).expect("install");
    assert!(global::is_installed());
    assert!(Arc::ptr_eq(&global::current().expect("current"), &registry));

    let facets = HookDispatcher::current()
        .expect("dispatcher")
        .dataset_facets("dataset")
        .expect("facets");
    assert_eq!(facets["groups"], "Publishers");

    let err = global::install(Arc::new(PluginRegistry::new())).unwrap_err();
    assert!(err.is(ErrorKind::Configuration));
    assert!(Arc::ptr_eq(&global::current().expect("current"), &registry));

    let previous = global::reset().expect("previous registry");
    assert!(Arc::ptr_eq(&previous, &registry));
    assert!(!global::is_installed());
    assert!(global::reset().is_none());

    global::install(Arc::new(PluginRegistry::new())).expect("install after reset");
    assert!(global::current().expect("current").is_empty());
    global::reset();
}
