//! Mapping types that flow through plugin hooks.
//!
//! Hooks treat these as opaque payloads: the registry never looks inside a
//! [`DataDict`], it only hands it from one plugin to the next.

use indexmap::IndexMap;
use serde_json::{Map, Value};

/// A dataset, group, resource, or search payload.
pub type DataDict = Map<String, Value>;

/// Ordered facet key → display label.
///
/// Re-inserting an existing key replaces the label and keeps the key's
/// position, so facet order only changes when a new key is appended.
pub type FacetsDict = IndexMap<String, String>;

/// Ordered field name → validator names applied to that field.
pub type Schema = IndexMap<String, Vec<String>>;

/// Ordered field name → validation error messages for that field.
pub type ErrorDict = IndexMap<String, Vec<String>>;

/// Flat configuration settings handed to configurer plugins.
pub type Settings = IndexMap<String, String>;

/// Builds a [`FacetsDict`] from `(key, label)` pairs, preserving order.
pub fn facets<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> FacetsDict {
    pairs
        .into_iter()
        .map(|(key, label)| (key.to_string(), label.to_string()))
        .collect()
}

/// Builds a [`Schema`] from `(field, validators)` pairs, preserving order.
pub fn schema<'a, V>(pairs: impl IntoIterator<Item = (&'a str, V)>) -> Schema
where
    V: IntoIterator<Item = &'a str>,
{
    pairs
        .into_iter()
        .map(|(field, validators)| {
            (
                field.to_string(),
                validators.into_iter().map(str::to_string).collect(),
            )
        })
        .collect()
}

/// Converts a JSON value into a [`DataDict`], rejecting non-objects.
pub fn data_dict(value: Value) -> Option<DataDict> {
    match value {
        Value::Object(map) => Some(map),
        _ => None,
    }
}
