//! Schema-driven validation used when a form plugin does not override
//! `validate`, and the core validators schemas can name.

use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::Value;

use datahub_core::types::{Context, DataDict, Schema};

use crate::interfaces::{Validation, ValidationOutcome, ValidatorFn};
use crate::tables::FunctionTable;

/// Validates `data` against `schema`.
///
/// Fields are processed in schema order. Each field value (or `null` when
/// missing) runs through its validators in order; a validator may convert
/// the value, drop the field, or record an error, which stops the chain for
/// that field. Unknown validator names are recorded as errors. Fields that
/// the schema does not mention pass through unchanged.
pub fn validate(
    ctx: &Context,
    data: &DataDict,
    schema: &Schema,
    validators: &FunctionTable<ValidatorFn>,
) -> ValidationOutcome {
    let mut outcome = ValidationOutcome {
        data: data.clone(),
        errors: IndexMap::new(),
    };

    for (field, names) in schema {
        let mut value = outcome.data.get(field).cloned().unwrap_or(Value::Null);
        let mut keep = true;

        for name in names {
            let Some(validator) = validators.get(name) else {
                outcome
                    .errors
                    .entry(field.clone())
                    .or_default()
                    .push(format!("Unknown validator '{name}'"));
                keep = false;
                break;
            };

            match validator(std::mem::take(&mut value), ctx) {
                Ok(Validation::Value(converted)) => value = converted,
                Ok(Validation::Skip) => {
                    outcome.data.remove(field);
                    keep = false;
                    break;
                }
                Err(message) => {
                    outcome.errors.entry(field.clone()).or_default().push(message);
                    keep = false;
                    break;
                }
            }
        }

        if keep {
            outcome.data.insert(field.clone(), value);
        }
    }

    outcome
}

/// The core validators, by name.
pub fn core_validators() -> IndexMap<String, ValidatorFn> {
    let mut validators: IndexMap<String, ValidatorFn> = IndexMap::new();

    validators.insert(
        "ignore_missing".to_string(),
        Arc::new(|value, _| match &value {
            Value::Null => Ok(Validation::Skip),
            Value::String(s) if s.is_empty() => Ok(Validation::Skip),
            _ => Ok(Validation::Value(value)),
        }),
    );
    validators.insert(
        "not_empty".to_string(),
        Arc::new(|value, _| match &value {
            Value::Null => Err("Missing value".to_string()),
            Value::String(s) if s.trim().is_empty() => Err("Missing value".to_string()),
            Value::Array(items) if items.is_empty() => Err("Missing value".to_string()),
            _ => Ok(Validation::Value(value)),
        }),
    );
    validators.insert(
        "unicode_safe".to_string(),
        Arc::new(|value, _| match value {
            Value::String(_) | Value::Null => Ok(Validation::Value(value)),
            Value::Number(n) => Ok(Validation::Value(Value::String(n.to_string()))),
            Value::Bool(b) => Ok(Validation::Value(Value::String(b.to_string()))),
            _ => Err("Must be a string".to_string()),
        }),
    );
    validators.insert(
        "strip_value".to_string(),
        Arc::new(|value, _| match value {
            Value::String(s) => Ok(Validation::Value(Value::String(s.trim().to_string()))),
            other => Ok(Validation::Value(other)),
        }),
    );
    validators.insert(
        "int_validator".to_string(),
        Arc::new(|value, _| match &value {
            Value::Null => Ok(Validation::Value(value)),
            Value::Number(n) if n.is_i64() => Ok(Validation::Value(value)),
            Value::String(s) => s
                .trim()
                .parse::<i64>()
                .map(|n| Validation::Value(Value::from(n)))
                .map_err(|_| "Invalid integer".to_string()),
            _ => Err("Invalid integer".to_string()),
        }),
    );
    validators.insert(
        "boolean_validator".to_string(),
        Arc::new(|value, _| match &value {
            Value::Null => Ok(Validation::Value(Value::Bool(false))),
            Value::Bool(_) => Ok(Validation::Value(value)),
            Value::String(s) => Ok(Validation::Value(Value::Bool(matches!(
                s.to_lowercase().as_str(),
                "true" | "yes" | "t" | "y" | "1" | "on"
            )))),
            Value::Number(n) => Ok(Validation::Value(Value::Bool(n.as_i64() == Some(1)))),
            _ => Err("Invalid boolean".to_string()),
        }),
    );

    validators
}

#[cfg(test)]
mod tests {
    use super::*;
    use datahub_core::types::dict::schema;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn table() -> FunctionTable<ValidatorFn> {
        FunctionTable::with_core("validator", core_validators())
    }

    fn dict(value: Value) -> DataDict {
        datahub_core::types::dict::data_dict(value).expect("object")
    }

    #[test]
    fn test_valid_data_is_converted() {
        let schema = schema([
            ("name", vec!["not_empty", "strip_value"]),
            ("num_resources", vec!["ignore_missing", "int_validator"]),
            ("private", vec!["boolean_validator"]),
        ]);
        let data = dict(json!({"name": "  census ", "num_resources": "3", "extra": 1}));

        let outcome = validate(&Context::anonymous(), &data, &schema, &table());

        assert!(outcome.is_valid());
        assert_eq!(
            Value::Object(outcome.data),
            json!({"name": "census", "num_resources": 3, "extra": 1, "private": false})
        );
    }

    #[test]
    fn test_ignore_missing_drops_field() {
        let schema = schema([("notes", vec!["ignore_missing", "unicode_safe"])]);
        let data = dict(json!({"notes": ""}));

        let outcome = validate(&Context::anonymous(), &data, &schema, &table());

        assert!(outcome.is_valid());
        assert!(!outcome.data.contains_key("notes"));
    }

    #[test]
    fn test_errors_are_collected_per_field() {
        let schema = schema([
            ("name", vec!["not_empty"]),
            ("count", vec!["int_validator"]),
            ("title", vec!["no_such_validator"]),
        ]);
        let data = dict(json!({"count": "many", "title": "x"}));

        let outcome = validate(&Context::anonymous(), &data, &schema, &table());

        let fields: Vec<&str> = outcome.errors.keys().map(String::as_str).collect();
        assert_eq!(fields, vec!["name", "count", "title"]);
        assert_eq!(outcome.errors["name"], vec!["Missing value".to_string()]);
        assert_eq!(
            outcome.errors["title"],
            vec!["Unknown validator 'no_such_validator'".to_string()]
        );
    }

    #[test]
    fn test_later_validators_see_converted_value() {
        let mut validators = table();
        validators.insert_core(
            "double",
            Arc::new(|value: Value, _: &Context| match value.as_i64() {
                Some(n) => Ok(Validation::Value(json!(n * 2))),
                None => Err(format!("Expected a number, got {value}")),
            }),
        );
        validators.insert_core(
            "at_most_ten",
            Arc::new(|value: Value, _: &Context| match value.as_i64() {
                Some(n) if n > 10 => Err(format!("{n} is more than 10")),
                _ => Ok(Validation::Value(value)),
            }),
        );
        let schema = schema([
            ("small", vec!["int_validator", "double", "at_most_ten"]),
            ("large", vec!["int_validator", "double", "at_most_ten"]),
        ]);
        let data = dict(json!({"small": "4", "large": "6"}));

        let outcome = validate(&Context::anonymous(), &data, &schema, &validators);

        assert_eq!(outcome.data["small"], json!(8));
        assert_eq!(outcome.errors["large"], vec!["12 is more than 10".to_string()]);
        assert_eq!(outcome.data["large"], json!("6"));
        assert!(!outcome.errors.contains_key("small"));
    }
}
