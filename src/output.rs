//! Table and JSON output formatting for CLI commands.

use serde::Serialize;
use serde_json::Value;
use tabled::{Table, Tabled};

/// Output format selection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    #[default]
    Table,
    /// JSON output
    Json,
}

/// Print rows in the selected format, or `empty` when there are none
pub fn print_list<T: Serialize + Tabled>(items: &[T], format: OutputFormat, empty: &str) {
    match format {
        OutputFormat::Table if items.is_empty() => print_warning(empty),
        OutputFormat::Table => println!("{}", Table::new(items)),
        OutputFormat::Json => print_json(&items),
    }
}

/// Print a single value in the selected format.
///
/// In table format, objects print one `key: value` line per entry and
/// arrays one line per element.
pub fn print_item<T: Serialize>(item: &T, format: OutputFormat) {
    if format == OutputFormat::Json {
        print_json(item);
        return;
    }

    match serde_json::to_value(item) {
        Ok(Value::Object(map)) => {
            for (key, value) in &map {
                print_kv(key, &scalar(value));
            }
        }
        Ok(Value::Array(items)) => {
            for value in &items {
                println!("  {}", scalar(value));
            }
        }
        Ok(value) => println!("{}", scalar(&value)),
        Err(e) => print_error(&format!("Failed to render output: {e}")),
    }
}

fn print_json<T: Serialize + ?Sized>(item: &T) {
    match serde_json::to_string_pretty(item) {
        Ok(json) => println!("{json}"),
        Err(e) => print_error(&format!("Failed to render output: {e}")),
    }
}

/// Strings print bare; everything else as compact JSON.
fn scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "-".to_string(),
        other => other.to_string(),
    }
}

/// Print a success message
pub fn print_success(msg: &str) {
    println!("✓ {msg}");
}

/// Print a warning message
pub fn print_warning(msg: &str) {
    println!("⚠ {msg}");
}

/// Print an error message
pub fn print_error(msg: &str) {
    eprintln!("✗ {msg}");
}

/// Print a key-value pair
pub fn print_kv(key: &str, value: &str) {
    println!("  {:<24} {}", format!("{key}:"), value);
}
