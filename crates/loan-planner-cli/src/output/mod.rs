pub mod csv_out;
pub mod json;
pub mod minimal;
pub mod table;

use crate::OutputFormat;
use serde_json::{Map, Value};

/// Dispatch output to the appropriate formatter.
pub fn format_output(format: &OutputFormat, value: &Value) {
    match format {
        OutputFormat::Json => json::print_json(value),
        OutputFormat::Table => table::print_table(value),
        OutputFormat::Csv => csv_out::print_csv(value),
        OutputFormat::Minimal => minimal::print_minimal(value),
    }
}

/// Shape of a command result, as the tabular formatters see it.
pub(crate) enum Layout<'a> {
    /// Uniform records (schedule ledgers, scenario comparisons).
    Rows(&'a [Value]),
    /// A single record rendered as field/value pairs.
    Fields(&'a Map<String, Value>),
    Scalar(&'a Value),
}

pub(crate) fn layout(value: &Value) -> Layout<'_> {
    match value {
        Value::Array(rows) => Layout::Rows(rows),
        Value::Object(map) => match map.get("result") {
            Some(Value::Object(result)) => Layout::Fields(result),
            _ => Layout::Fields(map),
        },
        other => Layout::Scalar(other),
    }
}

/// Column headers taken from the first record.
pub(crate) fn headers(rows: &[Value]) -> Vec<String> {
    match rows.first() {
        Some(Value::Object(first)) => first.keys().cloned().collect(),
        _ => Vec::new(),
    }
}

/// One record's cells in header order.
pub(crate) fn record(row: &Value, headers: &[String]) -> Vec<String> {
    match row {
        Value::Object(map) => headers
            .iter()
            .map(|h| map.get(h).map(cell).unwrap_or_default())
            .collect(),
        other => vec![cell(other)],
    }
}

/// Render a JSON value as a single cell.
pub(crate) fn cell(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        Value::Array(items) if items.iter().all(|v| !v.is_object() && !v.is_array()) => {
            items.iter().map(cell).collect::<Vec<_>>().join(", ")
        }
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}
