use serde_json::Value;
use tabled::{builder::Builder, Table};

use super::{cell, headers, layout, record, Layout};

/// Format output as a table using the tabled crate.
pub fn print_table(value: &Value) {
    match layout(value) {
        Layout::Rows(rows) if rows.is_empty() => println!("(empty)"),
        Layout::Rows(rows) => {
            let headers = headers(rows);
            let mut builder = Builder::default();
            if !headers.is_empty() {
                builder.push_record(headers.clone());
            }
            for row in rows {
                builder.push_record(record(row, &headers));
            }
            println!("{}", Table::from(builder));
        }
        Layout::Fields(fields) => {
            let mut builder = Builder::default();
            builder.push_record(["Field", "Value"]);
            for (key, val) in fields {
                builder.push_record([key.clone(), cell(val)]);
            }
            println!("{}", Table::from(builder));
            print_envelope_notes(value);
        }
        Layout::Scalar(v) => println!("{}", cell(v)),
    }
}

/// Warnings and methodology from a computation envelope, if present.
fn print_envelope_notes(value: &Value) {
    if let Some(Value::Array(warnings)) = value.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings.iter().filter_map(Value::as_str) {
                println!("  - {}", w);
            }
        }
    }
    if let Some(Value::String(meth)) = value.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}
