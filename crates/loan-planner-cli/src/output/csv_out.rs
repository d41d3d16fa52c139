use serde_json::Value;
use std::io::{self, Write};

use super::{cell, headers, layout, record, Layout};

/// Write output as CSV to stdout.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    if let Err(e) = write_csv(stdout.lock(), value) {
        eprintln!("CSV write error: {}", e);
    }
}

fn write_csv<W: Write>(out: W, value: &Value) -> csv::Result<()> {
    let mut wtr = csv::Writer::from_writer(out);

    match layout(value) {
        Layout::Rows(rows) => {
            let headers = headers(rows);
            if !headers.is_empty() {
                wtr.write_record(&headers)?;
            }
            for row in rows {
                wtr.write_record(record(row, &headers))?;
            }
        }
        Layout::Fields(fields) => {
            wtr.write_record(["field", "value"])?;
            for (key, val) in fields {
                wtr.write_record([key.as_str(), cell(val).as_str()])?;
            }
        }
        Layout::Scalar(v) => wtr.write_record([cell(v)])?,
    }

    wtr.flush()?;
    Ok(())
}
