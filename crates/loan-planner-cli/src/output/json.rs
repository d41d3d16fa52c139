use serde_json::Value;
use std::io::{self, Write};

/// Pretty-print JSON to stdout.
pub fn print_json(value: &Value) {
    let stdout = io::stdout();
    if let Err(e) = write_json(stdout.lock(), value) {
        eprintln!("JSON write error: {}", e);
    }
}

/// Pretty JSON followed by a newline. Keys keep insertion order, so envelopes
/// print in the order they were built.
fn write_json<W: Write>(mut out: W, value: &Value) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut out, value)?;
    writeln!(out)?;
    out.flush()
}
