//! Reading JSON documents from files or stdin.

use serde_json::Value;
use std::error::Error;
use std::io::{self, Read};
use tracing::debug;

/// Source name that selects stdin.
pub const STDIN: &str = "-";

/// Reads and parses a JSON document from `source`, or stdin when `source`
/// is `None` or `-`.
pub fn read_json(source: Option<&str>) -> Result<Value, Box<dyn Error>> {
    let label = source.unwrap_or(STDIN);
    let text = if label == STDIN {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        buffer
    } else {
        std::fs::read_to_string(label)
            .map_err(|e| format!("Failed to read file {}: {}", label, e))?
    };
    debug!(source = label, bytes = text.len(), "read JSON input");

    let value =
        serde_json::from_str(&text).map_err(|e| format!("Invalid JSON in {}: {}", label, e))?;
    Ok(value)
}

/// Rejects more than one document being read from stdin.
pub fn ensure_single_stdin(sources: &[&str]) -> Result<(), Box<dyn Error>> {
    if sources.iter().filter(|s| **s == STDIN).count() > 1 {
        return Err("only one input may be read from stdin".into());
    }
    Ok(())
}
