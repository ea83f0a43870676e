//! JSON output formatting.

use serde::Serialize;

/// Format a value as a single line of JSON.
pub fn format_json<T: Serialize + ?Sized>(value: &T) -> serde_json::Result<String> {
    serde_json::to_string(value)
}
