//! Opaque pagination cursors: base64 of the JSON-encoded string form of a
//! value.

use base64::{engine::general_purpose::STANDARD, Engine as _};

pub fn encode_cursor<T: ToString>(value: T) -> String {
    let json = serde_json::Value::String(value.to_string()).to_string();
    STANDARD.encode(json)
}

/// Reverses [`encode_cursor`]. Any malformed input gives `None`.
pub fn decode_cursor(cursor: &str) -> Option<String> {
    let bytes = STANDARD.decode(cursor).ok()?;
    match serde_json::from_slice::<serde_json::Value>(&bytes).ok()? {
        serde_json::Value::String(value) => Some(value),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Offset encoded in `after`; 0 when absent or unparsable.
pub fn decode_offset(after: Option<&str>) -> usize {
    after
        .and_then(decode_cursor)
        .and_then(|value| value.parse().ok())
        .unwrap_or(0)
}
