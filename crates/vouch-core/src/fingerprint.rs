//! Content fingerprinting for verified ("what you see is what you sign")
//! flows.
//!
//! A fingerprint is the SHA-256 digest of the canonical JSON rendering of
//! an action's exact parameter map, as lowercase hex. Canonical rendering
//! means object keys sorted lexicographically at every depth, compact
//! separators, and serde_json's number formatting. Both ends of a verified
//! flow must hash the same rendering, so the rendering rules here are the
//! wire contract: the backend's reported `content_hash` and a local
//! [`content_hash`] over the same key/value pairs agree bit-for-bit,
//! regardless of insertion order or computation site.

use serde_json::{Map, Value};
use sha2::{Digest, Sha256};

/// Compute the fingerprint of a parameter map.
#[must_use]
pub fn content_hash(params: &Map<String, Value>) -> String {
    let mut rendered = String::new();
    write_canonical(&Value::Object(params.clone()), &mut rendered);
    hex::encode(Sha256::digest(rendered.as_bytes()))
}

/// Render a JSON value in canonical form.
///
/// Exposed so callers can display exactly the bytes that were hashed.
#[must_use]
pub fn canonical_json(value: &Value) -> String {
    let mut rendered = String::new();
    write_canonical(value, &mut rendered);
    rendered
}

fn write_canonical(value: &Value, out: &mut String) {
    match value {
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            out.push('{');
            for (i, key) in keys.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                // Display for Value produces compact JSON, including string
                // escaping.
                out.push_str(&Value::String((*key).clone()).to_string());
                out.push(':');
                if let Some(child) = map.get(*key) {
                    write_canonical(child, out);
                }
            }
            out.push('}');
        },
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_canonical(item, out);
            }
            out.push(']');
        },
        other => out.push_str(&other.to_string()),
    }
}
