//! Deterministic canonical JSON.
//!
//! Checksums are computed over this text, so its output for a given value
//! must never change:
//! - object members sorted by ordinal (byte-wise) name, recursively
//! - `null` members omitted
//! - array order preserved
//! - compact, no insignificant whitespace
//!
//! Enumerations and timestamps get their canonical string forms from the
//! record's serde attributes before reaching this module.
//!
//! The writer walks the tree itself instead of relying on the iteration
//! order of `serde_json::Map`, which depends on crate features.

use serde::Serialize;
use serde_json::Value;

/// Returned in place of output when serialization faults.
///
/// Callers must treat it as an error sentinel, not as a valid payload.
pub const EMPTY_OBJECT: &str = "{}";

/// Serializes `value` to canonical JSON text.
///
/// Never fails: any internal fault yields [`EMPTY_OBJECT`].
#[must_use]
pub fn canonicalize<T>(value: &T) -> String
where
    T: Serialize + ?Sized,
{
    match serde_json::to_value(value) {
        Ok(tree) => canonicalize_value(&tree),
        Err(_) => EMPTY_OBJECT.to_string(),
    }
}

/// Renders an already-parsed JSON tree as canonical text.
#[must_use]
pub fn canonicalize_value(value: &Value) -> String {
    if value.is_null() {
        return EMPTY_OBJECT.to_string();
    }
    let mut out = String::new();
    match write_value(value, &mut out) {
        Ok(()) => out,
        Err(_) => EMPTY_OBJECT.to_string(),
    }
}

/// Returns true if `text` is the fault sentinel.
#[must_use]
pub fn is_sentinel(text: &str) -> bool {
    text == EMPTY_OBJECT
}

fn write_value(value: &Value, out: &mut String) -> serde_json::Result<()> {
    match value {
        Value::Null => out.push_str("null"),
        Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Value::Number(n) => out.push_str(&n.to_string()),
        Value::String(s) => out.push_str(&serde_json::to_string(s)?),
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_value(item, out)?;
            }
            out.push(']');
        }
        Value::Object(map) => {
            let mut members: Vec<(&String, &Value)> =
                map.iter().filter(|(_, v)| !v.is_null()).collect();
            // Ordinal comparison: str ordering is byte-wise on UTF-8.
            members.sort_by(|a, b| a.0.cmp(b.0));

            out.push('{');
            for (i, (name, member)) in members.into_iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                out.push_str(&serde_json::to_string(name)?);
                out.push(':');
                write_value(member, out)?;
            }
            out.push('}');
        }
    }
    Ok(())
}
