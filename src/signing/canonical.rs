//! Deterministic JSON encoding for signing
//!
//! Object keys are emitted in sorted order at every depth, with no whitespace,
//! so signer and verifier derive identical bytes regardless of field order.
//! Output does not depend on serde_json's `preserve_order` feature.

use serde::Serialize;
use serde_json::Value;

/// Field excluded from the signed bytes
pub const SIGNATURE_FIELD: &str = "signature";

/// Compact, key-sorted JSON text of `value`
pub fn to_canonical_string(value: &Value) -> String {
    let mut out = String::new();
    write_value(&mut out, value);
    out
}

/// Bytes that get hashed and signed: the payload with any top-level
/// `signature` field removed, canonically encoded.
pub fn signing_bytes<T: Serialize>(payload: &T) -> Result<Vec<u8>, serde_json::Error> {
    let mut value = serde_json::to_value(payload)?;
    if let Value::Object(map) = &mut value {
        map.remove(SIGNATURE_FIELD);
    }
    Ok(to_canonical_string(&value).into_bytes())
}

fn write_value(out: &mut String, value: &Value) {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(&String, &Value)> = map.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));

            out.push('{');
            for (i, (key, val)) in entries.into_iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                // String serialization is infallible
                out.push_str(&Value::String(key.clone()).to_string());
                out.push(':');
                write_value(out, val);
            }
            out.push('}');
        }
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_value(out, item);
            }
            out.push(']');
        }
        scalar => out.push_str(&scalar.to_string()),
    }
}
