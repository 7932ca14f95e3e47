//! # Canonical JSON
//!
//! Every signature and hash in the protocol depends on both sides producing
//! byte-identical serializations of the same logical value. This module is
//! the single authoritative implementation; nothing downstream re-derives
//! canonical bytes independently.
//!
//! ## Rules
//!
//! - Object keys are sorted recursively by Unicode code point.
//! - Array element order is preserved.
//! - Numbers, strings, booleans, and null use the standard `serde_json`
//!   rendering.
//! - No insignificant whitespace.
//!
//! This crate intentionally does **not** enable `serde_json`'s
//! `preserve_order` feature: with it disabled, `serde_json::Map` is backed
//! by a `BTreeMap`, which already sorts keys on insertion at every nesting
//! level. `canonicalize` relies on that and is property-tested against
//! round-tripping and against key-order-independence fixtures in `tests`.

use serde::Serialize;
use serde_json::Value;

use super::errors::IdentityError;

/// Serializes `value` to its canonical JSON byte representation.
///
/// # Errors
///
/// Returns [`IdentityError::NotCanonicalizable`] if `value` cannot be
/// represented as JSON (e.g. a float that is NaN or infinite).
pub fn canonicalize<T: Serialize>(value: &T) -> Result<Vec<u8>, IdentityError> {
    let as_value =
        serde_json::to_value(value).map_err(|e| IdentityError::NotCanonicalizable(e.to_string()))?;
    let normalized = normalize(as_value);
    serde_json::to_vec(&normalized).map_err(|e| IdentityError::NotCanonicalizable(e.to_string()))
}

/// Recursively rebuilds a [`Value`], forcing object key order to follow the
/// `BTreeMap` sort the rest of the pipeline relies on even if some upstream
/// producer constructed the `Value` with `preserve_order` semantics.
fn normalize(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut sorted = serde_json::Map::new();
            let mut entries: Vec<(String, Value)> = map.into_iter().collect();
            entries.sort_by(|a, b| a.0.cmp(&b.0));
            for (k, v) in entries {
                sorted.insert(k, normalize(v));
            }
            Value::Object(sorted)
        }
        Value::Array(items) => Value::Array(items.into_iter().map(normalize).collect()),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn sorts_object_keys_recursively() {
        let value = json!({"b": 1, "a": {"z": 1, "y": 2}, "c": [3, 2, 1]});
        let bytes = canonicalize(&value).unwrap();
        let s = String::from_utf8(bytes).unwrap();
        assert_eq!(s, r#"{"a":{"y":2,"z":1},"b":1,"c":[3,2,1]}"#);
    }

    #[test]
    fn preserves_array_order() {
        let value = json!([5, 4, 3, 2, 1]);
        let bytes = canonicalize(&value).unwrap();
        assert_eq!(String::from_utf8(bytes).unwrap(), "[5,4,3,2,1]");
    }

    #[test]
    fn no_insignificant_whitespace() {
        let value = json!({"a": 1, "b": "x"});
        let bytes = canonicalize(&value).unwrap();
        assert!(!String::from_utf8(bytes).unwrap().contains(' '));
    }

    proptest! {
        #[test]
        fn canonical_stability(a in any::<i64>(), b in "[a-zA-Z0-9]{0,16}", c in any::<bool>()) {
            let value = json!({"b": b, "a": a, "c": c});
            let once = canonicalize(&value).unwrap();
            let reparsed: Value = serde_json::from_slice(&once).unwrap();
            let twice = canonicalize(&reparsed).unwrap();
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn key_insertion_order_does_not_matter(a in any::<i64>(), b in any::<i64>()) {
            let first = json!({"x": a, "y": b});
            let second = json!({"y": b, "x": a});
            prop_assert_eq!(canonicalize(&first).unwrap(), canonicalize(&second).unwrap());
        }
    }
}
