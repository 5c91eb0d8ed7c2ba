//! Recursive deep merge for domain documents.

use serde_json::Value;

/// Merges `incoming` into `target`.
///
/// Two JSON objects merge key by key, recursively. Any other pairing
/// overwrites the target leaf with the incoming value; an explicit
/// `null` overwrites too, it never deletes the key. Keys absent from
/// `incoming` are left untouched, so a patch can only grow or rewrite
/// a document, never shrink it.
pub fn deep_merge(target: &mut Value, incoming: Value) {
    match (target, incoming) {
        (Value::Object(existing), Value::Object(incoming)) => {
            for (key, value) in incoming {
                match existing.get_mut(&key) {
                    Some(slot) => deep_merge(slot, value),
                    None => {
                        existing.insert(key, value);
                    }
                }
            }
        }
        (target, incoming) => *target = incoming,
    }
}
