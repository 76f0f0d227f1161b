//! Conversion between nested JSON localization trees and ordered lists of
//! dotted `key = value` leaves.
//!
//! Key order is taken from the parsed document (serde_json is built with
//! `preserve_order`), so a round-trip keeps every object level in the order
//! it was written.

use serde_json::{Map, Value};

use crate::{FlatEntry, LocSyncError};

/// Flatten a tree into `(dotted path, string value)` leaves in document order.
///
/// Strings are kept verbatim, numbers and booleans use their JSON text and
/// `null` becomes `"null"`. Arrays are walked like objects keyed by index.
/// A top-level scalar has no keys and flattens to nothing.
pub fn flatten(tree: &Value) -> Vec<FlatEntry> {
    let mut out = Vec::new();
    walk(tree, "", &mut out);
    out
}

fn walk(node: &Value, prefix: &str, out: &mut Vec<FlatEntry>) {
    match node {
        Value::Object(map) => {
            for (key, value) in map {
                visit(value, join(prefix, key), out);
            }
        }
        Value::Array(items) => {
            for (idx, value) in items.iter().enumerate() {
                visit(value, join(prefix, &idx.to_string()), out);
            }
        }
        _ => {}
    }
}

fn visit(value: &Value, path: String, out: &mut Vec<FlatEntry>) {
    match value {
        Value::Object(_) | Value::Array(_) => walk(value, &path, out),
        Value::String(s) => out.push(FlatEntry::new(path, s.as_str())),
        other => out.push(FlatEntry::new(path, other.to_string())),
    }
}

fn join(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{prefix}.{key}")
    }
}

/// Rebuild a nested object from dotted leaves, creating intermediate objects
/// in first-seen order.
///
/// A key that is a strict prefix of another (`a` next to `a.b`) is rejected
/// with [`LocSyncError::KeyConflict`] instead of overwriting either side.
/// Repeating the exact same key keeps the last value.
pub fn unflatten(entries: &[FlatEntry]) -> Result<Value, LocSyncError> {
    let mut root = Map::new();

    for entry in entries {
        let parts: Vec<&str> = entry.key.split('.').collect();
        let Some((leaf, parents)) = parts.split_last() else {
            continue;
        };

        let mut node = &mut root;
        for (depth, part) in parents.iter().enumerate() {
            let slot = node
                .entry((*part).to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            node = match slot {
                Value::Object(map) => map,
                _ => {
                    return Err(LocSyncError::KeyConflict {
                        key: entry.key.clone(),
                        other: parts[..=depth].join("."),
                    })
                }
            };
        }

        if let Some(Value::Object(existing)) = node.get(*leaf) {
            let other = existing
                .keys()
                .next()
                .map(|child| format!("{}.{child}", entry.key))
                .unwrap_or_else(|| entry.key.clone());
            return Err(LocSyncError::KeyConflict {
                key: entry.key.clone(),
                other,
            });
        }
        node.insert((*leaf).to_string(), Value::String(entry.value.clone()));
    }

    Ok(Value::Object(root))
}
