// SPDX-License-Identifier: MIT OR Apache-2.0
//! Patch generation
//!
//! [`json_diff`] walks both documents together and records the operations
//! that turn the source into the target. Containers of the same kind are
//! compared member by member; anything else that differs is replaced whole.

use ogham_core::{JsonArray, JsonObject, JsonPointer, Value};

use crate::patch::{JsonPatch, PatchOperation};

/// Compute a patch transforming `source` into `target`.
///
/// The output is deterministic: object members are visited in source order,
/// then members only present in the target in target order. Array elements
/// are compared by index, extra target elements are appended in ascending
/// order and surplus source elements are removed from the end.
#[must_use]
pub fn json_diff(source: &Value, target: &Value) -> JsonPatch {
    let mut operations = Vec::new();
    diff_values(&JsonPointer::root(), source, target, &mut operations);
    tracing::debug!(operations = operations.len(), "computed diff");
    JsonPatch::from(operations)
}

fn diff_values(path: &JsonPointer, source: &Value, target: &Value, ops: &mut Vec<PatchOperation>) {
    if source == target {
        return;
    }
    match (source, target) {
        (Value::Object(from), Value::Object(to)) => diff_objects(path, from, to, ops),
        (Value::Array(from), Value::Array(to)) => diff_arrays(path, from, to, ops),
        _ => ops.push(PatchOperation::Replace {
            path: path.clone(),
            value: target.clone(),
        }),
    }
}

fn diff_objects(
    path: &JsonPointer,
    source: &JsonObject,
    target: &JsonObject,
    ops: &mut Vec<PatchOperation>,
) {
    for (key, old) in source.iter() {
        let member = path.child(key);
        match target.get(key) {
            Some(new) => diff_values(&member, old, new, ops),
            None => ops.push(PatchOperation::Remove { path: member }),
        }
    }
    for (key, new) in target.iter() {
        if !source.contains_key(key) {
            ops.push(PatchOperation::Add {
                path: path.child(key),
                value: new.clone(),
            });
        }
    }
}

fn diff_arrays(
    path: &JsonPointer,
    source: &JsonArray,
    target: &JsonArray,
    ops: &mut Vec<PatchOperation>,
) {
    let common = source.len().min(target.len());
    for (index, (old, new)) in source.iter().zip(target.iter()).enumerate() {
        diff_values(&path.child(index.to_string()), old, new, ops);
    }
    for (index, new) in target.iter().enumerate().skip(common) {
        ops.push(PatchOperation::Add {
            path: path.child(index.to_string()),
            value: new.clone(),
        });
    }
    for index in (common..source.len()).rev() {
        ops.push(PatchOperation::Remove {
            path: path.child(index.to_string()),
        });
    }
}
