// SPDX-License-Identifier: MIT OR Apache-2.0
//! RFC 7396 JSON Merge Patch
//!
//! A merge patch is an ordinary document. Objects merge recursively, `null`
//! deletes a member and anything else replaces what was there. Because `null`
//! means deletion, no merge patch can produce a document holding a `null`
//! object member.

use ogham_core::{JsonObject, Value};

/// Apply the merge patch `patch` to `target`.
///
/// A non-object patch replaces the target outright. An object patch is
/// merged into the target if it is an object, or into an empty object
/// otherwise. Members of the target the patch does not mention keep their
/// position; new members are appended in patch order.
#[must_use]
pub fn json_merge_patch(target: &Value, patch: &Value) -> Value {
    let Value::Object(changes) = patch else {
        return patch.clone();
    };
    let empty = JsonObject::empty();
    let base = match target {
        Value::Object(object) => object,
        _ => &empty,
    };
    Value::Object(merge_objects(base, changes))
}

fn merge_objects(base: &JsonObject, changes: &JsonObject) -> JsonObject {
    let kept = base.iter().filter_map(|(key, current)| match changes.get(key) {
        None => Some((key, current.clone())),
        Some(Value::Null) => None,
        Some(change) => Some((key, json_merge_patch(current, change))),
    });
    let added = changes
        .iter()
        .filter(|(key, change)| !change.is_null() && !base.contains_key(key))
        .map(|(key, change)| (key, json_merge_patch(&Value::Null, change)));
    kept.chain(added).collect()
}

/// Compute a merge patch turning `source` into `target`.
///
/// Members removed from the source become `null`, changed members recurse
/// when both sides are objects and are otherwise copied from the target,
/// unchanged members are omitted. Applying the result to `source` yields
/// `target` whenever `target` holds no `null` object members.
#[must_use]
pub fn json_merge_diff(source: &Value, target: &Value) -> Value {
    match (source, target) {
        (Value::Object(from), Value::Object(to)) => {
            let changed = from.iter().filter_map(|(key, old)| match to.get(key) {
                None => Some((key, Value::Null)),
                Some(new) if new == old => None,
                Some(new) => Some((key, json_merge_diff(old, new))),
            });
            let added = to
                .iter()
                .filter(|(key, _)| !from.contains_key(key))
                .map(|(key, new)| (key, new.clone()));
            Value::Object(changed.chain(added).collect())
        }
        _ => target.clone(),
    }
}

/// Apply several merge patches in order
#[must_use]
pub fn merge_many<'a, I>(base: &Value, patches: I) -> Value
where
    I: IntoIterator<Item = &'a Value>,
{
    let merged = patches
        .into_iter()
        .fold(base.clone(), |doc, patch| json_merge_patch(&doc, patch));
    tracing::debug!(kind = %merged.kind(), "applied merge patches");
    merged
}
