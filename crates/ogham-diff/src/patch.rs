// SPDX-License-Identifier: MIT OR Apache-2.0
//! RFC 6902 JSON Patch
//!
//! A [`JsonPatch`] is an ordered list of [`PatchOperation`]s. Each operation
//! runs against the document produced by the one before it. If any operation
//! fails, [`JsonPatch::apply`] returns the error and no document; the input is
//! never modified because values are immutable.

use std::fmt;
use std::str::FromStr;

use ogham_core::{ErrorKind, JsonObject, JsonPointer, OghamError, Value};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Errors from parsing or applying a patch
#[derive(Debug, Error)]
pub enum PatchError {
    /// A `test` operation found a different value
    #[error("operation {index}: test failed at {path:?}: expected {expected}, found {actual}")]
    TestFailed {
        /// Position of the operation in the patch
        index: usize,
        /// Tested location
        path: String,
        /// Value the operation carried
        expected: Value,
        /// Value found in the document
        actual: Value,
    },

    /// The patch document is malformed
    #[error("invalid patch: {0}")]
    InvalidPatch(String),

    /// The `op` member names no known operation
    #[error("unknown patch operation {0:?}")]
    UnknownOperation(String),

    /// A `move` whose target lies inside its source
    #[error("operation {index}: cannot move {from:?} into its own child {path:?}")]
    MoveIntoDescendant {
        /// Position of the operation in the patch
        index: usize,
        /// Source location
        from: String,
        /// Target location
        path: String,
    },

    /// An operation failed to resolve or update its location
    #[error("operation {index} ({op}) failed: {source}")]
    Operation {
        /// Position of the operation in the patch
        index: usize,
        /// Kind of the failing operation
        op: OperationKind,
        /// Underlying failure
        #[source]
        source: OghamError,
    },
}

impl PatchError {
    /// Classify this error into the shared taxonomy
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::TestFailed { .. } => ErrorKind::PatchVerification,
            Self::InvalidPatch(_) | Self::UnknownOperation(_) => ErrorKind::Structural,
            Self::MoveIntoDescendant { .. } => ErrorKind::Resolution,
            Self::Operation { source, .. } => source.kind(),
        }
    }

    /// Index of the failing operation, if the failure happened while applying
    #[must_use]
    pub const fn index(&self) -> Option<usize> {
        match self {
            Self::TestFailed { index, .. }
            | Self::MoveIntoDescendant { index, .. }
            | Self::Operation { index, .. } => Some(*index),
            Self::InvalidPatch(_) | Self::UnknownOperation(_) => None,
        }
    }
}

/// Operation name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    /// Insert or overwrite
    Add,
    /// Delete an existing location
    Remove,
    /// Overwrite an existing location
    Replace,
    /// Remove from `from`, add at `path`
    Move,
    /// Add the value at `from` at `path`
    Copy,
    /// Compare the value at `path`
    Test,
}

impl OperationKind {
    /// Every operation, in RFC order
    pub const ALL: [Self; 6] = [
        Self::Add,
        Self::Remove,
        Self::Replace,
        Self::Move,
        Self::Copy,
        Self::Test,
    ];

    /// Name as written in patch documents
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Remove => "remove",
            Self::Replace => "replace",
            Self::Move => "move",
            Self::Copy => "copy",
            Self::Test => "test",
        }
    }
}

impl FromStr for OperationKind {
    type Err = PatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| PatchError::UnknownOperation(s.into()))
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One patch operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatchOperation {
    /// Insert `value` at `path`
    Add {
        /// Target location
        path: JsonPointer,
        /// Value to insert
        value: Value,
    },
    /// Delete the value at `path`
    Remove {
        /// Target location
        path: JsonPointer,
    },
    /// Overwrite the value at `path`
    Replace {
        /// Target location
        path: JsonPointer,
        /// New value
        value: Value,
    },
    /// Relocate the value at `from` to `path`
    Move {
        /// Source location
        from: JsonPointer,
        /// Target location
        path: JsonPointer,
    },
    /// Duplicate the value at `from` into `path`
    Copy {
        /// Source location
        from: JsonPointer,
        /// Target location
        path: JsonPointer,
    },
    /// Require the value at `path` to equal `value`
    Test {
        /// Tested location
        path: JsonPointer,
        /// Expected value
        value: Value,
    },
}

impl PatchOperation {
    /// Operation name
    #[must_use]
    pub const fn kind(&self) -> OperationKind {
        match self {
            Self::Add { .. } => OperationKind::Add,
            Self::Remove { .. } => OperationKind::Remove,
            Self::Replace { .. } => OperationKind::Replace,
            Self::Move { .. } => OperationKind::Move,
            Self::Copy { .. } => OperationKind::Copy,
            Self::Test { .. } => OperationKind::Test,
        }
    }

    /// Target location
    #[must_use]
    pub const fn path(&self) -> &JsonPointer {
        match self {
            Self::Add { path, .. }
            | Self::Remove { path }
            | Self::Replace { path, .. }
            | Self::Move { path, .. }
            | Self::Copy { path, .. }
            | Self::Test { path, .. } => path,
        }
    }

    /// Source location of `move` and `copy`
    #[must_use]
    pub const fn from(&self) -> Option<&JsonPointer> {
        match self {
            Self::Move { from, .. } | Self::Copy { from, .. } => Some(from),
            _ => None,
        }
    }

    /// Parse one entry of a patch document.
    ///
    /// # Errors
    ///
    /// [`PatchError::InvalidPatch`] when the entry is not an object or lacks a
    /// required member, [`PatchError::UnknownOperation`] for an unknown `op`.
    pub fn from_value(entry: &Value) -> Result<Self, PatchError> {
        let Value::Object(members) = entry else {
            return Err(PatchError::InvalidPatch(format!(
                "operation must be an object, found {}",
                entry.kind()
            )));
        };
        let op: OperationKind = member_str(members, "op")?.parse()?;
        let path = member_pointer(members, "path")?;
        Ok(match op {
            OperationKind::Add => Self::Add {
                path,
                value: member_value(members, op, "value")?,
            },
            OperationKind::Remove => Self::Remove { path },
            OperationKind::Replace => Self::Replace {
                path,
                value: member_value(members, op, "value")?,
            },
            OperationKind::Move => Self::Move {
                from: member_pointer(members, "from")?,
                path,
            },
            OperationKind::Copy => Self::Copy {
                from: member_pointer(members, "from")?,
                path,
            },
            OperationKind::Test => Self::Test {
                path,
                value: member_value(members, op, "value")?,
            },
        })
    }

    /// Render as a patch document entry
    #[must_use]
    pub fn to_value(&self) -> Value {
        let mut members = vec![
            ("op", Value::from(self.kind().as_str())),
            ("path", Value::from(self.path().to_string())),
        ];
        match self {
            Self::Add { value, .. } | Self::Replace { value, .. } | Self::Test { value, .. } => {
                members.push(("value", value.clone()));
            }
            Self::Move { from, .. } | Self::Copy { from, .. } => {
                members.push(("from", Value::from(from.to_string())));
            }
            Self::Remove { .. } => {}
        }
        Value::Object(members.into_iter().collect())
    }

    /// Apply to `doc`, returning the new document.
    ///
    /// # Errors
    ///
    /// Fails as described on [`JsonPatch::apply`]; `index` is used to label
    /// the error.
    pub fn apply(&self, doc: &Value, index: usize) -> Result<Value, PatchError> {
        let failed = |source| PatchError::Operation {
            index,
            op: self.kind(),
            source,
        };
        match self {
            Self::Add { path, value } => path.add(doc, value.clone()).map_err(failed),
            Self::Remove { path } => path.remove(doc).map_err(failed),
            Self::Replace { path, value } => path.replace(doc, value.clone()).map_err(failed),
            Self::Move { from, path } => {
                let moved = from.resolve(doc).map_err(failed)?.clone();
                if from == path {
                    return Ok(doc.clone());
                }
                if from.is_prefix_of(path) {
                    return Err(PatchError::MoveIntoDescendant {
                        index,
                        from: from.to_string(),
                        path: path.to_string(),
                    });
                }
                let without = from.remove(doc).map_err(failed)?;
                path.add(&without, moved).map_err(failed)
            }
            Self::Copy { from, path } => {
                let copied = from.resolve(doc).map_err(failed)?.clone();
                path.add(doc, copied).map_err(failed)
            }
            Self::Test { path, value } => {
                let actual = path.resolve(doc).map_err(failed)?;
                if actual == value {
                    Ok(doc.clone())
                } else {
                    Err(PatchError::TestFailed {
                        index,
                        path: path.to_string(),
                        expected: value.clone(),
                        actual: actual.clone(),
                    })
                }
            }
        }
    }
}

impl fmt::Display for PatchOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_value())
    }
}

fn member_str<'a>(members: &'a JsonObject, name: &str) -> Result<&'a str, PatchError> {
    let value = members
        .get(name)
        .ok_or_else(|| PatchError::InvalidPatch(format!("missing member {name:?}")))?;
    value.as_str().ok_or_else(|| {
        PatchError::InvalidPatch(format!(
            "member {name:?} must be a string, found {}",
            value.kind()
        ))
    })
}

fn member_pointer(members: &JsonObject, name: &str) -> Result<JsonPointer, PatchError> {
    JsonPointer::parse(member_str(members, name)?)
        .map_err(|e| PatchError::InvalidPatch(format!("member {name:?}: {e}")))
}

fn member_value(members: &JsonObject, op: OperationKind, name: &str) -> Result<Value, PatchError> {
    members
        .get(name)
        .cloned()
        .ok_or_else(|| PatchError::InvalidPatch(format!("{op} operation is missing {name:?}")))
}

/// An ordered list of patch operations
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JsonPatch {
    operations: Vec<PatchOperation>,
}

impl JsonPatch {
    /// Empty patch
    #[must_use]
    pub const fn new() -> Self {
        Self {
            operations: Vec::new(),
        }
    }

    /// Parse a patch document: an array of operation objects.
    ///
    /// # Errors
    ///
    /// [`PatchError::InvalidPatch`] when `doc` is not an array or an entry is
    /// malformed, [`PatchError::UnknownOperation`] for an unknown `op`.
    pub fn from_value(doc: &Value) -> Result<Self, PatchError> {
        let Value::Array(entries) = doc else {
            return Err(PatchError::InvalidPatch(format!(
                "patch must be an array, found {}",
                doc.kind()
            )));
        };
        let operations = entries
            .iter()
            .map(PatchOperation::from_value)
            .collect::<Result<_, _>>()?;
        Ok(Self { operations })
    }

    /// Render as a patch document
    #[must_use]
    pub fn to_value(&self) -> Value {
        self.operations.iter().map(PatchOperation::to_value).collect()
    }

    /// Operations in order
    #[must_use]
    pub fn operations(&self) -> &[PatchOperation] {
        &self.operations
    }

    /// Number of operations
    #[must_use]
    pub const fn len(&self) -> usize {
        self.operations.len()
    }

    /// Whether the patch has no operations
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Iterate over the operations
    pub fn iter(&self) -> std::slice::Iter<'_, PatchOperation> {
        self.operations.iter()
    }

    /// Append an operation
    pub fn push(&mut self, operation: PatchOperation) {
        self.operations.push(operation);
    }

    /// Append an `add`
    #[must_use]
    pub fn add(mut self, path: JsonPointer, value: impl Into<Value>) -> Self {
        self.push(PatchOperation::Add {
            path,
            value: value.into(),
        });
        self
    }

    /// Append a `remove`
    #[must_use]
    pub fn remove(mut self, path: JsonPointer) -> Self {
        self.push(PatchOperation::Remove { path });
        self
    }

    /// Append a `replace`
    #[must_use]
    pub fn replace(mut self, path: JsonPointer, value: impl Into<Value>) -> Self {
        self.push(PatchOperation::Replace {
            path,
            value: value.into(),
        });
        self
    }

    /// Append a `move`
    #[must_use]
    pub fn move_value(mut self, from: JsonPointer, path: JsonPointer) -> Self {
        self.push(PatchOperation::Move { from, path });
        self
    }

    /// Append a `copy`
    #[must_use]
    pub fn copy(mut self, from: JsonPointer, path: JsonPointer) -> Self {
        self.push(PatchOperation::Copy { from, path });
        self
    }

    /// Append a `test`
    #[must_use]
    pub fn test(mut self, path: JsonPointer, value: impl Into<Value>) -> Self {
        self.push(PatchOperation::Test {
            path,
            value: value.into(),
        });
        self
    }

    /// Apply every operation in order and return the final document.
    ///
    /// # Errors
    ///
    /// The first failing operation aborts the whole patch:
    /// [`PatchError::TestFailed`] for a `test` mismatch,
    /// [`PatchError::MoveIntoDescendant`] for a `move` into its own subtree,
    /// and [`PatchError::Operation`] when a location cannot be resolved or
    /// updated.
    pub fn apply(&self, target: &Value) -> Result<Value, PatchError> {
        let mut doc = target.clone();
        for (index, operation) in self.operations.iter().enumerate() {
            tracing::debug!(index, op = %operation.kind(), path = %operation.path(), "applying patch operation");
            doc = operation.apply(&doc, index)?;
        }
        Ok(doc)
    }

    /// Apply in place. `target` is left untouched when the patch fails.
    ///
    /// # Errors
    ///
    /// As [`JsonPatch::apply`].
    pub fn apply_to(&self, target: &mut Value) -> Result<(), PatchError> {
        *target = self.apply(target)?;
        Ok(())
    }
}

impl From<Vec<PatchOperation>> for JsonPatch {
    fn from(operations: Vec<PatchOperation>) -> Self {
        Self { operations }
    }
}

impl FromIterator<PatchOperation> for JsonPatch {
    fn from_iter<I: IntoIterator<Item = PatchOperation>>(iter: I) -> Self {
        Self {
            operations: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a JsonPatch {
    type Item = &'a PatchOperation;
    type IntoIter = std::slice::Iter<'a, PatchOperation>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl IntoIterator for JsonPatch {
    type Item = PatchOperation;
    type IntoIter = std::vec::IntoIter<PatchOperation>;

    fn into_iter(self) -> Self::IntoIter {
        self.operations.into_iter()
    }
}

impl TryFrom<&Value> for JsonPatch {
    type Error = PatchError;

    fn try_from(doc: &Value) -> Result<Self, Self::Error> {
        Self::from_value(doc)
    }
}

impl fmt::Display for JsonPatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_value())
    }
}

impl Serialize for JsonPatch {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for JsonPatch {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let doc = Value::deserialize(deserializer)?;
        Self::from_value(&doc).map_err(D::Error::custom)
    }
}

/// Apply `patch` to `target`.
///
/// # Errors
///
/// As [`JsonPatch::apply`].
pub fn apply_patch(target: &Value, patch: &JsonPatch) -> Result<Value, PatchError> {
    patch.apply(target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ogham_stream::from_str;

    fn json(text: &str) -> Value {
        from_str(text).unwrap()
    }

    fn ptr(text: &str) -> JsonPointer {
        text.parse().unwrap()
    }

    fn patch(text: &str) -> JsonPatch {
        JsonPatch::from_value(&json(text)).unwrap()
    }

    #[test]
    fn test_replace_member() {
        let result = patch(r#"[{"op":"replace","path":"/a","value":2}]"#)
            .apply(&json(r#"{"a":1}"#))
            .unwrap();
        assert_eq!(result, json(r#"{"a":2}"#));
    }

    #[test]
    fn test_add_variants() {
        let doc = json(r#"{"list":[1,2]}"#);
        let p = JsonPatch::new()
            .add(ptr("/list/0"), 0)
            .add(ptr("/list/-"), 3)
            .add(ptr("/list/4"), 4)
            .add(ptr("/name"), "x");
        assert_eq!(
            p.apply(&doc).unwrap(),
            json(r#"{"list":[0,1,2,3,4],"name":"x"}"#)
        );
        let err = JsonPatch::new().add(ptr("/list/3"), 9).apply(&doc).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Resolution);
        assert_eq!(err.index(), Some(0));
    }

    #[test]
    fn test_remove_requires_target() {
        let doc = json(r#"{"a":[1,2,3]}"#);
        let p = JsonPatch::new().remove(ptr("/a/0"));
        assert_eq!(p.apply(&doc).unwrap(), json(r#"{"a":[2,3]}"#));
        let err = JsonPatch::new().remove(ptr("/b")).apply(&doc).unwrap_err();
        assert!(matches!(
            err,
            PatchError::Operation {
                op: OperationKind::Remove,
                ..
            }
        ));
    }

    #[test]
    fn test_replace_requires_target() {
        let doc = json(r#"{"a":1}"#);
        let err = JsonPatch::new().replace(ptr("/b"), 1).apply(&doc).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Resolution);
        let changed = JsonPatch::new().replace(ptr("/a"), "text").apply(&doc).unwrap();
        assert_eq!(changed, json(r#"{"a":"text"}"#));
    }

    #[test]
    fn test_move_and_copy() {
        let doc = json(r#"{"a":{"b":1},"c":[]}"#);
        let moved = JsonPatch::new()
            .move_value(ptr("/a/b"), ptr("/c/0"))
            .apply(&doc)
            .unwrap();
        assert_eq!(moved, json(r#"{"a":{},"c":[1]}"#));

        let copied = JsonPatch::new().copy(ptr("/a"), ptr("/d")).apply(&doc).unwrap();
        assert_eq!(copied, json(r#"{"a":{"b":1},"c":[],"d":{"b":1}}"#));

        let same = JsonPatch::new().move_value(ptr("/a"), ptr("/a")).apply(&doc).unwrap();
        assert_eq!(same, doc);
    }

    #[test]
    fn test_move_into_descendant() {
        let doc = json(r#"{"a":{"b":{}}}"#);
        let err = JsonPatch::new()
            .move_value(ptr("/a"), ptr("/a/b/c"))
            .apply(&doc)
            .unwrap_err();
        assert!(matches!(err, PatchError::MoveIntoDescendant { index: 0, .. }));
        assert_eq!(err.kind(), ErrorKind::Resolution);

        let missing = JsonPatch::new().move_value(ptr("/x"), ptr("/y")).apply(&doc);
        assert!(missing.is_err());
    }

    #[test]
    fn test_failed_test_aborts_patch() {
        let doc = json(r#"{"a":2}"#);
        let p = patch(
            r#"[{"op":"test","path":"/a","value":1},{"op":"replace","path":"/a","value":9}]"#,
        );
        let err = p.apply(&doc).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::PatchVerification);
        assert_eq!(doc, json(r#"{"a":2}"#));

        let mut target = doc.clone();
        assert!(p.apply_to(&mut target).is_err());
        assert_eq!(target, doc);
    }

    #[test]
    fn test_failure_midway_returns_no_document() {
        let doc = json(r#"{"a":1}"#);
        let p = JsonPatch::new()
            .add(ptr("/b"), 2)
            .replace(ptr("/a"), 3)
            .test(ptr("/a"), 4)
            .add(ptr("/c"), 5)
            .add(ptr("/d"), 6);
        let err = p.apply(&doc).unwrap_err();
        assert_eq!(err.index(), Some(2));
    }

    #[test]
    fn test_test_uses_structural_equality() {
        let doc = json(r#"{"a":{"x":1,"y":[1.0,2]}}"#);
        let ok = JsonPatch::new().test(ptr("/a"), json(r#"{"y":[1,2],"x":1}"#));
        assert_eq!(ok.apply(&doc).unwrap(), doc);
    }

    #[test]
    fn test_parse_patch_document() {
        let p = patch(
            r#"[{"op":"ADD","path":"/a","value":null},{"op":"Move","from":"/a","path":"/b"}]"#,
        );
        assert_eq!(p.len(), 2);
        assert_eq!(p.operations()[0].kind(), OperationKind::Add);
        assert_eq!(p.operations()[1].from(), Some(&ptr("/a")));
        assert_eq!(p.apply(&json("{}")).unwrap(), json(r#"{"b":null}"#));
    }

    #[test]
    fn test_invalid_patch_documents() {
        let parse = |text: &str| JsonPatch::from_value(&json(text)).unwrap_err();
        assert!(matches!(parse("{}"), PatchError::InvalidPatch(_)));
        assert!(matches!(parse("[1]"), PatchError::InvalidPatch(_)));
        assert!(matches!(
            parse(r#"[{"op":"frobnicate","path":""}]"#),
            PatchError::UnknownOperation(_)
        ));
        assert!(matches!(parse(r#"[{"op":"add","path":"/a"}]"#), PatchError::InvalidPatch(_)));
        assert!(matches!(parse(r#"[{"op":"copy","path":"/a"}]"#), PatchError::InvalidPatch(_)));
        assert!(matches!(parse(r#"[{"op":"remove","path":"a"}]"#), PatchError::InvalidPatch(_)));
        assert_eq!(parse(r#"[{"path":"/a"}]"#).kind(), ErrorKind::Structural);
    }

    #[test]
    fn test_to_value_round_trip() {
        let text = r#"[{"op":"add","path":"/a~1b","value":[1]},{"op":"remove","path":"/c"},{"op":"copy","path":"/d","from":"/a~1b"}]"#;
        let p = patch(text);
        assert_eq!(p.to_value(), json(text));
        assert_eq!(JsonPatch::from_value(&p.to_value()).unwrap(), p);
    }

    #[test]
    fn test_serde() {
        let p: JsonPatch =
            serde_json::from_str(r#"[{"op":"test","path":"","value":{"k":true}}]"#).unwrap();
        assert_eq!(p.len(), 1);
        let text = serde_json::to_string(&p).unwrap();
        assert_eq!(text, r#"[{"op":"test","path":"","value":{"k":true}}]"#);
        assert!(serde_json::from_str::<JsonPatch>(r#"[{"op":"nope","path":""}]"#).is_err());
    }

    #[test]
    fn test_root_operations() {
        let doc = json(r#"{"a":1}"#);
        let replaced = JsonPatch::new().replace(JsonPointer::root(), 5).apply(&doc).unwrap();
        assert_eq!(replaced, Value::from(5));
        let err = JsonPatch::new().remove(JsonPointer::root()).apply(&doc).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Resolution);
    }
}
