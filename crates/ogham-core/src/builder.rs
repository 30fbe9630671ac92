// SPDX-License-Identifier: MIT OR Apache-2.0
//! Builders for immutable values
//!
//! [`ObjectBuilder`] and [`ArrayBuilder`] accumulate members and produce
//! [`JsonObject`]/[`JsonArray`] values. [`TreeBuilder`] assembles arbitrarily
//! nested documents from a flat sequence of start/key/value/end calls using
//! an explicit stack of frames; the stream reader drives it while parsing.

use std::sync::Arc;

use crate::config::DuplicateKeyStrategy;
use crate::error::{OghamError, Result};
use crate::value::{EntryMap, JsonArray, JsonObject, Value};

/// Accumulates object members
#[derive(Debug, Clone, Default)]
pub struct ObjectBuilder {
    entries: EntryMap,
    strategy: DuplicateKeyStrategy,
}

impl ObjectBuilder {
    /// Empty builder; later duplicates overwrite earlier ones
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty builder with the given duplicate key policy
    #[must_use]
    pub fn with_strategy(strategy: DuplicateKeyStrategy) -> Self {
        Self {
            entries: EntryMap::default(),
            strategy,
        }
    }

    /// Builder seeded with the members of `object`
    #[must_use]
    pub fn from_object(object: &JsonObject) -> Self {
        Self {
            entries: object.entries().clone(),
            strategy: DuplicateKeyStrategy::default(),
        }
    }

    /// Duplicate key policy in effect
    #[must_use]
    pub const fn strategy(&self) -> DuplicateKeyStrategy {
        self.strategy
    }

    /// Add a member, applying the duplicate key policy.
    ///
    /// # Errors
    ///
    /// Returns [`OghamError::DuplicateKey`] if `key` is already present and
    /// the policy is [`DuplicateKeyStrategy::Fail`].
    pub fn put(&mut self, key: impl AsRef<str>, value: impl Into<Value>) -> Result<&mut Self> {
        let key = key.as_ref();
        if let Some(slot) = self.entries.get_mut(key) {
            match self.strategy {
                DuplicateKeyStrategy::First => {}
                DuplicateKeyStrategy::Last => *slot = value.into(),
                DuplicateKeyStrategy::Fail => {
                    return Err(OghamError::DuplicateKey {
                        key: key.to_owned(),
                        location: None,
                    });
                }
            }
        } else {
            self.entries.insert(Arc::from(key), value.into());
        }
        Ok(self)
    }

    /// Add a `null` member.
    ///
    /// # Errors
    ///
    /// Same as [`ObjectBuilder::put`].
    pub fn put_null(&mut self, key: impl AsRef<str>) -> Result<&mut Self> {
        self.put(key, Value::Null)
    }

    /// Drop a member if present
    pub fn remove(&mut self, key: &str) -> &mut Self {
        self.entries.shift_remove(key);
        self
    }

    /// Whether `key` has been added
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Number of members so far
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no members have been added
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Snapshot the members as an immutable object; the builder keeps its
    /// contents and can continue accumulating
    #[must_use]
    pub fn build(&self) -> JsonObject {
        JsonObject::from_map(self.entries.clone())
    }

    /// Move the members into an immutable object, leaving the builder empty
    pub fn take(&mut self) -> JsonObject {
        JsonObject::from_map(std::mem::take(&mut self.entries))
    }
}

/// Accumulates array elements
#[derive(Debug, Clone, Default)]
pub struct ArrayBuilder {
    items: Vec<Value>,
}

impl ArrayBuilder {
    /// Empty builder
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder seeded with the elements of `array`
    #[must_use]
    pub fn from_array(array: &JsonArray) -> Self {
        Self {
            items: array.as_slice().to_vec(),
        }
    }

    /// Append an element
    pub fn add(&mut self, value: impl Into<Value>) -> &mut Self {
        self.items.push(value.into());
        self
    }

    /// Append `null`
    pub fn add_null(&mut self) -> &mut Self {
        self.add(Value::Null)
    }

    /// Insert before `index`; `index == len` appends.
    ///
    /// # Errors
    ///
    /// Returns [`OghamError::IndexOutOfBounds`] if `index > len`.
    pub fn insert(&mut self, index: usize, value: impl Into<Value>) -> Result<&mut Self> {
        if index > self.items.len() {
            return Err(self.out_of_bounds(index));
        }
        self.items.insert(index, value.into());
        Ok(self)
    }

    /// Replace the element at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`OghamError::IndexOutOfBounds`] if `index >= len`.
    pub fn set(&mut self, index: usize, value: impl Into<Value>) -> Result<&mut Self> {
        let len = self.items.len();
        let slot = self
            .items
            .get_mut(index)
            .ok_or(OghamError::IndexOutOfBounds { index, len })?;
        *slot = value.into();
        Ok(self)
    }

    /// Remove the element at `index`, shifting later elements down.
    ///
    /// # Errors
    ///
    /// Returns [`OghamError::IndexOutOfBounds`] if `index >= len`.
    pub fn remove(&mut self, index: usize) -> Result<&mut Self> {
        if index >= self.items.len() {
            return Err(self.out_of_bounds(index));
        }
        self.items.remove(index);
        Ok(self)
    }

    /// Number of elements so far
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether no elements have been added
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Snapshot the elements as an immutable array; the builder keeps its
    /// contents and can continue accumulating
    #[must_use]
    pub fn build(&self) -> JsonArray {
        JsonArray::new(self.items.clone())
    }

    /// Move the elements into an immutable array, leaving the builder empty
    pub fn take(&mut self) -> JsonArray {
        JsonArray::new(std::mem::take(&mut self.items))
    }

    const fn out_of_bounds(&self, index: usize) -> OghamError {
        OghamError::IndexOutOfBounds {
            index,
            len: self.items.len(),
        }
    }
}

/// One open container on a [`TreeBuilder`] stack
#[derive(Debug)]
enum Frame {
    Object {
        builder: ObjectBuilder,
        /// Key the next value is stored under
        pending_key: Option<String>,
    },
    Array(ArrayBuilder),
}

/// Builds nested documents from start/key/value/end calls
///
/// Each open container is a frame on an explicit stack. A frame's slot in its
/// parent is the parent's pending key (objects) or the next append position
/// (arrays); ending a frame builds it and commits the result into that slot.
///
/// ```
/// use ogham_core::TreeBuilder;
///
/// # fn main() -> ogham_core::Result<()> {
/// let mut tree = TreeBuilder::default();
/// tree.start_object()?;
/// tree.key("tags")?;
/// tree.start_array()?;
/// tree.value("a")?;
/// tree.value(1)?;
/// tree.end()?;
/// tree.end()?;
/// let doc = tree.finish()?;
/// assert_eq!(doc.to_string(), r#"{"tags":["a",1]}"#);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct TreeBuilder {
    frames: Vec<Frame>,
    root: Option<Value>,
    strategy: DuplicateKeyStrategy,
}

impl TreeBuilder {
    /// Empty builder applying `strategy` to every object it opens
    #[must_use]
    pub const fn new(strategy: DuplicateKeyStrategy) -> Self {
        Self {
            frames: Vec::new(),
            root: None,
            strategy,
        }
    }

    /// Number of open containers
    #[must_use]
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Whether a complete top-level value has been built
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.root.is_some()
    }

    /// Open an object in the current slot.
    ///
    /// # Errors
    ///
    /// Returns [`OghamError::IllegalState`] if there is no slot to fill.
    pub fn start_object(&mut self) -> Result<()> {
        self.check_slot()?;
        self.frames.push(Frame::Object {
            builder: ObjectBuilder::with_strategy(self.strategy),
            pending_key: None,
        });
        tracing::trace!(depth = self.frames.len(), "start object frame");
        Ok(())
    }

    /// Open an array in the current slot.
    ///
    /// # Errors
    ///
    /// Returns [`OghamError::IllegalState`] if there is no slot to fill.
    pub fn start_array(&mut self) -> Result<()> {
        self.check_slot()?;
        self.frames.push(Frame::Array(ArrayBuilder::new()));
        tracing::trace!(depth = self.frames.len(), "start array frame");
        Ok(())
    }

    /// Set the key for the next value of the innermost object.
    ///
    /// # Errors
    ///
    /// Returns [`OghamError::IllegalState`] outside an object or when a key is
    /// already pending.
    pub fn key(&mut self, key: impl Into<String>) -> Result<()> {
        match self.frames.last_mut() {
            Some(Frame::Object { pending_key, .. }) if pending_key.is_none() => {
                *pending_key = Some(key.into());
                Ok(())
            }
            Some(Frame::Object { .. }) => Err(illegal("key already pending")),
            _ => Err(illegal("key outside of an object")),
        }
    }

    /// Store a value in the current slot.
    ///
    /// # Errors
    ///
    /// Returns [`OghamError::IllegalState`] if there is no slot to fill, or
    /// [`OghamError::DuplicateKey`] from the object's duplicate key policy.
    pub fn value(&mut self, value: impl Into<Value>) -> Result<()> {
        match self.frames.last_mut() {
            None if self.root.is_none() => {
                self.root = Some(value.into());
                Ok(())
            }
            None => Err(illegal("document already complete")),
            Some(Frame::Array(builder)) => {
                builder.add(value);
                Ok(())
            }
            Some(Frame::Object {
                builder,
                pending_key,
            }) => {
                let key = pending_key.take().ok_or_else(|| illegal("value without a key"))?;
                builder.put(key, value)?;
                Ok(())
            }
        }
    }

    /// Close the innermost container and commit it to its parent slot.
    ///
    /// # Errors
    ///
    /// Returns [`OghamError::IllegalState`] with no open container or when an
    /// object still has a pending key, and propagates duplicate key errors
    /// from the parent object.
    pub fn end(&mut self) -> Result<()> {
        let built = match self.frames.pop() {
            None => return Err(illegal("no open container")),
            Some(Frame::Object {
                pending_key: Some(key),
                ..
            }) => return Err(illegal(format!("key {key:?} has no value"))),
            Some(Frame::Object { mut builder, .. }) => Value::Object(builder.take()),
            Some(Frame::Array(mut builder)) => Value::Array(builder.take()),
        };
        tracing::trace!(depth = self.frames.len(), kind = %built.kind(), "end frame");
        self.value(built)
    }

    /// Take the finished top-level value, resetting the builder.
    ///
    /// # Errors
    ///
    /// Returns [`OghamError::IllegalState`] while containers are open or before
    /// any value was produced.
    pub fn finish(&mut self) -> Result<Value> {
        if !self.frames.is_empty() {
            return Err(illegal("containers still open"));
        }
        self.root.take().ok_or_else(|| illegal("no value built"))
    }

    fn check_slot(&self) -> Result<()> {
        match self.frames.last() {
            None if self.root.is_some() => Err(illegal("document already complete")),
            Some(Frame::Object {
                pending_key: None, ..
            }) => Err(illegal("value without a key")),
            _ => Ok(()),
        }
    }
}

fn illegal(message: impl Into<String>) -> OghamError {
    OghamError::IllegalState(message.into())
}
