// SPDX-License-Identifier: MIT OR Apache-2.0
//! Immutable JSON document model
//!
//! [`Value`] is a tagged union over the six JSON kinds. Containers are
//! reference counted: cloning a value never copies a subtree, and there is no
//! way to obtain mutable access to a built value. "Updates" such as
//! [`JsonObject::updated`] return a new container that shares every untouched
//! child with the original.
//!
//! Equality is structural. Objects compare as key sets (insertion order is
//! irrelevant), arrays compare element-wise in order, and numbers compare by
//! exact decimal value. Hashes agree with equality and are cached per
//! container after the first computation.

use std::fmt;
use std::hash::{BuildHasher, Hash, Hasher};
use std::sync::{Arc, OnceLock};

use indexmap::IndexMap;

use crate::error::{OghamError, Result};
use crate::number::JsonNumber;
use crate::pointer::JsonPointer;

/// Strict and defaulted typed getters shared by [`JsonArray`] (by index) and
/// [`JsonObject`] (by key).
///
/// The strict forms fail with a missing-key/out-of-bounds error or with
/// [`OghamError::TypeMismatch`]; the `_or` forms return the default in both
/// cases.
macro_rules! typed_accessors {
    ($key:ty) => {
        /// String member.
        ///
        /// # Errors
        ///
        /// Fails if the member is absent or not a string.
        pub fn get_str(&self, at: $key) -> Result<&str> {
            self.get_value(at)?.try_str()
        }

        /// Number member.
        ///
        /// # Errors
        ///
        /// Fails if the member is absent or not a number.
        pub fn get_number(&self, at: $key) -> Result<&JsonNumber> {
            self.get_value(at)?.try_number()
        }

        /// Number member truncated to `i64`.
        ///
        /// # Errors
        ///
        /// Fails if the member is absent or not a number.
        pub fn get_i64(&self, at: $key) -> Result<i64> {
            self.get_number(at).map(JsonNumber::as_i64)
        }

        /// Number member truncated to `i32`.
        ///
        /// # Errors
        ///
        /// Fails if the member is absent or not a number.
        pub fn get_i32(&self, at: $key) -> Result<i32> {
            self.get_number(at).map(JsonNumber::as_i32)
        }

        /// Number member as `f64`.
        ///
        /// # Errors
        ///
        /// Fails if the member is absent or not a number.
        pub fn get_f64(&self, at: $key) -> Result<f64> {
            self.get_number(at).map(JsonNumber::as_f64)
        }

        /// Boolean member.
        ///
        /// # Errors
        ///
        /// Fails if the member is absent or not a boolean.
        pub fn get_bool(&self, at: $key) -> Result<bool> {
            self.get_value(at)?.try_bool()
        }

        /// Object member.
        ///
        /// # Errors
        ///
        /// Fails if the member is absent or not an object.
        pub fn get_object(&self, at: $key) -> Result<&JsonObject> {
            self.get_value(at)?.try_object()
        }

        /// Array member.
        ///
        /// # Errors
        ///
        /// Fails if the member is absent or not an array.
        pub fn get_array(&self, at: $key) -> Result<&JsonArray> {
            self.get_value(at)?.try_array()
        }

        /// `true` if the member is `null`.
        ///
        /// # Errors
        ///
        /// Fails if the member is absent.
        pub fn is_null(&self, at: $key) -> Result<bool> {
            self.get_value(at).map(Value::is_null)
        }

        /// String member, or `default` when absent or not a string
        #[must_use]
        pub fn get_str_or<'a>(&'a self, at: $key, default: &'a str) -> &'a str {
            self.get(at).and_then(Value::as_str).unwrap_or(default)
        }

        /// Truncated `i64` member, or `default` when absent or not a number
        #[must_use]
        pub fn get_i64_or(&self, at: $key, default: i64) -> i64 {
            self.get(at)
                .and_then(Value::as_number)
                .map_or(default, JsonNumber::as_i64)
        }

        /// Truncated `i32` member, or `default` when absent or not a number
        #[must_use]
        pub fn get_i32_or(&self, at: $key, default: i32) -> i32 {
            self.get(at)
                .and_then(Value::as_number)
                .map_or(default, JsonNumber::as_i32)
        }

        /// `f64` member, or `default` when absent or not a number
        #[must_use]
        pub fn get_f64_or(&self, at: $key, default: f64) -> f64 {
            self.get(at).and_then(Value::as_f64).unwrap_or(default)
        }

        /// Boolean member, or `default` when absent or not a boolean
        #[must_use]
        pub fn get_bool_or(&self, at: $key, default: bool) -> bool {
            self.get(at).and_then(Value::as_bool).unwrap_or(default)
        }
    };
}

/// Key-ordered entry storage of a [`JsonObject`]
pub(crate) type EntryMap = IndexMap<Arc<str>, Value, ahash::RandomState>;

/// Fixed-seed hasher so structural hashes are stable across containers
fn structural_hasher() -> ahash::RandomState {
    ahash::RandomState::with_seeds(
        0x243f_6a88_85a3_08d3,
        0x1319_8a2e_0370_7344,
        0xa409_3822_299f_31d0,
        0x082e_fa98_ec4e_6c89,
    )
}

/// The kind of a [`Value`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// JSON object
    Object,
    /// JSON array
    Array,
    /// JSON string
    String,
    /// JSON number
    Number,
    /// `true` or `false`
    Boolean,
    /// `null`
    Null,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Object => "object",
            Self::Array => "array",
            Self::String => "string",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Null => "null",
        })
    }
}

/// An immutable JSON value
#[derive(Clone, Default, PartialEq, Eq)]
pub enum Value {
    /// `null`
    #[default]
    Null,
    /// `true` or `false`
    Bool(bool),
    /// Exact decimal number
    Number(JsonNumber),
    /// Shared string
    String(Arc<str>),
    /// Shared array
    Array(JsonArray),
    /// Shared object
    Object(JsonObject),
}

impl Value {
    /// Kind of this value
    #[must_use]
    pub const fn kind(&self) -> ValueKind {
        match self {
            Self::Null => ValueKind::Null,
            Self::Bool(_) => ValueKind::Boolean,
            Self::Number(_) => ValueKind::Number,
            Self::String(_) => ValueKind::String,
            Self::Array(_) => ValueKind::Array,
            Self::Object(_) => ValueKind::Object,
        }
    }

    /// Whether this is `null`
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Whether this is an object
    #[must_use]
    pub const fn is_object(&self) -> bool {
        matches!(self, Self::Object(_))
    }

    /// Whether this is an array
    #[must_use]
    pub const fn is_array(&self) -> bool {
        matches!(self, Self::Array(_))
    }

    /// Whether this is an object or an array
    #[must_use]
    pub const fn is_container(&self) -> bool {
        matches!(self, Self::Object(_) | Self::Array(_))
    }

    /// Boolean content, if any
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// String content, if any
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(&**s),
            _ => None,
        }
    }

    /// Number content, if any
    #[must_use]
    pub const fn as_number(&self) -> Option<&JsonNumber> {
        match self {
            Self::Number(n) => Some(n),
            _ => None,
        }
    }

    /// Exact `i64` content, if this is an integral number in range
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        self.as_number().and_then(|n| n.i64_exact().ok())
    }

    /// Nearest `f64`, if this is a number
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        self.as_number().map(JsonNumber::as_f64)
    }

    /// Array content, if any
    #[must_use]
    pub const fn as_array(&self) -> Option<&JsonArray> {
        match self {
            Self::Array(a) => Some(a),
            _ => None,
        }
    }

    /// Object content, if any
    #[must_use]
    pub const fn as_object(&self) -> Option<&JsonObject> {
        match self {
            Self::Object(o) => Some(o),
            _ => None,
        }
    }

    /// Boolean content.
    ///
    /// # Errors
    ///
    /// Returns [`OghamError::TypeMismatch`] for any other kind.
    pub fn try_bool(&self) -> Result<bool> {
        self.as_bool().ok_or_else(|| self.mismatch(ValueKind::Boolean))
    }

    /// String content.
    ///
    /// # Errors
    ///
    /// Returns [`OghamError::TypeMismatch`] for any other kind.
    pub fn try_str(&self) -> Result<&str> {
        self.as_str().ok_or_else(|| self.mismatch(ValueKind::String))
    }

    /// Number content.
    ///
    /// # Errors
    ///
    /// Returns [`OghamError::TypeMismatch`] for any other kind.
    pub fn try_number(&self) -> Result<&JsonNumber> {
        self.as_number().ok_or_else(|| self.mismatch(ValueKind::Number))
    }

    /// Array content.
    ///
    /// # Errors
    ///
    /// Returns [`OghamError::TypeMismatch`] for any other kind.
    pub fn try_array(&self) -> Result<&JsonArray> {
        self.as_array().ok_or_else(|| self.mismatch(ValueKind::Array))
    }

    /// Object content.
    ///
    /// # Errors
    ///
    /// Returns [`OghamError::TypeMismatch`] for any other kind.
    pub fn try_object(&self) -> Result<&JsonObject> {
        self.as_object().ok_or_else(|| self.mismatch(ValueKind::Object))
    }

    /// Look up a value by RFC 6901 pointer string, `None` if the pointer is
    /// malformed or does not resolve
    #[must_use]
    pub fn pointer(&self, pointer: &str) -> Option<&Self> {
        pointer.parse::<JsonPointer>().ok()?.get(self)
    }

    /// Hash consistent with `Eq`; cached inside containers
    #[must_use]
    pub fn structural_hash(&self) -> u64 {
        let hasher = structural_hasher();
        match self {
            Self::Null => hasher.hash_one(0_u8),
            Self::Bool(b) => hasher.hash_one((1_u8, *b)),
            Self::Number(n) => hasher.hash_one((2_u8, n)),
            Self::String(s) => hasher.hash_one((3_u8, &**s)),
            Self::Array(a) => a.structural_hash(),
            Self::Object(o) => o.structural_hash(),
        }
    }

    const fn mismatch(&self, expected: ValueKind) -> OghamError {
        OghamError::TypeMismatch {
            expected,
            found: self.kind(),
        }
    }
}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.structural_hash());
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("Null"),
            Self::Bool(b) => write!(f, "Bool({b})"),
            Self::Number(n) => write!(f, "Number({n})"),
            Self::String(s) => write!(f, "String({s:?})"),
            Self::Array(a) => fmt::Debug::fmt(a, f),
            Self::Object(o) => fmt::Debug::fmt(o, f),
        }
    }
}

/// Compact JSON text
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Bool(true) => f.write_str("true"),
            Self::Bool(false) => f.write_str("false"),
            Self::Number(n) => f.write_str(n.as_str()),
            Self::String(s) => write_escaped(f, s),
            Self::Array(a) => fmt::Display::fmt(a, f),
            Self::Object(o) => fmt::Display::fmt(o, f),
        }
    }
}

/// Write `s` as a quoted JSON string literal.
///
/// Control characters, including the C1 range `U+007F..=U+009F`, are written
/// as escapes so the output is accepted by the strict tokenizer.
///
/// # Errors
///
/// Propagates errors from the underlying writer.
pub fn write_escaped<W: fmt::Write + ?Sized>(out: &mut W, s: &str) -> fmt::Result {
    out.write_char('"')?;
    let mut run_start = 0;
    for (i, c) in s.char_indices() {
        let escape = match c {
            '"' => Some("\\\""),
            '\\' => Some("\\\\"),
            '\n' => Some("\\n"),
            '\r' => Some("\\r"),
            '\t' => Some("\\t"),
            '\u{08}' => Some("\\b"),
            '\u{0c}' => Some("\\f"),
            '\u{00}'..='\u{1f}' | '\u{7f}'..='\u{9f}' => None,
            _ => continue,
        };
        out.write_str(&s[run_start..i])?;
        match escape {
            Some(text) => out.write_str(text)?,
            None => write!(out, "\\u{:04x}", u32::from(c))?,
        }
        run_start = i + c.len_utf8();
    }
    out.write_str(&s[run_start..])?;
    out.write_char('"')
}

struct ArrayInner {
    items: Vec<Value>,
    hash: OnceLock<u64>,
}

impl Drop for ArrayInner {
    fn drop(&mut self) {
        if self.items.iter().any(Value::is_container) {
            dismantle(std::mem::take(&mut self.items));
        }
    }
}

/// Tear down nested containers from an explicit stack, so dropping a document
/// never recurses once per nesting level
fn dismantle(mut pending: Vec<Value>) {
    while let Some(value) = pending.pop() {
        match value {
            Value::Array(array) => {
                if let Ok(mut inner) = Arc::try_unwrap(array.0) {
                    pending.append(&mut inner.items);
                }
            }
            Value::Object(object) => {
                if let Ok(mut inner) = Arc::try_unwrap(object.0) {
                    pending.extend(std::mem::take(&mut inner.entries).into_values());
                }
            }
            _ => {}
        }
    }
}

/// An immutable, shared JSON array
#[derive(Clone)]
pub struct JsonArray(Arc<ArrayInner>);

impl JsonArray {
    /// Wrap a vector of values
    #[must_use]
    pub fn new(items: Vec<Value>) -> Self {
        Self(Arc::new(ArrayInner {
            items,
            hash: OnceLock::new(),
        }))
    }

    /// The empty array
    #[must_use]
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// Number of elements
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.items.len()
    }

    /// Whether there are no elements
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.items.is_empty()
    }

    /// Element at `index`
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.0.items.get(index)
    }

    /// Element at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`OghamError::IndexOutOfBounds`] past the end.
    pub fn get_value(&self, index: usize) -> Result<&Value> {
        self.get(index).ok_or(OghamError::IndexOutOfBounds {
            index,
            len: self.len(),
        })
    }

    /// First element
    #[must_use]
    pub fn first(&self) -> Option<&Value> {
        self.0.items.first()
    }

    /// Last element
    #[must_use]
    pub fn last(&self) -> Option<&Value> {
        self.0.items.last()
    }

    /// Elements in order
    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.0.items.iter()
    }

    /// Elements as a slice
    #[must_use]
    pub fn as_slice(&self) -> &[Value] {
        &self.0.items
    }

    /// Whether both handles point at the same allocation
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// New array with `value` appended
    #[must_use]
    pub fn pushed(&self, value: Value) -> Self {
        let mut items = self.0.items.clone();
        items.push(value);
        Self::new(items)
    }

    /// New array with `value` inserted before `index`; `index == len` appends.
    /// `None` if `index > len`.
    #[must_use]
    pub fn inserted(&self, index: usize, value: Value) -> Option<Self> {
        if index > self.len() {
            return None;
        }
        let mut items = self.0.items.clone();
        items.insert(index, value);
        Some(Self::new(items))
    }

    /// New array with the element at `index` replaced. `None` if out of bounds.
    #[must_use]
    pub fn replaced(&self, index: usize, value: Value) -> Option<Self> {
        if index >= self.len() {
            return None;
        }
        let mut items = self.0.items.clone();
        items[index] = value;
        Some(Self::new(items))
    }

    /// New array without the element at `index`, with the removed element.
    /// `None` if out of bounds.
    #[must_use]
    pub fn removed(&self, index: usize) -> Option<(Self, Value)> {
        if index >= self.len() {
            return None;
        }
        let mut items = self.0.items.clone();
        let old = items.remove(index);
        Some((Self::new(items), old))
    }

    fn structural_hash(&self) -> u64 {
        *self.0.hash.get_or_init(|| {
            let mut hasher = structural_hasher().build_hasher();
            4_u8.hash(&mut hasher);
            self.0.items.len().hash(&mut hasher);
            for item in &self.0.items {
                hasher.write_u64(item.structural_hash());
            }
            hasher.finish()
        })
    }

    typed_accessors!(usize);
}

impl PartialEq for JsonArray {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other) || self.0.items == other.0.items
    }
}

impl Eq for JsonArray {}

impl Hash for JsonArray {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.structural_hash());
    }
}

impl Default for JsonArray {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Debug for JsonArray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl fmt::Display for JsonArray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, item) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            fmt::Display::fmt(item, f)?;
        }
        f.write_str("]")
    }
}

impl<'a> IntoIterator for &'a JsonArray {
    type Item = &'a Value;
    type IntoIter = std::slice::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<V: Into<Value>> FromIterator<V> for JsonArray {
    fn from_iter<I: IntoIterator<Item = V>>(iter: I) -> Self {
        Self::new(iter.into_iter().map(Into::into).collect())
    }
}

struct ObjectInner {
    entries: EntryMap,
    hash: OnceLock<u64>,
}

impl Drop for ObjectInner {
    fn drop(&mut self) {
        if self.entries.values().any(Value::is_container) {
            dismantle(std::mem::take(&mut self.entries).into_values().collect());
        }
    }
}

/// An immutable, shared JSON object
///
/// Iteration follows insertion order; equality ignores it.
#[derive(Clone)]
pub struct JsonObject(Arc<ObjectInner>);

impl JsonObject {
    pub(crate) fn from_map(entries: EntryMap) -> Self {
        Self(Arc::new(ObjectInner {
            entries,
            hash: OnceLock::new(),
        }))
    }

    /// The empty object
    #[must_use]
    pub fn empty() -> Self {
        Self::from_map(EntryMap::default())
    }

    /// Number of members
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.entries.len()
    }

    /// Whether there are no members
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.entries.is_empty()
    }

    /// Value for `key`
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.entries.get(key)
    }

    /// Value for `key`.
    ///
    /// # Errors
    ///
    /// Returns [`OghamError::MissingKey`] if the key is absent.
    pub fn get_value(&self, key: &str) -> Result<&Value> {
        self.get(key)
            .ok_or_else(|| OghamError::MissingKey(key.to_owned()))
    }

    /// Whether `key` is present
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.entries.contains_key(key)
    }

    /// Keys in insertion order
    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.0.entries.keys().map(|k| &**k)
    }

    /// Members in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> + '_ {
        self.0.entries.iter().map(|(k, v)| (&**k, v))
    }

    /// Whether both handles point at the same allocation
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// New object with `key` set to `value`. An existing key keeps its position,
    /// a new key is appended.
    #[must_use]
    pub fn updated(&self, key: &str, value: Value) -> Self {
        let mut entries = self.0.entries.clone();
        entries.insert(Arc::from(key), value);
        Self::from_map(entries)
    }

    /// New object without `key`, with the removed value. `None` if absent.
    #[must_use]
    pub fn removed(&self, key: &str) -> Option<(Self, Value)> {
        if !self.contains_key(key) {
            return None;
        }
        let mut entries = self.0.entries.clone();
        let old = entries.shift_remove(key)?;
        Some((Self::from_map(entries), old))
    }

    pub(crate) fn entries(&self) -> &EntryMap {
        &self.0.entries
    }

    fn structural_hash(&self) -> u64 {
        *self.0.hash.get_or_init(|| {
            let hasher = structural_hasher();
            let members = self.0.entries.iter().fold(0_u64, |acc, (k, v)| {
                acc.wrapping_add(hasher.hash_one((&**k, v.structural_hash())))
            });
            hasher.hash_one((5_u8, self.len(), members))
        })
    }

    typed_accessors!(&str);
}

impl PartialEq for JsonObject {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other) || self.0.entries == other.0.entries
    }
}

impl Eq for JsonObject {}

impl Hash for JsonObject {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.structural_hash());
    }
}

impl Default for JsonObject {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Debug for JsonObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl fmt::Display for JsonObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (key, value)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write_escaped(f, key)?;
            f.write_str(":")?;
            fmt::Display::fmt(value, f)?;
        }
        f.write_str("}")
    }
}

/// Later duplicates overwrite earlier ones
impl<K: AsRef<str>, V: Into<Value>> FromIterator<(K, V)> for JsonObject {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::from_map(
            iter.into_iter()
                .map(|(k, v)| (Arc::from(k.as_ref()), v.into()))
                .collect(),
        )
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String(Arc::from(value))
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::String(Arc::from(value))
    }
}

impl From<Arc<str>> for Value {
    fn from(value: Arc<str>) -> Self {
        Self::String(value)
    }
}

impl From<JsonNumber> for Value {
    fn from(value: JsonNumber) -> Self {
        Self::Number(value)
    }
}

impl From<JsonArray> for Value {
    fn from(value: JsonArray) -> Self {
        Self::Array(value)
    }
}

impl From<JsonObject> for Value {
    fn from(value: JsonObject) -> Self {
        Self::Object(value)
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Self>) -> Self {
        Self::Array(JsonArray::new(value))
    }
}

impl<T: Into<Self>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

macro_rules! impl_value_from_int {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Self::Number(JsonNumber::from(value))
                }
            }
        )*
    };
}

impl_value_from_int!(i8, i16, i32, i64, i128, u8, u16, u32, u64, u128, isize, usize);

impl TryFrom<f64> for Value {
    type Error = OghamError;

    fn try_from(value: f64) -> Result<Self> {
        JsonNumber::from_f64(value).map(Self::Number)
    }
}

impl<V: Into<Self>> FromIterator<V> for Value {
    fn from_iter<I: IntoIterator<Item = V>>(iter: I) -> Self {
        Self::Array(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::hash_map::DefaultHasher;

    fn hash_of<T: Hash>(value: &T) -> u64 {
        let mut hasher = DefaultHasher::new();
        value.hash(&mut hasher);
        hasher.finish()
    }

    fn object(pairs: &[(&str, Value)]) -> JsonObject {
        pairs.iter().map(|(k, v)| (*k, v.clone())).collect()
    }

    #[test]
    fn test_object_equality_ignores_order() {
        let a = object(&[("a", 1.into()), ("b", 2.into())]);
        let b = object(&[("b", 2.into()), ("a", 1.into())]);
        assert_eq!(a, b);
        assert_eq!(hash_of(&Value::from(a)), hash_of(&Value::from(b)));
    }

    #[test]
    fn test_array_equality_respects_order() {
        let a: Value = vec![Value::from(1), Value::from(2)].into();
        let b: Value = vec![Value::from(2), Value::from(1)].into();
        assert_ne!(a, b);
    }

    #[test]
    fn test_number_equality_is_canonical() {
        let one: Value = JsonNumber::parse("1.0").unwrap().into();
        assert_eq!(one, Value::from(1));
        assert_eq!(hash_of(&one), hash_of(&Value::from(1)));
    }

    #[test]
    fn test_deep_documents_drop_iteratively() {
        let mut value = Value::Null;
        for level in 0..200_000 {
            value = if level % 2 == 0 {
                Value::Array(JsonArray::new(vec![value]))
            } else {
                std::iter::once(("k", value)).collect::<JsonObject>().into()
            };
        }
        let shared = value.clone();
        drop(value);
        assert!(shared.is_object());
        drop(shared);
    }

    #[test]
    fn test_kind_sensitive_equality() {
        assert_ne!(Value::from("1"), Value::from(1));
        assert_ne!(Value::Null, Value::Bool(false));
        assert_ne!(
            Value::from(JsonArray::empty()),
            Value::from(JsonObject::empty())
        );
    }

    #[test]
    fn test_hash_is_cached() {
        let array: JsonArray = (0..100).collect();
        let first = array.structural_hash();
        assert_eq!(array.0.hash.get().copied(), Some(first));
        assert_eq!(array.structural_hash(), first);
    }

    #[test]
    fn test_defaulted_accessors() {
        let obj = object(&[("name", "ogham".into()), ("count", 3.into())]);
        assert_eq!(obj.get_str_or("name", "x"), "ogham");
        assert_eq!(obj.get_str_or("count", "x"), "x");
        assert_eq!(obj.get_str_or("missing", "x"), "x");
        assert_eq!(obj.get_i64_or("count", 0), 3);
        assert_eq!(obj.get_i64_or("name", -1), -1);
        assert!(obj.get_bool_or("missing", true));
    }

    #[test]
    fn test_strict_accessors() {
        let obj = object(&[("name", "ogham".into()), ("nothing", Value::Null)]);
        assert_eq!(obj.get_str("name").unwrap(), "ogham");
        assert!(matches!(
            obj.get_i64("name"),
            Err(OghamError::TypeMismatch {
                expected: ValueKind::Number,
                found: ValueKind::String
            })
        ));
        assert!(matches!(obj.get_str("missing"), Err(OghamError::MissingKey(_))));
        assert!(obj.is_null("nothing").unwrap());
        assert!(!obj.is_null("name").unwrap());
    }

    #[test]
    fn test_array_accessors() {
        let arr: JsonArray = vec![Value::from("a"), Value::from(2)].into_iter().collect();
        assert_eq!(arr.get_str(0).unwrap(), "a");
        assert_eq!(arr.get_i32(1).unwrap(), 2);
        assert!(matches!(
            arr.get_str(5),
            Err(OghamError::IndexOutOfBounds { index: 5, len: 2 })
        ));
        assert_eq!(arr.get_i32_or(0, 7), 7);
        assert_eq!(arr.get_i32_or(1, 7), 2);
    }

    #[test]
    fn test_persistent_updates_share_children() {
        let inner = object(&[("x", 1.into())]);
        let outer = object(&[("inner", inner.clone().into()), ("y", 2.into())]);
        let updated = outer.updated("y", 3.into());
        assert_eq!(outer.get_i64("y").unwrap(), 2);
        assert_eq!(updated.get_i64("y").unwrap(), 3);
        assert!(updated.get_object("inner").unwrap().ptr_eq(&inner));
        assert_eq!(updated.keys().collect::<Vec<_>>(), vec!["inner", "y"]);
    }

    #[test]
    fn test_array_updates() {
        let arr: JsonArray = (1..=3).collect();
        assert_eq!(arr.inserted(3, 4.into()).unwrap().len(), 4);
        assert!(arr.inserted(4, 4.into()).is_none());
        let (rest, old) = arr.removed(0).unwrap();
        assert_eq!(old, Value::from(1));
        assert_eq!(rest, (2..=3).collect::<JsonArray>());
        assert!(arr.replaced(3, Value::Null).is_none());
        assert_eq!(arr.len(), 3);
    }

    #[test]
    fn test_display_escapes() {
        let value: Value = object(&[("k\"ey", "line\nbreak\u{1}\u{85}".into())]).into();
        assert_eq!(
            value.to_string(),
            r#"{"k\"ey":"line\nbreak\u0001\u0085"}"#
        );
    }

    #[test]
    fn test_pointer_lookup() {
        let value: Value = object(&[("a", vec![Value::from(10), Value::from(20)].into())]).into();
        assert_eq!(value.pointer("/a/1"), Some(&Value::from(20)));
        assert_eq!(value.pointer("/a/2"), None);
        assert_eq!(value.pointer("a"), None);
    }

    #[test]
    fn test_values_are_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Value>();
    }
}
