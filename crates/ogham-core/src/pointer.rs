// SPDX-License-Identifier: MIT OR Apache-2.0
//! RFC 6901 JSON Pointer
//!
//! A [`JsonPointer`] is the decoded sequence of reference tokens. Parsing
//! applies `~1` → `/` and `~0` → `~`; display re-encodes in the reverse order,
//! so `parse(p.to_string()) == p` for every pointer.
//!
//! # Array tokens
//!
//! Against an array, a token must be a canonical non-negative integer
//! (`0`, `1`, `27`, never `01` or `+1`). The token `-` names the position after
//! the last element and is only meaningful as the target of [`JsonPointer::add`].
//!
//! # Updates
//!
//! [`JsonPointer::add`], [`JsonPointer::remove`] and [`JsonPointer::replace`]
//! return a new root. Only the containers on the path from the root to the
//! target are copied; every other subtree is shared with the input.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use crate::error::{OghamError, Result};
use crate::value::Value;

/// Decoded RFC 6901 pointer
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct JsonPointer {
    tokens: Vec<String>,
}

impl JsonPointer {
    /// The empty pointer, designating the whole document
    #[must_use]
    pub const fn root() -> Self {
        Self { tokens: Vec::new() }
    }

    /// Parse pointer text.
    ///
    /// # Errors
    ///
    /// Returns [`OghamError::InvalidPointer`] if the text is neither empty nor
    /// starts with `/`, or contains a `~` not followed by `0` or `1`.
    pub fn parse(pointer: &str) -> Result<Self> {
        if pointer.is_empty() {
            return Ok(Self::root());
        }
        let Some(body) = pointer.strip_prefix('/') else {
            return Err(OghamError::InvalidPointer {
                pointer: pointer.to_owned(),
                reason: "must be empty or start with '/'",
            });
        };
        let tokens = body
            .split('/')
            .map(|token| unescape(token, pointer))
            .collect::<Result<_>>()?;
        Ok(Self { tokens })
    }

    /// Pointer from already decoded tokens
    #[must_use]
    pub fn from_tokens<I, T>(tokens: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self {
            tokens: tokens.into_iter().map(Into::into).collect(),
        }
    }

    /// Decoded reference tokens
    #[must_use]
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// Whether this is the whole-document pointer
    #[must_use]
    pub const fn is_root(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Number of reference tokens
    #[must_use]
    pub const fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Same as [`JsonPointer::is_root`]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Final token, `None` for the root
    #[must_use]
    pub fn last(&self) -> Option<&str> {
        self.tokens.last().map(String::as_str)
    }

    /// Pointer to the containing value, `None` for the root
    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        let (_, init) = self.tokens.split_last()?;
        Some(Self {
            tokens: init.to_vec(),
        })
    }

    /// Append a decoded token
    pub fn push(&mut self, token: impl Into<String>) {
        self.tokens.push(token.into());
    }

    /// New pointer with `token` appended
    #[must_use]
    pub fn child(&self, token: impl Into<String>) -> Self {
        let mut child = self.clone();
        child.push(token);
        child
    }

    /// Whether `other` designates this location or one inside it
    #[must_use]
    pub fn is_prefix_of(&self, other: &Self) -> bool {
        other.tokens.starts_with(&self.tokens)
    }

    /// Target value, `None` if it does not exist
    #[must_use]
    pub fn get<'v>(&self, root: &'v Value) -> Option<&'v Value> {
        self.resolve(root).ok()
    }

    /// Whether the target exists
    #[must_use]
    pub fn contains(&self, root: &Value) -> bool {
        self.get(root).is_some()
    }

    /// Target value.
    ///
    /// # Errors
    ///
    /// Returns [`OghamError::Resolution`] if a key is absent, an index is out of
    /// bounds or not a valid array index (including `-`), or the path passes
    /// through a scalar.
    pub fn resolve<'v>(&self, root: &'v Value) -> Result<&'v Value> {
        self.tokens
            .iter()
            .try_fold(root, |node, token| self.step(node, token))
    }

    /// New root with `value` added at this location.
    ///
    /// An object member is inserted or overwritten. An array element is
    /// inserted before the index, shifting later elements; the index may equal
    /// the length, and `-` appends. At the root, `value` becomes the document.
    ///
    /// # Errors
    ///
    /// Returns [`OghamError::Resolution`] if the parent does not exist, is a
    /// scalar, or the array index is invalid or greater than the length.
    pub fn add(&self, root: &Value, value: Value) -> Result<Value> {
        let Some((last, path)) = self.tokens.split_last() else {
            return Ok(value);
        };
        self.rebuild(root, path, |parent| match parent {
            Value::Object(object) => Ok(Value::Object(object.updated(last, value))),
            Value::Array(array) => {
                let index = if last == "-" {
                    array.len()
                } else {
                    self.index(last, array.len(), true)?
                };
                array
                    .inserted(index, value)
                    .map(Value::Array)
                    .ok_or_else(|| self.out_of_bounds(index, array.len()))
            }
            scalar => Err(self.through_scalar(scalar)),
        })
    }

    /// New root with the target removed; array elements after it shift down.
    ///
    /// # Errors
    ///
    /// Returns [`OghamError::Resolution`] if the target does not exist or this
    /// is the root pointer.
    pub fn remove(&self, root: &Value) -> Result<Value> {
        let Some((last, path)) = self.tokens.split_last() else {
            return Err(OghamError::resolution(self, "cannot remove the document root"));
        };
        self.rebuild(root, path, |parent| match parent {
            Value::Object(object) => object
                .removed(last)
                .map(|(rest, _)| Value::Object(rest))
                .ok_or_else(|| self.missing(last)),
            Value::Array(array) => {
                let index = self.index(last, array.len(), false)?;
                array
                    .removed(index)
                    .map(|(rest, _)| Value::Array(rest))
                    .ok_or_else(|| self.out_of_bounds(index, array.len()))
            }
            scalar => Err(self.through_scalar(scalar)),
        })
    }

    /// New root with the existing target replaced by `value`. At the root,
    /// `value` becomes the document.
    ///
    /// # Errors
    ///
    /// Returns [`OghamError::Resolution`] if the target does not exist.
    pub fn replace(&self, root: &Value, value: Value) -> Result<Value> {
        let Some((last, path)) = self.tokens.split_last() else {
            return Ok(value);
        };
        self.rebuild(root, path, |parent| match parent {
            Value::Object(object) if object.contains_key(last) => {
                Ok(Value::Object(object.updated(last, value)))
            }
            Value::Object(_) => Err(self.missing(last)),
            Value::Array(array) => {
                let index = self.index(last, array.len(), false)?;
                array
                    .replaced(index, value)
                    .map(Value::Array)
                    .ok_or_else(|| self.out_of_bounds(index, array.len()))
            }
            scalar => Err(self.through_scalar(scalar)),
        })
    }

    /// Walk `path` from `node`, apply `edit` to the container it reaches and
    /// rebuild the ancestors on the way back
    fn rebuild<F>(&self, node: &Value, path: &[String], edit: F) -> Result<Value>
    where
        F: FnOnce(&Value) -> Result<Value>,
    {
        let Some((token, rest)) = path.split_first() else {
            return edit(node);
        };
        let child = self.step(node, token)?;
        let child = self.rebuild(child, rest, edit)?;
        Ok(match node {
            Value::Object(object) => Value::Object(object.updated(token, child)),
            Value::Array(array) => {
                let index = self.index(token, array.len(), false)?;
                Value::Array(
                    array
                        .replaced(index, child)
                        .ok_or_else(|| self.out_of_bounds(index, array.len()))?,
                )
            }
            scalar => return Err(self.through_scalar(scalar)),
        })
    }

    fn step<'v>(&self, node: &'v Value, token: &str) -> Result<&'v Value> {
        match node {
            Value::Object(object) => object.get(token).ok_or_else(|| self.missing(token)),
            Value::Array(array) => {
                let index = self.index(token, array.len(), false)?;
                array
                    .get(index)
                    .ok_or_else(|| self.out_of_bounds(index, array.len()))
            }
            scalar => Err(self.through_scalar(scalar)),
        }
    }

    /// Array index for `token` in an array of `len` elements; `len` itself is
    /// accepted only when `allow_end` is set
    fn index(&self, token: &str, len: usize, allow_end: bool) -> Result<usize> {
        if token == "-" {
            return Err(OghamError::resolution(
                self,
                "'-' refers to a nonexistent array element",
            ));
        }
        if !is_array_index(token) {
            return Err(OghamError::resolution(
                self,
                format!("{token:?} is not an array index"),
            ));
        }
        match token.parse::<usize>() {
            Ok(index) if index < len || (allow_end && index == len) => Ok(index),
            Ok(index) => Err(self.out_of_bounds(index, len)),
            Err(_) => Err(OghamError::resolution(
                self,
                format!("index {token} out of range"),
            )),
        }
    }

    fn missing(&self, key: &str) -> OghamError {
        OghamError::resolution(self, format!("no member {key:?}"))
    }

    fn out_of_bounds(&self, index: usize, len: usize) -> OghamError {
        OghamError::resolution(
            self,
            format!("index {index} out of bounds for array of length {len}"),
        )
    }

    fn through_scalar(&self, scalar: &Value) -> OghamError {
        OghamError::resolution(self, format!("cannot descend into a {}", scalar.kind()))
    }
}

/// `^(0|[1-9][0-9]*)$`
fn is_array_index(token: &str) -> bool {
    match token.as_bytes() {
        [b'0'] => true,
        [b'1'..=b'9', rest @ ..] => rest.iter().all(u8::is_ascii_digit),
        _ => false,
    }
}

fn unescape(token: &str, pointer: &str) -> Result<String> {
    if memchr::memchr(b'~', token.as_bytes()).is_none() {
        return Ok(token.to_owned());
    }
    let mut out = String::with_capacity(token.len());
    let mut chars = token.chars();
    while let Some(c) = chars.next() {
        if c != '~' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('0') => out.push('~'),
            Some('1') => out.push('/'),
            _ => {
                return Err(OghamError::InvalidPointer {
                    pointer: pointer.to_owned(),
                    reason: "'~' must be followed by '0' or '1'",
                });
            }
        }
    }
    Ok(out)
}

/// Encode one reference token (`~` → `~0`, then `/` → `~1`)
#[must_use]
pub fn escape_token(token: &str) -> Cow<'_, str> {
    if memchr::memchr2(b'~', b'/', token.as_bytes()).is_none() {
        return Cow::Borrowed(token);
    }
    Cow::Owned(token.replace('~', "~0").replace('/', "~1"))
}

impl fmt::Display for JsonPointer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for token in &self.tokens {
            f.write_str("/")?;
            f.write_str(&escape_token(token))?;
        }
        Ok(())
    }
}

impl FromStr for JsonPointer {
    type Err = OghamError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<&str> for JsonPointer {
    type Error = OghamError;

    fn try_from(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{JsonArray, JsonObject};

    fn ptr(s: &str) -> JsonPointer {
        s.parse().unwrap()
    }

    fn sample() -> Value {
        let inner: JsonObject = [("c~d", Value::from(1))].into_iter().collect();
        let list: JsonArray = [10, 20, 30].into_iter().collect();
        [
            ("a/b", Value::from(inner)),
            ("list", Value::from(list)),
            ("", Value::from("empty key")),
        ]
        .into_iter()
        .collect::<JsonObject>()
        .into()
    }

    #[test]
    fn test_parse_and_escape() {
        assert!(ptr("").is_root());
        assert_eq!(ptr("/").tokens(), &[String::new()]);
        assert_eq!(ptr("/a~1b/c~0d").tokens(), &["a/b", "c~d"]);
        assert_eq!(ptr("/~01").tokens(), &["~1"]);
        assert_eq!(ptr("/a~1b/c~0d").to_string(), "/a~1b/c~0d");
        assert!(matches!(
            "a".parse::<JsonPointer>(),
            Err(OghamError::InvalidPointer { .. })
        ));
        assert!("/a~2".parse::<JsonPointer>().is_err());
        assert!("/a~".parse::<JsonPointer>().is_err());
    }

    #[test]
    fn test_resolve() {
        let doc = sample();
        assert_eq!(ptr("").resolve(&doc).unwrap(), &doc);
        assert_eq!(ptr("/a~1b/c~0d").resolve(&doc).unwrap(), &Value::from(1));
        assert_eq!(ptr("/list/2").resolve(&doc).unwrap(), &Value::from(30));
        assert_eq!(ptr("/").resolve(&doc).unwrap(), &Value::from("empty key"));
    }

    #[test]
    fn test_resolve_failures() {
        let doc = sample();
        for bad in ["/missing", "/list/3", "/list/-", "/list/01", "/list/x", "/list/0/deeper"] {
            let err = ptr(bad).resolve(&doc).unwrap_err();
            assert!(
                matches!(err, OghamError::Resolution { .. }),
                "{bad}: {err}"
            );
            assert!(!ptr(bad).contains(&doc));
        }
    }

    #[test]
    fn test_add() {
        let doc = sample();
        let added = ptr("/list/-").add(&doc, Value::from(40)).unwrap();
        assert_eq!(added.pointer("/list/3"), Some(&Value::from(40)));
        let inserted = ptr("/list/0").add(&doc, Value::from(5)).unwrap();
        assert_eq!(inserted.pointer("/list").unwrap().to_string(), "[5,10,20,30]");
        let at_end = ptr("/list/3").add(&doc, Value::from(40)).unwrap();
        assert_eq!(at_end, added);
        assert!(ptr("/list/4").add(&doc, Value::Null).is_err());
        assert!(ptr("/nope/x").add(&doc, Value::Null).is_err());
        let new_member = ptr("/z").add(&doc, Value::Bool(true)).unwrap();
        assert_eq!(new_member.pointer("/z"), Some(&Value::Bool(true)));
        assert_eq!(ptr("").add(&doc, Value::Null).unwrap(), Value::Null);
    }

    #[test]
    fn test_remove_and_replace() {
        let doc = sample();
        let removed = ptr("/list/0").remove(&doc).unwrap();
        assert_eq!(removed.pointer("/list").unwrap().to_string(), "[20,30]");
        assert!(ptr("/list/3").remove(&doc).is_err());
        assert!(ptr("/missing").remove(&doc).is_err());
        assert!(ptr("").remove(&doc).is_err());

        let replaced = ptr("/a~1b/c~0d").replace(&doc, Value::from("x")).unwrap();
        assert_eq!(replaced.pointer("/a~1b/c~0d"), Some(&Value::from("x")));
        assert!(ptr("/a~1b/other").replace(&doc, Value::Null).is_err());
        assert!(ptr("/list/-").replace(&doc, Value::Null).is_err());
    }

    #[test]
    fn test_updates_share_untouched_subtrees() {
        let doc = sample();
        let updated = ptr("/list/1").replace(&doc, Value::from(99)).unwrap();
        let (Some(Value::Object(before)), Some(Value::Object(after))) =
            (doc.pointer("/a~1b"), updated.pointer("/a~1b"))
        else {
            panic!("expected objects");
        };
        assert!(before.ptr_eq(after));
        assert_eq!(doc.pointer("/list/1"), Some(&Value::from(20)));
    }

    #[test]
    fn test_structure_helpers() {
        let p = ptr("/a/b");
        assert_eq!(p.last(), Some("b"));
        assert_eq!(p.parent().unwrap(), ptr("/a"));
        assert!(ptr("").parent().is_none());
        assert!(ptr("/a").is_prefix_of(&p));
        assert!(p.is_prefix_of(&p));
        assert!(!ptr("/a/b/c").is_prefix_of(&p));
        assert_eq!(JsonPointer::from_tokens(["a/b"]).to_string(), "/a~1b");
        assert_eq!(ptr("/a").child("b"), p);
    }

    #[test]
    fn test_array_index_grammar() {
        assert!(is_array_index("0"));
        assert!(is_array_index("120"));
        assert!(!is_array_index("00"));
        assert!(!is_array_index("-1"));
        assert!(!is_array_index(""));
        assert!(!is_array_index("1e3"));
    }
}
