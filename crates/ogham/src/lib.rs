// SPDX-License-Identifier: MIT OR Apache-2.0
//! # ogham
//!
//! Immutable JSON values with a streaming parser, RFC 6901 JSON Pointer,
//! RFC 6902 JSON Patch and RFC 7396 JSON Merge Patch.
//!
//! ## Crates
//!
//! - [`ogham_core`] - Document model, builders, pointers, configuration, errors
//! - [`ogham_stream`] - Encoding detection, tokenizer, pull parser, reader, generator
//! - [`ogham_diff`] - Patch apply/diff and merge patch apply/diff
//!
//! ## Example
//!
//! ```
//! use ogham::{JsonPatch, JsonPointer, from_str, json_merge_patch};
//!
//! let doc = from_str(r#"{"a": 1, "b": [true]}"#).unwrap();
//! let pointer: JsonPointer = "/b/0".parse().unwrap();
//! assert_eq!(pointer.get(&doc).and_then(ogham::Value::as_bool), Some(true));
//!
//! let patch = JsonPatch::from_value(
//!     &from_str(r#"[{"op": "replace", "path": "/a", "value": 2}]"#).unwrap(),
//! )
//! .unwrap();
//! assert_eq!(patch.apply(&doc).unwrap().to_string(), r#"{"a":2,"b":[true]}"#);
//!
//! let merged = json_merge_patch(&doc, &from_str(r#"{"a": null}"#).unwrap());
//! assert_eq!(merged.to_string(), r#"{"b":[true]}"#);
//! ```

#![deny(missing_docs)]
#![deny(rust_2018_idioms)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
#![deny(clippy::cargo)]

/// Configured component factory
pub mod provider;

pub use provider::JsonProvider;

// Re-exports for convenience
pub use ogham_core::{
    ArrayBuilder, Config, DuplicateKeyStrategy, ErrorKind, JsonArray, JsonNumber, JsonObject,
    JsonPointer, Location, NonFiniteMode, ObjectBuilder, OghamError, Result, TreeBuilder, Value,
    ValueKind,
};
pub use ogham_diff::{
    JsonPatch, OperationKind, PatchError, PatchOperation, apply_patch, json_diff, json_merge_diff,
    json_merge_patch, merge_many,
};
pub use ogham_stream::{
    Encoding, Event, JsonGenerator, JsonParser, JsonReader, JsonWriter, from_reader, from_slice,
    from_str, to_string, to_string_pretty, to_writer,
};

/// Core types
pub use ogham_core as core;
/// Patch and merge patch
pub use ogham_diff as diff;
/// Parsing and generation
pub use ogham_stream as stream;
