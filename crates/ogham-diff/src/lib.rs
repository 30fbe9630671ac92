// SPDX-License-Identifier: MIT OR Apache-2.0
//! # JSON Diff/Patch/Merge
//!
//! Structural operations over immutable ogham values.
//!
//! ## JSON Patch (RFC 6902)
//! Apply a sequence of operations to a document:
//! - `add`: Insert a value at a path
//! - `remove`: Delete a value at a path
//! - `replace`: Replace a value at a path
//! - `move`: Move a value from one path to another
//! - `copy`: Copy a value from one path to another
//! - `test`: Verify a value equals the expected value
//!
//! A patch either applies completely or fails with the first error.
//!
//! ## JSON Diff
//! [`json_diff`] generates a patch that transforms one document into another.
//!
//! ## JSON Merge Patch (RFC 7396)
//! A simpler merge format where:
//! - Objects are recursively merged
//! - `null` values indicate deletion
//! - Other values replace existing ones
//!
//! [`json_merge_diff`] produces the merge patch between two documents.

#![deny(missing_docs)]
#![deny(rust_2018_idioms)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
#![deny(clippy::cargo)]

mod compute;
mod merge;
mod patch;

pub use compute::json_diff;
pub use merge::{json_merge_diff, json_merge_patch, merge_many};
pub use patch::{JsonPatch, OperationKind, PatchError, PatchOperation, apply_patch};
