// SPDX-License-Identifier: MIT OR Apache-2.0
//! # ogham-cli
//!
//! Command-line interface for ogham.
//!
//! ## Usage
//!
//! ```bash
//! # RFC 6902 patch between two documents
//! ogham diff old.json new.json
//!
//! # Apply a JSON Patch
//! ogham patch data.json changes.json
//!
//! # Apply merge patches in order (RFC 7396)
//! ogham merge base.json overlay.json
//!
//! # Merge patch between two documents
//! ogham merge-diff old.json new.json
//!
//! # Resolve a JSON Pointer
//! ogham pointer /users/0/name data.json
//!
//! # Format JSON
//! ogham format data.json
//! ogham format -c data.json  # compact
//!
//! # Validate JSON
//! ogham validate data.json
//! ```
//!
//! Inputs may be UTF-8, UTF-16 or UTF-32; output is UTF-8. Set `RUST_LOG` or
//! pass `--verbose` for diagnostics on stderr.
//!
//! ## Library Usage
//!
//! For programmatic access use the [`ogham`](https://docs.rs/ogham) crate.

#![warn(missing_docs)]

/// Re-export of ogham-diff for patch and merge functionality.
pub use ogham::diff;

/// Re-export of ogham-core for core types.
pub use ogham::core;

/// Re-export of ogham-stream for parsing and generation.
pub use ogham::stream;
