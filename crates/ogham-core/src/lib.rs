// SPDX-License-Identifier: MIT OR Apache-2.0
//! Core types for ogham: the immutable document model, builders, JSON
//! Pointer, configuration and errors
//!
//! This crate provides the foundational types used across the ogham crates:
//!
//! - [`error`] - Error types and Result alias
//! - [`config`] - Reader/writer configuration and duplicate key policy
//! - [`number`] - Exact decimal JSON numbers
//! - [`value`] - Immutable values with structural equality
//! - [`builder`] - Object/array builders and the nested tree builder
//! - [`pointer`] - RFC 6901 JSON Pointer resolution and updates

#![deny(missing_docs)]
#![deny(rust_2018_idioms)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
#![deny(clippy::cargo)]

/// Object, array and nested tree builders
pub mod builder;
/// Reader, writer and builder configuration
pub mod config;
/// Error types for ogham operations
pub mod error;
/// Exact decimal numbers
pub mod number;
/// RFC 6901 JSON Pointer
pub mod pointer;
mod serde_impl;
/// Immutable JSON values
pub mod value;

// Re-exports for convenience
pub use builder::{ArrayBuilder, ObjectBuilder, TreeBuilder};
pub use config::{Config, DuplicateKeyStrategy, NonFiniteMode};
pub use error::{ErrorKind, Location, OghamError, Result};
pub use number::JsonNumber;
pub use pointer::{JsonPointer, escape_token};
pub use value::{JsonArray, JsonObject, Value, ValueKind, write_escaped};
