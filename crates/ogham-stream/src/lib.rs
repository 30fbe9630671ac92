// SPDX-License-Identifier: MIT OR Apache-2.0
//! Text input and output for ogham
//!
//! - [`encoding`] - UTF-8/16/32 detection and decoding of byte streams
//! - [`tokenizer`] - Character-level lexer producing JSON tokens
//! - [`parser`] - Pull parser emitting structural events
//! - [`reader`] - Single-use document reader
//! - [`generator`] - Incremental serializer with compact and pretty output
//! - [`writer`] - Single-use document writer
//!
//! # Example
//!
//! ```
//! use ogham_stream::{from_str, to_string};
//!
//! let value = from_str(r#"{ "name": "ogham", "tags": [1, 2] }"#).unwrap();
//! assert_eq!(to_string(&value), r#"{"name":"ogham","tags":[1,2]}"#);
//! ```

#![deny(missing_docs)]
#![deny(rust_2018_idioms)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
#![deny(clippy::cargo)]

/// Byte stream encoding detection and decoding
pub mod encoding;
/// Incremental JSON output
pub mod generator;
/// Pull parser
pub mod parser;
/// Single-use document reader
pub mod reader;
/// Lexer
pub mod tokenizer;
/// Single-use document writer
pub mod writer;

// Re-exports for convenience
pub use encoding::{DecodingSource, Encoding};
pub use generator::{JsonGenerator, to_string, to_string_pretty, to_writer};
pub use parser::{Event, JsonParser};
pub use reader::{JsonReader, from_reader, from_slice, from_str};
pub use tokenizer::{CharSource, StrSource, Token, Tokenizer};
pub use writer::JsonWriter;
