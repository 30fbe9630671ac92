// SPDX-License-Identifier: MIT OR Apache-2.0
//! Configured factory for readers, parsers, generators, writers and builders
//!
//! A [`JsonProvider`] is an ordinary value owned by the caller. Every object it
//! creates shares the same [`Config`], so a provider built with
//! `duplicate_keys = fail` rejects duplicates in its readers, parsers and
//! object builders alike.

use std::collections::HashMap;
use std::io::{Read, Write};

use ogham_core::{ArrayBuilder, Config, ObjectBuilder, Result, TreeBuilder, Value};
use ogham_stream::{
    DecodingSource, Encoding, JsonGenerator, JsonParser, JsonReader, JsonWriter, StrSource,
};

/// Factory for configured JSON components
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JsonProvider {
    config: Config,
}

impl JsonProvider {
    /// Provider with `config`
    #[must_use]
    pub const fn new(config: Config) -> Self {
        Self { config }
    }

    /// Provider configured from string options.
    ///
    /// See [`Config::from_map`] for the recognised keys.
    ///
    /// # Errors
    ///
    /// Returns [`ogham_core::OghamError::Config`] for a value that does not
    /// parse.
    pub fn from_map<K, V, S>(options: &HashMap<K, V, S>) -> Result<Self>
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let config = Config::from_map(options)?;
        tracing::debug!(?config, "configured provider");
        Ok(Self::new(config))
    }

    /// Shared configuration
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Reader over an in-memory string
    #[must_use]
    pub fn reader<'a>(&self, input: &'a str) -> JsonReader<StrSource<'a>> {
        JsonReader::from_text(input, &self.config)
    }

    /// Reader over a byte stream with detected encoding.
    ///
    /// # Errors
    ///
    /// Returns [`ogham_core::OghamError::Io`] if the stream cannot be read.
    pub fn reader_from<R: Read>(&self, input: R) -> Result<JsonReader<DecodingSource<R>>> {
        JsonReader::from_reader(input, &self.config)
    }

    /// Reader over a byte stream in a known encoding
    #[must_use]
    pub fn reader_with_encoding<R: Read>(
        &self,
        input: R,
        encoding: Encoding,
    ) -> JsonReader<DecodingSource<R>> {
        JsonReader::new(DecodingSource::with_encoding(input, encoding), &self.config)
    }

    /// Pull parser over an in-memory string
    #[must_use]
    pub fn parser<'a>(&self, input: &'a str) -> JsonParser<StrSource<'a>> {
        JsonParser::new(StrSource::new(input), &self.config)
    }

    /// Pull parser over a byte stream with detected encoding.
    ///
    /// # Errors
    ///
    /// Returns [`ogham_core::OghamError::Io`] if the stream cannot be read.
    pub fn parser_from<R: Read>(&self, input: R) -> Result<JsonParser<DecodingSource<R>>> {
        JsonParser::from_reader(input, &self.config)
    }

    /// Streaming generator over `out`
    #[must_use]
    pub fn generator<W: Write>(&self, out: W) -> JsonGenerator<W> {
        JsonGenerator::new(out, &self.config)
    }

    /// Single-use document writer over `out`
    #[must_use]
    pub fn writer<W: Write>(&self, out: W) -> JsonWriter<W> {
        JsonWriter::new(out, &self.config)
    }

    /// Object builder using the configured duplicate key policy
    #[must_use]
    pub fn object_builder(&self) -> ObjectBuilder {
        ObjectBuilder::with_strategy(self.config.duplicate_keys)
    }

    /// Array builder
    #[must_use]
    #[allow(clippy::unused_self)]
    pub fn array_builder(&self) -> ArrayBuilder {
        ArrayBuilder::new()
    }

    /// Nested tree builder using the configured duplicate key policy
    #[must_use]
    pub const fn tree_builder(&self) -> TreeBuilder {
        TreeBuilder::new(self.config.duplicate_keys)
    }

    /// Parse `input` into a value.
    ///
    /// # Errors
    ///
    /// Propagates parse errors.
    pub fn parse(&self, input: &str) -> Result<Value> {
        self.reader(input).read()
    }

    /// Render `value` using the configured output style.
    ///
    /// # Errors
    ///
    /// Returns [`ogham_core::OghamError::NonFinite`] only if a generator policy
    /// rejects a value; in-memory output does not fail otherwise.
    pub fn render(&self, value: &Value) -> Result<String> {
        let mut writer = self.writer(Vec::new());
        writer.write(value)?;
        let bytes = writer.into_inner()?;
        String::from_utf8(bytes).map_err(|e| ogham_core::OghamError::Encoding(e.to_string()))
    }
}
