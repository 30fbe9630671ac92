// SPDX-License-Identifier: MIT OR Apache-2.0
//! Single-use document reader
//!
//! [`JsonReader`] reads exactly one document from its source into an
//! immutable [`Value`]. The free functions [`from_str`], [`from_slice`] and
//! [`from_reader`] cover the common cases.

use std::io::Read;

use ogham_core::{Config, JsonArray, JsonObject, OghamError, Result, Value, ValueKind};

use crate::encoding::DecodingSource;
use crate::parser::{Event, JsonParser};
use crate::tokenizer::{CharSource, StrSource};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReaderState {
    Ready,
    Consumed,
    Closed,
}

/// Reads one JSON document
#[derive(Debug)]
pub struct JsonReader<S> {
    parser: Option<JsonParser<S>>,
    state: ReaderState,
}

impl<'a> JsonReader<StrSource<'a>> {
    /// Reader over an in-memory string
    #[must_use]
    pub fn from_text(input: &'a str, config: &Config) -> Self {
        Self::new(StrSource::new(input), config)
    }
}

impl<R: Read> JsonReader<DecodingSource<R>> {
    /// Reader over a byte stream, detecting its encoding.
    ///
    /// # Errors
    ///
    /// Returns [`OghamError::Io`] if the stream cannot be read.
    pub fn from_reader(reader: R, config: &Config) -> Result<Self> {
        Ok(Self::new(DecodingSource::new(reader)?, config))
    }
}

impl<S: CharSource> JsonReader<S> {
    /// Reader over `source`
    #[must_use]
    pub fn new(source: S, config: &Config) -> Self {
        Self {
            parser: Some(JsonParser::new(source, config)),
            state: ReaderState::Ready,
        }
    }

    /// Read the document, which may be any value.
    ///
    /// # Errors
    ///
    /// Returns [`OghamError::IllegalState`] if the reader was already used or
    /// closed, and propagates parse errors, including content after the
    /// document.
    pub fn read(&mut self) -> Result<Value> {
        let parser = self.begin()?;
        if parser.next_event()?.is_none() {
            return Err(OghamError::IllegalState("document already consumed".into()));
        }
        let value = parser.value()?;
        if parser.has_next()? {
            return Err(OghamError::structural(
                parser.location(),
                "unexpected content after the document",
            ));
        }
        tracing::debug!(kind = %value.kind(), "read document");
        Ok(value)
    }

    /// Read a document that must be an object.
    ///
    /// # Errors
    ///
    /// As [`JsonReader::read`], plus [`OghamError::Structural`] when the
    /// document is not an object.
    pub fn read_object(&mut self) -> Result<JsonObject> {
        self.read_expecting(Event::StartObject, ValueKind::Object, JsonParser::object)
    }

    /// Read a document that must be an array.
    ///
    /// # Errors
    ///
    /// As [`JsonReader::read`], plus [`OghamError::Structural`] when the
    /// document is not an array.
    pub fn read_array(&mut self) -> Result<JsonArray> {
        self.read_expecting(Event::StartArray, ValueKind::Array, JsonParser::array)
    }

    /// Release the source. Reading afterwards is an illegal-state error.
    pub fn close(&mut self) {
        self.parser = None;
        self.state = ReaderState::Closed;
    }

    fn read_expecting<T>(
        &mut self,
        start: Event,
        kind: ValueKind,
        build: impl FnOnce(&mut JsonParser<S>) -> Result<T>,
    ) -> Result<T> {
        let parser = self.begin()?;
        match parser.next_event()? {
            Some(event) if event == start => {}
            _ => {
                return Err(OghamError::structural(
                    parser.location(),
                    format!("expected the document to be an {kind}"),
                ));
            }
        }
        let value = build(&mut *parser)?;
        if parser.has_next()? {
            return Err(OghamError::structural(
                parser.location(),
                "unexpected content after the document",
            ));
        }
        tracing::debug!(%kind, "read document");
        Ok(value)
    }

    fn begin(&mut self) -> Result<&mut JsonParser<S>> {
        match self.state {
            ReaderState::Ready => {}
            ReaderState::Consumed => {
                return Err(OghamError::IllegalState("reader already used".into()));
            }
            ReaderState::Closed => {
                return Err(OghamError::IllegalState("reader is closed".into()));
            }
        }
        self.state = ReaderState::Consumed;
        self.parser
            .as_mut()
            .ok_or_else(|| OghamError::IllegalState("reader is closed".into()))
    }
}

/// Parse a document from a string with default configuration.
///
/// # Errors
///
/// Propagates parse errors.
pub fn from_str(input: &str) -> Result<Value> {
    JsonReader::from_text(input, &Config::default()).read()
}

/// Parse a document from bytes in any supported encoding.
///
/// # Errors
///
/// Propagates encoding and parse errors.
pub fn from_slice(bytes: &[u8]) -> Result<Value> {
    JsonReader::from_reader(bytes, &Config::default())?.read()
}

/// Parse a document from a byte stream in any supported encoding.
///
/// # Errors
///
/// Propagates I/O, encoding and parse errors.
pub fn from_reader<R: Read>(reader: R, config: &Config) -> Result<Value> {
    JsonReader::from_reader(reader, config)?.read()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ogham_core::{DuplicateKeyStrategy, ErrorKind};
    use std::io;

    /// Yields `data` in small pieces, then fails
    struct FailingRead<'a> {
        data: &'a [u8],
        error: fn() -> io::Error,
    }

    impl Read for FailingRead<'_> {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.data.is_empty() {
                return Err((self.error)());
            }
            let n = buf.len().min(self.data.len()).min(3);
            buf[..n].copy_from_slice(&self.data[..n]);
            self.data = &self.data[n..];
            Ok(n)
        }
    }

    fn read_with(input: &str, strategy: DuplicateKeyStrategy) -> Result<Value> {
        let config = Config::default().with_duplicate_keys(strategy);
        JsonReader::from_text(input, &config).read()
    }

    #[test]
    fn test_read_document() {
        let value = from_str(r#" {"a": [1, 2.5, "s"], "b": {"c": null}} "#).unwrap();
        assert_eq!(value.pointer("/a/1").unwrap().to_string(), "2.5");
        assert_eq!(value.pointer("/b/c"), Some(&Value::Null));
    }

    #[test]
    fn test_empty_array() {
        let value = from_str("[]").unwrap();
        assert_eq!(value.as_array().map(JsonArray::len), Some(0));
    }

    #[test]
    fn test_duplicate_strategies() {
        let input = r#"{"a":1,"a":2}"#;
        assert_eq!(
            read_with(input, DuplicateKeyStrategy::First).unwrap().to_string(),
            r#"{"a":1}"#
        );
        assert_eq!(
            read_with(input, DuplicateKeyStrategy::Last).unwrap().to_string(),
            r#"{"a":2}"#
        );
        let err = read_with(input, DuplicateKeyStrategy::Fail).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Structural);
    }

    #[test]
    fn test_single_use() {
        let mut reader = JsonReader::from_text("[1]", &Config::default());
        reader.read().unwrap();
        assert_eq!(reader.read().unwrap_err().kind(), ErrorKind::IllegalState);

        let mut closed = JsonReader::from_text("[1]", &Config::default());
        closed.close();
        assert_eq!(closed.read_array().unwrap_err().kind(), ErrorKind::IllegalState);
    }

    #[test]
    fn test_typed_reads() {
        let config = Config::default();
        assert_eq!(
            JsonReader::from_text("{}", &config).read_object().unwrap().len(),
            0
        );
        let err = JsonReader::from_text("[]", &config).read_object().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Structural);
        let err = JsonReader::from_text("7", &config).read_array().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Structural);
    }

    #[test]
    fn test_scalar_and_trailing_content() {
        assert_eq!(from_str("42").unwrap(), Value::from(42));
        assert_eq!(from_str("[] x").unwrap_err().kind(), ErrorKind::Lexical);
        assert_eq!(from_str("[] []").unwrap_err().kind(), ErrorKind::Structural);
    }

    #[test]
    fn test_reader_failures_surface() {
        let config = Config::default();
        let failing = |data| FailingRead {
            data,
            error: || io::Error::new(io::ErrorKind::ConnectionReset, "reset"),
        };

        let err = from_reader(failing(br#"{"a": [1, 2"#), &config).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Io);
        assert!(matches!(err, OghamError::Io(ref e) if e.kind() == io::ErrorKind::ConnectionReset));

        let err = from_reader(failing(b""), &config).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Io);

        let truncated = FailingRead {
            data: b"[true]",
            error: || io::Error::new(io::ErrorKind::UnexpectedEof, "gone"),
        };
        assert_eq!(
            JsonReader::from_reader(truncated, &config)
                .unwrap()
                .read_array()
                .unwrap_err()
                .kind(),
            ErrorKind::Io
        );
    }

    #[test]
    fn test_malformed_bytes_surface_as_encoding_errors() {
        let config = Config::default();
        for bytes in [
            b"[\"\xC0\xAF\"]".as_slice(),
            b"[\"\xE2\x82\"]".as_slice(),
            b"[1, \xFF]".as_slice(),
            b"[\"\xE2\x82".as_slice(),
        ] {
            let err = from_reader(bytes, &config).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Encoding, "{bytes:?}");
        }
        // UTF-16LE with an unpaired high surrogate
        let err = from_slice(&[b'"', 0, 0x3D, 0xD8, b'"', 0]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Encoding);
    }

    #[test]
    fn test_deep_nesting_is_rejected_cleanly() {
        let deep = "[".repeat(100_000) + &"]".repeat(100_000);
        assert_eq!(from_str(&deep).unwrap_err().kind(), ErrorKind::Structural);
        assert_eq!(
            from_reader(deep.as_bytes(), &Config::default()).unwrap_err().kind(),
            ErrorKind::Structural
        );

        let at_limit = "[".repeat(128) + &"]".repeat(128);
        let mut value = from_str(&at_limit).unwrap();
        let mut depth = 0;
        while let Some(inner) = value.as_array().and_then(|a| a.first()).cloned() {
            value = inner;
            depth += 1;
        }
        assert_eq!(depth, 127);

        let config = Config::default().with_max_depth(3);
        let err = JsonReader::from_text(r#"{"a": [[{"b": 1}]]}"#, &config)
            .read_object()
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Structural);
    }

    #[test]
    fn test_from_slice_encodings() {
        for encoding in crate::Encoding::ALL {
            let bytes = encoding.encode(r#"{"text": "été 🌞"}"#);
            let value = from_slice(&bytes).unwrap();
            assert_eq!(
                value.as_object().unwrap().get_str("text").unwrap(),
                "\u{e9}t\u{e9} \u{1F31E}",
                "{encoding}"
            );
        }
    }
}
