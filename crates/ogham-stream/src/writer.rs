// SPDX-License-Identifier: MIT OR Apache-2.0
//! Single-use document writer

use std::io::Write;

use ogham_core::{Config, JsonArray, JsonObject, OghamError, Result, Value};

use crate::generator::JsonGenerator;

/// Writes exactly one document, then must be closed
#[derive(Debug)]
pub struct JsonWriter<W: Write> {
    generator: Option<JsonGenerator<W>>,
    written: bool,
}

impl<W: Write> JsonWriter<W> {
    /// Writer over `out`
    #[must_use]
    pub fn new(out: W, config: &Config) -> Self {
        Self {
            generator: Some(JsonGenerator::new(out, config)),
            written: false,
        }
    }

    /// Write `value` as the document.
    ///
    /// # Errors
    ///
    /// [`OghamError::IllegalState`] if a document was already written or the
    /// writer is closed; [`OghamError::Io`] on write failure.
    pub fn write(&mut self, value: &Value) -> Result<()> {
        if self.written {
            return Err(OghamError::IllegalState("writer already used".into()));
        }
        let generator = self
            .generator
            .as_mut()
            .ok_or_else(|| OghamError::IllegalState("writer is closed".into()))?;
        self.written = true;
        generator.write_value(value)?;
        generator.flush()?;
        tracing::debug!(kind = %value.kind(), "wrote document");
        Ok(())
    }

    /// Write an object document.
    ///
    /// # Errors
    ///
    /// As [`JsonWriter::write`].
    pub fn write_object(&mut self, object: &JsonObject) -> Result<()> {
        self.write(&Value::Object(object.clone()))
    }

    /// Write an array document.
    ///
    /// # Errors
    ///
    /// As [`JsonWriter::write`].
    pub fn write_array(&mut self, array: &JsonArray) -> Result<()> {
        self.write(&Value::Array(array.clone()))
    }

    /// Flush and release the sink. Closing twice is a no-op.
    ///
    /// # Errors
    ///
    /// [`OghamError::Io`] when the final flush fails.
    pub fn close(&mut self) -> Result<()> {
        match self.generator.take() {
            Some(mut generator) => generator.close(),
            None => Ok(()),
        }
    }

    /// Close and return the sink.
    ///
    /// # Errors
    ///
    /// [`OghamError::IllegalState`] if already closed; [`OghamError::Io`] when
    /// the final flush fails.
    pub fn into_inner(mut self) -> Result<W> {
        let mut generator = self
            .generator
            .take()
            .ok_or_else(|| OghamError::IllegalState("writer is closed".into()))?;
        generator.close()?;
        generator.into_inner()
    }
}
