// SPDX-License-Identifier: MIT OR Apache-2.0
//! Streaming JSON generator
//!
//! [`JsonGenerator`] writes JSON text to an [`io::Write`] sink one structural
//! element at a time, validating that calls form a single well-formed value.
//! Output is UTF-8. In pretty mode every member and element goes on its own
//! line, indented by [`Config::indent`] spaces per level.

use std::io::{self, BufWriter, Write};

use smallvec::SmallVec;

use ogham_core::{Config, JsonNumber, NonFiniteMode, OghamError, Result, Value, write_escaped};

#[derive(Debug, Clone, Copy)]
struct Frame {
    object: bool,
    /// Nothing written inside the container yet
    empty: bool,
    /// A key has been written and awaits its value
    key_pending: bool,
}

/// Streaming writer of one JSON value
pub struct JsonGenerator<W: Write> {
    out: BufWriter<W>,
    pretty: bool,
    indent: usize,
    non_finite: NonFiniteMode,
    frames: SmallVec<[Frame; 32]>,
    root_written: bool,
    closed: bool,
    scratch: String,
}

impl<W: Write> JsonGenerator<W> {
    /// Generator writing to `out`
    #[must_use]
    pub fn new(out: W, config: &Config) -> Self {
        Self {
            out: BufWriter::new(out),
            pretty: config.pretty,
            indent: config.indent,
            non_finite: config.non_finite,
            frames: SmallVec::new(),
            root_written: false,
            closed: false,
            scratch: String::new(),
        }
    }

    /// Whether a complete top-level value has been written
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.root_written && self.frames.is_empty()
    }

    /// Open an object.
    ///
    /// # Errors
    ///
    /// [`OghamError::IllegalState`] when a value is not allowed here;
    /// [`OghamError::Io`] on write failure.
    pub fn write_start_object(&mut self) -> Result<&mut Self> {
        self.open(true)
    }

    /// Open an array.
    ///
    /// # Errors
    ///
    /// As [`JsonGenerator::write_start_object`].
    pub fn write_start_array(&mut self) -> Result<&mut Self> {
        self.open(false)
    }

    /// Write an object member name.
    ///
    /// # Errors
    ///
    /// [`OghamError::IllegalState`] outside an object or when the previous key
    /// has no value yet.
    pub fn write_key(&mut self, key: &str) -> Result<&mut Self> {
        self.check_open()?;
        let pretty = self.pretty;
        let depth = self.frames.len();
        let frame = match self.frames.last_mut() {
            Some(frame) if frame.object && !frame.key_pending => frame,
            Some(frame) if frame.object => return Err(illegal("previous key has no value")),
            _ => return Err(illegal("keys are only allowed inside objects")),
        };
        let first = frame.empty;
        frame.empty = false;
        frame.key_pending = true;
        if !first {
            self.out.write_all(b",")?;
        }
        if pretty {
            self.newline(depth)?;
        }
        self.write_string_literal(key)?;
        self.out.write_all(if pretty { b": ".as_slice() } else { b":" })?;
        Ok(self)
    }

    /// Close the innermost container.
    ///
    /// # Errors
    ///
    /// [`OghamError::IllegalState`] with no open container or a dangling key.
    pub fn write_end(&mut self) -> Result<&mut Self> {
        self.check_open()?;
        let frame = self
            .frames
            .pop()
            .ok_or_else(|| illegal("no open object or array"))?;
        if frame.key_pending {
            return Err(illegal("object key has no value"));
        }
        if self.pretty && !frame.empty {
            self.newline(self.frames.len())?;
        }
        self.out.write_all(if frame.object { b"}" } else { b"]" })?;
        Ok(self)
    }

    /// Write `null`.
    ///
    /// # Errors
    ///
    /// As [`JsonGenerator::write_start_object`].
    pub fn write_null(&mut self) -> Result<&mut Self> {
        self.before_value()?;
        self.out.write_all(b"null")?;
        Ok(self)
    }

    /// Write `true` or `false`.
    ///
    /// # Errors
    ///
    /// As [`JsonGenerator::write_start_object`].
    pub fn write_bool(&mut self, value: bool) -> Result<&mut Self> {
        self.before_value()?;
        self.out
            .write_all(if value { b"true".as_slice() } else { b"false" })?;
        Ok(self)
    }

    /// Write a string value.
    ///
    /// # Errors
    ///
    /// As [`JsonGenerator::write_start_object`].
    pub fn write_str(&mut self, value: &str) -> Result<&mut Self> {
        self.before_value()?;
        self.write_string_literal(value)?;
        Ok(self)
    }

    /// Write a number using its literal text.
    ///
    /// # Errors
    ///
    /// As [`JsonGenerator::write_start_object`].
    pub fn write_number(&mut self, value: &JsonNumber) -> Result<&mut Self> {
        self.before_value()?;
        self.out.write_all(value.as_str().as_bytes())?;
        Ok(self)
    }

    /// Write an integer.
    ///
    /// # Errors
    ///
    /// As [`JsonGenerator::write_start_object`].
    pub fn write_i64(&mut self, value: i64) -> Result<&mut Self> {
        self.before_value()?;
        self.out
            .write_all(itoa::Buffer::new().format(value).as_bytes())?;
        Ok(self)
    }

    /// Write a float. `NaN` and the infinities follow the configured
    /// [`NonFiniteMode`].
    ///
    /// # Errors
    ///
    /// [`OghamError::NonFinite`] for a non-finite value in
    /// [`NonFiniteMode::Error`], otherwise as
    /// [`JsonGenerator::write_start_object`].
    pub fn write_f64(&mut self, value: f64) -> Result<&mut Self> {
        if value.is_finite() {
            return self.write_number(&JsonNumber::from_f64(value)?);
        }
        match self.non_finite {
            NonFiniteMode::Null => self.write_null(),
            NonFiniteMode::String => {
                let text = if value.is_nan() {
                    "NaN"
                } else if value.is_sign_positive() {
                    "Infinity"
                } else {
                    "-Infinity"
                };
                self.write_str(text)
            }
            NonFiniteMode::Error => Err(OghamError::NonFinite(value)),
        }
    }

    /// Write a complete value, recursing into containers.
    ///
    /// # Errors
    ///
    /// As [`JsonGenerator::write_start_object`].
    pub fn write_value(&mut self, value: &Value) -> Result<&mut Self> {
        match value {
            Value::Null => self.write_null(),
            Value::Bool(b) => self.write_bool(*b),
            Value::Number(n) => self.write_number(n),
            Value::String(s) => self.write_str(s),
            Value::Array(items) => {
                self.write_start_array()?;
                for item in items {
                    self.write_value(item)?;
                }
                self.write_end()
            }
            Value::Object(members) => {
                self.write_start_object()?;
                for (key, member) in members.iter() {
                    self.write_member(key, member)?;
                }
                self.write_end()
            }
        }
    }

    /// Write `key` and `value` as one object member.
    ///
    /// # Errors
    ///
    /// As [`JsonGenerator::write_key`] and [`JsonGenerator::write_value`].
    pub fn write_member(&mut self, key: &str, value: &Value) -> Result<&mut Self> {
        self.write_key(key)?;
        self.write_value(value)
    }

    /// Flush buffered output.
    ///
    /// # Errors
    ///
    /// [`OghamError::Io`] on write failure.
    pub fn flush(&mut self) -> Result<()> {
        self.out.flush()?;
        Ok(())
    }

    /// Finish the document and flush. Further writes fail.
    ///
    /// # Errors
    ///
    /// [`OghamError::Io`] when flushing fails, otherwise
    /// [`OghamError::IllegalState`] if containers are still open.
    pub fn close(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        self.out.flush()?;
        if !self.frames.is_empty() {
            return Err(illegal("document closed with open containers"));
        }
        tracing::debug!("generator closed");
        Ok(())
    }

    /// Flush and return the sink.
    ///
    /// # Errors
    ///
    /// [`OghamError::Io`] when flushing fails.
    pub fn into_inner(self) -> Result<W> {
        self.out
            .into_inner()
            .map_err(|e| OghamError::Io(e.into_error()))
    }

    fn open(&mut self, object: bool) -> Result<&mut Self> {
        self.before_value()?;
        self.out.write_all(if object { b"{" } else { b"[" })?;
        self.frames.push(Frame {
            object,
            empty: true,
            key_pending: false,
        });
        Ok(self)
    }

    /// Validate that a value may be written here and emit the separator
    fn before_value(&mut self) -> Result<()> {
        self.check_open()?;
        let depth = self.frames.len();
        match self.frames.last_mut() {
            None if self.root_written => Err(illegal("document already complete")),
            None => {
                self.root_written = true;
                Ok(())
            }
            Some(frame) if frame.object => {
                if !frame.key_pending {
                    return Err(illegal("object member written without a key"));
                }
                frame.key_pending = false;
                Ok(())
            }
            Some(frame) => {
                let first = frame.empty;
                frame.empty = false;
                if !first {
                    self.out.write_all(b",")?;
                }
                if self.pretty {
                    self.newline(depth)?;
                }
                Ok(())
            }
        }
    }

    fn check_open(&self) -> Result<()> {
        if self.closed {
            return Err(illegal("generator is closed"));
        }
        Ok(())
    }

    fn newline(&mut self, depth: usize) -> io::Result<()> {
        self.out.write_all(b"\n")?;
        for _ in 0..depth * self.indent {
            self.out.write_all(b" ")?;
        }
        Ok(())
    }

    fn write_string_literal(&mut self, s: &str) -> Result<()> {
        self.scratch.clear();
        write_escaped(&mut self.scratch, s).map_err(io::Error::other)?;
        self.out.write_all(self.scratch.as_bytes())?;
        Ok(())
    }
}

impl<W: Write> std::fmt::Debug for JsonGenerator<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonGenerator")
            .field("pretty", &self.pretty)
            .field("depth", &self.frames.len())
            .field("closed", &self.closed)
            .finish_non_exhaustive()
    }
}

fn illegal(message: &str) -> OghamError {
    OghamError::IllegalState(message.to_owned())
}

/// Compact JSON text of `value`
#[must_use]
pub fn to_string(value: &Value) -> String {
    value.to_string()
}

/// Pretty-printed JSON text of `value` with the given indent width
///
/// # Errors
///
/// [`OghamError::Encoding`] if the generated bytes are not UTF-8.
pub fn to_string_pretty(value: &Value, indent: usize) -> Result<String> {
    let config = Config::default().with_pretty(true).with_indent(indent);
    let mut generator = JsonGenerator::new(Vec::new(), &config);
    generator.write_value(value)?;
    generator.close()?;
    String::from_utf8(generator.into_inner()?).map_err(|e| OghamError::Encoding(e.to_string()))
}

/// Write `value` to `out` as configured.
///
/// # Errors
///
/// [`OghamError::Io`] on write failure.
pub fn to_writer<W: Write>(out: W, value: &Value, config: &Config) -> Result<()> {
    let mut generator = JsonGenerator::new(out, config);
    generator.write_value(value)?;
    generator.close()
}
