// SPDX-License-Identifier: MIT OR Apache-2.0
//! Character encodings of JSON byte streams
//!
//! Input may be UTF-8, UTF-16 or UTF-32 in either byte order. The encoding is
//! taken from a byte order mark when present, otherwise from the pattern of
//! zero bytes in the first four bytes (RFC 4627 §3): the first two characters
//! of a JSON text are always ASCII, so
//!
//! | first bytes   | encoding |
//! |---------------|----------|
//! | `00 00 00 xx` | UTF-32BE |
//! | `xx 00 00 00` | UTF-32LE |
//! | `00 xx 00 xx` | UTF-16BE |
//! | `xx 00 xx 00` | UTF-16LE |
//! | otherwise     | UTF-8    |

use std::fmt;
use std::io::{self, Read};

use ogham_core::{OghamError, Result};

use crate::tokenizer::CharSource;

const READ_BUFFER: usize = 8 * 1024;

/// Supported input encodings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Encoding {
    /// UTF-8
    #[default]
    Utf8,
    /// UTF-16, little endian
    Utf16Le,
    /// UTF-16, big endian
    Utf16Be,
    /// UTF-32, little endian
    Utf32Le,
    /// UTF-32, big endian
    Utf32Be,
}

impl Encoding {
    /// All supported encodings
    pub const ALL: [Self; 5] = [
        Self::Utf8,
        Self::Utf16Le,
        Self::Utf16Be,
        Self::Utf32Le,
        Self::Utf32Be,
    ];

    /// Detect the encoding of a stream from its first bytes.
    ///
    /// Returns the encoding and the length of the byte order mark to skip.
    /// `prefix` should hold at least four bytes unless the input is shorter.
    #[must_use]
    pub fn detect(prefix: &[u8]) -> (Self, usize) {
        match prefix {
            [0xEF, 0xBB, 0xBF, ..] => (Self::Utf8, 3),
            [0xFF, 0xFE, 0x00, 0x00, ..] => (Self::Utf32Le, 4),
            [0x00, 0x00, 0xFE, 0xFF, ..] => (Self::Utf32Be, 4),
            [0xFF, 0xFE, ..] => (Self::Utf16Le, 2),
            [0xFE, 0xFF, ..] => (Self::Utf16Be, 2),
            [0x00, 0x00, 0x00, _, ..] => (Self::Utf32Be, 0),
            [_, 0x00, 0x00, 0x00, ..] => (Self::Utf32Le, 0),
            [0x00, _, ..] => (Self::Utf16Be, 0),
            [_, 0x00, ..] => (Self::Utf16Le, 0),
            _ => (Self::Utf8, 0),
        }
    }

    /// Width of one code unit in bytes
    #[must_use]
    pub const fn unit_width(self) -> usize {
        match self {
            Self::Utf8 => 1,
            Self::Utf16Le | Self::Utf16Be => 2,
            Self::Utf32Le | Self::Utf32Be => 4,
        }
    }

    /// Encode `text` without a byte order mark
    #[must_use]
    pub fn encode(self, text: &str) -> Vec<u8> {
        match self {
            Self::Utf8 => text.as_bytes().to_vec(),
            Self::Utf16Le => text.encode_utf16().flat_map(u16::to_le_bytes).collect(),
            Self::Utf16Be => text.encode_utf16().flat_map(u16::to_be_bytes).collect(),
            Self::Utf32Le => text.chars().flat_map(|c| u32::from(c).to_le_bytes()).collect(),
            Self::Utf32Be => text.chars().flat_map(|c| u32::from(c).to_be_bytes()).collect(),
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Utf8 => "UTF-8",
            Self::Utf16Le => "UTF-16LE",
            Self::Utf16Be => "UTF-16BE",
            Self::Utf32Le => "UTF-32LE",
            Self::Utf32Be => "UTF-32BE",
        })
    }
}

/// [`CharSource`] decoding a byte stream
pub struct DecodingSource<R> {
    reader: R,
    encoding: Encoding,
    buf: Box<[u8]>,
    pos: usize,
    end: usize,
}

impl<R: Read> DecodingSource<R> {
    /// Wrap `reader`, detecting its encoding from the first bytes.
    ///
    /// # Errors
    ///
    /// Returns [`OghamError::Io`] if the initial read fails.
    pub fn new(reader: R) -> Result<Self> {
        let mut source = Self::with_encoding(reader, Encoding::Utf8);
        while source.end < 4 {
            if source.fill_at_end()? == 0 {
                break;
            }
        }
        let (encoding, bom) = Encoding::detect(&source.buf[..source.end]);
        source.encoding = encoding;
        source.pos = bom;
        tracing::trace!(%encoding, bom, "detected input encoding");
        Ok(source)
    }

    /// Wrap `reader` with a known encoding; no byte order mark is skipped
    #[must_use]
    pub fn with_encoding(reader: R, encoding: Encoding) -> Self {
        Self {
            reader,
            encoding,
            buf: vec![0; READ_BUFFER].into_boxed_slice(),
            pos: 0,
            end: 0,
        }
    }

    /// Encoding in use
    #[must_use]
    pub const fn encoding(&self) -> Encoding {
        self.encoding
    }

    /// Release the underlying reader
    #[must_use]
    pub fn into_inner(self) -> R {
        self.reader
    }

    /// Append bytes after `end`; returns the number read
    fn fill_at_end(&mut self) -> Result<usize> {
        loop {
            match self.reader.read(&mut self.buf[self.end..]) {
                Ok(n) => {
                    self.end += n;
                    return Ok(n);
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => return Err(e.into()),
            }
        }
    }

    fn byte(&mut self) -> Result<Option<u8>> {
        if self.pos == self.end {
            self.pos = 0;
            self.end = 0;
            if self.fill_at_end()? == 0 {
                return Ok(None);
            }
        }
        let b = self.buf[self.pos];
        self.pos += 1;
        Ok(Some(b))
    }

    /// Next `N` bytes of a code unit; `None` at a clean end of input
    fn unit<const N: usize>(&mut self) -> Result<Option<[u8; N]>> {
        let mut unit = [0; N];
        for (i, slot) in unit.iter_mut().enumerate() {
            match self.byte()? {
                Some(b) => *slot = b,
                None if i == 0 => return Ok(None),
                None => return Err(self.malformed("truncated code unit")),
            }
        }
        Ok(Some(unit))
    }

    fn utf8(&mut self, lead: u8) -> Result<char> {
        let width = match lead {
            0x00..=0x7F => return Ok(char::from(lead)),
            0xC2..=0xDF => 2,
            0xE0..=0xEF => 3,
            0xF0..=0xF4 => 4,
            _ => return Err(self.malformed("invalid UTF-8 lead byte")),
        };
        let mut bytes = [lead, 0, 0, 0];
        for slot in &mut bytes[1..width] {
            *slot = self
                .byte()?
                .ok_or_else(|| self.malformed("truncated UTF-8 sequence"))?;
        }
        std::str::from_utf8(&bytes[..width])
            .ok()
            .and_then(|s| s.chars().next())
            .ok_or_else(|| self.malformed("invalid UTF-8 sequence"))
    }

    fn utf16(&mut self, first: u16, big_endian: bool) -> Result<char> {
        let mut units = vec![first];
        if (0xD800..=0xDBFF).contains(&first) {
            let next = self
                .unit::<2>()?
                .ok_or_else(|| self.malformed("truncated surrogate pair"))?;
            units.push(if big_endian {
                u16::from_be_bytes(next)
            } else {
                u16::from_le_bytes(next)
            });
        }
        char::decode_utf16(units)
            .next()
            .and_then(std::result::Result::ok)
            .ok_or_else(|| self.malformed("unpaired UTF-16 surrogate"))
    }

    fn malformed(&self, reason: &str) -> OghamError {
        OghamError::Encoding(format!("{}: {reason}", self.encoding))
    }
}

impl<R: Read> CharSource for DecodingSource<R> {
    fn next_char(&mut self) -> Result<Option<char>> {
        match self.encoding {
            Encoding::Utf8 => match self.byte()? {
                Some(lead) => self.utf8(lead).map(Some),
                None => Ok(None),
            },
            Encoding::Utf16Le | Encoding::Utf16Be => {
                let big_endian = self.encoding == Encoding::Utf16Be;
                match self.unit::<2>()? {
                    Some(b) if big_endian => self.utf16(u16::from_be_bytes(b), true).map(Some),
                    Some(b) => self.utf16(u16::from_le_bytes(b), false).map(Some),
                    None => Ok(None),
                }
            }
            Encoding::Utf32Le | Encoding::Utf32Be => {
                let Some(b) = self.unit::<4>()? else {
                    return Ok(None);
                };
                let code = if self.encoding == Encoding::Utf32Be {
                    u32::from_be_bytes(b)
                } else {
                    u32::from_le_bytes(b)
                };
                char::from_u32(code)
                    .map(Some)
                    .ok_or_else(|| self.malformed("invalid code point"))
            }
        }
    }
}

impl<R> fmt::Debug for DecodingSource<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DecodingSource")
            .field("encoding", &self.encoding)
            .field("buffered", &(self.end - self.pos))
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode_all(bytes: &[u8]) -> (Encoding, String) {
        let mut source = DecodingSource::new(bytes).unwrap();
        let mut out = String::new();
        while let Some(c) = source.next_char().unwrap() {
            out.push(c);
        }
        (source.encoding(), out)
    }

    #[test]
    fn test_detect_by_bom() {
        assert_eq!(Encoding::detect(&[0xEF, 0xBB, 0xBF, b'{']), (Encoding::Utf8, 3));
        assert_eq!(Encoding::detect(&[0xFF, 0xFE, b'{', 0]), (Encoding::Utf16Le, 2));
        assert_eq!(Encoding::detect(&[0xFE, 0xFF, 0, b'{']), (Encoding::Utf16Be, 2));
        assert_eq!(Encoding::detect(&[0xFF, 0xFE, 0, 0]), (Encoding::Utf32Le, 4));
        assert_eq!(Encoding::detect(&[0, 0, 0xFE, 0xFF]), (Encoding::Utf32Be, 4));
    }

    #[test]
    fn test_detect_by_zero_pattern() {
        for encoding in Encoding::ALL {
            let bytes = encoding.encode("[1]");
            assert_eq!(Encoding::detect(&bytes), (encoding, 0), "{encoding}");
        }
        assert_eq!(Encoding::detect(b"1"), (Encoding::Utf8, 0));
        assert_eq!(Encoding::detect(b""), (Encoding::Utf8, 0));
    }

    #[test]
    fn test_decode_every_encoding() {
        let text = "{\"k\":\"h\u{e9}llo \u{1F600}\"}";
        for encoding in Encoding::ALL {
            assert_eq!(
                decode_all(&encoding.encode(text)),
                (encoding, text.to_owned()),
                "{encoding}"
            );
        }
    }

    #[test]
    fn test_bom_is_skipped() {
        let mut bytes = vec![0xEF, 0xBB, 0xBF];
        bytes.extend_from_slice(b"[]");
        assert_eq!(decode_all(&bytes).1, "[]");
    }

    #[test]
    fn test_malformed_input() {
        let mut source = DecodingSource::new(&[b'"', 0xC3][..]).unwrap();
        assert_eq!(source.next_char().unwrap(), Some('"'));
        assert!(matches!(source.next_char(), Err(OghamError::Encoding(_))));

        let mut source = DecodingSource::with_encoding(&[0x00, 0xD8, 0x41, 0x00][..], Encoding::Utf16Le);
        assert!(source.next_char().is_err());
    }
}
