// SPDX-License-Identifier: MIT OR Apache-2.0
//! Error types for ogham operations
//!
//! Every failure surfaced by the document model, the stream layer and the
//! pointer resolver is an [`OghamError`]. The variants are fine grained so
//! callers can match on them, while [`OghamError::kind`] folds them into the
//! coarse taxonomy callers usually branch on.

use std::fmt;

use thiserror::Error;

use crate::value::ValueKind;

/// Position of a character in the input stream.
///
/// Lines and columns are 1-based, `offset` counts decoded characters from the
/// start of the input (0-based).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Location {
    /// Line number (1-based)
    pub line: u64,
    /// Column number (1-based)
    pub column: u64,
    /// Character offset from the start of input (0-based)
    pub offset: u64,
}

impl Location {
    /// Location of the first character of an input
    #[must_use]
    pub const fn start() -> Self {
        Self {
            line: 1,
            column: 1,
            offset: 0,
        }
    }
}

impl Default for Location {
    fn default() -> Self {
        Self::start()
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

/// Coarse classification of an [`OghamError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed token
    Lexical,
    /// Input ended inside a literal or an open structure
    UnexpectedEof,
    /// Token in a position the grammar forbids, including rejected duplicate keys
    Structural,
    /// Byte stream charset cannot be determined or decoded
    Encoding,
    /// Underlying stream failure
    Io,
    /// Accessor asked for a kind the value does not have
    TypeMismatch,
    /// Key or index absent, pointer target missing, invalid pointer syntax
    Resolution,
    /// Exact numeric view not representable
    Arithmetic,
    /// A patch `test` operation found a different value
    PatchVerification,
    /// Single-use reader or writer reused, or writer driven out of order
    IllegalState,
    /// Unrecognised value for a configuration option
    Config,
}

/// Errors raised by ogham
#[derive(Debug, Error)]
pub enum OghamError {
    /// Malformed token at a known position
    #[error("unexpected character {found:?} at {location}: {message}")]
    Lexical {
        /// Offending character
        found: char,
        /// Where it was read
        location: Location,
        /// What the tokenizer expected instead
        message: &'static str,
    },

    /// Input ended while a literal or structure was still open
    #[error("unexpected end of input at {location} while reading {context}")]
    UnexpectedEof {
        /// Position of the end of input
        location: Location,
        /// Construct that was open
        context: &'static str,
    },

    /// Token appears where the grammar does not allow it
    #[error("structural error at {location}: {message}")]
    Structural {
        /// Position of the offending token
        location: Location,
        /// Description of the violation
        message: String,
    },

    /// Duplicate object key rejected by [`DuplicateKeyStrategy::Fail`](crate::DuplicateKeyStrategy::Fail)
    #[error(
        "duplicate key {key:?}{}",
        .location.map(|at| format!(" at {at}")).unwrap_or_default()
    )]
    DuplicateKey {
        /// The repeated key
        key: String,
        /// Where the repeated key was read, when it came from parsed input
        location: Option<Location>,
    },

    /// Byte stream encoding could not be determined or decoded
    #[error("encoding error: {0}")]
    Encoding(String),

    /// Underlying stream failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Value is not of the requested kind
    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        /// Requested kind
        expected: ValueKind,
        /// Actual kind
        found: ValueKind,
    },

    /// Object has no such key
    #[error("no value for key {0:?}")]
    MissingKey(String),

    /// Array index past the end
    #[error("index {index} out of bounds for array of length {len}")]
    IndexOutOfBounds {
        /// Requested index
        index: usize,
        /// Array length
        len: usize,
    },

    /// Exact numeric conversion would truncate or overflow
    #[error("number {number} cannot be represented exactly as {target}")]
    Arithmetic {
        /// Number as written
        number: String,
        /// Requested representation
        target: &'static str,
    },

    /// Text is not a JSON number literal, or its exponent is out of range
    #[error("invalid number literal {0:?}")]
    InvalidNumber(String),

    /// NaN or an infinity where only finite numbers are allowed
    #[error("non-finite number {0} is not valid JSON")]
    NonFinite(f64),

    /// Pointer string violates RFC 6901 syntax
    #[error("invalid JSON pointer {pointer:?}: {reason}")]
    InvalidPointer {
        /// Pointer as given
        pointer: String,
        /// What is wrong with it
        reason: &'static str,
    },

    /// Pointer does not designate a location in the document
    #[error("cannot resolve {pointer:?}: {reason}")]
    Resolution {
        /// Pointer being resolved
        pointer: String,
        /// Why resolution failed
        reason: String,
    },

    /// Operation is not valid in the current state
    #[error("illegal state: {0}")]
    IllegalState(String),

    /// Invalid configuration value
    #[error("invalid configuration value {value:?} for {key}")]
    Config {
        /// Option name
        key: String,
        /// Rejected value
        value: String,
    },
}

impl OghamError {
    /// Classify this error into the coarse taxonomy
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Lexical { .. } | Self::InvalidNumber(_) => ErrorKind::Lexical,
            Self::UnexpectedEof { .. } => ErrorKind::UnexpectedEof,
            Self::Structural { .. } | Self::DuplicateKey { .. } => ErrorKind::Structural,
            Self::Encoding(_) => ErrorKind::Encoding,
            Self::Io(_) => ErrorKind::Io,
            Self::TypeMismatch { .. } => ErrorKind::TypeMismatch,
            Self::MissingKey(_)
            | Self::IndexOutOfBounds { .. }
            | Self::InvalidPointer { .. }
            | Self::Resolution { .. } => ErrorKind::Resolution,
            Self::Arithmetic { .. } | Self::NonFinite(_) => ErrorKind::Arithmetic,
            Self::IllegalState(_) => ErrorKind::IllegalState,
            Self::Config { .. } => ErrorKind::Config,
        }
    }

    /// Attach an input location to an error raised without one
    #[must_use]
    pub fn at(self, location: Location) -> Self {
        match self {
            Self::DuplicateKey {
                key,
                location: None,
            } => Self::DuplicateKey {
                key,
                location: Some(location),
            },
            other => other,
        }
    }

    /// Shorthand for [`OghamError::Structural`]
    #[must_use]
    pub fn structural(location: Location, message: impl Into<String>) -> Self {
        Self::Structural {
            location,
            message: message.into(),
        }
    }

    /// Shorthand for [`OghamError::Resolution`]
    #[must_use]
    pub fn resolution(pointer: impl fmt::Display, reason: impl Into<String>) -> Self {
        Self::Resolution {
            pointer: pointer.to_string(),
            reason: reason.into(),
        }
    }
}

/// Result type alias for ogham operations
pub type Result<T> = std::result::Result<T, OghamError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_display() {
        let loc = Location {
            line: 3,
            column: 7,
            offset: 40,
        };
        assert_eq!(loc.to_string(), "line 3, column 7");
    }

    #[test]
    fn test_kind_mapping() {
        assert_eq!(
            OghamError::DuplicateKey {
                key: "a".into(),
                location: None
            }
            .kind(),
            ErrorKind::Structural
        );
        let config = OghamError::Config {
            key: "indent".into(),
            value: "wide".into(),
        };
        assert_eq!(config.kind(), ErrorKind::Config);
        assert_eq!(OghamError::MissingKey("a".into()).kind(), ErrorKind::Resolution);
        assert_eq!(OghamError::NonFinite(f64::NAN).kind(), ErrorKind::Arithmetic);
        let io = std::io::Error::other("closed");
        assert_eq!(OghamError::from(io).kind(), ErrorKind::Io);
    }

    #[test]
    fn test_duplicate_key_gains_location() {
        let err = OghamError::DuplicateKey {
            key: "k".into(),
            location: None,
        };
        assert_eq!(err.to_string(), r#"duplicate key "k""#);
        let located = err.at(Location {
            line: 2,
            column: 5,
            offset: 9,
        });
        assert_eq!(located.to_string(), r#"duplicate key "k" at line 2, column 5"#);
        assert!(matches!(
            located.at(Location::start()),
            OghamError::DuplicateKey {
                location: Some(Location { line: 2, .. }),
                ..
            }
        ));
        assert!(matches!(
            OghamError::MissingKey("k".into()).at(Location::start()),
            OghamError::MissingKey(_)
        ));
    }

    #[test]
    fn test_lexical_message() {
        let err = OghamError::Lexical {
            found: 'x',
            location: Location::start(),
            message: "expected a value",
        };
        assert_eq!(
            err.to_string(),
            "unexpected character 'x' at line 1, column 1: expected a value"
        );
    }
}
