// SPDX-License-Identifier: MIT OR Apache-2.0
//! JSON tokenizer
//!
//! Converts a stream of characters into lexical [`Token`]s. The literal text
//! of STRING and NUMBER tokens is accumulated in one reusable buffer owned by
//! the tokenizer and exposed through [`Tokenizer::text`] until the next token
//! is read, so long documents do not allocate per token.
//!
//! # Strictness
//!
//! - Strings: escapes `\b \t \n \f \r \" \\ \/ \uXXXX`; surrogate escapes must
//!   form a pair. Unescaped control characters (U+0000..=U+001F and
//!   U+007F..=U+009F) are rejected.
//! - Numbers: `-? (0 | [1-9][0-9]*) (.[0-9]+)? ([eE][+-]?[0-9]+)?`. The
//!   character after the literal is read and pushed back.
//! - `true`, `false` and `null` are compared letter by letter, so `truX` fails
//!   at the `X`.

use std::str::Chars;

use ogham_core::{Location, OghamError, Result};

/// Supplies decoded characters to a [`Tokenizer`]
pub trait CharSource {
    /// Next character, `None` at end of input.
    ///
    /// # Errors
    ///
    /// Returns an I/O or encoding error when the input cannot be read.
    fn next_char(&mut self) -> Result<Option<char>>;
}

/// [`CharSource`] over an in-memory string
#[derive(Debug, Clone)]
pub struct StrSource<'a> {
    chars: Chars<'a>,
}

impl<'a> StrSource<'a> {
    /// Read characters from `input`
    #[must_use]
    pub fn new(input: &'a str) -> Self {
        Self {
            chars: input.chars(),
        }
    }
}

impl CharSource for StrSource<'_> {
    fn next_char(&mut self) -> Result<Option<char>> {
        Ok(self.chars.next())
    }
}

/// Lexical token kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Token {
    /// `{`
    BeginObject,
    /// `}`
    EndObject,
    /// `[`
    BeginArray,
    /// `]`
    EndArray,
    /// `:`
    Colon,
    /// `,`
    Comma,
    /// String literal; decoded text in [`Tokenizer::text`]
    String,
    /// Number literal; literal text in [`Tokenizer::text`]
    Number,
    /// `true`
    True,
    /// `false`
    False,
    /// `null`
    Null,
    /// End of input
    Eof,
}

impl Token {
    /// Whether this token can start a value
    #[must_use]
    pub const fn starts_value(self) -> bool {
        matches!(
            self,
            Self::BeginObject
                | Self::BeginArray
                | Self::String
                | Self::Number
                | Self::True
                | Self::False
                | Self::Null
        )
    }
}

/// Pull tokenizer over a [`CharSource`]
#[derive(Debug)]
pub struct Tokenizer<S> {
    source: S,
    buffer: String,
    pushback: Option<char>,
    /// Position of the next character
    location: Location,
    /// Position of the most recently read character
    previous: Location,
    /// Position of the first character of the current token
    token_start: Location,
}

impl<S: CharSource> Tokenizer<S> {
    /// Tokenizer with the default literal buffer size
    #[must_use]
    pub fn new(source: S) -> Self {
        Self::with_capacity(source, 64)
    }

    /// Tokenizer whose literal buffer starts with `capacity` bytes
    #[must_use]
    pub fn with_capacity(source: S, capacity: usize) -> Self {
        Self {
            source,
            buffer: String::with_capacity(capacity),
            pushback: None,
            location: Location::start(),
            previous: Location::start(),
            token_start: Location::start(),
        }
    }

    /// Text of the last STRING (decoded) or NUMBER (as written) token
    #[must_use]
    pub fn text(&self) -> &str {
        &self.buffer
    }

    /// Position of the next unread character
    #[must_use]
    pub const fn location(&self) -> Location {
        self.location
    }

    /// Position where the last token started
    #[must_use]
    pub const fn token_location(&self) -> Location {
        self.token_start
    }

    /// Release the character source
    #[must_use]
    pub fn into_source(self) -> S {
        self.source
    }

    /// Read the next token, skipping leading whitespace.
    ///
    /// # Errors
    ///
    /// Returns [`OghamError::Lexical`] for a malformed token,
    /// [`OghamError::UnexpectedEof`] when input ends inside a literal, and
    /// propagates source errors.
    pub fn next_token(&mut self) -> Result<Token> {
        let c = loop {
            match self.read()? {
                Some(' ' | '\t' | '\n' | '\r') => {}
                Some(c) => break c,
                None => {
                    self.token_start = self.location;
                    return Ok(Token::Eof);
                }
            }
        };
        self.token_start = self.previous;
        self.buffer.clear();
        match c {
            '{' => Ok(Token::BeginObject),
            '}' => Ok(Token::EndObject),
            '[' => Ok(Token::BeginArray),
            ']' => Ok(Token::EndArray),
            ':' => Ok(Token::Colon),
            ',' => Ok(Token::Comma),
            '"' => self.read_string(),
            '-' | '0'..='9' => self.read_number(c),
            't' => self.read_literal("rue", Token::True),
            'f' => self.read_literal("alse", Token::False),
            'n' => self.read_literal("ull", Token::Null),
            other => Err(self.lexical(other, "expected a JSON value or structural character")),
        }
    }

    fn read(&mut self) -> Result<Option<char>> {
        let c = match self.pushback.take() {
            Some(c) => Some(c),
            None => self.source.next_char()?,
        };
        if let Some(c) = c {
            self.previous = self.location;
            self.location.offset += 1;
            if c == '\n' {
                self.location.line += 1;
                self.location.column = 1;
            } else {
                self.location.column += 1;
            }
        }
        Ok(c)
    }

    /// Push back the most recently read character
    fn unread(&mut self, c: char) {
        self.pushback = Some(c);
        self.location = self.previous;
    }

    fn read_required(&mut self, context: &'static str) -> Result<char> {
        self.read()?.ok_or_else(|| self.eof(context))
    }

    fn read_string(&mut self) -> Result<Token> {
        loop {
            match self.read_required("string")? {
                '"' => return Ok(Token::String),
                '\\' => {
                    let c = self.read_escape()?;
                    self.buffer.push(c);
                }
                c if is_control(c) => {
                    return Err(self.lexical(c, "control characters must be escaped in strings"));
                }
                c => self.buffer.push(c),
            }
        }
    }

    fn read_escape(&mut self) -> Result<char> {
        match self.read_required("string escape")? {
            '"' => Ok('"'),
            '\\' => Ok('\\'),
            '/' => Ok('/'),
            'b' => Ok('\u{08}'),
            'f' => Ok('\u{0c}'),
            'n' => Ok('\n'),
            'r' => Ok('\r'),
            't' => Ok('\t'),
            'u' => self.read_unicode_escape(),
            other => Err(self.lexical(other, "invalid escape sequence")),
        }
    }

    fn read_unicode_escape(&mut self) -> Result<char> {
        let unit = self.read_hex4()?;
        match unit {
            0xD800..=0xDBFF => {
                let c = self.read_required("string escape")?;
                if c != '\\' {
                    return Err(self.lexical(c, "high surrogate must be followed by a low surrogate"));
                }
                let c = self.read_required("string escape")?;
                if c != 'u' {
                    return Err(self.lexical(c, "high surrogate must be followed by a low surrogate"));
                }
                let low = self.read_hex4()?;
                if !(0xDC00..=0xDFFF).contains(&low) {
                    return Err(self.lexical('u', "high surrogate must be followed by a low surrogate"));
                }
                let combined = 0x10000 + ((unit - 0xD800) << 10) + (low - 0xDC00);
                char::from_u32(combined).ok_or_else(|| self.lexical('u', "invalid surrogate pair"))
            }
            0xDC00..=0xDFFF => Err(self.lexical('u', "unpaired low surrogate")),
            _ => char::from_u32(unit).ok_or_else(|| self.lexical('u', "invalid code point")),
        }
    }

    fn read_hex4(&mut self) -> Result<u32> {
        let mut value = 0;
        for _ in 0..4 {
            let c = self.read_required("unicode escape")?;
            let digit = c
                .to_digit(16)
                .ok_or_else(|| self.lexical(c, "expected a hexadecimal digit"))?;
            value = (value << 4) | digit;
        }
        Ok(value)
    }

    fn read_number(&mut self, first: char) -> Result<Token> {
        let mut c = first;
        if c == '-' {
            self.buffer.push('-');
            c = self.read_required("number")?;
        }

        let mut next = match c {
            '0' => {
                self.buffer.push('0');
                let next = self.read()?;
                if let Some(d @ '0'..='9') = next {
                    return Err(self.lexical(d, "leading zeros are not allowed"));
                }
                next
            }
            '1'..='9' => {
                self.buffer.push(c);
                self.read_digits()?
            }
            other => return Err(self.lexical(other, "expected a digit")),
        };

        if next == Some('.') {
            self.buffer.push('.');
            self.read_first_digit("expected a digit after the decimal point")?;
            next = self.read_digits()?;
        }

        if let Some(e @ ('e' | 'E')) = next {
            self.buffer.push(e);
            let mut c = self.read_required("number")?;
            if matches!(c, '+' | '-') {
                self.buffer.push(c);
                c = self.read_required("number")?;
            }
            if !c.is_ascii_digit() {
                return Err(self.lexical(c, "expected a digit in the exponent"));
            }
            self.buffer.push(c);
            next = self.read_digits()?;
        }

        if let Some(c) = next {
            self.unread(c);
        }
        Ok(Token::Number)
    }

    fn read_first_digit(&mut self, message: &'static str) -> Result<()> {
        let c = self.read_required("number")?;
        if !c.is_ascii_digit() {
            return Err(self.lexical(c, message));
        }
        self.buffer.push(c);
        Ok(())
    }

    /// Append digits to the buffer; returns the first non-digit read
    fn read_digits(&mut self) -> Result<Option<char>> {
        loop {
            match self.read()? {
                Some(d @ '0'..='9') => self.buffer.push(d),
                other => return Ok(other),
            }
        }
    }

    fn read_literal(&mut self, rest: &'static str, token: Token) -> Result<Token> {
        for expected in rest.chars() {
            let c = self.read_required("literal")?;
            if c != expected {
                return Err(self.lexical(c, "invalid literal"));
            }
        }
        Ok(token)
    }

    /// Error at the most recently read character
    const fn lexical(&self, found: char, message: &'static str) -> OghamError {
        OghamError::Lexical {
            found,
            location: self.previous,
            message,
        }
    }

    const fn eof(&self, context: &'static str) -> OghamError {
        OghamError::UnexpectedEof {
            location: self.location,
            context,
        }
    }
}

const fn is_control(c: char) -> bool {
    matches!(c, '\u{00}'..='\u{1f}' | '\u{7f}'..='\u{9f}')
}
