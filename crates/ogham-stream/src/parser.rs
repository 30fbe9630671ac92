// SPDX-License-Identifier: MIT OR Apache-2.0
//! Pull parser
//!
//! [`JsonParser`] turns tokens into [`Event`]s while enforcing the JSON
//! grammar with a small state machine over a stack of open scopes. Events can
//! be consumed one at a time, or the value starting at the current event can
//! be materialised with [`JsonParser::value`].
//!
//! A complete document is exactly one value followed by end of input. Any
//! value kind may be the top-level value. Containers may nest at most
//! [`Config::max_depth`] deep.

use std::io::Read;

use smallvec::SmallVec;

use ogham_core::{
    Config, DuplicateKeyStrategy, JsonArray, JsonNumber, JsonObject, Location, OghamError,
    Result, TreeBuilder, Value,
};

use crate::encoding::DecodingSource;
use crate::tokenizer::{CharSource, StrSource, Token, Tokenizer};

/// Parser events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Event {
    /// `{`
    StartObject,
    /// `}`
    EndObject,
    /// `[`
    StartArray,
    /// `]`
    EndArray,
    /// Object member name; text via [`JsonParser::string`]
    KeyName,
    /// String value; text via [`JsonParser::string`]
    ValueString,
    /// Number value; see [`JsonParser::number`]
    ValueNumber,
    /// `true`
    ValueTrue,
    /// `false`
    ValueFalse,
    /// `null`
    ValueNull,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scope {
    Object,
    Array,
}

/// What the grammar allows next
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Top-level value
    Root,
    /// After `{`: a key or `}`
    ObjectOpen,
    /// After `,` in an object: a key
    ObjectNext,
    /// After a key: `:` and a value
    ObjectKey,
    /// After `[`: a value or `]`
    ArrayOpen,
    /// After `,` in an array: a value
    ArrayNext,
    /// After a value: `,` or the closer, or end of input at the top level
    AfterValue,
    /// Document complete
    Done,
}

/// Streaming pull parser over a [`CharSource`]
#[derive(Debug)]
pub struct JsonParser<S> {
    tokenizer: Tokenizer<S>,
    scopes: SmallVec<[Scope; 32]>,
    state: State,
    current: Option<Event>,
    duplicate_keys: DuplicateKeyStrategy,
    max_depth: usize,
}

impl<'a> JsonParser<StrSource<'a>> {
    /// Parser over an in-memory string with default configuration
    #[must_use]
    pub fn from_text(input: &'a str) -> Self {
        Self::new(StrSource::new(input), &Config::default())
    }
}

impl<R: Read> JsonParser<DecodingSource<R>> {
    /// Parser over a byte stream whose encoding is detected from its first
    /// bytes.
    ///
    /// # Errors
    ///
    /// Returns [`OghamError::Io`] if the stream cannot be read.
    pub fn from_reader(reader: R, config: &Config) -> Result<Self> {
        Ok(Self::new(DecodingSource::new(reader)?, config))
    }
}

impl<S: CharSource> JsonParser<S> {
    /// Parser over `source`
    #[must_use]
    pub fn new(source: S, config: &Config) -> Self {
        Self {
            tokenizer: Tokenizer::with_capacity(source, config.buffer_size),
            scopes: SmallVec::new(),
            state: State::Root,
            current: None,
            duplicate_keys: config.duplicate_keys,
            max_depth: config.max_depth,
        }
    }

    /// Most recent event
    #[must_use]
    pub const fn current(&self) -> Option<Event> {
        self.current
    }

    /// Nesting depth of the current position
    #[must_use]
    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    /// Position where the current event's token started
    #[must_use]
    pub const fn location(&self) -> Location {
        self.tokenizer.token_location()
    }

    /// Whether another event follows. At the end of the top-level value this
    /// checks that only whitespace remains.
    ///
    /// # Errors
    ///
    /// Returns [`OghamError::Structural`] for content after the document.
    pub fn has_next(&mut self) -> Result<bool> {
        match self.state {
            State::Done => Ok(false),
            State::AfterValue if self.scopes.is_empty() => {
                self.finish_document()?;
                Ok(false)
            }
            _ => Ok(true),
        }
    }

    /// Next event, `None` once the document and the end of input have been
    /// read.
    ///
    /// # Errors
    ///
    /// Lexical errors from the tokenizer; [`OghamError::Structural`] for tokens
    /// the grammar does not allow or a container nested deeper than
    /// [`Config::max_depth`]; [`OghamError::UnexpectedEof`] when input ends
    /// inside the document.
    pub fn next_event(&mut self) -> Result<Option<Event>> {
        let event = loop {
            if self.state == State::Done {
                return Ok(None);
            }
            if self.state == State::AfterValue && self.scopes.is_empty() {
                self.finish_document()?;
                return Ok(None);
            }
            let token = self.tokenizer.next_token()?;
            match self.state {
                State::Root | State::ArrayNext => break self.value_event(token)?,
                State::ObjectOpen | State::ObjectNext => match token {
                    Token::String => {
                        self.state = State::ObjectKey;
                        break Event::KeyName;
                    }
                    Token::EndObject if self.state == State::ObjectOpen => {
                        break self.close(Scope::Object);
                    }
                    Token::Eof => return Err(self.eof("object")),
                    _ => return Err(self.structural("expected an object key")),
                },
                State::ObjectKey => {
                    match token {
                        Token::Colon => {}
                        Token::Eof => return Err(self.eof("object")),
                        _ => return Err(self.structural("expected ':' after object key")),
                    }
                    let token = self.tokenizer.next_token()?;
                    break self.value_event(token)?;
                }
                State::ArrayOpen => {
                    if token == Token::EndArray {
                        break self.close(Scope::Array);
                    }
                    break self.value_event(token)?;
                }
                State::AfterValue => match (self.scopes.last().copied(), token) {
                    (Some(Scope::Object), Token::Comma) => self.state = State::ObjectNext,
                    (Some(Scope::Array), Token::Comma) => self.state = State::ArrayNext,
                    (Some(Scope::Object), Token::EndObject) => break self.close(Scope::Object),
                    (Some(Scope::Array), Token::EndArray) => break self.close(Scope::Array),
                    (Some(_), Token::Eof) => return Err(self.eof("document")),
                    (Some(Scope::Object), _) => {
                        return Err(self.structural("expected ',' or '}' after object member"));
                    }
                    (Some(Scope::Array), _) | (None, _) => {
                        return Err(self.structural("expected ',' or ']' after array element"));
                    }
                },
                State::Done => return Ok(None),
            }
        };
        tracing::trace!(?event, depth = self.scopes.len(), "parser event");
        self.current = Some(event);
        Ok(Some(event))
    }

    /// Text of the current [`Event::KeyName`], [`Event::ValueString`] or
    /// [`Event::ValueNumber`].
    ///
    /// # Errors
    ///
    /// Returns [`OghamError::IllegalState`] for any other event.
    pub fn string(&self) -> Result<&str> {
        match self.current {
            Some(Event::KeyName | Event::ValueString | Event::ValueNumber) => {
                Ok(self.tokenizer.text())
            }
            other => Err(illegal(format!("no string for event {other:?}"))),
        }
    }

    /// Number of the current [`Event::ValueNumber`].
    ///
    /// # Errors
    ///
    /// Returns [`OghamError::IllegalState`] for any other event.
    pub fn number(&self) -> Result<JsonNumber> {
        match self.current {
            Some(Event::ValueNumber) => JsonNumber::parse(self.tokenizer.text()),
            other => Err(illegal(format!("no number for event {other:?}"))),
        }
    }

    /// Materialise the value that starts at the current event. For a start
    /// event this consumes events through the matching end.
    ///
    /// # Errors
    ///
    /// Returns [`OghamError::IllegalState`] if the current event does not
    /// start a value, and propagates parse and duplicate key errors.
    pub fn value(&mut self) -> Result<Value> {
        match self.current {
            Some(Event::StartObject | Event::StartArray) => self.build_container(),
            Some(Event::ValueString) => Ok(Value::from(self.tokenizer.text())),
            Some(Event::ValueNumber) => self.number().map(Value::Number),
            Some(Event::ValueTrue) => Ok(Value::Bool(true)),
            Some(Event::ValueFalse) => Ok(Value::Bool(false)),
            Some(Event::ValueNull) => Ok(Value::Null),
            other => Err(illegal(format!("no value starts at event {other:?}"))),
        }
    }

    /// Materialise the object that starts at the current event.
    ///
    /// # Errors
    ///
    /// Returns [`OghamError::IllegalState`] unless the current event is
    /// [`Event::StartObject`].
    pub fn object(&mut self) -> Result<JsonObject> {
        if self.current != Some(Event::StartObject) {
            return Err(illegal("current event is not the start of an object"));
        }
        match self.build_container()? {
            Value::Object(object) => Ok(object),
            other => Err(illegal(format!("built a {} instead of an object", other.kind()))),
        }
    }

    /// Materialise the array that starts at the current event.
    ///
    /// # Errors
    ///
    /// Returns [`OghamError::IllegalState`] unless the current event is
    /// [`Event::StartArray`].
    pub fn array(&mut self) -> Result<JsonArray> {
        if self.current != Some(Event::StartArray) {
            return Err(illegal("current event is not the start of an array"));
        }
        match self.build_container()? {
            Value::Array(array) => Ok(array),
            other => Err(illegal(format!("built a {} instead of an array", other.kind()))),
        }
    }

    /// Skip to the end of the innermost open object. Does nothing outside an
    /// object.
    ///
    /// # Errors
    ///
    /// Propagates parse errors in the skipped content.
    pub fn skip_object(&mut self) -> Result<()> {
        self.skip_scope(Scope::Object)
    }

    /// Skip to the end of the innermost open array. Does nothing outside an
    /// array.
    ///
    /// # Errors
    ///
    /// Propagates parse errors in the skipped content.
    pub fn skip_array(&mut self) -> Result<()> {
        self.skip_scope(Scope::Array)
    }

    /// Release the character source
    #[must_use]
    pub fn into_source(self) -> S {
        self.tokenizer.into_source()
    }

    fn skip_scope(&mut self, scope: Scope) -> Result<()> {
        if self.scopes.last() != Some(&scope) {
            return Ok(());
        }
        let depth = self.scopes.len();
        while self.scopes.len() >= depth {
            if self.next_event()?.is_none() {
                return Err(self.eof("document"));
            }
        }
        Ok(())
    }

    fn build_container(&mut self) -> Result<Value> {
        let mut tree = TreeBuilder::new(self.duplicate_keys);
        // Latest key location of each open container, blamed for duplicates
        let mut keys: SmallVec<[Location; 32]> = SmallVec::new();
        let mut event = self.current;
        loop {
            let step = match event {
                Some(Event::StartObject) => {
                    keys.push(self.location());
                    tree.start_object()
                }
                Some(Event::StartArray) => {
                    keys.push(self.location());
                    tree.start_array()
                }
                Some(Event::EndObject | Event::EndArray) => {
                    keys.pop();
                    tree.end()
                }
                Some(Event::KeyName) => {
                    if let Some(slot) = keys.last_mut() {
                        *slot = self.location();
                    }
                    tree.key(self.tokenizer.text())
                }
                Some(Event::ValueString) => tree.value(self.tokenizer.text()),
                Some(Event::ValueNumber) => tree.value(self.number()?),
                Some(Event::ValueTrue) => tree.value(true),
                Some(Event::ValueFalse) => tree.value(false),
                Some(Event::ValueNull) => tree.value(Value::Null),
                None => return Err(self.eof("document")),
            };
            let at = keys.last().copied().unwrap_or_else(|| self.location());
            step.map_err(|e| e.at(at))?;
            if tree.depth() == 0 {
                return tree.finish();
            }
            event = self.next_event()?;
        }
    }

    fn value_event(&mut self, token: Token) -> Result<Event> {
        if matches!(token, Token::BeginObject | Token::BeginArray)
            && self.scopes.len() >= self.max_depth
        {
            return Err(self.structural(&format!(
                "containers nested deeper than {}",
                self.max_depth
            )));
        }
        let event = match token {
            Token::BeginObject => {
                self.scopes.push(Scope::Object);
                self.state = State::ObjectOpen;
                return Ok(Event::StartObject);
            }
            Token::BeginArray => {
                self.scopes.push(Scope::Array);
                self.state = State::ArrayOpen;
                return Ok(Event::StartArray);
            }
            Token::String => Event::ValueString,
            Token::Number => Event::ValueNumber,
            Token::True => Event::ValueTrue,
            Token::False => Event::ValueFalse,
            Token::Null => Event::ValueNull,
            Token::Eof => {
                return Err(self.eof(if self.scopes.is_empty() { "document" } else { "value" }));
            }
            Token::EndObject | Token::EndArray | Token::Colon | Token::Comma => {
                return Err(self.structural("expected a value"));
            }
        };
        self.state = State::AfterValue;
        Ok(event)
    }

    fn close(&mut self, scope: Scope) -> Event {
        self.scopes.pop();
        self.state = State::AfterValue;
        match scope {
            Scope::Object => Event::EndObject,
            Scope::Array => Event::EndArray,
        }
    }

    fn finish_document(&mut self) -> Result<()> {
        match self.tokenizer.next_token()? {
            Token::Eof => {
                self.state = State::Done;
                Ok(())
            }
            _ => Err(self.structural("unexpected content after the document")),
        }
    }

    fn structural(&self, message: &str) -> OghamError {
        OghamError::structural(self.tokenizer.token_location(), message)
    }

    const fn eof(&self, context: &'static str) -> OghamError {
        OghamError::UnexpectedEof {
            location: self.tokenizer.location(),
            context,
        }
    }
}

fn illegal(message: impl Into<String>) -> OghamError {
    OghamError::IllegalState(message.into())
}
