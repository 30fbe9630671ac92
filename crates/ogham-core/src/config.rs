// SPDX-License-Identifier: MIT OR Apache-2.0
//! Configuration shared by readers, writers and builders

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{OghamError, Result};

/// Policy for an object key that appears more than once
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DuplicateKeyStrategy {
    /// Keep the value of the first occurrence, ignore later ones
    First,
    /// Later occurrences overwrite earlier ones
    #[default]
    Last,
    /// Reject the document or the `put`
    #[serde(alias = "none")]
    Fail,
}

impl FromStr for DuplicateKeyStrategy {
    type Err = OghamError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "first" => Ok(Self::First),
            "last" => Ok(Self::Last),
            "fail" | "none" => Ok(Self::Fail),
            _ => Err(OghamError::Config {
                key: "duplicate_keys".into(),
                value: s.into(),
            }),
        }
    }
}

impl fmt::Display for DuplicateKeyStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::First => "first",
            Self::Last => "last",
            Self::Fail => "fail",
        })
    }
}

/// How a generator writes `NaN` and the infinities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NonFiniteMode {
    /// Write `null`
    Null,
    /// Write `"NaN"`, `"Infinity"` or `"-Infinity"`
    String,
    /// Refuse with [`OghamError::NonFinite`]
    #[default]
    Error,
}

impl FromStr for NonFiniteMode {
    type Err = OghamError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "null" => Ok(Self::Null),
            "string" => Ok(Self::String),
            "error" => Ok(Self::Error),
            _ => Err(OghamError::Config {
                key: "non_finite".into(),
                value: s.into(),
            }),
        }
    }
}

/// Reader, writer and builder configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Pretty-print generated output
    pub pretty: bool,
    /// Spaces per nesting level when pretty-printing
    pub indent: usize,
    /// Treatment of non-finite floats on output
    pub non_finite: NonFiniteMode,
    /// Duplicate key policy for parsing and object builders
    pub duplicate_keys: DuplicateKeyStrategy,
    /// Initial capacity of the tokenizer's literal buffer
    pub buffer_size: usize,
    /// Deepest container nesting a parser accepts
    pub max_depth: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            pretty: false,
            indent: 4,
            non_finite: NonFiniteMode::Error,
            duplicate_keys: DuplicateKeyStrategy::Last,
            buffer_size: 64,
            max_depth: 128,
        }
    }
}

impl Config {
    /// Compact output, default policies
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable pretty printing
    #[must_use]
    pub const fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    /// Set the indentation width used when pretty printing
    #[must_use]
    pub const fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    /// Set the duplicate key policy
    #[must_use]
    pub const fn with_duplicate_keys(mut self, strategy: DuplicateKeyStrategy) -> Self {
        self.duplicate_keys = strategy;
        self
    }

    /// Set the non-finite float policy
    #[must_use]
    pub const fn with_non_finite(mut self, mode: NonFiniteMode) -> Self {
        self.non_finite = mode;
        self
    }

    /// Set the deepest container nesting a parser accepts
    #[must_use]
    pub const fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Build a configuration from string options.
    ///
    /// Recognised keys are `pretty`, `indent`, `non_finite`, `duplicate_keys`,
    /// `buffer_size` and `max_depth`. Unknown keys are ignored so a map can be shared with
    /// other components.
    ///
    /// # Errors
    ///
    /// Returns [`OghamError::Config`] when a recognised key has a value that
    /// does not parse.
    pub fn from_map<K, V, S>(options: &HashMap<K, V, S>) -> Result<Self>
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut config = Self::default();
        for (key, value) in options {
            let (key, value) = (key.as_ref(), value.as_ref());
            let invalid = || OghamError::Config {
                key: key.into(),
                value: value.into(),
            };
            match key {
                "pretty" => config.pretty = value.parse().map_err(|_| invalid())?,
                "indent" => config.indent = value.parse().map_err(|_| invalid())?,
                "buffer_size" => config.buffer_size = value.parse().map_err(|_| invalid())?,
                "max_depth" => config.max_depth = value.parse().map_err(|_| invalid())?,
                "non_finite" => config.non_finite = value.parse()?,
                "duplicate_keys" => config.duplicate_keys = value.parse()?,
                _ => tracing::trace!(key, "ignoring unknown config option"),
            }
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert!(!config.pretty);
        assert_eq!(config.indent, 4);
        assert_eq!(config.duplicate_keys, DuplicateKeyStrategy::Last);
        assert_eq!(config.non_finite, NonFiniteMode::Error);
        assert_eq!(config.max_depth, 128);
    }

    #[test]
    fn test_from_map() {
        let mut options = HashMap::new();
        options.insert("pretty", "true");
        options.insert("duplicate_keys", "FIRST");
        options.insert("non_finite", "string");
        options.insert("something_else", "whatever");
        options.insert("max_depth", "16");
        let config = Config::from_map(&options).unwrap();
        assert_eq!(config.max_depth, 16);
        assert!(config.pretty);
        assert_eq!(config.duplicate_keys, DuplicateKeyStrategy::First);
        assert_eq!(config.non_finite, NonFiniteMode::String);
    }

    #[test]
    fn test_from_map_rejects_bad_value() {
        let mut options = HashMap::new();
        options.insert("indent".to_string(), "wide".to_string());
        assert!(matches!(
            Config::from_map(&options),
            Err(OghamError::Config { .. })
        ));
    }

    #[test]
    fn test_strategy_parse() {
        assert_eq!(
            "none".parse::<DuplicateKeyStrategy>().unwrap(),
            DuplicateKeyStrategy::Fail
        );
        assert!("sometimes".parse::<DuplicateKeyStrategy>().is_err());
    }

    #[test]
    fn test_deserialize() {
        let config: Config =
            serde_json::from_str(r#"{"pretty": true, "duplicate_keys": "fail"}"#).unwrap();
        assert!(config.pretty);
        assert_eq!(config.duplicate_keys, DuplicateKeyStrategy::Fail);
        assert_eq!(config.indent, 4);
    }
}
