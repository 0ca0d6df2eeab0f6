//! Log records and severity levels

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::attr::{Attr, BAD_KEY, RawArg, Value};

/// Record severity, ordered from least to most severe
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub enum Level {
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Level::Debug => write!(f, "DEBUG"),
            Level::Info => write!(f, "INFO"),
            Level::Warn => write!(f, "WARN"),
            Level::Error => write!(f, "ERROR"),
        }
    }
}

/// Error returned when parsing a level from a string
#[derive(Debug, Error)]
#[error("Unknown log level: {0}")]
pub struct ParseLevelError(String);

impl FromStr for Level {
    type Err = ParseLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "debug" => Ok(Level::Debug),
            "info" => Ok(Level::Info),
            "warn" | "warning" => Ok(Level::Warn),
            "error" => Ok(Level::Error),
            other => Err(ParseLevelError(other.to_string())),
        }
    }
}

/// A log record under construction
///
/// Records are plain values: cloning produces an independent copy, which is
/// what lets a decorator augment a record without touching the caller's
/// original.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    time: DateTime<Utc>,
    level: Level,
    message: String,
    attrs: Vec<Attr>,
}

impl Record {
    /// Create a record stamped with the current time and no attributes
    pub fn new(level: Level, message: impl Into<String>) -> Self {
        Self {
            time: Utc::now(),
            level,
            message: message.into(),
            attrs: Vec::new(),
        }
    }

    pub fn time(&self) -> DateTime<Utc> {
        self.time
    }

    pub fn level(&self) -> Level {
        self.level
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// The attributes appended so far, in append order
    pub fn attrs(&self) -> &[Attr] {
        &self.attrs
    }

    /// Append pre-typed attributes, preserving their order
    pub fn add_attrs(&mut self, attrs: impl IntoIterator<Item = Attr>) {
        self.attrs.extend(attrs);
    }

    /// Swap in a fully rewritten attribute list, keeping time/level/message
    ///
    /// Used by terminal sinks that qualify or reorder attributes while
    /// finishing a record.
    pub(crate) fn replace_attrs(&mut self, attrs: Vec<Attr>) {
        self.attrs = attrs;
    }

    /// Append raw `key, value, ...` tokens, pairing them into attributes
    ///
    /// The pairing is lenient rather than validating:
    /// - an [`Attr`] token is appended as-is;
    /// - a string token consumes the following token as its value; when that
    ///   follower is itself an `Attr`, the value becomes a single-entry
    ///   group;
    /// - a trailing string with no follower, or any other lone value, is
    ///   kept under [`BAD_KEY`].
    pub fn add_args(&mut self, args: impl IntoIterator<Item = RawArg>) {
        let mut tokens = args.into_iter();
        while let Some(token) = tokens.next() {
            match token {
                RawArg::Attr(attr) => self.attrs.push(attr),
                RawArg::Value(Value::String(key)) => match tokens.next() {
                    Some(RawArg::Value(value)) => self.attrs.push(Attr { key, value }),
                    Some(RawArg::Attr(attr)) => {
                        self.attrs.push(Attr::group(key, vec![attr]));
                    }
                    None => self.attrs.push(Attr::new(BAD_KEY, key)),
                },
                RawArg::Value(value) => self.attrs.push(Attr { key: BAD_KEY.to_string(), value }),
            }
        }
    }
}
