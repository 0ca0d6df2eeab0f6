//! Attribute types for structured log records
//!
//! An [`Attr`] is a named, typed value carried by a record. [`Value`] covers
//! the scalar kinds plus nested groups. [`RawArg`] is one token of the loose
//! `key, value, key, value, ...` calling convention; raw tokens are stored
//! verbatim and only paired into attributes at merge time (see
//! [`Record::add_args`](crate::Record::add_args)).

use std::fmt;

use serde::{Deserialize, Serialize};

/// Key synthesized for malformed raw-argument sequences
///
/// A trailing key with no value, or a value with no preceding key, is kept
/// under this key instead of being dropped.
pub const BAD_KEY: &str = "!BADKEY";

/// A named, typed value attached to a log record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attr {
    pub key: String,
    pub value: Value,
}

impl Attr {
    /// Create an attribute from a key and anything convertible to a [`Value`]
    pub fn new(key: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Create a group attribute namespacing `attrs` under `key`
    pub fn group(key: impl Into<String>, attrs: Vec<Attr>) -> Self {
        Self {
            key: key.into(),
            value: Value::Group(attrs),
        }
    }
}

impl fmt::Display for Attr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.key, self.value)
    }
}

/// The value half of an attribute
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    String(String),
    Int(i64),
    Uint(u64),
    Float(f64),
    Bool(bool),
    /// A nested, named set of attributes
    Group(Vec<Attr>),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => write!(f, "{}", s),
            Value::Int(i) => write!(f, "{}", i),
            Value::Uint(u) => write!(f, "{}", u),
            Value::Float(x) => write!(f, "{}", x),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Group(attrs) => {
                write!(f, "[")?;
                for (i, attr) in attrs.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{}", attr)?;
                }
                write!(f, "]")
            }
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<u64> for Value {
    fn from(u: u64) -> Self {
        Value::Uint(u)
    }
}

impl From<u32> for Value {
    fn from(u: u32) -> Self {
        Value::Uint(u64::from(u))
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<Vec<Attr>> for Value {
    fn from(attrs: Vec<Attr>) -> Self {
        Value::Group(attrs)
    }
}

/// One token of a raw `key, value, ...` argument sequence
///
/// Either a bare value (a key candidate when it is a string, otherwise a
/// dangling value) or an already-formed attribute that passes through the
/// pairing untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RawArg {
    Value(Value),
    Attr(Attr),
}

impl From<Value> for RawArg {
    fn from(v: Value) -> Self {
        RawArg::Value(v)
    }
}

impl From<Attr> for RawArg {
    fn from(a: Attr) -> Self {
        RawArg::Attr(a)
    }
}

impl From<&str> for RawArg {
    fn from(s: &str) -> Self {
        RawArg::Value(Value::from(s))
    }
}

impl From<String> for RawArg {
    fn from(s: String) -> Self {
        RawArg::Value(Value::from(s))
    }
}

impl From<i64> for RawArg {
    fn from(i: i64) -> Self {
        RawArg::Value(Value::from(i))
    }
}

impl From<i32> for RawArg {
    fn from(i: i32) -> Self {
        RawArg::Value(Value::from(i))
    }
}

impl From<u64> for RawArg {
    fn from(u: u64) -> Self {
        RawArg::Value(Value::from(u))
    }
}

impl From<u32> for RawArg {
    fn from(u: u32) -> Self {
        RawArg::Value(Value::from(u))
    }
}

impl From<f64> for RawArg {
    fn from(x: f64) -> Self {
        RawArg::Value(Value::from(x))
    }
}

impl From<bool> for RawArg {
    fn from(b: bool) -> Self {
        RawArg::Value(Value::from(b))
    }
}

/// Build a `Vec<RawArg>` from heterogeneous tokens
///
/// ```
/// use ctxlog::{args, Attr};
///
/// let tokens = args!["user", "bob", "attempt", 3, Attr::new("cached", true)];
/// assert_eq!(tokens.len(), 5);
/// ```
#[macro_export]
macro_rules! args {
    ($($token:expr),* $(,)?) => {
        vec![$($crate::RawArg::from($token)),*]
    };
}
