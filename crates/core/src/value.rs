//! Value type definitions for kvsql.
//!
//! This module defines the `Value` enum which represents any value that can be
//! stored in a record cell.

use crate::types::TypeKind;
use core::cmp::Ordering;
use core::fmt;
use serde::{Deserialize, Serialize};

/// A value that can be stored in a record cell.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Value {
    /// Null value
    Null,
    /// 64-bit signed integer
    Int(i64),
    /// Character data
    Text(String),
    /// Date in its literal `YYYY-MM-DD` form
    Date(String),
}

impl Value {
    /// Returns the base kind of this value, or None if it's Null.
    pub fn kind(&self) -> Option<TypeKind> {
        match self {
            Value::Null => None,
            Value::Int(_) => Some(TypeKind::Int),
            Value::Text(_) => Some(TypeKind::Char),
            Value::Date(_) => Some(TypeKind::Date),
        }
    }

    /// Returns true if this value is Null.
    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns the text if this is Text or Date, None otherwise.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(v) | Value::Date(v) => Some(v.as_str()),
            _ => None,
        }
    }

    /// Orders two non-null values of the same kind.
    ///
    /// Integers compare numerically, text and dates lexicographically. Returns
    /// None when either side is Null or the kinds differ.
    pub fn compare(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => Some(a.cmp(b)),
            (Value::Text(a), Value::Text(b)) => Some(a.cmp(b)),
            (Value::Date(a), Value::Date(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }

    /// Returns the width this value occupies when rendered.
    pub fn display_width(&self) -> usize {
        match self {
            Value::Null => 4,
            Value::Int(v) => v.to_string().len(),
            Value::Text(s) | Value::Date(s) => s.chars().count(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.pad("NULL"),
            Value::Int(v) => f.pad(&v.to_string()),
            Value::Text(s) | Value::Date(s) => f.pad(s),
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl<T> From<Option<T>> for Value
where
    T: Into<Value>,
{
    fn from(v: Option<T>) -> Self {
        match v {
            Some(val) => val.into(),
            None => Value::Null,
        }
    }
}
