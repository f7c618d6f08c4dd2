//! Literal tokens as they arrive from the statement parser.

use crate::types::{DataType, TypeKind};
use crate::value::Value;
use core::fmt;

/// A literal written in a statement.
///
/// String literals carry their content without the surrounding quotes.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Literal {
    Int(i64),
    Str(String),
    Date(String),
    Null,
}

impl Literal {
    /// Returns the base kind this literal may be stored in, or None for `null`.
    pub fn kind(&self) -> Option<TypeKind> {
        match self {
            Literal::Int(_) => Some(TypeKind::Int),
            Literal::Str(_) => Some(TypeKind::Char),
            Literal::Date(_) => Some(TypeKind::Date),
            Literal::Null => None,
        }
    }

    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, Literal::Null)
    }

    /// Converts the literal to a value without any column coercion.
    pub fn to_value(&self) -> Value {
        match self {
            Literal::Int(v) => Value::Int(*v),
            Literal::Str(s) => Value::Text(s.clone()),
            Literal::Date(s) => Value::Date(s.clone()),
            Literal::Null => Value::Null,
        }
    }

    /// Converts the literal into a value stored in a column of `data_type`.
    ///
    /// Returns None when the literal kind does not match the column kind.
    /// Char values longer than the declared length are cut to that length.
    pub fn coerce(&self, data_type: DataType) -> Option<Value> {
        match (self, data_type) {
            (Literal::Null, _) => Some(Value::Null),
            (Literal::Int(v), DataType::Int) => Some(Value::Int(*v)),
            (Literal::Date(s), DataType::Date) => Some(Value::Date(s.clone())),
            (Literal::Str(s), DataType::Char(n)) => {
                Some(Value::Text(s.chars().take(n as usize).collect()))
            }
            _ => None,
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Int(v) => write!(f, "{}", v),
            Literal::Str(s) => write!(f, "'{}'", s),
            Literal::Date(s) => f.write_str(s),
            Literal::Null => f.write_str("null"),
        }
    }
}

impl From<i64> for Literal {
    fn from(v: i64) -> Self {
        Literal::Int(v)
    }
}

impl From<&str> for Literal {
    fn from(v: &str) -> Self {
        Literal::Str(v.to_string())
    }
}
