//! Data type definitions for kvsql.
//!
//! This module defines the scalar column types a table can declare and the
//! base kinds used when two types are compared for compatibility.

use core::fmt;
use serde::{Deserialize, Serialize};

/// Supported column data types.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "length", rename_all = "snake_case")]
pub enum DataType {
    /// 64-bit signed integer
    Int,
    /// Fixed-capacity character string; values longer than the length are truncated
    Char(u32),
    /// Calendar date, kept in its literal `YYYY-MM-DD` form
    Date,
}

/// Base kind of a data type, ignoring the Char length.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TypeKind {
    Int,
    Char,
    Date,
}

impl DataType {
    /// Returns the base kind of this type.
    #[inline]
    pub fn kind(&self) -> TypeKind {
        match self {
            DataType::Int => TypeKind::Int,
            DataType::Char(_) => TypeKind::Char,
            DataType::Date => TypeKind::Date,
        }
    }

    /// Returns true if both types share the same base kind.
    ///
    /// `char(5)` and `char(20)` agree; `int` and `date` do not.
    #[inline]
    pub fn same_kind(&self, other: &DataType) -> bool {
        self.kind() == other.kind()
    }

    /// Returns the declared length for Char columns.
    pub fn char_length(&self) -> Option<u32> {
        match self {
            DataType::Char(n) => Some(*n),
            _ => None,
        }
    }
}

/// A column type as written in a CREATE TABLE statement, before validation.
///
/// The Char length is kept signed so that `char(0)` and `char(-1)` reach the
/// schema checks instead of being lost at the parser.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TypeName {
    Int,
    Char(i64),
    Date,
}

impl TypeName {
    /// Converts to a storable type. Returns None for a Char length below 1.
    pub fn to_data_type(self) -> Option<DataType> {
        match self {
            TypeName::Int => Some(DataType::Int),
            TypeName::Date => Some(DataType::Date),
            TypeName::Char(n) if n >= 1 => Some(DataType::Char(u32::try_from(n).unwrap_or(u32::MAX))),
            TypeName::Char(_) => None,
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataType::Int => f.write_str("int"),
            DataType::Char(n) => write!(f, "char({})", n),
            DataType::Date => f.write_str("date"),
        }
    }
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeKind::Int => f.write_str("int"),
            TypeKind::Char => f.write_str("char"),
            TypeKind::Date => f.write_str("date"),
        }
    }
}
