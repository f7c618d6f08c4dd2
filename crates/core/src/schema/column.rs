//! Column definition for kvsql schemas.

use crate::types::DataType;
use serde::{Deserialize, Serialize};

/// A column definition in a table schema.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    /// Column name, lower-cased.
    name: String,
    /// Data type of the column.
    data_type: DataType,
    /// Whether this column allows null values.
    nullable: bool,
    /// Whether this column is part of the primary key.
    primary_key: bool,
    /// Whether this column references another table.
    foreign_key: bool,
}

impl Column {
    /// Creates a new nullable column definition.
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into().to_lowercase(),
            data_type,
            nullable: true,
            primary_key: false,
            foreign_key: false,
        }
    }

    /// Sets whether this column is nullable.
    pub fn nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    /// Marks this column as a primary key column. Primary key columns never
    /// accept nulls.
    pub fn primary_key(mut self, primary_key: bool) -> Self {
        self.primary_key = primary_key;
        if primary_key {
            self.nullable = false;
        }
        self
    }

    /// Marks this column as a foreign key column.
    pub fn foreign_key(mut self, foreign_key: bool) -> Self {
        self.foreign_key = foreign_key;
        self
    }

    /// Returns the column name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the data type.
    #[inline]
    pub fn data_type(&self) -> DataType {
        self.data_type
    }

    /// Returns whether this column is nullable.
    #[inline]
    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    #[inline]
    pub fn is_primary_key(&self) -> bool {
        self.primary_key
    }

    #[inline]
    pub fn is_foreign_key(&self) -> bool {
        self.foreign_key
    }

    /// Returns the `key` label shown by DESC.
    pub fn key_label(&self) -> &'static str {
        match (self.primary_key, self.foreign_key) {
            (true, true) => "PRI/FOR",
            (true, false) => "PRI",
            (false, true) => "FOR",
            (false, false) => "",
        }
    }
}
