//! Error types for kvsql.
//!
//! Every semantic rejection a statement can hit has its own variant; the
//! `Display` text is what callers see in a failed `QueryResult`.

use crate::types::TypeKind;
use thiserror::Error;

/// Result type alias for kvsql operations.
pub type Result<T> = core::result::Result<T, Error>;

/// Broad classification of errors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Invalid table declaration.
    Schema,
    /// Table lookup or lifecycle failure.
    Catalog,
    /// Value does not fit its column.
    DmlType,
    /// Key or reference constraint violated.
    Integrity,
    /// WHERE clause or projection could not be resolved.
    WhereClause,
    /// Underlying key-value store failed.
    Storage,
}

/// Error types for kvsql operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    // Schema
    #[error("Create table has failed: column '{column}' is defined more than once")]
    DuplicateColumn { column: String },
    #[error("Char length should be over 0 (column '{column}' declares {length})")]
    InvalidCharLength { column: String, length: i64 },
    #[error("Create table has failed: primary key definition is duplicated")]
    DuplicatePrimaryKeyDefinition,
    #[error("Create table has failed: '{column}' does not exist in column definition")]
    PrimaryKeyColumnNotFound { column: String },
    #[error("Create table has failed: '{column}' does not exist in column definition")]
    ForeignKeyColumnNotFound { column: String },
    #[error("Create table has failed: foreign key references itself")]
    SelfReference { table: String },
    #[error("Create table has failed: foreign key references non existing table '{table}'")]
    ReferencedTableNotFound { table: String },
    #[error("Create table has failed: foreign key references non existing column '{table}.{column}'")]
    ReferencedColumnNotFound { table: String, column: String },
    #[error("Create table has failed: foreign key '{column}' references wrong type")]
    ReferenceTypeMismatch { column: String },
    #[error("Create table has failed: foreign key references non primary key column '{table}.{column}'")]
    ReferenceNotPrimaryKey { table: String, column: String },

    // Catalog
    #[error("Create table has failed: table with the same name already exists")]
    TableExists { name: String },
    #[error("No such table")]
    TableNotFound { name: String },
    #[error("Drop table has failed: '{name}' is referenced by other table")]
    TableReferenced { name: String },

    // DML type
    #[error("Insertion has failed: '{column}' does not exist")]
    ColumnNotFound { table: String, column: String },
    #[error("Insertion has failed: Types are not matched")]
    TypeMismatch { column: String },
    #[error("Insertion has failed: Types are not matched")]
    ValueCountMismatch { columns: usize, values: usize },
    #[error("Insertion has failed: '{column}' is not nullable")]
    NotNullViolation { column: String },
    #[error("Insertion has failed: value for '{column}' exceeds char({length})")]
    CharTooLong { column: String, length: u32 },

    // Integrity
    #[error("Insertion has failed: Primary key duplication")]
    DuplicatePrimaryKey { table: String },
    #[error("Insertion has failed: Referential integrity violation")]
    ReferentialIntegrity { column: String, table: String },
    #[error("{count} row(s) are not deleted due to referential integrity")]
    DeleteBlocked { count: usize },

    // WHERE clause / projection
    #[error("Where clause trying to reference tables which are not specified")]
    TableNotInScope { table: String },
    #[error("Where clause trying to reference non existing column")]
    UnknownColumn { column: String },
    #[error("Where clause contains ambiguous reference")]
    AmbiguousReference { column: String },
    #[error("Where clause trying to compare incomparable values")]
    IncomparableTypes { left: Option<TypeKind>, right: Option<TypeKind> },
    #[error("Selection has failed: fail to resolve '{column}'")]
    ColumnResolution { column: String },
    #[error("Selection has failed: '{name}' does not exist")]
    SelectTableNotFound { name: String },

    // Storage
    #[error("Storage failure: {message}")]
    Storage { message: String },
}

impl Error {
    /// Returns the classification of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::DuplicateColumn { .. }
            | Error::InvalidCharLength { .. }
            | Error::DuplicatePrimaryKeyDefinition
            | Error::PrimaryKeyColumnNotFound { .. }
            | Error::ForeignKeyColumnNotFound { .. }
            | Error::SelfReference { .. }
            | Error::ReferencedTableNotFound { .. }
            | Error::ReferencedColumnNotFound { .. }
            | Error::ReferenceTypeMismatch { .. }
            | Error::ReferenceNotPrimaryKey { .. } => ErrorKind::Schema,
            Error::TableExists { .. }
            | Error::TableNotFound { .. }
            | Error::TableReferenced { .. }
            | Error::SelectTableNotFound { .. } => ErrorKind::Catalog,
            Error::ColumnNotFound { .. }
            | Error::TypeMismatch { .. }
            | Error::ValueCountMismatch { .. }
            | Error::NotNullViolation { .. }
            | Error::CharTooLong { .. } => ErrorKind::DmlType,
            Error::DuplicatePrimaryKey { .. }
            | Error::ReferentialIntegrity { .. }
            | Error::DeleteBlocked { .. } => ErrorKind::Integrity,
            Error::TableNotInScope { .. }
            | Error::UnknownColumn { .. }
            | Error::AmbiguousReference { .. }
            | Error::IncomparableTypes { .. }
            | Error::ColumnResolution { .. } => ErrorKind::WhereClause,
            Error::Storage { .. } => ErrorKind::Storage,
        }
    }

    /// Creates a table not found error.
    pub fn table_not_found(name: impl Into<String>) -> Self {
        Error::TableNotFound { name: name.into() }
    }

    /// Creates a column not found error.
    pub fn column_not_found(table: impl Into<String>, column: impl Into<String>) -> Self {
        Error::ColumnNotFound {
            table: table.into(),
            column: column.into(),
        }
    }

    /// Creates a storage error.
    pub fn storage(message: impl Into<String>) -> Self {
        Error::Storage {
            message: message.into(),
        }
    }

    /// Creates an incomparable types error.
    pub fn incomparable(left: Option<TypeKind>, right: Option<TypeKind>) -> Self {
        Error::IncomparableTypes { left, right }
    }
}
