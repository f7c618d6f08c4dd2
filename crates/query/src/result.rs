//! Statement outcomes.

use kvsql_core::{Error, ErrorKind, Value};

/// Rows produced by a SELECT.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ResultSet {
    /// Qualified column names (`table.column`), in projection order.
    pub columns: Vec<String>,
    /// One value list per record, aligned with `columns`.
    pub records: Vec<Vec<Value>>,
}

impl ResultSet {
    pub fn new(columns: Vec<String>, records: Vec<Vec<Value>>) -> Self {
        Self { columns, records }
    }

    /// Returns the number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Looks up a record's value by qualified column name.
    pub fn value(&self, record: usize, column: &str) -> Option<&Value> {
        let index = self.columns.iter().position(|c| c == column)?;
        self.records.get(record)?.get(index)
    }
}

/// The outcome of one statement.
#[derive(Clone, Debug, PartialEq)]
pub struct QueryResult {
    is_error: bool,
    kind: Option<ErrorKind>,
    message: String,
    rows: Option<ResultSet>,
}

impl QueryResult {
    /// A successful outcome carrying only a message.
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            is_error: false,
            kind: None,
            message: message.into(),
            rows: None,
        }
    }

    /// Attaches a row payload.
    pub fn with_rows(mut self, rows: ResultSet) -> Self {
        self.rows = Some(rows);
        self
    }

    /// A rejected statement.
    pub fn failure(error: &Error) -> Self {
        Self {
            is_error: true,
            kind: Some(error.kind()),
            message: error.to_string(),
            rows: None,
        }
    }

    /// The result reported for input that could not be parsed.
    pub fn syntax_error() -> Self {
        Self {
            is_error: true,
            kind: None,
            message: "Syntax error".to_string(),
            rows: None,
        }
    }

    #[inline]
    pub fn is_error(&self) -> bool {
        self.is_error
    }

    /// Returns the error classification, if this is a semantic failure.
    #[inline]
    pub fn kind(&self) -> Option<ErrorKind> {
        self.kind
    }

    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn rows(&self) -> Option<&ResultSet> {
        self.rows.as_ref()
    }
}
