//! Relation type for query execution.

use kvsql_core::Row;

/// A relation is a list of rows with the tables they were built from.
///
/// Rows of a joined relation hold the columns of each table back to back,
/// in `tables` order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Relation {
    /// The rows in this relation.
    pub rows: Vec<Row>,
    /// Table names in this relation.
    pub tables: Vec<String>,
    /// The i-th element is the number of columns contributed by the i-th table.
    pub table_column_counts: Vec<usize>,
}

impl Relation {
    /// Creates a single-table relation.
    pub fn from_rows(rows: Vec<Row>, table: impl Into<String>, column_count: usize) -> Self {
        Self {
            rows,
            tables: vec![table.into()],
            table_column_counts: vec![column_count],
        }
    }

    /// Returns the number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns the width of every row.
    pub fn column_count(&self) -> usize {
        self.table_column_counts.iter().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Row> {
        self.rows.iter()
    }
}

impl IntoIterator for Relation {
    type Item = Row;
    type IntoIter = std::vec::IntoIter<Row>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.into_iter()
    }
}
