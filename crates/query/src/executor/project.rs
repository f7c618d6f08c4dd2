//! Project executor.

use crate::ast::ColumnRef;
use crate::executor::Relation;
use kvsql_core::Value;

/// Project executor - picks resolved columns out of each row.
pub struct ProjectExecutor {
    columns: Vec<ColumnRef>,
}

impl ProjectExecutor {
    /// Creates a new project executor.
    pub fn new(columns: Vec<ColumnRef>) -> Self {
        Self { columns }
    }

    /// Returns the projected column names, qualified as `table.column`.
    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(ColumnRef::normalized_name).collect()
    }

    /// Executes the projection, returning one value list per input row.
    pub fn execute(&self, input: Relation) -> Vec<Vec<Value>> {
        input
            .into_iter()
            .map(|row| {
                self.columns
                    .iter()
                    .map(|c| row.get(c.index).cloned().unwrap_or(Value::Null))
                    .collect()
            })
            .collect()
    }
}
