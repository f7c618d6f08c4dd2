//! Table scan executor.

use crate::executor::Relation;
use kvsql_core::{Result, Row};
use kvsql_core::schema::Table;
use kvsql_storage::{Catalog, KvStore};

/// Table scan executor - reads every live record of a table.
pub struct TableScanExecutor<'t> {
    table: &'t Table,
}

impl<'t> TableScanExecutor<'t> {
    /// Creates a new table scan executor.
    pub fn new(table: &'t Table) -> Self {
        Self { table }
    }

    /// Executes the scan and returns the relation.
    pub fn execute<S: KvStore>(&self, catalog: &Catalog<'_, S>) -> Result<Relation> {
        let rows: Vec<Row> = catalog.scan_rows(self.table.name())?;
        Ok(Relation::from_rows(
            rows,
            self.table.name(),
            self.table.columns().len(),
        ))
    }
}
