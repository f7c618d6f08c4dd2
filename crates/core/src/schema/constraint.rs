//! Constraint definitions for kvsql schemas.

use serde::{Deserialize, Serialize};

/// A foreign key: one local column referencing one column of another table.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ForeignKey {
    /// Referencing column in the owning table.
    pub column: String,
    /// Referenced table.
    pub ref_table: String,
    /// Referenced column in `ref_table`.
    pub ref_column: String,
}

impl ForeignKey {
    /// Creates a new foreign key, folding all identifiers to lower case.
    pub fn new(
        column: impl Into<String>,
        ref_table: impl Into<String>,
        ref_column: impl Into<String>,
    ) -> Self {
        Self {
            column: column.into().to_lowercase(),
            ref_table: ref_table.into().to_lowercase(),
            ref_column: ref_column.into().to_lowercase(),
        }
    }

    /// Returns true if this key points at `table`.
    #[inline]
    pub fn references(&self, table: &str) -> bool {
        self.ref_table == table
    }
}
