//! Table definition for kvsql schemas.

use super::column::Column;
use super::constraint::ForeignKey;
use crate::error::{Error, Result};
use crate::types::TypeName;
use serde::{Deserialize, Serialize};

/// A table definition in the catalog.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    /// Table name, lower-cased.
    name: String,
    /// Column definitions in declaration order.
    columns: Vec<Column>,
    /// Primary key column names; empty when the table has none.
    primary_key: Vec<String>,
    /// Foreign keys in declaration order.
    foreign_keys: Vec<ForeignKey>,
}

impl Table {
    /// Assembles a table from already validated parts.
    pub fn new(
        name: impl Into<String>,
        columns: Vec<Column>,
        primary_key: Vec<String>,
        foreign_keys: Vec<ForeignKey>,
    ) -> Self {
        Self {
            name: name.into().to_lowercase(),
            columns,
            primary_key,
            foreign_keys,
        }
    }

    /// Returns the table name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the columns.
    #[inline]
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Returns the primary key column names.
    #[inline]
    pub fn primary_key(&self) -> &[String] {
        &self.primary_key
    }

    /// Returns the foreign keys.
    #[inline]
    pub fn foreign_keys(&self) -> &[ForeignKey] {
        &self.foreign_keys
    }

    /// Gets a column by name.
    pub fn get_column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name() == name)
    }

    /// Gets a column index by name.
    pub fn get_column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name() == name)
    }

    /// Returns the foreign keys that point at `table`.
    pub fn foreign_keys_to<'a>(&'a self, table: &'a str) -> impl Iterator<Item = &'a ForeignKey> {
        self.foreign_keys.iter().filter(move |fk| fk.references(table))
    }
}

struct ColumnDecl {
    name: String,
    type_name: TypeName,
    not_null: bool,
}

/// Builder for table definitions.
///
/// Declarations are collected as written and only checked by [`build`],
/// which reports the first problem in this order: duplicate column, bad
/// char length, repeated primary key clause, unknown primary key column,
/// unknown foreign key column, self reference. Checks that need the catalog
/// happen elsewhere.
///
/// [`build`]: TableBuilder::build
pub struct TableBuilder {
    name: String,
    columns: Vec<ColumnDecl>,
    pk_clauses: Vec<Vec<String>>,
    foreign_keys: Vec<ForeignKey>,
}

impl TableBuilder {
    /// Creates a new table builder.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into().to_lowercase(),
            columns: Vec::new(),
            pk_clauses: Vec::new(),
            foreign_keys: Vec::new(),
        }
    }

    /// Adds a column declaration.
    pub fn add_column(mut self, name: impl Into<String>, type_name: TypeName, not_null: bool) -> Self {
        self.columns.push(ColumnDecl {
            name: name.into().to_lowercase(),
            type_name,
            not_null,
        });
        self
    }

    /// Adds a primary key clause.
    pub fn add_primary_key<S: AsRef<str>>(mut self, columns: &[S]) -> Self {
        self.pk_clauses
            .push(columns.iter().map(|c| c.as_ref().to_lowercase()).collect());
        self
    }

    /// Adds a foreign key clause.
    pub fn add_foreign_key(
        mut self,
        column: impl Into<String>,
        ref_table: impl Into<String>,
        ref_column: impl Into<String>,
    ) -> Self {
        self.foreign_keys
            .push(ForeignKey::new(column, ref_table, ref_column));
        self
    }

    /// Validates the declarations and builds the table.
    pub fn build(self) -> Result<Table> {
        for (i, decl) in self.columns.iter().enumerate() {
            if self.columns[..i].iter().any(|c| c.name == decl.name) {
                return Err(Error::DuplicateColumn {
                    column: decl.name.clone(),
                });
            }
        }

        let mut types = Vec::with_capacity(self.columns.len());
        for decl in &self.columns {
            match decl.type_name.to_data_type() {
                Some(data_type) => types.push(data_type),
                None => {
                    let length = match decl.type_name {
                        TypeName::Char(n) => n,
                        _ => 0,
                    };
                    return Err(Error::InvalidCharLength {
                        column: decl.name.clone(),
                        length,
                    });
                }
            }
        }

        if self.pk_clauses.len() > 1 {
            return Err(Error::DuplicatePrimaryKeyDefinition);
        }

        let mut primary_key: Vec<String> = Vec::new();
        for column in self.pk_clauses.into_iter().flatten() {
            if !self.columns.iter().any(|c| c.name == column) {
                return Err(Error::PrimaryKeyColumnNotFound { column });
            }
            if !primary_key.contains(&column) {
                primary_key.push(column);
            }
        }

        for fk in &self.foreign_keys {
            if !self.columns.iter().any(|c| c.name == fk.column) {
                return Err(Error::ForeignKeyColumnNotFound {
                    column: fk.column.clone(),
                });
            }
        }

        if self.foreign_keys.iter().any(|fk| fk.references(&self.name)) {
            return Err(Error::SelfReference { table: self.name });
        }

        let columns = self
            .columns
            .into_iter()
            .zip(types)
            .map(|(decl, data_type)| {
                let is_pk = primary_key.contains(&decl.name);
                let is_fk = self.foreign_keys.iter().any(|fk| fk.column == decl.name);
                Column::new(decl.name, data_type)
                    .nullable(!decl.not_null)
                    .primary_key(is_pk)
                    .foreign_key(is_fk)
            })
            .collect();

        Ok(Table::new(self.name, columns, primary_key, self.foreign_keys))
    }
}
