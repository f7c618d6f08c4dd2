//! Constraint checking for kvsql.
//!
//! This module validates the catalog-dependent half of CREATE TABLE, builds
//! INSERT records under type, nullability, key and reference rules, and
//! gates DELETE on referential integrity. Nothing here writes to the store.

use crate::catalog::Catalog;
use crate::kv::KvStore;
use hashbrown::HashSet;
use kvsql_core::schema::Table;
use kvsql_core::{Error, Literal, Result, Row, Value};

/// What to do with a Char value longer than its column allows.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CharLengthPolicy {
    /// Keep the leading characters that fit.
    #[default]
    Truncate,
    /// Reject the insert with `CharTooLong`.
    Reject,
}

/// Constraint checker for validating database constraints.
pub struct ConstraintChecker;

impl ConstraintChecker {
    /// Checks a table that already passed its declaration checks against
    /// the catalog: name collision, then per foreign key the referenced
    /// table, column, base type and primary key.
    pub fn check_create<S: KvStore>(catalog: &Catalog<'_, S>, table: &Table) -> Result<()> {
        if catalog.table_exists(table.name())? {
            return Err(Error::TableExists {
                name: table.name().to_string(),
            });
        }

        for fk in table.foreign_keys() {
            if !catalog.table_exists(&fk.ref_table)? {
                return Err(Error::ReferencedTableNotFound {
                    table: fk.ref_table.clone(),
                });
            }

            let referenced = catalog
                .column(&fk.ref_table, &fk.ref_column)?
                .ok_or_else(|| Error::ReferencedColumnNotFound {
                    table: fk.ref_table.clone(),
                    column: fk.ref_column.clone(),
                })?;

            let local = table
                .get_column(&fk.column)
                .ok_or_else(|| Error::ForeignKeyColumnNotFound {
                    column: fk.column.clone(),
                })?;
            if !local.data_type().same_kind(&referenced.data_type()) {
                return Err(Error::ReferenceTypeMismatch {
                    column: fk.column.clone(),
                });
            }

            let pk = catalog.primary_key(&fk.ref_table)?.unwrap_or_default();
            if pk.len() != 1 || pk[0] != fk.ref_column {
                return Err(Error::ReferenceNotPrimaryKey {
                    table: fk.ref_table.clone(),
                    column: fk.ref_column.clone(),
                });
            }
        }

        Ok(())
    }

    /// Assembles the record an INSERT would store, in declaration order.
    ///
    /// `columns` is the optional insert column list; without one, values
    /// map onto every table column in order. Omitted columns become null.
    pub fn build_insert_row<S: KvStore>(
        catalog: &Catalog<'_, S>,
        table: &Table,
        columns: Option<&[String]>,
        values: &[Literal],
        policy: CharLengthPolicy,
    ) -> Result<Vec<Value>> {
        let targets: Vec<String> = match columns {
            Some(names) => names.iter().map(|n| n.to_lowercase()).collect(),
            None => table.columns().iter().map(|c| c.name().to_string()).collect(),
        };

        if targets.len() != values.len() {
            return Err(Error::ValueCountMismatch {
                columns: targets.len(),
                values: values.len(),
            });
        }

        for (i, name) in targets.iter().enumerate() {
            if table.get_column(name).is_none() {
                return Err(Error::column_not_found(table.name(), name.as_str()));
            }
            if targets[..i].contains(name) {
                return Err(Error::DuplicateColumn {
                    column: name.clone(),
                });
            }
        }

        let null = Literal::Null;
        let mut record = Vec::with_capacity(table.columns().len());
        for column in table.columns() {
            let literal = targets
                .iter()
                .position(|t| t == column.name())
                .map(|i| &values[i])
                .unwrap_or(&null);

            if literal.is_null() {
                if !column.is_nullable() {
                    return Err(Error::NotNullViolation {
                        column: column.name().to_string(),
                    });
                }
                record.push(Value::Null);
                continue;
            }

            if literal.kind() != Some(column.data_type().kind()) {
                return Err(Error::TypeMismatch {
                    column: column.name().to_string(),
                });
            }

            if let (CharLengthPolicy::Reject, Literal::Str(s), Some(n)) =
                (policy, literal, column.data_type().char_length())
            {
                if s.chars().count() > n as usize {
                    return Err(Error::CharTooLong {
                        column: column.name().to_string(),
                        length: n,
                    });
                }
            }

            let value = literal
                .coerce(column.data_type())
                .ok_or_else(|| Error::TypeMismatch {
                    column: column.name().to_string(),
                })?;

            for fk in table.foreign_keys().iter().filter(|fk| fk.column == column.name()) {
                let referenced: HashSet<Value> = catalog
                    .column_values(&fk.ref_table, &fk.ref_column)?
                    .into_iter()
                    .collect();
                if !referenced.contains(&value) {
                    return Err(Error::ReferentialIntegrity {
                        column: column.name().to_string(),
                        table: fk.ref_table.clone(),
                    });
                }
            }

            record.push(value);
        }

        let pk_indices: Vec<usize> = table
            .primary_key()
            .iter()
            .filter_map(|name| table.get_column_index(name))
            .collect();
        if !pk_indices.is_empty() {
            let duplicate = catalog.scan_rows(table.name())?.iter().any(|row| {
                pk_indices
                    .iter()
                    .all(|&i| row.get(i) == Some(&record[i]))
            });
            if duplicate {
                return Err(Error::DuplicatePrimaryKey {
                    table: table.name().to_string(),
                });
            }
        }

        Ok(record)
    }

    /// Checks that none of `candidates` is still referenced by a child row.
    ///
    /// Every table with a foreign key to `table` is examined, and every such
    /// key is compared against the candidate's value of the referenced
    /// column. One blocked candidate blocks the whole set.
    pub fn check_delete<S: KvStore>(
        catalog: &Catalog<'_, S>,
        table: &Table,
        candidates: &[Row],
    ) -> Result<()> {
        if candidates.is_empty() {
            return Ok(());
        }

        for child_name in catalog.find_referencing_tables(table.name())? {
            let child = catalog.load_table(&child_name)?;
            for fk in child.foreign_keys_to(table.name()) {
                let ref_index = table
                    .get_column_index(&fk.ref_column)
                    .ok_or_else(|| Error::column_not_found(table.name(), fk.ref_column.as_str()))?;
                let child_values: HashSet<Value> = catalog
                    .column_values(&child_name, &fk.column)?
                    .into_iter()
                    .filter(|v| !v.is_null())
                    .collect();

                let blocked = candidates.iter().any(|row| {
                    row.get(ref_index)
                        .map_or(false, |v| child_values.contains(v))
                });
                if blocked {
                    return Err(Error::DeleteBlocked {
                        count: candidates.len(),
                    });
                }
            }
        }

        Ok(())
    }
}
