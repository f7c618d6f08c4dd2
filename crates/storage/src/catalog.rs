//! Catalog management for kvsql.
//!
//! This module provides the `Catalog` struct, the only code that knows the
//! key layout. Schema metadata and record payloads both live in the
//! underlying [`KvStore`].

use crate::keys;
use crate::kv::KvStore;
use hashbrown::HashSet;
use kvsql_core::schema::{Column, ForeignKey, Table};
use kvsql_core::{Error, Result, Row, RowId, Value};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

/// Typed access to the tables and records held in a store.
pub struct Catalog<'a, S: KvStore> {
    store: &'a mut S,
}

impl<'a, S: KvStore> Catalog<'a, S> {
    /// Wraps a store.
    pub fn new(store: &'a mut S) -> Self {
        Self { store }
    }

    fn read<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.store.get(key.as_bytes())? {
            Some(bytes) => Ok(Some(keys::decode(&bytes)?)),
            None => Ok(None),
        }
    }

    fn write<T: Serialize + ?Sized>(&mut self, key: &str, value: &T) -> Result<()> {
        let bytes = keys::encode(value)?;
        self.store.put(key.as_bytes(), &bytes)?;
        Ok(())
    }

    /// Returns all table names in creation order.
    pub fn list_tables(&self) -> Result<Vec<String>> {
        Ok(self.read(keys::TABLE_LIST)?.unwrap_or_default())
    }

    /// Returns true if `name` is registered.
    pub fn table_exists(&self, name: &str) -> Result<bool> {
        Ok(self.list_tables()?.iter().any(|t| t == name))
    }

    /// Returns the columns of `table`, or None if it is not registered.
    pub fn columns(&self, table: &str) -> Result<Option<Vec<Column>>> {
        self.read(&keys::columns(table))
    }

    /// Returns one column of `table`.
    pub fn column(&self, table: &str, column: &str) -> Result<Option<Column>> {
        Ok(self
            .columns(table)?
            .and_then(|cols| cols.into_iter().find(|c| c.name() == column)))
    }

    pub fn primary_key(&self, table: &str) -> Result<Option<Vec<String>>> {
        self.read(&keys::primary_key(table))
    }

    pub fn foreign_keys(&self, table: &str) -> Result<Option<Vec<ForeignKey>>> {
        self.read(&keys::foreign_keys(table))
    }

    /// Returns the live row ids of `table` in insertion order.
    pub fn record_ids(&self, table: &str) -> Result<Option<Vec<RowId>>> {
        self.read(&keys::record_ids(table))
    }

    /// Returns the current row-id counter and advances it.
    pub fn next_row_id(&mut self, table: &str) -> Result<RowId> {
        let key = keys::next_row_id(table);
        let id: RowId = self
            .read(&key)?
            .ok_or_else(|| Error::table_not_found(table))?;
        self.write(&key, &(id + 1))?;
        Ok(id)
    }

    /// Loads the full definition of `table`.
    pub fn load_table(&self, name: &str) -> Result<Table> {
        let columns = self
            .columns(name)?
            .ok_or_else(|| Error::table_not_found(name))?;
        let primary_key = self.primary_key(name)?.unwrap_or_default();
        let foreign_keys = self.foreign_keys(name)?.unwrap_or_default();
        Ok(Table::new(name, columns, primary_key, foreign_keys))
    }

    /// Registers a validated table.
    pub fn create_table(&mut self, table: &Table) -> Result<()> {
        let name = table.name();
        let mut tables = self.list_tables()?;
        if tables.iter().any(|t| t == name) {
            return Err(Error::TableExists {
                name: name.to_string(),
            });
        }

        self.write(&keys::columns(name), table.columns())?;
        self.write(&keys::primary_key(name), table.primary_key())?;
        self.write(&keys::foreign_keys(name), table.foreign_keys())?;
        self.write(&keys::next_row_id(name), &0u64)?;
        self.write(&keys::record_ids(name), &Vec::<RowId>::new())?;
        tables.push(name.to_string());
        self.write(keys::TABLE_LIST, &tables)?;

        debug!(table = name, columns = table.columns().len(), "table created");
        Ok(())
    }

    /// Removes `name` with all its metadata and records.
    pub fn drop_table(&mut self, name: &str) -> Result<()> {
        let mut tables = self.list_tables()?;
        if !tables.iter().any(|t| t == name) {
            return Err(Error::table_not_found(name));
        }
        if self
            .find_referencing_tables(name)?
            .iter()
            .any(|t| t != name)
        {
            return Err(Error::TableReferenced {
                name: name.to_string(),
            });
        }

        let prefix = keys::table_prefix(name);
        let entries = self.store.scan_prefix(prefix.as_bytes())?;
        for (key, _) in &entries {
            self.store.delete(key)?;
        }
        tables.retain(|t| t != name);
        self.write(keys::TABLE_LIST, &tables)?;

        debug!(table = name, keys = entries.len(), "table dropped");
        Ok(())
    }

    /// Returns every table with a foreign key naming `name`.
    ///
    /// Scans the whole store.
    pub fn find_referencing_tables(&self, name: &str) -> Result<Vec<String>> {
        let mut referencing = Vec::new();
        for (key, value) in self.store.scan()? {
            let Some(owner) = keys::foreign_keys_owner(&key) else {
                continue;
            };
            let fks: Vec<ForeignKey> = keys::decode(&value)?;
            if fks.iter().any(|fk| fk.references(name)) {
                referencing.push(owner.to_string());
            }
        }
        Ok(referencing)
    }

    /// Persists a record and returns its assigned row id.
    pub fn insert_row(&mut self, table: &str, values: Vec<Value>) -> Result<RowId> {
        let mut ids = self
            .record_ids(table)?
            .ok_or_else(|| Error::table_not_found(table))?;
        let id = self.next_row_id(table)?;
        self.write(&keys::row(table, id), &values)?;
        ids.push(id);
        self.write(&keys::record_ids(table), &ids)?;

        debug!(table, row_id = id, "row inserted");
        Ok(id)
    }

    /// Reads one record.
    pub fn get_row(&self, table: &str, id: RowId) -> Result<Option<Row>> {
        Ok(self
            .read::<Vec<Value>>(&keys::row(table, id))?
            .map(|values| Row::new(id, values)))
    }

    /// Reads all live records of `table` in insertion order.
    pub fn scan_rows(&self, table: &str) -> Result<Vec<Row>> {
        let ids = self
            .record_ids(table)?
            .ok_or_else(|| Error::table_not_found(table))?;
        ids.into_iter()
            .map(|id| {
                self.get_row(table, id)?.ok_or_else(|| {
                    Error::storage(format!("record {} of '{}' is missing", id, table))
                })
            })
            .collect()
    }

    /// Returns the current values of one column across all live records.
    pub fn column_values(&self, table: &str, column: &str) -> Result<Vec<Value>> {
        let index = self
            .load_table(table)?
            .get_column_index(column)
            .ok_or_else(|| Error::column_not_found(table, column))?;
        Ok(self
            .scan_rows(table)?
            .into_iter()
            .filter_map(|row| row.into_values().into_iter().nth(index))
            .collect())
    }

    /// Removes the given records and returns how many were removed.
    pub fn delete_rows(&mut self, table: &str, ids: &[RowId]) -> Result<usize> {
        let mut live = self
            .record_ids(table)?
            .ok_or_else(|| Error::table_not_found(table))?;
        let doomed: HashSet<RowId> = ids.iter().copied().collect();
        let before = live.len();
        live.retain(|id| !doomed.contains(id));

        for id in &doomed {
            self.store.delete(keys::row(table, *id).as_bytes())?;
        }
        self.write(&keys::record_ids(table), &live)?;

        let removed = before - live.len();
        debug!(table, removed, "rows deleted");
        Ok(removed)
    }
}
