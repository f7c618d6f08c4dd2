//! Key layout and value codec for catalog and record entries.
//!
//! ```text
//! table_list                      [table names]
//! table_list/{t}/columns          [Column]
//! table_list/{t}/primary_key      [column names]
//! table_list/{t}/foreign_keys     [ForeignKey]
//! table_list/{t}/next_row_id      u64
//! table_list/{t}/record_ids       [u64]
//! table_list/{t}/rows/{row_id}    [Value]
//! ```

use crate::kv::StoreResult;
use kvsql_core::RowId;
use serde::de::DeserializeOwned;
use serde::Serialize;

pub(crate) const TABLE_LIST: &str = "table_list";

const FOREIGN_KEYS_SUFFIX: &str = "/foreign_keys";

pub(crate) fn table_prefix(table: &str) -> String {
    format!("{}/{}/", TABLE_LIST, table)
}

pub(crate) fn columns(table: &str) -> String {
    format!("{}columns", table_prefix(table))
}

pub(crate) fn primary_key(table: &str) -> String {
    format!("{}primary_key", table_prefix(table))
}

pub(crate) fn foreign_keys(table: &str) -> String {
    format!("{}foreign_keys", table_prefix(table))
}

pub(crate) fn next_row_id(table: &str) -> String {
    format!("{}next_row_id", table_prefix(table))
}

pub(crate) fn record_ids(table: &str) -> String {
    format!("{}record_ids", table_prefix(table))
}

pub(crate) fn row(table: &str, id: RowId) -> String {
    format!("{}rows/{}", table_prefix(table), id)
}

/// Extracts the table name from a `table_list/{t}/foreign_keys` key.
pub(crate) fn foreign_keys_owner(key: &[u8]) -> Option<&str> {
    let key = std::str::from_utf8(key).ok()?;
    let rest = key.strip_prefix(TABLE_LIST)?.strip_prefix('/')?;
    let table = rest.strip_suffix(FOREIGN_KEYS_SUFFIX)?;
    if table.is_empty() || table.contains('/') {
        return None;
    }
    Some(table)
}

pub(crate) fn encode<T: Serialize + ?Sized>(value: &T) -> StoreResult<Vec<u8>> {
    Ok(serde_json::to_vec(value)?)
}

pub(crate) fn decode<T: DeserializeOwned>(bytes: &[u8]) -> StoreResult<T> {
    Ok(serde_json::from_slice(bytes)?)
}
