//! kvsql Storage - persistence and integrity layer for kvsql.
//!
//! This crate provides:
//!
//! - `KvStore`: the key-value adapter, with `MemoryStore` and `FileStore`
//! - `StoreHandle`: one scoped acquisition of a store
//! - `Catalog`: typed access to tables and records over a store
//! - `ConstraintChecker`: DDL and DML constraint validation
//!
//! # Example
//!
//! ```rust
//! use kvsql_storage::{Catalog, MemoryStore};
//! use kvsql_core::schema::TableBuilder;
//! use kvsql_core::{TypeName, Value};
//!
//! let mut store = MemoryStore::new();
//! let mut catalog = Catalog::new(&mut store);
//! let table = TableBuilder::new("person")
//!     .add_column("id", TypeName::Int, false)
//!     .add_primary_key(&["id"])
//!     .build()
//!     .unwrap();
//! catalog.create_table(&table).unwrap();
//!
//! let id = catalog.insert_row("person", vec![Value::Int(1)]).unwrap();
//! assert_eq!(catalog.record_ids("person").unwrap(), Some(vec![id]));
//! ```

pub mod catalog;
pub mod constraint;
mod keys;
pub mod kv;

pub use catalog::Catalog;
pub use constraint::{CharLengthPolicy, ConstraintChecker};
pub use kv::{FileStore, KvStore, MemoryStore, StoreError, StoreHandle, StoreResult};
