//! kvsql Database - the public entry point of the kvsql relational engine.
//!
//! # Core Components
//!
//! - `Database`: owns the storage backend and executes statements
//! - `DatabaseConfig`: storage and checking settings, loadable from TOML
//!   and the environment
//! - `init_tracing`: log output filtered by `RUST_LOG`
//!
//! # Example
//!
//! ```
//! use kvsql_core::{Literal, TypeName};
//! use kvsql_database::Database;
//! use kvsql_query::ast::{CreateTable, Insert, Select};
//!
//! let db = Database::in_memory();
//! let create = CreateTable::new("users")
//!     .column("id", TypeName::Int, true)
//!     .column("name", TypeName::Char(16), false)
//!     .primary_key(&["id"]);
//! db.execute(&create.into());
//! db.execute(&Insert::new("users", vec![Literal::Int(1), Literal::Str("Alice".into())]).into());
//!
//! let result = db.execute(&Select::new(&["users"]).into());
//! assert!(!result.is_error());
//! assert_eq!(result.rows().unwrap().len(), 1);
//! ```

pub mod config;
pub mod database;
pub mod logging;

pub use crate::config::{DatabaseConfig, StorageConfig};
pub use crate::database::{BatchItem, Database, DatabaseError};
pub use crate::logging::init_tracing;
