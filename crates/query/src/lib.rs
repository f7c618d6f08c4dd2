//! kvsql Query - statement execution for the kvsql relational engine.
//!
//! This crate turns parsed statements into results:
//!
//! - `ast`: Statement, expression and predicate definitions
//! - `scope`: Column name resolution and WHERE clause compilation
//! - `executor`: Relation operators (scan, cartesian product, filter, project)
//!   and the statement executor
//! - `result`: Statement outcomes
//! - `render`: Text rendering of schemas, table lists and result sets
//!
//! # Example
//!
//! ```
//! use kvsql_core::{Literal, TypeName};
//! use kvsql_query::ast::{CreateTable, Insert, Select};
//! use kvsql_query::executor::{ExecutionOptions, QueryExecutor};
//! use kvsql_storage::MemoryStore;
//!
//! let mut store = MemoryStore::new();
//! let mut executor = QueryExecutor::new(&mut store, ExecutionOptions::default());
//!
//! let create = CreateTable::new("people").column("id", TypeName::Int, true);
//! assert!(!executor.execute(&create.into()).is_error());
//! executor.execute(&Insert::new("people", vec![Literal::Int(7)]).into());
//!
//! let result = executor.execute(&Select::new(&["people"]).into());
//! assert_eq!(result.rows().unwrap().len(), 1);
//! ```

pub mod ast;
pub mod executor;
pub mod render;
pub mod result;
pub mod scope;

pub use executor::{ExecutionOptions, QueryExecutor};
pub use result::{QueryResult, ResultSet};
