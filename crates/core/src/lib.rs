//! kvsql Core - core types and schema definitions for kvsql.
//!
//! This crate provides the foundational types shared by the storage and
//! query layers:
//!
//! - `DataType`: column types (Int, Char(n), Date)
//! - `Value`: values held in a record cell
//! - `Literal`: literal tokens carried by parsed statements
//! - `Row`: a record with its row id
//! - `schema`: schema definitions (Column, Table, TableBuilder, ForeignKey)
//! - `Error`: error taxonomy for every rejected statement
//!
//! # Example
//!
//! ```rust
//! use kvsql_core::{DataType, TypeName, Value, Row};
//! use kvsql_core::schema::TableBuilder;
//!
//! let table = TableBuilder::new("person")
//!     .add_column("id", TypeName::Int, false)
//!     .add_column("name", TypeName::Char(10), false)
//!     .add_primary_key(&["id"])
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(table.get_column("name").unwrap().data_type(), DataType::Char(10));
//!
//! let row = Row::new(0, vec![Value::Int(1), Value::Text("Alice".into())]);
//! assert_eq!(row.get(1), Some(&Value::Text("Alice".into())));
//! ```

mod error;
mod literal;
mod row;
pub mod schema;
mod types;
mod value;

pub use error::{Error, ErrorKind, Result};
pub use literal::Literal;
pub use row::{Row, RowId, DUMMY_ROW_ID};
pub use types::{DataType, TypeKind, TypeName};
pub use value::Value;
