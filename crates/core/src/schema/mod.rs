//! Schema module for kvsql.
//!
//! This module contains the catalog-facing definitions: columns, tables and
//! foreign key constraints.

mod column;
mod constraint;
mod table;

pub use column::Column;
pub use constraint::ForeignKey;
pub use table::{Table, TableBuilder};
