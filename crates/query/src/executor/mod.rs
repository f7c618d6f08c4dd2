//! Query executor module.

mod engine;
mod filter;
mod join;
mod project;
mod relation;
mod scan;

pub use engine::{ExecutionOptions, QueryExecutor};
pub use filter::FilterExecutor;
pub use join::{cross_product, CrossJoin};
pub use project::ProjectExecutor;
pub use relation::Relation;
pub use scan::TableScanExecutor;
