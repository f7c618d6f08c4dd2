//! Database - main entry point for kvsql.
//!
//! This module provides the `Database` struct, which owns the storage
//! backend and runs statements against it one at a time. Every statement
//! acquires the store, runs, and releases it again, so a file-backed
//! database is on disk between statements.

use std::path::PathBuf;

use crate::config::{DatabaseConfig, StorageConfig};
use config::ConfigError;
use kvsql_core::Error;
use kvsql_query::ast::Statement;
use kvsql_query::{ExecutionOptions, QueryExecutor, QueryResult};
use kvsql_storage::{FileStore, KvStore, MemoryStore, StoreError, StoreHandle};
use thiserror::Error as ThisError;
use tracing::{info, warn};

/// Errors raised while opening a database.
#[derive(Debug, ThisError)]
pub enum DatabaseError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("cannot open store: {0}")]
    Store(#[from] StoreError),
}

/// One element of a statement batch, as handed over by a parser.
#[derive(Clone, Debug, PartialEq)]
pub enum BatchItem {
    Statement(Statement),
    /// Text the parser could not make sense of.
    ParseError(String),
}

impl From<Statement> for BatchItem {
    fn from(statement: Statement) -> Self {
        BatchItem::Statement(statement)
    }
}

#[derive(Debug)]
enum Backend {
    Memory(MemoryStore),
    File(PathBuf),
}

/// The main database interface.
#[derive(Debug)]
pub struct Database {
    backend: Backend,
    options: ExecutionOptions,
}

impl Database {
    /// Opens a database described by `config`.
    ///
    /// A file backend is probed once so an unreadable snapshot fails here
    /// rather than on the first statement.
    pub fn open(config: DatabaseConfig) -> Result<Self, DatabaseError> {
        let config = config.validate()?;
        let options = config.execution_options();
        let backend = match config.storage {
            StorageConfig::Memory => Backend::Memory(MemoryStore::new()),
            StorageConfig::File { path } => {
                FileStore::open(&path)?;
                Backend::File(path)
            }
        };
        info!(backend = ?backend, strict_char_length = config.strict_char_length, "database opened");
        Ok(Self { backend, options })
    }

    /// Opens an empty in-memory database with default settings.
    pub fn in_memory() -> Self {
        Self {
            backend: Backend::Memory(MemoryStore::new()),
            options: ExecutionOptions::default(),
        }
    }

    /// Executes one statement.
    pub fn execute(&self, statement: &Statement) -> QueryResult {
        match &self.backend {
            Backend::Memory(store) => run(store.clone(), self.options, statement),
            Backend::File(path) => match FileStore::open(path) {
                Ok(store) => run(store, self.options, statement),
                Err(err) => storage_failure(err),
            },
        }
    }

    /// Executes statements in order, one result per attempted item.
    ///
    /// A semantic failure does not stop the batch. A parse failure yields a
    /// syntax error result and nothing after it runs.
    pub fn execute_batch<I>(&self, items: I) -> Vec<QueryResult>
    where
        I: IntoIterator<Item = BatchItem>,
    {
        let mut results = Vec::new();
        for item in items {
            match item {
                BatchItem::Statement(statement) => results.push(self.execute(&statement)),
                BatchItem::ParseError(text) => {
                    warn!(input = %text, "batch aborted on unparsable input");
                    results.push(QueryResult::syntax_error());
                    break;
                }
            }
        }
        results
    }
}

fn run<S: KvStore>(store: S, options: ExecutionOptions, statement: &Statement) -> QueryResult {
    let mut handle = StoreHandle::new(store);
    let result = QueryExecutor::new(&mut *handle, options).execute(statement);
    match handle.close() {
        Ok(()) => result,
        Err(err) => storage_failure(err),
    }
}

fn storage_failure(err: StoreError) -> QueryResult {
    let err = Error::from(err);
    warn!(error = %err, "storage failure");
    QueryResult::failure(&err)
}
