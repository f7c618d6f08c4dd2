//! Tracing setup.

use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "kvsql_query=info,kvsql_storage=info,kvsql_database=info";

/// Installs a fmt subscriber filtered by `RUST_LOG`.
///
/// Returns false if a global subscriber was already installed, in which
/// case nothing changes.
pub fn init_tracing() -> bool {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .is_ok()
}
