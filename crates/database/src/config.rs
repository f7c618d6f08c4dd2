//! Database configuration.
//!
//! Settings come from an optional TOML file, overridden by `KVSQL__*`
//! environment variables (`KVSQL__STORAGE__TYPE=file`,
//! `KVSQL__STORAGE__PATH=/tmp/db.json`, `KVSQL__STRICT_CHAR_LENGTH=true`).

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment, File, FileFormat};
use kvsql_query::ExecutionOptions;
use kvsql_storage::CharLengthPolicy;
use serde::Deserialize;

const ENV_PREFIX: &str = "KVSQL";

#[derive(Deserialize, Debug, Default, PartialEq, Eq, Clone)]
pub struct DatabaseConfig {
    #[serde(default)]
    pub storage: StorageConfig,
    /// Reject over-length Char values instead of truncating them.
    #[serde(default)]
    pub strict_char_length: bool,
}

/// Where the key-value data lives.
#[derive(Deserialize, Debug, Default, PartialEq, Eq, Clone)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StorageConfig {
    #[default]
    Memory,
    File { path: PathBuf },
}

impl DatabaseConfig {
    /// A file-backed configuration.
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self {
            storage: StorageConfig::File { path: path.into() },
            ..Self::default()
        }
    }

    /// Loads the configuration from `path` (if any) and the environment.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path));
        }
        builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize::<DatabaseConfig>()
            .and_then(Self::validate)
    }

    /// Parses a TOML document, without consulting the environment.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::from_str(source, FileFormat::Toml))
            .build()?
            .try_deserialize::<DatabaseConfig>()
            .and_then(Self::validate)
    }

    pub fn validate(self) -> Result<Self, ConfigError> {
        match &self.storage {
            StorageConfig::File { path } if path.as_os_str().is_empty() => Err(
                ConfigError::Message("file storage needs a non-empty path".to_string()),
            ),
            _ => Ok(self),
        }
    }

    /// The executor options these settings imply.
    pub fn execution_options(&self) -> ExecutionOptions {
        ExecutionOptions {
            char_policy: if self.strict_char_length {
                CharLengthPolicy::Reject
            } else {
                CharLengthPolicy::Truncate
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_CONFIG_FILE: &str = r#"
strict_char_length = true

[storage]
type = "file"
path = "./kvsql-data.json"
"#;

    const TEST_CONFIG_MEMORY: &str = r#"
[storage]
type = "memory"
"#;

    const TEST_CONFIG_EMPTY_PATH: &str = r#"
[storage]
type = "file"
path = ""
"#;

    #[test]
    fn test_parse_file_config() {
        let config = DatabaseConfig::from_toml_str(TEST_CONFIG_FILE).unwrap();
        assert_eq!(config, DatabaseConfig {
            storage: StorageConfig::File {
                path: PathBuf::from("./kvsql-data.json")
            },
            strict_char_length: true,
        });
        assert_eq!(config.execution_options().char_policy, CharLengthPolicy::Reject);
    }

    #[test]
    fn test_parse_memory_config() {
        let config = DatabaseConfig::from_toml_str(TEST_CONFIG_MEMORY).unwrap();
        assert_eq!(config, DatabaseConfig::default());
        assert_eq!(config.execution_options(), ExecutionOptions::default());
    }

    #[test]
    fn test_defaults_from_empty_document() {
        let config = DatabaseConfig::from_toml_str("").unwrap();
        assert_eq!(config.storage, StorageConfig::Memory);
        assert!(!config.strict_char_length);
    }

    #[test]
    fn test_empty_path_rejected() {
        let err = DatabaseConfig::from_toml_str(TEST_CONFIG_EMPTY_PATH).unwrap_err();
        assert!(err.to_string().contains("non-empty path"));
    }
}
