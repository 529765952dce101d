//! Engine configuration.
//!
//! ```toml
//! dialect = "sqlite"
//! ```
//!
//! `FILTERKIT_DIALECT` selects the dialect when loading from the environment.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{QueryError, QueryResult};
use crate::sql::DatabaseType;

/// Settings that shape how filter templates are rendered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct FilterConfig {
    /// SQL dialect for identifier quoting, hex decoding and positional binds.
    #[serde(default)]
    pub dialect: DatabaseType,
}

impl FilterConfig {
    /// Configuration for the given dialect.
    pub fn new(dialect: DatabaseType) -> Self {
        Self { dialect }
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(content: &str) -> QueryResult<Self> {
        toml::from_str(content).map_err(|e| {
            QueryError::configuration(e.message().to_string()).with_source(e)
        })
    }

    /// Load configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> QueryResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            QueryError::configuration(format!("cannot read {}", path.display())).with_source(e)
        })?;
        let config = Self::from_toml_str(&content)?;
        info!(
            path = %path.display(),
            dialect = config.dialect.name(),
            "FilterConfig loaded from file"
        );
        Ok(config)
    }

    /// Load configuration from `FILTERKIT_DIALECT`, defaulting when unset.
    pub fn from_env() -> QueryResult<Self> {
        match std::env::var("FILTERKIT_DIALECT") {
            Ok(value) => {
                let config = Self::new(value.parse()?);
                info!(dialect = config.dialect.name(), "FilterConfig loaded from environment");
                Ok(config)
            }
            Err(_) => Ok(Self::default()),
        }
    }
}
