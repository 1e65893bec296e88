//! SQLite driver implementation

use async_trait::async_trait;
use sqlbatch_core::{
    Connection, ConnectionConfig, DatabaseDriver, Dialect, DriverCapabilities, Error, Result,
};
use std::sync::Arc;

use crate::SqliteConnection;

/// SQLite database driver
pub struct SqliteDriver;

impl SqliteDriver {
    /// Create a new SQLite driver instance
    pub fn new() -> Self {
        tracing::debug!("SQLite driver initialized");
        Self
    }
}

impl Default for SqliteDriver {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DatabaseDriver for SqliteDriver {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    fn dialect(&self) -> Dialect {
        Dialect::Sqlite
    }

    fn capabilities(&self) -> DriverCapabilities {
        DriverCapabilities {
            supports_concurrent_execution: true,
            max_parameters: Some(Dialect::Sqlite.max_parameters()),
        }
    }

    #[tracing::instrument(skip(self, config), fields(path = config.get_string("path").as_deref()))]
    async fn connect(&self, config: &ConnectionConfig) -> Result<Arc<dyn Connection>> {
        let path = config.get_string("path").ok_or_else(|| {
            Error::Configuration(
                "SQLite requires 'path' or 'database' parameter (use :memory: for an in-memory database)"
                    .into(),
            )
        })?;

        let conn = SqliteConnection::open(&path).map_err(|e| {
            Error::Connection(format!("Failed to connect to SQLite database: {}", e))
        })?;

        tracing::info!(path = %path, "SQLite connection created");
        Ok(Arc::new(conn))
    }
}
