//! Database driver trait definition

use crate::{Connection, Dialect, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;

/// Capabilities that a driver may support
#[derive(Debug, Clone, Default)]
pub struct DriverCapabilities {
    /// Connections can be driven from several tasks at once
    pub supports_concurrent_execution: bool,
    /// Maximum parameters per statement (None = no limit)
    pub max_parameters: Option<usize>,
}

/// Core driver trait that all database drivers must implement
#[async_trait]
pub trait DatabaseDriver: Send + Sync {
    /// Unique identifier for this driver (e.g., "postgres", "mysql", "sqlite")
    fn id(&self) -> &'static str {
        self.name()
    }

    /// Human-readable name (e.g., "PostgreSQL", "MySQL", "SQLite")
    fn name(&self) -> &'static str;

    /// SQL dialect spoken by connections from this driver
    fn dialect(&self) -> Dialect {
        Dialect::Generic
    }

    /// Supported features/capabilities
    fn capabilities(&self) -> DriverCapabilities;

    /// Create a new connection
    async fn connect(&self, config: &ConnectionConfig) -> Result<Arc<dyn Connection>>;
}

/// Connection configuration
#[derive(Debug, Clone)]
pub struct ConnectionConfig {
    /// Driver ID (e.g., "postgres", "mysql", "sqlite")
    pub driver: String,
    /// Database name or file path
    pub database: Option<String>,
    /// Additional connection parameters
    pub params: HashMap<String, String>,
}

impl ConnectionConfig {
    /// Create a new configuration with default values
    pub fn new(driver: &str) -> Self {
        Self {
            driver: driver.to_string(),
            database: None,
            params: HashMap::new(),
        }
    }

    /// Create a SQLite configuration
    pub fn new_sqlite(database_path: &str) -> Self {
        let mut config = Self::new("sqlite");
        config.database = Some(database_path.to_string());
        config
    }

    /// Set a connection parameter
    pub fn with_param(mut self, key: &str, value: impl Into<String>) -> Self {
        self.params.insert(key.to_string(), value.into());
        self
    }

    /// Get a string parameter
    pub fn get_string(&self, key: &str) -> Option<String> {
        if let Some(val) = self.params.get(key) {
            return Some(val.clone());
        }
        match key {
            "database" | "path" => self.database.clone(),
            _ => None,
        }
    }
}
