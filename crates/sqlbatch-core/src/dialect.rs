//! SQL dialect limits
//!
//! Drivers report which dialect they speak so that callers can size their
//! statements without hardcoding per-driver numbers.

use serde::{Deserialize, Serialize};

/// Conservative bound parameter ceiling used when the dialect is unknown.
///
/// This is SQLite's historical `SQLITE_MAX_VARIABLE_NUMBER`, the lowest limit
/// among the supported dialects.
pub const DEFAULT_MAX_PARAMETERS: usize = 999;

/// SQL dialect spoken by a connection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    /// SQLite
    Sqlite,
    /// MySQL / MariaDB
    Mysql,
    /// PostgreSQL
    Postgres,
    /// Microsoft SQL Server
    Mssql,
    /// Unknown or unspecified dialect
    #[default]
    Generic,
}

impl Dialect {
    /// Identifier used in configuration files and logs
    pub fn id(&self) -> &'static str {
        match self {
            Dialect::Sqlite => "sqlite",
            Dialect::Mysql => "mysql",
            Dialect::Postgres => "postgres",
            Dialect::Mssql => "mssql",
            Dialect::Generic => "generic",
        }
    }

    /// Look up a dialect by identifier
    pub fn from_id(id: &str) -> Option<Self> {
        match id.to_ascii_lowercase().as_str() {
            "sqlite" => Some(Dialect::Sqlite),
            "mysql" | "mariadb" => Some(Dialect::Mysql),
            "postgres" | "postgresql" => Some(Dialect::Postgres),
            "mssql" | "sqlserver" => Some(Dialect::Mssql),
            "generic" => Some(Dialect::Generic),
            _ => None,
        }
    }

    /// Maximum number of bound parameters a single statement may carry
    pub fn max_parameters(&self) -> usize {
        match self {
            Dialect::Sqlite => 999,
            // Both wire protocols encode the parameter count as a u16
            Dialect::Mysql | Dialect::Postgres => 65_535,
            Dialect::Mssql => 2_100,
            Dialect::Generic => DEFAULT_MAX_PARAMETERS,
        }
    }
}

impl std::fmt::Display for Dialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}
