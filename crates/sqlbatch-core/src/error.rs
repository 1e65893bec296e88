//! Error types for sqlbatch drivers

use thiserror::Error;

/// Core error type returned by connections, transactions and drivers
#[derive(Error, Debug)]
pub enum Error {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Query error: {0}")]
    Query(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for driver operations
pub type Result<T> = std::result::Result<T, Error>;
