//! Connection trait and transaction handling

use crate::{Dialect, QueryResult, Result, StatementResult, Value};
use async_trait::async_trait;

/// A database connection
///
/// Implementations must be safe to share between tasks: the batching engine
/// may call `execute` from several workers at once when the caller asks for
/// more than one worker.
#[async_trait]
pub trait Connection: Send + Sync {
    /// Get the driver name (e.g., "sqlite", "postgresql", "mysql")
    fn driver_name(&self) -> &str;

    /// Get the dialect for this connection
    ///
    /// Used to pick a safe default for the number of bound parameters a
    /// single statement may carry.
    fn dialect(&self) -> Dialect {
        Dialect::Generic
    }

    /// Execute a statement that modifies data (INSERT/UPDATE/DELETE)
    async fn execute(&self, sql: &str, params: &[Value]) -> Result<StatementResult>;

    /// Execute a query that returns rows (SELECT)
    async fn query(&self, sql: &str, params: &[Value]) -> Result<QueryResult>;

    /// Begin a transaction
    async fn begin_transaction(&self) -> Result<Box<dyn Transaction>>;

    /// Close the connection
    async fn close(&self) -> Result<()>;

    /// Check if the connection is closed
    fn is_closed(&self) -> bool;
}

/// A database transaction
///
/// A transaction is bound to a single underlying connection and must not be
/// driven from more than one worker at a time.
#[async_trait]
pub trait Transaction: Send + Sync {
    /// Get the dialect of the connection this transaction runs on
    fn dialect(&self) -> Dialect {
        Dialect::Generic
    }

    /// Commit the transaction
    async fn commit(self: Box<Self>) -> Result<()>;

    /// Rollback the transaction
    async fn rollback(self: Box<Self>) -> Result<()>;

    /// Execute a query within the transaction
    async fn query(&self, sql: &str, params: &[Value]) -> Result<QueryResult>;

    /// Execute a statement within the transaction
    async fn execute(&self, sql: &str, params: &[Value]) -> Result<StatementResult>;
}
