//! Execution handles the batch engine can drive

use async_trait::async_trait;
use sqlbatch_core::{Connection, Result, Transaction, Value};

/// Something that can execute a parameterized write statement
///
/// The batcher holds the handle behind an `Arc` and hands the same instance to
/// every worker. A handle that is bound to a single connection state, such as
/// a transaction, must report `supports_concurrent_use() == false`; the
/// batcher then refuses to run it with more than one worker.
#[async_trait]
pub trait ExecHandle: Send + Sync {
    /// Execute `sql` with `params` bound positionally, returning rows affected
    async fn exec(&self, sql: &str, params: &[Value]) -> Result<u64>;

    /// Ceiling on bound parameters per statement for this handle's dialect
    fn max_placeholders(&self) -> usize {
        sqlbatch_core::DEFAULT_MAX_PARAMETERS
    }

    /// Whether several workers may call `exec` at the same time
    fn supports_concurrent_use(&self) -> bool {
        true
    }
}

#[async_trait]
impl ExecHandle for dyn Connection {
    async fn exec(&self, sql: &str, params: &[Value]) -> Result<u64> {
        let result = self.execute(sql, params).await?;
        Ok(result.affected_rows)
    }

    fn max_placeholders(&self) -> usize {
        Connection::dialect(self).max_parameters()
    }
}

#[async_trait]
impl ExecHandle for Box<dyn Transaction> {
    async fn exec(&self, sql: &str, params: &[Value]) -> Result<u64> {
        let result = self.execute(sql, params).await?;
        Ok(result.affected_rows)
    }

    fn max_placeholders(&self) -> usize {
        Transaction::dialect(&**self).max_parameters()
    }

    fn supports_concurrent_use(&self) -> bool {
        false
    }
}
