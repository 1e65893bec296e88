//! The public batching API

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use sqlbatch_core::Value;

use super::args::{Accumulator, BaseArgPosition, BaseArgs};
use super::executor::{ExecState, execute_statements};
use super::planner::plan_chunks;
use super::statement::{Statement, build_statements};
use super::template::BatchSpec;
use crate::{BatchError, BatchOptions, BatchResult, DEFAULT_WORKERS, ExecHandle, runtime};

/// Outcome of one `batch_exec` call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BatchSummary {
    /// Statements executed
    pub statements: usize,
    /// Rows submitted
    pub rows: usize,
    /// Rows affected, as reported by the handle
    pub affected_rows: u64,
    /// Workers that took part
    pub workers: usize,
}

/// Accumulates rows and flushes them as multi-row statements
///
/// The handle is held behind an `Arc` and shared with every worker; it is
/// never cloned itself. A batcher is reusable: a successful or failed
/// `batch_exec` empties it, and new rows can be added right away.
pub struct BatchExecer<H: ExecHandle + ?Sized + 'static> {
    handle: Arc<H>,
    spec: BatchSpec,
    rows: Accumulator,
    base_args: BaseArgs,
    max_placeholders: Option<usize>,
    workers: usize,
    state: ExecState,
}

impl<H: ExecHandle + ?Sized + 'static> BatchExecer<H> {
    /// Multi-row insert; `base_sql` holds `%s` where the `(?, ?, ...)` tuples go
    pub fn inserter(handle: Arc<H>, base_sql: &str, num_cols: usize) -> BatchResult<Self> {
        Ok(Self::from_spec(handle, BatchSpec::insert(base_sql, num_cols)?))
    }

    /// Batch with a caller-supplied per-row fragment, e.g. `(NULL, ?, ?)`
    pub fn execer(
        handle: Arc<H>,
        base_sql: &str,
        num_cols: usize,
        row_template: &str,
    ) -> BatchResult<Self> {
        Ok(Self::from_spec(
            handle,
            BatchSpec::exec(base_sql, num_cols, row_template)?,
        ))
    }

    /// `IN (...)` list update; only one column per row is supported
    pub fn updater(handle: Arc<H>, base_sql: &str, num_cols: usize) -> BatchResult<Self> {
        Ok(Self::from_spec(handle, BatchSpec::update(base_sql, num_cols)?))
    }

    /// Create a batcher from an already compiled spec
    pub fn from_spec(handle: Arc<H>, spec: BatchSpec) -> Self {
        let options = BatchOptions::default();
        Self {
            handle,
            rows: Accumulator::new(spec.num_cols()),
            spec,
            base_args: BaseArgs::with_capacity(options.base_arg_capacity),
            max_placeholders: options.max_placeholders,
            workers: options.workers,
            state: ExecState::Idle,
        }
    }

    /// Apply configuration options
    pub fn with_options(mut self, options: BatchOptions) -> Self {
        self.max_placeholders = options.max_placeholders;
        self.workers = options.workers.max(1);
        self.base_args.set_capacity(options.base_arg_capacity);
        self
    }

    /// Override the placeholder ceiling
    pub fn with_max_placeholders(mut self, max: usize) -> Self {
        self.max_placeholders = Some(max);
        self
    }

    pub fn set_max_placeholders(&mut self, max: usize) {
        self.max_placeholders = Some(max);
    }

    /// Append one row; the number of values must equal the column count.
    pub fn add_n<I, V>(&mut self, row: I) -> BatchResult<()>
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.rows.push(row.into_iter().map(Into::into).collect())
    }

    /// Register an argument bound in every chunk, before or after the rows
    pub fn add_base_arg(
        &mut self,
        value: impl Into<Value>,
        position: BaseArgPosition,
    ) -> BatchResult<()> {
        self.base_args.push(position, value.into())
    }

    /// Use `n` workers (at least 1) for the next `batch_exec` only
    pub fn use_n_workers(&mut self, n: usize) {
        self.workers = n.max(1);
    }

    /// Build every statement the next `batch_exec` would run, without executing
    pub fn plan(&self) -> BatchResult<Vec<Statement>> {
        if self.rows.is_empty() {
            return Ok(Vec::new());
        }

        let base = self.spec.base();
        for (position, expected) in [
            (BaseArgPosition::Before, base.placeholders_before()),
            (BaseArgPosition::After, base.placeholders_after()),
        ] {
            let registered = self.base_args.count(position);
            if registered != expected {
                return Err(BatchError::BasePlaceholderMismatch {
                    position,
                    expected,
                    registered,
                });
            }
        }

        let plan = plan_chunks(
            self.rows.len(),
            self.base_args.len(),
            self.spec.num_cols(),
            self.max_placeholders(),
        )?;
        Ok(build_statements(
            &self.spec,
            &plan,
            &self.rows,
            &self.base_args,
        ))
    }

    /// Flush all accumulated rows.
    ///
    /// Planning failures execute nothing and keep the buffered rows. Once
    /// execution starts, rows and base arguments are cleared whatever the
    /// outcome. The worker count reverts to 1 after every call.
    pub async fn batch_exec(&mut self) -> BatchResult<BatchSummary> {
        let workers = std::mem::replace(&mut self.workers, DEFAULT_WORKERS);
        let rows = self.rows.len();

        if rows == 0 {
            self.base_args.clear();
            self.state = ExecState::Completed;
            return Ok(BatchSummary::default());
        }

        if workers > 1 && !self.handle.supports_concurrent_use() {
            self.state = ExecState::Failed;
            return Err(BatchError::ConcurrentTransaction { workers });
        }
        let statements = match self.plan() {
            Ok(statements) => statements,
            Err(e) => {
                self.state = ExecState::Failed;
                return Err(e);
            }
        };

        let used_workers = workers.min(statements.len()).max(1);
        tracing::debug!(
            rows,
            statements = statements.len(),
            workers = used_workers,
            max_placeholders = self.max_placeholders(),
            "executing batch"
        );

        let result = execute_statements(&self.handle, statements, used_workers).await;
        self.rows.clear();
        self.base_args.clear();

        match result {
            Ok(outcome) => {
                self.state = ExecState::Completed;
                Ok(BatchSummary {
                    statements: outcome.statements,
                    rows,
                    affected_rows: outcome.affected_rows,
                    workers: used_workers,
                })
            }
            Err(e) => {
                tracing::debug!(error = %e, "batch execution failed");
                self.state = ExecState::Failed;
                Err(e)
            }
        }
    }

    /// `batch_exec` for callers outside an async context
    ///
    /// # Panics
    ///
    /// Panics when called from a thread already driving a Tokio runtime.
    pub fn batch_exec_blocking(&mut self) -> BatchResult<BatchSummary> {
        runtime::block_on(self.batch_exec())?
    }

    /// Number of rows waiting to be flushed
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn num_cols(&self) -> usize {
        self.spec.num_cols()
    }

    /// Effective placeholder ceiling: the override, or the handle's dialect limit
    pub fn max_placeholders(&self) -> usize {
        self.max_placeholders
            .unwrap_or_else(|| self.handle.max_placeholders())
    }

    /// Workers the next `batch_exec` will use
    pub fn workers(&self) -> usize {
        self.workers
    }

    pub fn state(&self) -> ExecState {
        self.state
    }

    pub fn spec(&self) -> &BatchSpec {
        &self.spec
    }

    pub fn base_args(&self) -> &BaseArgs {
        &self.base_args
    }

    pub fn handle(&self) -> &Arc<H> {
        &self.handle
    }

    /// Give back the shared handle, e.g. to commit a transaction
    pub fn into_handle(self) -> Arc<H> {
        self.handle
    }
}

impl<H: ExecHandle + ?Sized + 'static> fmt::Debug for BatchExecer<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BatchExecer")
            .field("spec", &self.spec)
            .field("rows", &self.rows.len())
            .field("base_args", &self.base_args.len())
            .field("max_placeholders", &self.max_placeholders)
            .field("workers", &self.workers)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}
