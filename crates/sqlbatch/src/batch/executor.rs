//! Statement execution: sequential or on a fixed worker pool

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use super::statement::Statement;
use crate::{BatchError, BatchResult, ExecHandle};

/// Outcome of a batcher's most recent `batch_exec`
///
/// `batch_exec` holds `&mut self` while it plans and runs, so only settled
/// outcomes are ever observable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ExecState {
    /// Nothing executed yet
    #[default]
    Idle,
    /// Last execution finished without error
    Completed,
    /// Last execution stopped on an error
    Failed,
}

/// Totals gathered while running statements
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct ExecOutcome {
    pub statements: usize,
    pub affected_rows: u64,
}

/// Run `statements` on `handle` with at most `workers` in flight.
///
/// Stops at the first failing statement. With several workers, statements
/// already running are allowed to finish but no new one is dispatched; the
/// error reported is the first one observed.
pub(crate) async fn execute_statements<H>(
    handle: &Arc<H>,
    statements: Vec<Statement>,
    workers: usize,
) -> BatchResult<ExecOutcome>
where
    H: ExecHandle + ?Sized + 'static,
{
    if workers <= 1 || statements.len() <= 1 {
        execute_sequential(handle.as_ref(), statements).await
    } else {
        execute_parallel(handle, statements, workers).await
    }
}

async fn execute_sequential<H>(handle: &H, statements: Vec<Statement>) -> BatchResult<ExecOutcome>
where
    H: ExecHandle + ?Sized,
{
    let mut outcome = ExecOutcome::default();

    for statement in statements {
        tracing::trace!(
            chunk = statement.chunk,
            rows = statement.rows,
            params = statement.params.len(),
            "executing chunk"
        );
        let affected = handle
            .exec(&statement.sql, &statement.params)
            .await
            .map_err(|source| BatchError::Execution {
                chunk: statement.chunk,
                source,
            })?;
        outcome.statements += 1;
        outcome.affected_rows += affected;
    }

    Ok(outcome)
}

async fn execute_parallel<H>(
    handle: &Arc<H>,
    statements: Vec<Statement>,
    workers: usize,
) -> BatchResult<ExecOutcome>
where
    H: ExecHandle + ?Sized + 'static,
{
    let worker_count = workers.min(statements.len());
    let queue = Arc::new(Mutex::new(VecDeque::from(statements)));
    let stop_flag = Arc::new(AtomicBool::new(false));
    let first_error: Arc<Mutex<Option<BatchError>>> = Arc::new(Mutex::new(None));
    let executed = Arc::new(AtomicUsize::new(0));
    let affected_rows = Arc::new(AtomicU64::new(0));

    let mut tasks = Vec::with_capacity(worker_count);
    for worker in 0..worker_count {
        let handle = Arc::clone(handle);
        let queue = Arc::clone(&queue);
        let stop_flag = Arc::clone(&stop_flag);
        let first_error = Arc::clone(&first_error);
        let executed = Arc::clone(&executed);
        let affected_rows = Arc::clone(&affected_rows);

        tasks.push(tokio::spawn(async move {
            loop {
                if stop_flag.load(Ordering::Acquire) {
                    break;
                }
                // Guard dropped before awaiting
                let Some(statement) = queue.lock().pop_front() else {
                    break;
                };

                tracing::trace!(
                    worker,
                    chunk = statement.chunk,
                    rows = statement.rows,
                    "executing chunk"
                );
                match handle.exec(&statement.sql, &statement.params).await {
                    Ok(affected) => {
                        executed.fetch_add(1, Ordering::AcqRel);
                        affected_rows.fetch_add(affected, Ordering::AcqRel);
                    }
                    Err(source) => {
                        stop_flag.store(true, Ordering::Release);
                        let mut slot = first_error.lock();
                        if slot.is_none() {
                            *slot = Some(BatchError::Execution {
                                chunk: statement.chunk,
                                source,
                            });
                        }
                        break;
                    }
                }
            }
        }));
    }

    for task in tasks {
        if let Err(e) = task.await {
            tracing::error!(error = %e, "batch worker terminated abnormally");
            stop_flag.store(true, Ordering::Release);
            let mut slot = first_error.lock();
            if slot.is_none() {
                *slot = Some(BatchError::Worker(e.to_string()));
            }
        }
    }

    if let Some(error) = first_error.lock().take() {
        return Err(error);
    }

    Ok(ExecOutcome {
        statements: executed.load(Ordering::Acquire),
        affected_rows: affected_rows.load(Ordering::Acquire),
    })
}
