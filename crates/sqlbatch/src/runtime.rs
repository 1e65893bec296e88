//! Shared Tokio runtime for synchronous callers
//!
//! `BatchExecer::batch_exec` is async and runs its workers on whatever
//! multi-threaded runtime the caller is on. Callers without a runtime go
//! through `block_on`, which drives the future on a lazily created shared
//! runtime.

use std::future::Future;
use std::sync::OnceLock;

use tokio::runtime::Runtime;

use crate::{BatchError, BatchResult};

static TOKIO_RUNTIME: OnceLock<Runtime> = OnceLock::new();

/// Get or create the shared runtime
pub fn shared_runtime() -> BatchResult<&'static Runtime> {
    if let Some(runtime) = TOKIO_RUNTIME.get() {
        return Ok(runtime);
    }

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .thread_name("sqlbatch-worker")
        .build()
        .map_err(|e| BatchError::Worker(format!("failed to start runtime: {}", e)))?;

    // A concurrent initializer may have won; the spare runtime is dropped here
    Ok(TOKIO_RUNTIME.get_or_init(|| runtime))
}

/// Block the current thread on `future` using the shared runtime.
///
/// Must not be called from inside an async context; Tokio panics when a
/// runtime is blocked on from one of its own threads.
pub fn block_on<F, T>(future: F) -> BatchResult<T>
where
    F: Future<Output = T>,
{
    Ok(shared_runtime()?.block_on(future))
}
