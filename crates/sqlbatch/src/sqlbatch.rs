//! sqlbatch - Placeholder-aware batching of SQL writes
//!
//! Many logically identical `INSERT`/`UPDATE` operations are accumulated as
//! rows and flushed as a small number of multi-row statements. Each statement
//! stays under the dialect's bound parameter ceiling; statements can be run
//! sequentially or spread over a fixed pool of workers sharing one handle.
//!
//! # Example
//!
//! ```ignore
//! use sqlbatch::{BatchExecer, Value};
//!
//! let mut batch = BatchExecer::inserter(conn, "INSERT INTO mytable (id, name, other) VALUES %s", 3)?;
//! batch.add_n([Value::Null, "roobs".into(), "dev".into()])?;
//! batch.add_n([Value::Null, "bb".into(), "boss".into()])?;
//! let summary = batch.batch_exec().await?;
//! assert_eq!(summary.statements, 1);
//! ```

pub mod batch;
mod error;
mod handle;
mod options;
pub mod runtime;

pub use batch::{
    Accumulator, BaseArgPosition, BaseArgs, BaseTemplate, BatchExecer, BatchKind, BatchSpec,
    BatchSummary, CHUNK_MARKER, Chunk, ChunkPlan, ExecState, PLACEHOLDER, RowTemplate, Statement,
    build_statements, plan_chunks,
};
pub use error::{BatchError, BatchResult};
pub use handle::ExecHandle;
pub use options::{BatchOptions, DEFAULT_BASE_ARG_CAPACITY, DEFAULT_WORKERS};

/// Re-export commonly used types from sqlbatch-core
pub use sqlbatch_core::{Connection, Dialect, Transaction, Value};
