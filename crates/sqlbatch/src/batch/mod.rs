//! Batch construction, planning and execution
//!
//! A batch moves through these stages:
//!
//! - `template` compiles the base SQL and the per-row fragment
//! - `args` holds accumulated rows and the base arguments replayed per chunk
//! - `planner` splits rows into chunks that fit the placeholder budget
//! - `statement` renders one SQL text and argument list per chunk
//! - `executor` runs the statements sequentially or on a worker pool
//!
//! `BatchExecer` ties the stages together behind the public API.

mod args;
mod batcher;
mod executor;
mod planner;
mod statement;
mod template;


pub use args::{Accumulator, BaseArgPosition, BaseArgs};
pub use batcher::{BatchExecer, BatchSummary};
pub use executor::ExecState;
pub use planner::{Chunk, ChunkPlan, plan_chunks};
pub use statement::{Statement, build_statements};
pub use template::{BaseTemplate, BatchKind, BatchSpec, CHUNK_MARKER, PLACEHOLDER, RowTemplate};
