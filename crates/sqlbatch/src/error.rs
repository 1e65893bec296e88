//! Batch engine errors

use thiserror::Error;

use crate::batch::BaseArgPosition;

pub type BatchResult<T> = Result<T, BatchError>;

/// Errors raised while building, filling, planning or executing a batch
#[derive(Debug, Error)]
pub enum BatchError {
    #[error("base SQL must contain the chunk marker `{marker}` exactly once, found {found}")]
    MarkerCount { marker: &'static str, found: usize },

    #[error("row template must contain {expected} placeholder(s), found {found}")]
    TemplatePlaceholders { expected: usize, found: usize },

    #[error("number of columns per row must be at least 1")]
    InvalidColumnCount,

    #[error("unsupported column count {0}: update batches bind exactly one column per row")]
    UnsupportedColumnCount(usize),

    #[error("argument count mismatch: expected {expected} value(s) per row, got {got}")]
    ArgumentCount { expected: usize, got: usize },

    #[error("base argument capacity of {capacity} reached")]
    BaseArgCapacity { capacity: usize },

    #[error(
        "placeholder budget too small: {max} placeholder(s) minus {base} base argument(s) cannot hold a row of {per_row}"
    )]
    PlaceholderBudget {
        max: usize,
        base: usize,
        per_row: usize,
    },

    #[error(
        "base SQL has {expected} placeholder(s) {position} the chunk marker but {registered} base argument(s) were registered"
    )]
    BasePlaceholderMismatch {
        position: BaseArgPosition,
        expected: usize,
        registered: usize,
    },

    #[error("a transaction handle cannot be shared by {workers} workers")]
    ConcurrentTransaction { workers: usize },

    #[error("chunk {chunk} failed: {source}")]
    Execution {
        chunk: usize,
        #[source]
        source: sqlbatch_core::Error,
    },

    #[error("batch worker failed: {0}")]
    Worker(String),

    #[error("invalid batch options: {0}")]
    Config(#[from] toml::de::Error),
}

impl BatchError {
    /// Whether the error came back from the execution handle
    pub fn is_execution(&self) -> bool {
        matches!(self, BatchError::Execution { .. })
    }
}
