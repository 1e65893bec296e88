//! Batch configuration

use serde::{Deserialize, Serialize};

use crate::BatchResult;

/// Default number of workers: fully sequential execution
pub const DEFAULT_WORKERS: usize = 1;

/// Default cap on base arguments, counted across both positions
pub const DEFAULT_BASE_ARG_CAPACITY: usize = 10;

/// Configuration options for a batcher
///
/// ```toml
/// max_placeholders = 500
/// workers = 4
/// base_arg_capacity = 10
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchOptions {
    /// Ceiling on placeholders per statement; `None` uses the handle's dialect limit
    pub max_placeholders: Option<usize>,
    /// Number of workers for the next execution
    pub workers: usize,
    /// Maximum number of base arguments
    pub base_arg_capacity: usize,
}

impl BatchOptions {
    /// Create new batch options with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse options from a TOML document
    pub fn from_toml_str(source: &str) -> BatchResult<Self> {
        let options: Self = toml::from_str(source)?;
        Ok(options.normalized())
    }

    /// Override the placeholder ceiling
    pub fn with_max_placeholders(mut self, max: usize) -> Self {
        self.max_placeholders = Some(max);
        self
    }

    /// Set the worker count (at least 1)
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    /// Set the base argument cap
    pub fn with_base_arg_capacity(mut self, capacity: usize) -> Self {
        self.base_arg_capacity = capacity;
        self
    }

    fn normalized(mut self) -> Self {
        self.workers = self.workers.max(1);
        self
    }
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            max_placeholders: None,
            workers: DEFAULT_WORKERS,
            base_arg_capacity: DEFAULT_BASE_ARG_CAPACITY,
        }
    }
}
