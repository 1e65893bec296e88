//! Row accumulation and base argument storage

use std::fmt;

use serde::{Deserialize, Serialize};
use sqlbatch_core::Value;

use crate::{BatchError, BatchResult};

/// Where a base argument is bound relative to the chunk marker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BaseArgPosition {
    /// Bound before every row argument
    Before,
    /// Bound after every row argument
    After,
}

impl fmt::Display for BaseArgPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BaseArgPosition::Before => write!(f, "before"),
            BaseArgPosition::After => write!(f, "after"),
        }
    }
}

/// Arguments replayed unchanged in every chunk
///
/// The capacity counts BEFORE and AFTER arguments together.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BaseArgs {
    before: Vec<Value>,
    after: Vec<Value>,
    capacity: usize,
}

impl BaseArgs {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            before: Vec::new(),
            after: Vec::new(),
            capacity,
        }
    }

    /// Register one argument; fails once the capacity is reached
    pub fn push(&mut self, position: BaseArgPosition, value: Value) -> BatchResult<()> {
        if self.len() >= self.capacity {
            return Err(BatchError::BaseArgCapacity {
                capacity: self.capacity,
            });
        }
        match position {
            BaseArgPosition::Before => self.before.push(value),
            BaseArgPosition::After => self.after.push(value),
        }
        Ok(())
    }

    pub fn before(&self) -> &[Value] {
        &self.before
    }

    pub fn after(&self) -> &[Value] {
        &self.after
    }

    pub fn count(&self, position: BaseArgPosition) -> usize {
        match position {
            BaseArgPosition::Before => self.before.len(),
            BaseArgPosition::After => self.after.len(),
        }
    }

    pub fn len(&self) -> usize {
        self.before.len() + self.after.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub(crate) fn set_capacity(&mut self, capacity: usize) {
        self.capacity = capacity;
    }

    pub fn clear(&mut self) {
        self.before.clear();
        self.after.clear();
    }
}

/// Flattened row buffer: row `i` occupies `values[i * num_cols..(i + 1) * num_cols]`
#[derive(Debug, Clone, PartialEq)]
pub struct Accumulator {
    values: Vec<Value>,
    num_cols: usize,
}

impl Accumulator {
    pub fn new(num_cols: usize) -> Self {
        Self {
            values: Vec::new(),
            num_cols,
        }
    }

    /// Append one row; the arity must equal the column count
    pub fn push(&mut self, row: Vec<Value>) -> BatchResult<()> {
        if row.len() != self.num_cols {
            return Err(BatchError::ArgumentCount {
                expected: self.num_cols,
                got: row.len(),
            });
        }
        self.values.extend(row);
        Ok(())
    }

    /// Number of accumulated rows
    pub fn len(&self) -> usize {
        if self.num_cols == 0 {
            return 0;
        }
        self.values.len() / self.num_cols
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn num_cols(&self) -> usize {
        self.num_cols
    }

    /// Values of rows `start..end`, in insertion order
    pub fn rows(&self, start: usize, end: usize) -> &[Value] {
        &self.values[start * self.num_cols..end * self.num_cols]
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }
}
