//! Chunk planning against the placeholder budget

use crate::{BatchError, BatchResult};

/// A contiguous run of rows executed as one statement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunk {
    /// Position of the chunk in the plan
    pub index: usize,
    /// First row (inclusive)
    pub start: usize,
    /// Last row (exclusive)
    pub end: usize,
}

impl Chunk {
    pub fn rows(&self) -> usize {
        self.end - self.start
    }
}

/// Partition of the accumulated rows into chunks
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkPlan {
    pub rows_per_chunk: usize,
    pub chunks: Vec<Chunk>,
}

impl ChunkPlan {
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    pub fn total_rows(&self) -> usize {
        self.chunks.last().map(|c| c.end).unwrap_or(0)
    }
}

/// Split `total_rows` rows into the fewest chunks that each fit `max_placeholders`.
///
/// Every chunk holds `floor((max - base) / per_row)` rows except possibly the
/// last, which holds the remainder. Fails when not even one row fits beside
/// the base arguments.
pub fn plan_chunks(
    total_rows: usize,
    base_count: usize,
    per_row: usize,
    max_placeholders: usize,
) -> BatchResult<ChunkPlan> {
    let capacity = max_placeholders.saturating_sub(base_count);
    let rows_per_chunk = if per_row == 0 { 0 } else { capacity / per_row };
    if rows_per_chunk == 0 {
        return Err(BatchError::PlaceholderBudget {
            max: max_placeholders,
            base: base_count,
            per_row,
        });
    }

    let chunks = (0..total_rows)
        .step_by(rows_per_chunk)
        .enumerate()
        .map(|(index, start)| Chunk {
            index,
            start,
            end: start.saturating_add(rows_per_chunk).min(total_rows),
        })
        .collect();

    Ok(ChunkPlan {
        rows_per_chunk,
        chunks,
    })
}
