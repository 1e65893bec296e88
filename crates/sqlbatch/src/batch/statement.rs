//! Statement rendering

use sqlbatch_core::Value;

use super::args::{Accumulator, BaseArgs};
use super::planner::ChunkPlan;
use super::template::BatchSpec;

/// One executable unit: SQL text plus its positional arguments
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    /// Index of the chunk this statement was built from
    pub chunk: usize,
    pub sql: String,
    /// BEFORE base args, then row values in insertion order, then AFTER base args
    pub params: Vec<Value>,
    /// Number of rows carried
    pub rows: usize,
}

/// Render every chunk of `plan` into a statement.
///
/// Full-size chunks share the same SQL text, rendered on the first one seen.
pub fn build_statements(
    spec: &BatchSpec,
    plan: &ChunkPlan,
    rows: &Accumulator,
    base: &BaseArgs,
) -> Vec<Statement> {
    let mut full_sql: Option<String> = None;
    let base_len = base.len();
    let mut statements = Vec::with_capacity(plan.len());

    for chunk in &plan.chunks {
        let chunk_rows = chunk.rows();
        let sql = if chunk_rows == plan.rows_per_chunk {
            full_sql
                .get_or_insert_with(|| spec.render(chunk_rows))
                .clone()
        } else {
            spec.render(chunk_rows)
        };

        let values = rows.rows(chunk.start, chunk.end);
        let mut params = Vec::with_capacity(base_len + values.len());
        params.extend_from_slice(base.before());
        params.extend_from_slice(values);
        params.extend_from_slice(base.after());

        statements.push(Statement {
            chunk: chunk.index,
            sql,
            params,
            rows: chunk_rows,
        });
    }

    statements
}
