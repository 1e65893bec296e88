//! Base SQL and row fragment compilation

use crate::{BatchError, BatchResult};

/// Marker in the base SQL replaced by the row fragments of a chunk
pub const CHUNK_MARKER: &str = "%s";

/// Positional placeholder understood by the execution handle
pub const PLACEHOLDER: char = '?';

/// Shape of batch a spec was compiled for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchKind {
    /// Multi-row `VALUES` list with an auto-generated `(?, ?, ...)` fragment
    Insert,
    /// Caller-supplied row fragment
    Exec,
    /// Single-column `IN (...)` list
    Update,
}

/// Positions of placeholders and chunk markers in a piece of SQL
#[derive(Debug, Default)]
struct SqlScan {
    placeholders: Vec<usize>,
    markers: Vec<usize>,
}

/// Scan SQL for placeholders and chunk markers, skipping string literals,
/// quoted identifiers and comments.
fn scan_sql(sql: &str) -> SqlScan {
    let mut scan = SqlScan::default();
    let chars: Vec<(usize, char)> = sql.char_indices().collect();
    let len = chars.len();
    let mut in_string = false;
    let mut string_char = '\'';
    let mut in_line_comment = false;
    let mut in_block_comment = false;
    let mut i = 0;

    while i < len {
        let (offset, c) = chars[i];
        let next = chars.get(i + 1).map(|(_, n)| *n);

        if in_line_comment {
            if c == '\n' {
                in_line_comment = false;
            }
            i += 1;
            continue;
        }

        if in_block_comment {
            if c == '*' && next == Some('/') {
                in_block_comment = false;
                i += 2;
                continue;
            }
            i += 1;
            continue;
        }

        if in_string {
            if c == string_char {
                // Doubled quote is an escaped quote
                if next == Some(string_char) {
                    i += 2;
                    continue;
                }
                in_string = false;
            }
            i += 1;
            continue;
        }

        match c {
            '-' if next == Some('-') => {
                in_line_comment = true;
                i += 2;
            }
            '/' if next == Some('*') => {
                in_block_comment = true;
                i += 2;
            }
            '\'' | '"' | '`' => {
                in_string = true;
                string_char = c;
                i += 1;
            }
            '%' if next == Some('s') => {
                scan.markers.push(offset);
                i += 2;
            }
            c if c == PLACEHOLDER => {
                scan.placeholders.push(offset);
                i += 1;
            }
            _ => i += 1,
        }
    }

    scan
}

/// Count positional placeholders outside literals and comments
pub(crate) fn count_placeholders(sql: &str) -> usize {
    scan_sql(sql).placeholders.len()
}

/// Base SQL split around its single chunk marker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseTemplate {
    prefix: String,
    suffix: String,
    placeholders_before: usize,
    placeholders_after: usize,
}

impl BaseTemplate {
    /// Compile base SQL; it must contain `CHUNK_MARKER` exactly once
    pub fn parse(sql: &str) -> BatchResult<Self> {
        let scan = scan_sql(sql);
        let [marker] = scan.markers.as_slice() else {
            return Err(BatchError::MarkerCount {
                marker: CHUNK_MARKER,
                found: scan.markers.len(),
            });
        };
        let marker = *marker;

        let placeholders_before = scan.placeholders.iter().filter(|p| **p < marker).count();
        Ok(Self {
            prefix: sql[..marker].to_string(),
            suffix: sql[marker + CHUNK_MARKER.len()..].to_string(),
            placeholders_before,
            placeholders_after: scan.placeholders.len() - placeholders_before,
        })
    }

    /// SQL preceding the marker
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// SQL following the marker
    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    /// Placeholders that must be bound by BEFORE base arguments
    pub fn placeholders_before(&self) -> usize {
        self.placeholders_before
    }

    /// Placeholders that must be bound by AFTER base arguments
    pub fn placeholders_after(&self) -> usize {
        self.placeholders_after
    }
}

/// Per-row SQL fragment and its placeholder count
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowTemplate {
    fragment: String,
    num_cols: usize,
}

impl RowTemplate {
    /// Auto-generate a `(?, ?, ...)` tuple of `num_cols` placeholders
    pub fn values(num_cols: usize) -> BatchResult<Self> {
        if num_cols == 0 {
            return Err(BatchError::InvalidColumnCount);
        }
        let placeholders = vec![PLACEHOLDER.to_string(); num_cols].join(", ");
        Self::explicit(format!("({})", placeholders), num_cols)
    }

    /// Use a caller-supplied fragment holding exactly `num_cols` placeholders
    pub fn explicit(fragment: impl Into<String>, num_cols: usize) -> BatchResult<Self> {
        if num_cols == 0 {
            return Err(BatchError::InvalidColumnCount);
        }
        let fragment = fragment.into();
        let found = count_placeholders(&fragment);
        if found != num_cols {
            return Err(BatchError::TemplatePlaceholders {
                expected: num_cols,
                found,
            });
        }
        Ok(Self { fragment, num_cols })
    }

    /// Single placeholder for an `IN (...)` list; only one column is supported
    pub fn in_list(num_cols: usize) -> BatchResult<Self> {
        match num_cols {
            0 => Err(BatchError::InvalidColumnCount),
            1 => Self::explicit(PLACEHOLDER.to_string(), 1),
            n => Err(BatchError::UnsupportedColumnCount(n)),
        }
    }

    pub fn fragment(&self) -> &str {
        &self.fragment
    }

    pub fn num_cols(&self) -> usize {
        self.num_cols
    }
}

/// Compiled, immutable description of one logical batch operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchSpec {
    kind: BatchKind,
    base: BaseTemplate,
    row: RowTemplate,
}

impl BatchSpec {
    /// Multi-row insert: `base_sql` holds the marker where the `VALUES` tuples go
    pub fn insert(base_sql: &str, num_cols: usize) -> BatchResult<Self> {
        let row = RowTemplate::values(num_cols)?;
        Ok(Self {
            kind: BatchKind::Insert,
            base: BaseTemplate::parse(base_sql)?,
            row,
        })
    }

    /// Caller-supplied row fragment
    pub fn exec(base_sql: &str, num_cols: usize, row_template: &str) -> BatchResult<Self> {
        let row = RowTemplate::explicit(row_template, num_cols)?;
        Ok(Self {
            kind: BatchKind::Exec,
            base: BaseTemplate::parse(base_sql)?,
            row,
        })
    }

    /// `IN (...)` update: exactly one column per row
    pub fn update(base_sql: &str, num_cols: usize) -> BatchResult<Self> {
        let row = RowTemplate::in_list(num_cols)?;
        Ok(Self {
            kind: BatchKind::Update,
            base: BaseTemplate::parse(base_sql)?,
            row,
        })
    }

    pub fn kind(&self) -> BatchKind {
        self.kind
    }

    pub fn base(&self) -> &BaseTemplate {
        &self.base
    }

    pub fn row(&self) -> &RowTemplate {
        &self.row
    }

    pub fn num_cols(&self) -> usize {
        self.row.num_cols
    }

    /// Render the SQL text for a chunk of `rows` rows
    pub fn render(&self, rows: usize) -> String {
        let fragment = self.row.fragment.as_str();
        let capacity = rows
            .saturating_mul(fragment.len() + 1)
            .saturating_add(self.base.prefix.len() + self.base.suffix.len());
        let mut sql = String::with_capacity(capacity);
        sql.push_str(&self.base.prefix);
        for i in 0..rows {
            if i > 0 {
                sql.push(',');
            }
            sql.push_str(fragment);
        }
        sql.push_str(&self.base.suffix);
        sql
    }
}
