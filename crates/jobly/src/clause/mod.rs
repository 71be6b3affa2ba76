//! Parameterized SQL fragments built from sparse field maps.
//!
//! Two entry points share one placeholder discipline: the Nth field of the
//! input becomes `$N` in the clause and `values[N - 1]` in the result.
//!
//! - [`build_set_clause`] renders the column list of a partial `UPDATE`.
//! - [`build_where_clause`] renders a `WHERE (...)` from whitelisted filters.
//!
//! # Example
//!
//! ```ignore
//! use jobly::clause::{build_set_clause, ColumnNameMap};
//! use jobly::FieldMap;
//!
//! let fields = FieldMap::new().with("firstName", "Aliya").with("age", 3);
//! let columns = ColumnNameMap::new(&[("firstName", "first_name")]);
//!
//! let set = build_set_clause(&fields, &columns)?;
//! assert_eq!(set.clause, r#""first_name"=$1, "age"=$2"#);
//!
//! let id_idx = set.next_placeholder();
//! let sql = format!("UPDATE users SET {} WHERE id = ${id_idx}", set.clause);
//! ```

use crate::error::{JoblyError, JoblyResult};
use crate::filter::FilterSpec;
use crate::ident::write_quoted;
use crate::value::{FieldMap, SqlValue};
use serde::Serialize;
use std::fmt::Write;
use tokio_postgres::types::ToSql;


/// Clause text plus the values its placeholders refer to.
///
/// `$N` in `clause` binds to `values[N - 1]`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ClauseResult {
    pub clause: String,
    pub values: Vec<SqlValue>,
}

impl ClauseResult {
    /// Index of the next free placeholder, for trailing statement parameters.
    pub fn next_placeholder(&self) -> usize {
        self.values.len() + 1
    }

    /// Append a trailing parameter and return its placeholder index.
    pub fn push(&mut self, value: impl Into<SqlValue>) -> usize {
        self.values.push(value.into());
        self.values.len()
    }

    /// Parameter refs compatible with `tokio-postgres`.
    pub fn params_ref(&self) -> Vec<&(dyn ToSql + Sync)> {
        self.values.iter().map(|v| v as &(dyn ToSql + Sync)).collect()
    }
}

/// Logical field name → storage column name.
///
/// Fields without an entry map to a column of the same name.
#[derive(Debug, Clone, Copy, Default)]
pub struct ColumnNameMap<'a> {
    pairs: &'a [(&'a str, &'a str)],
}

impl<'a> ColumnNameMap<'a> {
    pub const fn new(pairs: &'a [(&'a str, &'a str)]) -> Self {
        Self { pairs }
    }

    pub const fn empty() -> Self {
        Self { pairs: &[] }
    }

    /// Resolve the column for `field`.
    pub fn column<'k>(&self, field: &'k str) -> &'k str
    where
        'a: 'k,
    {
        self.pairs
            .iter()
            .find(|(f, _)| *f == field)
            .map_or(field, |(_, c)| *c)
    }
}

/// Build the column list of a partial update: `"col_a"=$1, "col_b"=$2`.
///
/// No leading `SET`; the caller owns the statement template. Fails with
/// [`JoblyError::NoDataProvided`] when `fields` is empty, in which case no
/// statement should be executed.
pub fn build_set_clause(fields: &FieldMap, columns: &ColumnNameMap<'_>) -> JoblyResult<ClauseResult> {
    if fields.is_empty() {
        return Err(JoblyError::NoDataProvided);
    }

    let mut clause = String::new();
    let mut values = Vec::with_capacity(fields.len());
    for (idx, (field, value)) in fields.iter().enumerate() {
        if idx > 0 {
            clause.push_str(", ");
        }
        write_quoted(&mut clause, columns.column(field));
        let _ = write!(clause, "=${}", idx + 1);
        values.push(value.clone());
    }

    tracing::trace!(
        target: "jobly.clause",
        mode = "set",
        param_count = values.len(),
        clause = %clause,
    );
    Ok(ClauseResult { clause, values })
}

/// Build `WHERE (a AND b ...)` from whitelisted search filters.
///
/// Every key must exist in `spec`, otherwise [`JoblyError::UnknownFilterKey`].
/// Empty `filters` yields an empty clause with no values. Values pass through
/// the spec's transforms (e.g. `%...%` wrapping) but are never coerced.
pub fn build_where_clause(filters: &FieldMap, spec: &FilterSpec) -> JoblyResult<ClauseResult> {
    let prepared = spec.prepare(filters)?;
    if prepared.is_empty() {
        return Ok(ClauseResult::default());
    }

    let mut fragments = Vec::with_capacity(prepared.len());
    let mut values = Vec::with_capacity(prepared.len());
    for (idx, (def, value)) in prepared.into_iter().enumerate() {
        fragments.push((def.render)(idx + 1));
        values.push(value);
    }

    let clause = format!("WHERE ({})", fragments.join(" AND "));
    tracing::trace!(
        target: "jobly.clause",
        mode = "where",
        entity = spec.entity(),
        param_count = values.len(),
        clause = %clause,
    );
    Ok(ClauseResult { clause, values })
}
