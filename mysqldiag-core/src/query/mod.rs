//! Generic decoding of diagnostic query results.
//!
//! `SHOW STATUS`-style statements come back in one of two shapes. A result
//! whose columns are exactly `Variable_name`/`Value` is an *aggregate*: its
//! rows are name/value pairs folded into a single generic row. Everything
//! else is a *row set*: a table whose every row becomes one generic row.
//!
//! Execution goes through the injected [`QueryExecutor`] capability, so the
//! pipeline (execute, classify, build rows, bind) is testable without a
//! server. The sqlx-backed implementation lives in [`executor`] behind the
//! `mysql` feature.
//!
//! # Example
//! ```rust,ignore
//! use mysqldiag_core::{query, FromGenericRow, Result, RowReader};
//!
//! struct Status {
//!     uptime: i64,
//!     tls_ca: String,
//! }
//!
//! impl FromGenericRow for Status {
//!     fn from_row(row: &RowReader<'_>) -> Result<Self> {
//!         Ok(Self {
//!             uptime: row.integer("Uptime")?,
//!             tls_ca: row.text("Current_tls_ca")?,
//!         })
//!     }
//! }
//!
//! let status: Status = query(&pool, "SHOW GLOBAL STATUS", &[])
//!     .await?
//!     .decode_one()?;
//! ```

pub mod coerce;
#[cfg(feature = "mysql")]
pub mod executor;
mod row;

pub use coerce::FlagValue;
pub use row::{FromGenericRow, RowReader};

use crate::error::{MySqlDiagError, Result};
use async_trait::async_trait;
use std::collections::HashMap;

/// One result row reduced to column-name/textual-value pairs.
pub type GenericRow = HashMap<String, String>;

/// Raw output of a query execution: ordered column names plus textual cells.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawQueryResult {
    /// Column names in result order
    pub columns: Vec<String>,
    /// One cell vector per row, in result order
    pub rows: Vec<Vec<String>>,
}

/// Inferred interpretation of a query result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultShape {
    /// Name/value pairs folded into one generic row
    Aggregate,
    /// A table of independent rows
    RowSet,
}

impl ResultShape {
    /// Classifies a column list.
    ///
    /// Only the exact two-column signature `["Variable_name", "Value"]`,
    /// case-sensitive and in this order, is an aggregate. Supersets,
    /// reorderings and everything else are row sets.
    pub fn classify(columns: &[String]) -> Self {
        if columns.len() == 2 && columns[0] == "Variable_name" && columns[1] == "Value" {
            Self::Aggregate
        } else {
            Self::RowSet
        }
    }
}

/// Capability to execute a query and surface its raw textual result.
///
/// Implemented for `sqlx::MySqlPool` under the `mysql` feature; tests and
/// embedders may implement it over anything that can answer a query.
#[async_trait]
pub trait QueryExecutor: Send + Sync {
    /// Executes `query` with positional `args` in a single round trip.
    ///
    /// # Errors
    /// Execution failures are propagated verbatim to the caller.
    async fn execute(&self, query: &str, args: &[&str]) -> Result<RawQueryResult>;
}

/// A classified query result, ready to be decoded into typed destinations.
#[derive(Debug, Clone)]
pub struct QueryResult {
    shape: ResultShape,
    rows: Vec<GenericRow>,
}

impl QueryResult {
    /// Classifies a raw result and builds its generic rows.
    ///
    /// An aggregate always yields exactly one generic row, even when the
    /// server returned no pairs; later duplicate variable names overwrite
    /// earlier ones. A row set yields one generic row per result row, in
    /// order.
    pub fn from_raw(raw: RawQueryResult) -> Self {
        let shape = ResultShape::classify(&raw.columns);
        let rows = match shape {
            ResultShape::Aggregate => {
                let mut folded = GenericRow::new();
                for cells in &raw.rows {
                    if let [name, value] = cells.as_slice() {
                        folded.insert(name.clone(), value.clone());
                    }
                }
                vec![folded]
            }
            ResultShape::RowSet => raw
                .rows
                .into_iter()
                .map(|cells| raw.columns.iter().cloned().zip(cells).collect())
                .collect(),
        };
        Self { shape, rows }
    }

    /// The inferred shape of this result.
    pub fn shape(&self) -> ResultShape {
        self.shape
    }

    /// The generic rows, in result order.
    pub fn rows(&self) -> &[GenericRow] {
        &self.rows
    }

    /// Decodes the first row into a single typed value.
    ///
    /// Rows past the first are discarded.
    ///
    /// # Errors
    /// `EmptyResult` when there is no row at all; otherwise whatever the
    /// destination's binding reports (`MissingField`, `Coercion`).
    pub fn decode_one<T: FromGenericRow>(&self) -> Result<T> {
        let first = self.rows.first().ok_or(MySqlDiagError::EmptyResult)?;
        T::from_row(&RowReader::new(first))
    }

    /// Decodes every row into a fresh element, preserving row order.
    ///
    /// An aggregate result yields exactly one element; an empty row set
    /// yields an empty vector.
    ///
    /// # Errors
    /// The first row whose binding fails aborts the decode.
    pub fn decode_all<T: FromGenericRow>(&self) -> Result<Vec<T>> {
        self.rows
            .iter()
            .map(|row| T::from_row(&RowReader::new(row)))
            .collect()
    }
}

/// Executes a query and classifies its result.
///
/// # Errors
/// Propagates the executor's failure verbatim.
pub async fn query<E>(executor: &E, sql: &str, args: &[&str]) -> Result<QueryResult>
where
    E: QueryExecutor + ?Sized,
{
    let raw = executor.execute(sql, args).await?;
    Ok(QueryResult::from_raw(raw))
}
