//! sqlx-backed query execution against a live MySQL server.
//!
//! Cells are carried as text regardless of their wire type: each column is
//! probed through the handful of decodings MySQL diagnostic statements
//! actually produce, in order of likelihood.

use crate::dsn::{DsnResolver, MySqlOpts};
use crate::error::{MySqlDiagError, Result};
use crate::query::{QueryExecutor, RawQueryResult};
use async_trait::async_trait;
use sqlx::mysql::{MySqlConnectOptions, MySqlPool, MySqlPoolOptions, MySqlRow};
use sqlx::{Column, Row};
use std::time::Duration;

/// Opens a lazily-connecting pool from resolved connection options.
///
/// The merge semantics are exactly those of [`DsnResolver::resolve`] with
/// the default capability wiring; `timeout` doubles as the pool's acquire
/// timeout when strictly positive.
///
/// # Errors
/// Fails when resolution fails (unreadable defaults-extra-file) or the
/// resolved port is not numeric. No connection is attempted yet; the first
/// query surfaces reachability problems.
pub fn connect(opts: &MySqlOpts, timeout: Duration) -> Result<MySqlPool> {
    let dsn = DsnResolver::default().resolve(opts, timeout)?;
    tracing::debug!("connecting with DSN: {}", dsn.redacted());

    let mut connect_opts = MySqlConnectOptions::new();
    if dsn.socket.is_empty() {
        let port: u16 = dsn.port.parse().map_err(|_| {
            MySqlDiagError::configuration(format!("invalid port '{}'", dsn.port))
        })?;
        connect_opts = connect_opts.host(&dsn.hostname).port(port);
    } else {
        connect_opts = connect_opts.socket(&dsn.socket);
    }
    if !dsn.username.is_empty() {
        connect_opts = connect_opts.username(&dsn.username);
    }
    if !dsn.password.is_empty() {
        connect_opts = connect_opts.password(&dsn.password);
    }
    if !dsn.default_db.is_empty() {
        connect_opts = connect_opts.database(&dsn.default_db);
    }

    let mut pool_opts = MySqlPoolOptions::new().max_connections(5);
    if !timeout.is_zero() {
        pool_opts = pool_opts.acquire_timeout(timeout);
    }

    Ok(pool_opts.connect_lazy_with(connect_opts))
}

#[async_trait]
impl QueryExecutor for MySqlPool {
    async fn execute(&self, query: &str, args: &[&str]) -> Result<RawQueryResult> {
        let mut prepared = sqlx::query(query);
        for arg in args {
            prepared = prepared.bind((*arg).to_string());
        }

        let rows = prepared
            .fetch_all(self)
            .await
            .map_err(|e| MySqlDiagError::query_failed(format!("'{query}'"), e))?;

        // Column metadata only travels with rows; an empty result is an
        // empty row set.
        let Some(first) = rows.first() else {
            return Ok(RawQueryResult::default());
        };

        let columns: Vec<String> = first
            .columns()
            .iter()
            .map(|column| column.name().to_string())
            .collect();

        let cells = rows
            .iter()
            .map(|row| (0..columns.len()).map(|i| cell_text(row, i)).collect())
            .collect();

        Ok(RawQueryResult {
            columns,
            rows: cells,
        })
    }
}

/// Extracts one cell as text, probing decodings in order of likelihood.
///
/// NULL and undecodable cells both come out as the empty string.
fn cell_text(row: &MySqlRow, index: usize) -> String {
    if let Ok(v) = row.try_get::<Option<String>, _>(index) {
        return v.unwrap_or_default();
    }
    if let Ok(v) = row.try_get::<Option<i64>, _>(index) {
        return v.map(|n| n.to_string()).unwrap_or_default();
    }
    if let Ok(v) = row.try_get::<Option<u64>, _>(index) {
        return v.map(|n| n.to_string()).unwrap_or_default();
    }
    if let Ok(v) = row.try_get::<Option<f64>, _>(index) {
        return v.map(|n| n.to_string()).unwrap_or_default();
    }
    if let Ok(v) = row.try_get::<Option<bool>, _>(index) {
        return v.map(|b| b.to_string()).unwrap_or_default();
    }

    String::new()
}
