//! End-to-end decoding tests over a canned executor.
//!
//! These exercise the full pipeline (execute, classify, build rows, bind)
//! without a server, the way embedders wire their own `QueryExecutor`.

use async_trait::async_trait;
use mysqldiag_core::{
    FlagValue, FromGenericRow, MySqlDiagError, QueryExecutor, RawQueryResult, Result, RowReader,
    query,
};

/// Executor answering every query with one canned result.
struct CannedExecutor {
    result: RawQueryResult,
}

impl CannedExecutor {
    fn new(columns: &[&str], rows: &[&[&str]]) -> Self {
        Self {
            result: RawQueryResult {
                columns: columns.iter().map(|c| c.to_string()).collect(),
                rows: rows
                    .iter()
                    .map(|row| row.iter().map(|c| c.to_string()).collect())
                    .collect(),
            },
        }
    }
}

#[async_trait]
impl QueryExecutor for CannedExecutor {
    async fn execute(&self, _query: &str, _args: &[&str]) -> Result<RawQueryResult> {
        Ok(self.result.clone())
    }
}

/// Executor whose every query fails.
struct FailingExecutor;

#[async_trait]
impl QueryExecutor for FailingExecutor {
    async fn execute(&self, query: &str, _args: &[&str]) -> Result<RawQueryResult> {
        Err(MySqlDiagError::query_failed(
            format!("'{query}'"),
            std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "server gone"),
        ))
    }
}

fn global_status_executor() -> CannedExecutor {
    CannedExecutor::new(
        &["Variable_name", "Value"],
        &[&["Uptime", "941"], &["Current_tls_ca", "ca.pem"]],
    )
}

fn replica_status_executor() -> CannedExecutor {
    CannedExecutor::new(
        &["Master_Host", "Master_User", "Master_Port"],
        &[
            &["db1", "user1", "3306"],
            &["db2", "user2", "3306"],
            &["db3", "user3", "3306"],
        ],
    )
}

#[derive(Debug, PartialEq)]
struct GlobalStatus {
    uptime: i64,
    tls_ca: String,
}

impl FromGenericRow for GlobalStatus {
    fn from_row(row: &RowReader<'_>) -> Result<Self> {
        Ok(Self {
            uptime: row.integer("Uptime")?,
            tls_ca: row.text("Current_tls_ca")?,
        })
    }
}

/// Same source keys plus one that no aggregate result carries.
#[derive(Debug)]
struct GlobalStatusExtra {
    #[allow(dead_code)]
    uptime: i64,
    #[allow(dead_code)]
    hoge: String,
}

impl FromGenericRow for GlobalStatusExtra {
    fn from_row(row: &RowReader<'_>) -> Result<Self> {
        Ok(Self {
            uptime: row.integer("Uptime")?,
            hoge: row.text("Hoge")?,
        })
    }
}

#[derive(Debug, PartialEq)]
struct ReplicaStatus {
    host: String,
    user: String,
    port: u16,
}

impl FromGenericRow for ReplicaStatus {
    fn from_row(row: &RowReader<'_>) -> Result<Self> {
        Ok(Self {
            host: row.text("Master_Host")?,
            user: row.text("Master_User")?,
            port: row.integer("Master_Port")?,
        })
    }
}

struct ReplicaThreads {
    io_running: bool,
    sql_running: FlagValue,
}

impl FromGenericRow for ReplicaThreads {
    fn from_row(row: &RowReader<'_>) -> Result<Self> {
        Ok(Self {
            io_running: row.boolean("Slave_IO_Running")?,
            sql_running: row.flag("Slave_SQL_Running")?,
        })
    }
}

#[tokio::test]
async fn decodes_aggregate_into_single_value() {
    let result = query(&global_status_executor(), "SHOW GLOBAL STATUS", &[])
        .await
        .unwrap();

    let status: GlobalStatus = result.decode_one().unwrap();
    assert_eq!(
        status,
        GlobalStatus {
            uptime: 941,
            tls_ca: "ca.pem".to_string(),
        }
    );
}

#[tokio::test]
async fn aggregate_with_unmatched_field_fails() {
    let result = query(&global_status_executor(), "SHOW GLOBAL STATUS", &[])
        .await
        .unwrap();

    let err = result.decode_one::<GlobalStatusExtra>().unwrap_err();
    assert!(matches!(err, MySqlDiagError::MissingField { key } if key == "Hoge"));
}

#[tokio::test]
async fn decodes_row_set_into_sequence_in_order() {
    let result = query(&replica_status_executor(), "SHOW SLAVE STATUS", &[])
        .await
        .unwrap();

    let replicas: Vec<ReplicaStatus> = result.decode_all().unwrap();
    assert_eq!(replicas.len(), 3);
    assert_eq!(replicas[0].host, "db1");
    assert_eq!(replicas[0].user, "user1");
    assert_eq!(replicas[0].port, 3306);
    assert_eq!(replicas[2].host, "db3");
    assert_eq!(replicas[2].user, "user3");
}

#[tokio::test]
async fn single_value_takes_first_row_only() {
    let result = query(&replica_status_executor(), "SHOW SLAVE STATUS", &[])
        .await
        .unwrap();

    let replica: ReplicaStatus = result.decode_one().unwrap();
    assert_eq!(replica.host, "db1");
}

#[tokio::test]
async fn sequence_of_aggregate_has_exactly_one_element() {
    let result = query(&global_status_executor(), "SHOW GLOBAL STATUS", &[])
        .await
        .unwrap();

    let all: Vec<GlobalStatus> = result.decode_all().unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].uptime, 941);
}

#[tokio::test]
async fn empty_result_fails_single_value_decode() {
    let executor = CannedExecutor::new(&["Master_Host", "Master_User", "Master_Port"], &[]);
    let result = query(&executor, "SHOW SLAVE STATUS", &[]).await.unwrap();

    let err = result.decode_one::<ReplicaStatus>().unwrap_err();
    assert!(matches!(err, MySqlDiagError::EmptyResult));
}

#[tokio::test]
async fn boolean_tokens_and_near_misses() {
    let executor = CannedExecutor::new(
        &["Slave_IO_Running", "Slave_SQL_Running"],
        &[&["Yes", "Connecting"]],
    );
    let result = query(&executor, "SHOW SLAVE STATUS", &[]).await.unwrap();

    let threads: ReplicaThreads = result.decode_one().unwrap();
    assert!(threads.io_running);
    assert!(!threads.sql_running.enabled());
    assert_eq!(threads.sql_running.as_str(), "Connecting");

    // A misspelled token is indistinguishable from a genuine negative.
    let executor = CannedExecutor::new(
        &["Slave_IO_Running", "Slave_SQL_Running"],
        &[&["Nes", "No"]],
    );
    let result = query(&executor, "SHOW SLAVE STATUS", &[]).await.unwrap();
    let threads: ReplicaThreads = result.decode_one().unwrap();
    assert!(!threads.io_running);
}

#[tokio::test]
async fn integer_parse_failure_surfaces_field() {
    let executor = CannedExecutor::new(
        &["Variable_name", "Value"],
        &[&["Uptime", "941s"], &["Current_tls_ca", "ca.pem"]],
    );
    let result = query(&executor, "SHOW GLOBAL STATUS", &[]).await.unwrap();

    let err = result.decode_one::<GlobalStatus>().unwrap_err();
    assert!(matches!(err, MySqlDiagError::Coercion { ref key, .. } if key == "Uptime"));
}

#[tokio::test]
async fn execution_failure_propagates() {
    let err = query(&FailingExecutor, "SHOW GLOBAL STATUS", &[])
        .await
        .unwrap_err();
    assert!(matches!(err, MySqlDiagError::QueryExecution { .. }));
    assert!(err.to_string().contains("SHOW GLOBAL STATUS"));
}
