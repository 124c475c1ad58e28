//! Connection resolution and result decoding for MySQL diagnostics.
//!
//! This crate serves tools that fire ad-hoc introspection statements
//! (`SHOW GLOBAL STATUS`, `SHOW VARIABLES`, `SHOW SLAVE STATUS`, ...) at a
//! MySQL server. It covers the two chores every such tool repeats:
//!
//! - **DSN resolution** ([`dsn`]): merge system defaults, a
//!   defaults-extra-file, explicit overrides and the environment into one
//!   connection descriptor, with well-defined precedence and deterministic
//!   rendering.
//! - **Result decoding** ([`query`]): run a query through an injected
//!   executor, fold `Variable_name`/`Value` results into a single record or
//!   keep tabular results as ordered rows, then bind either into caller
//!   types with strict field lookup and uniform text coercion.
//!
//! The two subsystems are independent; the resolver's output is merely one
//! possible input to whatever opens the connection the decoder queries
//! through.
//!
//! # Architecture
//! External effects (process invocation, environment, query execution) sit
//! behind injected traits so every pipeline is testable with fakes.
//! Passwords never reach log output: debug traces use the redacted
//! descriptor rendering.

pub mod dsn;
pub mod error;
pub mod logging;
pub mod query;

// Re-export commonly used types
pub use dsn::{
    DefaultsSource, Dsn, DsnResolver, EnvUserIdentity, MyPrintDefaults, MySqlOpts, UserIdentity,
    create_dsn,
};
pub use error::{MySqlDiagError, Result};
pub use query::{
    FlagValue, FromGenericRow, GenericRow, QueryExecutor, QueryResult, RawQueryResult, ResultShape,
    RowReader, query,
};

#[cfg(feature = "mysql")]
pub use query::executor::connect;
