//! Error types for DSN resolution and result decoding.
//!
//! Every failure mode is terminal for the call that produced it; nothing in
//! this crate retries or recovers internally. Connection strings carrying a
//! password are never embedded in error messages.

use thiserror::Error;

/// Main error type for mysqldiag operations.
#[derive(Debug, Error)]
pub enum MySqlDiagError {
    /// The defaults-extra-file could not be read
    #[error("failed to read defaults-extra-file: {context}")]
    ConfigRead {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The defaults-extra-file was readable but not parseable
    #[error("malformed defaults-extra-file: {context}")]
    ConfigParse { context: String },

    /// Invalid configuration value (e.g. a non-numeric port at connect time)
    #[error("configuration error: {message}")]
    Configuration { message: String },

    /// Query execution failed in the underlying executor
    #[error("query execution failed: {context}")]
    QueryExecution {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A single-value decode was requested but the result holds no rows
    #[error("no rows in query result")]
    EmptyResult,

    /// A bound field's source key is absent from the result row
    #[error("required field '{key}' not found in query result")]
    MissingField { key: String },

    /// A textual cell could not be coerced to the destination integer type
    #[error("cannot coerce value '{value}' of field '{key}' to an integer")]
    Coercion {
        key: String,
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },
}

/// Convenience type alias for Results with `MySqlDiagError`
pub type Result<T> = std::result::Result<T, MySqlDiagError>;

impl MySqlDiagError {
    /// Creates a config-read error wrapping an I/O failure.
    pub fn config_read<E>(context: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::ConfigRead {
            context: context.into(),
            source: Box::new(source),
        }
    }

    /// Creates a config-parse error for a malformed extra-file.
    pub fn config_parse(context: impl Into<String>) -> Self {
        Self::ConfigParse {
            context: context.into(),
        }
    }

    /// Creates a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Creates a query execution error wrapping the executor's failure.
    pub fn query_failed<E>(context: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::QueryExecution {
            context: context.into(),
            source: Box::new(source),
        }
    }

    /// Creates a missing-field error for a strict binding lookup.
    pub fn missing_field(key: impl Into<String>) -> Self {
        Self::MissingField { key: key.into() }
    }

    /// Creates a coercion error for a failed integer parse.
    pub fn coercion(
        key: impl Into<String>,
        value: impl Into<String>,
        source: std::num::ParseIntError,
    ) -> Self {
        Self::Coercion {
            key: key.into(),
            value: value.into(),
            source,
        }
    }
}
