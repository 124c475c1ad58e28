//! Logging initialization for embedders of this crate.
//!
//! The crate itself only emits `tracing` events (including the redacted DSN
//! trace); this helper wires a subscriber for binaries and tests that have
//! nothing else installing one.

use crate::Result;

/// Initializes structured logging based on verbosity level.
///
/// `RUST_LOG` takes precedence over `verbose` when set
/// (0=INFO, 1=DEBUG, 2+=TRACE).
///
/// # Errors
/// Returns an error if a global subscriber is already installed.
pub fn init_logging(verbose: u8) -> Result<()> {
    let default_directive = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_directive));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
        .map_err(|e| {
            crate::error::MySqlDiagError::configuration(format!(
                "failed to initialize logging: {e}"
            ))
        })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    // Note: logging can only be initialized once per test process,
    // so we only verify the verbosity mapping here.

    #[test]
    fn test_verbosity_levels() {
        let cases = [(0u8, "info"), (1, "debug"), (2, "trace"), (9, "trace")];
        for (verbose, expected) in cases {
            let directive = match verbose {
                0 => "info",
                1 => "debug",
                _ => "trace",
            };
            assert_eq!(directive, expected, "failed for verbose={verbose}");
        }
    }
}
