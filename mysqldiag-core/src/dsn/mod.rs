//! Connection descriptor resolution for MySQL diagnostic tools.
//!
//! A [`Dsn`] is assembled from four layers, lowest precedence first:
//!
//! 1. system defaults printed by `my_print_defaults` (best-effort),
//! 2. a caller-supplied defaults-extra-file's `[client]` section,
//! 3. explicit per-field overrides in [`MySqlOpts`],
//! 4. the `$USER` environment fallback, for the username only.
//!
//! Both external readers are injected capabilities so tests can substitute
//! fakes; see [`DefaultsSource`] and [`UserIdentity`].
//!
//! # Security
//! The rendered connection string contains the password. The debug trace
//! emitted during resolution always uses the redacted form instead.

mod defaults;
mod extra_file;

pub use defaults::{DefaultsSource, EnvUserIdentity, MyPrintDefaults, UserIdentity};

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// Replacement for the password in redacted renderings.
const REDACTION_TOKEN: &str = "xxxx";

/// Caller-supplied connection overrides.
///
/// Empty strings mean "not specified"; the password is an `Option` so a
/// caller can explicitly request an empty password (`Some(String::new())`)
/// as opposed to leaving it to lower-precedence layers (`None`).
///
/// # Example
/// ```rust,no_run
/// use mysqldiag_core::MySqlOpts;
/// use std::time::Duration;
///
/// let opts = MySqlOpts::new()
///     .with_host("example.com")
///     .with_port("33306")
///     .with_user("testuser")
///     .with_password("testpass");
///
/// let dsn = mysqldiag_core::create_dsn(&opts, Duration::from_secs(1)).unwrap();
/// assert_eq!(dsn, "testuser:testpass@tcp(example.com:33306)/?timeout=1s");
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MySqlOpts {
    /// Path to a defaults-extra-file whose `[client]` section is consulted
    pub defaults_extra_file: Option<PathBuf>,
    /// Path to the server's listen socket; wins over host/port when set
    pub socket: String,
    /// Hostname, defaulted to `localhost` when nothing specifies one
    pub host: String,
    /// Port, defaulted to `3306` when nothing specifies one
    pub port: String,
    /// Username; falls back to `$USER` when every layer leaves it empty
    pub user: String,
    /// Password override; `None` leaves lower layers in effect
    pub password: Option<String>,
    /// Database selected after connecting
    pub database: String,
    /// Extra connection parameters, appended to the DSN in key order
    pub dsn_params: BTreeMap<String, String>,
}

impl MySqlOpts {
    /// Creates empty options; every field is left to lower layers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to set the defaults-extra-file path.
    pub fn with_defaults_extra_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.defaults_extra_file = Some(path.into());
        self
    }

    /// Builder method to set the socket path.
    pub fn with_socket(mut self, socket: impl Into<String>) -> Self {
        self.socket = socket.into();
        self
    }

    /// Builder method to set the host.
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// Builder method to set the port.
    pub fn with_port(mut self, port: impl Into<String>) -> Self {
        self.port = port.into();
        self
    }

    /// Builder method to set the username.
    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        self.user = user.into();
        self
    }

    /// Builder method to set the password, including an explicitly empty one.
    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    /// Builder method to set the default database.
    pub fn with_database(mut self, database: impl Into<String>) -> Self {
        self.database = database.into();
        self
    }

    /// Builder method to add one extra connection parameter.
    pub fn with_dsn_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.dsn_params.insert(key.into(), value.into());
        self
    }
}

/// A resolved connection descriptor.
///
/// Constructed empty, mutated by the merge steps of [`DsnResolver::resolve`]
/// in precedence order, then rendered once via `Display`. The only mutation
/// after rendering is the [`Dsn::redacted`] copy used for logging.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dsn {
    pub username: String,
    pub password: String,
    pub hostname: String,
    pub port: String,
    pub socket: String,
    pub default_db: String,
    /// Ordered parameter list; append-only, duplicates allowed
    pub params: Vec<(String, String)>,
}

impl Dsn {
    /// Returns a copy with the password replaced by a fixed token.
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        copy.password = REDACTION_TOKEN.to_string();
        copy
    }

    /// Applies recognized `[client]`-style keys onto the descriptor.
    ///
    /// Only `user`, `password`, `socket`, `host` and `port` are consulted;
    /// later duplicates overwrite earlier ones within the same layer.
    fn apply_client_pairs<'p>(&mut self, pairs: impl IntoIterator<Item = (&'p str, &'p str)>) {
        for (key, value) in pairs {
            match key {
                "user" => self.username = value.to_string(),
                "password" => self.password = value.to_string(),
                "socket" => self.socket = value.to_string(),
                "host" => self.hostname = value.to_string(),
                "port" => self.port = value.to_string(),
                _ => {}
            }
        }
    }
}

impl fmt::Display for Dsn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.socket.is_empty() {
            write!(
                f,
                "{}:{}@tcp({}:{})",
                self.username, self.password, self.hostname, self.port
            )?;
        } else {
            write!(f, "{}:{}@unix({})", self.username, self.password, self.socket)?;
        }

        // The database path segment is always present, even when empty.
        write!(f, "/{}", self.default_db)?;

        if !self.params.is_empty() {
            f.write_str("?")?;
            for (i, (key, value)) in self.params.iter().enumerate() {
                if i > 0 {
                    f.write_str("&")?;
                }
                write!(f, "{key}={value}")?;
            }
        }

        Ok(())
    }
}

/// Resolves [`MySqlOpts`] into a [`Dsn`] using injected readers.
///
/// `Default` wires the real capabilities: `my_print_defaults` for system
/// defaults and `$USER` for the identity fallback.
pub struct DsnResolver {
    defaults: Box<dyn DefaultsSource>,
    identity: Box<dyn UserIdentity>,
}

impl Default for DsnResolver {
    fn default() -> Self {
        Self::new(Box::new(MyPrintDefaults), Box::new(EnvUserIdentity))
    }
}

impl DsnResolver {
    /// Creates a resolver with custom capability implementations.
    pub fn new(defaults: Box<dyn DefaultsSource>, identity: Box<dyn UserIdentity>) -> Self {
        Self { defaults, identity }
    }

    /// Merges all configuration layers into a resolved descriptor.
    ///
    /// `timeout` becomes a `timeout` connection parameter when strictly
    /// positive; zero means no parameter at all. Extra parameters from
    /// `opts.dsn_params` are appended after it, in key order.
    ///
    /// # Errors
    /// Returns an error only when the defaults-extra-file is present but
    /// unreadable or malformed. Absence of `my_print_defaults` is silently
    /// treated as an empty layer.
    pub fn resolve(&self, opts: &MySqlOpts, timeout: Duration) -> Result<Dsn> {
        let mut dsn = Dsn::default();

        if let Some(pairs) = self.defaults.client_defaults() {
            dsn.apply_client_pairs(pairs.iter().map(|(k, v)| (k.as_str(), v.as_str())));
        }

        if let Some(path) = &opts.defaults_extra_file {
            let section = extra_file::read_client_section(path)?;
            dsn.apply_client_pairs(
                extra_file::CLIENT_OPTION_KEYS
                    .iter()
                    .filter_map(|key| section.get(*key).map(|v| (*key, v.as_str()))),
            );
        }

        if !opts.host.is_empty() {
            dsn.hostname = opts.host.clone();
        }
        if !opts.port.is_empty() {
            dsn.port = opts.port.clone();
        }
        if !opts.user.is_empty() {
            dsn.username = opts.user.clone();
        }
        if let Some(password) = &opts.password {
            dsn.password = password.clone();
        }
        if !opts.socket.is_empty() {
            dsn.socket = opts.socket.clone();
        }

        // Username is the only field with an environment fallback.
        if dsn.username.is_empty() {
            dsn.username = self.identity.current_user().unwrap_or_default();
        }

        dsn.default_db = opts.database.clone();

        // Socket wins as the transport; host/port only get defaults on TCP.
        if dsn.socket.is_empty() {
            if dsn.hostname.is_empty() {
                dsn.hostname = "localhost".to_string();
            }
            if dsn.port.is_empty() {
                dsn.port = "3306".to_string();
            }
        } else {
            dsn.hostname.clear();
            dsn.port.clear();
        }

        if !timeout.is_zero() {
            dsn.params
                .push(("timeout".to_string(), format_duration(timeout)));
        }
        for (key, value) in &opts.dsn_params {
            dsn.params.push((key.clone(), value.clone()));
        }

        Ok(dsn)
    }

    /// Resolves and renders the connection string.
    ///
    /// A redacted copy is emitted at debug level; the returned string is
    /// never redacted.
    pub fn create_dsn(&self, opts: &MySqlOpts, timeout: Duration) -> Result<String> {
        let dsn = self.resolve(opts, timeout)?;
        tracing::debug!("DSN: {}", dsn.redacted());
        Ok(dsn.to_string())
    }
}

/// Resolves a connection string with the default capability wiring.
///
/// # Errors
/// See [`DsnResolver::resolve`].
pub fn create_dsn(opts: &MySqlOpts, timeout: Duration) -> Result<String> {
    DsnResolver::default().create_dsn(opts, timeout)
}

/// Renders a duration the way the `timeout` DSN parameter expects it,
/// e.g. `1s` or `500ms`.
///
/// Falls through to the coarsest unit that loses nothing, so a strictly
/// positive timeout never renders as a zero value.
fn format_duration(timeout: Duration) -> String {
    let nanos = timeout.subsec_nanos();
    if nanos == 0 {
        format!("{}s", timeout.as_secs())
    } else if nanos % 1_000_000 == 0 {
        format!("{}ms", timeout.as_millis())
    } else if nanos % 1_000 == 0 {
        format!("{}us", timeout.as_micros())
    } else {
        format!("{}ns", timeout.as_nanos())
    }
}
