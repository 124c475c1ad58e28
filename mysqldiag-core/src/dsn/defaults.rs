//! Injected readers for the lowest-precedence configuration layers.

use regex::Regex;
use std::process::Command;
use std::sync::OnceLock;

/// Best-effort source of the system's configured client defaults.
///
/// Failure is never fatal: an implementation that cannot produce defaults
/// returns `None` and the resolver treats the layer as empty.
pub trait DefaultsSource: Send + Sync {
    /// Returns `[client]` option pairs in the order they were printed.
    fn client_defaults(&self) -> Option<Vec<(String, String)>>;
}

/// Environment-derived fallback identity for the username.
pub trait UserIdentity: Send + Sync {
    /// Returns the current user's name, if one is known.
    fn current_user(&self) -> Option<String>;
}

/// Reads system defaults by invoking `my_print_defaults`.
///
/// Tries `my_print_defaults -s client` first (shows values merged from all
/// option files), then plain `my_print_defaults client`. The first
/// invocation that exits successfully wins; if neither does, the layer is
/// empty.
pub struct MyPrintDefaults;

impl DefaultsSource for MyPrintDefaults {
    fn client_defaults(&self) -> Option<Vec<(String, String)>> {
        const INVOCATIONS: &[&[&str]] = &[&["-s", "client"], &["client"]];

        for args in INVOCATIONS {
            match Command::new("my_print_defaults").args(*args).output() {
                Ok(output) if output.status.success() => {
                    let stdout = String::from_utf8_lossy(&output.stdout);
                    return Some(parse_print_defaults(&stdout));
                }
                _ => continue,
            }
        }

        tracing::debug!("my_print_defaults unavailable, skipping system defaults");
        None
    }
}

/// Reads the username from the `$USER` environment variable.
pub struct EnvUserIdentity;

impl UserIdentity for EnvUserIdentity {
    fn current_user(&self) -> Option<String> {
        std::env::var("USER").ok().filter(|user| !user.is_empty())
    }
}

fn option_line_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^--(.+?)=(.*)").expect("invalid option line pattern"))
}

/// Parses `my_print_defaults` output: one `--key=value` option per line.
///
/// Lines that do not match the option form (including valueless flags such
/// as `--no-beep`) are skipped.
pub(crate) fn parse_print_defaults(output: &str) -> Vec<(String, String)> {
    let re = option_line_regex();
    output
        .lines()
        .filter_map(|line| {
            re.captures(line)
                .map(|caps| (caps[1].to_string(), caps[2].to_string()))
        })
        .collect()
}
