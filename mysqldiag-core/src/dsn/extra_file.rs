//! Defaults-extra-file reading.
//!
//! The file uses the INI-style my.cnf syntax; only the `[client]` section
//! is consulted, and only a fixed set of option keys within it. Unlike the
//! system-defaults layer, a file that was asked for but cannot be read or
//! parsed aborts the whole resolution.

use crate::error::{MySqlDiagError, Result};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Option keys the resolver consults from the `[client]` section.
pub(crate) const CLIENT_OPTION_KEYS: &[&str] = &["user", "password", "socket", "host", "port"];

/// Reads the `[client]` section of a defaults-extra-file into a map.
///
/// Later duplicate keys overwrite earlier ones. Options outside the
/// `[client]` section are ignored.
///
/// # Errors
/// Returns `ConfigRead` when the file cannot be read and `ConfigParse`
/// when it contains a line that is neither a section header, a comment,
/// nor a `key=value` option.
pub(crate) fn read_client_section(path: &Path) -> Result<HashMap<String, String>> {
    let contents = fs::read_to_string(path)
        .map_err(|e| MySqlDiagError::config_read(format!("cannot read {}", path.display()), e))?;
    parse_client_section(&contents, path)
}

fn parse_client_section(contents: &str, path: &Path) -> Result<HashMap<String, String>> {
    let mut section = String::new();
    let mut values = HashMap::new();

    for (index, raw) in contents.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
            continue;
        }

        if let Some(rest) = line.strip_prefix('[') {
            let Some(name) = rest.strip_suffix(']') else {
                return Err(MySqlDiagError::config_parse(format!(
                    "{}:{}: unterminated section header",
                    path.display(),
                    index + 1
                )));
            };
            section = name.trim().to_string();
            continue;
        }

        let Some((key, value)) = line.split_once('=') else {
            return Err(MySqlDiagError::config_parse(format!(
                "{}:{}: expected key=value, got '{line}'",
                path.display(),
                index + 1
            )));
        };

        if section == "client" {
            values.insert(
                key.trim().to_string(),
                unquote(value.trim()).to_string(),
            );
        }
    }

    Ok(values)
}

/// Strips one level of matching single or double quotes.
fn unquote(value: &str) -> &str {
    let bytes = value.as_bytes();
    if bytes.len() >= 2 {
        let (first, last) = (bytes[0], bytes[bytes.len() - 1]);
        if (first == b'"' && last == b'"') || (first == b'\'' && last == b'\'') {
            return &value[1..value.len() - 1];
        }
    }
    value
}
