//! Coercion rules from textual source values to destination kinds.
//!
//! Each rule is a pure function keyed by the destination kind alone, so the
//! same behavior applies uniformly to every field of that kind. The boolean
//! rule is deliberately permissive: any token outside the recognized set is
//! false, never an error, which matches how MySQL reports variables like
//! `Slave_IO_Running`. Callers that need the raw token use [`FlagValue`].

use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

/// Textual passthrough.
pub fn text(raw: &str) -> String {
    raw.to_string()
}

/// Decimal integer parse; works for any integer width.
///
/// # Errors
/// Returns the underlying parse error for non-decimal input; the caller
/// attaches the field key.
pub fn integer<T>(raw: &str) -> Result<T, ParseIntError>
where
    T: FromStr<Err = ParseIntError>,
{
    raw.parse()
}

/// Boolean rule: case-insensitive `Yes` or `On` is true, anything else
/// (including near-misses and empty input) is false.
pub fn boolean(raw: &str) -> bool {
    raw.eq_ignore_ascii_case("yes") || raw.eq_ignore_ascii_case("on")
}

/// A server-reported on/off token that keeps its original spelling.
///
/// Useful when a caller wants both the truth value and the verbatim token,
/// e.g. to report `Slave_IO_Running: Connecting` instead of plain `false`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlagValue {
    raw: String,
}

impl FlagValue {
    pub(crate) fn new(raw: &str) -> Self {
        Self {
            raw: raw.to_string(),
        }
    }

    /// The verbatim server token.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Whether the token reads as enabled under the boolean rule.
    pub fn enabled(&self) -> bool {
        boolean(&self.raw)
    }
}

impl fmt::Display for FlagValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}
