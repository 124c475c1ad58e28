//! Strict, statically declared binding of generic rows to typed values.

use super::{GenericRow, coerce};
use crate::error::{MySqlDiagError, Result};
use std::num::ParseIntError;
use std::str::FromStr;

/// Builds `Self` from one generic row.
///
/// The implementation is the destination type's binding table: each field
/// reads exactly one source key through the [`RowReader`], so the mapping
/// from field to key is explicit and checked at compile time. Binding is
/// strict one way only: every read key must exist in the row, while source
/// keys nothing reads are simply ignored.
pub trait FromGenericRow: Sized {
    /// Decodes one row into a freshly constructed value.
    ///
    /// # Errors
    /// `MissingField` when a read key is absent, `Coercion` when an
    /// integer field's text does not parse.
    fn from_row(row: &RowReader<'_>) -> Result<Self>;
}

/// Key lookup plus coercion over one generic row.
///
/// All source values are textual; the reader applies the [`coerce`] rule
/// matching the requested destination kind.
#[derive(Debug, Clone, Copy)]
pub struct RowReader<'a> {
    row: &'a GenericRow,
}

impl<'a> RowReader<'a> {
    pub(crate) fn new(row: &'a GenericRow) -> Self {
        Self { row }
    }

    /// Looks up a key, failing when it is absent.
    pub fn get(&self, key: &str) -> Result<&'a str> {
        self.row
            .get(key)
            .map(String::as_str)
            .ok_or_else(|| MySqlDiagError::missing_field(key))
    }

    /// Reads a textual field verbatim.
    pub fn text(&self, key: &str) -> Result<String> {
        Ok(coerce::text(self.get(key)?))
    }

    /// Reads an integer field from decimal text.
    pub fn integer<T>(&self, key: &str) -> Result<T>
    where
        T: FromStr<Err = ParseIntError>,
    {
        let raw = self.get(key)?;
        coerce::integer(raw).map_err(|e| MySqlDiagError::coercion(key, raw, e))
    }

    /// Reads a boolean field; `Yes`/`On` in any casing are true,
    /// everything else is false.
    pub fn boolean(&self, key: &str) -> Result<bool> {
        Ok(coerce::boolean(self.get(key)?))
    }

    /// Reads a field as a [`FlagValue`], keeping the server's raw token.
    ///
    /// [`FlagValue`]: super::FlagValue
    pub fn flag(&self, key: &str) -> Result<coerce::FlagValue> {
        Ok(coerce::FlagValue::new(self.get(key)?))
    }
}
