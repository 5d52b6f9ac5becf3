// ============================================================
// RAW ROW
// ============================================================
// One tokenized payroll line: header name -> raw string value

use serde::{Deserialize, Serialize};

use super::FieldMap;

/// Value reported for a row whose email column cannot be read
pub const UNKNOWN_EMAIL: &str = "unknown";

/// A single CSV line before validation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawRow {
    /// Row index (0-based, header excluded)
    pub index: usize,

    /// Header name -> value, names kept exactly as written in the header
    pub fields: FieldMap,
}

impl RawRow {
    pub fn new(index: usize, fields: FieldMap) -> Self {
        Self { index, fields }
    }

    /// Build a row from `(name, value)` pairs
    pub fn from_pairs<I, K, V>(index: usize, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let fields = pairs
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self { index, fields }
    }

    /// Value of a column, or `None` when the column is absent
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// Value of a column, trimmed, or `None` when absent or blank
    pub fn non_blank(&self, name: &str) -> Option<&str> {
        self.get(name).map(str::trim).filter(|v| !v.is_empty())
    }

    /// Best-effort recipient for reporting, even when the row is invalid
    pub fn email_or_unknown(&self) -> String {
        self.get("email").unwrap_or(UNKNOWN_EMAIL).to_string()
    }
}
