use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

// ---------------------------------------------------------------------------
// RawRow – one CSV record, untouched
// ---------------------------------------------------------------------------

/// One input line as parsed from CSV: header name → cell text.
///
/// Cells are stored trimmed. An empty cell is kept as `""` and treated as
/// missing by the filter.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRow {
    /// Zero-based position of the record in the source (header excluded).
    pub line: usize,
    pub cells: BTreeMap<String, String>,
}

impl RawRow {
    pub fn new(line: usize) -> Self {
        Self {
            line,
            cells: BTreeMap::new(),
        }
    }

    /// Builder-style insert, mostly for tests and fixtures.
    pub fn with(mut self, column: &str, value: &str) -> Self {
        self.cells.insert(column.to_string(), value.to_string());
        self
    }

    /// Cell text, `None` when the column is absent or the cell is empty.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.cells
            .get(column)
            .map(String::as_str)
            .filter(|s| !s.is_empty())
    }
}

// ---------------------------------------------------------------------------
// FieldValue – a single typed cell of a canonical row
// ---------------------------------------------------------------------------

/// A typed canonical field. Numbers are always finite and never the sentinel.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Number(f64),
    Text(String),
}

impl FieldValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Number(v) => Some(*v),
            FieldValue::Text(_) => None,
        }
    }

    /// Key used for grouping and domains. Numbers print without a trailing
    /// `.0` so that a year column reads `2010`, not `2010.0`.
    pub fn key(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Number(v) if v.fract() == 0.0 && v.abs() < 1e15 => {
                write!(f, "{}", *v as i64)
            }
            FieldValue::Number(v) => write!(f, "{v}"),
            FieldValue::Text(s) => write!(f, "{s}"),
        }
    }
}

// ---------------------------------------------------------------------------
// CanonicalRow – a translated, validated row
// ---------------------------------------------------------------------------

/// A row after translation: canonical field name → typed value.
///
/// `index` is the row's position among the rows that survived filtering, so
/// any later stage can refer back to it and restore input order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CanonicalRow {
    pub index: usize,
    pub fields: BTreeMap<String, FieldValue>,
}

impl CanonicalRow {
    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.fields.get(field)
    }

    pub fn number(&self, field: &str) -> Option<f64> {
        self.get(field).and_then(FieldValue::as_f64)
    }

    /// String key of `field`, or `None` when the row lacks it.
    pub fn key(&self, field: &str) -> Option<String> {
        self.get(field).map(FieldValue::key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_cells_read_as_missing() {
        let row = RawRow::new(0).with("Entity", "").with("Year", "2010");
        assert_eq!(row.get("Entity"), None);
        assert_eq!(row.get("Year"), Some("2010"));
        assert_eq!(row.get("source"), None);
    }

    #[test]
    fn integral_numbers_key_without_fraction() {
        assert_eq!(FieldValue::Number(2010.0).key(), "2010");
        assert_eq!(FieldValue::Number(-0.25).key(), "-0.25");
        assert_eq!(FieldValue::Text("Chad".into()).key(), "Chad");
    }
}
