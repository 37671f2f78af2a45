use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::SchemaError;

// ---------------------------------------------------------------------------
// Field translation table
// ---------------------------------------------------------------------------

/// How a raw cell becomes a canonical value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParseRule {
    Number,
    Text,
}

/// One source column and the canonical field it becomes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSpec {
    /// Header name in the CSV.
    pub source: String,
    /// Canonical field name.
    pub name: String,
    pub parse: ParseRule,
}

impl ColumnSpec {
    pub fn number(source: &str, name: &str) -> Self {
        Self {
            source: source.to_string(),
            name: name.to_string(),
            parse: ParseRule::Number,
        }
    }

    pub fn text(source: &str, name: &str) -> Self {
        Self {
            source: source.to_string(),
            name: name.to_string(),
            parse: ParseRule::Text,
        }
    }
}

/// Which canonical fields play which part in the chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Roles {
    /// Grouping key and category axis (e.g. country).
    pub category: String,
    /// Stacking / legend key (e.g. energy source).
    #[serde(default)]
    pub series: Option<String>,
    /// Measure on the value axis.
    pub value: String,
    /// Field checked against the year range.
    #[serde(default)]
    pub year: Option<String>,
    /// Measure mapped through a sequential color ramp.
    #[serde(default)]
    pub color: Option<String>,
}

/// Ordered translation table plus role assignment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    pub columns: Vec<ColumnSpec>,
    pub roles: Roles,
}

impl Schema {
    /// Check the table once, before any row is read.
    pub fn validate(&self) -> Result<(), SchemaError> {
        if self.columns.is_empty() {
            return Err(SchemaError::Empty);
        }

        let mut sources = BTreeSet::new();
        let mut names = BTreeSet::new();
        for col in &self.columns {
            if !sources.insert(col.source.as_str()) {
                return Err(SchemaError::DuplicateSource(col.source.clone()));
            }
            if !names.insert(col.name.as_str()) {
                return Err(SchemaError::DuplicateName(col.name.clone()));
            }
        }

        self.require("category", &self.roles.category, None)?;
        self.require("value", &self.roles.value, Some(ParseRule::Number))?;
        if let Some(series) = &self.roles.series {
            self.require("series", series, None)?;
        }
        if let Some(year) = &self.roles.year {
            self.require("year", year, Some(ParseRule::Number))?;
        }
        if let Some(color) = &self.roles.color {
            self.require("color", color, Some(ParseRule::Number))?;
        }
        Ok(())
    }

    /// Column spec producing canonical field `name`.
    pub fn column(&self, name: &str) -> Option<&ColumnSpec> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Source header feeding canonical field `name`.
    pub fn source_of(&self, name: &str) -> Option<&str> {
        self.column(name).map(|c| c.source.as_str())
    }

    fn require(
        &self,
        role: &'static str,
        field: &str,
        parse: Option<ParseRule>,
    ) -> Result<(), SchemaError> {
        let col = self.column(field).ok_or_else(|| SchemaError::UnknownField {
            role,
            field: field.to_string(),
        })?;
        match parse {
            Some(rule) if col.parse != rule => Err(SchemaError::NotNumeric {
                role,
                field: field.to_string(),
            }),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn footprint_schema() -> Schema {
        Schema {
            columns: vec![
                ColumnSpec::text("Entity", "country"),
                ColumnSpec::number("Year", "year"),
                ColumnSpec::number("footprint_ratio", "footprint"),
                ColumnSpec::text("source", "source"),
            ],
            roles: Roles {
                category: "country".into(),
                series: Some("source".into()),
                value: "footprint".into(),
                year: Some("year".into()),
                color: None,
            },
        }
    }

    #[test]
    fn footprint_schema_is_valid() {
        let schema = footprint_schema();
        assert_eq!(schema.validate(), Ok(()));
        assert_eq!(schema.source_of("footprint"), Some("footprint_ratio"));
    }

    #[test]
    fn rejects_duplicate_canonical_names() {
        let mut schema = footprint_schema();
        schema.columns.push(ColumnSpec::text("Country", "country"));
        assert_eq!(
            schema.validate(),
            Err(SchemaError::DuplicateName("country".into()))
        );
    }

    #[test]
    fn value_role_must_be_numeric() {
        let mut schema = footprint_schema();
        schema.roles.value = "source".into();
        assert!(matches!(
            schema.validate(),
            Err(SchemaError::NotNumeric { role: "value", .. })
        ));
    }

    #[test]
    fn unknown_series_field_is_rejected() {
        let mut schema = footprint_schema();
        schema.roles.series = Some("fuel".into());
        assert!(matches!(
            schema.validate(),
            Err(SchemaError::UnknownField { role: "series", .. })
        ));
    }
}
