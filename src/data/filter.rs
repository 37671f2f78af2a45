use std::collections::BTreeMap;

use log::debug;
use serde::{Deserialize, Serialize};

use super::model::{CanonicalRow, FieldValue, RawRow};
use super::schema::{ParseRule, Schema};
use crate::error::SchemaError;

/// Reserved value meaning "invalid or infinite" in the energy datasets.
pub const SENTINEL: f64 = -1.0;

// ---------------------------------------------------------------------------
// Drop rules
// ---------------------------------------------------------------------------

/// Row-level predicates. Every enabled rule must pass for a row to be kept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DropRules {
    /// Inclusive lower year bound, applied to the year role.
    pub min_year: Option<f64>,
    /// Inclusive upper year bound.
    pub max_year: Option<f64>,
    /// Numeric value treated as invalid. `None` disables the check.
    pub sentinel: Option<f64>,
    /// Also drop rows whose text fields read exactly as the sentinel.
    pub sentinel_on_text: bool,
    /// Keep only rows whose entity cell equals this text.
    pub target_entity: Option<String>,
    /// Raw column holding the entity. Defaults to the category's source
    /// column, and may name a column outside the schema.
    pub entity_column: Option<String>,
    /// Keep only rows whose series cell equals this text.
    pub target_series: Option<String>,
}

impl Default for DropRules {
    fn default() -> Self {
        Self {
            min_year: None,
            max_year: None,
            sentinel: Some(SENTINEL),
            sentinel_on_text: false,
            target_entity: None,
            entity_column: None,
            target_series: None,
        }
    }
}

/// Why a row was excluded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DropReason {
    Missing,
    Unparseable,
    NonFinite,
    Sentinel,
    YearOutOfRange,
    EntityMismatch,
    SeriesMismatch,
}

/// Counts of what the filter did over one input.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FilterReport {
    pub read: usize,
    pub kept: usize,
    pub dropped: BTreeMap<DropReason, usize>,
}

impl FilterReport {
    pub fn dropped_total(&self) -> usize {
        self.dropped.values().sum()
    }
}

// ---------------------------------------------------------------------------
// Translator
// ---------------------------------------------------------------------------

/// Validated schema + rules, ready to translate rows.
#[derive(Debug, Clone)]
pub struct RowFilter {
    schema: Schema,
    rules: DropRules,
}

impl RowFilter {
    /// Validate the schema and rules once.
    pub fn new(schema: Schema, rules: DropRules) -> Result<Self, SchemaError> {
        schema.validate()?;
        if rules.target_series.is_some() && schema.roles.series.is_none() {
            return Err(SchemaError::MissingSeries);
        }
        if (rules.min_year.is_some() || rules.max_year.is_some()) && schema.roles.year.is_none() {
            return Err(SchemaError::MissingYear);
        }
        if let (Some(min), Some(max)) = (rules.min_year, rules.max_year) {
            if min > max {
                return Err(SchemaError::InvalidYearRange { min, max });
            }
        }
        Ok(Self { schema, rules })
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Translate one row. Pure: the same row always gives the same answer.
    pub fn translate(&self, raw: &RawRow, index: usize) -> Result<CanonicalRow, DropReason> {
        self.check_targets(raw)?;

        let mut fields = BTreeMap::new();
        for col in &self.schema.columns {
            let text = raw.get(&col.source).ok_or(DropReason::Missing)?;
            let value = match col.parse {
                ParseRule::Text => {
                    if self.rules.sentinel_on_text && self.is_sentinel_text(text) {
                        return Err(DropReason::Sentinel);
                    }
                    FieldValue::Text(text.to_string())
                }
                ParseRule::Number => FieldValue::Number(self.parse_number(text)?),
            };
            fields.insert(col.name.clone(), value);
        }

        let row = CanonicalRow { index, fields };
        self.check_year(&row)?;
        Ok(row)
    }

    /// Translate every row, keeping survivors in input order.
    pub fn apply(&self, rows: &[RawRow]) -> (Vec<CanonicalRow>, FilterReport) {
        let mut report = FilterReport {
            read: rows.len(),
            ..Default::default()
        };
        let mut kept = Vec::new();

        for raw in rows {
            match self.translate(raw, kept.len()) {
                Ok(row) => kept.push(row),
                Err(reason) => {
                    debug!("dropping record {}: {reason:?}", raw.line);
                    *report.dropped.entry(reason).or_default() += 1;
                }
            }
        }

        report.kept = kept.len();
        (kept, report)
    }

    fn parse_number(&self, text: &str) -> Result<f64, DropReason> {
        let v: f64 = text.parse().map_err(|_| DropReason::Unparseable)?;
        if !v.is_finite() {
            return Err(DropReason::NonFinite);
        }
        if self.rules.sentinel == Some(v) {
            return Err(DropReason::Sentinel);
        }
        Ok(v)
    }

    fn is_sentinel_text(&self, text: &str) -> bool {
        match self.rules.sentinel {
            Some(s) => text.parse::<f64>().map(|v| v == s).unwrap_or(false),
            None => false,
        }
    }

    fn check_targets(&self, raw: &RawRow) -> Result<(), DropReason> {
        let roles = &self.schema.roles;
        if let Some(target) = &self.rules.target_entity {
            let column = match &self.rules.entity_column {
                Some(column) => Some(column.as_str()),
                None => self.schema.source_of(&roles.category),
            };
            let cell = column.and_then(|src| raw.get(src));
            if cell != Some(target.as_str()) {
                return Err(DropReason::EntityMismatch);
            }
        }
        if let Some(target) = &self.rules.target_series {
            let cell = roles
                .series
                .as_deref()
                .and_then(|series| self.schema.source_of(series))
                .and_then(|src| raw.get(src));
            if cell != Some(target.as_str()) {
                return Err(DropReason::SeriesMismatch);
            }
        }
        Ok(())
    }

    fn check_year(&self, row: &CanonicalRow) -> Result<(), DropReason> {
        let Some(year_field) = &self.schema.roles.year else {
            return Ok(());
        };
        // Years compare as whole numbers, so `2020.5` falls in 2020.
        let Some(year) = row.number(year_field).map(f64::trunc) else {
            return Ok(());
        };
        if self.rules.min_year.is_some_and(|min| year < min)
            || self.rules.max_year.is_some_and(|max| year > max)
        {
            return Err(DropReason::YearOutOfRange);
        }
        Ok(())
    }
}
