//! Chart-ready output: domains and per-(category, series) extents that a
//! renderer can draw without re-deriving anything.

pub mod bars;
pub mod stack;

use serde::{Deserialize, Serialize};

use crate::data::filter::FilterReport;

pub use bars::{build_bars, BarOptions};
pub use stack::build_stack;

/// Shape of the produced chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Layout {
    /// Diverging stacked bars, one stack per category.
    #[default]
    Stacked,
    /// One bar per row, drawn from the zero baseline.
    Bars,
}

/// How series are ordered when stacking away from zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StackOrder {
    /// Sign is decided per category: negative segments stack below zero in
    /// reverse series order, the rest above zero in series order.
    #[default]
    PerCategory,
    /// A series with a negative value in any category counts as negative
    /// everywhere; negative series come first, reversed.
    Global,
}

/// Canonical field names the builders read.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartFields {
    pub category: String,
    pub series: Option<String>,
    pub value: String,
    pub color: Option<String>,
}

/// One drawn rectangle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Point {
    pub category: String,
    pub value: f64,
    pub low: f64,
    pub high: f64,
    /// Index of the originating canonical row.
    pub row: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color_value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill: Option<String>,
    pub points: Vec<Point>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartData {
    pub layout: Layout,
    pub category_domain: Vec<String>,
    pub series_domain: Vec<String>,
    pub series: Vec<Series>,
    pub value_domain: [f64; 2],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color_domain: Option<[f64; 2]>,
    pub report: FilterReport,
}

impl ChartData {
    /// No rectangle to draw.
    pub fn is_empty(&self) -> bool {
        self.series.iter().all(|s| s.points.is_empty())
    }

    pub fn series(&self, key: &str) -> Option<&Series> {
        self.series.iter().find(|s| s.key == key)
    }

    /// `(low, high)` of the segment for `(category, series)`.
    pub fn extent_of(&self, category: &str, series: &str) -> Option<(f64, f64)> {
        self.series(series)?
            .points
            .iter()
            .find(|p| p.category == category)
            .map(|p| (p.low, p.high))
    }
}

/// `[min, max]` of the values, `None` when there are none.
pub fn extent(values: impl IntoIterator<Item = f64>) -> Option<[f64; 2]> {
    values.into_iter().fold(None, |acc, v| match acc {
        None => Some([v, v]),
        Some([lo, hi]) => Some([lo.min(v), hi.max(v)]),
    })
}
