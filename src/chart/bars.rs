use indexmap::IndexSet;

use super::{extent, ChartData, ChartFields, Layout, Point, Series};
use crate::data::model::CanonicalRow;

/// Value-axis options for [`build_bars`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarOptions {
    /// Multiplier on a positive upper bound (1.1 leaves 10% above the
    /// tallest bar).
    pub headroom: f64,
    /// Stretch the value domain to contain zero.
    pub include_zero: bool,
}

impl Default for BarOptions {
    fn default() -> Self {
        Self {
            headroom: 1.0,
            include_zero: false,
        }
    }
}

/// One bar per row, each spanning `[min(0, v), max(0, v)]`.
///
/// The category domain keeps encounter order; repeated categories share a
/// band.
pub fn build_bars(rows: &[CanonicalRow], fields: &ChartFields, options: BarOptions) -> ChartData {
    let mut categories: IndexSet<String> = IndexSet::new();
    let mut points = Vec::with_capacity(rows.len());

    for row in rows {
        let (Some(category), Some(value)) = (row.key(&fields.category), row.number(&fields.value))
        else {
            continue;
        };
        let color_value = fields.color.as_deref().and_then(|f| row.number(f));
        categories.insert(category.clone());
        points.push(Point {
            category,
            value,
            low: value.min(0.0),
            high: value.max(0.0),
            row: row.index,
            color_value,
            fill: None,
        });
    }

    let zero = options.include_zero.then_some(0.0);
    let value_domain = match extent(points.iter().map(|p| p.value).chain(zero)) {
        Some([lo, hi]) if hi > 0.0 => [lo, hi * options.headroom],
        Some(domain) => domain,
        None => [0.0, 0.0],
    };
    let color_domain = extent(points.iter().filter_map(|p| p.color_value));

    ChartData {
        layout: Layout::Bars,
        category_domain: categories.into_iter().collect(),
        series_domain: vec![fields.value.clone()],
        series: vec![Series {
            key: fields.value.clone(),
            fill: None,
            points,
        }],
        value_domain,
        color_domain,
        report: Default::default(),
    }
}
