use std::collections::HashMap;

use indexmap::{IndexMap, IndexSet};
use log::warn;

use super::{extent, ChartData, ChartFields, Layout, Point, Series, StackOrder};
use crate::data::model::CanonicalRow;

/// The single value drawn for one (category, series) pair.
#[derive(Debug, Clone, Copy)]
struct Cell {
    value: f64,
    row: usize,
}

/// Build a diverging stacked layout.
///
/// * Categories are ordered by descending total negative magnitude
///   (`Σ -min(0, v)` over all their rows), ties broken by key.
/// * Series keep encounter order.
/// * Each (category, series) pair holds at most one value; the first row
///   wins.
pub fn build_stack(rows: &[CanonicalRow], fields: &ChartFields, order: StackOrder) -> ChartData {
    let series_field = fields.series.as_deref().unwrap_or(&fields.category);

    let mut negative_totals: IndexMap<String, f64> = IndexMap::new();
    let mut series_keys: IndexSet<String> = IndexSet::new();
    let mut cells: HashMap<(usize, usize), Cell> = HashMap::new();
    let mut duplicates = 0usize;

    for row in rows {
        let (Some(category), Some(key), Some(value)) = (
            row.key(&fields.category),
            row.key(series_field),
            row.number(&fields.value),
        ) else {
            continue;
        };

        let entry = negative_totals.entry(category);
        let c = entry.index();
        *entry.or_insert(0.0) += -value.min(0.0);
        let (s, _) = series_keys.insert_full(key);

        if cells.contains_key(&(c, s)) {
            duplicates += 1;
        } else {
            cells.insert((c, s), Cell { value, row: row.index });
        }
    }
    if duplicates > 0 {
        warn!("ignored {duplicates} rows repeating a (category, series) pair");
    }

    let mut ranked: Vec<(usize, &String, f64)> = negative_totals
        .iter()
        .enumerate()
        .map(|(i, (k, total))| (i, k, *total))
        .collect();
    ranked.sort_by(|a, b| b.2.total_cmp(&a.2).then_with(|| a.1.cmp(b.1)));

    let global_negative: Vec<bool> = (0..series_keys.len())
        .map(|s| {
            cells
                .iter()
                .any(|(&(_, cs), cell)| cs == s && cell.value < 0.0)
        })
        .collect();

    let mut points: Vec<Vec<Point>> = vec![Vec::new(); series_keys.len()];
    for &(c, category, _) in &ranked {
        let present: Vec<(usize, Cell)> = (0..series_keys.len())
            .filter_map(|s| cells.get(&(c, s)).map(|cell| (s, *cell)))
            .collect();
        let negative: Vec<bool> = match order {
            StackOrder::PerCategory => {
                let mut flags = vec![false; series_keys.len()];
                for (s, cell) in &present {
                    flags[*s] = cell.value < 0.0;
                }
                flags
            }
            StackOrder::Global => global_negative.clone(),
        };

        let (mut above, mut below) = (0.0, 0.0);
        for s in stacking_order(&negative) {
            let Some(cell) = cells.get(&(c, s)) else {
                continue;
            };
            let dy = cell.value;
            let (low, high) = if dy > 0.0 {
                let low = above;
                above += dy;
                (low, above)
            } else if dy < 0.0 {
                let high = below;
                below += dy;
                (below, high)
            } else {
                (0.0, 0.0)
            };
            points[s].push(Point {
                category: category.clone(),
                value: dy,
                low,
                high,
                row: cell.row,
                color_value: None,
                fill: None,
            });
        }
    }

    let value_domain = extent(points.iter().flatten().flat_map(|p| [p.low, p.high]))
        .unwrap_or([0.0, 0.0]);

    let series = series_keys
        .iter()
        .zip(points)
        .map(|(key, points)| Series {
            key: key.clone(),
            fill: None,
            points,
        })
        .collect();

    ChartData {
        layout: Layout::Stacked,
        category_domain: ranked.into_iter().map(|(_, k, _)| k.clone()).collect(),
        series_domain: series_keys.into_iter().collect(),
        series,
        value_domain,
        color_domain: None,
        report: Default::default(),
    }
}

/// Negative series in reverse index order, then the rest in index order.
fn stacking_order(negative: &[bool]) -> Vec<usize> {
    let below = (0..negative.len()).rev().filter(|&s| negative[s]);
    let above = (0..negative.len()).filter(|&s| !negative[s]);
    below.chain(above).collect()
}
