use indexmap::IndexMap;
use log::info;
use rand::seq::SliceRandom;
use rand::Rng;

use super::model::CanonicalRow;

// ---------------------------------------------------------------------------
// Grouping – rows partitioned by a key field
// ---------------------------------------------------------------------------

/// Rows bucketed by the value of one field. Groups are kept in order of
/// first appearance; rows keep their relative input order inside a group.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Grouping {
    pub field: String,
    pub groups: IndexMap<String, Vec<CanonicalRow>>,
}

impl Grouping {
    /// Partition `rows` by `field`. Rows lacking the field are not grouped.
    pub fn by(rows: Vec<CanonicalRow>, field: &str) -> Self {
        let mut groups: IndexMap<String, Vec<CanonicalRow>> = IndexMap::new();
        for row in rows {
            if let Some(key) = row.key(field) {
                groups.entry(key).or_default().push(row);
            }
        }
        Self {
            field: field.to_string(),
            groups,
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.groups.keys().map(String::as_str)
    }

    pub fn get(&self, key: &str) -> Option<&[CanonicalRow]> {
        self.groups.get(key).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn row_count(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }

    /// Keep `min(n, len)` groups chosen uniformly without replacement.
    ///
    /// Surviving groups keep their original relative order, so a fixed
    /// sample always yields the same grouping.
    pub fn sample<R: Rng + ?Sized>(self, n: usize, rng: &mut R) -> Self {
        if n >= self.groups.len() {
            return self;
        }

        let keys: Vec<&String> = self.groups.keys().collect();
        let chosen: Vec<String> = keys
            .choose_multiple(rng, n)
            .map(|k| (*k).clone())
            .collect();
        info!("sampled {} of {} groups", chosen.len(), self.groups.len());

        let Grouping { field, mut groups } = self;
        groups.retain(|key, _| chosen.contains(key));
        Self { field, groups }
    }

    /// Flatten back to a row list in original input order.
    pub fn into_rows(self) -> Vec<CanonicalRow> {
        let mut rows: Vec<CanonicalRow> = self.groups.into_values().flatten().collect();
        rows.sort_by_key(|r| r.index);
        rows
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::data::model::FieldValue;

    fn row(index: usize, country: &str) -> CanonicalRow {
        let mut fields = BTreeMap::new();
        fields.insert("country".to_string(), FieldValue::Text(country.to_string()));
        fields.insert("value".to_string(), FieldValue::Number(index as f64));
        CanonicalRow { index, fields }
    }

    fn rows(countries: &[&str]) -> Vec<CanonicalRow> {
        countries
            .iter()
            .enumerate()
            .map(|(i, c)| row(i, c))
            .collect()
    }

    #[test]
    fn groups_in_first_appearance_order() {
        let g = Grouping::by(rows(&["B", "A", "B", "C", "A"]), "country");
        assert_eq!(g.keys().collect::<Vec<_>>(), vec!["B", "A", "C"]);
        let b: Vec<usize> = g.get("B").unwrap().iter().map(|r| r.index).collect();
        assert_eq!(b, vec![0, 2]);
        assert_eq!(g.row_count(), 5);
    }

    #[test]
    fn oversized_sample_returns_everything() {
        let g = Grouping::by(rows(&["A", "B", "C", "D", "E"]), "country");
        let mut rng = StdRng::seed_from_u64(7);
        let sampled = g.clone().sample(10, &mut rng);
        assert_eq!(sampled, g);
    }

    #[test]
    fn sample_is_exact_and_a_subset() {
        let g = Grouping::by(rows(&["A", "B", "C", "D", "E", "A"]), "country");
        let mut rng = StdRng::seed_from_u64(42);
        let sampled = g.clone().sample(3, &mut rng);
        assert_eq!(sampled.len(), 3);
        for key in sampled.keys() {
            assert_eq!(sampled.get(key), g.get(key));
        }
    }

    #[test]
    fn same_seed_same_sample() {
        let g = Grouping::by(rows(&["A", "B", "C", "D", "E", "F", "G"]), "country");
        let a = g.clone().sample(4, &mut StdRng::seed_from_u64(1));
        let b = g.sample(4, &mut StdRng::seed_from_u64(1));
        assert_eq!(a, b);
    }

    #[test]
    fn into_rows_restores_input_order() {
        let g = Grouping::by(rows(&["B", "A", "B", "C", "A"]), "country");
        let order: Vec<usize> = g.into_rows().iter().map(|r| r.index).collect();
        assert_eq!(order, vec![0, 1, 2, 3, 4]);
    }
}
