use std::collections::HashSet;

use super::model::RateDataset;

/// Summary statistics over a filtered set of rows.
///
/// A field is `None` when the dataset lacks the column it is computed
/// from, or when no row carries a value for it.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Summary {
    pub mean_rate: Option<f64>,
    pub max_rate: Option<f64>,
    pub min_rate: Option<f64>,
    pub entity_count: Option<usize>,
}

impl Summary {
    /// Compute over the rows at `indices`. Missing rates are skipped, and
    /// rows without a name do not count as an entity.
    pub fn compute(dataset: &RateDataset, indices: &[usize]) -> Self {
        let rows = || indices.iter().map(|&i| &dataset.records[i]);

        let (mean_rate, max_rate, min_rate) = if dataset.columns.rate {
            let rates: Vec<f64> = rows().filter_map(|r| r.rate).filter(|v| !v.is_nan()).collect();
            if rates.is_empty() {
                (None, None, None)
            } else {
                let sum: f64 = rates.iter().sum();
                (
                    Some(sum / rates.len() as f64),
                    rates.iter().copied().reduce(f64::max),
                    rates.iter().copied().reduce(f64::min),
                )
            }
        } else {
            (None, None, None)
        };

        let entity_count = dataset.columns.entity.then(|| {
            rows()
                .filter_map(|r| r.entity.as_deref())
                .collect::<HashSet<_>>()
                .len()
        });

        Summary {
            mean_rate,
            max_rate,
            min_rate,
            entity_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{CellValue, Columns, RateRecord};

    fn rec(entity: Option<&str>, rate: Option<f64>) -> RateRecord {
        RateRecord {
            period: Some("2025-09".into()),
            entity: entity.map(String::from),
            rating: None,
            term: CellValue::Null,
            rate,
        }
    }

    #[test]
    fn statistics_skip_missing_values() {
        let ds = RateDataset::new(
            vec![
                rec(Some("A"), Some(5.0)),
                rec(Some("B"), None),
                rec(None, Some(7.0)),
                rec(Some("A"), Some(3.0)),
            ],
            Columns::ALL,
        );
        let s = Summary::compute(&ds, &[0, 1, 2, 3]);
        assert_eq!(s.mean_rate, Some(5.0));
        assert_eq!(s.max_rate, Some(7.0));
        assert_eq!(s.min_rate, Some(3.0));
        assert_eq!(s.entity_count, Some(2));
    }

    #[test]
    fn no_rates_means_no_statistics() {
        let ds = RateDataset::new(vec![rec(Some("A"), None)], Columns::ALL);
        let s = Summary::compute(&ds, &[0]);
        assert_eq!(s.mean_rate, None);
        assert_eq!(s.max_rate, None);
        assert_eq!(s.entity_count, Some(1));
    }

    #[test]
    fn missing_columns_degrade_to_none() {
        let ds = RateDataset::new(
            vec![rec(Some("A"), Some(5.0))],
            Columns {
                entity: false,
                rate: false,
                ..Columns::ALL
            },
        );
        assert_eq!(Summary::compute(&ds, &[0]), Summary::default());
    }
}
