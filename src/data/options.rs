use std::collections::BTreeSet;

use super::filter::{Selection, period_indices};
use super::model::{CellValue, RateDataset};

/// Rating grades from best to worst. Only used to order the rating
/// dropdown; filtering compares ratings by plain equality.
pub const RATING_ORDER: [&str; 17] = [
    "AAA", "AAA-", "AA+", "AA", "AA-", //
    "A+", "A", "A-", //
    "BBB+", "BBB", "BBB-", //
    "BB+", "BB", "BB-", //
    "B+", "B", "B-",
];

/// Entries for the rating and term dropdowns, each starting with
/// [`Selection::All`]. A list is empty when the dataset lacks the column.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FilterOptions {
    pub ratings: Vec<Selection<String>>,
    pub terms: Vec<Selection<CellValue>>,
}

/// Build dropdown options from the rows at `indices` (the period-filtered
/// table). Options do not depend on the current criteria.
pub fn build_options(dataset: &RateDataset, indices: &[usize]) -> FilterOptions {
    let rows = || indices.iter().map(|&i| &dataset.records[i]);

    let ratings = if dataset.columns.rating {
        let seen = first_seen(rows().filter_map(|r| r.rating.as_deref()));
        std::iter::once(Selection::All)
            .chain(order_ratings(&seen).into_iter().map(Selection::Only))
            .collect()
    } else {
        Vec::new()
    };

    let terms = if dataset.columns.term {
        let distinct: BTreeSet<&CellValue> =
            rows().map(|r| &r.term).filter(|t| !t.is_null()).collect();
        std::iter::once(Selection::All)
            .chain(distinct.into_iter().cloned().map(Selection::Only))
            .collect()
    } else {
        Vec::new()
    };

    FilterOptions { ratings, terms }
}

/// Known grades in [`RATING_ORDER`], then the unknown ones in first-seen order.
pub fn order_ratings(seen: &[&str]) -> Vec<String> {
    let known = RATING_ORDER
        .iter()
        .filter(|grade| seen.contains(*grade))
        .map(|grade| grade.to_string());
    let unknown = seen
        .iter()
        .filter(|r| !RATING_ORDER.contains(*r))
        .map(|r| r.to_string());
    known.chain(unknown).collect()
}

/// Position of a rating on the scale, `None` for grades outside it.
pub fn rating_rank(rating: &str) -> Option<usize> {
    RATING_ORDER.iter().position(|grade| *grade == rating)
}

/// Options for the rows of one reporting period.
pub fn options_for_period(dataset: &RateDataset, period: &str) -> FilterOptions {
    build_options(dataset, &period_indices(dataset, period))
}

fn first_seen<'a>(values: impl Iterator<Item = &'a str>) -> Vec<&'a str> {
    let mut out: Vec<&str> = Vec::new();
    for v in values {
        if !out.contains(&v) {
            out.push(v);
        }
    }
    out
}
