use std::fmt;

use super::model::{CellValue, RateDataset, RateRecord};

// ---------------------------------------------------------------------------
// Selection: the "all" sentinel or one concrete value
// ---------------------------------------------------------------------------

/// A dropdown selection. `All` applies no constraint.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Selection<T> {
    All,
    Only(T),
}

impl<T> Default for Selection<T> {
    fn default() -> Self {
        Selection::All
    }
}

impl<T> Selection<T> {
    pub fn is_all(&self) -> bool {
        matches!(self, Selection::All)
    }
}

impl<T: fmt::Display> fmt::Display for Selection<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selection::All => write!(f, "Todos"),
            Selection::Only(v) => write!(f, "{v}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Filter criteria
// ---------------------------------------------------------------------------

/// User-selected predicates. Each one is applied independently and the
/// results are combined conjunctively.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FilterCriteria {
    /// Case-insensitive substring on the entity name, matched as typed;
    /// empty means no filter.
    pub search: String,
    pub rating: Selection<String>,
    pub term: Selection<CellValue>,
}

impl FilterCriteria {
    /// Whether no predicate is active.
    pub fn is_empty(&self) -> bool {
        self.search.is_empty() && self.rating.is_all() && self.term.is_all()
    }

    /// Whether `record` satisfies every active predicate.
    ///
    /// * search: rows without an entity name never match a non-empty search
    /// * rating / term: exact equality; rows with a missing value never match
    pub fn matches(&self, record: &RateRecord) -> bool {
        let needle = self.search.to_lowercase();
        if !needle.is_empty() {
            match &record.entity {
                Some(name) if name.to_lowercase().contains(&needle) => {}
                _ => return false,
            }
        }
        if let Selection::Only(rating) = &self.rating {
            if record.rating.as_ref() != Some(rating) {
                return false;
            }
        }
        if let Selection::Only(term) = &self.term {
            if record.term.is_null() || &record.term != term {
                return false;
            }
        }
        true
    }
}

// ---------------------------------------------------------------------------
// Row selection
// ---------------------------------------------------------------------------

/// Indices of rows whose period equals `period`.
///
/// A table without a period column is taken as a single-period snapshot and
/// every row is kept.
pub fn period_indices(dataset: &RateDataset, period: &str) -> Vec<usize> {
    if !dataset.columns.period {
        return (0..dataset.len()).collect();
    }
    dataset
        .records
        .iter()
        .enumerate()
        .filter(|(_, r)| r.period.as_deref() == Some(period))
        .map(|(i, _)| i)
        .collect()
}

/// Narrow `indices` to the rows passing `criteria`, preserving order.
///
/// Predicates on columns the dataset does not have are skipped.
pub fn filtered_indices(
    dataset: &RateDataset,
    indices: &[usize],
    criteria: &FilterCriteria,
) -> Vec<usize> {
    let cols = dataset.columns;
    let effective = FilterCriteria {
        search: if cols.entity { criteria.search.clone() } else { String::new() },
        rating: if cols.rating { criteria.rating.clone() } else { Selection::All },
        term: if cols.term { criteria.term.clone() } else { Selection::All },
    };

    indices
        .iter()
        .copied()
        .filter(|&i| effective.matches(&dataset.records[i]))
        .collect()
}
