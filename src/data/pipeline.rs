use super::display::{DisplayColumn, DisplayRow, SortKey, project, sort_rows};
use super::error::PipelineError;
use super::filter::{FilterCriteria, filtered_indices, period_indices};
use super::model::{RateDataset, RateRecord};
use super::summary::Summary;

// ---------------------------------------------------------------------------
// RateView – the result of one pipeline run
// ---------------------------------------------------------------------------

/// Everything the dashboard shows for one (dataset, period, criteria)
/// combination.
#[derive(Debug, Clone, PartialEq)]
pub struct RateView {
    pub period: String,
    /// Number of rows in the period before criteria are applied.
    pub period_rows: usize,
    /// Dataset indices of the rows passing all filters, in file order.
    pub rows: Vec<usize>,
    /// `None` when no row passed the filters.
    pub summary: Option<Summary>,
    /// Offers table, highest rate first.
    pub display: Vec<DisplayRow>,
    /// Columns the offers table can show.
    pub columns: Vec<DisplayColumn>,
}

impl RateView {
    /// Whether the criteria matched nothing.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The filtered rows themselves.
    pub fn records<'a>(&'a self, dataset: &'a RateDataset) -> impl Iterator<Item = &'a RateRecord> {
        self.rows.iter().map(move |&i| &dataset.records[i])
    }
}

// ---------------------------------------------------------------------------
// Filter-and-aggregate pipeline
// ---------------------------------------------------------------------------

/// Restrict `dataset` to `period`, apply `criteria`, then summarise and
/// project the survivors for display.
///
/// Pure: the same inputs always give the same view. An empty period is an
/// error; criteria that match nothing give an empty view without summary.
pub fn apply(
    dataset: &RateDataset,
    period: &str,
    criteria: &FilterCriteria,
) -> Result<RateView, PipelineError> {
    let in_period = period_indices(dataset, period);
    if in_period.is_empty() {
        return Err(PipelineError::NoDataForPeriod {
            period: period.to_string(),
            available: dataset.periods(),
        });
    }

    let rows = filtered_indices(dataset, &in_period, criteria);
    let summary = (!rows.is_empty()).then(|| Summary::compute(dataset, &rows));

    let mut display = project(dataset, &rows);
    if dataset.columns.rate {
        sort_rows(&mut display, SortKey::default());
    }

    log::debug!(
        "pipeline: period {period}, {} of {} rows match {criteria:?}",
        rows.len(),
        in_period.len()
    );

    Ok(RateView {
        period: period.to_string(),
        period_rows: in_period.len(),
        rows,
        summary,
        display,
        columns: DisplayColumn::present(&dataset.columns),
    })
}
