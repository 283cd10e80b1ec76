use thiserror::Error;

/// Conditions under which the pipeline cannot produce a view at all.
///
/// Criteria that match nothing are not an error: they yield an empty
/// [`RateView`](super::pipeline::RateView) with no summary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PipelineError {
    #[error("No data found for month '{period}'")]
    NoDataForPeriod {
        period: String,
        /// Periods that do exist in the dataset.
        available: Vec<String>,
    },
}
