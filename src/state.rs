use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::cli::Cli;
use crate::data::company::{CompanyDataset, load_companies};
use crate::data::display::{DisplayColumn, SortKey, sort_rows};
use crate::data::error::PipelineError;
use crate::data::filter::FilterCriteria;
use crate::data::loader::load_rates;
use crate::data::model::RateDataset;
use crate::data::number::DecimalSeparator;
use crate::data::options::{FilterOptions, options_for_period};
use crate::data::pipeline::{RateView, apply};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// Which dashboard is shown in the central panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Rates,
    Companies,
}

/// The full UI state, independent of rendering.
pub struct AppState {
    pub view: View,

    /// Reporting period of the rates view.
    pub period: String,
    pub rates_decimal: DecimalSeparator,
    pub company_decimal: DecimalSeparator,

    /// Loaded rate table (None until a file loads). Shared read-only.
    pub rates: Option<Arc<RateDataset>>,
    pub rates_path: Option<PathBuf>,

    /// Dropdown entries for the loaded rate table.
    pub options: FilterOptions,

    /// Current filter selections.
    pub criteria: FilterCriteria,

    /// Offers table ordering.
    pub sort: SortKey,

    /// Most recent pipeline result (None until a rate table is loaded).
    pub view_result: Option<Result<RateView, PipelineError>>,

    /// Loaded company financials.
    pub companies: Option<CompanyDataset>,
    pub companies_path: Option<PathBuf>,
    pub selected_company: Option<String>,

    /// Load errors shown in place of the corresponding view.
    pub rates_error: Option<String>,
    pub companies_error: Option<String>,

    /// Status / error message shown in the top bar.
    pub status_message: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            view: View::default(),
            period: "2025-09".to_string(),
            rates_decimal: DecimalSeparator::Auto,
            company_decimal: DecimalSeparator::Comma,
            rates: None,
            rates_path: None,
            options: FilterOptions::default(),
            criteria: FilterCriteria::default(),
            sort: SortKey::default(),
            view_result: None,
            companies: None,
            companies_path: None,
            selected_company: None,
            rates_error: None,
            companies_error: None,
            status_message: None,
        }
    }
}

impl AppState {
    /// State configured from the command line, with both tables loaded
    /// (or their load errors recorded).
    pub fn from_cli(cli: &Cli) -> Self {
        let mut state = AppState {
            period: cli.period.clone(),
            rates_decimal: cli.decimal,
            company_decimal: cli.company_decimal,
            ..Default::default()
        };
        state.open_rates(&cli.rates);
        state.open_companies(&cli.companies);
        state
    }

    // ---- Rates ----

    /// Load a rate table from disk, replacing the current one on success.
    pub fn open_rates(&mut self, path: &Path) {
        match load_rates(path, self.rates_decimal) {
            Ok(dataset) => {
                log::info!(
                    "Loaded {} rate rows from {} (periods {:?})",
                    dataset.len(),
                    path.display(),
                    dataset.periods()
                );
                self.rates_path = Some(path.to_path_buf());
                self.set_rates(dataset);
            }
            Err(e) => {
                log::error!("Failed to load rates: {e:#}");
                self.rates_error = Some(format!("Error loading data: {e:#}"));
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }

    /// Ingest a newly loaded rate table: rebuild options, reset filters and
    /// run the pipeline once.
    pub fn set_rates(&mut self, dataset: RateDataset) {
        self.options = options_for_period(&dataset, &self.period);
        self.criteria = FilterCriteria::default();
        self.sort = SortKey::default();
        self.rates = Some(Arc::new(dataset));
        self.rates_error = None;
        self.status_message = None;
        self.recompute();

        if let Some(Ok(view)) = &self.view_result {
            log::info!("{} records for month {}", view.period_rows, self.period);
        }
    }

    /// Re-run the pipeline against the current snapshot and criteria.
    pub fn recompute(&mut self) {
        let Some(dataset) = &self.rates else {
            self.view_result = None;
            return;
        };
        let mut result = apply(dataset, &self.period, &self.criteria);
        if let Ok(view) = &mut result {
            if self.sort != SortKey::default() {
                sort_rows(&mut view.display, self.sort);
            }
        }
        if let Err(e) = &result {
            log::warn!("{e}");
        }
        self.view_result = Some(result);
    }

    /// Replace the criteria; the pipeline only runs when they changed.
    pub fn set_criteria(&mut self, criteria: FilterCriteria) {
        if criteria != self.criteria {
            self.criteria = criteria;
            self.recompute();
        }
    }

    /// Clear every filter.
    pub fn reset_filters(&mut self) {
        self.set_criteria(FilterCriteria::default());
    }

    /// Header click on the offers table.
    pub fn toggle_sort(&mut self, column: DisplayColumn) {
        self.sort = self.sort.toggled(column);
        if let Some(Ok(view)) = &mut self.view_result {
            sort_rows(&mut view.display, self.sort);
        }
    }

    /// The last pipeline view, if it succeeded.
    pub fn rate_view(&self) -> Option<&RateView> {
        self.view_result.as_ref().and_then(|r| r.as_ref().ok())
    }

    // ---- Companies ----

    pub fn open_companies(&mut self, path: &Path) {
        match load_companies(path, self.company_decimal) {
            Ok(dataset) => {
                self.companies_path = Some(path.to_path_buf());
                self.set_companies(dataset);
            }
            Err(e) => {
                log::error!("Failed to load companies: {e:#}");
                self.companies_error = Some(format!("Error loading data: {e:#}"));
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }

    /// Ingest a company table; the first company becomes the selection.
    pub fn set_companies(&mut self, dataset: CompanyDataset) {
        self.selected_company = dataset.companies().first().map(|c| c.to_string());
        self.companies = Some(dataset);
        self.companies_error = None;
        self.status_message = None;
    }
}
