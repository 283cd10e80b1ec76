use eframe::egui::{self, Color32, RichText, Ui};

use crate::cli::Cli;
use crate::data::error::PipelineError;
use crate::state::{AppState, View};
use crate::ui::{kpi, panels, plot, table};

/// Below this width the filters move into the central panel and offers are
/// shown as cards.
const NARROW_WIDTH: f32 = 768.0;

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct EcuanomiaApp {
    pub state: AppState,
}

impl EcuanomiaApp {
    pub fn new(cli: &Cli) -> Self {
        Self {
            state: AppState::from_cli(cli),
        }
    }
}

impl eframe::App for EcuanomiaApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let narrow = ctx.screen_rect().width() < NARROW_WIDTH;

        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: filters ----
        if !narrow {
            egui::SidePanel::left("filter_panel")
                .default_width(260.0)
                .resizable(true)
                .show(ctx, |ui| {
                    panels::side_panel(ui, &mut self.state);
                });
        }

        // ---- Central panel: dashboard ----
        egui::CentralPanel::default().show(ctx, |ui| match self.state.view {
            View::Rates => rates_dashboard(ui, &mut self.state, narrow),
            View::Companies => {
                if narrow {
                    panels::side_panel(ui, &mut self.state);
                    ui.separator();
                }
                plot::company_charts(ui, &self.state);
            }
        });
    }
}

fn rates_dashboard(ui: &mut Ui, state: &mut AppState, narrow: bool) {
    ui.vertical_centered(|ui: &mut Ui| {
        ui.heading("📊 Tasas pasivas de todas las entidades financieras");
    });
    ui.add_space(12.0);

    if let Some(err) = &state.rates_error {
        ui.label(RichText::new(format!("❌ {err}")).color(Color32::RED));
        return;
    }

    match &state.view_result {
        None => {
            ui.centered_and_justified(|ui: &mut Ui| {
                ui.heading("Open a file to view rates  (Archivo → Abrir tasas…)");
            });
            return;
        }
        Some(Err(PipelineError::NoDataForPeriod { period, available })) => {
            ui.label(
                RichText::new(format!("⚠ No data found for month '{period}'"))
                    .color(Color32::from_rgb(200, 140, 0)),
            );
            let months = if available.is_empty() {
                "N/A".to_string()
            } else {
                available.join(", ")
            };
            ui.label(format!("Meses disponibles: {months}"));
            return;
        }
        Some(Ok(_)) => {}
    }

    if let Some(view) = state.rate_view() {
        match &view.summary {
            Some(summary) => kpi::kpi_cards(ui, summary),
            None => table::no_matches(ui),
        }
    }
    ui.add_space(16.0);

    if narrow {
        egui::CollapsingHeader::new(RichText::new("🔍 Filtros").strong())
            .id_salt("narrow_filters")
            .default_open(false)
            .show(ui, |ui: &mut Ui| {
                panels::rate_filters(ui, state);
            });
        ui.add_space(8.0);
    }

    ui.heading("📋 Todas las ofertas");
    if let Some(rates) = &state.rates {
        let missing = rates.columns.missing();
        if !missing.is_empty() {
            ui.label(
                RichText::new(format!("⚠ Missing columns: {}", missing.join(", ")))
                    .color(Color32::from_rgb(200, 140, 0)),
            );
        }
    }
    ui.add_space(8.0);

    let Some(view) = state.rate_view() else {
        return;
    };
    if view.is_empty() {
        return;
    }
    if narrow {
        table::offer_cards(ui, &view.display, &view.columns);
    } else {
        table::offers_table(ui, state);
    }
}
