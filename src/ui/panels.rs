use eframe::egui::{self, Color32, RichText, Ui};

use crate::data::display::export_csv;
use crate::data::filter::FilterCriteria;
use crate::state::{AppState, View};

// ---------------------------------------------------------------------------
// Filter widgets (side panel on wide windows, collapsible block on narrow)
// ---------------------------------------------------------------------------

/// Render the left panel for the current view.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    match state.view {
        View::Rates => {
            ui.heading("🔍 Filtros");
            ui.separator();
            rate_filters(ui, state);
        }
        View::Companies => {
            ui.heading("🏢 Empresa");
            ui.separator();
            company_selector(ui, state);
        }
    }
}

/// Search box, rating and term dropdowns, reset button and row count.
pub fn rate_filters(ui: &mut Ui, state: &mut AppState) {
    if state.rates.is_none() {
        ui.label("No dataset loaded.");
        return;
    }

    let mut criteria: FilterCriteria = state.criteria.clone();

    ui.strong("Buscar por Razón Social");
    ui.add(
        egui::TextEdit::singleline(&mut criteria.search)
            .hint_text("Ingrese texto para buscar...")
            .desired_width(f32::INFINITY),
    );
    ui.add_space(8.0);

    if !state.options.ratings.is_empty() {
        ui.strong("Filtrar por Calificación");
        egui::ComboBox::from_id_salt(ui.id().with("rating"))
            .selected_text(criteria.rating.to_string())
            .width(ui.available_width())
            .show_ui(ui, |ui: &mut Ui| {
                for option in &state.options.ratings {
                    ui.selectable_value(&mut criteria.rating, option.clone(), option.to_string());
                }
            });
        ui.add_space(8.0);
    }

    if !state.options.terms.is_empty() {
        ui.strong("Filtrar por Plazo");
        egui::ComboBox::from_id_salt(ui.id().with("term"))
            .selected_text(criteria.term.to_string())
            .width(ui.available_width())
            .show_ui(ui, |ui: &mut Ui| {
                for option in &state.options.terms {
                    ui.selectable_value(&mut criteria.term, option.clone(), option.to_string());
                }
            });
        ui.add_space(8.0);
    }

    if ui
        .add_enabled(!criteria.is_empty(), egui::Button::new("Limpiar filtros"))
        .clicked()
    {
        criteria = FilterCriteria::default();
    }

    state.set_criteria(criteria);

    ui.add_space(12.0);
    if let Some(view) = state.rate_view() {
        ui.label(format!(
            "📊 Mostrando {} de {} registros",
            view.rows.len(),
            view.period_rows
        ));
    }
}

fn company_selector(ui: &mut Ui, state: &mut AppState) {
    let Some(dataset) = &state.companies else {
        ui.label("No dataset loaded.");
        return;
    };

    ui.strong("Selecciona una empresa");
    let current = state.selected_company.clone().unwrap_or_default();
    let mut picked: Option<String> = None;
    egui::ComboBox::from_id_salt("company")
        .selected_text(&current)
        .width(ui.available_width())
        .show_ui(ui, |ui: &mut Ui| {
            for name in dataset.companies() {
                if ui.selectable_label(current == name, name).clicked() {
                    picked = Some(name.to_string());
                }
            }
        });

    if let Some(name) = picked {
        log::debug!("company selected: {name}");
        state.selected_company = Some(name);
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("Archivo", |ui: &mut Ui| {
            if ui.button("Abrir tasas…").clicked() {
                open_rates_dialog(state);
                ui.close_menu();
            }
            if ui.button("Abrir empresas…").clicked() {
                open_companies_dialog(state);
                ui.close_menu();
            }
            ui.separator();
            let can_export = state.rate_view().is_some_and(|v| !v.is_empty());
            if ui
                .add_enabled(can_export, egui::Button::new("Exportar ofertas (CSV)…"))
                .clicked()
            {
                export_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        ui.selectable_value(&mut state.view, View::Rates, "📊 Tasas pasivas");
        ui.selectable_value(&mut state.view, View::Companies, "🏢 Empresas");

        ui.separator();

        if state.view == View::Rates {
            if let Some(view) = state.rate_view() {
                ui.label(format!("Mes {}: {} registros", view.period, view.period_rows));
            }
        }

        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_rates_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Abrir tasas pasivas")
        .add_filter("Supported files", &["csv", "tsv", "txt", "json"])
        .add_filter("CSV", &["csv", "txt"])
        .add_filter("TSV", &["tsv"])
        .add_filter("JSON", &["json"])
        .pick_file();

    if let Some(path) = file {
        state.open_rates(&path);
        state.view = View::Rates;
    }
}

pub fn open_companies_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Abrir estados financieros")
        .add_filter("CSV", &["csv", "txt"])
        .pick_file();

    if let Some(path) = file {
        state.open_companies(&path);
        state.view = View::Companies;
    }
}

fn export_dialog(state: &mut AppState) {
    let Some(view) = state.rate_view() else {
        return;
    };
    let file = rfd::FileDialog::new()
        .set_title("Exportar ofertas")
        .set_file_name(format!("ofertas_{}.csv", view.period))
        .add_filter("CSV", &["csv"])
        .save_file();

    if let Some(path) = file {
        match export_csv(&path, &view.columns, &view.display) {
            Ok(()) => {
                log::info!("Exported {} rows to {}", view.display.len(), path.display());
                state.status_message = None;
            }
            Err(e) => {
                log::error!("Export failed: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}
