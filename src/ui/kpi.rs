use eframe::egui::{self, Color32, RichText, Ui};

use crate::color::KPI_FILL;
use crate::data::format::{count_kpi, rate_kpi};
use crate::data::summary::Summary;

const CARD_MIN_WIDTH: f32 = 200.0;

/// The four summary cards above the offers table.
pub fn kpi_cards(ui: &mut Ui, summary: &Summary) {
    let cards = [
        ("Tasa Pasiva Efectiva Promedio", rate_kpi(summary.mean_rate)),
        ("Tasa Pasiva Efectiva Máxima", rate_kpi(summary.max_rate)),
        ("Tasa Pasiva Efectiva Mínima", rate_kpi(summary.min_rate)),
        ("Número de Entidades Financieras", count_kpi(summary.entity_count)),
    ];

    // Two per row when four don't fit.
    let per_row = if ui.available_width() >= 4.0 * (CARD_MIN_WIDTH + 12.0) { 4 } else { 2 };
    let spacing = ui.spacing().item_spacing.x;
    let width = (ui.available_width() - spacing * (per_row - 1) as f32) / per_row as f32;

    for chunk in cards.chunks(per_row) {
        ui.horizontal(|ui: &mut Ui| {
            for (label, value) in chunk {
                card(ui, label, value, width);
            }
        });
    }
}

fn card(ui: &mut Ui, label: &str, value: &str, width: f32) {
    egui::Frame::default()
        .fill(KPI_FILL)
        .corner_radius(10.0)
        .inner_margin(12.0)
        .show(ui, |ui: &mut Ui| {
            ui.set_width((width - 24.0).max(0.0));
            ui.vertical_centered(|ui: &mut Ui| {
                ui.label(RichText::new(label).color(Color32::WHITE).small());
                ui.label(
                    RichText::new(value)
                        .color(Color32::WHITE)
                        .size(26.0)
                        .strong(),
                );
            });
        });
}
