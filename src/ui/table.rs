use eframe::egui::{self, Color32, RichText, Ui};
use egui_extras::{Column, TableBuilder};

use crate::color::{KPI_FILL, rating_color};
use crate::data::display::{DisplayColumn, DisplayRow};
use crate::state::AppState;

const ROW_HEIGHT: f32 = 22.0;

// ---------------------------------------------------------------------------
// Offers table (wide windows)
// ---------------------------------------------------------------------------

/// Sortable table of the filtered offers. Clicking a header re-sorts.
pub fn offers_table(ui: &mut Ui, state: &mut AppState) {
    let Some(view) = state.rate_view() else {
        return;
    };
    let columns = view.columns.clone();
    let sort = state.sort;
    let mut clicked: Option<DisplayColumn> = None;

    let mut table = TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
        .min_scrolled_height(0.0)
        .max_scroll_height(400.0);
    for (i, col) in columns.iter().enumerate() {
        table = if i + 1 == columns.len() {
            table.column(Column::remainder())
        } else if *col == DisplayColumn::Entity {
            table.column(Column::initial(280.0).at_least(120.0).clip(true))
        } else {
            table.column(Column::initial(110.0).at_least(60.0))
        };
    }

    table
        .header(ROW_HEIGHT + 4.0, |mut header| {
            for &col in &columns {
                header.col(|ui: &mut Ui| {
                    let arrow = match (sort.column == col, sort.descending) {
                        (true, true) => " ⏷",
                        (true, false) => " ⏶",
                        (false, _) => "",
                    };
                    let text = RichText::new(format!("{}{arrow}", col.label())).strong();
                    if ui.add(egui::Button::new(text).frame(false)).clicked() {
                        clicked = Some(col);
                    }
                });
            }
        })
        .body(|body| {
            body.rows(ROW_HEIGHT, view.display.len(), |mut row| {
                let r = &view.display[row.index()];
                for &col in &columns {
                    row.col(|ui: &mut Ui| {
                        cell(ui, r, col);
                    });
                }
            });
        });

    if let Some(col) = clicked {
        state.toggle_sort(col);
    }
}

fn cell(ui: &mut Ui, row: &DisplayRow, col: DisplayColumn) {
    let text = row.cell(col).unwrap_or_default();
    match col {
        DisplayColumn::Rating if !text.is_empty() => {
            ui.label(RichText::new(text).color(rating_color(row.rating.as_deref().unwrap_or(""))));
        }
        DisplayColumn::Rate => {
            ui.label(RichText::new(text).strong());
        }
        _ => {
            ui.label(text);
        }
    }
}

// ---------------------------------------------------------------------------
// Offer cards (narrow windows)
// ---------------------------------------------------------------------------

/// One card per offer, for windows too narrow for the table.
pub fn offer_cards(ui: &mut Ui, rows: &[DisplayRow], columns: &[DisplayColumn]) {
    egui::ScrollArea::vertical()
        .id_salt("offer_cards")
        .auto_shrink([false, true])
        .show_rows(ui, 4.0 * ROW_HEIGHT + 24.0, rows.len(), |ui: &mut Ui, range| {
            for r in &rows[range] {
                egui::Frame::group(ui.style())
                    .corner_radius(10.0)
                    .inner_margin(10.0)
                    .show(ui, |ui: &mut Ui| {
                        ui.set_width(ui.available_width());
                        let title = r.entity.clone().unwrap_or_else(|| "N/A".to_string());
                        ui.label(RichText::new(title).strong().size(16.0).color(KPI_FILL));
                        for &col in columns.iter().filter(|c| **c != DisplayColumn::Entity) {
                            ui.horizontal(|ui: &mut Ui| {
                                ui.label(RichText::new(format!("{}:", col.label())).strong());
                                ui.with_layout(
                                    egui::Layout::right_to_left(egui::Align::Center),
                                    |ui: &mut Ui| {
                                        let value = r.cell(col).unwrap_or_else(|| "N/A".to_string());
                                        let mut text = RichText::new(value);
                                        if col == DisplayColumn::Rate {
                                            text = text.strong().color(KPI_FILL);
                                        }
                                        ui.label(text);
                                    },
                                );
                            });
                        }
                    });
            }
        });
}

/// Message shown in place of the table when nothing matches.
pub fn no_matches(ui: &mut Ui) {
    ui.label(
        RichText::new("ℹ No hay ofertas que coincidan con los filtros seleccionados.")
            .color(Color32::GRAY),
    );
}
