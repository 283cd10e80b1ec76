use eframe::egui::{self, Color32, RichText, Ui};
use egui_plot::{Bar, BarChart, Legend, Line, Plot, PlotPoint, PlotPoints, Points, Text};

use crate::color::series_color;
use crate::data::company::{CHARTS, ChartKind, ChartSpec, CompanyDataset};
use crate::data::format::thousands;
use crate::state::AppState;

const CHART_HEIGHT: f32 = 320.0;

// ---------------------------------------------------------------------------
// Company charts (central panel)
// ---------------------------------------------------------------------------

/// Render every financial chart for the selected company.
pub fn company_charts(ui: &mut Ui, state: &AppState) {
    if let Some(err) = &state.companies_error {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.label(RichText::new(format!("❌ {err}")).color(Color32::RED));
        });
        return;
    }
    let (Some(dataset), Some(company)) = (&state.companies, &state.selected_company) else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a file to view companies  (Archivo → Abrir empresas…)");
        });
        return;
    };

    ui.heading("Análisis de empresas que cotizan en la Bolsa de Valores");
    ui.label(RichText::new(company).strong().size(18.0));
    ui.separator();

    egui::ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for chart_def in &CHARTS {
                if !chart_def.metrics.iter().any(|m| dataset.metrics.contains(m)) {
                    continue;
                }
                ui.vertical_centered(|ui: &mut Ui| {
                    ui.label(RichText::new(chart_def.title).color(Color32::GRAY).size(16.0));
                });
                chart(ui, dataset, company, chart_def);
                ui.add_space(16.0);
            }
        });
}

fn chart(ui: &mut Ui, dataset: &CompanyDataset, company: &str, chart_def: &ChartSpec) {
    let mut plot = Plot::new(chart_def.title)
        .height(CHART_HEIGHT)
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false)
        .allow_boxed_zoom(false)
        .x_grid_spacer(egui_plot::uniform_grid_spacer(|_| [1.0, 1.0, 1.0]));

    match chart_def.kind {
        // Bars carry their value as a label, so the y axis is hidden.
        ChartKind::Bars => {
            plot = plot.show_axes([true, false]).show_grid([false, false]).include_y(0.0);
        }
        ChartKind::Lines => {
            if chart_def.metrics.len() > 1 {
                plot = plot.legend(Legend::default());
            }
        }
    }
    if let Some((lo, hi)) = chart_def.y_bounds(dataset, company) {
        plot = plot.include_y(lo).include_y(hi);
    }

    let n = chart_def.metrics.len();
    plot.show(ui, |plot_ui| {
        for (i, &metric) in chart_def.metrics.iter().enumerate() {
            let points = dataset.points(company, metric);
            let color = series_color(i, n);

            match chart_def.kind {
                ChartKind::Bars => {
                    let bars: Vec<Bar> = points
                        .iter()
                        .map(|&[x, y]| Bar::new(x, y).width(0.6).fill(color))
                        .collect();
                    for &[x, y] in &points {
                        let label = thousands(y, 2);
                        let anchor = if y >= 0.0 {
                            egui::Align2::CENTER_BOTTOM
                        } else {
                            egui::Align2::CENTER_TOP
                        };
                        plot_ui.text(
                            Text::new(PlotPoint::new(x, y), label)
                                .anchor(anchor)
                                .color(Color32::DARK_GRAY),
                        );
                    }
                    plot_ui.bar_chart(BarChart::new(bars).name(metric.column()).color(color));
                }
                ChartKind::Lines => {
                    plot_ui.line(
                        Line::new(PlotPoints::from(points.clone()))
                            .name(metric.column())
                            .color(color)
                            .width(2.0),
                    );
                    plot_ui.points(
                        Points::new(PlotPoints::from(points))
                            .name(metric.column())
                            .color(color)
                            .radius(4.0),
                    );
                }
            }
        }
    });
}
