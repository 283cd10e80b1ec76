use clap::Parser;
use eframe::egui;

use ecuanomia::app::EcuanomiaApp;
use ecuanomia::cli::Cli;

fn main() -> eframe::Result {
    env_logger::init();
    let cli = Cli::parse();
    log::debug!("{cli:?}");

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([360.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Ecuanomia – Tasas pasivas",
        options,
        Box::new(move |_cc| Ok(Box::new(EcuanomiaApp::new(&cli)))),
    )
}
