mod app;
mod color;
mod config;
mod data;
mod state;
mod stats;
mod ui;

use app::ExplorerApp;
use config::Settings;
use eframe::egui;

fn main() -> eframe::Result {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let settings = Settings::from_env();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Box Office Explorer – Genre Revenue",
        options,
        Box::new(|_cc| Ok(Box::new(ExplorerApp::new(settings)))),
    )
}
