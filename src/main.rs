mod analysis;
mod app;
mod color;
mod config;
mod data;
mod error;
mod report;
mod state;
mod store;
mod ui;

use app::OjeadorApp;
use eframe::egui;

fn main() -> eframe::Result {
    env_logger::init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 840.0])
            .with_min_inner_size([900.0, 600.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Ojeador - Plataforma de scouting",
        options,
        Box::new(|cc| {
            // Install image loaders so egui can render png/jpg photos.
            egui_extras::install_image_loaders(&cc.egui_ctx);
            Ok(Box::new(OjeadorApp::default()))
        }),
    )
}
