mod app;
mod color;
mod data;
mod error;
mod state;
mod ui;

use app::FirePandaApp;
use eframe::egui;
use state::AppState;

fn main() -> eframe::Result {
    env_logger::init();

    // Read once; every render pass filters this copy.
    let state = AppState::from_load(data::loader::load());

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 860.0])
            .with_min_inner_size([640.0, 420.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Fire Panda – California Fire Incidents",
        options,
        Box::new(|_cc| Ok(Box::new(FirePandaApp::new(state)))),
    )
}
