mod app;
mod state;
mod ui;

use std::sync::Arc;

use anyhow::anyhow;
use app::DashboardApp;
use eframe::egui;
use state::AppState;
use stream_dash::config::Settings;
use stream_dash::data::load_file;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let settings = Settings::from_args();
    log::info!("Loading dataset from {}", settings.data_path.display());

    // A dataset that cannot be loaded is fatal: no window is opened.
    let table = load_file(&settings.data_path, &settings.roles).inspect_err(|e| {
        log::error!("{e}");
    })?;
    let state = AppState::new(Arc::new(table))?;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1100.0, 900.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Spotify Data Analysis Dashboard",
        options,
        Box::new(|_cc| Ok(Box::new(DashboardApp::new(state)))),
    )
    .map_err(|e| anyhow!("UI error: {e}"))
}
