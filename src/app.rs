use eframe::egui::{self, ScrollArea, Ui};

use crate::state::AppState;
use crate::ui::panels;

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct DashboardApp {
    pub state: AppState,
}

impl DashboardApp {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: title and dataset summary ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &self.state);
        });

        // ---- Central panel: one section per chart ----
        egui::CentralPanel::default().show(ctx, |ui| {
            ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui: &mut Ui| {
                    panels::comparison_section(ui, &mut self.state);
                    ui.separator();
                    panels::top_songs_section(ui, &mut self.state);
                    ui.separator();
                    panels::distribution_section(ui, &mut self.state);
                    ui.separator();
                    panels::heatmap_section(ui, &self.state);
                    ui.separator();
                    panels::scatter_section(ui, &mut self.state);
                });
        });
    }
}
