use eframe::egui;

use crate::state::AppState;
use crate::ui::{panels, plot};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct EdaApp {
    pub state: AppState,
}

impl EdaApp {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl eframe::App for EdaApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: file and shape ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &self.state);
        });

        // ---- Left side panel: columns and bounds ----
        egui::SidePanel::left("summary_panel")
            .default_width(260.0)
            .resizable(false)
            .show(ctx, |ui| {
                panels::side_panel(ui, &self.state);
            });

        // ---- Central panel: boxplot grid ----
        egui::CentralPanel::default().show(ctx, |ui| {
            plot::figure_grid(ui, &self.state);
        });
    }
}
