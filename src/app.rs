use eframe::egui;

use crate::config::Settings;
use crate::state::{AppState, View};
use crate::ui::{editor, panels, plot, report};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct ExplorerApp {
    pub state: AppState,
}

impl ExplorerApp {
    pub fn new(settings: Settings) -> Self {
        Self {
            state: AppState::new(settings),
        }
    }
}

impl eframe::App for ExplorerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar, view switch, status ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: genre / year selection ----
        if self.state.view == View::Chart {
            egui::SidePanel::left("filter_panel")
                .default_width(220.0)
                .resizable(true)
                .show(ctx, |ui| {
                    panels::side_panel(ui, &mut self.state);
                });
        }

        // ---- Central panel: one view per user action ----
        egui::CentralPanel::default().show(ctx, |ui| match self.state.view {
            View::Chart => plot::revenue_plot(ui, &self.state),
            View::Describe => report::data_info(ui, &self.state),
            View::Edit => editor::edit_data(ui, &mut self.state),
        });
    }
}
