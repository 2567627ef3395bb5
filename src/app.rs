use eframe::egui;

use crate::data::pipeline::Outcome;
use crate::state::AppState;
use crate::ui::{panels, plot, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct BatterDashboardApp {
    pub state: AppState,
}

impl BatterDashboardApp {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl eframe::App for BatterDashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Bottom panel: current selection ----
        egui::TopBottomPanel::bottom("footer").show(ctx, |ui| {
            panels::footer(ui, &self.state);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Right side panel: leaderboard (only with results) ----
        if matches!(self.state.outcome, Outcome::Ready(_)) {
            egui::SidePanel::right("leaderboard")
                .default_width(440.0)
                .resizable(true)
                .show(ctx, |ui| {
                    table::leaderboard(ui, &mut self.state);
                });
        }

        // ---- Central panel: summary + plot ----
        egui::CentralPanel::default().show(ctx, |ui| {
            if panels::summary_strip(ui, &self.state) {
                ui.add_space(8.0);
                plot::scatter_plot(ui, &self.state);
            }
        });
    }
}
