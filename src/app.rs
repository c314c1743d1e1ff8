use eframe::egui;

use crate::state::{AppState, Page};
use crate::ui::{admin, database, panels, reports, visualize};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct OjeadorApp {
    pub state: AppState,
}

impl Default for OjeadorApp {
    fn default() -> Self {
        Self {
            state: AppState::new(),
        }
    }
}

impl eframe::App for OjeadorApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Login gate ----
        if self.state.user.is_none() {
            egui::CentralPanel::default().show(ctx, |ui| {
                panels::login_screen(ui, &mut self.state);
            });
            return;
        }

        // ---- Top panel: menu and navigation ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        match self.state.page {
            Page::Database => {
                // ---- Left side panel: active filters ----
                egui::SidePanel::left("filter_panel")
                    .default_width(230.0)
                    .resizable(true)
                    .show(ctx, |ui| {
                        database::filter_panel(ui, &mut self.state);
                    });
                egui::CentralPanel::default().show(ctx, |ui| {
                    database::table_view(ui, &mut self.state);
                });
            }
            Page::Visualize => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    visualize::visualize_panel(ui, &mut self.state);
                });
            }
            Page::Reports => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    reports::reports_panel(ui, &mut self.state);
                });
            }
            Page::Admin => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    admin::admin_panel(ui, &mut self.state);
                });
            }
        }
    }
}
