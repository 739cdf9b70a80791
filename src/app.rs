use eframe::egui;

use crate::state::{Action, AppState, Tab};
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

    fn apply_actions(&mut self, actions: Vec<Action>) {
        for action in actions {
            if let Some(req) = self.state.apply(action) {
                panels::export_with_dialog(&mut self.state, req);
            }
        }
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Nothing else renders until the data is there.
        if let Some(err) = &self.state.load_error {
            egui::CentralPanel::default().show(ctx, |ui| {
                panels::load_error_panel(ui, err);
            });
            return;
        }

        let mut actions = Vec::new();

        // ---- Top panel: title and view switcher ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &self.state, &mut actions);
        });

        // ---- Left side panel: overview and downloads ----
        egui::SidePanel::left("overview_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &self.state, &mut actions);
            });

        // ---- Central panel: search / browse ----
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| match self.state.tab {
                    Tab::Search => panels::search_tab(ui, &self.state, &mut actions),
                    Tab::Browse => panels::browse_tab(ui, &self.state, &mut actions),
                });
        });

        self.apply_actions(actions);
    }
}
