// src/app/ui/mod.rs
pub mod dialogs;
pub mod menu;
pub mod topbar;

use eframe::egui as eg;

use crate::app::session::Command;

impl crate::app::OmdbApp {
    // ---------- RESULT LIST ----------
    pub(crate) fn ui_render_results(&mut self, ui: &mut eg::Ui) {
        if self.session.rows().is_empty() {
            ui.add_space(12.0);
            ui.vertical_centered(|ui| {
                if self.session.is_busy() {
                    ui.add(eg::Spinner::new().size(16.0));
                } else {
                    ui.label(eg::RichText::new("No results").weak());
                }
            });
            return;
        }

        let busy = self.session.is_busy();
        let selected = self.session.selected().map(str::to_owned);
        let mut clicked: Option<String> = None;

        eg::ScrollArea::vertical()
            .auto_shrink([false; 2])
            .show(ui, |ui| {
                ui.add_enabled_ui(!busy, |ui| {
                    for (row, line) in self.session.display_rows() {
                        let is_sel = selected.as_deref() == Some(row.id.as_str());
                        if ui.selectable_label(is_sel, line).clicked() {
                            clicked = Some(row.id.clone());
                        }
                    }
                });
            });

        if let Some(id) = clicked {
            self.dispatch(ui.ctx(), Command::Select { id });
        }
    }

    // ---------- STATUS BAR ----------
    pub(crate) fn ui_render_status_bar(&mut self, ctx: &eg::Context) {
        eg::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if self.session.is_busy() {
                    ui.add(eg::Spinner::new().size(12.0));
                }
                ui.label(self.session.status());
                ui.with_layout(eg::Layout::right_to_left(eg::Align::Center), |ui| {
                    ui.monospace(format!("API calls: {}", self.session.api_calls()));
                    ui.separator();
                    ui.monospace(format!("Fetched: {}", self.session.fetched_count()));
                });
            });
        });
    }
}
