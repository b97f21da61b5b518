// src/app/ui/topbar.rs
use eframe::egui as eg;

use crate::app::session::Command;
use crate::app::types::SortKey;

impl crate::app::OmdbApp {
    // ---------- SEARCH ROW ----------
    pub(crate) fn ui_render_search_row(&mut self, ui: &mut eg::Ui) {
        let busy = self.session.is_busy();
        let mut fetch = false;

        ui.add_enabled_ui(!busy, |ui| {
            ui.horizontal(|ui| {
                ui.label("Search:");
                let resp = ui.add(
                    eg::TextEdit::singleline(&mut self.search_input)
                        .hint_text("Title…")
                        .desired_width(220.0),
                );
                if resp.lost_focus() && ui.input(|i| i.key_pressed(eg::Key::Enter)) {
                    fetch = true;
                }
                if ui.button("Fetch").clicked() {
                    fetch = true;
                }
            });
            ui.horizontal(|ui| {
                ui.label("Save to:");
                ui.add(
                    eg::TextEdit::singleline(&mut self.directory_input)
                        .hint_text("Existing directory for posters")
                        .desired_width(f32::INFINITY),
                );
            });
        });

        if fetch {
            let cmd = Command::Search {
                term: self.search_input.clone(),
                directory: self.directory_input.clone(),
            };
            self.dispatch(ui.ctx(), cmd);
        }
    }

    // ---------- SORT ROW ----------
    pub(crate) fn ui_render_sort_row(&mut self, ui: &mut eg::Ui) {
        let spec = self.session.sort_spec();
        let mut key = spec.key;
        let mut desc = spec.descending;

        ui.horizontal(|ui| {
            ui.label("Sort:");
            for k in SortKey::ALL {
                ui.radio_value(&mut key, k, k.label());
            }
            ui.separator();
            ui.checkbox(&mut desc, "Desc");
            ui.with_layout(eg::Layout::right_to_left(eg::Align::Center), |ui| {
                ui.label(
                    eg::RichText::new(format!("{} results", self.session.rows().len())).weak(),
                );
            });
        });

        if key != spec.key {
            self.dispatch(ui.ctx(), Command::SetSortKey(key));
        }
        if desc != spec.descending {
            self.dispatch(ui.ctx(), Command::SetDescending(desc));
        }
    }
}
