// src/app/ui/dialogs.rs
use eframe::egui as eg;

use crate::app::prefs::{parse_search_pages, MAX_SEARCH_PAGES, MIN_SEARCH_PAGES};
use crate::app::session::Command;

/// Small modal windows opened from the Tools and Help menus.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Dialog {
    ApiKey(String),
    SearchPages(String),
    About,
}

enum Outcome {
    Open,
    Cancel,
    Submit,
}

impl crate::app::OmdbApp {
    pub(crate) fn ui_render_dialogs(&mut self, ctx: &eg::Context) {
        self.ui_render_warning(ctx);

        let Some(mut dialog) = self.dialog.take() else {
            return;
        };

        let outcome = match &mut dialog {
            Dialog::ApiKey(input) => prompt(
                ctx,
                "API key",
                "Enter your OMDb API key:",
                input,
            ),
            Dialog::SearchPages(input) => prompt(
                ctx,
                "Search pages",
                &format!("Pages to fetch per search ({MIN_SEARCH_PAGES}-{MAX_SEARCH_PAGES}):"),
                input,
            ),
            Dialog::About => about(ctx),
        };

        match (outcome, dialog) {
            (Outcome::Open, dialog) => self.dialog = Some(dialog),
            (Outcome::Cancel, _) | (Outcome::Submit, Dialog::About) => {}
            (Outcome::Submit, Dialog::ApiKey(key)) => {
                if key.trim().is_empty() {
                    self.warning = Some("The API key was left unchanged.".into());
                }
                self.dispatch(ctx, Command::SetApiKey(key));
            }
            (Outcome::Submit, Dialog::SearchPages(input)) => {
                if parse_search_pages(&input).is_none() {
                    self.warning = Some(format!("\"{}\" is not a whole number.", input.trim()));
                }
                self.dispatch(ctx, Command::SetSearchPages(input));
            }
        }
    }

    fn ui_render_warning(&mut self, ctx: &eg::Context) {
        let Some(msg) = self.warning.clone() else {
            return;
        };
        let mut dismiss = false;
        eg::Window::new("Warning")
            .collapsible(false)
            .resizable(false)
            .anchor(eg::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label(msg);
                ui.add_space(8.0);
                if ui.button("OK").clicked() {
                    dismiss = true;
                }
            });
        if dismiss {
            self.warning = None;
        }
    }
}

fn prompt(ctx: &eg::Context, title: &str, label: &str, input: &mut String) -> Outcome {
    let mut outcome = Outcome::Open;
    let mut open = true;
    eg::Window::new(title)
        .collapsible(false)
        .resizable(false)
        .anchor(eg::Align2::CENTER_CENTER, [0.0, 0.0])
        .open(&mut open)
        .show(ctx, |ui| {
            ui.label(label);
            let resp = ui.add(eg::TextEdit::singleline(input).desired_width(260.0));
            if resp.lost_focus() && ui.input(|i| i.key_pressed(eg::Key::Enter)) {
                outcome = Outcome::Submit;
            }
            ui.add_space(6.0);
            ui.horizontal(|ui| {
                if ui.button("OK").clicked() {
                    outcome = Outcome::Submit;
                }
                if ui.button("Cancel").clicked() {
                    outcome = Outcome::Cancel;
                }
            });
        });
    if !open {
        outcome = Outcome::Cancel;
    }
    outcome
}

fn about(ctx: &eg::Context) -> Outcome {
    let mut outcome = Outcome::Open;
    eg::Window::new("About")
        .collapsible(false)
        .resizable(false)
        .anchor(eg::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            ui.heading(format!("OMDBfetch {}", env!("CARGO_PKG_VERSION")));
            ui.label("Search the Open Movie Database and save posters.");
            ui.hyperlink_to("Source code", super::menu::SOURCE_URL);
            ui.add_space(8.0);
            if ui.button("Close").clicked() {
                outcome = Outcome::Submit;
            }
        });
    outcome
}
