// src/app/ui/menu.rs
use eframe::egui as eg;

use crate::app::session::Command;
use crate::app::ui::dialogs::Dialog;

const API_KEY_URL: &str = "http://www.omdbapi.com/apikey.aspx";
pub(crate) const SOURCE_URL: &str = "https://github.com/publicdomain/omdbfetch";

impl crate::app::OmdbApp {
    pub(crate) fn ui_render_menu(&mut self, ctx: &eg::Context) {
        eg::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            eg::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    let busy = self.session.is_busy();
                    if ui.add_enabled(!busy, eg::Button::new("New search")).clicked() {
                        self.search_input.clear();
                        self.poster_tex = None;
                        self.poster_tex_path = None;
                        self.dispatch(ctx, Command::NewSearch);
                        ui.close_menu();
                    }
                    ui.separator();
                    if ui.button("Exit").clicked() {
                        ctx.send_viewport_cmd(eg::ViewportCommand::Close);
                        ui.close_menu();
                    }
                });

                ui.menu_button("Options", |ui| {
                    let s = self.session.settings();
                    let (mut on_top, mut hide_ids, mut full_plot) =
                        (s.always_on_top, s.hide_ids_in_list, s.full_plot);

                    if ui.checkbox(&mut on_top, "Always on top").changed() {
                        self.dispatch(ctx, Command::SetAlwaysOnTop(on_top));
                    }
                    if ui.checkbox(&mut hide_ids, "Hide IDs in list").changed() {
                        self.dispatch(ctx, Command::SetHideIds(hide_ids));
                    }
                    if ui
                        .checkbox(&mut full_plot, "Full plot")
                        .on_hover_text("Fetch the long plot text when a result is opened")
                        .changed()
                    {
                        self.dispatch(ctx, Command::SetFullPlot(full_plot));
                    }
                });

                ui.menu_button("Tools", |ui| {
                    if ui.button("API key…").clicked() {
                        self.dialog = Some(Dialog::ApiKey(self.session.settings().api_key.clone()));
                        ui.close_menu();
                    }
                    if ui.button("Search pages…").clicked() {
                        let pages = self.session.settings().search_pages();
                        self.dialog = Some(Dialog::SearchPages(pages.to_string()));
                        ui.close_menu();
                    }
                    ui.separator();
                    if ui.button("Open image directory").clicked() {
                        self.open_image_directory(ctx);
                        ui.close_menu();
                    }
                });

                ui.menu_button("Help", |ui| {
                    if ui.button("Get an OMDb API key").clicked() {
                        ctx.open_url(eg::OpenUrl::new_tab(API_KEY_URL));
                        ui.close_menu();
                    }
                    if ui.button("Source code").clicked() {
                        ctx.open_url(eg::OpenUrl::new_tab(SOURCE_URL));
                        ui.close_menu();
                    }
                    ui.separator();
                    if ui.button("About").clicked() {
                        self.dialog = Some(Dialog::About);
                        ui.close_menu();
                    }
                });
            });
        });
    }

    fn open_image_directory(&mut self, ctx: &eg::Context) {
        let dir = std::path::PathBuf::from(self.directory_input.trim());
        if self.directory_input.trim().is_empty() || !dir.is_dir() {
            self.warning = Some("Target save directory must exist.".into());
            return;
        }
        match dir.canonicalize() {
            Ok(abs) => ctx.open_url(eg::OpenUrl::new_tab(format!("file://{}", abs.display()))),
            Err(e) => self.warning = Some(format!("Cannot open {}: {e}", dir.display())),
        }
    }
}
