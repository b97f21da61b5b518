// src/app/detail.rs
use std::fmt::Write as _;

use eframe::egui as eg;
use itertools::Itertools;

use crate::app::omdb::Item;
use crate::app::types::WorkerEvent;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DetailTab {
    #[default]
    Info,
    Links,
    ErrorLog,
}

impl DetailTab {
    /// Tab brought forward when a worker event lands.
    pub fn focus_for(event: &WorkerEvent) -> Option<Self> {
        match event {
            WorkerEvent::Detail(_) => Some(Self::Links),
            WorkerEvent::Failed { .. } => Some(Self::ErrorLog),
            WorkerEvent::SearchPage { .. } | WorkerEvent::PosterSaved(_) => None,
        }
    }
}

enum Field {
    Text(&'static str, fn(&Item) -> &str),
    Ratings,
}

// Display order of the info tab.
const FIELDS: &[Field] = &[
    Field::Text("Title", |i| i.title.as_str()),
    Field::Text("Year", |i| i.year.as_str()),
    Field::Text("Rated", |i| i.rated.as_str()),
    Field::Text("Released", |i| i.released.as_str()),
    Field::Text("Runtime", |i| i.runtime.as_str()),
    Field::Text("Genre", |i| i.genre.as_str()),
    Field::Text("Director", |i| i.director.as_str()),
    Field::Text("Writer", |i| i.writer.as_str()),
    Field::Text("Actors", |i| i.actors.as_str()),
    Field::Text("Plot", |i| i.plot.as_str()),
    Field::Text("Language", |i| i.language.as_str()),
    Field::Text("Country", |i| i.country.as_str()),
    Field::Text("Awards", |i| i.awards.as_str()),
    Field::Ratings,
    Field::Text("Metascore", |i| i.metascore.as_str()),
    Field::Text("IMDb rating", |i| i.imdb_rating.as_str()),
    Field::Text("IMDb votes", |i| i.imdb_votes.as_str()),
    Field::Text("IMDb ID", |i| i.imdb_id.as_str()),
    Field::Text("Type", |i| i.kind.as_str()),
    Field::Text("Total seasons", |i| i.total_seasons.as_str()),
    Field::Text("DVD", |i| i.dvd.as_str()),
    Field::Text("Box office", |i| i.box_office.as_str()),
    Field::Text("Production", |i| i.production.as_str()),
    Field::Text("Website", |i| i.website.as_str()),
    Field::Text("Poster", |i| i.poster.as_str()),
];

/// Info text: one `Label: value` paragraph per non-empty field.
pub fn render_info(item: &Item) -> String {
    let mut out = String::new();
    for field in FIELDS {
        match field {
            Field::Text(label, get) => {
                let value = get(item).trim();
                if !value.is_empty() {
                    let _ = write!(out, "{label}: {value}\n\n");
                }
            }
            Field::Ratings if !item.ratings.is_empty() => {
                out.push_str("Ratings\n");
                for r in &item.ratings {
                    let _ = writeln!(out, "{}: {}", r.source, r.value);
                }
                out.push('\n');
            }
            Field::Ratings => {}
        }
    }
    out
}

pub fn imdb_url(id: &str) -> String {
    format!("https://www.imdb.com/title/{}/", id.trim())
}

pub fn links(item: &Item) -> Vec<(&'static str, String)> {
    let mut out = Vec::new();
    if !item.imdb_id.trim().is_empty() {
        out.push(("IMDB", imdb_url(&item.imdb_id)));
    }
    if item.poster.starts_with("http://") || item.poster.starts_with("https://") {
        out.push(("Poster", item.poster.clone()));
    }
    out
}

/// Copyable form of [`links`].
pub fn links_text(item: &Item) -> String {
    links(item)
        .iter()
        .map(|(label, url)| format!("{label}:\n{url}"))
        .join("\n\n")
}

impl crate::app::OmdbApp {
    pub(crate) fn ui_render_detail_panel(&mut self, ctx: &eg::Context) {
        self.sync_poster_texture(ctx);

        eg::SidePanel::right("detail_panel")
            .resizable(true)
            .default_width(360.0)
            .min_width(260.0)
            .show(ctx, |ui| {
                ui.add_space(6.0);

                let avail_w = ui.available_width().clamp(120.0, 520.0);
                match &self.poster_tex {
                    Some(tex) => {
                        let [w, h] = tex.size();
                        let scale = avail_w / (w.max(1) as f32);
                        let size = eg::vec2(avail_w, h as f32 * scale);
                        ui.image((tex.id(), size));
                    }
                    None => {
                        let size = eg::vec2(avail_w, avail_w * 1.5);
                        let (rect, _resp) = ui.allocate_exact_size(size, eg::Sense::hover());
                        ui.painter().rect_filled(rect, 8.0, eg::Color32::from_gray(40));
                        let hint = if self.session.is_busy() && self.session.selected().is_some() {
                            "Poster loading…"
                        } else {
                            "No poster"
                        };
                        ui.painter().text(
                            rect.center(),
                            eg::Align2::CENTER_CENTER,
                            hint,
                            eg::FontId::proportional(14.0),
                            eg::Color32::WHITE,
                        );
                    }
                }

                ui.add_space(6.0);
                ui.horizontal(|ui| {
                    ui.selectable_value(&mut self.tab, DetailTab::Info, "Info");
                    ui.selectable_value(&mut self.tab, DetailTab::Links, "Links");
                    ui.selectable_value(&mut self.tab, DetailTab::ErrorLog, "Error log");
                });
                ui.separator();

                eg::ScrollArea::vertical()
                    .auto_shrink([false; 2])
                    .show(ui, |ui| match self.tab {
                        DetailTab::Info => match self.session.detail() {
                            Some(item) => {
                                let text = render_info(item);
                                ui.add(
                                    eg::TextEdit::multiline(&mut text.as_str())
                                        .desired_width(f32::INFINITY),
                                );
                            }
                            None => {
                                ui.label("Select a result to see its details.");
                            }
                        },
                        DetailTab::Links => match self.session.detail() {
                            Some(item) => {
                                for (label, url) in links(item) {
                                    ui.label(eg::RichText::new(format!("{label}:")).strong());
                                    ui.hyperlink_to(url.as_str(), &url);
                                    ui.add_space(6.0);
                                }
                                if ui.small_button("Copy links").clicked() {
                                    ui.ctx().copy_text(links_text(item));
                                }
                            }
                            None => {
                                ui.label("No links yet.");
                            }
                        },
                        DetailTab::ErrorLog => {
                            let text = self.session.error_text();
                            if text.is_empty() {
                                ui.label("No errors.");
                            } else {
                                ui.add(
                                    eg::TextEdit::multiline(&mut &*text)
                                        .desired_width(f32::INFINITY),
                                );
                            }
                            ui.add_space(6.0);
                            ui.label(
                                eg::RichText::new(format!(
                                    "Log file: {}",
                                    self.error_log.path().display()
                                ))
                                .weak(),
                            );
                        }
                    });
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::omdb::Rating;

    fn alien() -> Item {
        Item {
            title: "Alien".into(),
            year: "1979".into(),
            plot: "In deep space...".into(),
            ratings: vec![
                Rating {
                    source: "Internet Movie Database".into(),
                    value: "8.5/10".into(),
                },
                Rating {
                    source: "Metacritic".into(),
                    value: "89/100".into(),
                },
            ],
            metascore: "89".into(),
            imdb_id: "tt0078748".into(),
            poster: "https://img.example/alien.jpg".into(),
            response: "True".into(),
            ..Item::default()
        }
    }

    #[test]
    fn info_lists_fields_in_order_and_skips_blanks() {
        let text = render_info(&alien());
        assert!(text.starts_with("Title: Alien\n\nYear: 1979\n\nPlot: In deep space...\n\n"));
        assert!(text.contains(
            "Ratings\nInternet Movie Database: 8.5/10\nMetacritic: 89/100\n\nMetascore: 89\n\n"
        ));
        assert!(!text.contains("Director"));
        assert!(!text.contains("True"));
    }

    #[test]
    fn ratings_section_absent_without_ratings() {
        let item = Item {
            title: "Short".into(),
            ..Item::default()
        };
        assert_eq!(render_info(&item), "Title: Short\n\n");
    }

    #[test]
    fn links_cover_imdb_and_poster() {
        assert_eq!(
            links_text(&alien()),
            "IMDB:\nhttps://www.imdb.com/title/tt0078748/\n\nPoster:\nhttps://img.example/alien.jpg"
        );

        let mut no_poster = alien();
        no_poster.poster = "N/A".into();
        assert_eq!(links(&no_poster).len(), 1);
    }

    #[test]
    fn detail_and_failure_events_pick_their_tab() {
        let detail = WorkerEvent::Detail(Box::new(alien()));
        assert_eq!(DetailTab::focus_for(&detail), Some(DetailTab::Links));

        let failed = WorkerEvent::Failed {
            stage: crate::app::types::Stage::Detail,
            message: "boom".into(),
        };
        assert_eq!(DetailTab::focus_for(&failed), Some(DetailTab::ErrorLog));

        let page = WorkerEvent::SearchPage { page: 1, hits: Vec::new() };
        assert_eq!(DetailTab::focus_for(&page), None);
    }
}
