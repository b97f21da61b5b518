// src/app/session.rs
//! Search session state. The front end feeds it [`Command`]s and worker
//! events; every I/O step comes back out as an [`Effect`] for the caller to run.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::app::omdb::{Item, PAGE_SIZE};
use crate::app::poster;
use crate::app::prefs::{self, Settings};
use crate::app::present;
use crate::app::store::{ResultRow, ResultStore};
use crate::app::types::{Job, SortKey, SortSpec, Stage, WorkerEvent};
use crate::error::ValidationError;

pub const STATUS_IDLE: &str = "Waiting for a search term to fetch...";
pub const STATUS_PICK: &str = "Please click a result to process";

const STATUS_TITLE_CHARS: usize = 25;

#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    Search { term: String, directory: String },
    Select { id: String },
    SetSortKey(SortKey),
    SetDescending(bool),
    SetHideIds(bool),
    SetAlwaysOnTop(bool),
    SetFullPlot(bool),
    SetApiKey(String),
    SetSearchPages(String),
    NewSearch,
    Close {
        directory: String,
        position: Option<[f32; 2]>,
        size: Option<[f32; 2]>,
    },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Effect {
    Dispatch(Job),
    SaveSettings,
    AppendErrorLog(String),
    ApplyAlwaysOnTop(bool),
}

#[derive(Clone, Debug)]
struct ActiveSearch {
    api_key: String,
    term: String,
    max_pages: u32,
}

pub struct Session {
    settings: Settings,
    store: ResultStore,
    directory: PathBuf,
    search: Option<ActiveSearch>,
    busy: bool,
    selected: Option<String>,
    detail: Option<Item>,
    image_path: Option<PathBuf>,
    status: String,
    error_text: String,
    fetched_count: u32,
    api_calls: u32,
}

fn short_title(title: &str) -> String {
    title.chars().take(STATUS_TITLE_CHARS).collect()
}

impl Session {
    pub fn new(settings: Settings) -> Self {
        let directory = PathBuf::from(&settings.directory);
        Self {
            settings,
            store: ResultStore::new(),
            directory,
            search: None,
            busy: false,
            selected: None,
            detail: None,
            image_path: None,
            status: STATUS_IDLE.to_string(),
            error_text: String::new(),
            fetched_count: 0,
            api_calls: 0,
        }
    }

    // ---- read access for the front end ----

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn rows(&self) -> &[ResultRow] {
        self.store.all()
    }

    pub fn sort_spec(&self) -> SortSpec {
        SortSpec::new(self.settings.sort_key(), self.settings.descending)
    }

    pub fn display_rows(&self) -> Vec<(&ResultRow, String)> {
        let hide_ids = self.settings.hide_ids_in_list;
        present::ordered(self.store.all(), self.sort_spec())
            .into_iter()
            .map(|row| (row, present::line(row, hide_ids)))
            .collect()
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn detail(&self) -> Option<&Item> {
        self.detail.as_ref()
    }

    pub fn image_path(&self) -> Option<&Path> {
        self.image_path.as_deref()
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn error_text(&self) -> &str {
        &self.error_text
    }

    pub fn fetched_count(&self) -> u32 {
        self.fetched_count
    }

    pub fn api_calls(&self) -> u32 {
        self.api_calls
    }

    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status = status.into();
    }

    // ---- commands ----

    pub fn handle(&mut self, cmd: Command) -> Result<Vec<Effect>, ValidationError> {
        match cmd {
            Command::Search { term, directory } => self.start_search(term, directory),
            Command::Select { id } => Ok(self.select(&id)),
            Command::SetSortKey(key) => {
                self.settings.set_sort_key(key);
                Ok(Vec::new())
            }
            Command::SetDescending(desc) => {
                self.settings.descending = desc;
                Ok(Vec::new())
            }
            Command::SetHideIds(hide) => {
                self.settings.hide_ids_in_list = hide;
                Ok(Vec::new())
            }
            Command::SetAlwaysOnTop(on) => {
                self.settings.always_on_top = on;
                Ok(vec![Effect::ApplyAlwaysOnTop(on)])
            }
            Command::SetFullPlot(full) => {
                self.settings.full_plot = full;
                Ok(Vec::new())
            }
            Command::SetApiKey(key) => {
                let key = key.trim();
                if !key.is_empty() {
                    self.settings.api_key = key.to_string();
                }
                Ok(Vec::new())
            }
            Command::SetSearchPages(input) => {
                if let Some(pages) = prefs::parse_search_pages(&input) {
                    self.settings.search_pages = pages;
                }
                Ok(Vec::new())
            }
            Command::NewSearch => {
                if !self.busy {
                    self.reset_views();
                    self.store.clear();
                    self.fetched_count = 0;
                    self.status = STATUS_IDLE.to_string();
                }
                Ok(Vec::new())
            }
            Command::Close {
                directory,
                position,
                size,
            } => {
                self.settings.directory = directory;
                self.settings.window_position = position;
                self.settings.window_size = size;
                Ok(vec![Effect::SaveSettings])
            }
        }
    }

    fn start_search(
        &mut self,
        term: String,
        directory: String,
    ) -> Result<Vec<Effect>, ValidationError> {
        if self.busy {
            return Ok(Vec::new());
        }
        let term = term.trim().to_string();
        if term.is_empty() {
            return Err(ValidationError::MissingSearchTerm);
        }
        let dir = PathBuf::from(directory.trim());
        if directory.trim().is_empty() || !dir.is_dir() {
            return Err(ValidationError::DirectoryNotFound(dir));
        }
        let api_key = self.settings.api_key.trim().to_string();
        if api_key.is_empty() {
            return Err(ValidationError::MissingApiKey);
        }

        info!("searching for \"{term}\" (up to {} pages)", self.settings.search_pages());
        self.directory = dir;
        self.reset_views();
        self.store.clear();
        self.busy = true;
        self.status = format!("Searching for: \"{term}\"...");
        self.search = Some(ActiveSearch {
            api_key: api_key.clone(),
            term: term.clone(),
            max_pages: self.settings.search_pages(),
        });

        Ok(vec![Effect::Dispatch(Job::SearchPage {
            api_key,
            term,
            page: 1,
        })])
    }

    fn select(&mut self, id: &str) -> Vec<Effect> {
        if self.busy {
            return Vec::new();
        }
        let Some(row) = self.store.find(id) else {
            return Vec::new();
        };
        let status = format!("Downloading info for: \"{}\"...", short_title(&row.title));

        self.reset_views();
        self.selected = Some(id.to_string());
        self.busy = true;
        self.status = status;

        vec![Effect::Dispatch(Job::Detail {
            api_key: self.settings.api_key.trim().to_string(),
            id: id.to_string(),
            full_plot: self.settings.full_plot,
        })]
    }

    fn reset_views(&mut self) {
        self.selected = None;
        self.detail = None;
        self.image_path = None;
    }

    // ---- worker events ----

    pub fn apply(&mut self, event: WorkerEvent) -> Vec<Effect> {
        match event {
            WorkerEvent::SearchPage { page, hits } => {
                let rows = hits.iter().map(ResultRow::from_hit).collect();
                self.on_search_page(page, hits.len(), rows)
            }
            WorkerEvent::Detail(item) => self.on_detail(*item),
            WorkerEvent::PosterSaved(path) => {
                self.image_path = Some(path);
                self.status = "Info and image downloaded.".to_string();
                self.busy = false;
                Vec::new()
            }
            WorkerEvent::Failed { stage, message } => self.on_failed(stage, message),
        }
    }

    fn on_search_page(&mut self, page: u32, hit_count: usize, rows: Vec<ResultRow>) -> Vec<Effect> {
        let Some(search) = self.search.clone() else {
            debug!("dropping stray search page {page}");
            return Vec::new();
        };
        self.store.append(rows);
        self.api_calls += 1;
        self.status = format!("Fetched search page #{page}...");

        if hit_count < PAGE_SIZE || page >= search.max_pages {
            info!("search \"{}\" done: {} results", search.term, self.store.len());
            self.search = None;
            self.busy = false;
            self.fetched_count += 1;
            self.status = STATUS_PICK.to_string();
            return Vec::new();
        }

        vec![Effect::Dispatch(Job::SearchPage {
            api_key: search.api_key,
            term: search.term,
            page: page + 1,
        })]
    }

    fn on_detail(&mut self, item: Item) -> Vec<Effect> {
        self.api_calls += 1;
        let row = self
            .selected
            .as_deref()
            .and_then(|id| self.store.find(id))
            .cloned();
        let Some(row) = row else {
            self.detail = Some(item);
            self.busy = false;
            self.status = "Info downloaded.".to_string();
            return Vec::new();
        };

        let url = if row.has_poster() {
            row.image_url.clone()
        } else {
            item.poster.clone()
        };
        self.detail = Some(item);

        if !(url.starts_with("http://") || url.starts_with("https://")) {
            self.busy = false;
            self.status = "Info downloaded; no poster available.".to_string();
            return Vec::new();
        }

        self.status = format!("Downloading image for: \"{}\"...", short_title(&row.title));
        let dest = self.directory.join(poster::file_name_for(&row, &url));
        vec![Effect::Dispatch(Job::Poster { url, dest })]
    }

    fn on_failed(&mut self, stage: Stage, message: String) -> Vec<Effect> {
        let (heading, status) = match stage {
            Stage::Search => (
                "Search exception message:",
                "Exception while searching. Please retry.",
            ),
            Stage::Detail | Stage::Poster => (
                "Info + image exception message:",
                "Exception while fetching info + image. Please retry.",
            ),
        };
        if stage == Stage::Detail {
            self.api_calls += 1;
        }
        if stage == Stage::Search {
            self.search = None;
        }
        self.busy = false;
        self.error_text = format!("{heading}\n{message}");
        self.status = status.to_string();
        vec![Effect::AppendErrorLog(self.error_text.clone())]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::omdb::SearchHit;
    use tempfile::tempdir;

    fn hit(n: usize) -> SearchHit {
        SearchHit {
            title: format!("Title {n}"),
            year: "2001".into(),
            imdb_id: format!("tt{n:07}"),
            kind: "movie".into(),
            poster: format!("https://img.example/{n}.jpg"),
        }
    }

    fn page(range: std::ops::Range<usize>) -> Vec<SearchHit> {
        range.map(hit).collect()
    }

    fn session_with_key(pages: u32) -> Session {
        let mut settings = Settings::default();
        settings.api_key = "k".into();
        settings.search_pages = pages;
        Session::new(settings)
    }

    fn search(session: &mut Session, dir: &Path) -> Vec<Effect> {
        session
            .handle(Command::Search {
                term: "alien".into(),
                directory: dir.to_string_lossy().into_owned(),
            })
            .unwrap()
    }

    #[test]
    fn validation_runs_in_order_before_any_io() {
        let dir = tempdir().unwrap();
        let mut s = Session::new(Settings::default());

        let err = s
            .handle(Command::Search {
                term: "  ".into(),
                directory: "/definitely/not/here".into(),
            })
            .unwrap_err();
        assert_eq!(err, ValidationError::MissingSearchTerm);

        let err = s
            .handle(Command::Search {
                term: "alien".into(),
                directory: "/definitely/not/here".into(),
            })
            .unwrap_err();
        assert!(matches!(err, ValidationError::DirectoryNotFound(_)));

        let err = s
            .handle(Command::Search {
                term: "alien".into(),
                directory: dir.path().to_string_lossy().into_owned(),
            })
            .unwrap_err();
        assert_eq!(err, ValidationError::MissingApiKey);
        assert!(!s.is_busy());
    }

    #[test]
    fn paginates_until_a_short_page() {
        let dir = tempdir().unwrap();
        let mut s = session_with_key(5);

        let effects = search(&mut s, dir.path());
        assert_eq!(
            effects,
            vec![Effect::Dispatch(Job::SearchPage {
                api_key: "k".into(),
                term: "alien".into(),
                page: 1
            })]
        );
        assert!(s.is_busy());

        let next = s.apply(WorkerEvent::SearchPage { page: 1, hits: page(0..10) });
        assert!(matches!(
            next.as_slice(),
            [Effect::Dispatch(Job::SearchPage { page: 2, .. })]
        ));

        let done = s.apply(WorkerEvent::SearchPage { page: 2, hits: page(10..13) });
        assert!(done.is_empty());
        assert!(!s.is_busy());
        assert_eq!(s.rows().len(), 13);
        assert_eq!(s.api_calls(), 2);
        assert_eq!(s.fetched_count(), 1);
        assert_eq!(s.status(), STATUS_PICK);
    }

    #[test]
    fn stops_at_the_page_limit() {
        let dir = tempdir().unwrap();
        let mut s = session_with_key(1);
        search(&mut s, dir.path());

        let effects = s.apply(WorkerEvent::SearchPage { page: 1, hits: page(0..10) });
        assert!(effects.is_empty());
        assert!(!s.is_busy());
        assert_eq!(s.rows().len(), 10);
    }

    #[test]
    fn new_search_replaces_previous_rows() {
        let dir = tempdir().unwrap();
        let mut s = session_with_key(1);
        search(&mut s, dir.path());
        s.apply(WorkerEvent::SearchPage { page: 1, hits: page(0..4) });

        search(&mut s, dir.path());
        assert!(s.rows().is_empty());
        s.apply(WorkerEvent::SearchPage { page: 1, hits: page(20..22) });
        assert_eq!(s.rows().len(), 2);
        assert_eq!(s.rows()[0].id, "tt0000020");
    }

    #[test]
    fn selection_fetches_detail_then_poster() {
        let dir = tempdir().unwrap();
        let mut s = session_with_key(1);
        s.handle(Command::SetFullPlot(true)).unwrap();
        search(&mut s, dir.path());
        s.apply(WorkerEvent::SearchPage { page: 1, hits: page(0..2) });

        let effects = s.handle(Command::Select { id: "tt0000001".into() }).unwrap();
        assert_eq!(
            effects,
            vec![Effect::Dispatch(Job::Detail {
                api_key: "k".into(),
                id: "tt0000001".into(),
                full_plot: true
            })]
        );
        assert!(s.status().starts_with("Downloading info for: \"Title 1\""));

        // Busy: a second click is ignored.
        assert!(s.handle(Command::Select { id: "tt0000000".into() }).unwrap().is_empty());

        let item = Item {
            title: "Title 1".into(),
            imdb_id: "tt0000001".into(),
            response: "True".into(),
            ..Item::default()
        };
        let effects = s.apply(WorkerEvent::Detail(Box::new(item)));
        let expected_dest = dir.path().join("Title 1 2001 (movie).jpg");
        assert_eq!(
            effects,
            vec![Effect::Dispatch(Job::Poster {
                url: "https://img.example/1.jpg".into(),
                dest: expected_dest.clone()
            })]
        );
        assert_eq!(s.detail().map(|i| i.title.as_str()), Some("Title 1"));

        s.apply(WorkerEvent::PosterSaved(expected_dest.clone()));
        assert_eq!(s.image_path(), Some(expected_dest.as_path()));
        assert!(!s.is_busy());
        assert_eq!(s.api_calls(), 2);
    }

    #[test]
    fn detail_without_poster_finishes_without_download() {
        let dir = tempdir().unwrap();
        let mut s = session_with_key(1);
        search(&mut s, dir.path());
        let mut bare = hit(3);
        bare.poster = "N/A".into();
        s.apply(WorkerEvent::SearchPage { page: 1, hits: vec![bare] });

        s.handle(Command::Select { id: "tt0000003".into() }).unwrap();
        let effects = s.apply(WorkerEvent::Detail(Box::new(Item {
            title: "Title 3".into(),
            poster: "N/A".into(),
            ..Item::default()
        })));
        assert!(effects.is_empty());
        assert!(!s.is_busy());
        assert!(s.image_path().is_none());
    }

    #[test]
    fn failures_are_logged_and_release_the_session() {
        let dir = tempdir().unwrap();
        let mut s = session_with_key(3);
        search(&mut s, dir.path());
        s.apply(WorkerEvent::SearchPage { page: 1, hits: page(0..10) });

        let effects = s.apply(WorkerEvent::Failed {
            stage: Stage::Search,
            message: "connection reset".into(),
        });
        assert_eq!(
            effects,
            vec![Effect::AppendErrorLog(
                "Search exception message:\nconnection reset".into()
            )]
        );
        assert!(!s.is_busy());
        assert_eq!(s.status(), "Exception while searching. Please retry.");
        assert_eq!(s.rows().len(), 10);

        // Late pages after a failure are ignored.
        assert!(s.apply(WorkerEvent::SearchPage { page: 2, hits: page(10..20) }).is_empty());
        assert_eq!(s.rows().len(), 10);
    }

    #[test]
    fn toggles_update_settings() {
        let mut s = Session::new(Settings::default());
        s.handle(Command::SetSortKey(SortKey::Title)).unwrap();
        s.handle(Command::SetDescending(true)).unwrap();
        s.handle(Command::SetHideIds(false)).unwrap();
        s.handle(Command::SetSearchPages("500".into())).unwrap();
        s.handle(Command::SetSearchPages("abc".into())).unwrap();
        s.handle(Command::SetApiKey("   ".into())).unwrap();
        let effects = s.handle(Command::SetAlwaysOnTop(true)).unwrap();

        assert_eq!(effects, vec![Effect::ApplyAlwaysOnTop(true)]);
        assert_eq!(s.sort_spec(), SortSpec::new(SortKey::Title, true));
        assert_eq!(s.settings().search_pages, 100);
        assert!(s.settings().api_key.is_empty());
        assert!(!s.settings().hide_ids_in_list);
    }

    #[test]
    fn display_rows_follow_sort_and_id_visibility() {
        let dir = tempdir().unwrap();
        let mut s = session_with_key(1);
        search(&mut s, dir.path());
        s.apply(WorkerEvent::SearchPage { page: 1, hits: page(1..4) });
        s.handle(Command::SetDescending(true)).unwrap();

        let lines: Vec<String> = s.display_rows().into_iter().map(|(_, l)| l).collect();
        assert_eq!(
            lines,
            ["Title 3 2001 (movie)", "Title 2 2001 (movie)", "Title 1 2001 (movie)"]
        );

        s.handle(Command::SetHideIds(false)).unwrap();
        let (row, line) = &s.display_rows()[0];
        assert_eq!(row.id, "tt0000003");
        assert_eq!(line, "tt0000003 Title 3 2001 (movie)");
    }

    #[test]
    fn close_captures_state_and_saves() {
        let mut s = Session::new(Settings::default());
        let effects = s
            .handle(Command::Close {
                directory: "/tmp/posters".into(),
                position: Some([10.0, 20.0]),
                size: Some([800.0, 600.0]),
            })
            .unwrap();
        assert_eq!(effects, vec![Effect::SaveSettings]);
        assert_eq!(s.settings().directory, "/tmp/posters");
        assert_eq!(s.settings().window_size, Some([800.0, 600.0]));
    }

    #[test]
    fn new_search_command_resets_counters() {
        let dir = tempdir().unwrap();
        let mut s = session_with_key(1);
        search(&mut s, dir.path());
        s.apply(WorkerEvent::SearchPage { page: 1, hits: page(0..2) });
        assert_eq!(s.fetched_count(), 1);

        s.handle(Command::NewSearch).unwrap();
        assert_eq!(s.fetched_count(), 0);
        assert!(s.rows().is_empty());
        assert_eq!(s.status(), STATUS_IDLE);
    }
}
