// src/app/mod.rs: OMDb search window, session state plus one network worker

// ---- Standard lib imports ----
use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, Sender};

// ---- Crates ----
use eframe::egui::{self as eg, TextureHandle};
use tracing::{debug, error, info, warn};

// ---- Local modules ----
pub mod detail;
pub mod errlog;
pub mod gfx;
pub mod omdb;
pub mod poster;
pub mod prefs;
pub mod present;
pub mod session;
pub mod store;
pub mod types;
pub mod ui;
pub mod worker;

use crate::app::detail::DetailTab;
use crate::app::errlog::ErrorLog;
use crate::app::prefs::LoadedSettings;
use crate::app::session::{Command, Effect, Session};
use crate::app::types::{Job, WorkerEvent};
use crate::app::ui::dialogs::Dialog;
use crate::config::AppConfig;

// ---- Tunables ----
const MAX_EVENTS_PER_FRAME: usize = 16;

pub struct OmdbApp {
    session: Session,
    settings_path: PathBuf,
    error_log: ErrorLog,

    // Worker channels
    job_tx: Sender<Job>,
    event_rx: Receiver<WorkerEvent>,

    // UI state
    search_input: String,
    directory_input: String,
    tab: DetailTab,
    poster_tex: Option<TextureHandle>,
    poster_tex_path: Option<PathBuf>,
    dialog: Option<Dialog>,
    warning: Option<String>,

    /// Set after a failed save on close; the next close request goes through.
    close_anyway: bool,
}

impl OmdbApp {
    pub fn new(ctx: &eg::Context, config: &AppConfig, loaded: LoadedSettings) -> Self {
        let LoadedSettings {
            mut settings,
            first_run,
        } = loaded;

        if settings.api_key.trim().is_empty() {
            if let Some(key) = config.omdb_api_key.as_deref() {
                info!("Using API key from config/environment");
                settings.api_key = key.trim().to_string();
            }
        }

        let (job_tx, event_rx) = worker::spawn_worker(config.api_base_url.clone(), ctx.clone());

        let directory_input = settings.directory.clone();
        let warning = (first_run && settings.api_key.trim().is_empty()).then(|| {
            "Welcome! Set your OMDb API key under Tools → API key… before searching.".to_string()
        });

        Self {
            session: Session::new(settings),
            settings_path: config.settings_path.clone(),
            error_log: ErrorLog::new(config.error_log_path.clone()),
            job_tx,
            event_rx,
            search_input: String::new(),
            directory_input,
            tab: DetailTab::default(),
            poster_tex: None,
            poster_tex_path: None,
            dialog: None,
            warning,
            close_anyway: false,
        }
    }

    /// Run a command through the session. Validation failures become a warning.
    pub(crate) fn dispatch(&mut self, ctx: &eg::Context, cmd: Command) {
        debug!("command: {cmd:?}");
        match self.session.handle(cmd) {
            Ok(effects) => {
                self.run_effects(ctx, effects);
            }
            Err(e) => {
                info!("rejected: {e}");
                self.warning = Some(e.to_string());
            }
        }
    }

    /// Execute effects in order. Returns false if saving the settings failed.
    fn run_effects(&mut self, ctx: &eg::Context, effects: Vec<Effect>) -> bool {
        let mut queue: VecDeque<Effect> = effects.into();
        let mut saved = true;

        while let Some(effect) = queue.pop_front() {
            match effect {
                Effect::Dispatch(job) => {
                    let stage = job.stage();
                    if self.job_tx.send(job).is_err() {
                        error!("worker is gone; dropping {stage:?} job");
                        queue.extend(self.session.apply(WorkerEvent::Failed {
                            stage,
                            message: "Background worker stopped.".into(),
                        }));
                    }
                }
                Effect::SaveSettings => {
                    match prefs::save(&self.settings_path, self.session.settings()) {
                        Ok(()) => info!("Settings saved to {}", self.settings_path.display()),
                        Err(e) => {
                            error!("{e}");
                            self.warning = Some(format!("Could not save settings: {e}"));
                            saved = false;
                        }
                    }
                }
                Effect::AppendErrorLog(msg) => {
                    if let Err(e) = self.error_log.append(&msg) {
                        warn!("could not append to {}: {e}", self.error_log.path().display());
                    }
                }
                Effect::ApplyAlwaysOnTop(on) => {
                    let level = if on {
                        eg::WindowLevel::AlwaysOnTop
                    } else {
                        eg::WindowLevel::Normal
                    };
                    ctx.send_viewport_cmd(eg::ViewportCommand::WindowLevel(level));
                }
            }
        }
        saved
    }

    /// Drain worker events and feed them to the session.
    fn poll_worker(&mut self, ctx: &eg::Context) {
        let mut drained = 0usize;

        while drained < MAX_EVENTS_PER_FRAME {
            match self.event_rx.try_recv() {
                Ok(event) => {
                    drained += 1;
                    if let Some(tab) = DetailTab::focus_for(&event) {
                        self.tab = tab;
                    }
                    let effects = self.session.apply(event);
                    self.run_effects(ctx, effects);
                }
                Err(mpsc::TryRecvError::Empty) => break,
                Err(mpsc::TryRecvError::Disconnected) => {
                    if self.session.is_busy() {
                        self.session.set_status("Background worker stopped.");
                    }
                    break;
                }
            }
        }

        if drained > 0 {
            ctx.request_repaint();
        }
    }

    /// Keep the poster texture in step with the session's image path.
    fn sync_poster_texture(&mut self, ctx: &eg::Context) {
        let want = self.session.image_path().map(|p| p.to_path_buf());
        if want == self.poster_tex_path {
            return;
        }
        self.poster_tex = None;
        if let Some(path) = &want {
            match gfx::load_texture_from_path(ctx, path) {
                Ok(tex) => self.poster_tex = Some(tex),
                Err(e) => warn!("poster preview failed for {}: {e}", path.display()),
            }
        }
        self.poster_tex_path = want;
    }

    /// Capture window geometry and directory, then save. Returns whether the
    /// window may close.
    fn on_close_requested(&mut self, ctx: &eg::Context) -> bool {
        let (outer, inner) = ctx.input(|i| (i.viewport().outer_rect, i.viewport().inner_rect));
        let cmd = Command::Close {
            directory: self.directory_input.trim().to_string(),
            position: outer.map(|r| [r.min.x, r.min.y]),
            size: inner.map(|r| [r.width(), r.height()]),
        };
        let effects = match self.session.handle(cmd) {
            Ok(effects) => effects,
            Err(e) => {
                warn!("close: {e}");
                return true;
            }
        };
        self.run_effects(ctx, effects)
    }
}

// ========== App impl ==========
impl eframe::App for OmdbApp {
    fn update(&mut self, ctx: &eg::Context, _frame: &mut eframe::Frame) {
        self.poll_worker(ctx);

        if ctx.input(|i| i.viewport().close_requested()) && !self.close_anyway {
            if !self.on_close_requested(ctx) {
                ctx.send_viewport_cmd(eg::ViewportCommand::CancelClose);
                self.close_anyway = true;
                self.warning = Some(format!(
                    "{}\nClose the window again to quit without saving.",
                    self.warning.take().unwrap_or_default()
                ));
            }
        }

        self.ui_render_menu(ctx);
        self.ui_render_status_bar(ctx);
        self.ui_render_detail_panel(ctx);

        eg::CentralPanel::default().show(ctx, |ui| {
            self.ui_render_search_row(ui);
            ui.separator();
            self.ui_render_sort_row(ui);
            ui.separator();
            self.ui_render_results(ui);
        });

        self.ui_render_dialogs(ctx);
    }
}
