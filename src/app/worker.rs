// src/app/worker.rs
use std::sync::mpsc::{self, Receiver, Sender};

use eframe::egui as eg;
use tracing::{debug, error, warn};

use crate::app::omdb::OmdbClient;
use crate::app::poster::download_poster;
use crate::app::types::{Job, WorkerEvent};
use crate::error::FetchResult;

/// Run one job to completion on the calling thread.
pub fn run_job(client: &OmdbClient, job: Job) -> FetchResult<WorkerEvent> {
    match job {
        Job::SearchPage {
            api_key,
            term,
            page,
        } => {
            let hits = client.search(&api_key, &term, page)?;
            Ok(WorkerEvent::SearchPage { page, hits })
        }
        Job::Detail {
            api_key,
            id,
            full_plot,
        } => {
            let item = client.get_by_id(&api_key, &id, full_plot)?;
            Ok(WorkerEvent::Detail(Box::new(item)))
        }
        Job::Poster { url, dest } => {
            let path = download_poster(client, &url, &dest)?;
            Ok(WorkerEvent::PosterSaved(path))
        }
    }
}

/// Spawn the single network worker. Jobs go in, events come out; the
/// context is poked after each event so the UI wakes up to poll.
pub fn spawn_worker(base_url: String, ctx: eg::Context) -> (Sender<Job>, Receiver<WorkerEvent>) {
    let (job_tx, job_rx) = mpsc::channel::<Job>();
    let (ev_tx, ev_rx) = mpsc::channel::<WorkerEvent>();

    std::thread::spawn(move || {
        let client = match OmdbClient::new(base_url) {
            Ok(c) => Some(c),
            Err(e) => {
                error!("could not build HTTP client: {e}");
                None
            }
        };

        // Exits when the UI drops its sender.
        while let Ok(job) = job_rx.recv() {
            let stage = job.stage();
            debug!("worker: running {stage:?} job");
            let event = match &client {
                Some(client) => run_job(client, job).unwrap_or_else(|e| {
                    warn!("{stage:?} job failed: {e}");
                    WorkerEvent::Failed {
                        stage,
                        message: e.to_string(),
                    }
                }),
                None => WorkerEvent::Failed {
                    stage,
                    message: "HTTP client unavailable".into(),
                },
            };
            if ev_tx.send(event).is_err() {
                break;
            }
            ctx.request_repaint();
        }
        debug!("worker: channel closed, exiting");
    });

    (job_tx, ev_rx)
}
