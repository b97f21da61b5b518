// src/app/types.rs
use std::path::PathBuf;

use crate::app::omdb::{Item, SearchHit};

// ---- cross-thread messages ----

/// Work handed to the background worker. At most one is outstanding.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Job {
    SearchPage {
        api_key: String,
        term: String,
        page: u32,
    },
    Detail {
        api_key: String,
        id: String,
        full_plot: bool,
    },
    Poster {
        url: String,
        dest: PathBuf,
    },
}

impl Job {
    pub fn stage(&self) -> Stage {
        match self {
            Self::SearchPage { .. } => Stage::Search,
            Self::Detail { .. } => Stage::Detail,
            Self::Poster { .. } => Stage::Poster,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    Search,
    Detail,
    Poster,
}

/// Worker results, drained by the UI thread each frame.
#[derive(Clone, Debug)]
pub enum WorkerEvent {
    SearchPage { page: u32, hits: Vec<SearchHit> },
    Detail(Box<Item>),
    PosterSaved(PathBuf),
    Failed { stage: Stage, message: String },
}

// ---- UI controls ----
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortKey {
    #[default]
    Raw,
    Id,
    Title,
    Description,
}

impl SortKey {
    pub const ALL: [Self; 4] = [Self::Raw, Self::Id, Self::Title, Self::Description];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Raw => "raw",
            Self::Id => "id",
            Self::Title => "title",
            Self::Description => "description",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "raw" => Some(Self::Raw),
            "id" => Some(Self::Id),
            "title" => Some(Self::Title),
            "description" => Some(Self::Description),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Raw => "Raw",
            Self::Id => "ID",
            Self::Title => "Title",
            Self::Description => "Description",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SortSpec {
    pub key: SortKey,
    pub descending: bool,
}

impl SortSpec {
    pub const fn new(key: SortKey, descending: bool) -> Self {
        Self { key, descending }
    }
}
