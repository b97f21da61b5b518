// src/error.rs
use std::path::PathBuf;

use thiserror::Error;

/// Settings file failures. `NotFound` is the first-run signal, never silently defaulted.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("settings file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("settings file {} is corrupt: {source}", path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("settings file {} could not be accessed: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Input problems caught before any I/O happens.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please enter a search term.")]
    MissingSearchTerm,

    #[error("Target save directory must exist.")]
    DirectoryNotFound(PathBuf),

    #[error("Please set API key (Tools / API key...). Get one at www.omdbapi.com.")]
    MissingApiKey,
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("network error: {0}")]
    Network(#[source] reqwest::Error),

    #[error("OMDb error: {0}")]
    Api(String),

    #[error("unexpected response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("file error: {0}")]
    Io(#[from] std::io::Error),
}

// Request URLs carry the API key; keep them out of messages and logs.
impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        Self::Network(err.without_url())
    }
}

pub type FetchResult<T> = std::result::Result<T, FetchError>;
