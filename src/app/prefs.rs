// src/app/prefs.rs
use std::fs;
use std::io::{self, ErrorKind};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::app::types::SortKey;
use crate::error::SettingsError;

pub const MIN_SEARCH_PAGES: u32 = 1;
pub const MAX_SEARCH_PAGES: u32 = 100;

/// User preferences persisted between runs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub always_on_top: bool,
    pub directory: String,
    /// Outer window position; `None` lets the platform place the window.
    pub window_position: Option<[f32; 2]>,
    pub window_size: Option<[f32; 2]>,
    pub sort_key: String,
    pub descending: bool,
    pub api_key: String,
    /// Upper bound on result pages fetched per search.
    #[serde(alias = "results_per_page")]
    pub search_pages: u32,
    pub hide_ids_in_list: bool,
    pub full_plot: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            always_on_top: false,
            directory: String::new(),
            window_position: None,
            window_size: None,
            sort_key: SortKey::Raw.as_str().to_string(),
            descending: false,
            api_key: String::new(),
            search_pages: MIN_SEARCH_PAGES,
            hide_ids_in_list: true,
            full_plot: false,
        }
    }
}

impl Settings {
    /// Unknown keys fall back to `Raw`.
    pub fn sort_key(&self) -> SortKey {
        SortKey::from_str(&self.sort_key).unwrap_or_else(|| {
            warn!("Unknown sort key `{}` in settings; using raw order.", self.sort_key);
            SortKey::Raw
        })
    }

    pub fn set_sort_key(&mut self, key: SortKey) {
        self.sort_key = key.as_str().to_string();
    }

    pub fn search_pages(&self) -> u32 {
        self.search_pages.clamp(MIN_SEARCH_PAGES, MAX_SEARCH_PAGES)
    }
}

/// Parse a user-entered page count. Zero or less becomes 1, anything above 100 becomes 100.
pub fn parse_search_pages(input: &str) -> Option<u32> {
    let n = input.trim().parse::<i64>().ok()?;
    Some(n.clamp(MIN_SEARCH_PAGES as i64, MAX_SEARCH_PAGES as i64) as u32)
}

pub fn load(path: &Path) -> Result<Settings, SettingsError> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            return Err(SettingsError::NotFound(path.to_path_buf()));
        }
        Err(source) => {
            return Err(SettingsError::Io {
                path: path.to_path_buf(),
                source,
            });
        }
    };
    serde_json::from_str(&raw).map_err(|source| SettingsError::Corrupt {
        path: path.to_path_buf(),
        source,
    })
}

/// Write to a sibling temp file, then rename over the target.
pub fn save(path: &Path, settings: &Settings) -> Result<(), SettingsError> {
    write_json(path, settings)
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), SettingsError> {
    let io_err = |source: io::Error| SettingsError::Io {
        path: path.to_path_buf(),
        source,
    };

    let data = serde_json::to_vec_pretty(value).map_err(|e| io_err(io::Error::other(e)))?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_err)?;
    }
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, data).map_err(io_err)?;
    fs::rename(&tmp, path).map_err(io_err)
}

pub struct LoadedSettings {
    pub settings: Settings,
    pub first_run: bool,
}

/// Load settings, writing defaults first when the file does not exist yet.
pub fn load_or_bootstrap(path: &Path) -> Result<LoadedSettings, SettingsError> {
    match load(path) {
        Ok(settings) => {
            info!("Loaded settings from {}", path.display());
            Ok(LoadedSettings {
                settings,
                first_run: false,
            })
        }
        Err(SettingsError::NotFound(_)) => {
            info!("No settings at {}; writing defaults", path.display());
            let settings = Settings::default();
            save(path, &settings)?;
            Ok(LoadedSettings {
                settings,
                first_run: true,
            })
        }
        Err(err) => Err(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn sample() -> Settings {
        Settings {
            always_on_top: true,
            directory: "/tmp/posters".into(),
            window_position: Some([120.5, 64.0]),
            window_size: Some([900.0, 640.25]),
            sort_key: "title".into(),
            descending: true,
            api_key: "abc123".into(),
            search_pages: 7,
            hide_ids_in_list: false,
            full_plot: true,
        }
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let settings = sample();

        save(&path, &settings).unwrap();
        let loaded = load(&path).unwrap();
        assert_eq!(loaded, settings);
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn missing_file_is_not_found() {
        let dir = tempdir().unwrap();
        let err = load(&dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, SettingsError::NotFound(_)));
    }

    #[test]
    fn unparsable_file_is_corrupt() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "<SettingsData><ApiKey/></SettingsData>").unwrap();
        assert!(matches!(load(&path), Err(SettingsError::Corrupt { .. })));

        fs::write(&path, r#"{ "search_pages": "many" }"#).unwrap();
        assert!(matches!(load(&path), Err(SettingsError::Corrupt { .. })));
    }

    #[test]
    fn missing_fields_take_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"{ "api_key": "k", "results_per_page": 3 }"#).unwrap();

        let loaded = load(&path).unwrap();
        assert_eq!(loaded.api_key, "k");
        assert_eq!(loaded.search_pages, 3);
        assert!(loaded.hide_ids_in_list);
        assert_eq!(loaded.sort_key(), SortKey::Raw);
    }

    #[test]
    fn bootstrap_writes_defaults_once() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");

        let first = load_or_bootstrap(&path).unwrap();
        assert!(first.first_run);
        assert_eq!(first.settings, Settings::default());
        assert!(path.exists());

        let second = load_or_bootstrap(&path).unwrap();
        assert!(!second.first_run);
    }

    #[test]
    fn save_below_a_plain_file_fails_with_io() {
        let dir = tempdir().unwrap();
        let blocker = dir.path().join("file");
        fs::write(&blocker, "x").unwrap();
        let err = save(&blocker.join("settings.json"), &Settings::default()).unwrap_err();
        assert!(matches!(err, SettingsError::Io { .. }));
    }

    #[test]
    fn unserializable_value_is_an_io_error_and_writes_nothing() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let mut bad = std::collections::HashMap::new();
        bad.insert((1u8, 2u8), "tuple keys are not valid JSON object keys");

        let err = write_json(&path, &bad).unwrap_err();
        assert!(matches!(err, SettingsError::Io { .. }), "got: {err}");
        assert!(!path.exists());
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn page_count_input_is_clamped() {
        assert_eq!(parse_search_pages("0"), Some(1));
        assert_eq!(parse_search_pages("-4"), Some(1));
        assert_eq!(parse_search_pages(" 12 "), Some(12));
        assert_eq!(parse_search_pages("250"), Some(100));
        assert_eq!(parse_search_pages("ten"), None);
        assert_eq!(parse_search_pages(""), None);
    }

    #[test]
    fn unknown_sort_key_falls_back_to_raw() {
        let mut settings = Settings::default();
        settings.sort_key = "rawRadioButton".into();
        assert_eq!(settings.sort_key(), SortKey::Raw);
        settings.set_sort_key(SortKey::Description);
        assert_eq!(settings.sort_key, "description");
    }
}
