use std::{env, fs, path::PathBuf};

use serde::Deserialize;
use tracing::{info, warn};

pub const CONFIG_FILE: &str = "config.json";
pub const SETTINGS_FILE: &str = "omdbfetch-settings.json";
pub const ERROR_LOG_FILE: &str = "omdbfetch-log.txt";
pub const DEFAULT_API_BASE_URL: &str = "https://www.omdbapi.com/";

pub const ENV_RENDERER: &str = "OMDBFETCH_RENDERER";
pub const ENV_API_KEY: &str = "OMDBFETCH_API_KEY";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RendererChoice {
    Glow,
    Wgpu,
}

impl RendererChoice {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "glow" | "gl" | "opengl" => Some(Self::Glow),
            "wgpu" => Some(Self::Wgpu),
            _ => None,
        }
    }
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub api_base_url: String,
    pub settings_path: PathBuf,
    pub error_log_path: PathBuf,
    /// Seeds `Settings::api_key` when the settings file carries none.
    pub omdb_api_key: Option<String>,
    pub renderer: Option<RendererChoice>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            settings_path: PathBuf::from(SETTINGS_FILE),
            error_log_path: PathBuf::from(ERROR_LOG_FILE),
            omdb_api_key: None,
            renderer: None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawConfig {
    api_base_url: Option<String>,
    settings_path: Option<String>,
    error_log_path: Option<String>,
    #[serde(alias = "api_key")]
    omdb_api_key: Option<String>,
    renderer: Option<String>,
}

impl AppConfig {
    fn apply_raw(&mut self, parsed: RawConfig) {
        if let Some(url) = parsed.api_base_url.filter(|u| !u.trim().is_empty()) {
            self.api_base_url = url;
        }
        if let Some(p) = parsed.settings_path.filter(|p| !p.trim().is_empty()) {
            self.settings_path = PathBuf::from(p);
        }
        if let Some(p) = parsed.error_log_path.filter(|p| !p.trim().is_empty()) {
            self.error_log_path = PathBuf::from(p);
        }
        if let Some(key) = parsed.omdb_api_key.filter(|k| !k.trim().is_empty()) {
            self.omdb_api_key = Some(key);
        }
        if let Some(name) = parsed.renderer {
            match RendererChoice::from_str(&name) {
                Some(r) => self.renderer = Some(r),
                None => warn!("Unknown renderer `{name}` in {CONFIG_FILE}; using the platform default."),
            }
        }
    }

    fn apply_env(&mut self) {
        if let Ok(name) = env::var(ENV_RENDERER) {
            match RendererChoice::from_str(&name) {
                Some(r) => self.renderer = Some(r),
                None => warn!("Ignoring {ENV_RENDERER}={name}; expected glow or wgpu."),
            }
        }
        if let Ok(key) = env::var(ENV_API_KEY) {
            if !key.trim().is_empty() {
                self.omdb_api_key = Some(key.trim().to_string());
            }
        }
    }
}

pub fn load_config() -> AppConfig {
    let mut cfg = AppConfig::default();

    match fs::read_to_string(CONFIG_FILE) {
        Ok(raw) => match serde_json::from_str::<RawConfig>(&raw) {
            Ok(parsed) => {
                cfg.apply_raw(parsed);
                info!("Loaded config from {CONFIG_FILE}");
            }
            Err(err) => {
                warn!("Failed to parse {CONFIG_FILE} ({err}). Using defaults.");
            }
        },
        Err(_) => {
            info!("No {CONFIG_FILE} found; using defaults");
        }
    }

    cfg.apply_env();
    cfg
}
