// src/main.rs
use eframe::egui as eg;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use omdbfetch::app::prefs::{self, LoadedSettings, Settings};
use omdbfetch::app::OmdbApp;
use omdbfetch::config::{load_config, RendererChoice, ENV_RENDERER};

const DEFAULT_WINDOW_SIZE: [f32; 2] = [920.0, 640.0];

fn pick_renderer(choice: Option<RendererChoice>) -> eframe::Renderer {
    match choice {
        Some(RendererChoice::Glow) => eframe::Renderer::Glow,
        Some(RendererChoice::Wgpu) => eframe::Renderer::Wgpu,
        None => {
            // Default: Windows = WGPU (DX12), Others = Glow (GL)
            #[cfg(target_os = "windows")]
            { eframe::Renderer::Wgpu }
            #[cfg(not(target_os = "windows"))]
            { eframe::Renderer::Glow }
        }
    }
}

fn viewport_for(settings: &Settings) -> eg::ViewportBuilder {
    let mut vp = eg::ViewportBuilder::default()
        .with_title("OMDBfetch")
        .with_min_inner_size([640.0, 420.0])
        .with_inner_size(settings.window_size.unwrap_or(DEFAULT_WINDOW_SIZE));
    if let Some(pos) = settings.window_position {
        vp = vp.with_position(pos);
    }
    if settings.always_on_top {
        vp = vp.with_window_level(eg::WindowLevel::AlwaysOnTop);
    }
    vp
}

fn main() -> eframe::Result<()> {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init();

    let config = load_config();

    let loaded = match prefs::load_or_bootstrap(&config.settings_path) {
        Ok(loaded) => loaded,
        Err(e) => {
            warn!("{e}; starting with default settings");
            LoadedSettings {
                settings: Settings::default(),
                first_run: false,
            }
        }
    };

    #[cfg(target_os = "linux")]
    {
        info!("XDG_SESSION_TYPE={:?}", std::env::var_os("XDG_SESSION_TYPE"));
        info!("WAYLAND_DISPLAY={:?}", std::env::var_os("WAYLAND_DISPLAY"));
        info!("DISPLAY={:?}", std::env::var_os("DISPLAY"));
    }

    let options = eframe::NativeOptions {
        renderer: pick_renderer(config.renderer),
        viewport: viewport_for(&loaded.settings),
        multisampling: 0,
        ..Default::default()
    };

    match eframe::run_native(
        "OMDBfetch",
        options,
        Box::new(move |cc| Ok(Box::new(OmdbApp::new(&cc.egui_ctx, &config, loaded)))),
    ) {
        Ok(_) => Ok(()),
        Err(e) => {
            error!("eframe failed to start: {e:?}");
            error!("Hint: try {ENV_RENDERER}=wgpu or {ENV_RENDERER}=glow.");
            Err(e)
        }
    }
}
