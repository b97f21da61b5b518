// src/app/gfx.rs
use std::path::Path;

use eframe::egui::{self as eg, ColorImage, TextureHandle};

use crate::app::poster;

/// Upload an RGBA image to a GPU texture. (UI thread only)
pub fn upload_rgba(
    ctx: &eg::Context,
    w: u32,
    h: u32,
    bytes: &[u8],
    name: &str,
) -> TextureHandle {
    let img = ColorImage::from_rgba_unmultiplied([w as usize, h as usize], bytes);
    ctx.load_texture(name.to_string(), img, eg::TextureOptions::LINEAR)
}

/// Decode a saved poster and upload it, keyed by its path. (UI thread only)
pub fn load_texture_from_path(ctx: &eg::Context, path: &Path) -> Result<TextureHandle, String> {
    let (w, h, bytes) = poster::load_rgba(path)?;
    Ok(upload_rgba(ctx, w, h, &bytes, &poster::texture_key(path)))
}
