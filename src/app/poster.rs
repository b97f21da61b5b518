use std::ffi::OsString;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use image::GenericImageView;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, warn};

use crate::app::omdb::OmdbClient;
use crate::app::store::ResultRow;
use crate::error::FetchResult;

// Characters rejected in file names on Windows, plus control characters.
static INVALID_NAME_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"[<>:"/\\|?*\x00-\x1F]"#).expect("static regex"));

/// Strip characters that are invalid in file or path names.
pub fn sanitize_file_name(raw: &str) -> String {
    INVALID_NAME_CHARS.replace_all(raw, "").trim().to_string()
}

/// Extension (with dot) of the URL's last path segment, ignoring query/fragment.
pub fn url_extension(url: &str) -> String {
    let path = url.split(['?', '#']).next().unwrap_or_default();
    let last = path.rsplit('/').next().unwrap_or_default();
    match last.rfind('.') {
        Some(dot) if dot + 1 < last.len() => last[dot..].to_ascii_lowercase(),
        _ => String::new(),
    }
}

/// File name for a row's poster, e.g. `Alien 1979 (movie).jpg`.
pub fn file_name_for(row: &ResultRow, url: &str) -> String {
    let mut stem = sanitize_file_name(&format!("{} {}", row.title, row.description));
    if stem.is_empty() {
        stem = sanitize_file_name(&row.id);
    }
    format!("{stem}{}", sanitize_file_name(&url_extension(url)))
}

fn part_path(dest: &Path) -> PathBuf {
    let mut name: OsString = dest.file_name().map(OsString::from).unwrap_or_default();
    name.push(".part");
    dest.with_file_name(name)
}

/// Write bytes through a `.part` file so a half-written poster is never visible.
pub fn write_atomically(dest: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let tmp = part_path(dest);
    {
        let mut f = fs::File::create(&tmp)?;
        f.write_all(bytes)?;
    }
    if let Err(err) = fs::rename(&tmp, dest) {
        let _ = fs::remove_file(&tmp);
        return Err(err);
    }
    Ok(())
}

/// Download a poster into `dest`. Returns the stored path.
pub fn download_poster(client: &OmdbClient, url: &str, dest: &Path) -> FetchResult<PathBuf> {
    let bytes = client.get_bytes(url)?;
    if image::guess_format(&bytes).is_err() {
        warn!("poster at {url} does not look like an image; saving anyway");
    }
    write_atomically(dest, &bytes)?;
    debug!("poster saved to {}", dest.display());
    Ok(dest.to_path_buf())
}

/// Return (width, height, RGBA8 bytes) for a stored poster.
pub fn load_rgba(path: &Path) -> Result<(u32, u32, Vec<u8>), String> {
    if !path.exists() {
        return Err("not found".into());
    }
    let img = image::ImageReader::open(path)
        .map_err(|e| format!("open image {}: {e}", path.display()))?
        .with_guessed_format()
        .map_err(|e| format!("guess format {}: {e}", path.display()))?
        .decode()
        .map_err(|e| format!("decode {}: {e}", path.display()))?;
    let (w, h) = img.dimensions();
    Ok((w, h, img.to_rgba8().into_raw()))
}

pub fn texture_key(path: &Path) -> String {
    format!("{:x}", md5::compute(path.to_string_lossy().as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn strips_invalid_characters() {
        assert_eq!(
            sanitize_file_name("Mission: Impossible? <Part/2> \"Cut\"|*.jpg"),
            "Mission Impossible Part2 Cut.jpg"
        );
        assert_eq!(sanitize_file_name("tab\there"), "tabhere");
    }

    #[test]
    fn extension_ignores_query_and_host_dots() {
        assert_eq!(
            url_extension("https://m.media-amazon.com/images/M/MV5B@._V1_SX300.JPG?x=1"),
            ".jpg"
        );
        assert_eq!(url_extension("https://example.com/poster"), "");
        assert_eq!(url_extension("https://example.com/poster."), "");
    }

    #[test]
    fn file_name_uses_title_and_description() {
        let row = ResultRow::new("tt0078748", "Alien", "1979 (movie)", "");
        assert_eq!(
            file_name_for(&row, "https://img.example/alien.jpg"),
            "Alien 1979 (movie).jpg"
        );

        let odd = ResultRow::new("tt1", "???", "", "");
        assert_eq!(file_name_for(&odd, "https://img.example/a.png"), "tt1.png");
    }

    #[test]
    fn atomic_write_leaves_no_part_file() {
        let dir = tempdir().unwrap();
        let dest = dir.path().join("Alien 1979 (movie).jpg");
        write_atomically(&dest, b"jpeg bytes").unwrap();

        assert_eq!(fs::read(&dest).unwrap(), b"jpeg bytes");
        assert!(!part_path(&dest).exists());
    }

    #[test]
    fn decodes_a_written_png() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("p.png");
        image::RgbaImage::from_pixel(2, 3, image::Rgba([10, 20, 30, 255]))
            .save(&path)
            .unwrap();

        let (w, h, bytes) = load_rgba(&path).unwrap();
        assert_eq!((w, h), (2, 3));
        assert_eq!(bytes.len(), 2 * 3 * 4);
        assert!(load_rgba(&dir.path().join("missing.png")).is_err());
    }
}
