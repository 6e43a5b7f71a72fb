//! Utility functions

use crate::constants::{APP_NAME, HEALTH_PATH, PDF_EXTENSION, PDF_MIME};
use crate::error::ReviewError;
use std::path::PathBuf;

// Page with a folded corner and three text lines
pub const ICON_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 64 64"><path fill="#fff" d="M14 4h26l12 12v40a4 4 0 0 1-4 4H14a4 4 0 0 1-4-4V8a4 4 0 0 1 4-4z"/><path fill="#a1a1aa" d="M40 4v10a2 2 0 0 0 2 2h10z"/><rect x="18" y="26" width="28" height="4" rx="2" fill="#2dd4bf"/><rect x="18" y="35" width="28" height="4" rx="2" fill="#2dd4bf"/><rect x="18" y="44" width="18" height="4" rx="2" fill="#2dd4bf"/></svg>"##;

/// Rasterize the icon SVG to a square RGBA image (window/taskbar icon and header logo).
pub fn rasterize_icon(size: u32) -> Option<(Vec<u8>, u32, u32)> {
    let tree = resvg::usvg::Tree::from_str(ICON_SVG, &resvg::usvg::Options::default()).ok()?;
    let scale = size as f32 / tree.size().width();
    let mut pixmap = resvg::tiny_skia::Pixmap::new(size, size)?;
    resvg::render(
        &tree,
        resvg::usvg::Transform::from_scale(scale, scale),
        &mut pixmap.as_mut(),
    );
    Some((premul_to_straight(&pixmap), size, size))
}

fn premul_to_straight(pixmap: &resvg::tiny_skia::Pixmap) -> Vec<u8> {
    pixmap
        .pixels()
        .iter()
        .flat_map(|p| {
            let a = p.alpha();
            if a == 0 {
                [0, 0, 0, 0]
            } else {
                let r = (p.red() as u16 * 255 / a as u16) as u8;
                let g = (p.green() as u16 * 255 / a as u16) as u8;
                let b = (p.blue() as u16 * 255 / a as u16) as u8;
                [r, g, b, a]
            }
        })
        .collect()
}

/// Get the app data directory (settings, logs)
pub fn get_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

/// Format bytes into human-readable string (B, KB, MB)
pub fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

/// PDF filter hint: MIME type when the platform reports one, else the extension
pub fn looks_like_pdf(name: &str, mime: &str) -> bool {
    if mime.eq_ignore_ascii_case(PDF_MIME) {
        return true;
    }
    std::path::Path::new(name)
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case(PDF_EXTENSION))
        .unwrap_or(false)
}

/// `<scheme>://<host>[:port]/health` for the configured review endpoint
pub fn health_url(endpoint: &str) -> Result<String, ReviewError> {
    let url = reqwest::Url::parse(endpoint.trim())
        .map_err(|e| ReviewError::InvalidUrl(format!("{endpoint}: {e}")))?;
    url.join(HEALTH_PATH)
        .map(|u| u.to_string())
        .map_err(|e| ReviewError::InvalidUrl(format!("{endpoint}: {e}")))
}
