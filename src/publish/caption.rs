use std::path::Path;

use crate::{
    content::row::ContentRow,
    foundation::error::{ReelError, ReelResult},
};

/// Bullets listed in a caption file; longer lists are cut.
pub const CAPTION_MAX_BULLETS: usize = 5;

/// Social caption for a row: hook, bullets, call-to-action with link, tags, trailer.
pub fn caption_text(row: &ContentRow, tags: &[String], trailer: &str) -> String {
    let bullets = row
        .bullets
        .iter()
        .take(CAPTION_MAX_BULLETS)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(" • ");
    let mut out = format!("{}\n\n{bullets}\n\n{}\n", row.hook, row.cta);
    if let Some(url) = &row.qr_url {
        out.push_str(&format!("🔗 {url}\n"));
    }
    out.push_str(&format!("\n{}\n", tags.join(" ")));
    if !trailer.trim().is_empty() {
        out.push_str(&format!("\n{}\n", trailer.trim()));
    }
    out
}

pub fn write_caption_file(path: &Path, text: &str) -> ReelResult<()> {
    crate::render::ensure_parent_dir(path)?;
    std::fs::write(path, text)
        .map_err(|e| ReelError::encode(format!("write caption '{}': {e}", path.display())))
}

#[cfg(test)]
#[path = "../../tests/unit/publish/caption.rs"]
mod tests;
