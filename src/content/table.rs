use std::path::Path;

use crate::{
    config::RowDefaults,
    content::row::RawRow,
    foundation::error::{ReelError, ReelResult},
};

/// Column order of the content table.
pub const TABLE_COLUMNS: [&str; 11] = [
    "title",
    "hook",
    "bullets",
    "cta",
    "footage_dir",
    "bg_music",
    "duration",
    "brand_color",
    "logo",
    "qr_url",
    "output",
];

/// Read every row of a content table.
///
/// A missing or unreadable table is an [`ReelError::Input`] error: the batch cannot start.
/// Individual rows are returned raw; defaulting and validation happen per row so that one
/// bad row does not prevent the others from being processed.
pub fn load_table(path: &Path) -> ReelResult<Vec<RawRow>> {
    if !path.is_file() {
        return Err(ReelError::input(format!(
            "content table '{}' not found (run `reelkit init` to create a starter table)",
            path.display()
        )));
    }
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_path(path)
        .map_err(|e| ReelError::input(format!("open content table '{}': {e}", path.display())))?;

    let mut rows = Vec::new();
    for (i, rec) in rdr.deserialize::<RawRow>().enumerate() {
        let row = rec.map_err(|e| {
            ReelError::input(format!(
                "content table '{}' row {}: {e}",
                path.display(),
                i + 1
            ))
        })?;
        rows.push(row);
    }
    tracing::debug!(rows = rows.len(), table = %path.display(), "loaded content table");
    Ok(rows)
}

/// Write a header plus one example row.
pub fn write_starter_table(path: &Path, defaults: &RowDefaults) -> ReelResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| {
            ReelError::input(format!("create directory '{}': {e}", parent.display()))
        })?;
    }
    let mut w = csv::Writer::from_path(path)
        .map_err(|e| ReelError::input(format!("create '{}': {e}", path.display())))?;
    let duration = defaults.duration_sec.to_string();
    let brand = defaults.brand_color.to_hex();
    let footage = defaults.footage_dir.to_string_lossy();
    let example = [
        "Our Programs",
        "3 free ways to skill up",
        "Industry credentials; Job placement support; Paid apprenticeships",
        "Apply today • Link in bio",
        &*footage,
        "assets/music/track.mp3",
        duration.as_str(),
        brand.as_str(),
        "assets/logo.png",
        defaults.qr_url.as_str(),
        "demo_01.mp4",
    ];
    w.write_record(TABLE_COLUMNS)
        .and_then(|_| w.write_record(example))
        .map_err(|e| ReelError::input(format!("write '{}': {e}", path.display())))?;
    w.flush()
        .map_err(|e| ReelError::input(format!("flush '{}': {e}", path.display())))?;
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/content/table.rs"]
mod tests;
