use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use crate::{
    foundation::error::{ReelError, ReelResult},
    timing::{allocator::TimedUnit, schedule::CaptionSchedule},
};

/// Write every word of `schedule` as a JSON array of `{text, start, end}`, ordered by start.
pub fn write_subtitles(path: &Path, schedule: &CaptionSchedule) -> ReelResult<Vec<TimedUnit>> {
    let units = schedule.subtitle_units();
    crate::render::ensure_parent_dir(path)?;
    let f = File::create(path)
        .map_err(|e| ReelError::encode(format!("create '{}': {e}", path.display())))?;
    let mut w = BufWriter::new(f);
    serde_json::to_writer_pretty(&mut w, &units)
        .map_err(|e| ReelError::serde(format!("write subtitles JSON: {e}")))?;
    w.flush()
        .map_err(|e| ReelError::encode(format!("write '{}': {e}", path.display())))?;
    Ok(units)
}

#[cfg(test)]
#[path = "../../tests/unit/publish/subtitles.rs"]
mod tests;
