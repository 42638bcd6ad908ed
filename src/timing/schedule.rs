use crate::{
    config::TimingConfig,
    content::row::ContentRow,
    foundation::error::{ReelError, ReelResult},
    timing::allocator::{TimedUnit, allocate_block},
};

/// Tolerance for comparing block windows against the row duration.
pub(crate) const TIME_EPS: f64 = 1e-9;

/// Which part of the row a caption block comes from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockRole {
    Hook,
    Bullet(usize),
    CallToAction,
}

/// One caption block: its window on the timeline and its word timings.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CaptionBlock {
    pub role: BlockRole,
    pub text: String,
    pub start: f64,
    pub end: f64,
    pub units: Vec<TimedUnit>,
}

impl CaptionBlock {
    fn allocate(role: BlockRole, text: &str, start: f64, len: f64) -> ReelResult<Self> {
        Ok(Self {
            role,
            text: text.trim().to_owned(),
            start,
            end: start + len,
            units: allocate_block(text, start, len)?,
        })
    }

    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}

/// Caption timing for a whole row.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CaptionSchedule {
    pub duration: f64,
    pub hook: CaptionBlock,
    pub bullets: Vec<CaptionBlock>,
    pub cta: CaptionBlock,
}

impl CaptionSchedule {
    /// Every block in layout order: hook, bullets, call-to-action.
    pub fn blocks(&self) -> impl Iterator<Item = &CaptionBlock> {
        std::iter::once(&self.hook)
            .chain(self.bullets.iter())
            .chain(std::iter::once(&self.cta))
    }

    /// All word units of the row, ordered by start time.
    pub fn subtitle_units(&self) -> Vec<TimedUnit> {
        let mut units: Vec<TimedUnit> = self.blocks().flat_map(|b| b.units.iter().cloned()).collect();
        units.sort_by(|a, b| a.start.total_cmp(&b.start));
        units
    }
}

/// Lay the row's hook, bullets and call-to-action out along its duration.
///
/// The hook occupies a fixed window from `hook_start`. Bullets follow after `hook_pause`,
/// each receiving `max(min_bullet_window, (duration - reserved_window) / bullet_count)`
/// seconds and separated by `bullet_pause`. The call-to-action covers the last
/// `cta_window` seconds (clamped at 0).
///
/// Windows are never shrunk to fit: a row whose hook or bullets run past its duration is
/// rejected as a configuration error.
pub fn schedule_row(row: &ContentRow, timing: &TimingConfig) -> ReelResult<CaptionSchedule> {
    let duration = row.duration();

    let hook = CaptionBlock::allocate(BlockRole::Hook, &row.hook, timing.hook_start, timing.hook_window)?;
    if hook.units.is_empty() {
        return Err(ReelError::validation(format!("row '{}': hook has no words", row.output)));
    }
    if hook.end > duration + TIME_EPS {
        return Err(ReelError::validation(format!(
            "row '{}': hook window ends at {:.2}s, past the {duration}s duration",
            row.output, hook.end
        )));
    }

    let count = row.bullets.len().max(1) as f64;
    let each = timing
        .min_bullet_window
        .max((duration - timing.reserved_window) / count);

    let mut bullets = Vec::with_capacity(row.bullets.len());
    let mut t = hook.end + timing.hook_pause;
    for (i, text) in row.bullets.iter().enumerate() {
        if text.split_whitespace().next().is_none() {
            tracing::debug!(row = %row.output, bullet = i, "skipping bullet without words");
            continue;
        }
        if !bullets.is_empty() {
            t += timing.bullet_pause;
        }
        let block = CaptionBlock::allocate(BlockRole::Bullet(i), text, t, each)?;
        t = block.end;
        bullets.push(block);
    }
    if let Some(last) = bullets.last()
        && last.end > duration + TIME_EPS
    {
        return Err(ReelError::validation(format!(
            "row '{}': {} bullets of {each:.2}s run until {:.2}s, past the {duration}s duration",
            row.output,
            bullets.len(),
            last.end
        )));
    }

    let cta_start = (duration - timing.cta_window).max(0.0);
    let cta = CaptionBlock::allocate(BlockRole::CallToAction, &row.cta, cta_start, duration - cta_start)?;

    Ok(CaptionSchedule {
        duration,
        hook,
        bullets,
        cta,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/timing/schedule.rs"]
mod tests;
