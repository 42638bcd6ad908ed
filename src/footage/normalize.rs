use crate::{
    footage::fit::FittedClip,
    foundation::{
        core::Fps,
        error::{ReelError, ReelResult},
    },
    timing::schedule::TIME_EPS,
};

/// One placement of a fitted clip on the background timeline.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct BackgroundSegment {
    /// Index into [`BackgroundPlan::clips`].
    pub clip: usize,
    /// Window on the composition timeline, in seconds.
    pub start: f64,
    pub end: f64,
    /// In-point inside the source clip.
    pub source_start: f64,
    /// Loop pass this placement belongs to (0 for the first run through the clips).
    pub pass: u32,
}

impl BackgroundSegment {
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    /// Out-point inside the source clip.
    pub fn source_end(&self) -> f64 {
        self.source_start + self.duration()
    }
}

/// The continuous background stream: fitted clips placed, trimmed and looped to the
/// requested duration at a fixed frame rate.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct BackgroundPlan {
    pub clips: Vec<FittedClip>,
    pub segments: Vec<BackgroundSegment>,
    pub duration: f64,
    pub fps: Fps,
    /// `true` when the concatenated clips had to wrap around at least once.
    pub looped: bool,
}

impl BackgroundPlan {
    /// End of the last placed segment; equals `duration` for every plan produced by
    /// [`normalize_duration`].
    pub fn covered_until(&self) -> f64 {
        self.segments.iter().map(|s| s.end).fold(0.0, f64::max)
    }

    pub fn frame_count(&self) -> u64 {
        self.fps.secs_to_frames_round(self.duration)
    }
}

/// Concatenate `clips` with overlapping joins, then cut or loop the result to exactly
/// `required` seconds.
///
/// Each join overlaps by `overlap` seconds, reduced to half of the shorter neighbour so a
/// clip is never fully hidden. Loop passes are joined hard (no overlap).
pub fn normalize_duration(
    clips: Vec<FittedClip>,
    required: f64,
    overlap: f64,
    fps: Fps,
) -> ReelResult<BackgroundPlan> {
    if clips.is_empty() {
        return Err(ReelError::validation("background needs at least one clip"));
    }
    if !required.is_finite() || required <= 0.0 {
        return Err(ReelError::validation(format!(
            "background duration {required} must be finite and > 0"
        )));
    }
    if !overlap.is_finite() || overlap < 0.0 {
        return Err(ReelError::validation("clip overlap must be finite and >= 0"));
    }
    if let Some(bad) = clips
        .iter()
        .find(|c| !c.clip.duration.is_finite() || c.clip.duration <= 0.0)
    {
        return Err(ReelError::validation(format!(
            "clip duration {} must be finite and > 0",
            bad.clip.duration
        )));
    }

    // Offsets of each clip within one pass.
    let mut offsets = Vec::with_capacity(clips.len());
    let mut cursor = 0.0;
    for (i, c) in clips.iter().enumerate() {
        if i > 0 {
            let prev = clips[i - 1].clip.duration;
            cursor -= overlap.min(prev / 2.0).min(c.clip.duration / 2.0);
        }
        offsets.push(cursor);
        cursor += c.clip.duration;
    }
    let pass_len = cursor;

    let mut segments = Vec::new();
    let mut pass = 0u32;
    'passes: loop {
        let pass_start = f64::from(pass) * pass_len;
        for (i, c) in clips.iter().enumerate() {
            let start = pass_start + offsets[i];
            if start >= required - TIME_EPS {
                break 'passes;
            }
            segments.push(BackgroundSegment {
                clip: i,
                start,
                end: (start + c.clip.duration).min(required),
                source_start: 0.0,
                pass,
            });
        }
        if pass_start + pass_len >= required - TIME_EPS {
            break;
        }
        pass += 1;
    }

    // Snap the final edge so the plan ends exactly at `required`.
    if let Some(last) = segments.last_mut() {
        last.end = required;
    }

    tracing::debug!(
        clips = clips.len(),
        segments = segments.len(),
        pass_len_sec = pass_len,
        required_sec = required,
        loops = pass,
        "normalized background"
    );

    Ok(BackgroundPlan {
        clips,
        segments,
        duration: required,
        fps,
        looped: pass > 0,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/footage/normalize.rs"]
mod tests;
