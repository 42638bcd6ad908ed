use std::path::{Path, PathBuf};

use rand::{SeedableRng, rngs::StdRng, seq::SliceRandom};

use crate::{
    footage::probe::MediaProbe,
    foundation::core::{Canvas, Rgb8},
};

/// Extensions accepted as footage, matched case-insensitively.
pub const FOOTAGE_EXTENSIONS: [&str; 3] = ["mp4", "mov", "mkv"];

/// Where a clip's frames come from.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClipSource {
    File(PathBuf),
    /// Synthetic canvas-sized color clip used when no footage is available.
    Solid(Rgb8),
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FootageClip {
    pub source: ClipSource,
    pub duration: f64,
    pub width: u32,
    pub height: u32,
}

impl FootageClip {
    pub fn solid(color: Rgb8, canvas: Canvas, duration: f64) -> Self {
        Self {
            source: ClipSource::Solid(color),
            duration,
            width: canvas.width,
            height: canvas.height,
        }
    }

    pub fn aspect_ratio(&self) -> f64 {
        f64::from(self.width) / f64::from(self.height)
    }

    pub fn is_solid(&self) -> bool {
        matches!(self.source, ClipSource::Solid(_))
    }
}

/// Clips chosen to cover a requested duration, in playback order.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct ClipPlan {
    pub clips: Vec<FootageClip>,
    pub requested: f64,
    /// Candidates that failed to open.
    pub skipped: Vec<PathBuf>,
}

impl ClipPlan {
    pub fn total_duration(&self) -> f64 {
        self.clips.iter().map(|c| c.duration).sum()
    }

    /// `true` when the plan is the synthetic solid-color fallback.
    pub fn is_fallback(&self) -> bool {
        self.clips.len() == 1 && self.clips[0].is_solid()
    }
}

/// Decides the order in which candidate clips are tried.
///
/// Any order is acceptable to the selector; the seam exists so tests can pin it down.
pub trait ClipOrder {
    fn arrange(&mut self, candidates: &mut [PathBuf]);
}

/// Random order, optionally seeded for reproducible batches.
#[derive(Debug)]
pub struct ShuffleOrder {
    rng: StdRng,
}

impl ShuffleOrder {
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn from_os_rng() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }
}

impl ClipOrder for ShuffleOrder {
    fn arrange(&mut self, candidates: &mut [PathBuf]) {
        candidates.shuffle(&mut self.rng);
    }
}

/// Keeps the sorted directory order.
#[derive(Clone, Copy, Debug, Default)]
pub struct KeepOrder;

impl ClipOrder for KeepOrder {
    fn arrange(&mut self, _candidates: &mut [PathBuf]) {}
}

/// Inputs of one selection.
#[derive(Clone, Debug)]
pub struct FootageRequest<'a> {
    pub folder: &'a Path,
    pub required: f64,
    /// Extra seconds gathered beyond `required` before selection stops.
    pub margin: f64,
    pub canvas: Canvas,
    pub fallback_color: Rgb8,
}

/// Footage files directly inside `folder`, sorted by path.
///
/// A folder that does not exist simply has no candidates.
pub fn list_candidates(folder: &Path) -> Vec<PathBuf> {
    let opts = glob::MatchOptions {
        case_sensitive: false,
        ..glob::MatchOptions::new()
    };
    let base = glob::Pattern::escape(&folder.to_string_lossy());
    let mut out = Vec::new();
    for ext in FOOTAGE_EXTENSIONS {
        let pattern = format!("{base}/*.{ext}");
        match glob::glob_with(&pattern, opts) {
            Ok(paths) => out.extend(paths.filter_map(Result::ok).filter(|p| p.is_file())),
            Err(e) => tracing::warn!(%pattern, error = %e, "invalid footage pattern"),
        }
    }
    out.sort();
    out.dedup();
    out
}

/// Pick clips from `req.folder` until they cover `req.required + req.margin` seconds.
///
/// Never fails: an empty folder (or one where nothing opens) yields a single solid clip of
/// exactly the requested duration, and a folder whose clips are too short yields a shorter
/// plan that [`crate::normalize_duration`] loops. Clips that fail to probe are skipped.
pub fn select_footage(
    req: &FootageRequest<'_>,
    probe: &dyn MediaProbe,
    order: &mut dyn ClipOrder,
) -> ClipPlan {
    let mut candidates = list_candidates(req.folder);
    let fallback = |skipped: Vec<PathBuf>| ClipPlan {
        clips: vec![FootageClip::solid(
            req.fallback_color,
            req.canvas,
            req.required,
        )],
        requested: req.required,
        skipped,
    };

    if candidates.is_empty() {
        tracing::warn!(
            folder = %req.folder.display(),
            "no footage found, using solid background"
        );
        return fallback(Vec::new());
    }

    order.arrange(&mut candidates);

    let target = req.required + req.margin;
    let mut clips = Vec::new();
    let mut skipped = Vec::new();
    let mut total = 0.0;
    for path in candidates {
        let info = match probe.probe(&path) {
            Ok(info) => info,
            Err(e) => {
                tracing::warn!(clip = %path.display(), error = %e, "skipping footage clip");
                skipped.push(path);
                continue;
            }
        };
        let Some((width, height)) = info.video_size() else {
            tracing::warn!(clip = %path.display(), "skipping footage clip without video stream");
            skipped.push(path);
            continue;
        };
        total += info.duration_sec;
        clips.push(FootageClip {
            source: ClipSource::File(path),
            duration: info.duration_sec,
            width,
            height,
        });
        if total >= target {
            break;
        }
    }

    if clips.is_empty() {
        tracing::warn!(
            folder = %req.folder.display(),
            skipped = skipped.len(),
            "no footage clip could be opened, using solid background"
        );
        return fallback(skipped);
    }

    tracing::debug!(
        clips = clips.len(),
        total_sec = total,
        target_sec = target,
        "selected footage"
    );
    ClipPlan {
        clips,
        requested: req.required,
        skipped,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/footage/selector.rs"]
mod tests;
