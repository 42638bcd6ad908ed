use crate::{
    config::MotionConfig,
    footage::selector::FootageClip,
    foundation::{
        core::Canvas,
        error::{ReelError, ReelResult},
    },
};

/// Scale-then-center-crop mapping of a source frame onto the canvas.
///
/// The scale is uniform; the axis that overshoots the canvas is cropped symmetrically, so the
/// output always fills the canvas without letterboxing.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FitGeometry {
    pub scale: f64,
    pub scaled_width: u32,
    pub scaled_height: u32,
    pub crop_x: u32,
    pub crop_y: u32,
    pub out_width: u32,
    pub out_height: u32,
}

impl FitGeometry {
    pub fn for_source(src_width: u32, src_height: u32, canvas: Canvas) -> ReelResult<Self> {
        if src_width == 0 || src_height == 0 {
            return Err(ReelError::validation(format!(
                "source frame {src_width}x{src_height} has no area"
            )));
        }
        let src_ratio = f64::from(src_width) / f64::from(src_height);
        let (scale, scaled_width, scaled_height) = if src_ratio > canvas.aspect_ratio() {
            // Wider than the canvas: match heights, crop the sides.
            let scale = f64::from(canvas.height) / f64::from(src_height);
            let w = ((f64::from(src_width) * scale).round() as u32).max(canvas.width);
            (scale, w, canvas.height)
        } else {
            // Taller or equal: match widths, crop top and bottom.
            let scale = f64::from(canvas.width) / f64::from(src_width);
            let h = ((f64::from(src_height) * scale).round() as u32).max(canvas.height);
            (scale, canvas.width, h)
        };
        Ok(Self {
            scale,
            scaled_width,
            scaled_height,
            crop_x: (scaled_width - canvas.width) / 2,
            crop_y: (scaled_height - canvas.height) / 2,
            out_width: canvas.width,
            out_height: canvas.height,
        })
    }

    /// Geometry of a source that already matches the canvas.
    pub fn identity(canvas: Canvas) -> Self {
        Self {
            scale: 1.0,
            scaled_width: canvas.width,
            scaled_height: canvas.height,
            crop_x: 0,
            crop_y: 0,
            out_width: canvas.width,
            out_height: canvas.height,
        }
    }

    pub fn is_identity(&self) -> bool {
        self.scale == 1.0 && self.crop_x == 0 && self.crop_y == 0
    }
}

/// Slow linear zoom-in over a clip's duration (Ken-Burns motion).
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct KenBurns {
    pub start_scale: f64,
    pub end_scale: f64,
    pub duration: f64,
}

impl KenBurns {
    /// Zoom factor after `elapsed` seconds of the clip; held at the ends outside the clip.
    pub fn scale_at(&self, elapsed: f64) -> f64 {
        let t = if self.duration > 0.0 {
            (elapsed / self.duration).clamp(0.0, 1.0)
        } else {
            1.0
        };
        self.start_scale + (self.end_scale - self.start_scale) * t
    }
}

/// A clip with its fit, zoom and edge fades resolved.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FittedClip {
    pub clip: FootageClip,
    pub geometry: FitGeometry,
    pub zoom: KenBurns,
    pub fade_in: f64,
    pub fade_out: f64,
}

/// Resolve the canvas mapping of one clip. Pure; clips do not influence each other.
pub fn fit_clip(clip: FootageClip, canvas: Canvas, motion: &MotionConfig) -> ReelResult<FittedClip> {
    if !clip.duration.is_finite() || clip.duration <= 0.0 {
        return Err(ReelError::validation(format!(
            "clip duration {} must be finite and > 0",
            clip.duration
        )));
    }
    let geometry = if clip.is_solid() {
        FitGeometry::identity(canvas)
    } else {
        FitGeometry::for_source(clip.width, clip.height, canvas)?
    };
    let fade = motion.clip_fade_sec.min(clip.duration / 2.0);
    Ok(FittedClip {
        zoom: KenBurns {
            start_scale: motion.zoom_start,
            end_scale: motion.zoom_end,
            duration: clip.duration,
        },
        geometry,
        fade_in: fade,
        fade_out: fade,
        clip,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/footage/fit.rs"]
mod tests;
