use std::{
    fs::File,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use image::{Rgba, RgbaImage, imageops};

use crate::{
    config::BadgeConfig,
    footage::selector::ClipSource,
    foundation::error::{ReelError, ReelResult},
    overlay::qr::render_qr,
    render::{RenderBackend, RenderOutput, ThumbnailRequest, ensure_parent_dir},
    timeline::{
        composition::Composition,
        layer::{LayerKind, Placement},
    },
};

/// Stand-in for footage frames when drawing a thumbnail without decoding video.
const FOOTAGE_PLACEHOLDER: Rgba<u8> = Rgba([0x20, 0x20, 0x20, 0xff]);

/// Backend that describes instead of encoding: the composition is written as JSON next to
/// the requested output, and thumbnails are drawn from the static layers alone.
#[derive(Clone, Debug, Default)]
pub struct DryRunBackend {
    pub badges: BadgeConfig,
}

impl DryRunBackend {
    pub fn new(badges: BadgeConfig) -> Self {
        Self { badges }
    }

    /// `<dir>/<stem>.composition.json` for an output of `<dir>/<stem>.<ext>`.
    pub fn description_path(out: &Path) -> PathBuf {
        out.with_extension("composition.json")
    }

    /// Rasterize the static layers active at `t`: background color, gradient, QR badge.
    pub fn still_frame(&self, comp: &Composition, t: f64) -> ReelResult<RgbaImage> {
        let canvas = comp.canvas();
        let mut frame = RgbaImage::from_pixel(canvas.width, canvas.height, FOOTAGE_PLACEHOLDER);
        for layer in comp.layers().iter().filter(|l| l.is_active_at(t)) {
            match &layer.kind {
                LayerKind::Background(plan) => {
                    let seg = plan
                        .segments
                        .iter()
                        .rev()
                        .find(|s| s.start <= t && t < s.end);
                    let solid = seg
                        .and_then(|s| plan.clips.get(s.clip))
                        .and_then(|c| match c.clip.source {
                            ClipSource::Solid(color) => Some(color),
                            ClipSource::File(_) => None,
                        });
                    if let Some(c) = solid {
                        frame = RgbaImage::from_pixel(canvas.width, canvas.height, Rgba([c.r, c.g, c.b, 0xff]));
                    }
                }
                LayerKind::Gradient(mask) => {
                    imageops::overlay(&mut frame, &mask.to_rgba_image(), 0, 0);
                }
                LayerKind::Qr { url, .. } => {
                    let qr = render_qr(url, self.badges.qr_modules, self.badges.qr_box_px)?;
                    if let Placement::Fixed { at } = layer.placement {
                        imageops::overlay(&mut frame, &qr, at.x.round() as i64, at.y.round() as i64);
                    }
                }
                // Logos and captions need decoding and font shaping; the encoder draws them.
                LayerKind::Logo { .. } | LayerKind::Text(_) => {}
            }
        }
        Ok(frame)
    }
}

impl RenderBackend for DryRunBackend {
    fn render(&self, comp: &Composition, out: &Path) -> ReelResult<RenderOutput> {
        let path = Self::description_path(out);
        ensure_parent_dir(&path)?;
        let f = File::create(&path)
            .map_err(|e| ReelError::encode(format!("create '{}': {e}", path.display())))?;
        let mut w = BufWriter::new(f);
        serde_json::to_writer_pretty(&mut w, comp)
            .map_err(|e| ReelError::serde(format!("write composition JSON: {e}")))?;
        w.flush()
            .map_err(|e| ReelError::encode(format!("write '{}': {e}", path.display())))?;
        tracing::info!(path = %path.display(), "dry run: wrote composition");
        Ok(RenderOutput {
            path,
            frames: comp.frame_count(),
            duration: comp.duration(),
            has_audio: comp.audio().is_some(),
        })
    }

    fn thumbnail(
        &self,
        comp: &Composition,
        _rendered: &RenderOutput,
        req: &ThumbnailRequest<'_>,
        out: &Path,
    ) -> ReelResult<PathBuf> {
        ensure_parent_dir(out)?;
        let mut frame = self.still_frame(comp, comp.duration() / 2.0)?;
        let canvas = comp.canvas();
        let ribbon_h = ((f64::from(canvas.height) * req.style.ribbon_frac).round() as u32).max(1);
        let c = req.brand_color;
        let ribbon = RgbaImage::from_pixel(
            canvas.width,
            ribbon_h,
            Rgba([c.r, c.g, c.b, req.style.ribbon_alpha]),
        );
        imageops::overlay(&mut frame, &ribbon, 0, 0);
        frame
            .save_with_format(out, image::ImageFormat::Png)
            .map_err(|e| ReelError::encode(format!("write '{}': {e}", out.display())))?;
        Ok(out.to_path_buf())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/dry_run.rs"]
mod tests;
