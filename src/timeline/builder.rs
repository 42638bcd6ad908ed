use crate::{
    config::{BadgeConfig, MotionConfig, ReelConfig},
    content::row::ContentRow,
    footage::normalize::BackgroundPlan,
    foundation::{
        core::{Canvas, Rgb8},
        error::{ReelError, ReelResult},
    },
    overlay::{gradient::GradientMask, qr::qr_side},
    timeline::{
        composition::Composition,
        layer::{Layer, LayerKind, Motion, Placement, TextLayer, chars_per_line, wrap_text},
    },
    timing::schedule::{BlockRole, CaptionBlock, CaptionSchedule, TIME_EPS},
};

const CAPTION_COLOR: Rgb8 = Rgb8::new(0xff, 0xff, 0xff);

/// Assemble the layers of one row in paint order: background, gradient, logo, QR badge,
/// hook, bullets, call-to-action.
///
/// The logo is dropped (with a warning) when its file is missing; the QR badge is present
/// whenever the row has a destination URL. Captions without words produce no layer.
pub fn build_composition(
    row: &ContentRow,
    schedule: &CaptionSchedule,
    background: BackgroundPlan,
    cfg: &ReelConfig,
) -> ReelResult<Composition> {
    let canvas = cfg.profile.canvas;
    let duration = schedule.duration;
    if (background.duration - duration).abs() > TIME_EPS {
        return Err(ReelError::validation(format!(
            "background lasts {:.3}s but the row lasts {duration:.3}s",
            background.duration
        )));
    }

    let mut layers = vec![
        Layer::new(
            LayerKind::Background(background),
            0.0,
            duration,
            Placement::fixed(0.0, 0.0),
        ),
        Layer::new(
            LayerKind::Gradient(GradientMask::synthesize(
                row.brand_color,
                canvas,
                &cfg.gradient,
            )?),
            0.0,
            duration,
            Placement::fixed(0.0, 0.0),
        ),
    ];
    layers.extend(logo_layer(row, canvas, &cfg.badges, duration));
    layers.extend(qr_layer(row, canvas, &cfg.badges, duration)?);

    let b = &cfg.badges;
    let captions = std::iter::once((&schedule.hook, b.hook_band_frac, b.hook_font_px))
        .chain(
            schedule
                .bullets
                .iter()
                .map(|blk| (blk, b.bullet_band_frac, b.bullet_font_px)),
        )
        .chain(std::iter::once((&schedule.cta, b.cta_band_frac, b.cta_font_px)));
    for (block, band, font_px) in captions {
        if let Some(layer) = caption_layer(block, band, font_px, canvas, cfg) {
            layers.push(layer);
        }
    }

    Composition::new(canvas, cfg.profile.fps, duration, layers)
}

fn logo_layer(row: &ContentRow, canvas: Canvas, badges: &BadgeConfig, duration: f64) -> Option<Layer> {
    let path = row.logo.as_ref()?;
    if !path.is_file() {
        tracing::warn!(row = %row.output, logo = %path.display(), "logo not found, skipping");
        return None;
    }
    let w = f64::from(canvas.width);
    let h = f64::from(canvas.height);
    let mut layer = Layer::new(
        LayerKind::Logo {
            source: path.clone(),
            width: (w * badges.logo_width_frac).round() as u32,
        },
        0.0,
        duration,
        Placement::fixed(w * badges.logo_margin_frac, h * badges.logo_margin_frac),
    );
    layer.opacity = badges.logo_opacity;
    Some(layer)
}

fn qr_layer(
    row: &ContentRow,
    canvas: Canvas,
    badges: &BadgeConfig,
    duration: f64,
) -> ReelResult<Option<Layer>> {
    let Some(url) = row.qr_url.as_ref() else {
        return Ok(None);
    };
    let w = f64::from(canvas.width);
    let h = f64::from(canvas.height);
    let offset = w * badges.qr_offset_frac;
    Ok(Some(Layer::new(
        LayerKind::Qr {
            url: url.clone(),
            side: qr_side(badges.qr_modules, badges.qr_box_px)?,
        },
        0.0,
        duration,
        Placement::fixed(w - offset, h - offset),
    )))
}

fn caption_layer(
    block: &CaptionBlock,
    band_frac: f64,
    font_px: u32,
    canvas: Canvas,
    cfg: &ReelConfig,
) -> Option<Layer> {
    if block.units.is_empty() {
        return None;
    }
    let text = match block.role {
        BlockRole::Bullet(_) => format!("{}{}", cfg.badges.bullet_marker, block.text),
        BlockRole::Hook | BlockRole::CallToAction => block.text.clone(),
    };
    let max_width = (f64::from(canvas.width) * cfg.badges.caption_width_frac).round() as u32;
    let lines = wrap_text(&text, chars_per_line(max_width, font_px));
    let mut layer = Layer::new(
        LayerKind::Text(TextLayer {
            role: block.role,
            text,
            lines,
            font_px,
            max_width,
            color: CAPTION_COLOR,
            words: block.units.clone(),
        }),
        block.start,
        block.duration(),
        Placement::Animated {
            motion: settle_motion(canvas, band_frac, &cfg.motion),
        },
    );
    layer.fade_in = cfg.motion.caption_crossfade_sec.min(block.duration() / 2.0);
    Some(layer)
}

fn settle_motion(canvas: Canvas, band_frac: f64, motion: &MotionConfig) -> Motion {
    Motion::Settle {
        center_x: f64::from(canvas.width) / 2.0,
        base_y: f64::from(canvas.height) * band_frac,
        amplitude: motion.settle_amplitude_px,
        rate: motion.settle_rate,
        max_angle: motion.settle_max_angle,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/builder.rs"]
mod tests;
