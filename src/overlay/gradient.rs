use image::{Rgba, RgbaImage};

use crate::{
    config::GradientWeights,
    foundation::{
        core::{Canvas, Rgb8},
        error::{ReelError, ReelResult},
    },
};

/// Opacity of the legibility mask at normalized height `t` (0 = top, 1 = bottom).
///
/// Average of a top ramp, a center peak and a bottom ramp, clamped to `[0, max_alpha]`.
pub fn gradient_alpha(t: f64, w: &GradientWeights) -> f64 {
    let t = t.clamp(0.0, 1.0);
    let top = w.top * (1.0 - t);
    let mid = w.mid * (1.0 - (2.0 * t - 1.0).abs());
    let bottom = w.bottom * t;
    ((top + mid + bottom) / 3.0).clamp(0.0, w.max_alpha)
}

/// Static brand-tinted translucency mask, one alpha value per canvas row.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct GradientMask {
    pub color: Rgb8,
    pub width: u32,
    pub weights: GradientWeights,
    /// Alpha for rows `0..height`.
    pub alphas: Vec<f64>,
}

impl GradientMask {
    pub fn synthesize(color: Rgb8, canvas: Canvas, weights: &GradientWeights) -> ReelResult<Self> {
        if canvas.height == 0 || canvas.width == 0 {
            return Err(ReelError::validation("gradient canvas must have an area"));
        }
        let h = f64::from(canvas.height);
        let alphas = (0..canvas.height)
            .map(|y| gradient_alpha(f64::from(y) / h, weights))
            .collect();
        Ok(Self {
            color,
            width: canvas.width,
            weights: *weights,
            alphas,
        })
    }

    pub fn height(&self) -> u32 {
        self.alphas.len() as u32
    }

    /// Alpha at row `y`. `y == height` evaluates the bottom edge (`t = 1`).
    pub fn alpha_at(&self, y: u32) -> f64 {
        match self.alphas.get(y as usize) {
            Some(a) => *a,
            None => gradient_alpha(1.0, &self.weights),
        }
    }

    pub fn to_rgba_image(&self) -> RgbaImage {
        let Rgb8 { r, g, b } = self.color;
        RgbaImage::from_fn(self.width, self.height(), |_, y| {
            let a = (self.alphas[y as usize] * 255.0).round() as u8;
            Rgba([r, g, b, a])
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/overlay/gradient.rs"]
mod tests;
