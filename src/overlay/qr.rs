use image::{Rgba, RgbaImage};
use qrcode::{Color, EcLevel, QrCode};

use crate::foundation::error::{ReelError, ReelResult};

/// Light modules kept around the code inside the badge.
pub const QR_BORDER_MODULES: u32 = 1;

/// Side length in pixels of a QR badge of `modules` cells at `box_px` each.
pub fn qr_side(modules: u32, box_px: u32) -> ReelResult<u32> {
    modules.checked_mul(box_px).ok_or_else(|| {
        ReelError::validation(format!("qr badge of {modules} x {box_px} px overflows"))
    })
}

/// Render `url` as an opaque black-on-white QR badge of exactly `qr_side(modules, box_px)`
/// pixels.
///
/// Every module is drawn as a whole-pixel square, as large as fits with a one-module light
/// border; leftover pixels pad the badge evenly in white.
pub fn render_qr(url: &str, modules: u32, box_px: u32) -> ReelResult<RgbaImage> {
    if url.trim().is_empty() {
        return Err(ReelError::validation("qr url must be non-empty"));
    }
    let side = qr_side(modules, box_px)?;
    if side == 0 {
        return Err(ReelError::validation("qr badge size must be > 0"));
    }
    let code = QrCode::with_error_correction_level(url.as_bytes(), EcLevel::M)
        .map_err(|e| ReelError::validation(format!("qr '{url}': {e}")))?;
    let width = u32::try_from(code.width())
        .map_err(|_| ReelError::validation(format!("qr '{url}' is too large")))?;
    let span = width + 2 * QR_BORDER_MODULES;
    let cell = side / span;
    if cell == 0 {
        return Err(ReelError::validation(format!(
            "qr '{url}' needs {span} modules but the badge is only {side}px"
        )));
    }
    let origin = (side - cell * span) / 2 + cell * QR_BORDER_MODULES;
    let colors = code.to_colors();

    Ok(RgbaImage::from_fn(side, side, |x, y| {
        let dark = x >= origin && y >= origin && {
            let (mx, my) = ((x - origin) / cell, (y - origin) / cell);
            mx < width && my < width && colors[(my * width + mx) as usize] == Color::Dark
        };
        let v = if dark { 0 } else { 255 };
        Rgba([v, v, v, 255])
    }))
}

#[cfg(test)]
#[path = "../../tests/unit/overlay/qr.rs"]
mod tests;
