use std::path::PathBuf;

use crate::{
    footage::normalize::BackgroundPlan,
    foundation::core::{Point, Rgb8},
    overlay::gradient::GradientMask,
    timing::{allocator::TimedUnit, schedule::BlockRole},
};

/// Entry motion of a caption block.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Motion {
    /// Horizontally centered on `center_x`; the top edge eases from `base_y - amplitude`
    /// towards its rest offset as `base_y - amplitude * cos(min(max_angle, t * rate))`.
    Settle {
        center_x: f64,
        base_y: f64,
        amplitude: f64,
        rate: f64,
        max_angle: f64,
    },
}

impl Motion {
    /// Anchor point after `elapsed` seconds since the layer appeared. Pure in `elapsed`.
    ///
    /// For [`Motion::Settle`] the anchor is the top-center of the text block.
    pub fn position_at(&self, elapsed: f64) -> Point {
        match *self {
            Motion::Settle {
                center_x,
                base_y,
                amplitude,
                rate,
                max_angle,
            } => {
                let angle = (elapsed.max(0.0) * rate).min(max_angle);
                Point::new(center_x, base_y - amplitude * angle.cos())
            }
        }
    }
}

/// Where a layer is drawn.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Placement {
    /// Top-left corner, fixed for the layer's lifetime.
    Fixed { at: Point },
    Animated { motion: Motion },
}

impl Placement {
    pub fn fixed(x: f64, y: f64) -> Self {
        Placement::Fixed {
            at: Point::new(x, y),
        }
    }

    pub fn position_at(&self, elapsed: f64) -> Point {
        match self {
            Placement::Fixed { at } => *at,
            Placement::Animated { motion } => motion.position_at(elapsed),
        }
    }
}

/// A caption block ready for drawing.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct TextLayer {
    pub role: BlockRole,
    pub text: String,
    /// `text` broken into lines that fit `max_width`.
    pub lines: Vec<String>,
    pub font_px: u32,
    pub max_width: u32,
    pub color: Rgb8,
    /// Word timings of the block.
    pub words: Vec<TimedUnit>,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LayerKind {
    Background(BackgroundPlan),
    Gradient(GradientMask),
    Logo { source: PathBuf, width: u32 },
    Qr { url: String, side: u32 },
    Text(TextLayer),
}

impl LayerKind {
    /// Paint tier; layers of a composition appear in non-decreasing tier order.
    pub fn tier(&self) -> u8 {
        match self {
            LayerKind::Background(_) => 0,
            LayerKind::Gradient(_) => 1,
            LayerKind::Logo { .. } => 2,
            LayerKind::Qr { .. } => 3,
            LayerKind::Text(_) => 4,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            LayerKind::Background(_) => "background",
            LayerKind::Gradient(_) => "gradient",
            LayerKind::Logo { .. } => "logo",
            LayerKind::Qr { .. } => "qr",
            LayerKind::Text(_) => "text",
        }
    }
}

/// One visual element of a composition with its time window.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct Layer {
    pub kind: LayerKind,
    pub start: f64,
    pub duration: f64,
    pub placement: Placement,
    pub opacity: f64,
    pub fade_in: f64,
    pub fade_out: f64,
}

impl Layer {
    /// A fully opaque, unfaded layer.
    pub fn new(kind: LayerKind, start: f64, duration: f64, placement: Placement) -> Self {
        Self {
            kind,
            start,
            duration,
            placement,
            opacity: 1.0,
            fade_in: 0.0,
            fade_out: 0.0,
        }
    }

    pub fn end(&self) -> f64 {
        self.start + self.duration
    }

    pub fn is_active_at(&self, t: f64) -> bool {
        t >= self.start && t < self.end()
    }

    pub fn as_text(&self) -> Option<&TextLayer> {
        match &self.kind {
            LayerKind::Text(text) => Some(text),
            _ => None,
        }
    }
}

/// Greedy word wrap to at most `max_chars` characters per line. Words longer than a line
/// get a line of their own.
pub fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut lines = Vec::new();
    let mut line = String::new();
    for word in text.split_whitespace() {
        let needed = if line.is_empty() {
            word.chars().count()
        } else {
            line.chars().count() + 1 + word.chars().count()
        };
        if needed > max_chars && !line.is_empty() {
            lines.push(std::mem::take(&mut line));
        }
        if !line.is_empty() {
            line.push(' ');
        }
        line.push_str(word);
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

/// Rough line capacity of a caption box: average glyph advance taken as 0.55 em.
pub fn chars_per_line(max_width: u32, font_px: u32) -> usize {
    let advance = f64::from(font_px.max(1)) * 0.55;
    ((f64::from(max_width) / advance).floor() as usize).max(1)
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/layer.rs"]
mod tests;
