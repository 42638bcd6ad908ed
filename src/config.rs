//! Immutable configuration shared by every row of a batch.
//!
//! All constants that shape a reel (canvas, encoder profile, caption timing, overlay geometry)
//! live here and are passed explicitly into the builders. A config file only needs to name the
//! fields it overrides; everything else falls back to [`ReelConfig::default`].

use std::{fs::File, io::BufReader, path::Path, path::PathBuf};

use crate::foundation::{
    core::{Canvas, Fps, Rgb8},
    error::{ReelError, ReelResult},
};

/// Root configuration value.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ReelConfig {
    /// Output profile handed to the encoder.
    pub profile: RenderProfile,
    /// Caption timing windows.
    pub timing: TimingConfig,
    /// Readability gradient weights.
    pub gradient: GradientWeights,
    /// Footage fitting and caption motion.
    pub motion: MotionConfig,
    /// Logo, QR and caption band geometry.
    pub badges: BadgeConfig,
    /// Values substituted for blank table cells.
    pub defaults: RowDefaults,
    /// Hashtag vocabulary for caption files.
    pub hashtags: HashtagConfig,
    /// Title ribbon of the still thumbnail.
    pub thumbnail: ThumbnailConfig,
    /// Gain applied to background music.
    pub music_gain: f64,
    /// Font used for captions and thumbnails; ffmpeg's default sans face when unset.
    pub font_file: Option<PathBuf>,
}

impl Default for ReelConfig {
    fn default() -> Self {
        Self {
            profile: RenderProfile::default(),
            timing: TimingConfig::default(),
            gradient: GradientWeights::default(),
            motion: MotionConfig::default(),
            badges: BadgeConfig::default(),
            defaults: RowDefaults::default(),
            hashtags: HashtagConfig::default(),
            thumbnail: ThumbnailConfig::default(),
            music_gain: 0.25,
            font_file: None,
        }
    }
}

impl ReelConfig {
    /// Parse a config from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> ReelResult<Self> {
        serde_json::from_reader(r).map_err(|e| ReelError::serde(format!("parse config JSON: {e}")))
    }

    /// Parse a config from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> ReelResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            ReelError::input(format!("open config JSON '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Check cross-field invariants.
    pub fn validate(&self) -> ReelResult<()> {
        self.profile.canvas.validate()?;
        Fps::new(self.profile.fps.num, self.profile.fps.den)?;
        self.timing.validate()?;
        self.gradient.validate()?;
        self.badges.validate()?;
        let qr = crate::overlay::qr::qr_side(self.badges.qr_modules, self.badges.qr_box_px)?;
        let canvas = self.profile.canvas;
        if qr == 0 || qr > canvas.width.min(canvas.height) {
            return Err(ReelError::validation(format!(
                "qr badge of {qr}px must be > 0 and fit the {}x{} canvas",
                canvas.width, canvas.height
            )));
        }
        if !self.music_gain.is_finite() || self.music_gain < 0.0 {
            return Err(ReelError::validation("music_gain must be finite and >= 0"));
        }
        if self.motion.zoom_end < self.motion.zoom_start || self.motion.zoom_start <= 0.0 {
            return Err(ReelError::validation(
                "motion zoom must be positive and non-decreasing",
            ));
        }
        for (name, v) in [
            ("clip_fade_sec", self.motion.clip_fade_sec),
            ("concat_overlap_sec", self.motion.concat_overlap_sec),
            ("caption_crossfade_sec", self.motion.caption_crossfade_sec),
            ("footage_margin_sec", self.motion.footage_margin_sec),
        ] {
            if !v.is_finite() || v < 0.0 {
                return Err(ReelError::validation(format!(
                    "motion {name} must be finite and >= 0"
                )));
            }
        }
        Ok(())
    }
}

/// Fixed output profile: one canvas, one frame rate, one codec setup.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct RenderProfile {
    pub canvas: Canvas,
    pub fps: Fps,
    pub video_codec: String,
    pub video_bitrate: String,
    pub pixel_format: String,
    pub preset: String,
    pub audio_codec: String,
}

impl Default for RenderProfile {
    fn default() -> Self {
        Self {
            canvas: Canvas::VERTICAL_HD,
            fps: Fps { num: 30, den: 1 },
            video_codec: "libx264".to_owned(),
            video_bitrate: "8000k".to_owned(),
            pixel_format: "yuv420p".to_owned(),
            preset: "medium".to_owned(),
            audio_codec: "aac".to_owned(),
        }
    }
}

/// Caption block windows, in seconds.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    pub hook_start: f64,
    pub hook_window: f64,
    /// Pause between the end of the hook and the first bullet.
    pub hook_pause: f64,
    /// Pause between consecutive bullets.
    pub bullet_pause: f64,
    pub min_bullet_window: f64,
    /// Seconds of the row duration not shared out among bullets (hook + cta).
    pub reserved_window: f64,
    pub cta_window: f64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            hook_start: 0.0,
            hook_window: 3.0,
            hook_pause: 0.2,
            bullet_pause: 0.3,
            min_bullet_window: 1.6,
            reserved_window: 6.0,
            cta_window: 3.0,
        }
    }
}

impl TimingConfig {
    fn validate(&self) -> ReelResult<()> {
        for (name, v) in [
            ("hook_start", self.hook_start),
            ("hook_pause", self.hook_pause),
            ("bullet_pause", self.bullet_pause),
            ("reserved_window", self.reserved_window),
        ] {
            if !v.is_finite() || v < 0.0 {
                return Err(ReelError::validation(format!(
                    "timing {name} must be finite and >= 0"
                )));
            }
        }
        for (name, v) in [
            ("hook_window", self.hook_window),
            ("min_bullet_window", self.min_bullet_window),
            ("cta_window", self.cta_window),
        ] {
            if !v.is_finite() || v <= 0.0 {
                return Err(ReelError::validation(format!(
                    "timing {name} must be finite and > 0"
                )));
            }
        }
        Ok(())
    }
}

/// Weights of the three gradient terms.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct GradientWeights {
    pub top: f64,
    pub mid: f64,
    pub bottom: f64,
    pub max_alpha: f64,
}

impl Default for GradientWeights {
    fn default() -> Self {
        Self {
            top: 0.65,
            mid: 0.25,
            bottom: 0.65,
            max_alpha: 0.85,
        }
    }
}

impl GradientWeights {
    fn validate(&self) -> ReelResult<()> {
        for (name, v) in [
            ("top", self.top),
            ("mid", self.mid),
            ("bottom", self.bottom),
            ("max_alpha", self.max_alpha),
        ] {
            if !v.is_finite() || !(0.0..=1.0).contains(&v) {
                return Err(ReelError::validation(format!(
                    "gradient {name} must be within [0, 1]"
                )));
            }
        }
        Ok(())
    }
}

/// Footage and caption motion parameters.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct MotionConfig {
    pub zoom_start: f64,
    pub zoom_end: f64,
    pub clip_fade_sec: f64,
    pub concat_overlap_sec: f64,
    pub footage_margin_sec: f64,
    pub caption_crossfade_sec: f64,
    /// Vertical entry offset of captions, in pixels.
    pub settle_amplitude_px: f64,
    /// Angular rate (radians per second) of the entry motion.
    pub settle_rate: f64,
    /// Upper bound of the entry motion angle, in radians.
    pub settle_max_angle: f64,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            zoom_start: 1.0,
            zoom_end: 1.03,
            clip_fade_sec: 0.1,
            concat_overlap_sec: 0.2,
            footage_margin_sec: 2.0,
            caption_crossfade_sec: 0.2,
            settle_amplitude_px: 40.0,
            settle_rate: std::f64::consts::PI,
            settle_max_angle: 1.0,
        }
    }
}

/// Geometry of badges and caption bands, as fractions of the canvas.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct BadgeConfig {
    pub logo_width_frac: f64,
    pub logo_margin_frac: f64,
    pub logo_opacity: f64,
    pub qr_box_px: u32,
    pub qr_modules: u32,
    /// QR offset from the right and bottom edges, as a fraction of canvas width.
    pub qr_offset_frac: f64,
    pub hook_band_frac: f64,
    pub bullet_band_frac: f64,
    pub cta_band_frac: f64,
    pub hook_font_px: u32,
    pub bullet_font_px: u32,
    pub cta_font_px: u32,
    pub caption_width_frac: f64,
    pub bullet_marker: String,
}

impl BadgeConfig {
    fn validate(&self) -> ReelResult<()> {
        for (name, v) in [
            ("logo_width_frac", self.logo_width_frac),
            ("caption_width_frac", self.caption_width_frac),
        ] {
            if !v.is_finite() || v <= 0.0 || v > 1.0 {
                return Err(ReelError::validation(format!("badges {name} must be in (0, 1]")));
            }
        }
        for (name, v) in [
            ("logo_margin_frac", self.logo_margin_frac),
            ("logo_opacity", self.logo_opacity),
            ("qr_offset_frac", self.qr_offset_frac),
            ("hook_band_frac", self.hook_band_frac),
            ("bullet_band_frac", self.bullet_band_frac),
            ("cta_band_frac", self.cta_band_frac),
        ] {
            if !(0.0..=1.0).contains(&v) {
                return Err(ReelError::validation(format!("badges {name} must be in [0, 1]")));
            }
        }
        for (name, v) in [
            ("hook_font_px", self.hook_font_px),
            ("bullet_font_px", self.bullet_font_px),
            ("cta_font_px", self.cta_font_px),
        ] {
            if v == 0 {
                return Err(ReelError::validation(format!("badges {name} must be > 0")));
            }
        }
        Ok(())
    }
}

impl Default for BadgeConfig {
    fn default() -> Self {
        Self {
            logo_width_frac: 0.18,
            logo_margin_frac: 0.04,
            logo_opacity: 0.95,
            qr_box_px: 6,
            qr_modules: 29,
            qr_offset_frac: 0.26,
            hook_band_frac: 0.20,
            bullet_band_frac: 0.72,
            cta_band_frac: 0.86,
            hook_font_px: 92,
            bullet_font_px: 70,
            cta_font_px: 72,
            caption_width_frac: 0.9,
            bullet_marker: "• ".to_owned(),
        }
    }
}

/// Fallbacks for blank table cells.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct RowDefaults {
    pub title: String,
    pub hook: String,
    pub bullets: Vec<String>,
    pub cta: String,
    pub footage_dir: PathBuf,
    pub duration_sec: u32,
    pub brand_color: Rgb8,
    pub qr_url: String,
    pub output: String,
}

impl Default for RowDefaults {
    fn default() -> Self {
        Self {
            title: "Reel".to_owned(),
            hook: "Quick tip you can use today".to_owned(),
            bullets: vec![
                "Learn fast".to_owned(),
                "Build smarter".to_owned(),
                "Ship today".to_owned(),
            ],
            cta: "Tap the link • Learn more • Enroll now".to_owned(),
            footage_dir: PathBuf::from("assets/footage"),
            duration_sec: 22,
            brand_color: Rgb8::new(0x1e, 0x40, 0xaf),
            qr_url: "https://example.org".to_owned(),
            output: "reel.mp4".to_owned(),
        }
    }
}

/// Title ribbon drawn over the thumbnail frame.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ThumbnailConfig {
    /// Ribbon height as a fraction of the canvas height.
    pub ribbon_frac: f64,
    pub ribbon_alpha: u8,
    pub title_wrap_chars: usize,
    pub title_x_frac: f64,
    pub title_y_frac: f64,
    pub title_font_px: u32,
}

impl Default for ThumbnailConfig {
    fn default() -> Self {
        Self {
            ribbon_frac: 0.18,
            ribbon_alpha: 210,
            title_wrap_chars: 22,
            title_x_frac: 0.05,
            title_y_frac: 0.045,
            title_font_px: 64,
        }
    }
}

/// Hashtag vocabulary used by caption files.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct HashtagConfig {
    pub base: Vec<String>,
    pub topics: Vec<HashtagTopic>,
    pub max_tags: usize,
    /// Fixed closing line of every caption file.
    pub trailer: String,
}

/// Tags appended when any keyword appears in a title.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct HashtagTopic {
    pub keywords: Vec<String>,
    pub tags: Vec<String>,
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_owned()).collect()
}

impl Default for HashtagConfig {
    fn default() -> Self {
        Self {
            base: strings(&[
                "#workforce",
                "#careertraining",
                "#edtech",
                "#apprenticeship",
                "#learnandearn",
                "#reskilling",
                "#upskilling",
                "#entrepreneurship",
                "#studentSuccess",
                "#community",
            ]),
            topics: vec![
                HashtagTopic {
                    keywords: strings(&["tech", "it", "coding", "software", "developer", "programming"]),
                    tags: strings(&["#techcareers", "#coding", "#softwaredeveloper", "#learntocode"]),
                },
                HashtagTopic {
                    keywords: strings(&["healthcare", "medical", "nursing", "ehr", "health"]),
                    tags: strings(&["#healthcare", "#medicalcareers", "#nursing", "#healthIT"]),
                },
                HashtagTopic {
                    keywords: strings(&["data", "ai", "machine learning", "analytics"]),
                    tags: strings(&["#datascience", "#AI", "#machinelearning", "#analytics"]),
                },
                HashtagTopic {
                    keywords: strings(&["business", "management", "project", "hr"]),
                    tags: strings(&["#businessskills", "#projectmanagement", "#leadership"]),
                },
                HashtagTopic {
                    keywords: strings(&["ui", "design", "ux", "figma", "brand", "creative"]),
                    tags: strings(&["#uiux", "#design", "#figma", "#webdesign", "#creative"]),
                },
            ],
            max_tags: 30,
            trailer: "#FreeTraining #CareerChange".to_owned(),
        }
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
