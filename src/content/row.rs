use std::path::{Path, PathBuf};

use crate::{
    config::RowDefaults,
    foundation::{
        core::Rgb8,
        error::{ReelError, ReelResult},
    },
};

/// One table row exactly as read, every cell optional.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RawRow {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub hook: Option<String>,
    /// `;`-separated bullet list.
    #[serde(default)]
    pub bullets: Option<String>,
    #[serde(default)]
    pub cta: Option<String>,
    #[serde(default)]
    pub footage_dir: Option<String>,
    #[serde(default)]
    pub bg_music: Option<String>,
    #[serde(default)]
    pub duration: Option<String>,
    #[serde(default)]
    pub brand_color: Option<String>,
    #[serde(default)]
    pub logo: Option<String>,
    #[serde(default)]
    pub qr_url: Option<String>,
    #[serde(default)]
    pub output: Option<String>,
}

/// A fully defaulted, validated content row. Immutable once built.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct ContentRow {
    pub title: String,
    pub hook: String,
    pub bullets: Vec<String>,
    pub cta: String,
    pub footage_dir: PathBuf,
    pub music: Option<PathBuf>,
    pub duration_sec: u32,
    pub brand_color: Rgb8,
    pub logo: Option<PathBuf>,
    pub qr_url: Option<String>,
    /// Output file name, e.g. `demo_01.mp4`.
    pub output: String,
}

fn cell(v: &Option<String>) -> Option<&str> {
    v.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

impl ContentRow {
    /// Apply defaults to a raw row and validate the result.
    pub fn from_raw(raw: &RawRow, defaults: &RowDefaults) -> ReelResult<Self> {
        let mut bullets: Vec<String> = cell(&raw.bullets)
            .map(|s| {
                s.split(';')
                    .map(str::trim)
                    .filter(|b| !b.is_empty())
                    .map(str::to_owned)
                    .collect()
            })
            .unwrap_or_default();
        if bullets.is_empty() {
            bullets = defaults.bullets.clone();
        }

        let duration_sec = match cell(&raw.duration) {
            Some(s) => s.parse::<u32>().map_err(|e| {
                ReelError::validation(format!("duration '{s}' is not a whole number of seconds: {e}"))
            })?,
            None => defaults.duration_sec,
        };

        let brand_color = match cell(&raw.brand_color) {
            Some(s) => Rgb8::parse_hex(s)?,
            None => defaults.brand_color,
        };

        let qr_url = cell(&raw.qr_url)
            .map(str::to_owned)
            .or_else(|| Some(defaults.qr_url.trim().to_owned()).filter(|s| !s.is_empty()));

        let row = Self {
            title: cell(&raw.title).unwrap_or(&defaults.title).to_owned(),
            hook: cell(&raw.hook).unwrap_or(&defaults.hook).to_owned(),
            bullets,
            cta: cell(&raw.cta).unwrap_or(&defaults.cta).to_owned(),
            footage_dir: cell(&raw.footage_dir)
                .map(PathBuf::from)
                .unwrap_or_else(|| defaults.footage_dir.clone()),
            music: cell(&raw.bg_music).map(PathBuf::from),
            duration_sec,
            brand_color,
            logo: cell(&raw.logo).map(PathBuf::from),
            qr_url,
            output: cell(&raw.output).unwrap_or(&defaults.output).to_owned(),
        };
        row.validate()?;
        Ok(row)
    }

    /// Check the row invariants: positive duration, non-empty bullets, a usable output name.
    pub fn validate(&self) -> ReelResult<()> {
        if self.duration_sec == 0 {
            return Err(ReelError::validation(format!(
                "row '{}': duration must be > 0 seconds",
                self.output
            )));
        }
        if self.bullets.is_empty() {
            return Err(ReelError::validation(format!(
                "row '{}': at least one bullet is required",
                self.output
            )));
        }
        let name = Path::new(&self.output);
        if name.file_name().is_none() || name.components().count() != 1 {
            return Err(ReelError::validation(format!(
                "row output '{}' must be a plain file name",
                self.output
            )));
        }
        Ok(())
    }

    /// Duration as floating-point seconds.
    pub fn duration(&self) -> f64 {
        f64::from(self.duration_sec)
    }

    /// Output name without extension, used to derive sibling artifact names.
    pub fn output_stem(&self) -> String {
        Path::new(&self.output)
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.output.clone())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/content/row.rs"]
mod tests;
