//! Render dispatch: hands a finished [`Composition`] to an encoding backend.

pub(crate) mod dry_run;
pub(crate) mod ffmpeg;
pub(crate) mod plan;

use std::path::{Path, PathBuf};

use crate::{
    config::ThumbnailConfig,
    foundation::{core::Rgb8, error::ReelResult},
    timeline::composition::Composition,
};

/// What a backend produced for one composition.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderOutput {
    /// The encoded video, or the written description for backends that do not encode.
    pub path: PathBuf,
    pub frames: u64,
    pub duration: f64,
    pub has_audio: bool,
}

/// Title ribbon drawn onto the thumbnail.
#[derive(Clone, Debug)]
pub struct ThumbnailRequest<'a> {
    pub title: &'a str,
    pub brand_color: Rgb8,
    pub style: &'a ThumbnailConfig,
}

impl ThumbnailRequest<'_> {
    /// Title wrapped to the ribbon width.
    pub fn title_lines(&self) -> Vec<String> {
        crate::timeline::layer::wrap_text(self.title, self.style.title_wrap_chars)
    }
}

/// Encoding backend boundary.
///
/// `render` must write exactly `comp.duration()` seconds at the composition's canvas size and
/// frame rate. Partial artifacts left behind by a failing call are not cleaned up.
pub trait RenderBackend {
    fn render(&self, comp: &Composition, out: &Path) -> ReelResult<RenderOutput>;

    /// Write a still image of the composition's middle frame with a title ribbon.
    fn thumbnail(
        &self,
        comp: &Composition,
        rendered: &RenderOutput,
        req: &ThumbnailRequest<'_>,
        out: &Path,
    ) -> ReelResult<PathBuf>;
}

/// Ensure the parent directory of `path` exists.
pub fn ensure_parent_dir(path: &Path) -> ReelResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        use anyhow::Context as _;
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}
