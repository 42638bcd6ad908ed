//! Files published next to each rendered reel: thumbnail, caption text, subtitles.

pub(crate) mod caption;
pub(crate) mod hashtags;
pub(crate) mod subtitles;

use std::path::{Path, PathBuf};

/// Output locations derived from a row's output name inside an output directory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub video: PathBuf,
    pub thumbnail: PathBuf,
    pub caption: PathBuf,
    pub subtitles: PathBuf,
}

impl ArtifactPaths {
    pub fn new(out_dir: &Path, output: &str) -> Self {
        let video = out_dir.join(output);
        let stem = video
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| output.to_owned());
        Self {
            thumbnail: out_dir.join(format!("{stem}_thumb.png")),
            caption: out_dir.join(format!("{stem}_caption.txt")),
            subtitles: out_dir.join(format!("{stem}_subtitles.json")),
            video,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/publish/artifacts.rs"]
mod tests;
