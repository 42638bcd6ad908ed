use std::{
    path::Path,
    process::{Command, Stdio},
};

use crate::foundation::error::{ReelError, ReelResult};

/// What the composer needs to know about a media file.
#[derive(Clone, Debug, PartialEq)]
pub struct MediaInfo {
    /// Frame width, absent for audio-only files.
    pub width: Option<u32>,
    /// Frame height, absent for audio-only files.
    pub height: Option<u32>,
    pub duration_sec: f64,
    pub has_audio: bool,
}

impl MediaInfo {
    /// `(width, height)` when the file carries a usable video stream.
    pub fn video_size(&self) -> Option<(u32, u32)> {
        match (self.width, self.height) {
            (Some(w), Some(h)) if w > 0 && h > 0 => Some((w, h)),
            _ => None,
        }
    }
}

/// Opens media files far enough to read their size and duration.
///
/// Errors are [`ReelError::Resource`]; callers decide whether a failure is fatal.
pub trait MediaProbe {
    fn probe(&self, path: &Path) -> ReelResult<MediaInfo>;
}

/// [`MediaProbe`] backed by the system `ffprobe` binary.
#[derive(Clone, Copy, Debug, Default)]
pub struct FfprobeProbe;

impl MediaProbe for FfprobeProbe {
    fn probe(&self, path: &Path) -> ReelResult<MediaInfo> {
        #[derive(serde::Deserialize)]
        struct ProbeStream {
            codec_type: Option<String>,
            width: Option<u32>,
            height: Option<u32>,
        }
        #[derive(serde::Deserialize)]
        struct ProbeFormat {
            duration: Option<String>,
        }
        #[derive(serde::Deserialize)]
        struct ProbeOut {
            #[serde(default)]
            streams: Vec<ProbeStream>,
            format: Option<ProbeFormat>,
        }

        let out = Command::new("ffprobe")
            .args([
                "-v",
                "error",
                "-print_format",
                "json",
                "-show_streams",
                "-show_format",
            ])
            .arg(path)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| ReelError::resource(format!("failed to run ffprobe: {e}")))?;
        if !out.status.success() {
            return Err(ReelError::resource(format!(
                "ffprobe failed for '{}': {}",
                path.display(),
                String::from_utf8_lossy(&out.stderr).trim()
            )));
        }

        let parsed: ProbeOut = serde_json::from_slice(&out.stdout).map_err(|e| {
            ReelError::resource(format!(
                "ffprobe json parse failed for '{}': {e}",
                path.display()
            ))
        })?;
        let video = parsed
            .streams
            .iter()
            .find(|s| s.codec_type.as_deref() == Some("video"));
        let duration_sec = parsed
            .format
            .as_ref()
            .and_then(|f| f.duration.as_deref())
            .and_then(|s| s.parse::<f64>().ok())
            .filter(|d| d.is_finite() && *d > 0.0)
            .ok_or_else(|| {
                ReelError::resource(format!("'{}' has no usable duration", path.display()))
            })?;

        Ok(MediaInfo {
            width: video.and_then(|s| s.width),
            height: video.and_then(|s| s.height),
            duration_sec,
            has_audio: parsed
                .streams
                .iter()
                .any(|s| s.codec_type.as_deref() == Some("audio")),
        })
    }
}

/// Return `true` when `ffprobe` can be invoked from `PATH`.
pub fn is_ffprobe_on_path() -> bool {
    Command::new("ffprobe")
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

#[cfg(test)]
#[path = "../../tests/unit/footage/probe.rs"]
mod tests;
