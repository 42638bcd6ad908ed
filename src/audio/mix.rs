use std::path::{Path, PathBuf};

use crate::{footage::probe::MediaProbe, timeline::composition::Composition};

/// Background music looped and attenuated to cover a composition.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AudioTrack {
    pub source: PathBuf,
    /// Linear volume factor.
    pub gain: f64,
    /// Length of the source file in seconds.
    pub source_duration: f64,
    /// Played length; always the composition duration.
    pub duration: f64,
}

impl AudioTrack {
    /// How many times the source starts playing (the last play may be cut).
    pub fn plays(&self) -> u32 {
        if self.source_duration <= 0.0 {
            return 1;
        }
        (self.duration / self.source_duration).ceil().max(1.0) as u32
    }

    /// Whether the source has to wrap around to cover the composition.
    pub fn loops(&self) -> bool {
        self.plays() > 1
    }
}

/// Attach `music` to `comp` at `gain`, looped to the composition duration.
///
/// An absent reference, a missing file, or one that cannot be probed as audio leaves the
/// composition unchanged; the row is rendered without music.
pub fn attach_music(
    comp: Composition,
    music: Option<&Path>,
    probe: &dyn MediaProbe,
    gain: f64,
) -> Composition {
    let Some(path) = music else {
        return comp;
    };
    if !path.is_file() {
        tracing::warn!(music = %path.display(), "music file not found, rendering without music");
        return comp;
    }
    let info = match probe.probe(path) {
        Ok(info) => info,
        Err(e) => {
            tracing::warn!(music = %path.display(), error = %e, "music unreadable, rendering without music");
            return comp;
        }
    };
    if !info.has_audio {
        tracing::warn!(music = %path.display(), "music file has no audio stream, rendering without music");
        return comp;
    }
    let track = AudioTrack {
        source: path.to_path_buf(),
        gain,
        source_duration: info.duration_sec,
        duration: comp.duration(),
    };
    tracing::debug!(
        music = %path.display(),
        plays = track.plays(),
        gain,
        "attached music"
    );
    comp.with_audio(track)
}

#[cfg(test)]
#[path = "../../tests/unit/audio/mix.rs"]
mod tests;
