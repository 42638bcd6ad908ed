use crate::{
    audio::mix::AudioTrack,
    foundation::{
        core::{Canvas, Fps},
        error::{ReelError, ReelResult},
    },
    timeline::layer::{Layer, LayerKind},
    timing::schedule::TIME_EPS,
};

/// Everything needed to encode one video: canvas, frame rate, duration, layers in paint
/// order and an optional music track.
///
/// A `Composition` is validated on construction and never mutated afterwards;
/// [`Composition::with_audio`] returns a new value.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct Composition {
    canvas: Canvas,
    fps: Fps,
    duration: f64,
    layers: Vec<Layer>,
    audio: Option<AudioTrack>,
}

impl Composition {
    pub fn new(canvas: Canvas, fps: Fps, duration: f64, layers: Vec<Layer>) -> ReelResult<Self> {
        let comp = Self {
            canvas,
            fps,
            duration,
            layers,
            audio: None,
        };
        comp.validate()?;
        Ok(comp)
    }

    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    pub fn fps(&self) -> Fps {
        self.fps
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn audio(&self) -> Option<&AudioTrack> {
        self.audio.as_ref()
    }

    pub fn frame_count(&self) -> u64 {
        self.fps.secs_to_frames_round(self.duration)
    }

    /// Attach (or replace) the music track, bounded to the composition duration.
    pub fn with_audio(self, mut track: AudioTrack) -> Self {
        track.duration = self.duration;
        Self {
            audio: Some(track),
            ..self
        }
    }

    /// Check layer windows and paint order.
    pub fn validate(&self) -> ReelResult<()> {
        self.canvas.validate()?;
        if !self.duration.is_finite() || self.duration <= 0.0 {
            return Err(ReelError::validation(format!(
                "composition duration {} must be finite and > 0",
                self.duration
            )));
        }
        match self.layers.first() {
            Some(Layer {
                kind: LayerKind::Background(_),
                ..
            }) => {}
            _ => {
                return Err(ReelError::validation(
                    "composition must start with a background layer",
                ));
            }
        }
        let mut tier = 0;
        for (i, layer) in self.layers.iter().enumerate() {
            let name = layer.kind.name();
            if !layer.start.is_finite() || layer.start < 0.0 {
                return Err(ReelError::validation(format!(
                    "layer {i} ({name}) starts at {} (< 0)",
                    layer.start
                )));
            }
            if !layer.duration.is_finite() || layer.duration <= 0.0 {
                return Err(ReelError::validation(format!(
                    "layer {i} ({name}) has non-positive duration {}",
                    layer.duration
                )));
            }
            if layer.end() > self.duration + TIME_EPS {
                return Err(ReelError::validation(format!(
                    "layer {i} ({name}) ends at {:.3}s, past the {:.3}s composition",
                    layer.end(),
                    self.duration
                )));
            }
            if !(0.0..=1.0).contains(&layer.opacity) {
                return Err(ReelError::validation(format!(
                    "layer {i} ({name}) opacity must be within [0, 1]"
                )));
            }
            if layer.fade_in < 0.0 || layer.fade_out < 0.0 || layer.fade_in + layer.fade_out > layer.duration + TIME_EPS {
                return Err(ReelError::validation(format!(
                    "layer {i} ({name}) fades do not fit its duration"
                )));
            }
            let t = layer.kind.tier();
            if t < tier {
                return Err(ReelError::validation(format!(
                    "layer {i} ({name}) is out of paint order"
                )));
            }
            tier = t;
        }
        if let Some(a) = &self.audio
            && (a.duration - self.duration).abs() > TIME_EPS
        {
            return Err(ReelError::validation("audio track does not match composition duration"));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/composition.rs"]
mod tests;
