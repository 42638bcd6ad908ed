use std::{
    collections::BTreeMap,
    ffi::OsString,
    path::{Path, PathBuf},
};

use crate::{
    audio::mix::AudioTrack,
    config::RenderProfile,
    footage::{
        fit::FittedClip,
        normalize::{BackgroundPlan, BackgroundSegment},
        selector::ClipSource,
    },
    foundation::error::{ReelError, ReelResult},
    timeline::{
        composition::Composition,
        layer::{Layer, LayerKind, Motion, Placement, TextLayer},
    },
};

/// One `-i` input with the options that precede it.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct PlanInput {
    pub pre_args: Vec<String>,
    pub path: PathBuf,
}

/// A composition compiled to a single `ffmpeg` invocation.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct FfmpegPlan {
    pub inputs: Vec<PlanInput>,
    pub filter_complex: String,
    pub output_args: Vec<String>,
    pub output: PathBuf,
}

impl FfmpegPlan {
    /// Full argument list, without the program name.
    pub fn args(&self) -> Vec<OsString> {
        let mut args: Vec<OsString> = ["-y", "-hide_banner", "-loglevel", "error"]
            .into_iter()
            .map(OsString::from)
            .collect();
        for input in &self.inputs {
            args.extend(input.pre_args.iter().map(OsString::from));
            args.push("-i".into());
            args.push(input.path.clone().into_os_string());
        }
        args.push("-filter_complex".into());
        args.push(self.filter_complex.clone().into());
        args.extend(self.output_args.iter().map(OsString::from));
        args.push(self.output.clone().into_os_string());
        args
    }
}

/// Files written for layers ffmpeg cannot draw on its own (gradient and QR rasters, caption
/// text), keyed by layer index.
#[derive(Clone, Debug, Default)]
pub struct StagedAssets {
    files: BTreeMap<usize, PathBuf>,
}

impl StagedAssets {
    pub fn insert(&mut self, layer: usize, path: PathBuf) {
        self.files.insert(layer, path);
    }

    pub fn get(&self, layer: usize) -> ReelResult<&Path> {
        self.files
            .get(&layer)
            .map(PathBuf::as_path)
            .ok_or_else(|| ReelError::encode(format!("layer {layer} has no staged asset")))
    }
}

/// Seconds as an ffmpeg time/number literal.
fn secs(v: f64) -> String {
    format!("{v:.3}")
}

/// Quote a filter option value (paths, mostly) for use inside `-filter_complex`.
pub(crate) fn filter_value(raw: &str) -> String {
    let escaped = raw
        .replace('\\', "\\\\")
        .replace('\'', "\\'")
        .replace(':', "\\:");
    format!("'{}'", escaped.replace('\'', "'\\''"))
}

struct Graph<'a> {
    profile: &'a RenderProfile,
    duration: f64,
    inputs: Vec<PlanInput>,
    chains: Vec<String>,
    labels: usize,
}

impl Graph<'_> {
    fn label(&mut self, prefix: &str) -> String {
        self.labels += 1;
        format!("{prefix}{}", self.labels)
    }

    fn input(&mut self, pre_args: Vec<String>, path: &Path) -> usize {
        self.inputs.push(PlanInput {
            pre_args,
            path: path.to_path_buf(),
        });
        self.inputs.len() - 1
    }

    /// A still image looped for the whole composition.
    fn still_input(&mut self, path: &Path) -> usize {
        let pre = vec![
            "-loop".to_owned(),
            "1".to_owned(),
            "-framerate".to_owned(),
            self.profile.fps.to_ffmpeg(),
            "-t".to_owned(),
            secs(self.duration),
        ];
        self.input(pre, path)
    }

    fn overlay(&mut self, base: &str, top: &str, layer: &Layer) -> ReelResult<String> {
        let Placement::Fixed { at } = layer.placement else {
            return Err(ReelError::encode(format!(
                "{} layers must have a fixed placement",
                layer.kind.name()
            )));
        };
        let out = self.label("v");
        self.chains.push(format!(
            "[{base}][{top}]overlay=x={:.0}:y={:.0}:enable='gte(t,{})*lt(t,{})'[{out}]",
            at.x,
            at.y,
            secs(layer.start),
            secs(layer.end()),
        ));
        Ok(out)
    }

    fn background(&mut self, plan: &BackgroundPlan) -> String {
        let canvas = self.profile.canvas;
        let fps = self.profile.fps;
        let mut cur = self.label("v");
        self.chains.push(format!(
            "color=c=black:s={}x{}:r={}:d={}[{cur}]",
            canvas.width,
            canvas.height,
            fps.to_ffmpeg(),
            secs(plan.duration)
        ));
        for seg in &plan.segments {
            let Some(clip) = plan.clips.get(seg.clip) else {
                continue;
            };
            let src = self.segment_source(clip, seg);
            let seg_label = self.label("seg");
            self.chains
                .push(format!("{src}{}[{seg_label}]", segment_filters(clip, seg, self.profile)));
            let out = self.label("v");
            self.chains
                .push(format!("[{cur}][{seg_label}]overlay=eof_action=pass[{out}]"));
            cur = out;
        }
        cur
    }

    fn segment_source(&mut self, clip: &FittedClip, seg: &BackgroundSegment) -> String {
        let canvas = self.profile.canvas;
        match &clip.clip.source {
            ClipSource::File(path) => {
                let pre = vec![
                    "-ss".to_owned(),
                    secs(seg.source_start),
                    "-t".to_owned(),
                    secs(seg.duration()),
                ];
                let i = self.input(pre, path);
                format!("[{i}:v]")
            }
            ClipSource::Solid(color) => format!(
                "color=c={}:s={}x{}:r={}:d={},",
                color.to_ffmpeg(),
                canvas.width,
                canvas.height,
                self.profile.fps.to_ffmpeg(),
                secs(seg.duration())
            ),
        }
    }

    fn text(&mut self, base: &str, text: &TextLayer, layer: &Layer, textfile: &Path, font: Option<&Path>) -> String {
        let out = self.label("v");
        self.chains.push(format!(
            "[{base}]{}[{out}]",
            drawtext_filter(text, layer, textfile, font)
        ));
        out
    }
}

/// Per-segment chain: fit, zoom, fades, then shift onto the composition timeline.
fn segment_filters(clip: &FittedClip, seg: &BackgroundSegment, profile: &RenderProfile) -> String {
    let fps = profile.fps;
    let canvas = profile.canvas;
    let g = &clip.geometry;
    let mut f = vec![format!("fps={}", fps.to_ffmpeg()), "setpts=PTS-STARTPTS".to_owned()];
    if !g.is_identity() {
        f.push(format!("scale={}:{}", g.scaled_width, g.scaled_height));
        f.push(format!(
            "crop={}:{}:{}:{}",
            g.out_width, g.out_height, g.crop_x, g.crop_y
        ));
    }
    let z = &clip.zoom;
    if z.end_scale != z.start_scale {
        let frames = fps.secs_to_frames_round(z.duration).max(1);
        f.push(format!(
            "zoompan=z='{:.4}+{:.4}*on/{frames}':x='iw/2-(iw/zoom/2)':y='ih/2-(ih/zoom/2)':d=1:s={}x{}:fps={}",
            z.start_scale,
            z.end_scale - z.start_scale,
            canvas.width,
            canvas.height,
            fps.to_ffmpeg()
        ));
    }
    f.push("format=yuva420p".to_owned());
    let d = seg.duration();
    let fade_in = clip.fade_in.min(d / 2.0);
    let fade_out = clip.fade_out.min(d / 2.0);
    if fade_in > 0.0 {
        f.push(format!("fade=t=in:st=0:d={}:alpha=1", secs(fade_in)));
    }
    if fade_out > 0.0 {
        f.push(format!(
            "fade=t=out:st={}:d={}:alpha=1",
            secs(d - fade_out),
            secs(fade_out)
        ));
    }
    f.push(format!("setpts=PTS-STARTPTS+{}/TB", secs(seg.start)));
    f.join(",")
}

/// Vertical position expression of a caption, evaluated by ffmpeg on the composition clock.
pub(crate) fn motion_y_expr(motion: &Motion, start: f64) -> String {
    match *motion {
        Motion::Settle {
            base_y,
            amplitude,
            rate,
            max_angle,
            ..
        } => format!(
            "{base_y:.3}-{amplitude:.3}*cos(min({max_angle:.6},(t-{})*{rate:.6}))",
            secs(start)
        ),
    }
}

fn drawtext_filter(text: &TextLayer, layer: &Layer, textfile: &Path, font: Option<&Path>) -> String {
    let mut opts = Vec::new();
    if let Some(font) = font {
        opts.push(format!("fontfile={}", filter_value(&font.to_string_lossy())));
    }
    opts.push(format!("textfile={}", filter_value(&textfile.to_string_lossy())));
    // Caption text is literal; `%` would otherwise start a drawtext function.
    opts.push("expansion=none".to_owned());
    opts.push(format!("fontsize={}", text.font_px));
    opts.push(format!("fontcolor={}", text.color.to_ffmpeg()));
    opts.push("borderw=4:bordercolor=black@0.55".to_owned());
    opts.push(format!("line_spacing={}", text.font_px / 6));
    let (x, y) = match &layer.placement {
        Placement::Fixed { at } => (format!("{:.0}", at.x), format!("{:.0}", at.y)),
        Placement::Animated { motion } => {
            let Motion::Settle { center_x, .. } = motion;
            (
                format!("'{center_x:.1}-text_w/2'"),
                format!("'{}'", motion_y_expr(motion, layer.start)),
            )
        }
    };
    opts.push(format!("x={x}"));
    opts.push(format!("y={y}"));
    if layer.fade_in > 0.0 {
        opts.push(format!(
            "alpha='if(lt(t,{s}+{fi}),max(0,(t-{s})/{fi}),1)'",
            s = secs(layer.start),
            fi = secs(layer.fade_in)
        ));
    }
    opts.push(format!(
        "enable='gte(t,{})*lt(t,{})'",
        secs(layer.start),
        secs(layer.end())
    ));
    format!("drawtext={}", opts.join(":"))
}

fn audio_chain(track: &AudioTrack, input: usize) -> String {
    format!(
        "[{input}:a]volume={:.3},atrim=0:{},asetpts=PTS-STARTPTS[aout]",
        track.gain,
        secs(track.duration)
    )
}

/// Compile `comp` into one ffmpeg invocation writing `out`.
///
/// Pure: every raster or text file the graph refers to must already be in `staged`.
pub fn compile_plan(
    comp: &Composition,
    staged: &StagedAssets,
    profile: &RenderProfile,
    font: Option<&Path>,
    out: &Path,
) -> ReelResult<FfmpegPlan> {
    if comp.canvas() != profile.canvas || comp.fps() != profile.fps {
        return Err(ReelError::encode(
            "composition canvas/fps differ from the output profile",
        ));
    }
    let mut g = Graph {
        profile,
        duration: comp.duration(),
        inputs: Vec::new(),
        chains: Vec::new(),
        labels: 0,
    };

    let mut cur: Option<String> = None;
    for (i, layer) in comp.layers().iter().enumerate() {
        let next = match (&layer.kind, cur.as_deref()) {
            (LayerKind::Background(plan), None) => g.background(plan),
            (LayerKind::Background(_), Some(_)) => {
                return Err(ReelError::encode("only one background layer is supported"));
            }
            (_, None) => return Err(ReelError::encode("first layer must be the background")),
            (LayerKind::Gradient(_), Some(base)) | (LayerKind::Qr { .. }, Some(base)) => {
                let base = base.to_owned();
                let input = g.still_input(staged.get(i)?);
                let top = g.label("img");
                g.chains.push(format!("[{input}:v]format=rgba[{top}]"));
                g.overlay(&base, &top, layer)?
            }
            (LayerKind::Logo { source, width }, Some(base)) => {
                let base = base.to_owned();
                let input = g.still_input(source);
                let top = g.label("img");
                let mut chain = format!("[{input}:v]scale={width}:-1,format=rgba");
                if layer.opacity < 1.0 {
                    chain.push_str(&format!(",colorchannelmixer=aa={:.2}", layer.opacity));
                }
                g.chains.push(format!("{chain}[{top}]"));
                g.overlay(&base, &top, layer)?
            }
            (LayerKind::Text(text), Some(base)) => {
                let base = base.to_owned();
                g.text(&base, text, layer, staged.get(i)?, font)
            }
        };
        cur = Some(next);
    }
    let Some(last) = cur else {
        return Err(ReelError::encode("composition has no layers"));
    };
    g.chains
        .push(format!("[{last}]format={}[vout]", profile.pixel_format));

    let mut output_args = vec!["-map".to_owned(), "[vout]".to_owned()];
    if let Some(track) = comp.audio() {
        let input = g.input(
            vec!["-stream_loop".to_owned(), "-1".to_owned()],
            &track.source,
        );
        g.chains.push(audio_chain(track, input));
        output_args.extend(["-map".to_owned(), "[aout]".to_owned()]);
    }
    output_args.extend([
        "-r".to_owned(),
        profile.fps.to_ffmpeg(),
        "-c:v".to_owned(),
        profile.video_codec.clone(),
        "-preset".to_owned(),
        profile.preset.clone(),
        "-b:v".to_owned(),
        profile.video_bitrate.clone(),
        "-pix_fmt".to_owned(),
        profile.pixel_format.clone(),
    ]);
    if comp.audio().is_some() {
        output_args.extend(["-c:a".to_owned(), profile.audio_codec.clone()]);
    } else {
        output_args.push("-an".to_owned());
    }
    output_args.extend([
        "-t".to_owned(),
        secs(comp.duration()),
        "-movflags".to_owned(),
        "+faststart".to_owned(),
    ]);

    Ok(FfmpegPlan {
        inputs: g.inputs,
        filter_complex: g.chains.join(";"),
        output_args,
        output: out.to_path_buf(),
    })
}

#[cfg(test)]
#[path = "../../tests/unit/render/plan.rs"]
mod tests;
