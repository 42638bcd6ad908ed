use std::{
    io::Read,
    path::{Path, PathBuf},
    process::{Command, Stdio},
};

use crate::{
    config::{BadgeConfig, RenderProfile},
    foundation::{
        core::Canvas,
        error::{ReelError, ReelResult},
    },
    overlay::qr::render_qr,
    render::{
        RenderBackend, RenderOutput, ThumbnailRequest, ensure_parent_dir,
        plan::{FfmpegPlan, StagedAssets, compile_plan, filter_value},
    },
    timeline::{composition::Composition, layer::LayerKind},
};

/// Encodes compositions with the system `ffmpeg` binary.
#[derive(Clone, Debug)]
pub struct FfmpegBackend {
    pub profile: RenderProfile,
    pub badges: BadgeConfig,
    /// Font for captions and thumbnail titles; ffmpeg's default face when `None`.
    pub font_file: Option<PathBuf>,
}

impl FfmpegBackend {
    pub fn new(profile: RenderProfile, badges: BadgeConfig, font_file: Option<PathBuf>) -> Self {
        Self {
            profile,
            badges,
            font_file,
        }
    }

    /// Write gradient/QR rasters and caption text files for `comp` into `dir`.
    pub fn stage(&self, comp: &Composition, dir: &Path) -> ReelResult<StagedAssets> {
        let mut staged = StagedAssets::default();
        for (i, layer) in comp.layers().iter().enumerate() {
            let path = match &layer.kind {
                LayerKind::Gradient(mask) => {
                    let path = dir.join(format!("layer{i}_gradient.png"));
                    save_png(&mask.to_rgba_image(), &path)?;
                    path
                }
                LayerKind::Qr { url, .. } => {
                    let path = dir.join(format!("layer{i}_qr.png"));
                    let img = render_qr(url, self.badges.qr_modules, self.badges.qr_box_px)?;
                    save_png(&img, &path)?;
                    path
                }
                LayerKind::Text(text) => {
                    let path = dir.join(format!("layer{i}_caption.txt"));
                    write_text(&path, &text.lines.join("\n"))?;
                    path
                }
                LayerKind::Background(_) | LayerKind::Logo { .. } => continue,
            };
            staged.insert(i, path);
        }
        Ok(staged)
    }

    /// Compile `comp` into a plan; staged files go into `dir`.
    pub fn plan(&self, comp: &Composition, dir: &Path, out: &Path) -> ReelResult<FfmpegPlan> {
        let staged = self.stage(comp, dir)?;
        compile_plan(comp, &staged, &self.profile, self.font_file.as_deref(), out)
    }

    /// `-vf` chain of the thumbnail: brand ribbon plus the title read from `title_file`.
    pub(crate) fn thumbnail_filter(
        &self,
        canvas: Canvas,
        req: &ThumbnailRequest<'_>,
        title_file: &Path,
    ) -> String {
        let style = req.style;
        let ribbon_h = (f64::from(canvas.height) * style.ribbon_frac).round() as u32;
        let mut vf = format!(
            "drawbox=x=0:y=0:w=iw:h={ribbon_h}:color={}@{:.3}:t=fill,drawtext=",
            req.brand_color.to_ffmpeg(),
            f64::from(style.ribbon_alpha) / 255.0
        );
        if let Some(font) = &self.font_file {
            vf.push_str(&format!("fontfile={}:", filter_value(&font.to_string_lossy())));
        }
        vf.push_str(&format!(
            "textfile={}:expansion=none:fontsize={}:fontcolor=white:x={:.0}:y={:.0}",
            filter_value(&title_file.to_string_lossy()),
            style.title_font_px,
            f64::from(canvas.width) * style.title_x_frac,
            f64::from(canvas.height) * style.title_y_frac
        ));
        vf
    }
}

impl RenderBackend for FfmpegBackend {
    fn render(&self, comp: &Composition, out: &Path) -> ReelResult<RenderOutput> {
        ensure_parent_dir(out)?;
        if !is_ffmpeg_on_path() {
            return Err(ReelError::encode(
                "ffmpeg is required for encoding, but was not found on PATH",
            ));
        }
        // Staged files live as long as this call, whether or not ffmpeg succeeds.
        let scratch = tempfile::Builder::new()
            .prefix("reelkit-")
            .tempdir()
            .map_err(|e| ReelError::encode(format!("create scratch dir: {e}")))?;
        let plan = self.plan(comp, scratch.path(), out)?;
        tracing::debug!(
            inputs = plan.inputs.len(),
            graph = %plan.filter_complex,
            "running ffmpeg"
        );
        run_ffmpeg(&plan.args())?;
        Ok(RenderOutput {
            path: out.to_path_buf(),
            frames: comp.frame_count(),
            duration: comp.duration(),
            has_audio: comp.audio().is_some(),
        })
    }

    fn thumbnail(
        &self,
        comp: &Composition,
        rendered: &RenderOutput,
        req: &ThumbnailRequest<'_>,
        out: &Path,
    ) -> ReelResult<PathBuf> {
        ensure_parent_dir(out)?;
        let scratch = tempfile::Builder::new()
            .prefix("reelkit-thumb-")
            .tempdir()
            .map_err(|e| ReelError::encode(format!("create scratch dir: {e}")))?;
        let title = scratch.path().join("title.txt");
        write_text(&title, &req.title_lines().join("\n"))?;

        let vf = self.thumbnail_filter(comp.canvas(), req, &title);

        let args: Vec<std::ffi::OsString> = vec![
            "-y".into(),
            "-hide_banner".into(),
            "-loglevel".into(),
            "error".into(),
            "-ss".into(),
            format!("{:.3}", comp.duration() / 2.0).into(),
            "-i".into(),
            rendered.path.clone().into_os_string(),
            "-frames:v".into(),
            "1".into(),
            "-vf".into(),
            vf.into(),
            out.as_os_str().to_owned(),
        ];
        run_ffmpeg(&args)?;
        Ok(out.to_path_buf())
    }
}

fn save_png(img: &image::RgbaImage, path: &Path) -> ReelResult<()> {
    img.save_with_format(path, image::ImageFormat::Png)
        .map_err(|e| ReelError::encode(format!("write '{}': {e}", path.display())))
}

fn write_text(path: &Path, text: &str) -> ReelResult<()> {
    std::fs::write(path, text)
        .map_err(|e| ReelError::encode(format!("write '{}': {e}", path.display())))
}

fn run_ffmpeg(args: &[std::ffi::OsString]) -> ReelResult<()> {
    let mut child = Command::new("ffmpeg")
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| {
            ReelError::encode(format!(
                "failed to spawn ffmpeg (is it installed and on PATH?): {e}"
            ))
        })?;
    let mut stderr = child
        .stderr
        .take()
        .ok_or_else(|| ReelError::encode("failed to open ffmpeg stderr (unexpected)"))?;
    let stderr_drain = std::thread::spawn(move || {
        let mut bytes = Vec::new();
        stderr.read_to_end(&mut bytes)?;
        Ok::<_, std::io::Error>(bytes)
    });

    let status = child
        .wait()
        .map_err(|e| ReelError::encode(format!("failed to wait for ffmpeg to finish: {e}")))?;
    let stderr_bytes = stderr_drain
        .join()
        .map_err(|_| ReelError::encode("ffmpeg stderr drain thread panicked"))?
        .map_err(|e| ReelError::encode(format!("ffmpeg stderr read failed: {e}")))?;

    if !status.success() {
        return Err(ReelError::encode(format!(
            "ffmpeg exited with status {}: {}",
            status,
            String::from_utf8_lossy(&stderr_bytes).trim()
        )));
    }
    Ok(())
}

/// Return `true` when `ffmpeg` can be invoked from `PATH`.
pub fn is_ffmpeg_on_path() -> bool {
    Command::new("ffmpeg")
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

#[cfg(test)]
#[path = "../../tests/unit/render/ffmpeg.rs"]
mod tests;
