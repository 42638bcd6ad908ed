//! Row-by-row batch processing.
//!
//! Rows are handled strictly one after another; each row builds its own schedule, footage
//! plan and composition and nothing carries over to the next row. A failing row is logged
//! and reported, never propagated: the batch always reaches its last row.

use std::path::{Path, PathBuf};

use crate::{
    audio::mix::attach_music,
    config::ReelConfig,
    content::row::{ContentRow, RawRow},
    footage::{
        fit::fit_clip,
        normalize::normalize_duration,
        probe::MediaProbe,
        selector::{ClipOrder, FootageRequest, select_footage},
    },
    foundation::error::ReelResult,
    publish::{
        ArtifactPaths,
        caption::{caption_text, write_caption_file},
        hashtags::hashtags_for_title,
        subtitles::write_subtitles,
    },
    render::{RenderBackend, ThumbnailRequest},
    timeline::builder::build_composition,
    timing::schedule::schedule_row,
};

/// Files written for one row.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RowArtifacts {
    pub video: Option<PathBuf>,
    pub thumbnail: Option<PathBuf>,
    pub caption: Option<PathBuf>,
    pub subtitles: Option<PathBuf>,
}

/// Result of one row; `row` is 1-based, matching the data lines of the table.
#[derive(Debug)]
pub struct RowReport {
    pub row: usize,
    pub output: String,
    pub outcome: Result<RowArtifacts, String>,
}

#[derive(Debug, Default)]
pub struct BatchReport {
    pub rows: Vec<RowReport>,
}

impl BatchReport {
    pub fn succeeded(&self) -> usize {
        self.rows.iter().filter(|r| r.outcome.is_ok()).count()
    }

    pub fn failed(&self) -> usize {
        self.rows.len() - self.succeeded()
    }
}

/// Everything a batch needs, borrowed for the duration of the run.
pub struct BatchRunner<'a> {
    pub cfg: &'a ReelConfig,
    pub probe: &'a dyn MediaProbe,
    pub order: &'a mut dyn ClipOrder,
    pub backend: &'a dyn RenderBackend,
    pub out_dir: PathBuf,
    /// Also write `<stem>_subtitles.json` for every rendered row.
    pub subtitles: bool,
}

impl BatchRunner<'_> {
    /// Render one row and publish its sibling files.
    ///
    /// Errors fail this row only. The thumbnail is best effort: a failure there is logged and
    /// the row still counts as rendered.
    #[tracing::instrument(skip(self, raw), fields(output = tracing::field::Empty))]
    pub fn process_row(&mut self, index: usize, raw: &RawRow) -> ReelResult<RowArtifacts> {
        let cfg = self.cfg;
        let row = ContentRow::from_raw(raw, &cfg.defaults)?;
        tracing::Span::current().record("output", row.output.as_str());
        let schedule = schedule_row(&row, &cfg.timing)?;
        let paths = ArtifactPaths::new(&self.out_dir, &row.output);
        let mut artifacts = RowArtifacts::default();

        if self.subtitles {
            write_subtitles(&paths.subtitles, &schedule)?;
            artifacts.subtitles = Some(paths.subtitles.clone());
        }

        let canvas = cfg.profile.canvas;
        let plan = select_footage(
            &FootageRequest {
                folder: &row.footage_dir,
                required: row.duration(),
                margin: cfg.motion.footage_margin_sec,
                canvas,
                fallback_color: row.brand_color,
            },
            self.probe,
            &mut *self.order,
        );
        let fitted = plan
            .clips
            .into_iter()
            .map(|clip| fit_clip(clip, canvas, &cfg.motion))
            .collect::<ReelResult<Vec<_>>>()?;
        let background = normalize_duration(
            fitted,
            row.duration(),
            cfg.motion.concat_overlap_sec,
            cfg.profile.fps,
        )?;
        let comp = build_composition(&row, &schedule, background, cfg)?;
        let comp = attach_music(comp, row.music.as_deref(), self.probe, cfg.music_gain);

        let rendered = self.backend.render(&comp, &paths.video)?;
        artifacts.video = Some(rendered.path.clone());

        let req = ThumbnailRequest {
            title: &row.title,
            brand_color: row.brand_color,
            style: &cfg.thumbnail,
        };
        match self
            .backend
            .thumbnail(&comp, &rendered, &req, &paths.thumbnail)
        {
            Ok(path) => artifacts.thumbnail = Some(path),
            Err(e) => tracing::warn!(error = %e, "thumbnail failed"),
        }

        let tags = hashtags_for_title(&row.title, &cfg.hashtags);
        write_caption_file(&paths.caption, &caption_text(&row, &tags, &cfg.hashtags.trailer))?;
        artifacts.caption = Some(paths.caption);

        tracing::info!(
            row = index,
            video = %rendered.path.display(),
            seconds = rendered.duration,
            music = rendered.has_audio,
            "rendered reel"
        );
        Ok(artifacts)
    }

    /// Process every row in order.
    pub fn run(&mut self, rows: &[RawRow]) -> BatchReport {
        let mut report = BatchReport::default();
        for (i, raw) in rows.iter().enumerate() {
            let index = i + 1;
            let output = raw_output_name(raw, self.cfg);
            tracing::info!(row = index, total = rows.len(), %output, "processing row");
            let outcome = self.process_row(index, raw).map_err(|e| {
                tracing::error!(row = index, %output, error = %e, "row failed");
                e.to_string()
            });
            report.rows.push(RowReport {
                row: index,
                output,
                outcome,
            });
        }
        report
    }
}

/// Write only the subtitle files of `rows`; nothing is rendered.
pub fn export_subtitles(rows: &[RawRow], cfg: &ReelConfig, out_dir: &Path) -> BatchReport {
    let mut report = BatchReport::default();
    for (i, raw) in rows.iter().enumerate() {
        let index = i + 1;
        let output = raw_output_name(raw, cfg);
        let outcome = ContentRow::from_raw(raw, &cfg.defaults)
            .and_then(|row| {
                let schedule = schedule_row(&row, &cfg.timing)?;
                let path = ArtifactPaths::new(out_dir, &row.output).subtitles;
                write_subtitles(&path, &schedule)?;
                Ok(RowArtifacts {
                    subtitles: Some(path),
                    ..RowArtifacts::default()
                })
            })
            .map_err(|e| {
                tracing::error!(row = index, %output, error = %e, "row failed");
                e.to_string()
            });
        report.rows.push(RowReport {
            row: index,
            output,
            outcome,
        });
    }
    report
}

fn raw_output_name(raw: &RawRow, cfg: &ReelConfig) -> String {
    raw.output
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(&cfg.defaults.output)
        .to_owned()
}

#[cfg(test)]
#[path = "../tests/unit/batch.rs"]
mod tests;
