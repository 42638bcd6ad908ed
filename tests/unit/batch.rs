use std::cell::RefCell;

use super::*;
use crate::{
    footage::{probe::MediaInfo, selector::KeepOrder},
    foundation::error::ReelError,
    render::dry_run::DryRunBackend,
};

/// Probe that knows nothing: every file fails to open.
#[derive(Default)]
struct NoMedia {
    asked: RefCell<Vec<PathBuf>>,
}

impl MediaProbe for NoMedia {
    fn probe(&self, path: &Path) -> ReelResult<MediaInfo> {
        self.asked.borrow_mut().push(path.to_path_buf());
        Err(ReelError::resource("unreadable"))
    }
}

fn raw(output: &str, duration: &str) -> RawRow {
    RawRow {
        title: Some("Tech Careers".into()),
        hook: Some("Quick tip today".into()),
        bullets: Some("Learn fast".into()),
        duration: Some(duration.into()),
        footage_dir: Some("/nonexistent/footage".into()),
        output: Some(output.into()),
        ..RawRow::default()
    }
}

#[test]
fn failing_rows_do_not_stop_the_batch() {
    let cfg = ReelConfig::default();
    let dir = tempfile::tempdir().unwrap();
    let probe = NoMedia::default();
    let mut order = KeepOrder;
    let backend = DryRunBackend::new(cfg.badges.clone());
    let mut runner = BatchRunner {
        cfg: &cfg,
        probe: &probe,
        order: &mut order,
        backend: &backend,
        out_dir: dir.path().to_path_buf(),
        subtitles: true,
    };

    let rows = [raw("a.mp4", "10"), raw("b.mp4", "0"), raw("c.mp4", "2"), raw("d.mp4", "12")];
    let report = runner.run(&rows);

    assert_eq!(report.rows.len(), 4);
    assert_eq!(report.succeeded(), 2);
    assert_eq!(report.failed(), 2);
    assert_eq!(report.rows[1].row, 2);
    assert_eq!(report.rows[1].output, "b.mp4");
    assert!(report.rows[1].outcome.as_ref().unwrap_err().contains("duration"));
    // Too short for the hook window.
    assert!(report.rows[2].outcome.is_err());

    let a = report.rows[0].outcome.as_ref().unwrap();
    assert_eq!(a.video, Some(dir.path().join("a.composition.json")));
    assert_eq!(a.thumbnail, Some(dir.path().join("a_thumb.png")));
    assert_eq!(a.caption, Some(dir.path().join("a_caption.txt")));
    assert_eq!(a.subtitles, Some(dir.path().join("a_subtitles.json")));
    for path in [&a.video, &a.thumbnail, &a.caption, &a.subtitles] {
        assert!(path.as_ref().unwrap().is_file());
    }
    let caption = std::fs::read_to_string(dir.path().join("a_caption.txt")).unwrap();
    assert!(caption.contains("#techcareers"));
    assert!(dir.path().join("d.composition.json").is_file());
}

#[test]
fn missing_music_renders_silently() {
    let cfg = ReelConfig::default();
    let dir = tempfile::tempdir().unwrap();
    let probe = NoMedia::default();
    let mut order = KeepOrder;
    let backend = DryRunBackend::default();
    let mut runner = BatchRunner {
        cfg: &cfg,
        probe: &probe,
        order: &mut order,
        backend: &backend,
        out_dir: dir.path().to_path_buf(),
        subtitles: false,
    };
    let mut row = raw("m.mp4", "10");
    row.bg_music = Some("/nonexistent/track.mp3".into());
    let artifacts = runner.process_row(1, &row).unwrap();
    assert!(artifacts.subtitles.is_none());

    let json: serde_json::Value = serde_json::from_str(
        &std::fs::read_to_string(artifacts.video.unwrap()).unwrap(),
    )
    .unwrap();
    assert!(json["audio"].is_null());
    // The missing file is never handed to the probe.
    assert!(probe.asked.borrow().is_empty());
}

#[test]
fn subtitle_export_skips_rendering() {
    let cfg = ReelConfig::default();
    let dir = tempfile::tempdir().unwrap();
    let report = export_subtitles(&[raw("s.mp4", "10"), raw("", "x")], &cfg, dir.path());
    assert_eq!(report.succeeded(), 1);
    assert!(dir.path().join("s_subtitles.json").is_file());
    assert!(!dir.path().join("s.composition.json").exists());
    assert_eq!(report.rows[1].output, "reel.mp4");
}
