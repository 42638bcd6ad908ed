use std::collections::HashMap;

use super::*;
use crate::{
    footage::probe::MediaInfo,
    foundation::error::{ReelError, ReelResult},
};

/// Probe answering from a table keyed by file name; unknown files fail to open.
struct TableProbe(HashMap<&'static str, (u32, u32, f64)>);

impl MediaProbe for TableProbe {
    fn probe(&self, path: &Path) -> ReelResult<MediaInfo> {
        let name = path.file_name().unwrap().to_str().unwrap();
        let (w, h, d) = self
            .0
            .get(name)
            .copied()
            .ok_or_else(|| ReelError::resource(format!("cannot open {name}")))?;
        Ok(MediaInfo {
            width: Some(w),
            height: Some(h),
            duration_sec: d,
            has_audio: false,
        })
    }
}

fn folder_with(files: &[&str]) -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    for f in files {
        std::fs::write(dir.path().join(f), b"").unwrap();
    }
    dir
}

fn request(folder: &Path, required: f64) -> FootageRequest<'_> {
    FootageRequest {
        folder,
        required,
        margin: 2.0,
        canvas: Canvas::VERTICAL_HD,
        fallback_color: Rgb8::new(0x1e, 0x40, 0xaf),
    }
}

#[test]
fn empty_folder_falls_back_to_one_solid_clip() {
    let dir = folder_with(&[]);
    let plan = select_footage(
        &request(dir.path(), 12.0),
        &TableProbe(HashMap::new()),
        &mut KeepOrder,
    );
    assert!(plan.is_fallback());
    assert_eq!(plan.clips.len(), 1);
    assert_eq!(plan.clips[0].duration, 12.0);
    assert_eq!(plan.clips[0].width, 1080);
    assert_eq!(plan.clips[0].height, 1920);
}

#[test]
fn missing_folder_also_falls_back() {
    let plan = select_footage(
        &request(Path::new("does/not/exist"), 5.0),
        &TableProbe(HashMap::new()),
        &mut KeepOrder,
    );
    assert!(plan.is_fallback());
}

#[test]
fn only_footage_extensions_are_candidates() {
    let dir = folder_with(&["a.mp4", "b.MOV", "c.mkv", "notes.txt", "d.png"]);
    let names: Vec<String> = list_candidates(dir.path())
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, ["a.mp4", "b.MOV", "c.mkv"]);
}

#[test]
fn accumulates_until_required_plus_margin() {
    let dir = folder_with(&["a.mp4", "b.mp4", "c.mp4", "d.mp4"]);
    let probe = TableProbe(HashMap::from([
        ("a.mp4", (1920, 1080, 5.0)),
        ("b.mp4", (1920, 1080, 5.0)),
        ("c.mp4", (1920, 1080, 5.0)),
        ("d.mp4", (1920, 1080, 5.0)),
    ]));
    let plan = select_footage(&request(dir.path(), 10.0), &probe, &mut KeepOrder);
    assert_eq!(plan.clips.len(), 3);
    assert!(plan.total_duration() >= 12.0);
    assert!(!plan.is_fallback());
}

#[test]
fn unopenable_clips_are_skipped_and_never_selected() {
    let dir = folder_with(&["bad.mp4", "good.mp4"]);
    let probe = TableProbe(HashMap::from([("good.mp4", (720, 1280, 30.0))]));
    let plan = select_footage(&request(dir.path(), 10.0), &probe, &mut KeepOrder);
    assert_eq!(plan.clips.len(), 1);
    assert_eq!(plan.skipped.len(), 1);
    assert!(plan.skipped[0].ends_with("bad.mp4"));
    assert!(
        plan.clips
            .iter()
            .all(|c| c.source != ClipSource::File(plan.skipped[0].clone()))
    );
}

#[test]
fn nothing_openable_falls_back_with_skips_recorded() {
    let dir = folder_with(&["x.mp4", "y.mov"]);
    let plan = select_footage(
        &request(dir.path(), 8.0),
        &TableProbe(HashMap::new()),
        &mut KeepOrder,
    );
    assert!(plan.is_fallback());
    assert_eq!(plan.skipped.len(), 2);
}

#[test]
fn short_footage_returns_a_short_plan() {
    let dir = folder_with(&["a.mp4"]);
    let probe = TableProbe(HashMap::from([("a.mp4", (1920, 1080, 3.0))]));
    let plan = select_footage(&request(dir.path(), 20.0), &probe, &mut KeepOrder);
    assert_eq!(plan.clips.len(), 1);
    assert!(plan.total_duration() < plan.requested);
}

#[test]
fn any_shuffle_satisfies_the_duration_invariant() {
    let dir = folder_with(&["a.mp4", "b.mp4", "c.mp4", "d.mp4", "e.mp4"]);
    let probe = TableProbe(HashMap::from([
        ("a.mp4", (1920, 1080, 4.0)),
        ("b.mp4", (1080, 1920, 6.0)),
        ("c.mp4", (640, 480, 3.0)),
        ("d.mp4", (1920, 1080, 9.0)),
        ("e.mp4", (1920, 1080, 2.0)),
    ]));
    for seed in 0..16 {
        let plan = select_footage(
            &request(dir.path(), 10.0),
            &probe,
            &mut ShuffleOrder::seeded(seed),
        );
        assert!(plan.total_duration() >= 12.0, "seed {seed}");
        let without_last: f64 = plan.clips[..plan.clips.len() - 1]
            .iter()
            .map(|c| c.duration)
            .sum();
        assert!(without_last < 12.0, "seed {seed} kept selecting after the target");
    }
}

#[test]
fn seeded_shuffles_are_reproducible() {
    let mut a: Vec<PathBuf> = (0..10).map(|i| PathBuf::from(format!("{i}.mp4"))).collect();
    let mut b = a.clone();
    ShuffleOrder::seeded(7).arrange(&mut a);
    ShuffleOrder::seeded(7).arrange(&mut b);
    assert_eq!(a, b);
}
