use super::*;
use crate::{
    config::RowDefaults,
    content::row::RawRow,
    footage::{fit::fit_clip, normalize::normalize_duration, selector::FootageClip},
    timing::schedule::schedule_row,
};

fn row(raw: RawRow) -> ContentRow {
    ContentRow::from_raw(&raw, &RowDefaults::default()).unwrap()
}

fn build(row: &ContentRow) -> Composition {
    let cfg = ReelConfig::default();
    let schedule = schedule_row(row, &cfg.timing).unwrap();
    let canvas = cfg.profile.canvas;
    let clip = FootageClip::solid(row.brand_color, canvas, row.duration());
    let fitted = fit_clip(clip, canvas, &cfg.motion).unwrap();
    let bg = normalize_duration(vec![fitted], row.duration(), 0.2, cfg.profile.fps).unwrap();
    build_composition(row, &schedule, bg, &cfg).unwrap()
}

fn text_layers(comp: &Composition) -> Vec<(&Layer, &TextLayer)> {
    comp.layers()
        .iter()
        .filter_map(|l| l.as_text().map(|t| (l, t)))
        .collect()
}

#[test]
fn quick_tip_row_layers_in_paint_order() {
    let r = row(RawRow {
        hook: Some("Quick tip today".into()),
        bullets: Some("Learn fast".into()),
        duration: Some("10".into()),
        ..RawRow::default()
    });
    let comp = build(&r);
    let names: Vec<&str> = comp.layers().iter().map(|l| l.kind.name()).collect();
    assert_eq!(names, ["background", "gradient", "qr", "text", "text", "text"]);
    assert_eq!(comp.duration(), 10.0);

    let texts = text_layers(&comp);
    assert_eq!(texts[0].1.role, BlockRole::Hook);
    assert_eq!(texts[0].1.words.len(), 3);
    assert_eq!(texts[0].0.start, 0.0);
    assert!((texts[1].0.start - 3.2).abs() < 1e-9);
    assert_eq!(texts[1].1.text, "• Learn fast");
    assert_eq!(texts[2].1.role, BlockRole::CallToAction);
    assert!((texts[2].0.start - 7.0).abs() < 1e-12);
    assert!((texts[2].0.end() - 10.0).abs() < 1e-12);
}

#[test]
fn cta_start_is_clamped_for_short_rows() {
    let mut cfg_row = RawRow {
        hook: Some("Hi".into()),
        bullets: Some("Go".into()),
        duration: Some("5".into()),
        ..RawRow::default()
    };
    let comp = build(&row(cfg_row.clone()));
    let cta = text_layers(&comp).pop().unwrap();
    assert_eq!(cta.1.role, BlockRole::CallToAction);
    assert!((cta.0.start - 2.0).abs() < 1e-12);

    cfg_row.duration = Some("30".into());
    let comp = build(&row(cfg_row));
    let cta = text_layers(&comp).pop().unwrap();
    assert!((cta.0.start - 27.0).abs() < 1e-12);
}

#[test]
fn captions_sharing_a_band_never_overlap_in_time() {
    let r = row(RawRow {
        hook: Some("Stop scrolling, this one matters".into()),
        bullets: Some("First idea; Second idea here; Third; Fourth and last".into()),
        duration: Some("30".into()),
        ..RawRow::default()
    });
    let comp = build(&r);
    let texts = text_layers(&comp);
    for (i, (a, _)) in texts.iter().enumerate() {
        for (b, _) in &texts[i + 1..] {
            if a.placement.position_at(0.0).y != b.placement.position_at(0.0).y {
                continue;
            }
            assert!(
                a.end() <= b.start + 1e-9 || b.end() <= a.start + 1e-9,
                "caption windows overlap: {}..{} and {}..{}",
                a.start,
                a.end(),
                b.start,
                b.end()
            );
        }
        assert!(a.start >= 0.0 && a.end() <= comp.duration() + 1e-9);
    }
}

#[test]
fn badges_are_anchored_to_opposite_corners() {
    let dir = tempfile::tempdir().unwrap();
    let logo = dir.path().join("logo.png");
    std::fs::write(&logo, b"png").unwrap();
    let r = row(RawRow {
        logo: Some(logo.to_string_lossy().into_owned()),
        qr_url: Some("https://example.org/x".into()),
        ..RawRow::default()
    });
    let comp = build(&r);
    let logo_layer = &comp.layers()[2];
    let qr_layer = &comp.layers()[3];
    match &logo_layer.kind {
        LayerKind::Logo { width, .. } => assert_eq!(*width, 194),
        other => panic!("expected logo, got {}", other.name()),
    }
    assert_eq!(logo_layer.opacity, 0.95);
    let p = logo_layer.placement.position_at(0.0);
    assert!((p.x - 43.2).abs() < 1e-9 && (p.y - 76.8).abs() < 1e-9);

    match &qr_layer.kind {
        LayerKind::Qr { url, side } => {
            assert_eq!(url, "https://example.org/x");
            assert_eq!(*side, 174);
        }
        other => panic!("expected qr, got {}", other.name()),
    }
    let q = qr_layer.placement.position_at(0.0);
    assert!((q.x - 799.2).abs() < 1e-9 && (q.y - 1639.2).abs() < 1e-9);
}

#[test]
fn missing_logo_is_skipped() {
    let r = row(RawRow {
        logo: Some("/nope/logo.png".into()),
        ..RawRow::default()
    });
    let comp = build(&r);
    assert!(
        comp.layers()
            .iter()
            .all(|l| !matches!(l.kind, LayerKind::Logo { .. }))
    );
}

#[test]
fn mismatched_background_is_rejected() {
    let cfg = ReelConfig::default();
    let r = row(RawRow::default());
    let schedule = schedule_row(&r, &cfg.timing).unwrap();
    let clip = FootageClip::solid(r.brand_color, cfg.profile.canvas, 5.0);
    let fitted = fit_clip(clip, cfg.profile.canvas, &cfg.motion).unwrap();
    let bg = normalize_duration(vec![fitted], 5.0, 0.2, cfg.profile.fps).unwrap();
    assert!(build_composition(&r, &schedule, bg, &cfg).is_err());
}
