use std::path::PathBuf;

use super::*;
use crate::{
    config::ReelConfig,
    content::row::{ContentRow, RawRow},
    footage::{fit::fit_clip, normalize::normalize_duration, selector::FootageClip},
    foundation::core::Rgb8,
    timeline::builder::build_composition,
    timing::schedule::schedule_row,
};

fn composition(clips: Vec<FootageClip>, audio: bool) -> Composition {
    let cfg = ReelConfig::default();
    let row = ContentRow::from_raw(
        &RawRow {
            hook: Some("Quick tip today".into()),
            bullets: Some("Learn fast".into()),
            duration: Some("10".into()),
            ..RawRow::default()
        },
        &cfg.defaults,
    )
    .unwrap();
    let schedule = schedule_row(&row, &cfg.timing).unwrap();
    let fitted = clips
        .into_iter()
        .map(|c| fit_clip(c, cfg.profile.canvas, &cfg.motion).unwrap())
        .collect();
    let bg = normalize_duration(fitted, 10.0, 0.2, cfg.profile.fps).unwrap();
    let comp = build_composition(&row, &schedule, bg, &cfg).unwrap();
    if audio {
        comp.with_audio(AudioTrack {
            source: "music.mp3".into(),
            gain: 0.25,
            source_duration: 4.0,
            duration: 10.0,
        })
    } else {
        comp
    }
}

fn file_clip(name: &str, duration: f64) -> FootageClip {
    FootageClip {
        source: ClipSource::File(PathBuf::from(name)),
        duration,
        width: 1920,
        height: 1080,
    }
}

fn staged_for(comp: &Composition) -> StagedAssets {
    let mut staged = StagedAssets::default();
    for (i, layer) in comp.layers().iter().enumerate() {
        let ext = match layer.kind {
            LayerKind::Gradient(_) | LayerKind::Qr { .. } => "png",
            LayerKind::Text(_) => "txt",
            _ => continue,
        };
        staged.insert(i, PathBuf::from(format!("/tmp/stage/layer{i}.{ext}")));
    }
    staged
}

fn compile(comp: &Composition) -> FfmpegPlan {
    let profile = ReelConfig::default().profile;
    compile_plan(comp, &staged_for(comp), &profile, None, Path::new("out/reel.mp4")).unwrap()
}

#[test]
fn footage_segments_are_fitted_zoomed_and_faded() {
    let comp = composition(vec![file_clip("a.mp4", 6.0), file_clip("b.mp4", 6.0)], false);
    let plan = compile(&comp);

    assert_eq!(plan.inputs[0].path, PathBuf::from("a.mp4"));
    assert_eq!(plan.inputs[0].pre_args, ["-ss", "0.000", "-t", "6.000"]);
    assert_eq!(plan.inputs[1].path, PathBuf::from("b.mp4"));
    assert_eq!(plan.inputs[1].pre_args, ["-ss", "0.000", "-t", "4.200"]);

    let g = &plan.filter_complex;
    assert!(g.starts_with("color=c=black:s=1080x1920:r=30/1:d=10.000"));
    assert!(g.contains("scale=3413:1920,crop=1080:1920:1166:0"));
    assert!(g.contains("zoompan=z='1.0000+0.0300*on/180'"));
    assert!(g.contains("fade=t=in:st=0:d=0.100:alpha=1"));
    assert!(g.contains("setpts=PTS-STARTPTS+5.800/TB"));
    assert!(g.ends_with("format=yuv420p[vout]"));
}

#[test]
fn solid_fallback_uses_a_color_source() {
    let canvas = ReelConfig::default().profile.canvas;
    let clip = FootageClip::solid(Rgb8::new(0x1e, 0x40, 0xaf), canvas, 10.0);
    let plan = compile(&composition(vec![clip], false));
    assert!(plan.filter_complex.contains("color=c=0x1E40AF:s=1080x1920"));
    assert!(!plan.filter_complex.contains("crop="));
}

#[test]
fn captions_become_timed_drawtext_filters() {
    let plan = compile(&composition(vec![file_clip("a.mp4", 12.0)], false));
    let g = &plan.filter_complex;
    assert_eq!(g.matches("drawtext=").count(), 3);
    assert!(g.contains("enable='gte(t,3.200)*lt(t,7.200)'"));
    assert!(g.contains("enable='gte(t,7.000)*lt(t,10.000)'"));
    assert!(g.contains("x='540.0-text_w/2'"));
    assert!(g.contains("y='384.000-40.000*cos(min(1.000000,(t-0.000)*3.141593))'"));
    assert!(g.contains("alpha='if(lt(t,3.200+0.200),max(0,(t-3.200)/0.200),1)'"));
    assert!(g.contains("textfile='/tmp/stage/layer"));
    assert_eq!(g.matches(":expansion=none:").count(), 3);
}

#[test]
fn badges_are_looped_stills_overlaid_at_fixed_positions() {
    let plan = compile(&composition(vec![file_clip("a.mp4", 12.0)], false));
    let stills: Vec<&PlanInput> = plan
        .inputs
        .iter()
        .filter(|i| i.pre_args.first().map(String::as_str) == Some("-loop"))
        .collect();
    // Gradient and QR badge.
    assert_eq!(stills.len(), 2);
    assert!(stills.iter().all(|i| i.pre_args.contains(&"10.000".to_owned())));
    assert!(plan.filter_complex.contains("overlay=x=0:y=0"));
    assert!(plan.filter_complex.contains("overlay=x=799:y=1639"));
}

#[test]
fn silent_compositions_disable_audio() {
    let plan = compile(&composition(vec![file_clip("a.mp4", 12.0)], false));
    assert!(plan.output_args.contains(&"-an".to_owned()));
    assert!(!plan.filter_complex.contains("[aout]"));
    let args: Vec<String> = plan
        .args()
        .iter()
        .map(|a| a.to_string_lossy().into_owned())
        .collect();
    for expected in ["libx264", "8000k", "yuv420p", "medium", "30/1"] {
        assert!(args.iter().any(|a| a == expected), "missing {expected}");
    }
    assert_eq!(args.last().map(String::as_str), Some("out/reel.mp4"));
}

#[test]
fn music_is_looped_attenuated_and_trimmed() {
    let plan = compile(&composition(vec![file_clip("a.mp4", 12.0)], true));
    let music = plan.inputs.last().unwrap();
    assert_eq!(music.pre_args, ["-stream_loop", "-1"]);
    assert_eq!(music.path, PathBuf::from("music.mp3"));
    assert!(
        plan.filter_complex
            .contains("volume=0.250,atrim=0:10.000,asetpts=PTS-STARTPTS[aout]")
    );
    assert!(plan.output_args.windows(2).any(|w| w == ["-c:a", "aac"]));
    assert!(plan.output_args.windows(2).any(|w| w == ["-map", "[aout]"]));
}

#[test]
fn missing_staged_asset_is_an_encode_error() {
    let comp = composition(vec![file_clip("a.mp4", 12.0)], false);
    let profile = ReelConfig::default().profile;
    let err = compile_plan(&comp, &StagedAssets::default(), &profile, None, Path::new("o.mp4"))
        .unwrap_err();
    assert!(matches!(err, ReelError::Encode(_)));
}

#[test]
fn filter_values_are_quoted_and_escaped() {
    assert_eq!(filter_value("/tmp/a.txt"), "'/tmp/a.txt'");
    assert_eq!(filter_value("C:/fonts/x.ttf"), "'C\\:/fonts/x.ttf'");
}
