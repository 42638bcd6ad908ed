use super::*;

#[test]
fn defaults_describe_the_vertical_profile() {
    let cfg = ReelConfig::default();
    assert!(cfg.validate().is_ok());
    assert_eq!(cfg.profile.canvas, Canvas::VERTICAL_HD);
    assert_eq!(cfg.profile.fps, Fps { num: 30, den: 1 });
    assert_eq!(cfg.profile.video_bitrate, "8000k");
    assert_eq!(cfg.timing.hook_window, 3.0);
    assert_eq!(cfg.defaults.duration_sec, 22);
}

#[test]
fn partial_json_overrides_only_named_fields() {
    let json = r##"{
        "music_gain": 0.5,
        "timing": { "bullet_pause": 0.5 },
        "defaults": { "brand_color": "#ff0000" }
    }"##;
    let cfg = ReelConfig::from_reader(json.as_bytes()).unwrap();
    assert_eq!(cfg.music_gain, 0.5);
    assert_eq!(cfg.timing.bullet_pause, 0.5);
    assert_eq!(cfg.timing.hook_window, 3.0);
    assert_eq!(cfg.defaults.brand_color, Rgb8::new(255, 0, 0));
    assert_eq!(cfg.profile.canvas.width, 1080);
}

#[test]
fn validation_rejects_bad_values() {
    let mut cfg = ReelConfig::default();
    cfg.timing.hook_window = 0.0;
    assert!(cfg.validate().is_err());

    let mut cfg = ReelConfig::default();
    cfg.gradient.mid = 1.5;
    assert!(cfg.validate().is_err());

    let mut cfg = ReelConfig::default();
    cfg.motion.zoom_end = 0.9;
    assert!(cfg.validate().is_err());

    let mut cfg = ReelConfig::default();
    cfg.profile.fps.num = 0;
    assert!(cfg.validate().is_err());
}

#[test]
fn missing_config_file_is_an_input_error() {
    let err = ReelConfig::from_path("definitely/not/here.json").unwrap_err();
    assert!(matches!(err, ReelError::Input(_)), "{err}");
}

#[test]
fn badge_geometry_is_validated_up_front() {
    let mut cfg = ReelConfig::default();
    cfg.badges.logo_opacity = 1.5;
    let err = cfg.validate().unwrap_err();
    assert!(err.to_string().contains("logo_opacity"), "{err}");

    let mut cfg = ReelConfig::default();
    cfg.badges.qr_modules = u32::MAX;
    assert!(matches!(cfg.validate(), Err(ReelError::Validation(_))));

    let mut cfg = ReelConfig::default();
    cfg.badges.qr_box_px = 200;
    assert!(cfg.validate().is_err());

    let mut cfg = ReelConfig::default();
    cfg.badges.cta_band_frac = f64::NAN;
    assert!(cfg.validate().is_err());
}
