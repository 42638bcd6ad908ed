use super::*;

#[test]
fn fps_rejects_zero_parts() {
    assert!(Fps::new(0, 1).is_err());
    assert!(Fps::new(30, 0).is_err());
    let fps = Fps::new(30, 1).unwrap();
    assert_eq!(fps.to_ffmpeg(), "30/1");
    assert_eq!(fps.secs_to_frames_round(10.0), 300);
}

#[test]
fn vertical_canvas_is_nine_by_sixteen() {
    let c = Canvas::VERTICAL_HD;
    assert!((c.aspect_ratio() - 9.0 / 16.0).abs() < 1e-12);
    assert!(c.validate().is_ok());
    assert!(
        Canvas {
            width: 1081,
            height: 1920
        }
        .validate()
        .is_err()
    );
}

#[test]
fn hex_colors_parse_with_or_without_hash() {
    assert_eq!(Rgb8::parse_hex("#1e40af").unwrap(), Rgb8::new(0x1e, 0x40, 0xaf));
    assert_eq!(Rgb8::parse_hex("FF0000").unwrap(), Rgb8::new(255, 0, 0));
    assert!(Rgb8::parse_hex("#12345").is_err());
    assert!(Rgb8::parse_hex("#gg0000").is_err());
}

#[test]
fn hex_color_formats() {
    let c = Rgb8::new(0x1e, 0x40, 0xaf);
    assert_eq!(c.to_hex(), "#1e40af");
    assert_eq!(c.to_ffmpeg(), "0x1E40AF");
    let json = serde_json::to_string(&c).unwrap();
    assert_eq!(json, "\"#1e40af\"");
    let back: Rgb8 = serde_json::from_str(&json).unwrap();
    assert_eq!(back, c);
}
