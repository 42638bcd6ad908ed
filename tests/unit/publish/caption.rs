use super::*;
use crate::{config::RowDefaults, content::row::RawRow};

fn row(bullets: &str, qr: Option<&str>) -> ContentRow {
    let mut r = ContentRow::from_raw(
        &RawRow {
            hook: Some("3 FREE ways to skill up".into()),
            bullets: Some(bullets.into()),
            cta: Some("Apply today".into()),
            ..RawRow::default()
        },
        &RowDefaults::default(),
    )
    .unwrap();
    r.qr_url = qr.map(str::to_owned);
    r
}

#[test]
fn caption_lists_hook_bullets_cta_link_and_tags() {
    let r = row("Credentials; Job support", Some("https://example.org"));
    let text = caption_text(&r, &["#a".to_owned(), "#b".to_owned()], "#FreeTraining");
    assert_eq!(
        text,
        "3 FREE ways to skill up\n\nCredentials • Job support\n\nApply today\n🔗 https://example.org\n\n#a #b\n\n#FreeTraining\n"
    );
}

#[test]
fn caption_keeps_at_most_five_bullets_and_skips_missing_link() {
    let r = row("1; 2; 3; 4; 5; 6; 7", None);
    let text = caption_text(&r, &[], "");
    assert!(text.contains("1 • 2 • 3 • 4 • 5\n"));
    assert!(!text.contains('6'));
    assert!(!text.contains("🔗"));
}

#[test]
fn caption_file_is_written_with_parents() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out/demo_caption.txt");
    write_caption_file(&path, "hello").unwrap();
    assert_eq!(std::fs::read_to_string(path).unwrap(), "hello");
}
