use super::*;

#[test]
fn words_share_the_window_equally() {
    let units = allocate_block("Quick tip today", 0.0, 3.0).unwrap();
    assert_eq!(units.len(), 3);
    let texts: Vec<&str> = units.iter().map(|u| u.text.as_str()).collect();
    assert_eq!(texts, ["Quick", "tip", "today"]);
    for (i, u) in units.iter().enumerate() {
        assert!((u.start - i as f64).abs() < 1e-12);
        assert!((u.duration() - 1.0).abs() < 1e-12);
    }
}

#[test]
fn units_are_contiguous_and_cover_the_window() {
    for n in 1..=17usize {
        let text = vec!["w"; n].join(" ");
        let len = 7.3;
        let units = allocate_block(&text, 0.0, len).unwrap();
        assert_eq!(units.len(), n);
        assert_eq!(units[0].start, 0.0);
        for pair in units.windows(2) {
            assert!(pair[1].start > pair[0].start);
            assert_eq!(pair[1].start, pair[0].end);
        }
        let total: f64 = units.iter().map(TimedUnit::duration).sum();
        assert!((total - len).abs() < 1e-9);
        assert_eq!(units[n - 1].end, len);
    }
}

#[test]
fn single_word_gets_the_whole_window() {
    let units = allocate_block("  Hello  ", 3.2, 4.0).unwrap();
    assert_eq!(units.len(), 1);
    assert_eq!(units[0].start, 3.2);
    assert_eq!(units[0].end, 7.2);
}

#[test]
fn empty_text_yields_no_units() {
    assert!(allocate_block("", 0.0, 2.0).unwrap().is_empty());
    assert!(allocate_block(" \t\n", 0.0, 2.0).unwrap().is_empty());
}

#[test]
fn degenerate_windows_are_rejected() {
    assert!(allocate_block("a b", 0.0, 0.0).is_err());
    assert!(allocate_block("a b", -1.0, 2.0).is_err());
    assert!(allocate_block("a b", 0.0, f64::NAN).is_err());
}

#[test]
fn allocation_is_repeatable() {
    let a = allocate_block("one two three four five", 1.25, 6.5).unwrap();
    let b = allocate_block("one two three four five", 1.25, 6.5).unwrap();
    assert_eq!(a.len(), b.len());
    for (x, y) in a.iter().zip(&b) {
        assert_eq!(x.text, y.text);
        assert_eq!(x.start.to_bits(), y.start.to_bits());
        assert_eq!(x.end.to_bits(), y.end.to_bits());
    }
}
