use super::*;

/// Every character is `size_px / 2` wide.
struct HalfEm;

impl TextMeasure for HalfEm {
    fn measure_width(&mut self, text: &str, font: &FontSpec) -> f32 {
        text.chars().count() as f32 * font.size_px / 2.0
    }
}

fn spec() -> FontSpec {
    FontSpec::new(FontRole::Secondary, 20.0)
}

#[test]
fn empty_text_has_no_lines() {
    assert!(wrap_text("", &spec(), 100.0, &mut HalfEm).is_empty());
    assert!(wrap_text("   \n\t", &spec(), 100.0, &mut HalfEm).is_empty());
}

#[test]
fn short_text_stays_on_one_line() {
    let lines = wrap_text("one two", &spec(), 1000.0, &mut HalfEm);
    assert_eq!(lines, vec!["one two".to_string()]);
}

#[test]
fn breaks_when_joined_width_reaches_budget() {
    // "aaaa bbbb" is 9 chars = 90px, equal to the budget, so it must break.
    let lines = wrap_text("aaaa bbbb cc", &spec(), 90.0, &mut HalfEm);
    assert_eq!(lines, vec!["aaaa".to_string(), "bbbb cc".to_string()]);
}

#[test]
fn overlong_word_gets_its_own_line() {
    let lines = wrap_text("a bbbbbbbbbbbbbbbbbbbb c", &spec(), 50.0, &mut HalfEm);
    assert_eq!(
        lines,
        vec![
            "a".to_string(),
            "bbbbbbbbbbbbbbbbbbbb".to_string(),
            "c".to_string()
        ]
    );
}

#[test]
fn collapses_runs_of_whitespace() {
    let lines = wrap_text("  x   y  ", &spec(), 1000.0, &mut HalfEm);
    assert_eq!(lines, vec!["x y".to_string()]);
}

#[test]
fn bold_keeps_role_and_size() {
    let b = spec().bold();
    assert!(b.bold);
    assert_eq!(b.role, FontRole::Secondary);
    assert_eq!(b.size_px, 20.0);
}

#[test]
fn lines_fit_and_keep_word_order_across_widths() {
    let texts = [
        "knowledge is better than wealth for knowledge guards you while you guard wealth",
        "علم مال سے بہتر ہے کیونکہ علم تمہاری حفاظت کرتا ہے اور مال کی تم حفاظت کرتے ہو",
        "اَلصَّبْرُ صَبْرَانِ صَبْرٌ عَلَى مَا تَكْرَهُ وَ صَبْرٌ عَمَّا تُحِبُّ",
        "a bb ccc dddd eeeee ffffff ggggggg hhhhhhhh",
    ];
    let font = spec();
    for text in texts {
        let words: Vec<&str> = text.split_whitespace().collect();
        for width in [60.0, 120.0, 250.0, 480.0, 880.0] {
            let lines = wrap_text(text, &font, width, &mut HalfEm);
            for line in &lines {
                let w = HalfEm.measure_width(line, &font);
                assert!(
                    w < width || !line.contains(' '),
                    "{w} >= {width} for {line:?}"
                );
                assert!(!line.is_empty());
            }
            let rejoined: Vec<&str> = lines.iter().flat_map(|l| l.split(' ')).collect();
            assert_eq!(rejoined, words, "width {width}");
        }
    }
}
