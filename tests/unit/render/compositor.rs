use super::*;
use crate::text::FontBook;

/// Half-em per character; records which roles were measured.
#[derive(Default)]
struct Recording {
    roles: Vec<FontRole>,
}

impl TextMeasure for Recording {
    fn measure_width(&mut self, text: &str, font: &FontSpec) -> f32 {
        self.roles.push(font.role);
        text.chars().count() as f32 * font.size_px / 2.0
    }
}

fn quote(arabic: &str, urdu: &str) -> Quote {
    Quote {
        arabic: arabic.to_string(),
        urdu: urdu.to_string(),
        narration_script: "n".to_string(),
        source: "Nahj al-Balagha, Saying 147".to_string(),
        category: "Wisdom".to_string(),
    }
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-6
}

#[test]
fn tier_boundary_is_inclusive_at_600() {
    let at = quote(&"ع".repeat(300), &"م".repeat(300));
    let over = quote(&"ع".repeat(301), &"م".repeat(300));
    assert_eq!(FontTier::for_quote(&at), FontTier::Large);
    assert_eq!(FontTier::for_quote(&over), FontTier::Small);

    let l = layout_quote(&at, true, Canvas::PORTRAIT_HD, &mut Recording::default());
    let s = layout_quote(&over, true, Canvas::PORTRAIT_HD, &mut Recording::default());
    assert_eq!(l.secondary.font.size_px, 64.0);
    assert_eq!(s.secondary.font.size_px, 44.0);
    assert_eq!(s.primary.unwrap().font.size_px, 48.0);
}

#[test]
fn secondary_only_layout_is_centered_without_spacing() {
    let mut m = Recording::default();
    let layout = layout_quote(&quote("قول", "a b"), false, Canvas::PORTRAIT_HD, &mut m);

    assert!(layout.primary.is_none());
    assert!(!m.roles.contains(&FontRole::Primary));
    assert_eq!(layout.secondary.lines, vec!["a b".to_string()]);
    assert!(close(layout.content_height, 153.6));
    assert!(close(layout.secondary.top, 833.2));

    let (center, line) = layout.secondary.line_centers().next().unwrap();
    assert_eq!(line, "a b");
    assert!(close(center, 910.0));
}

#[test]
fn both_scripts_stack_with_spacing() {
    let layout = layout_quote(
        &quote("قول", "a b"),
        true,
        Canvas::PORTRAIT_HD,
        &mut Recording::default(),
    );
    let primary = layout.primary.as_ref().unwrap();
    assert!(primary.font.bold);
    assert_eq!(primary.color, PRIMARY_COLOR);
    assert!(close(layout.content_height, 108.8 + 120.0 + 153.6));
    assert!(close(primary.top, 718.8));
    assert!(close(layout.secondary.top, 718.8 + 108.8 + 120.0));
    assert!(close(primary.height(), 108.8));
}

#[test]
fn empty_primary_text_drops_block_and_spacing() {
    let layout = layout_quote(
        &quote("   ", "a"),
        true,
        Canvas::PORTRAIT_HD,
        &mut Recording::default(),
    );
    assert!(layout.primary.is_none());
    assert!(close(layout.content_height, 153.6));
}

#[test]
fn wrapped_lines_fit_the_padded_width() {
    let urdu = "یہ ایک بہت لمبا جملہ ہے جو کئی سطروں میں تقسیم ہونا چاہیے تاکہ سکرین پر پورا آئے";
    let mut m = Recording::default();
    let layout = layout_quote(&quote("", urdu), true, Canvas::PORTRAIT_HD, &mut m);
    assert!(layout.secondary.lines.len() > 1);
    for line in &layout.secondary.lines {
        let w = line.chars().count() as f32 * 64.0 / 2.0;
        assert!(w < 880.0 || !line.contains(' '), "line too wide: {line}");
    }
    assert_eq!(layout.secondary.lines.join(" "), urdu);
}

#[test]
fn citation_is_uppercased() {
    let layout = layout_quote(
        &quote("", "x"),
        true,
        Canvas::PORTRAIT_HD,
        &mut Recording::default(),
    );
    assert_eq!(layout.citation, "NAHJ AL-BALAGHA, SAYING 147");
}

#[test]
fn badge_geometry_matches_canvas() {
    let c = citation_badge(Canvas::PORTRAIT_HD, "X");
    assert_eq!(c.rect, Rect::new(120.0, 1600.0, 960.0, 1760.0));
    assert_eq!(c.label_center_y, 1680.0);
    assert_eq!(c.fill, Rgba8::rgba(0, 0, 0, 102));
    assert_eq!(c.stroke, Some((Rgba8::rgba(251, 191, 36, 77), 3.0)));

    let b = brand_badge(Canvas::PORTRAIT_HD);
    assert_eq!(b.rect, Rect::new(360.0, 100.0, 720.0, 180.0));
    assert_eq!(b.label, "ALI WISDOM");
    assert_eq!(b.label_center_y, 142.0);
    assert!(b.label_shadow_blur.is_none());
}

fn system_font() -> Option<Vec<u8>> {
    [
        "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/TTF/DejaVuSans.ttf",
        "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    ]
    .iter()
    .find_map(|p| std::fs::read(p).ok())
}

fn compositor() -> Option<FrameCompositor> {
    let font = system_font()?;
    let book = FontBook::from_bytes(font.clone(), font.clone(), font);
    let engine = TextEngine::new(&book).ok()?;
    Some(FrameCompositor::new(Canvas::PORTRAIT_HD, engine))
}

fn pixel(surface: &Surface, x: u32, y: u32) -> [u8; 4] {
    let idx = ((y * surface.canvas().width + x) * 4) as usize;
    let d = surface.data();
    [d[idx], d[idx + 1], d[idx + 2], d[idx + 3]]
}

#[test]
fn no_quote_draws_gradient_and_brand_badge() {
    let Some(mut comp) = compositor() else {
        eprintln!("skipping: no system font found");
        return;
    };
    let mut surface = Surface::new(Canvas::PORTRAIT_HD).unwrap();
    comp.try_render_frame(&mut surface, None, &RenderSettings::default(), None)
        .unwrap();

    assert_eq!(pixel(&surface, 5, 0), [0x0f, 0x17, 0x2a, 255]);
    assert_eq!(pixel(&surface, 5, 1919), [0, 0, 0, 255]);
    assert_eq!(pixel(&surface, 370, 140), [0xfb, 0xbf, 0x24, 255]);
}

#[test]
fn video_frame_is_dimmed_and_text_is_drawn() {
    let Some(mut comp) = compositor() else {
        return;
    };
    let red = BackgroundFrame::new(16, 9, [255u8, 0, 0, 255].repeat(16 * 9)).unwrap();
    let mut surface = Surface::new(Canvas::PORTRAIT_HD).unwrap();
    let q = quote("", "wisdom is the lost property of the believer");
    comp.try_render_frame(&mut surface, Some(&q), &RenderSettings::default(), Some(&red))
        .unwrap();

    let [r, g, b, a] = pixel(&surface, 20, 1000);
    assert_eq!(a, 255);
    assert!((86..=92).contains(&r), "dimmed red was {r}");
    assert_eq!((g, b), (0, 0));

    let lit = surface
        .data()
        .chunks_exact(4)
        .filter(|px| px[0] > 200 && px[1] > 200 && px[2] > 200)
        .count();
    assert!(lit > 100, "expected white text pixels, found {lit}");
}

#[test]
fn overlay_is_reused_until_inputs_change() {
    let Some(mut comp) = compositor() else {
        return;
    };
    let mut surface = Surface::new(Canvas::PORTRAIT_HD).unwrap();
    let q = quote("", "patience");
    let settings = RenderSettings::default();
    comp.try_render_frame(&mut surface, Some(&q), &settings, None)
        .unwrap();
    let first = surface.data().to_vec();
    comp.try_render_frame(&mut surface, Some(&q), &settings, None)
        .unwrap();
    assert_eq!(surface.data(), first.as_slice());

    let other = quote("", "courage");
    comp.try_render_frame(&mut surface, Some(&other), &settings, None)
        .unwrap();
    assert_ne!(surface.data(), first.as_slice());
}

#[test]
fn mismatched_surface_is_reported_not_panicked() {
    let Some(mut comp) = compositor() else {
        return;
    };
    let mut small = Surface::new(Canvas::new(10, 10)).unwrap();
    let err = comp
        .try_render_frame(&mut small, None, &RenderSettings::default(), None)
        .unwrap_err();
    assert!(matches!(err, WisdomError::SurfaceMissing(_)));
    comp.render_frame(&mut small, None, &RenderSettings::default(), None);
}

fn ink(pixels: &[u8]) -> u64 {
    pixels.chunks_exact(4).map(|px| u64::from(px[3])).sum()
}

#[test]
fn bold_without_a_bold_face_is_synthesized() {
    let Some(mut comp) = compositor() else {
        return;
    };
    let regular_font = FontSpec::new(FontRole::Primary, 68.0);
    let bold_font = regular_font.bold();
    let text = "العلم خير";

    let regular = comp
        .rasterize_lines(std::iter::once((text, regular_font, Rgba8::WHITE, 900.0)))
        .unwrap();
    let bold = comp
        .rasterize_lines(std::iter::once((text, bold_font, Rgba8::WHITE, 900.0)))
        .unwrap();

    let (r, b) = (ink(&regular), ink(&bold));
    assert!(r > 0);
    assert!(b as f64 > r as f64 * 1.1, "bold ink {b} vs regular {r}");
}

#[test]
fn embolden_stroke_scales_with_size() {
    assert!((embolden_width(48.0) - 2.0).abs() < 1e-9);
    assert!(embolden_width(68.0) > embolden_width(38.0));
}
