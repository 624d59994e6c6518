use super::*;

#[test]
fn wider_video_fits_height_and_centers_horizontally() {
    let r = cover_rect(Canvas::PORTRAIT_HD, 16.0 / 9.0);
    assert_eq!(r.y0, 0.0);
    assert_eq!(r.height(), 1920.0);
    assert!((r.width() - 1920.0 * 16.0 / 9.0).abs() < 1e-9);
    assert!((r.x0 + r.x1 - 1080.0).abs() < 1e-9);
}

#[test]
fn taller_video_fits_width_and_centers_vertically() {
    let r = cover_rect(Canvas::PORTRAIT_HD, 0.5);
    assert_eq!(r.x0, 0.0);
    assert_eq!(r.width(), 1080.0);
    assert!((r.height() - 2160.0).abs() < 1e-9);
    assert!((r.y0 - -120.0).abs() < 1e-9);
}

#[test]
fn equal_aspect_fills_exactly() {
    let r = cover_rect(Canvas::PORTRAIT_HD, 1080.0 / 1920.0);
    assert!((r.x0).abs() < 1e-9 && (r.y0).abs() < 1e-9);
    assert!((r.height() - 1920.0).abs() < 1e-6);
}

#[test]
fn gradient_runs_from_slate_to_black() {
    let g = gradient_rgba8_premul(Canvas::new(2, 5), GRADIENT_TOP, GRADIENT_BOTTOM);
    assert_eq!(g.len(), 2 * 5 * 4);
    assert_eq!(&g[0..4], &[0x0f, 0x17, 0x2a, 255]);
    assert_eq!(&g[g.len() - 4..], &[0, 0, 0, 255]);
    // Same color across a row.
    assert_eq!(&g[0..4], &g[4..8]);
}

#[test]
fn frame_length_is_checked() {
    assert!(BackgroundFrame::new(2, 2, vec![0; 15]).is_err());
    let f = BackgroundFrame::new(2, 1, vec![255; 8]).unwrap();
    assert!(f.is_usable());
    assert_eq!(f.aspect(), 2.0);
    assert!(frame_to_image(&f).is_ok());
}

#[test]
fn empty_frame_is_not_usable() {
    let f = BackgroundFrame::new(0, 0, Vec::new()).unwrap();
    assert!(!f.is_usable());
}
