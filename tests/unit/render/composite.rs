use super::*;

#[test]
fn transparent_source_is_noop() {
    assert_eq!(over([10, 20, 30, 40], [255, 255, 255, 0]), [10, 20, 30, 40]);
}

#[test]
fn opaque_source_replaces_destination() {
    assert_eq!(over([0, 0, 0, 255], [255, 0, 0, 255]), [255, 0, 0, 255]);
}

#[test]
fn half_black_over_white_is_mid_grey() {
    // Premultiplied black at ~50% alpha.
    assert_eq!(over([255, 255, 255, 255], [0, 0, 0, 128]), [127, 127, 127, 255]);
}

#[test]
fn in_place_checks_lengths_and_blends() {
    let mut dst = vec![0, 0, 0, 255, 9, 9, 9, 255];
    let src = vec![200, 100, 50, 255, 0, 0, 0, 0];
    over_in_place(&mut dst, &src).unwrap();
    assert_eq!(dst, vec![200, 100, 50, 255, 9, 9, 9, 255]);
    assert!(over_in_place(&mut dst, &src[..4]).is_err());
}
