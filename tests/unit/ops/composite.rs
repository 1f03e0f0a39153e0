use super::*;

#[test]
fn over_handles_extremes() {
    assert_eq!(over([1, 2, 3, 4], [0, 0, 0, 0]), [1, 2, 3, 4]);
    assert_eq!(over([1, 2, 3, 4], [9, 9, 9, 255]), [9, 9, 9, 255]);
}

#[test]
fn over_blends_half_alpha() {
    let out = over([0, 0, 255, 255], [128, 0, 0, 128]);
    assert_eq!(out, [128, 0, 127, 255]);
}

#[test]
fn overlay_clips_to_destination() {
    let mut dst = filled(3, 3, Rgba::opaque(0, 0, 0));
    let src = filled(2, 2, Rgba::opaque(255, 255, 255));
    overlay(&mut dst, &src, 2, -1);
    assert_eq!(dst.get_pixel(2, 0).0, [255, 255, 255, 255]);
    assert_eq!(dst.get_pixel(2, 1).0, [0, 0, 0, 255]);
    assert_eq!(dst.get_pixel(1, 0).0, [0, 0, 0, 255]);
}

#[test]
fn overlay_skips_transparent_source() {
    let mut dst = filled(1, 1, Rgba::opaque(5, 6, 7));
    overlay(&mut dst, &filled(1, 1, Rgba::TRANSPARENT), 0, 0);
    assert_eq!(dst.get_pixel(0, 0).0, [5, 6, 7, 255]);
}
