use super::*;
use image::RgbaImage;

fn solid(px: [u8; 4]) -> Image {
    Image::from_rgba(RgbaImage::from_pixel(2, 2, image::Rgba(px)))
}

#[test]
fn red_masked_blue_becomes_blue() {
    let out = color_mask(&solid([255, 0, 0, 255]), Rgba::opaque(0, 0, 255)).unwrap();
    assert_eq!(out.primary().buffer.get_pixel(0, 0).0, [0, 0, 255, 255]);
}

#[test]
fn lightness_extremes_survive() {
    let target = Rgba::opaque(0, 200, 50);
    let white = color_mask(&solid([255, 255, 255, 255]), target).unwrap();
    assert_eq!(white.primary().buffer.get_pixel(1, 1).0, [255, 255, 255, 255]);
    let black = color_mask(&solid([0, 0, 0, 90]), target).unwrap();
    assert_eq!(black.primary().buffer.get_pixel(1, 1).0, [0, 0, 0, 90]);
}

#[test]
fn black_target_keeps_source_lightness_as_gray() {
    let black = Rgba::opaque(0, 0, 0);
    let red = color_mask(&solid([255, 0, 0, 255]), black).unwrap();
    // Lightness 0.5 -> 127.5, rounded up.
    assert_eq!(red.primary().buffer.get_pixel(0, 0).0, [128, 128, 128, 255]);
    let orange = color_mask(&solid([200, 100, 0, 180]), black).unwrap();
    // (200 + 0) / 2
    assert_eq!(orange.primary().buffer.get_pixel(1, 0).0, [100, 100, 100, 180]);
}

#[test]
fn transparent_pixels_stay_transparent() {
    let out = color_mask(&solid([10, 20, 30, 0]), Rgba::opaque(255, 0, 0)).unwrap();
    assert_eq!(out.primary().buffer.get_pixel(0, 0).0, [0, 0, 0, 0]);
}

#[test]
fn translucent_target_is_rejected() {
    let err = color_mask(&solid([1, 1, 1, 255]), Rgba::new(1, 2, 3, 4)).unwrap_err();
    assert_eq!(err.as_operation().map(|e| e.key()), Some("alpha-not-supported"));
}

#[test]
fn hsl_conversion_inverts() {
    let (h, s, l) = rgb_to_hsl(0.2, 0.6, 0.4);
    let (r, g, b) = hsl_to_rgb(h, s, l);
    assert!((r - 0.2).abs() < 1e-9 && (g - 0.6).abs() < 1e-9 && (b - 0.4).abs() < 1e-9);
}
