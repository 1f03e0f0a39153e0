use super::*;

fn solid(w: u32, h: u32, px: [u8; 4]) -> Image {
    Image::from_rgba(RgbaImage::from_pixel(w, h, image::Rgba(px)))
}

fn px(img: &Image, x: u32, y: u32) -> [u8; 4] {
    img.primary().buffer.get_pixel(x, y).0
}

#[test]
fn grayscale_uses_rec601_weights() {
    let out = grayscale(&solid(2, 2, [255, 0, 0, 200]));
    assert_eq!(px(&out, 1, 1), [76, 76, 76, 200]);
}

#[test]
fn invert_keeps_alpha() {
    let out = invert(&solid(1, 1, [255, 10, 0, 7]));
    assert_eq!(px(&out, 0, 0), [0, 245, 255, 7]);
}

#[test]
fn kernels_on_flat_color() {
    let img = solid(3, 3, [90, 90, 90, 120]);
    assert_eq!(px(&contour(&img), 1, 1), [255, 255, 255, 120]);
    assert_eq!(px(&emboss(&img), 0, 0), [128, 128, 128, 120]);
    assert_eq!(px(&sharpen(&img), 2, 2), [90, 90, 90, 120]);
}

#[test]
fn emboss_differences_against_upper_left() {
    let mut buf = RgbaImage::from_pixel(3, 3, image::Rgba([40, 40, 40, 255]));
    buf.put_pixel(0, 0, image::Rgba([100, 100, 100, 255]));
    let out = emboss(&Image::from_rgba(buf));
    // 40 - 100 + 128
    assert_eq!(px(&out, 1, 1), [68, 68, 68, 255]);
    // The clamped upper-left sample is the pixel itself.
    assert_eq!(px(&out, 0, 0), [128, 128, 128, 255]);
    assert_eq!(px(&out, 2, 2), [128, 128, 128, 255]);
}

#[test]
fn sharpen_boosts_center_against_neighbours() {
    let mut buf = RgbaImage::from_pixel(3, 3, image::Rgba([40, 40, 40, 255]));
    buf.put_pixel(1, 1, image::Rgba([100, 100, 100, 255]));
    let out = sharpen(&Image::from_rgba(buf));
    // (32 * 100 - 2 * 8 * 40) / 16
    assert_eq!(px(&out, 1, 1), [160, 160, 160, 255]);
    // (32 * 40 - 2 * (7 * 40 + 100)) / 16 = 32.5, rounded half away from zero.
    assert_eq!(px(&out, 0, 0), [33, 33, 33, 255]);
}

#[test]
fn contour_marks_edges_dark() {
    let mut buf = RgbaImage::from_pixel(5, 5, image::Rgba([0, 0, 0, 255]));
    buf.put_pixel(2, 2, image::Rgba([255, 255, 255, 255]));
    let out = contour(&Image::from_rgba(buf));
    // The lit pixel overflows to white; its neighbours go dark.
    assert_eq!(px(&out, 2, 2), [255, 255, 255, 255]);
    assert_eq!(px(&out, 1, 2), [0, 0, 0, 255]);
}

#[test]
fn blur_rejects_negative_sigma() {
    let err = blur(&solid(2, 2, [0, 0, 0, 255]), -1.0, &ToolboxConfig::default()).unwrap_err();
    assert_eq!(err.as_operation().map(|e| e.key()), Some("value-too-small"));
}

#[test]
fn blur_rejects_sigma_above_configured_limit() {
    let cfg = ToolboxConfig::default();
    let img = solid(3, 3, [10, 20, 30, 255]);
    let key = |r: ToolboxResult<Image>| r.unwrap_err().as_operation().map(|e| e.key());
    assert_eq!(key(blur(&img, 1e9, &cfg)), Some("value-too-big"));
    assert_eq!(key(blur(&img, f64::INFINITY, &cfg)), Some("value-too-big"));
    assert_eq!(key(blur(&img, f64::from(cfg.max_blur_sigma) + 0.5, &cfg)), Some("value-too-big"));
    assert_eq!(blur(&img, f64::from(cfg.max_blur_sigma), &cfg).unwrap(), img);
}

#[test]
fn blur_does_not_darken_next_to_transparency() {
    let buf = RgbaImage::from_fn(8, 1, |x, _| {
        if x < 4 {
            image::Rgba([0, 0, 0, 0])
        } else {
            image::Rgba([255, 0, 0, 255])
        }
    });
    let out = blur(&Image::from_rgba(buf), 1.0, &ToolboxConfig::default()).unwrap();
    let edge = px(&out, 4, 0);
    assert!(edge[3] < 255 && edge[3] > 0);
    assert_eq!(&edge[..3], &[255, 0, 0]);
    assert_eq!(px(&out, 0, 0)[3], 0);
}

#[test]
fn blur_zero_is_identity_and_flat_stays_flat() {
    let cfg = ToolboxConfig::default();
    let img = solid(6, 4, [30, 60, 90, 255]);
    assert_eq!(blur(&img, 0.0, &cfg).unwrap(), img);
    assert_eq!(blur(&img, 2.0, &cfg).unwrap(), img);
}

#[test]
fn blur_spreads_a_dot() {
    let mut buf = RgbaImage::from_pixel(9, 9, image::Rgba([0, 0, 0, 255]));
    buf.put_pixel(4, 4, image::Rgba([255, 255, 255, 255]));
    let out = blur(&Image::from_rgba(buf), 1.0, &ToolboxConfig::default()).unwrap();
    assert!(px(&out, 4, 4)[0] < 255);
    assert!(px(&out, 5, 4)[0] > 0);
    assert_eq!(px(&out, 0, 0)[0], 0);
}

#[test]
fn pixelate_averages_blocks() {
    let buf = RgbaImage::from_fn(4, 4, |x, _| {
        if x < 2 {
            image::Rgba([255, 0, 0, 255])
        } else {
            image::Rgba([0, 0, 255, 255])
        }
    });
    let out = pixelate(&Image::from_rgba(buf), 4).unwrap();
    assert!(out.primary().buffer.pixels().all(|p| p.0 == [128, 0, 128, 255]));
}

#[test]
fn pixelate_weights_by_alpha() {
    let buf = RgbaImage::from_fn(2, 2, |x, _| {
        if x == 0 {
            image::Rgba([255, 0, 0, 255])
        } else {
            image::Rgba([0, 255, 0, 0])
        }
    });
    let out = pixelate(&Image::from_rgba(buf), 2).unwrap();
    assert_eq!(px(&out, 1, 1), [255, 0, 0, 128]);
}

#[test]
fn pixelate_bounds() {
    let img = solid(3, 3, [1, 2, 3, 255]);
    assert_eq!(pixelate(&img, 1).unwrap(), img);
    assert_eq!(pixelate(&img, 0).unwrap(), img);
    let err = pixelate(&img, -2).unwrap_err();
    assert_eq!(err.as_operation().map(|e| e.key()), Some("value-too-small"));
}
