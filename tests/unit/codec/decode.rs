use std::io::Cursor;

use super::*;

fn solid_px(w: u16, h: u16, px: [u8; 4]) -> Vec<u8> {
    px.repeat(usize::from(w) * usize::from(h))
}

struct GifFrameSpec {
    rect: (u16, u16, u16, u16),
    px: [u8; 4],
    delay_cs: u16,
    dispose: gif::DisposalMethod,
}

fn build_gif(w: u16, h: u16, repeat: gif::Repeat, specs: &[GifFrameSpec]) -> Vec<u8> {
    let mut out = Vec::new();
    {
        let mut enc = gif::Encoder::new(&mut out, w, h, &[]).unwrap();
        enc.set_repeat(repeat).unwrap();
        for s in specs {
            let (left, top, fw, fh) = s.rect;
            let mut px = solid_px(fw, fh, s.px);
            let mut frame = gif::Frame::from_rgba(fw, fh, &mut px);
            frame.left = left;
            frame.top = top;
            frame.delay = s.delay_cs;
            frame.dispose = s.dispose;
            enc.write_frame(&frame).unwrap();
        }
    }
    out
}

fn png_bytes(img: image::DynamicImage) -> Vec<u8> {
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
        .unwrap();
    buf
}

const RED: [u8; 4] = [255, 0, 0, 255];
const BLUE: [u8; 4] = [0, 0, 255, 255];
const GREEN: [u8; 4] = [0, 255, 0, 255];

#[test]
fn gif_delta_frames_are_composited_and_delays_converted() {
    let bytes = build_gif(
        4,
        4,
        gif::Repeat::Finite(3),
        &[
            GifFrameSpec {
                rect: (0, 0, 4, 4),
                px: RED,
                delay_cs: 5,
                dispose: gif::DisposalMethod::Keep,
            },
            GifFrameSpec {
                rect: (1, 1, 2, 2),
                px: BLUE,
                delay_cs: 7,
                dispose: gif::DisposalMethod::Keep,
            },
        ],
    );

    let img = decode(&bytes, "image/gif").unwrap();
    assert_eq!(img.frame_count(), 2);
    assert_eq!(img.durations(), vec![50, 70]);
    assert_eq!(img.loop_count, Some(3));

    let f1 = &img.frames()[1].buffer;
    assert_eq!(f1.dimensions(), (4, 4));
    assert_eq!(f1.get_pixel(0, 0).0, RED);
    assert_eq!(f1.get_pixel(1, 1).0, BLUE);
    assert_eq!(f1.get_pixel(3, 3).0, RED);
}

#[test]
fn gif_background_disposal_clears_frame_rect() {
    let bytes = build_gif(
        4,
        4,
        gif::Repeat::Infinite,
        &[
            GifFrameSpec {
                rect: (0, 0, 4, 4),
                px: RED,
                delay_cs: 10,
                dispose: gif::DisposalMethod::Background,
            },
            GifFrameSpec {
                rect: (0, 0, 2, 2),
                px: BLUE,
                delay_cs: 10,
                dispose: gif::DisposalMethod::Keep,
            },
        ],
    );

    let img = decode(&bytes, "image/gif").unwrap();
    assert_eq!(img.loop_count, None);
    let f1 = &img.frames()[1].buffer;
    assert_eq!(f1.get_pixel(0, 0).0, BLUE);
    assert_eq!(f1.get_pixel(3, 3).0[3], 0);
}

#[test]
fn gif_previous_disposal_restores_canvas() {
    let bytes = build_gif(
        4,
        4,
        gif::Repeat::Infinite,
        &[
            GifFrameSpec {
                rect: (0, 0, 4, 4),
                px: RED,
                delay_cs: 2,
                dispose: gif::DisposalMethod::Keep,
            },
            GifFrameSpec {
                rect: (0, 0, 2, 2),
                px: BLUE,
                delay_cs: 2,
                dispose: gif::DisposalMethod::Previous,
            },
            GifFrameSpec {
                rect: (3, 3, 1, 1),
                px: GREEN,
                delay_cs: 2,
                dispose: gif::DisposalMethod::Keep,
            },
        ],
    );

    let img = decode(&bytes, "image/gif").unwrap();
    assert_eq!(img.frames()[1].buffer.get_pixel(0, 0).0, BLUE);
    let last = &img.frames()[2].buffer;
    assert_eq!(last.get_pixel(0, 0).0, RED);
    assert_eq!(last.get_pixel(3, 3).0, GREEN);
}

#[test]
fn png_still_decodes_with_layout_flag() {
    let rgb = image::RgbImage::from_pixel(3, 2, image::Rgb([9, 8, 7]));
    let img = decode(&png_bytes(image::DynamicImage::ImageRgb8(rgb)), "image/png").unwrap();
    assert!(!img.is_animated());
    assert!(!img.primary().has_alpha);
    assert_eq!(img.dimensions(), (3, 2));
    assert_eq!(img.primary().buffer.get_pixel(2, 1).0, [9, 8, 7, 255]);
}

#[test]
fn magic_bytes_override_declared_mime() {
    let rgba = image::RgbaImage::from_pixel(1, 1, image::Rgba([1, 2, 3, 4]));
    let bytes = png_bytes(image::DynamicImage::ImageRgba8(rgba));
    assert_eq!(sniff_mime(&bytes), Some("image/png"));
    let img = decode(&bytes, "application/octet-stream").unwrap();
    assert!(img.primary().has_alpha);
    assert_eq!(resolve_format(&bytes, "image/gif").unwrap(), ImageFormat::Png);
}

#[test]
fn garbage_is_a_decode_error() {
    let err = decode(b"definitely not an image", "text/plain").unwrap_err();
    assert!(matches!(err, ToolboxError::Decode(_)));

    let err = decode(b"GIF89a\x01", "image/gif").unwrap_err();
    assert!(matches!(err, ToolboxError::Decode(_)));
}
