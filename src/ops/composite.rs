use image::RgbaImage;

use crate::foundation::{
    core::Rgba,
    math::{mul_div255_u8, premultiply, unpremultiply},
};

pub(crate) type PremulRgba8 = [u8; 4];

/// Porter-Duff source-over on premultiplied pixels.
pub(crate) fn over(dst: PremulRgba8, src: PremulRgba8) -> PremulRgba8 {
    if src[3] == 0 {
        return dst;
    }
    if src[3] == 255 {
        return src;
    }

    let inv = 255u16 - u16::from(src[3]);
    let mut out = [0u8; 4];
    for i in 0..4 {
        out[i] = src[i].saturating_add(mul_div255_u8(u16::from(dst[i]), inv));
    }
    out
}

/// A canvas of `width x height` filled with `color`.
pub(crate) fn filled(width: u32, height: u32, color: Rgba) -> RgbaImage {
    RgbaImage::from_pixel(width, height, image::Rgba(color.to_array()))
}

/// Composite straight-alpha `src` over straight-alpha `dst` with `src`'s top-left at
/// `(x, y)`. Parts of `src` outside `dst` are dropped.
pub(crate) fn overlay(dst: &mut RgbaImage, src: &RgbaImage, x: i64, y: i64) {
    let (dw, dh) = (i64::from(dst.width()), i64::from(dst.height()));
    let (sw, sh) = (i64::from(src.width()), i64::from(src.height()));

    let x0 = x.max(0);
    let y0 = y.max(0);
    let x1 = (x + sw).min(dw);
    let y1 = (y + sh).min(dh);
    if x0 >= x1 || y0 >= y1 {
        return;
    }

    for dy in y0..y1 {
        for dx in x0..x1 {
            let s = src.get_pixel((dx - x) as u32, (dy - y) as u32).0;
            if s[3] == 0 {
                continue;
            }
            let d = dst.get_pixel_mut(dx as u32, dy as u32);
            d.0 = unpremultiply(over(premultiply(d.0), premultiply(s)));
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/ops/composite.rs"]
mod tests;
