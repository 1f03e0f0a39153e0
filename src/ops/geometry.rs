use image::{RgbaImage, imageops};

use crate::{
    args::size::{parse_crop_spec, parse_size_spec},
    config::ToolboxConfig,
    foundation::{
        error::{OperationError, ToolboxResult},
        math::{premultiply, unpremultiply},
    },
    frame::Image,
};

/// Mirror every frame left-to-right.
pub fn flip_horizontal(image: &Image) -> Image {
    image.map_pixels(imageops::flip_horizontal)
}

/// Mirror every frame top-to-bottom.
pub fn flip_vertical(image: &Image) -> Image {
    image.map_pixels(imageops::flip_vertical)
}

/// Mirror both axes; equal to a 180 degree rotation.
pub fn flip_both(image: &Image) -> Image {
    image.map_pixels(imageops::rotate180)
}

/// Rotate every frame clockwise by `degrees`, expanding the canvas to fit.
///
/// Multiples of 90 degrees take exact pixel-permutation paths. Other angles resample with a
/// Catmull-Rom bicubic filter; uncovered corners become transparent, so output frames carry
/// alpha.
#[tracing::instrument(skip(image), fields(frames = image.frame_count()))]
pub fn rotate(image: &Image, degrees: f64) -> Image {
    let deg = degrees.rem_euclid(360.0);
    let quarter = deg / 90.0;
    if (quarter - quarter.round()).abs() < 1e-9 {
        return match quarter.round() as u32 % 4 {
            0 => image.clone(),
            1 => image.map_pixels(imageops::rotate90),
            2 => image.map_pixels(imageops::rotate180),
            _ => image.map_pixels(imageops::rotate270),
        };
    }

    let mut out = image.map_pixels(|buf| rotate_bicubic(buf, deg));
    out.set_alpha(true);
    out
}

/// Resize every frame to the dimensions `spec` resolves against the primary frame.
///
/// Downscaling (neither side grows) uses nearest-neighbour, anything else Catmull-Rom.
#[tracing::instrument(skip(image, cfg), fields(frames = image.frame_count()))]
pub fn resize(image: &Image, spec: &str, cfg: &ToolboxConfig) -> ToolboxResult<Image> {
    let (src_w, src_h) = image.dimensions();
    let (w, h) = parse_size_spec(spec, src_w, src_h)?;
    for (name, v) in [("width", w), ("height", h)] {
        if v > cfg.max_size {
            return Err(OperationError::too_big(name, v, cfg.max_size).into());
        }
    }

    tracing::debug!(w, h, "resize");
    Ok(image.map_pixels(|buf| resample(buf, w, h)))
}

/// Scale `buf` to exactly `w x h`: nearest-neighbour when shrinking, Catmull-Rom otherwise.
pub(crate) fn resample(buf: &RgbaImage, w: u32, h: u32) -> RgbaImage {
    if buf.dimensions() == (w, h) {
        return buf.clone();
    }
    let filter = if w <= buf.width() && h <= buf.height() {
        imageops::FilterType::Nearest
    } else {
        imageops::FilterType::CatmullRom
    };
    imageops::resize(buf, w, h, filter)
}

/// Cut a centered region out of every frame. The requested region is clamped to each frame.
#[tracing::instrument(skip(image), fields(frames = image.frame_count()))]
pub fn crop(image: &Image, spec: &str) -> ToolboxResult<Image> {
    let (src_w, src_h) = image.dimensions();
    let (w, h) = parse_crop_spec(spec, src_w, src_h)?;
    Ok(image.map_pixels(|buf| center_crop(buf, w, h)))
}

pub(crate) fn center_crop(buf: &RgbaImage, w: u32, h: u32) -> RgbaImage {
    let (bw, bh) = buf.dimensions();
    let w = w.min(bw);
    let h = h.min(bh);
    let x = (bw - w) / 2;
    let y = (bh - h) / 2;
    imageops::crop_imm(buf, x, y, w, h).to_image()
}

fn rotate_bicubic(src: &RgbaImage, deg: f64) -> RgbaImage {
    let (sin, cos) = deg.to_radians().sin_cos();
    let (sw, sh) = (f64::from(src.width()), f64::from(src.height()));
    let out_w = ((sw * cos.abs() + sh * sin.abs()) - 1e-6).ceil().max(1.0) as u32;
    let out_h = ((sw * sin.abs() + sh * cos.abs()) - 1e-6).ceil().max(1.0) as u32;

    let premul: Vec<[u8; 4]> = src.pixels().map(|p| premultiply(p.0)).collect();
    let src_w = src.width() as i64;
    let src_h = src.height() as i64;
    let fetch = |x: i64, y: i64| -> [f64; 4] {
        if x < 0 || y < 0 || x >= src_w || y >= src_h {
            return [0.0; 4];
        }
        let p = premul[(y * src_w + x) as usize];
        [
            f64::from(p[0]),
            f64::from(p[1]),
            f64::from(p[2]),
            f64::from(p[3]),
        ]
    };

    let half_out_w = f64::from(out_w) / 2.0;
    let half_out_h = f64::from(out_h) / 2.0;
    let mut out = RgbaImage::new(out_w, out_h);
    for (x, y, px) in out.enumerate_pixels_mut() {
        let dx = f64::from(x) + 0.5 - half_out_w;
        let dy = f64::from(y) + 0.5 - half_out_h;
        // Inverse of a clockwise rotation in y-down coordinates.
        let u = dx * cos + dy * sin + sw / 2.0 - 0.5;
        let v = -dx * sin + dy * cos + sh / 2.0 - 0.5;

        let x0 = u.floor() as i64;
        let y0 = v.floor() as i64;
        let mut acc = [0.0f64; 4];
        for j in -1..=2 {
            let wy = catmull_rom(v - (y0 + j) as f64);
            if wy == 0.0 {
                continue;
            }
            for i in -1..=2 {
                let wx = catmull_rom(u - (x0 + i) as f64);
                if wx == 0.0 {
                    continue;
                }
                let s = fetch(x0 + i, y0 + j);
                let w = wx * wy;
                for c in 0..4 {
                    acc[c] += s[c] * w;
                }
            }
        }

        let a = acc[3].round().clamp(0.0, 255.0);
        let channel = |v: f64| v.round().clamp(0.0, a) as u8;
        px.0 = unpremultiply([channel(acc[0]), channel(acc[1]), channel(acc[2]), a as u8]);
    }
    out
}

fn catmull_rom(t: f64) -> f64 {
    let t = t.abs();
    if t < 1.0 {
        1.5 * t * t * t - 2.5 * t * t + 1.0
    } else if t < 2.0 {
        -0.5 * t * t * t + 2.5 * t * t - 4.0 * t + 2.0
    } else {
        0.0
    }
}

#[cfg(test)]
#[path = "../../tests/unit/ops/geometry.rs"]
mod tests;
