use image::RgbaImage;

use crate::{
    config::ToolboxConfig,
    foundation::{
        error::{OperationError, ToolboxResult},
        math::{clamp_u8, luma601},
    },
    frame::Image,
    ops::blur::gaussian_blur,
};

/// 3x3 integer convolution kernel applied to RGB; alpha is left untouched.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Kernel3 {
    /// Row-major weights.
    pub weights: [i32; 9],
    /// Divisor applied to the weighted sum.
    pub divisor: i32,
    /// Offset added after division.
    pub offset: i32,
}

impl Kernel3 {
    /// Edge outline on a white background.
    pub const CONTOUR: Self = Self {
        weights: [-1, -1, -1, -1, 8, -1, -1, -1, -1],
        divisor: 1,
        offset: 255,
    };

    /// Relief effect around mid gray.
    pub const EMBOSS: Self = Self {
        weights: [-1, 0, 0, 0, 1, 0, 0, 0, 0],
        divisor: 1,
        offset: 128,
    };

    /// Boosts each pixel against its eight neighbours.
    pub const SHARPEN: Self = Self {
        weights: [-2, -2, -2, -2, 32, -2, -2, -2, -2],
        divisor: 16,
        offset: 0,
    };
}

/// Replace RGB with Rec.601 luma, keeping alpha.
pub fn grayscale(image: &Image) -> Image {
    image.map_pixels(|buf| {
        let mut out = buf.clone();
        for px in out.pixels_mut() {
            let [r, g, b, a] = px.0;
            let l = luma601(r, g, b);
            px.0 = [l, l, l, a];
        }
        out
    })
}

/// Invert RGB, keeping alpha.
pub fn invert(image: &Image) -> Image {
    image.map_pixels(|buf| {
        let mut out = buf.clone();
        for px in out.pixels_mut() {
            let [r, g, b, a] = px.0;
            px.0 = [255 - r, 255 - g, 255 - b, a];
        }
        out
    })
}

pub fn contour(image: &Image) -> Image {
    convolve(image, &Kernel3::CONTOUR)
}

pub fn emboss(image: &Image) -> Image {
    convolve(image, &Kernel3::EMBOSS)
}

pub fn sharpen(image: &Image) -> Image {
    convolve(image, &Kernel3::SHARPEN)
}

/// Apply `kernel` to every frame. Pixels past the border replicate the nearest edge pixel.
pub fn convolve(image: &Image, kernel: &Kernel3) -> Image {
    image.map_pixels(|buf| convolve_buffer(buf, kernel))
}

fn convolve_buffer(src: &RgbaImage, kernel: &Kernel3) -> RgbaImage {
    let (w, h) = (src.width() as i64, src.height() as i64);
    let divisor = f64::from(kernel.divisor.max(1));
    let mut out = RgbaImage::new(src.width(), src.height());
    for (x, y, px) in out.enumerate_pixels_mut() {
        let mut acc = [0i64; 3];
        for (k, &weight) in kernel.weights.iter().enumerate() {
            let sx = (i64::from(x) + (k % 3) as i64 - 1).clamp(0, w - 1);
            let sy = (i64::from(y) + (k / 3) as i64 - 1).clamp(0, h - 1);
            let s = src.get_pixel(sx as u32, sy as u32).0;
            for c in 0..3 {
                acc[c] += i64::from(weight) * i64::from(s[c]);
            }
        }
        let a = src.get_pixel(x, y).0[3];
        let channel = |sum: i64| clamp_u8(sum as f64 / divisor + f64::from(kernel.offset));
        px.0 = [channel(acc[0]), channel(acc[1]), channel(acc[2]), a];
    }
    out
}

/// Gaussian blur with standard deviation `sigma`. Zero is the identity; anything above
/// `cfg.max_blur_sigma` is refused before any work is done.
#[tracing::instrument(skip(image, cfg), fields(frames = image.frame_count()))]
pub fn blur(image: &Image, sigma: f64, cfg: &ToolboxConfig) -> ToolboxResult<Image> {
    if sigma.is_nan() || sigma < 0.0 {
        return Err(OperationError::too_small("radius", sigma, 0).into());
    }
    if sigma > f64::from(cfg.max_blur_sigma) {
        return Err(OperationError::too_big("radius", sigma, cfg.max_blur_sigma).into());
    }
    if sigma == 0.0 {
        return Ok(image.clone());
    }
    let sigma = sigma as f32;
    Ok(image.map_pixels(|buf| gaussian_blur(buf, sigma)))
}

/// Replace each `size x size` block with its alpha-weighted average. `0` and `1` are the
/// identity.
#[tracing::instrument(skip(image), fields(frames = image.frame_count()))]
pub fn pixelate(image: &Image, size: i64) -> ToolboxResult<Image> {
    if size < 0 {
        return Err(OperationError::too_small("size", size, 0).into());
    }
    if size <= 1 {
        return Ok(image.clone());
    }
    let block = u32::try_from(size).unwrap_or(u32::MAX);
    Ok(image.map_pixels(|buf| pixelate_buffer(buf, block)))
}

fn pixelate_buffer(src: &RgbaImage, block: u32) -> RgbaImage {
    let (w, h) = src.dimensions();
    let mut out = RgbaImage::new(w, h);
    let mut by = 0;
    while by < h {
        let bh = block.min(h - by);
        let mut bx = 0;
        while bx < w {
            let bw = block.min(w - bx);
            let mut sum = [0u64; 4];
            for y in by..by + bh {
                for x in bx..bx + bw {
                    let p = src.get_pixel(x, y).0;
                    let a = u64::from(p[3]);
                    sum[0] += u64::from(p[0]) * a;
                    sum[1] += u64::from(p[1]) * a;
                    sum[2] += u64::from(p[2]) * a;
                    sum[3] += a;
                }
            }
            let count = u64::from(bw) * u64::from(bh);
            let avg = if sum[3] == 0 {
                [0, 0, 0, 0]
            } else {
                let c = |v: u64| ((v + sum[3] / 2) / sum[3]).min(255) as u8;
                let a = ((sum[3] + count / 2) / count).min(255) as u8;
                [c(sum[0]), c(sum[1]), c(sum[2]), a]
            };
            for y in by..by + bh {
                for x in bx..bx + bw {
                    out.put_pixel(x, y, image::Rgba(avg));
                }
            }
            bx += bw;
        }
        by += bh;
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/ops/filter.rs"]
mod tests;
