use image::RgbaImage;
use rayon::prelude::*;

use crate::foundation::math::{premultiply, unpremultiply};

#[derive(Clone, Copy)]
enum Axis {
    Horizontal,
    Vertical,
}

/// Gaussian blur of a straight-alpha buffer.
///
/// Colour is averaged in premultiplied space so fully transparent pixels do not bleed black into
/// their neighbours. Samples past the border repeat the edge pixel.
pub(crate) fn gaussian_blur(src: &RgbaImage, sigma: f32) -> RgbaImage {
    let radius = radius_for_sigma(sigma);
    let (width, height) = src.dimensions();
    if radius == 0 || width == 0 || height == 0 {
        return src.clone();
    }
    let kernel = gaussian_kernel(radius, sigma);

    let premul: Vec<[u8; 4]> = src.pixels().map(|p| premultiply(p.0)).collect();
    let across = convolve_axis(&premul, width, height, &kernel, Axis::Horizontal);
    let down = convolve_axis(&across, width, height, &kernel, Axis::Vertical);

    let mut out = RgbaImage::new(width, height);
    for (dst, px) in out.pixels_mut().zip(down) {
        dst.0 = unpremultiply(px);
    }
    out
}

/// Kernel radius covering three standard deviations.
pub(crate) fn radius_for_sigma(sigma: f32) -> u32 {
    if sigma.is_finite() && sigma > 0.0 {
        (f64::from(sigma) * 3.0).ceil() as u32
    } else {
        0
    }
}

/// Normalized weights for offsets `-radius..=radius`.
fn gaussian_kernel(radius: u32, sigma: f32) -> Vec<f32> {
    let two_var = 2.0 * f64::from(sigma) * f64::from(sigma);
    let r = i64::from(radius);
    let raw: Vec<f64> = (-r..=r)
        .map(|d| {
            let d = d as f64;
            (-d * d / two_var).exp()
        })
        .collect();
    let total: f64 = raw.iter().sum();
    raw.into_iter().map(|w| (w / total) as f32).collect()
}

fn convolve_axis(
    src: &[[u8; 4]],
    width: u32,
    height: u32,
    kernel: &[f32],
    axis: Axis,
) -> Vec<[u8; 4]> {
    let (w, h) = (width as usize, height as usize);
    let radius = kernel.len() / 2;
    let mut out = vec![[0u8; 4]; src.len()];
    out.par_chunks_mut(w).enumerate().for_each(|(y, row)| {
        for (x, dst) in row.iter_mut().enumerate() {
            let mut acc = [0f32; 4];
            for (k, &weight) in kernel.iter().enumerate() {
                // Offset from the centre tap, clamped onto the image.
                let sample = match axis {
                    Axis::Horizontal => y * w + (x + k).saturating_sub(radius).min(w - 1),
                    Axis::Vertical => (y + k).saturating_sub(radius).min(h - 1) * w + x,
                };
                for (a, &c) in acc.iter_mut().zip(&src[sample]) {
                    *a += weight * f32::from(c);
                }
            }
            *dst = acc.map(|v| v.round().clamp(0.0, 255.0) as u8);
        }
    });
    out
}

#[cfg(test)]
#[path = "../../tests/unit/ops/blur.rs"]
mod tests;
