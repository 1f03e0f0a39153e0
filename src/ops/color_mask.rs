use crate::{
    foundation::{
        core::Rgba,
        error::{OperationError, ToolboxResult},
        math::clamp_u8,
    },
    frame::Image,
};

/// Tint every frame toward `color`.
///
/// Each pixel's luminance is redistributed across the target's channel proportions; the hue
/// and saturation of that remapped color are then recombined with the source pixel's own
/// lightness. Alpha is kept and fully transparent pixels stay transparent.
#[tracing::instrument(skip(image), fields(frames = image.frame_count()))]
pub fn color_mask(image: &Image, color: Rgba) -> ToolboxResult<Image> {
    if !color.is_opaque() {
        return Err(OperationError::AlphaNotSupported {
            value: color.to_css(),
        }
        .into());
    }
    Ok(image.map_pixels(|buf| {
        let mut out = buf.clone();
        for px in out.pixels_mut() {
            px.0 = mask_pixel(px.0, color);
        }
        out
    }))
}

fn mask_pixel(px: [u8; 4], target: Rgba) -> [u8; 4] {
    let [r, g, b, a] = px;
    if a == 0 {
        return [0, 0, 0, 0];
    }
    let lum = 0.299 * f64::from(r) + 0.587 * f64::from(g) + 0.114 * f64::from(b);
    let t = [f64::from(target.r), f64::from(target.g), f64::from(target.b)];
    let sum = t[0] + t[1] + t[2];
    let remap = if sum == 0.0 {
        [0.0; 3]
    } else {
        t.map(|c| (lum * c / sum).clamp(0.0, 255.0))
    };

    let (h, s, _) = rgb_to_hsl(remap[0] / 255.0, remap[1] / 255.0, remap[2] / 255.0);
    let (_, _, l) = rgb_to_hsl(
        f64::from(r) / 255.0,
        f64::from(g) / 255.0,
        f64::from(b) / 255.0,
    );
    let (or, og, ob) = hsl_to_rgb(h, s, l);
    [clamp_u8(or * 255.0), clamp_u8(og * 255.0), clamp_u8(ob * 255.0), a]
}

/// Normalized RGB -> (hue degrees, saturation, lightness).
pub(crate) fn rgb_to_hsl(r: f64, g: f64, b: f64) -> (f64, f64, f64) {
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let l = (max + min) / 2.0;
    let d = max - min;
    if d <= f64::EPSILON {
        return (0.0, 0.0, l);
    }
    let s = if l > 0.5 {
        d / (2.0 - max - min)
    } else {
        d / (max + min)
    };
    let h = if max == r {
        (g - b) / d + if g < b { 6.0 } else { 0.0 }
    } else if max == g {
        (b - r) / d + 2.0
    } else {
        (r - g) / d + 4.0
    };
    (h * 60.0, s, l)
}

/// (hue degrees, saturation, lightness) -> normalized RGB.
pub(crate) fn hsl_to_rgb(h: f64, s: f64, l: f64) -> (f64, f64, f64) {
    let h = (h % 360.0 + 360.0) % 360.0 / 360.0;
    let s = s.clamp(0.0, 1.0);
    let l = l.clamp(0.0, 1.0);

    if s == 0.0 {
        return (l, l, l);
    }

    fn hue_to_rgb(p: f64, q: f64, mut t: f64) -> f64 {
        if t < 0.0 {
            t += 1.0;
        }
        if t > 1.0 {
            t -= 1.0;
        }
        if t < 1.0 / 6.0 {
            return p + (q - p) * 6.0 * t;
        }
        if t < 1.0 / 2.0 {
            return q;
        }
        if t < 2.0 / 3.0 {
            return p + (q - p) * (2.0 / 3.0 - t) * 6.0;
        }
        p
    }

    let q = if l < 0.5 {
        l * (1.0 + s)
    } else {
        l + s - l * s
    };
    let p = 2.0 * l - q;

    (
        hue_to_rgb(p, q, h + 1.0 / 3.0),
        hue_to_rgb(p, q, h),
        hue_to_rgb(p, q, h - 1.0 / 3.0),
    )
}

#[cfg(test)]
#[path = "../../tests/unit/ops/color_mask.rs"]
mod tests;
