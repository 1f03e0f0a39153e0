use serde::{Deserialize, Serialize};

use crate::{
    config::ToolboxConfig,
    foundation::{
        core::Rgba,
        error::{OperationError, ToolboxResult},
    },
    frame::{Frame, Image},
    ops::{composite, geometry::resample},
};

/// Axis along which images are laid out.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JoinDirection {
    /// Left to right, sharing a common height.
    Horizontal,
    /// Top to bottom, sharing a common width.
    Vertical,
}

/// Lay the first frame of each image side by side over `background`.
///
/// Images are scaled to the largest cross-axis extent, keeping aspect ratio, and separated by
/// `spacing` pixels. Animated inputs are refused unless `force` is set. The canvas size is
/// checked against `cfg.max_output_size` before anything is resampled or allocated.
#[tracing::instrument(skip(images, cfg), fields(images = images.len()))]
pub fn join(
    images: &[Image],
    direction: JoinDirection,
    spacing: i64,
    background: Rgba,
    force: bool,
    cfg: &ToolboxConfig,
) -> ToolboxResult<Image> {
    if spacing < 0 {
        return Err(OperationError::too_small("spacing", spacing, 0).into());
    }
    if images.len() < 2 {
        return Err(OperationError::ImageNotEnough { min: 2 }.into());
    }
    if !force && images.iter().any(Image::is_animated) {
        tracing::debug!("animated input to join without force");
        return Err(OperationError::ImageAnimatedWarn.into());
    }
    let max = u64::from(cfg.max_output_size);

    let firsts: Vec<&Frame> = images.iter().map(Image::primary).collect();
    let cross = firsts
        .iter()
        .map(|f| match direction {
            JoinDirection::Horizontal => f.height(),
            JoinDirection::Vertical => f.width(),
        })
        .max()
        .unwrap_or(1);

    let targets: Vec<(u64, u64)> = firsts
        .iter()
        .map(|f| {
            let (w, h) = f.dimensions();
            match direction {
                JoinDirection::Horizontal => (scale_side(w, cross, h), u64::from(cross)),
                JoinDirection::Vertical => (u64::from(cross), scale_side(h, cross, w)),
            }
        })
        .collect();

    let gaps = (spacing as u64).saturating_mul(targets.len() as u64 - 1);
    let along = targets
        .iter()
        .map(|&(w, h)| match direction {
            JoinDirection::Horizontal => w,
            JoinDirection::Vertical => h,
        })
        .fold(gaps, u64::saturating_add);
    let (canvas_w, canvas_h) = match direction {
        JoinDirection::Horizontal => (along, u64::from(cross)),
        JoinDirection::Vertical => (u64::from(cross), along),
    };
    for (name, value) in [("width", canvas_w), ("height", canvas_h)] {
        if value > max {
            tracing::debug!(name, value, max, "join canvas over limit");
            return Err(OperationError::too_big(name, value, max).into());
        }
    }

    // Every side is now bounded by max_output_size, which fits in u32.
    let side = |v: u64| u32::try_from(v).unwrap_or(u32::MAX);
    let scaled: Vec<_> = firsts
        .iter()
        .zip(&targets)
        .map(|(f, &(tw, th))| resample(&f.buffer, side(tw), side(th)))
        .collect();

    let mut canvas = composite::filled(side(canvas_w), side(canvas_h), background);
    let mut offset = 0i64;
    for buf in &scaled {
        match direction {
            JoinDirection::Horizontal => {
                composite::overlay(&mut canvas, buf, offset, 0);
                offset += i64::from(buf.width());
            }
            JoinDirection::Vertical => {
                composite::overlay(&mut canvas, buf, 0, offset);
                offset += i64::from(buf.height());
            }
        }
        offset += spacing;
    }

    Ok(Image::still(Frame::new(
        canvas,
        0,
        !background.is_opaque(),
    )))
}

pub fn horizontal_join(
    images: &[Image],
    spacing: i64,
    background: Rgba,
    force: bool,
    cfg: &ToolboxConfig,
) -> ToolboxResult<Image> {
    join(images, JoinDirection::Horizontal, spacing, background, force, cfg)
}

pub fn vertical_join(
    images: &[Image],
    spacing: i64,
    background: Rgba,
    force: bool,
    cfg: &ToolboxConfig,
) -> ToolboxResult<Image> {
    join(images, JoinDirection::Vertical, spacing, background, force, cfg)
}

/// `side * target / reference`, rounded, never below 1.
fn scale_side(side: u32, target: u32, reference: u32) -> u64 {
    let v = (f64::from(side) * f64::from(target) / f64::from(reference)).round();
    v.max(1.0) as u64
}

#[cfg(test)]
#[path = "../../tests/unit/assembly/join.rs"]
mod tests;
