use image::RgbaImage;

use crate::{
    args::rate::parse_rate_spec,
    config::ToolboxConfig,
    foundation::{
        core::Rgba,
        error::{OperationError, ToolboxResult},
    },
    frame::{Frame, Image},
    ops::{composite, geometry::resample},
};

/// Play the animation backwards. Consumes the input so no frame buffer is shared.
pub fn reverse(image: Image) -> ToolboxResult<Image> {
    image.ensure_animation()?;
    let loop_count = image.loop_count;
    let mut frames = image.into_frames();
    frames.reverse();
    Image::new(frames, loop_count)
}

/// Forward then backward, without repeating either endpoint: `f0..fn, f(n-1)..f1`.
pub fn obverse_reverse(image: &Image) -> ToolboxResult<Image> {
    image.ensure_animation()?;
    let forward = image.frames();
    let mut frames = Vec::with_capacity(forward.len() * 2 - 2);
    frames.extend_from_slice(forward);
    frames.extend(forward[1..forward.len() - 1].iter().rev().cloned());
    Image::new(frames, image.loop_count)
}

/// Every frame as an independent still, in order.
pub fn split(image: &Image) -> ToolboxResult<Vec<Image>> {
    image.ensure_animation()?;
    Ok(image.frames().iter().cloned().map(Image::still).collect())
}

/// Re-time the animation with a rate spec (`2x`, `50%`, `30fps`, `40ms`, `0.1s`).
///
/// Without `force`, a mean frame duration under the configured threshold is refused with a
/// soft warning.
#[tracing::instrument(skip(image, cfg), fields(frames = image.frame_count()))]
pub fn change_fps(
    image: &Image,
    spec: &str,
    force: bool,
    cfg: &ToolboxConfig,
) -> ToolboxResult<Image> {
    image.ensure_animation()?;
    let durations = parse_rate_spec(spec, &image.durations())?;
    let average_ms = mean(&durations);
    if !force && average_ms < f64::from(cfg.min_frame_duration_ms) {
        tracing::debug!(average_ms, "frame rate above limit without force");
        return Err(OperationError::FpsExceedRangeWarn { average_ms }.into());
    }
    image.clone().with_durations(&durations)
}

/// Pool every frame of every input into one looping animation with a uniform duration.
///
/// Frames are centered on a transparent canvas as large as the largest width and height
/// seen; a frame that would not fit is scaled down preserving aspect ratio.
#[tracing::instrument(skip(images, cfg), fields(images = images.len()))]
pub fn gif_join(
    images: &[Image],
    duration_ms: i64,
    force: bool,
    cfg: &ToolboxConfig,
) -> ToolboxResult<Image> {
    if duration_ms < 0 {
        return Err(OperationError::too_small("duration", duration_ms, 0).into());
    }
    let pooled: Vec<&Frame> = images.iter().flat_map(|img| img.frames()).collect();
    if pooled.len() < 2 {
        return Err(OperationError::ImageNotEnough { min: 2 }.into());
    }
    if !force && duration_ms < i64::from(cfg.min_frame_duration_ms) {
        tracing::debug!(duration_ms, "join duration above frame rate limit without force");
        return Err(OperationError::FpsExceedRangeWarn {
            average_ms: duration_ms as f64,
        }
        .into());
    }
    let duration = u32::try_from(duration_ms).unwrap_or(u32::MAX);

    let box_w = pooled.iter().map(|f| f.width()).max().unwrap_or(1);
    let box_h = pooled.iter().map(|f| f.height()).max().unwrap_or(1);
    for (name, value) in [("width", box_w), ("height", box_h)] {
        if value > cfg.max_output_size {
            return Err(OperationError::too_big(name, value, cfg.max_output_size).into());
        }
    }
    let frames = pooled
        .into_iter()
        .map(|f| Frame::new(fit_centered(&f.buffer, box_w, box_h), duration, true))
        .collect();
    Image::new(frames, None)
}

fn fit_centered(buf: &RgbaImage, box_w: u32, box_h: u32) -> RgbaImage {
    let (w, h) = buf.dimensions();
    let scale = (f64::from(box_w) / f64::from(w))
        .min(f64::from(box_h) / f64::from(h))
        .min(1.0);
    let fitted;
    let src = if scale < 1.0 {
        let fw = ((f64::from(w) * scale).round() as u32).clamp(1, box_w);
        let fh = ((f64::from(h) * scale).round() as u32).clamp(1, box_h);
        fitted = resample(buf, fw, fh);
        &fitted
    } else {
        buf
    };

    let mut canvas = composite::filled(box_w, box_h, Rgba::TRANSPARENT);
    let x = (i64::from(box_w) - i64::from(src.width())) / 2;
    let y = (i64::from(box_h) - i64::from(src.height())) / 2;
    composite::overlay(&mut canvas, src, x, y);
    canvas
}

fn mean(durations: &[u32]) -> f64 {
    if durations.is_empty() {
        return 0.0;
    }
    durations.iter().map(|&d| f64::from(d)).sum::<f64>() / durations.len() as f64
}

#[cfg(test)]
#[path = "../../tests/unit/assembly/gif.rs"]
mod tests;
