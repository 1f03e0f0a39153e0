use std::io::Cursor;

use image::{AnimationDecoder, ImageFormat, RgbaImage};

use crate::{
    foundation::error::{ToolboxError, ToolboxResult},
    frame::model::{Frame, Image},
};

/// GIF frame delays are stored in hundredths of a second; the frame model uses milliseconds.
pub(crate) const GIF_DELAY_UNIT_MS: u32 = 10;

/// Formats the toolbox accepts as input.
const SUPPORTED: &[ImageFormat] = &[
    ImageFormat::Gif,
    ImageFormat::Png,
    ImageFormat::Jpeg,
    ImageFormat::WebP,
    ImageFormat::Bmp,
    ImageFormat::Ico,
    ImageFormat::Tiff,
];

/// Pick the container format for `bytes`.
///
/// Magic bytes win over the declared MIME type; the declaration is only used for formats
/// without a recognizable signature.
pub fn resolve_format(bytes: &[u8], mime: &str) -> ToolboxResult<ImageFormat> {
    let sniffed = image::guess_format(bytes).ok();
    let declared = ImageFormat::from_mime_type(mime.trim());
    let format = sniffed
        .or(declared)
        .ok_or_else(|| ToolboxError::decode(format!("unrecognized image type '{mime}'")))?;
    if !SUPPORTED.contains(&format) {
        return Err(ToolboxError::decode(format!(
            "unsupported image format {format:?}"
        )));
    }
    Ok(format)
}

/// MIME type sniffed from magic bytes, if any.
pub fn sniff_mime(bytes: &[u8]) -> Option<&'static str> {
    image::guess_format(bytes).ok().map(|f| f.to_mime_type())
}

/// Decode encoded bytes into the frame model.
///
/// Animated containers produce one full-canvas frame per source frame with durations in
/// milliseconds; everything else produces a single still frame.
pub fn decode(bytes: &[u8], mime: &str) -> ToolboxResult<Image> {
    let format = resolve_format(bytes, mime)?;
    let image = match format {
        ImageFormat::Gif => decode_gif(bytes)?,
        ImageFormat::Png => decode_png(bytes)?,
        ImageFormat::WebP => decode_webp(bytes)?,
        other => decode_still(bytes, other)?,
    };
    let (w, h) = image.dimensions();
    tracing::debug!(
        ?format,
        frames = image.frame_count(),
        width = w,
        height = h,
        "decoded image"
    );
    Ok(image)
}

fn decode_still(bytes: &[u8], format: ImageFormat) -> ToolboxResult<Image> {
    let dyn_img = image::load_from_memory_with_format(bytes, format)
        .map_err(|e| ToolboxError::decode(format!("{format:?}: {e}")))?;
    let has_alpha = dyn_img.color().has_alpha();
    let frame = Frame::new(dyn_img.to_rgba8(), 0, has_alpha);
    Image::new(vec![frame], None)
}

fn decode_png(bytes: &[u8]) -> ToolboxResult<Image> {
    let decoder = image::codecs::png::PngDecoder::new(Cursor::new(bytes))
        .map_err(|e| ToolboxError::decode(format!("png: {e}")))?;
    let is_apng = decoder
        .is_apng()
        .map_err(|e| ToolboxError::decode(format!("png: {e}")))?;
    if !is_apng {
        return decode_still(bytes, ImageFormat::Png);
    }
    let apng = decoder
        .apng()
        .map_err(|e| ToolboxError::decode(format!("apng: {e}")))?;
    decode_animation(apng)
}

fn decode_webp(bytes: &[u8]) -> ToolboxResult<Image> {
    let decoder = image::codecs::webp::WebPDecoder::new(Cursor::new(bytes))
        .map_err(|e| ToolboxError::decode(format!("webp: {e}")))?;
    if !decoder.has_animation() {
        return decode_still(bytes, ImageFormat::WebP);
    }
    decode_animation(decoder)
}

/// Shared path for decoders that composite frames themselves and report delays in
/// milliseconds (APNG, animated WebP).
fn decode_animation<'a>(decoder: impl AnimationDecoder<'a>) -> ToolboxResult<Image> {
    let frames = decoder
        .into_frames()
        .collect_frames()
        .map_err(|e| ToolboxError::decode(format!("animation frames: {e}")))?;
    let frames = frames
        .into_iter()
        .map(|f| {
            let (num, den) = f.delay().numer_denom_ms();
            let ms = if den == 0 {
                0
            } else {
                (f64::from(num) / f64::from(den)).round() as u32
            };
            Frame::new(f.into_buffer(), ms, true)
        })
        .collect::<Vec<_>>();
    if frames.is_empty() {
        return Err(ToolboxError::decode("animation has no frames"));
    }
    Image::new(frames, None)
}

/// Decode a GIF by replaying its frames onto a logical-screen canvas.
///
/// GIF frames are deltas: each one covers a sub-rectangle and declares how it is disposed
/// before the next frame draws. The canvas is snapshotted after each draw so every frame in
/// the model renders on its own.
fn decode_gif(bytes: &[u8]) -> ToolboxResult<Image> {
    let mut opts = gif::DecodeOptions::new();
    opts.set_color_output(gif::ColorOutput::RGBA);
    let mut decoder = opts
        .read_info(Cursor::new(bytes))
        .map_err(|e| ToolboxError::decode(format!("gif header: {e}")))?;

    let mut screen = GifScreen::new(u32::from(decoder.width()), u32::from(decoder.height()));
    let mut frames = Vec::<Frame>::new();
    while let Some(frame) = decoder
        .read_next_frame()
        .map_err(|e| ToolboxError::decode(format!("gif frame {}: {e}", frames.len())))?
    {
        let snapshot = screen.draw(frame)?;
        frames.push(Frame::new(
            snapshot,
            u32::from(frame.delay) * GIF_DELAY_UNIT_MS,
            true,
        ));
    }
    if frames.is_empty() {
        return Err(ToolboxError::decode("gif has no frames"));
    }

    let loop_count = match decoder.repeat() {
        gif::Repeat::Infinite => None,
        gif::Repeat::Finite(n) => Some(n),
    };
    tracing::trace!(frames = frames.len(), ?loop_count, "gif disposal replay done");
    Image::new(frames, loop_count)
}

struct GifScreen {
    canvas: Option<RgbaImage>,
    width: u32,
    height: u32,
}

impl GifScreen {
    fn new(width: u32, height: u32) -> Self {
        Self {
            canvas: None,
            width,
            height,
        }
    }

    fn draw(&mut self, frame: &gif::Frame<'_>) -> ToolboxResult<RgbaImage> {
        let (fx, fy) = (u32::from(frame.left), u32::from(frame.top));
        let (fw, fh) = (u32::from(frame.width), u32::from(frame.height));
        let (sw, sh) = (self.width, self.height);
        let canvas = self.canvas.get_or_insert_with(|| {
            // Some encoders write a zero logical screen; fall back to the first frame extent.
            let w = if sw == 0 { fx + fw } else { sw };
            let h = if sh == 0 { fy + fh } else { sh };
            RgbaImage::new(w.max(1), h.max(1))
        });

        let expected = (fw as usize) * (fh as usize) * 4;
        if frame.buffer.len() != expected {
            return Err(ToolboxError::decode(format!(
                "gif frame buffer has {} bytes, expected {expected}",
                frame.buffer.len()
            )));
        }

        let saved = matches!(frame.dispose, gif::DisposalMethod::Previous).then(|| canvas.clone());

        let (cw, ch) = canvas.dimensions();
        for row in 0..fh {
            let y = fy + row;
            if y >= ch {
                break;
            }
            for col in 0..fw {
                let x = fx + col;
                if x >= cw {
                    break;
                }
                let idx = ((row * fw + col) as usize) * 4;
                let px = &frame.buffer[idx..idx + 4];
                if px[3] == 0 {
                    continue;
                }
                canvas.put_pixel(x, y, image::Rgba([px[0], px[1], px[2], px[3]]));
            }
        }

        let snapshot = canvas.clone();

        match frame.dispose {
            gif::DisposalMethod::Background => {
                for y in fy..(fy + fh).min(ch) {
                    for x in fx..(fx + fw).min(cw) {
                        canvas.put_pixel(x, y, image::Rgba([0, 0, 0, 0]));
                    }
                }
            }
            gif::DisposalMethod::Previous => {
                if let Some(prev) = saved {
                    *canvas = prev;
                }
            }
            gif::DisposalMethod::Keep | gif::DisposalMethod::Any => {}
        }

        Ok(snapshot)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/codec/decode.rs"]
mod tests;
