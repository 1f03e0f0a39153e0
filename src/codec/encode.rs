use std::io::Cursor;

use image::{
    Delay, DynamicImage, ImageFormat,
    codecs::gif::{GifEncoder, Repeat},
};

use crate::{
    codec::decode::GIF_DELAY_UNIT_MS,
    foundation::error::{ToolboxError, ToolboxResult},
    frame::model::Image,
};

/// Quantizer speed handed to the GIF encoder (1 = best, 30 = fastest).
const GIF_SPEED: i32 = 10;

/// Encoded output bytes with their MIME type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncodedImage {
    /// Encoded file contents.
    pub bytes: Vec<u8>,
    /// `image/png` or `image/gif`.
    pub mime: &'static str,
}

impl EncodedImage {
    /// Conventional file extension for the MIME type.
    pub fn extension(&self) -> &'static str {
        match self.mime {
            "image/gif" => "gif",
            _ => "png",
        }
    }
}

/// Encode an image: one frame becomes a PNG, several frames an animated GIF.
pub fn encode(image: &Image) -> ToolboxResult<EncodedImage> {
    if image.is_animated() {
        encode_gif(image)
    } else {
        encode_png(image)
    }
}

fn encode_png(image: &Image) -> ToolboxResult<EncodedImage> {
    let frame = image.primary();
    let dyn_img = if frame.has_alpha {
        DynamicImage::ImageRgba8(frame.buffer.clone())
    } else {
        DynamicImage::ImageRgb8(DynamicImage::ImageRgba8(frame.buffer.clone()).to_rgb8())
    };
    let mut bytes = Vec::new();
    dyn_img
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .map_err(|e| ToolboxError::encode(format!("png: {e}")))?;
    Ok(EncodedImage {
        bytes,
        mime: "image/png",
    })
}

fn encode_gif(image: &Image) -> ToolboxResult<EncodedImage> {
    let (width, height) = image.dimensions();
    if width > u32::from(u16::MAX) || height > u32::from(u16::MAX) {
        return Err(ToolboxError::encode(format!(
            "gif dimensions {width}x{height} exceed 65535"
        )));
    }
    if let Some((i, f)) = image
        .frames()
        .iter()
        .enumerate()
        .find(|(_, f)| f.dimensions() != (width, height))
    {
        let (fw, fh) = f.dimensions();
        return Err(ToolboxError::encode(format!(
            "frame {i} is {fw}x{fh}, expected {width}x{height}"
        )));
    }

    let repeat = match image.loop_count {
        None => Repeat::Infinite,
        Some(n) => Repeat::Finite(n),
    };
    let frames = image.frames().iter().map(|f| {
        image::Frame::from_parts(
            f.buffer.clone(),
            0,
            0,
            Delay::from_numer_denom_ms(gif_delay_ms(f.duration_ms), 1),
        )
    });

    let mut bytes = Vec::new();
    {
        let mut encoder = GifEncoder::new_with_speed(&mut bytes, GIF_SPEED);
        encoder
            .set_repeat(repeat)
            .map_err(|e| ToolboxError::encode(format!("gif repeat: {e}")))?;
        encoder
            .encode_frames(frames)
            .map_err(|e| ToolboxError::encode(format!("gif frames: {e}")))?;
    }
    tracing::debug!(
        frames = image.frame_count(),
        bytes = bytes.len(),
        "encoded gif"
    );
    Ok(EncodedImage {
        bytes,
        mime: "image/gif",
    })
}

/// Round a duration to the nearest whole GIF delay unit. The encoder truncates, so a 17 ms
/// frame would otherwise be written as 10 ms.
fn gif_delay_ms(duration_ms: u32) -> u32 {
    let half = GIF_DELAY_UNIT_MS / 2;
    duration_ms.saturating_add(half) / GIF_DELAY_UNIT_MS * GIF_DELAY_UNIT_MS
}

#[cfg(test)]
#[path = "../../tests/unit/codec/encode.rs"]
mod tests;
