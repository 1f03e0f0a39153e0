use image::RgbaImage;
use rayon::prelude::*;

use crate::foundation::error::{OperationError, ToolboxError, ToolboxResult};

/// One raster image within a (possibly length-1) sequence.
///
/// Pixels are always stored as straight-alpha RGBA8. `has_alpha` records whether the source
/// layout carried an alpha channel; encoders use it to pick RGB vs RGBA output.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    /// Pixel buffer, row-major, tightly packed.
    pub buffer: RgbaImage,
    /// Display duration in milliseconds. Zero for stills.
    pub duration_ms: u32,
    /// Whether the alpha channel is meaningful.
    pub has_alpha: bool,
}

impl Frame {
    /// Build a frame from an RGBA buffer.
    pub fn new(buffer: RgbaImage, duration_ms: u32, has_alpha: bool) -> Self {
        Self {
            buffer,
            duration_ms,
            has_alpha,
        }
    }

    /// Build a still frame that carries alpha.
    pub fn still(buffer: RgbaImage) -> Self {
        Self::new(buffer, 0, true)
    }

    /// Frame width in pixels.
    pub fn width(&self) -> u32 {
        self.buffer.width()
    }

    /// Frame height in pixels.
    pub fn height(&self) -> u32 {
        self.buffer.height()
    }

    /// `(width, height)`.
    pub fn dimensions(&self) -> (u32, u32) {
        self.buffer.dimensions()
    }

    /// Replace the pixels, keeping timing and alpha flag.
    pub fn with_buffer(&self, buffer: RgbaImage) -> Self {
        Self {
            buffer,
            duration_ms: self.duration_ms,
            has_alpha: self.has_alpha,
        }
    }
}

/// Ordered, non-empty frame sequence plus loop count.
///
/// A single frame is a still image; more than one frame is an animation. The first frame is
/// the primary frame used by operations that only look at still content.
#[derive(Clone, Debug, PartialEq)]
pub struct Image {
    frames: Vec<Frame>,
    /// `None` loops forever; `Some(n)` is the GIF repeat count (`Some(0)` plays once).
    pub loop_count: Option<u16>,
}

impl Image {
    /// Build an image from frames. Fails on an empty sequence.
    pub fn new(frames: Vec<Frame>, loop_count: Option<u16>) -> ToolboxResult<Self> {
        if frames.is_empty() {
            return Err(ToolboxError::validation("image must have at least one frame"));
        }
        if frames.iter().any(|f| f.width() == 0 || f.height() == 0) {
            return Err(ToolboxError::validation("frame dimensions must be positive"));
        }
        Ok(Self { frames, loop_count })
    }

    /// Single-frame image.
    pub fn still(frame: Frame) -> Self {
        Self {
            frames: vec![Frame {
                duration_ms: 0,
                ..frame
            }],
            loop_count: None,
        }
    }

    /// Single-frame image from a buffer that carries alpha.
    pub fn from_rgba(buffer: RgbaImage) -> Self {
        Self::still(Frame::still(buffer))
    }

    /// All frames in playback order.
    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    /// Consume into frames.
    pub fn into_frames(self) -> Vec<Frame> {
        self.frames
    }

    /// The first frame.
    pub fn primary(&self) -> &Frame {
        &self.frames[0]
    }

    /// Number of frames.
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// `true` when there is more than one frame.
    pub fn is_animated(&self) -> bool {
        self.frames.len() > 1
    }

    /// Dimensions of the primary frame.
    pub fn dimensions(&self) -> (u32, u32) {
        self.primary().dimensions()
    }

    /// Per-frame durations in milliseconds.
    pub fn durations(&self) -> Vec<u32> {
        self.frames.iter().map(|f| f.duration_ms).collect()
    }

    /// Whether any frame carries meaningful alpha.
    pub fn has_alpha(&self) -> bool {
        self.frames.iter().any(|f| f.has_alpha)
    }

    /// Fail with `image-must-animated` unless this is an animation.
    pub fn ensure_animation(&self) -> Result<(), OperationError> {
        if self.is_animated() {
            Ok(())
        } else {
            Err(OperationError::ImageMustBeAnimated)
        }
    }

    /// Apply `f` to every frame's pixels in parallel. Durations, alpha flags and loop count are
    /// kept and output order matches input order.
    pub fn map_frames<F>(&self, f: F) -> ToolboxResult<Self>
    where
        F: Fn(&RgbaImage) -> ToolboxResult<RgbaImage> + Sync + Send,
    {
        let frames = self
            .frames
            .par_iter()
            .map(|frame| Ok(frame.with_buffer(f(&frame.buffer)?)))
            .collect::<ToolboxResult<Vec<_>>>()?;
        Self::new(frames, self.loop_count)
    }

    /// Infallible variant of [`Image::map_frames`].
    pub fn map_pixels<F>(&self, f: F) -> Self
    where
        F: Fn(&RgbaImage) -> RgbaImage + Sync + Send,
    {
        let frames = self
            .frames
            .par_iter()
            .map(|frame| frame.with_buffer(f(&frame.buffer)))
            .collect::<Vec<_>>();
        Self {
            frames,
            loop_count: self.loop_count,
        }
    }

    /// Replace every frame's duration, keeping order. `durations` must match the frame count.
    pub fn with_durations(mut self, durations: &[u32]) -> ToolboxResult<Self> {
        if durations.len() != self.frames.len() {
            return Err(ToolboxError::validation(
                "duration list length must match frame count",
            ));
        }
        for (frame, &d) in self.frames.iter_mut().zip(durations) {
            frame.duration_ms = d;
        }
        Ok(self)
    }

    /// Mark every frame as carrying (or not carrying) meaningful alpha.
    pub fn set_alpha(&mut self, has_alpha: bool) {
        for frame in &mut self.frames {
            frame.has_alpha = has_alpha;
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/frame/model.rs"]
mod tests;
