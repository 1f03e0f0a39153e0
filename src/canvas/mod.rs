use image::{ImageFormat, RgbaImage};

use crate::foundation::{core::Rgba, error::ToolboxResult};

pub mod generators;
pub(crate) mod vello;

pub use vello::{VelloBackend, VelloCanvas};

/// Linear gradient between two points in canvas pixel space.
#[derive(Clone, Debug, PartialEq)]
pub struct LinearGradient {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
    stops: Vec<(f32, Rgba)>,
}

impl LinearGradient {
    pub fn new(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self {
            x0,
            y0,
            x1,
            y1,
            stops: Vec::new(),
        }
    }

    /// Append a stop. Offsets are clamped to `[0, 1]`.
    pub fn add_color_stop(mut self, offset: f32, color: Rgba) -> Self {
        self.stops.push((offset.clamp(0.0, 1.0), color));
        self
    }

    /// Stops in insertion order.
    pub fn stops(&self) -> &[(f32, Rgba)] {
        &self.stops
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Paint {
    Solid(Rgba),
    Linear(LinearGradient),
}

impl Paint {
    /// CSS rendering of the paint's colors, as handed to drawing hosts.
    pub fn css_colors(&self) -> Vec<String> {
        match self {
            Self::Solid(c) => vec![c.to_css()],
            Self::Linear(g) => g.stops.iter().map(|(_, c)| c.to_css()).collect(),
        }
    }
}

/// Raster surface that accepts rectangle fills.
pub trait Canvas {
    fn width(&self) -> u32;
    fn height(&self) -> u32;

    fn fill_rect(&mut self, rect: kurbo::Rect, paint: &Paint) -> ToolboxResult<()>;

    /// Current contents as straight-alpha RGBA8.
    fn snapshot(&mut self) -> ToolboxResult<RgbaImage>;

    /// Current contents encoded in `format`.
    fn to_buffer(&mut self, format: ImageFormat) -> ToolboxResult<Vec<u8>> {
        let snapshot = self.snapshot()?;
        let mut bytes = std::io::Cursor::new(Vec::new());
        snapshot
            .write_to(&mut bytes, format)
            .map_err(|e| crate::foundation::error::ToolboxError::encode(e.to_string()))?;
        Ok(bytes.into_inner())
    }
}

/// Factory for canvases.
pub trait DrawingBackend: Send + Sync {
    fn create_canvas(&self, width: u32, height: u32) -> ToolboxResult<Box<dyn Canvas>>;
}

#[cfg(test)]
#[path = "../../tests/unit/canvas/mod.rs"]
mod tests;
