use image::RgbaImage;

use crate::{
    canvas::{Canvas, DrawingBackend, Paint},
    foundation::{
        error::{ToolboxError, ToolboxResult},
        math::unpremultiply_rgba8_in_place,
    },
};

/// CPU rasterizer backed by `vello_cpu`.
#[derive(Clone, Copy, Debug, Default)]
pub struct VelloBackend;

impl DrawingBackend for VelloBackend {
    fn create_canvas(&self, width: u32, height: u32) -> ToolboxResult<Box<dyn Canvas>> {
        Ok(Box::new(VelloCanvas::new(width, height)?))
    }
}

pub struct VelloCanvas {
    width: u16,
    height: u16,
    ctx: vello_cpu::RenderContext,
}

impl VelloCanvas {
    pub fn new(width: u32, height: u32) -> ToolboxResult<Self> {
        let width: u16 = width
            .try_into()
            .map_err(|_| ToolboxError::canvas("canvas width exceeds u16"))?;
        let height: u16 = height
            .try_into()
            .map_err(|_| ToolboxError::canvas("canvas height exceeds u16"))?;
        if width == 0 || height == 0 {
            return Err(ToolboxError::canvas("canvas dimensions must be non-zero"));
        }
        Ok(Self {
            width,
            height,
            ctx: vello_cpu::RenderContext::new(width, height),
        })
    }
}

impl Canvas for VelloCanvas {
    fn width(&self) -> u32 {
        u32::from(self.width)
    }

    fn height(&self) -> u32 {
        u32::from(self.height)
    }

    fn fill_rect(&mut self, rect: kurbo::Rect, paint: &Paint) -> ToolboxResult<()> {
        self.ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        match paint {
            Paint::Solid(c) => {
                self.ctx
                    .set_paint(vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, c.a));
            }
            Paint::Linear(g) => {
                if g.stops().is_empty() {
                    return Err(ToolboxError::canvas("gradient has no color stops"));
                }
                let stops: Vec<vello_cpu::peniko::ColorStop> = g
                    .stops()
                    .iter()
                    .map(|&(offset, c)| {
                        vello_cpu::peniko::ColorStop::from((
                            offset,
                            vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, c.a),
                        ))
                    })
                    .collect();
                let gradient = vello_cpu::peniko::Gradient::new_linear(
                    vello_cpu::kurbo::Point::new(g.x0, g.y0),
                    vello_cpu::kurbo::Point::new(g.x1, g.y1),
                )
                .with_stops(stops.as_slice());
                self.ctx.set_paint(gradient);
            }
        }
        self.ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
            rect.x0, rect.y0, rect.x1, rect.y1,
        ));
        Ok(())
    }

    fn snapshot(&mut self) -> ToolboxResult<RgbaImage> {
        let mut pixmap = vello_cpu::Pixmap::new(self.width, self.height);
        self.ctx.flush();
        self.ctx.render_to_pixmap(&mut pixmap);
        let mut data = pixmap.data_as_u8_slice().to_vec();
        unpremultiply_rgba8_in_place(&mut data);
        RgbaImage::from_raw(self.width(), self.height(), data)
            .ok_or_else(|| ToolboxError::canvas("pixmap size mismatch"))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/canvas/vello.rs"]
mod tests;
