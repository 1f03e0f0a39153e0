use super::*;

struct Flat {
    color: Rgba,
}

impl Canvas for Flat {
    fn width(&self) -> u32 {
        3
    }

    fn height(&self) -> u32 {
        2
    }

    fn fill_rect(&mut self, _rect: kurbo::Rect, paint: &Paint) -> ToolboxResult<()> {
        if let Paint::Solid(c) = paint {
            self.color = *c;
        }
        Ok(())
    }

    fn snapshot(&mut self) -> ToolboxResult<RgbaImage> {
        Ok(RgbaImage::from_pixel(3, 2, image::Rgba(self.color.to_array())))
    }
}

#[test]
fn stops_keep_order_and_clamp() {
    let g = LinearGradient::new(0.0, 0.0, 1.0, 0.0)
        .add_color_stop(-0.5, Rgba::opaque(1, 2, 3))
        .add_color_stop(2.0, Rgba::new(4, 5, 6, 0));
    assert_eq!(g.stops()[0].0, 0.0);
    assert_eq!(g.stops()[1].0, 1.0);
    assert_eq!(
        Paint::Linear(g).css_colors(),
        vec!["rgb(1, 2, 3)".to_string(), "rgba(4, 5, 6, 0.000)".to_string()]
    );
}

#[test]
fn to_buffer_encodes_the_snapshot() {
    let mut canvas = Flat {
        color: Rgba::TRANSPARENT,
    };
    canvas
        .fill_rect(kurbo::Rect::new(0.0, 0.0, 3.0, 2.0), &Paint::Solid(Rgba::opaque(9, 8, 7)))
        .unwrap();
    let png = canvas.to_buffer(ImageFormat::Png).unwrap();
    assert_eq!(&png[..4], b"\x89PNG");
    let decoded = image::load_from_memory(&png).unwrap().to_rgba8();
    assert_eq!(decoded.dimensions(), (3, 2));
    assert_eq!(decoded.get_pixel(2, 1).0, [9, 8, 7, 255]);
}
