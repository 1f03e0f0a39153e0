use super::*;
use crate::{
    canvas::LinearGradient,
    foundation::core::Rgba,
};

fn full(canvas: &VelloCanvas) -> kurbo::Rect {
    kurbo::Rect::new(0.0, 0.0, f64::from(canvas.width()), f64::from(canvas.height()))
}

#[test]
fn oversized_or_empty_canvas_is_rejected() {
    assert!(VelloCanvas::new(70_000, 1).is_err());
    assert!(VelloCanvas::new(0, 4).is_err());
}

#[test]
fn solid_fill_is_exact_for_opaque_colors() {
    let mut canvas = VelloCanvas::new(6, 4).unwrap();
    let rect = full(&canvas);
    canvas
        .fill_rect(rect, &Paint::Solid(Rgba::opaque(200, 30, 10)))
        .unwrap();
    let snap = canvas.snapshot().unwrap();
    assert_eq!(snap.dimensions(), (6, 4));
    assert!(snap.pixels().all(|p| p.0 == [200, 30, 10, 255]));
}

#[test]
fn untouched_canvas_is_transparent() {
    let mut canvas = VelloBackend.create_canvas(2, 2).unwrap();
    let snap = canvas.snapshot().unwrap();
    assert!(snap.pixels().all(|p| p.0[3] == 0));
}

#[test]
fn horizontal_gradient_runs_between_stops() {
    let mut canvas = VelloCanvas::new(100, 4).unwrap();
    let rect = full(&canvas);
    let g = LinearGradient::new(0.0, 2.0, 100.0, 2.0)
        .add_color_stop(0.0, Rgba::opaque(255, 0, 0))
        .add_color_stop(1.0, Rgba::opaque(0, 0, 255));
    canvas.fill_rect(rect, &Paint::Linear(g)).unwrap();
    let snap = canvas.snapshot().unwrap();

    let left = snap.get_pixel(0, 1).0;
    let right = snap.get_pixel(99, 1).0;
    assert!(left[0] > 240 && left[2] < 15, "{left:?}");
    assert!(right[2] > 240 && right[0] < 15, "{right:?}");
    let mid = snap.get_pixel(50, 1).0;
    assert!(mid[0] > 90 && mid[0] < 165, "{mid:?}");
}

#[test]
fn gradient_without_stops_is_an_error() {
    let mut canvas = VelloCanvas::new(2, 2).unwrap();
    let rect = full(&canvas);
    let g = LinearGradient::new(0.0, 0.0, 2.0, 0.0);
    assert!(canvas.fill_rect(rect, &Paint::Linear(g)).is_err());
}
