use crate::{
    args::size::check_size,
    canvas::{DrawingBackend, LinearGradient, Paint},
    config::ToolboxConfig,
    foundation::{
        core::Rgba,
        error::{OperationError, ToolboxResult},
    },
    frame::{Frame, Image},
};

/// A still of `color`. Missing sides fall back to the configured defaults.
#[tracing::instrument(skip(cfg, backend))]
pub fn solid_color(
    color: Rgba,
    width: Option<u32>,
    height: Option<u32>,
    cfg: &ToolboxConfig,
    backend: &dyn DrawingBackend,
) -> ToolboxResult<Image> {
    let (w, h) = check_size(width, height, cfg)?;
    render(w, h, &Paint::Solid(color), !color.is_opaque(), backend)
}

/// A still filled with a linear gradient through `colors`, evenly spaced.
///
/// `angle` is in degrees, clockwise from the +x axis: 0 runs left to right, 90 top to
/// bottom. The end stops sit where the gradient line meets the canvas's bounding projection,
/// so they touch opposite corners. A single color is a solid fill.
#[tracing::instrument(skip(colors, cfg, backend), fields(colors = colors.len()))]
pub fn gradient(
    colors: &[Rgba],
    angle: u32,
    width: Option<u32>,
    height: Option<u32>,
    cfg: &ToolboxConfig,
    backend: &dyn DrawingBackend,
) -> ToolboxResult<Image> {
    let (w, h) = check_size(width, height, cfg)?;
    let has_alpha = colors.iter().any(|c| !c.is_opaque());
    let paint = match colors {
        [] => return Err(OperationError::invalid_arg("").into()),
        [only] => Paint::Solid(*only),
        _ => {
            let (x0, y0, x1, y1) = gradient_line(f64::from(w), f64::from(h), angle);
            let last = (colors.len() - 1) as f32;
            let linear = colors
                .iter()
                .enumerate()
                .fold(LinearGradient::new(x0, y0, x1, y1), |g, (i, &c)| {
                    g.add_color_stop(i as f32 / last, c)
                });
            Paint::Linear(linear)
        }
    };
    tracing::debug!(colors = ?paint.css_colors(), "gradient paint");
    render(w, h, &paint, has_alpha, backend)
}

/// Endpoints of the gradient line for a `w x h` canvas at `angle` degrees.
pub(crate) fn gradient_line(w: f64, h: f64, angle: u32) -> (f64, f64, f64, f64) {
    let (cx, cy) = (w / 2.0, h / 2.0);
    match angle % 360 {
        0 => (0.0, cy, w, cy),
        90 => (cx, 0.0, cx, h),
        180 => (w, cy, 0.0, cy),
        270 => (cx, h, cx, 0.0),
        deg => {
            let (sin, cos) = f64::from(deg).to_radians().sin_cos();
            let half = ((w * cos).abs() + (h * sin).abs()) / 2.0;
            (
                cx - cos * half,
                cy - sin * half,
                cx + cos * half,
                cy + sin * half,
            )
        }
    }
}

fn render(
    w: u32,
    h: u32,
    paint: &Paint,
    has_alpha: bool,
    backend: &dyn DrawingBackend,
) -> ToolboxResult<Image> {
    let mut canvas = backend.create_canvas(w, h)?;
    canvas.fill_rect(
        kurbo::Rect::new(0.0, 0.0, f64::from(w), f64::from(h)),
        paint,
    )?;
    let buffer = canvas.snapshot()?;
    Ok(Image::still(Frame::new(buffer, 0, has_alpha)))
}

#[cfg(test)]
#[path = "../../tests/unit/canvas/generators.rs"]
mod tests;
