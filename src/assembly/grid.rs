use crate::{
    foundation::error::{OperationError, ToolboxResult},
    frame::{Frame, Image},
    ops::geometry::center_crop,
};

/// Slice the primary frame into a 2x2 grid.
pub fn four_grid(image: &Image) -> ToolboxResult<Vec<Image>> {
    grid(image, 2)
}

/// Slice the primary frame into a 3x3 grid.
pub fn nine_grid(image: &Image) -> ToolboxResult<Vec<Image>> {
    grid(image, 3)
}

/// Crop the primary frame to its centered square and cut it into `n x n` stills, row-major.
///
/// Cells are `ceil(side / n)` wide; the last row and column are clipped to the square.
#[tracing::instrument(skip(image), fields(dims = ?image.dimensions()))]
pub fn grid(image: &Image, n: u32) -> ToolboxResult<Vec<Image>> {
    let primary = image.primary();
    let (w, h) = primary.dimensions();
    let side = w.min(h);
    if !cells_fit(side, n) {
        let min = (side + 1..).find(|&s| cells_fit(s, n)).unwrap_or(n);
        return Err(OperationError::too_small("size", side, min).into());
    }

    let square = center_crop(&primary.buffer, side, side);
    let cell = side.div_ceil(n);
    let mut tiles = Vec::with_capacity((n * n) as usize);
    for row in 0..n {
        for col in 0..n {
            let x = col * cell;
            let y = row * cell;
            let tile = image::imageops::crop_imm(
                &square,
                x,
                y,
                cell.min(side - x),
                cell.min(side - y),
            )
            .to_image();
            tiles.push(Image::still(Frame::new(tile, 0, primary.has_alpha)));
        }
    }
    Ok(tiles)
}

/// Every cell of an `n x n` partition of `side` is non-empty.
fn cells_fit(side: u32, n: u32) -> bool {
    n > 0 && side > 0 && side.div_ceil(n) * (n - 1) < side
}

#[cfg(test)]
#[path = "../../tests/unit/assembly/grid.rs"]
mod tests;
