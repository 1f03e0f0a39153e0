use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{
    args::{
        angle::{parse_angle, parse_rotation},
        color::{parse_color, parse_opaque_color},
    },
    assembly::{gif, grid, join},
    canvas::generators,
    codec::{EncodedImage, encode},
    foundation::{
        core::Rgba,
        error::{OperationError, ToolboxResult},
    },
    frame::Image,
    ops::{color_mask, filter, geometry},
};

pub(crate) mod context;
pub(crate) mod fetch;

pub use context::OperationContext;
pub use fetch::{
    FetchError, FetchedImage, FileFetcher, ImageFetcher, load_image, load_images, write_output,
};

/// How many source images an operation consumes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Arity {
    /// Generators draw from nothing.
    None,
    /// Transforms of the first image.
    One,
    /// Joins over every supplied image.
    Many,
}

/// Every command the toolbox understands, with its typed arguments.
///
/// Serialized with an `op` tag so hosts can pass commands as JSON, e.g.
/// `{"op": "resize", "size": "50%"}`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Operation {
    FlipHorizontal,
    FlipVertical,
    FlipBoth,
    Grayscale,
    Invert,
    Contour,
    Emboss,
    Sharpen,
    Rotate {
        angle: String,
    },
    Resize {
        size: String,
    },
    Crop {
        size: String,
    },
    Blur {
        #[serde(default)]
        sigma: Option<f64>,
    },
    Pixelate {
        #[serde(default)]
        size: Option<i64>,
    },
    ColorMask {
        color: String,
    },
    GifReverse,
    GifObverseReverse,
    GifSplit,
    GifChangeFps {
        rate: String,
        #[serde(default)]
        force: bool,
    },
    GifJoin {
        #[serde(default)]
        duration: Option<i64>,
        #[serde(default)]
        force: bool,
    },
    FourGrid,
    NineGrid,
    HorizontalJoin {
        #[serde(default)]
        spacing: Option<i64>,
        #[serde(default)]
        background: Option<String>,
        #[serde(default)]
        force: bool,
    },
    VerticalJoin {
        #[serde(default)]
        spacing: Option<i64>,
        #[serde(default)]
        background: Option<String>,
        #[serde(default)]
        force: bool,
    },
    SolidColor {
        color: String,
        #[serde(default)]
        width: Option<u32>,
        #[serde(default)]
        height: Option<u32>,
    },
    Gradient {
        colors: Vec<String>,
        #[serde(default)]
        angle: Option<String>,
        #[serde(default)]
        width: Option<u32>,
        #[serde(default)]
        height: Option<u32>,
    },
}

/// Tag names of every operation, in declaration order.
pub const OPERATION_NAMES: &[&str] = &[
    "flip_horizontal",
    "flip_vertical",
    "flip_both",
    "grayscale",
    "invert",
    "contour",
    "emboss",
    "sharpen",
    "rotate",
    "resize",
    "crop",
    "blur",
    "pixelate",
    "color_mask",
    "gif_reverse",
    "gif_obverse_reverse",
    "gif_split",
    "gif_change_fps",
    "gif_join",
    "four_grid",
    "nine_grid",
    "horizontal_join",
    "vertical_join",
    "solid_color",
    "gradient",
];

/// Encoded result of an operation.
#[derive(Clone, Debug, PartialEq)]
pub enum Output {
    One(EncodedImage),
    Many(Vec<EncodedImage>),
}

impl Output {
    pub fn len(&self) -> usize {
        match self {
            Self::One(_) => 1,
            Self::Many(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn into_vec(self) -> Vec<EncodedImage> {
        match self {
            Self::One(e) => vec![e],
            Self::Many(v) => v,
        }
    }
}

impl Operation {
    /// The serialized `op` tag.
    pub fn name(&self) -> &'static str {
        match self {
            Self::FlipHorizontal => "flip_horizontal",
            Self::FlipVertical => "flip_vertical",
            Self::FlipBoth => "flip_both",
            Self::Grayscale => "grayscale",
            Self::Invert => "invert",
            Self::Contour => "contour",
            Self::Emboss => "emboss",
            Self::Sharpen => "sharpen",
            Self::Rotate { .. } => "rotate",
            Self::Resize { .. } => "resize",
            Self::Crop { .. } => "crop",
            Self::Blur { .. } => "blur",
            Self::Pixelate { .. } => "pixelate",
            Self::ColorMask { .. } => "color_mask",
            Self::GifReverse => "gif_reverse",
            Self::GifObverseReverse => "gif_obverse_reverse",
            Self::GifSplit => "gif_split",
            Self::GifChangeFps { .. } => "gif_change_fps",
            Self::GifJoin { .. } => "gif_join",
            Self::FourGrid => "four_grid",
            Self::NineGrid => "nine_grid",
            Self::HorizontalJoin { .. } => "horizontal_join",
            Self::VerticalJoin { .. } => "vertical_join",
            Self::SolidColor { .. } => "solid_color",
            Self::Gradient { .. } => "gradient",
        }
    }

    pub fn arity(&self) -> Arity {
        match self {
            Self::SolidColor { .. } | Self::Gradient { .. } => Arity::None,
            Self::GifJoin { .. } | Self::HorizontalJoin { .. } | Self::VerticalJoin { .. } => {
                Arity::Many
            }
            _ => Arity::One,
        }
    }

    /// Run the operation on `inputs` and encode the result.
    ///
    /// Generators ignore `inputs`; single-image operations use the first input and fail with
    /// `missing-image` when there is none.
    #[tracing::instrument(skip(self, inputs, ctx), fields(op = self.name(), inputs = inputs.len()))]
    pub fn apply(&self, inputs: Vec<Image>, ctx: &OperationContext) -> ToolboxResult<Output> {
        match self.arity() {
            Arity::None => ctx.install(|| encode_all(self.generate(ctx)?)),
            Arity::One => {
                let image = inputs
                    .into_iter()
                    .next()
                    .ok_or(OperationError::MissingImage)?;
                self.apply_to_one(image, ctx)
            }
            Arity::Many => self.apply_to_many(inputs, ctx),
        }
    }

    /// Run the operation on a single image.
    pub fn apply_to_one(&self, image: Image, ctx: &OperationContext) -> ToolboxResult<Output> {
        match self.arity() {
            Arity::One => ctx.install(|| encode_all(self.transform(image, ctx)?)),
            _ => self.apply_to_many(vec![image], ctx),
        }
    }

    /// Run the operation on a list of images.
    pub fn apply_to_many(
        &self,
        images: Vec<Image>,
        ctx: &OperationContext,
    ) -> ToolboxResult<Output> {
        match self.arity() {
            Arity::None => ctx.install(|| encode_all(self.generate(ctx)?)),
            Arity::One => {
                let image = images
                    .into_iter()
                    .next()
                    .ok_or(OperationError::MissingImage)?;
                self.apply_to_one(image, ctx)
            }
            Arity::Many => ctx.install(|| encode_all(self.combine(&images, ctx)?)),
        }
    }

    fn transform(&self, image: Image, ctx: &OperationContext) -> ToolboxResult<Vec<Image>> {
        let cfg = &ctx.config;
        let out = match self {
            Self::FlipHorizontal => geometry::flip_horizontal(&image),
            Self::FlipVertical => geometry::flip_vertical(&image),
            Self::FlipBoth => geometry::flip_both(&image),
            Self::Grayscale => filter::grayscale(&image),
            Self::Invert => filter::invert(&image),
            Self::Contour => filter::contour(&image),
            Self::Emboss => filter::emboss(&image),
            Self::Sharpen => filter::sharpen(&image),
            Self::Rotate { angle } => geometry::rotate(&image, parse_rotation(angle)?),
            Self::Resize { size } => geometry::resize(&image, size, cfg)?,
            Self::Crop { size } => geometry::crop(&image, size)?,
            Self::Blur { sigma } => filter::blur(
                &image,
                sigma.unwrap_or_else(|| f64::from(cfg.default_blur_sigma)),
                cfg,
            )?,
            Self::Pixelate { size } => filter::pixelate(
                &image,
                size.unwrap_or_else(|| i64::from(cfg.default_pixel_size)),
            )?,
            Self::ColorMask { color } => {
                color_mask::color_mask(&image, parse_opaque_color(color)?)?
            }
            Self::GifReverse => gif::reverse(image)?,
            Self::GifObverseReverse => gif::obverse_reverse(&image)?,
            Self::GifSplit => return gif::split(&image),
            Self::GifChangeFps { rate, force } => gif::change_fps(&image, rate, *force, cfg)?,
            Self::FourGrid => return grid::four_grid(&image),
            Self::NineGrid => return grid::nine_grid(&image),
            Self::GifJoin { .. }
            | Self::HorizontalJoin { .. }
            | Self::VerticalJoin { .. }
            | Self::SolidColor { .. }
            | Self::Gradient { .. } => return self.combine(&[image], ctx),
        };
        Ok(vec![out])
    }

    fn combine(&self, images: &[Image], ctx: &OperationContext) -> ToolboxResult<Vec<Image>> {
        let cfg = &ctx.config;
        let out = match self {
            Self::GifJoin { duration, force } => gif::gif_join(
                images,
                duration.unwrap_or_else(|| i64::from(cfg.default_join_duration_ms)),
                *force,
                cfg,
            )?,
            Self::HorizontalJoin {
                spacing,
                background,
                force,
            } => join::horizontal_join(
                images,
                spacing.unwrap_or_else(|| i64::from(cfg.default_join_spacing)),
                parse_background(background.as_deref())?,
                *force,
                cfg,
            )?,
            Self::VerticalJoin {
                spacing,
                background,
                force,
            } => join::vertical_join(
                images,
                spacing.unwrap_or_else(|| i64::from(cfg.default_join_spacing)),
                parse_background(background.as_deref())?,
                *force,
                cfg,
            )?,
            Self::SolidColor { .. } | Self::Gradient { .. } => return self.generate(ctx),
            _ => {
                let image = images.first().ok_or(OperationError::MissingImage)?;
                return self.transform(image.clone(), ctx);
            }
        };
        Ok(vec![out])
    }

    fn generate(&self, ctx: &OperationContext) -> ToolboxResult<Vec<Image>> {
        let cfg = &ctx.config;
        let out = match self {
            Self::SolidColor {
                color,
                width,
                height,
            } => generators::solid_color(parse_color(color)?, *width, *height, cfg, ctx.backend())?,
            Self::Gradient {
                colors,
                angle,
                width,
                height,
            } => {
                let colors = colors
                    .iter()
                    .map(|c| parse_color(c))
                    .collect::<Result<Vec<Rgba>, _>>()?;
                let angle = match angle {
                    Some(a) => parse_angle(a)?,
                    None => 0,
                };
                generators::gradient(&colors, angle, *width, *height, cfg, ctx.backend())?
            }
            _ => return Err(OperationError::MissingImage.into()),
        };
        Ok(vec![out])
    }
}

fn parse_background(text: Option<&str>) -> Result<Rgba, OperationError> {
    match text {
        Some(t) => parse_color(t),
        None => Ok(Rgba::TRANSPARENT),
    }
}

fn encode_all(images: Vec<Image>) -> ToolboxResult<Output> {
    let mut encoded = images
        .par_iter()
        .map(encode)
        .collect::<ToolboxResult<Vec<_>>>()?;
    if encoded.len() == 1
        && let Some(one) = encoded.pop()
    {
        return Ok(Output::One(one));
    }
    Ok(Output::Many(encoded))
}

/// Split `items` into consecutive chunks of at most `size` (a zero size is treated as one).
pub fn batch<T: Clone>(items: &[T], size: usize) -> Vec<Vec<T>> {
    items.chunks(size.max(1)).map(<[T]>::to_vec).collect()
}

#[cfg(test)]
#[path = "../../tests/unit/command/mod.rs"]
mod tests;
