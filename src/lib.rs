//! Image manipulation commands for chat bots.
//!
//! Sources decode into a uniform frame model ([`Image`]: ordered [`Frame`]s plus a loop
//! count), operations transform or combine those models, and results encode back to PNG
//! (stills) or GIF (animations):
//!
//! - Decode with [`decode`], or fetch and decode with [`load_image`]
//! - Describe a command as an [`Operation`] and run it with [`Operation::apply`]
//! - Collect [`EncodedImage`]s from the returned [`Output`]
//!
//! User-facing failures are [`OperationError`]s with stable localization keys.
#![forbid(unsafe_code)]

mod foundation;

/// Parsers for user-supplied colors, angles, sizes and frame rates.
pub mod args;
/// Operations that combine frames or whole images.
pub mod assembly;
/// Drawing capability and canvas-rendered generators.
pub mod canvas;
/// Decoding into and encoding out of the frame model.
pub mod codec;
/// Operation dispatch, execution context and image fetching.
pub mod command;
pub mod config;
/// The frame model.
pub mod frame;
/// Per-frame geometric and filter operations.
pub mod ops;

pub use crate::foundation::core::Rgba;
pub use crate::foundation::error::{OperationError, ToolboxError, ToolboxResult};

pub use crate::codec::{EncodedImage, decode, encode};
pub use crate::command::{
    FetchError, FetchedImage, FileFetcher, ImageFetcher, Operation, OperationContext, Output,
    batch, load_image, load_images,
};
pub use crate::config::ToolboxConfig;
pub use crate::frame::{Frame, Image};
