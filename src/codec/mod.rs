pub(crate) mod decode;
pub(crate) mod encode;

pub use decode::{decode, resolve_format, sniff_mime};
pub use encode::{EncodedImage, encode};
