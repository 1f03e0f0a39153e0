pub(crate) mod blur;
pub mod color_mask;
pub(crate) mod composite;
pub mod filter;
pub mod geometry;
