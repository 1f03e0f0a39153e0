pub(crate) mod model;
pub use model::{Frame, Image};
