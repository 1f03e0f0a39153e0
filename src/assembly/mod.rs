pub mod gif;
pub mod grid;
pub mod join;

pub use join::JoinDirection;
