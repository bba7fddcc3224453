pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("piece cell ({row}, {col}) is out of range for a {height}x{width} shape")]
pub struct CellOutOfRangeError {
    pub row: usize,
    pub col: usize,
    pub height: usize,
    pub width: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("piece cannot be placed at ({x}, {y})")]
pub struct PlacementError {
    pub x: i32,
    pub y: i32,
}
