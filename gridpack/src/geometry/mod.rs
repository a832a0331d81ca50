mod edges;
mod grid;

pub use edges::{EdgeIndex, Segment};
pub use grid::OccupancyGrid;

/// Integer grid coordinate, `(x, y)`.
pub type Point = (usize, usize);
