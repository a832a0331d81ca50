use serde::{Deserialize, Serialize};

/// A realized placement: bottom-left origin and the dimensions as placed,
/// reflecting rotation. For any item the placed dimensions are either the
/// stored `(w, l)` or the swapped `(l, w)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    pub item_id: usize,
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub length: usize,
}

impl Placement {
    pub fn x_max(&self) -> usize {
        self.x + self.width
    }

    pub fn y_max(&self) -> usize {
        self.y + self.length
    }

    pub fn area(&self) -> usize {
        self.width * self.length
    }

    /// Open-interval rectangle intersection test.
    pub fn overlaps(&self, other: &Placement) -> bool {
        self.x < other.x_max()
            && other.x < self.x_max()
            && self.y < other.y_max()
            && other.y < self.y_max()
    }

    /// True if the placement lies entirely inside a `width` x `length` container.
    pub fn in_bounds(&self, width: usize, length: usize) -> bool {
        self.x_max() <= width && self.y_max() <= length
    }
}
