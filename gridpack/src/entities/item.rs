use serde::{Deserialize, Serialize};

/// Rectangular item to be placed.
///
/// `id` is a stable index into the instance's external id table; it never
/// changes, even when preprocessors reorder or reorient the item set.
/// Rotation is modeled at placement time, the stored dimensions are only
/// mutated by the orientation preprocessor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: usize,
    pub width: usize,
    pub length: usize,
}

impl Item {
    pub fn new(id: usize, width: usize, length: usize) -> Self {
        debug_assert!(width > 0 && length > 0);
        Item { id, width, length }
    }

    pub fn area(&self) -> usize {
        self.width * self.length
    }

    pub fn perimeter(&self) -> usize {
        2 * (self.width + self.length)
    }

    /// A square item has only one orientation.
    pub fn is_square(&self) -> bool {
        self.width == self.length
    }
}
