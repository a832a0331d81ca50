use serde::{Deserialize, Serialize};

/// A fixed rectangular container into which [`Item`](crate::entities::Item)s
/// are packed. `id` is a stable index into the instance's external id table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Container {
    pub id: usize,
    pub width: usize,
    pub length: usize,
}

impl Container {
    pub fn new(id: usize, width: usize, length: usize) -> Self {
        debug_assert!(width > 0 && length > 0);
        Container { id, width, length }
    }

    pub fn area(&self) -> usize {
        self.width * self.length
    }
}
