use crate::entities::Placement;
use serde::{Deserialize, Serialize};

/// Exponent applied to per-container utilization in the objective value.
/// Raising utilizations to a power > 1 rewards concentrating fill in few
/// containers over spreading it evenly.
pub const UTILIZATION_EXPONENT: i32 = 2;

/// Placements realized in a single container, with exact integer area
/// bookkeeping. `capacity` is the container area for fixed containers and
/// `width x stack_height` for the strip, so `placed_area == capacity` is an
/// exact 100%-utilization test.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerLayout {
    pub container_id: usize,
    pub placements: Vec<Placement>,
    pub placed_area: usize,
    pub capacity: usize,
}

impl ContainerLayout {
    pub fn empty(container_id: usize, capacity: usize) -> Self {
        ContainerLayout {
            container_id,
            placements: Vec::new(),
            placed_area: 0,
            capacity,
        }
    }

    pub fn utilization(&self) -> f64 {
        if self.capacity == 0 {
            0.0
        } else {
            self.placed_area as f64 / self.capacity as f64
        }
    }

    pub fn is_full(&self) -> bool {
        self.placed_area == self.capacity
    }

    /// Height of the packed stack: the maximum `y + l` over placements.
    pub fn stack_height(&self) -> usize {
        self.placements
            .iter()
            .map(Placement::y_max)
            .max()
            .unwrap_or(0)
            .max(1)
    }
}

/// A complete solution across all containers, in container order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Solution {
    pub layouts: Vec<ContainerLayout>,
}

impl Solution {
    /// Objective value: the sum of per-container utilizations raised to
    /// [`UTILIZATION_EXPONENT`].
    pub fn objective(&self) -> f64 {
        self.layouts
            .iter()
            .map(|l| l.utilization().powi(UTILIZATION_EXPONENT))
            .sum()
    }

    /// Objective scaled into `0.0..=1.0`; reads exactly `1.0` iff every
    /// container is completely full. This is the scalar shared between
    /// hyper-search workers.
    pub fn normalized_objective(&self) -> f64 {
        if self.layouts.is_empty() {
            0.0
        } else {
            self.objective() / self.layouts.len() as f64
        }
    }

    pub fn is_perfect(&self) -> bool {
        !self.layouts.is_empty() && self.layouts.iter().all(ContainerLayout::is_full)
    }

    pub fn placed_count(&self) -> usize {
        self.layouts.iter().map(|l| l.placements.len()).sum()
    }

    pub fn placements(&self) -> impl Iterator<Item = (usize, &Placement)> {
        self.layouts
            .iter()
            .flat_map(|l| l.placements.iter().map(move |p| (l.container_id, p)))
    }
}
