use crate::construct::{Constructor, Strategy};
use crate::entities::{ContainerLayout, Item, Solution};
use crate::errors::PackError;
use serde::{Deserialize, Serialize};

/// The imaginary container of the strip packing problem: fixed width, and a
/// height the search shrinks as better complete solutions are found.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Strip {
    pub width: usize,
    /// Current imaginary height; bounds the grid of every construction.
    pub height: usize,
    /// Optional floor below which the height may not shrink. While unset,
    /// only solutions containing every item may tighten the height.
    pub min_height: Option<usize>,
}

impl Strip {
    pub fn new(width: usize, height: usize) -> Self {
        debug_assert!(width > 0 && height > 0);
        Strip {
            width,
            height,
            min_height: None,
        }
    }

    pub fn set_height(&mut self, height: usize) -> Result<(), PackError> {
        if height < 1 {
            return Err(PackError::Dimensions(
                "strip height must be a positive integer".into(),
            ));
        }
        if let Some(min) = self.min_height {
            if height < min {
                return Err(PackError::Containers(
                    "strip height must not drop below the configured minimum".into(),
                ));
            }
        }
        self.height = height;
        Ok(())
    }

    pub fn set_min_height(&mut self, min_height: usize) -> Result<(), PackError> {
        if min_height < 1 {
            return Err(PackError::Dimensions(
                "strip minimum height must be a positive integer".into(),
            ));
        }
        if min_height > self.height {
            return Err(PackError::Containers(
                "strip minimum height must not exceed the current height".into(),
            ));
        }
        self.min_height = Some(min_height);
        Ok(())
    }

    /// Tightens the height to the given stack height, floored at
    /// `min_height`. Stack heights never exceed the current height, so this
    /// only ever shrinks.
    pub fn fit_to(&mut self, stack_height: usize) {
        let floor = self.min_height.unwrap_or(1);
        self.height = stack_height.max(floor);
    }
}

/// Strip packing instance: a single open-ended container of fixed width.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SPInstance {
    pub items: Vec<Item>,
    pub strip: Strip,
}

impl SPInstance {
    /// The strip is the only container of the instance.
    pub const STRIP_CONTAINER_ID: usize = 0;

    pub fn new(items: Vec<Item>, strip_width: usize) -> Self {
        debug_assert!(items.iter().enumerate().all(|(i, item)| item.id == i));
        let strip = Strip::new(strip_width, Self::seed_height(&items));
        SPInstance { items, strip }
    }

    /// Initial imaginary height: the sum of each item's larger side, a
    /// trivially safe upper bound whether or not rotation is enabled.
    pub fn seed_height(items: &[Item]) -> usize {
        items
            .iter()
            .map(|item| item.width.max(item.length))
            .sum::<usize>()
            .max(1)
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Restores the seed height and clears the minimum-height floor.
    pub fn reset_height(&mut self) {
        self.strip = Strip::new(self.strip.width, Self::seed_height(&self.items));
    }

    /// Packs the items given by `order` into the strip at its current
    /// imaginary height. Utilization is measured against the realized stack
    /// height rather than the imaginary height, keeping objective values
    /// comparable across height changes.
    pub fn pack(&self, order: &[usize], strategy: &Strategy, rotation: bool) -> Solution {
        let mut constructor =
            Constructor::new(self.strip.width, self.strip.height, *strategy, rotation);
        let ordered: Vec<Item> = order.iter().map(|&id| self.items[id]).collect();
        constructor.pack(&ordered);
        let capacity = self.strip.width * constructor.stack_height();
        let layout = ContainerLayout {
            container_id: Self::STRIP_CONTAINER_ID,
            placements: constructor.placements,
            placed_area: constructor.placed_area,
            capacity,
        };
        Solution {
            layouts: vec![layout],
        }
    }
}
