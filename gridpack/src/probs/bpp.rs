use crate::construct::{Constructor, Strategy};
use crate::entities::{Container, ContainerLayout, Item, Solution};
use itertools::Itertools;
use serde::{Deserialize, Serialize};

/// Instance of the multi-container problem: a fixed container sequence into
/// which the items are packed greedily, container by container.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BPInstance {
    pub containers: Vec<Container>,
    pub items: Vec<Item>,
}

impl BPInstance {
    pub fn new(containers: Vec<Container>, items: Vec<Item>) -> Self {
        debug_assert!(containers.iter().enumerate().all(|(i, c)| c.id == i));
        debug_assert!(items.iter().enumerate().all(|(i, item)| item.id == i));
        BPInstance { containers, items }
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    pub fn total_item_area(&self) -> usize {
        self.items.iter().map(Item::area).sum()
    }

    /// Packs the items given by `order` (item ids) into the containers in
    /// sequence; each container consumes what it can from the remaining
    /// items, in order.
    pub fn pack(&self, order: &[usize], strategy: &Strategy, rotation: bool) -> Solution {
        let mut remaining = order.iter().map(|&id| self.items[id]).collect_vec();
        let mut layouts = Vec::with_capacity(self.containers.len());
        for container in &self.containers {
            if remaining.is_empty() {
                layouts.push(ContainerLayout::empty(container.id, container.area()));
                continue;
            }
            let mut constructor =
                Constructor::new(container.width, container.length, *strategy, rotation);
            remaining = constructor.pack(&remaining);
            layouts.push(constructor.into_layout(container.id));
        }
        Solution { layouts }
    }
}
