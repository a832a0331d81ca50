mod points;
mod spawn;

pub use points::{PointClass, PointPool, Strategy};
pub use spawn::spawn_points;

use crate::entities::{ContainerLayout, Item, Placement};
use crate::geometry::{EdgeIndex, OccupancyGrid};
use log::trace;

/// Greedy point-generation packer for a single container.
///
/// Owns the occupancy grid, the edge index and the potential-point pool of
/// one packing run, and accumulates placements. For a fixed (container, item
/// order, strategy, rotation flag) its output is a pure function of its
/// inputs.
pub struct Constructor {
    pub width: usize,
    pub length: usize,
    pub strategy: Strategy,
    pub rotation: bool,
    pub grid: OccupancyGrid,
    pub edges: EdgeIndex,
    pub points: PointPool,
    pub placements: Vec<Placement>,
    pub placed_area: usize,
}

impl Constructor {
    pub fn new(width: usize, length: usize, strategy: Strategy, rotation: bool) -> Self {
        let mut points = PointPool::new();
        points.seed();
        Constructor {
            width,
            length,
            strategy,
            rotation,
            grid: OccupancyGrid::new(width, length),
            edges: EdgeIndex::new(width, length),
            points,
            placements: Vec::new(),
            placed_area: 0,
        }
    }

    /// Packs `items` in the given order; returns the items that did not fit,
    /// preserving their relative order.
    pub fn pack(&mut self, items: &[Item]) -> Vec<Item> {
        let mut unplaced = Vec::new();
        for &item in items {
            if self.is_full() || !self.place_item(item) {
                unplaced.push(item);
            }
        }
        unplaced
    }

    /// Pops potential points in strategy order until the item fits at one,
    /// in its given or (if enabled) rotated orientation. Points the item
    /// rejects stay available for subsequent, possibly smaller items.
    fn place_item(&mut self, item: Item) -> bool {
        let mut rejected = Vec::new();
        let mut placed = false;
        while let Some((class, (x, y))) = self.points.pop_next(&self.strategy) {
            if self.grid.free_rect(x, y, item.width, item.length) {
                self.place(item, x, y, item.width, item.length);
                placed = true;
                break;
            }
            if self.rotation
                && !item.is_square()
                && self.grid.free_rect(x, y, item.length, item.width)
            {
                self.place(item, x, y, item.length, item.width);
                placed = true;
                break;
            }
            rejected.push((class, (x, y)));
        }
        for &(class, point) in rejected.iter().rev() {
            self.points.restore(class, point);
        }
        placed
    }

    fn place(&mut self, item: Item, x: usize, y: usize, w: usize, l: usize) {
        self.grid.mark(x, y, w, l);
        spawn_points(
            self.width,
            self.length,
            &self.edges,
            &mut self.points,
            x,
            y,
            w,
            l,
        );
        self.edges.insert_rect(x, y, w, l);
        self.placed_area += w * l;
        self.placements.push(Placement {
            item_id: item.id,
            x,
            y,
            width: w,
            length: l,
        });
        trace!("[CON] item {} placed at ({x}, {y}) as {w}x{l}", item.id);
    }

    pub fn is_full(&self) -> bool {
        self.placed_area == self.width * self.length
    }

    /// Utilization against the full container area.
    pub fn utilization(&self) -> f64 {
        self.placed_area as f64 / (self.width * self.length) as f64
    }

    /// Height of the packed stack, the denominator of strip utilization.
    pub fn stack_height(&self) -> usize {
        self.placements
            .iter()
            .map(Placement::y_max)
            .max()
            .unwrap_or(0)
            .max(1)
    }

    pub fn into_layout(self, container_id: usize) -> ContainerLayout {
        let capacity = self.width * self.length;
        ContainerLayout {
            container_id,
            placements: self.placements,
            placed_area: self.placed_area,
            capacity,
        }
    }
}
