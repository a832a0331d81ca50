use crate::entities::{ContainerLayout, Solution};
use itertools::Itertools;

/// All placements lie inside a `width` x `length` container, are pairwise
/// disjoint, and the layout's area bookkeeping matches them.
pub fn layout_is_valid(layout: &ContainerLayout, width: usize, length: usize) -> bool {
    let in_bounds = layout.placements.iter().all(|p| p.in_bounds(width, length));
    let disjoint = layout
        .placements
        .iter()
        .tuple_combinations()
        .all(|(a, b)| !a.overlaps(b));
    let area_matches = layout.placements.iter().map(|p| p.area()).sum::<usize>() == layout.placed_area;
    in_bounds && disjoint && area_matches
}

/// Every item id appears in at most one placement across the whole solution.
pub fn item_ids_unique(solution: &Solution) -> bool {
    let ids = solution.placements().map(|(_, p)| p.item_id).collect_vec();
    ids.iter().unique().count() == ids.len()
}

/// Per-container utilizations lie in `[0, 1]`.
pub fn utilizations_in_range(solution: &Solution) -> bool {
    solution
        .layouts
        .iter()
        .all(|l| (0.0..=1.0).contains(&l.utilization()))
}
