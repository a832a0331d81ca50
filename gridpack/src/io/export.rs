use crate::entities::Solution;
use crate::io::ext_repr::ExtSolution;
use indexmap::IndexMap;

/// Exports a solution out of the library, translating internal indices back
/// to the external ids they were imported from.
pub fn export_solution(
    solution: &Solution,
    item_ids: &[String],
    container_ids: &[String],
    strip_height: Option<usize>,
) -> ExtSolution {
    let mut placements = IndexMap::new();
    let mut utilization = IndexMap::new();
    for layout in &solution.layouts {
        let container_id = container_ids[layout.container_id].clone();
        let per_item: IndexMap<String, [u64; 4]> = layout
            .placements
            .iter()
            .map(|p| {
                (
                    item_ids[p.item_id].clone(),
                    [p.x as u64, p.y as u64, p.width as u64, p.length as u64],
                )
            })
            .collect();
        placements.insert(container_id.clone(), per_item);
        utilization.insert(container_id, layout.utilization());
    }
    ExtSolution {
        placements,
        utilization,
        strip_height: strip_height.map(|h| h as u64),
    }
}
