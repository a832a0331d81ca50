use gridpack::entities::Item;
use std::mem;

/// Uniform shape applied to every item before the search: `Wide` keeps
/// `w >= l`, `Long` keeps `w <= l`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Orientation {
    Wide,
    Long,
}

/// Sorting criterion for the base item order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortKey {
    Area,
    Perimeter,
    LongestSideRatio,
}

/// Reorients items in place by swapping dimensions where needed. Item ids
/// and order are untouched.
pub fn orient_items(items: &mut [Item], orientation: Orientation) {
    for item in items {
        let swap = match orientation {
            Orientation::Wide => item.length > item.width,
            Orientation::Long => item.length < item.width,
        };
        if swap {
            mem::swap(&mut item.width, &mut item.length);
        }
    }
}

/// Returns the item ids sorted by `key`, ties broken by external id. The
/// ratio criterion compares exactly via cross-multiplication; `reverse`
/// flips the whole ordering.
pub fn sorted_order(items: &[Item], ext_ids: &[String], key: SortKey, reverse: bool) -> Vec<usize> {
    let mut order: Vec<usize> = (0..items.len()).collect();
    order.sort_by(|&a, &b| {
        let (ia, ib) = (&items[a], &items[b]);
        let by_key = match key {
            SortKey::Area => ia.area().cmp(&ib.area()),
            SortKey::Perimeter => ia.perimeter().cmp(&ib.perimeter()),
            SortKey::LongestSideRatio => {
                let (max_a, min_a) = (ia.width.max(ia.length) as u128, ia.width.min(ia.length) as u128);
                let (max_b, min_b) = (ib.width.max(ib.length) as u128, ib.width.min(ib.length) as u128);
                (max_a * min_b).cmp(&(max_b * min_a))
            }
        };
        let ord = by_key.then_with(|| ext_ids[a].cmp(&ext_ids[b]));
        if reverse { ord.reverse() } else { ord }
    });
    order
}
