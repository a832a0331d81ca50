use crate::geometry::Point;
use std::collections::BTreeMap;

/// Axis-aligned edge of a placed rectangle or a container wall,
/// with `start <= end`. Ordering is lexicographic by start, then end.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct Segment {
    pub start: Point,
    pub end: Point,
}

impl Segment {
    pub fn new(start: Point, end: Point) -> Self {
        debug_assert!(start <= end);
        Segment { start, end }
    }
}

/// Index of the edges of all placed rectangles plus the container's bottom
/// and side walls, keyed by the fixed coordinate. Within a key, segments are
/// kept in insertion order; the point-spawning rules sort local copies where
/// sweep order matters.
#[derive(Clone, Debug)]
pub struct EdgeIndex {
    /// Horizontal segments keyed by their y coordinate.
    pub horizontals: BTreeMap<usize, Vec<Segment>>,
    /// Vertical segments keyed by their x coordinate.
    pub verticals: BTreeMap<usize, Vec<Segment>>,
}

impl EdgeIndex {
    pub fn new(width: usize, length: usize) -> Self {
        let mut horizontals = BTreeMap::new();
        horizontals.insert(0, vec![Segment::new((0, 0), (width, 0))]);

        let mut verticals = BTreeMap::new();
        verticals.insert(0, vec![Segment::new((0, 0), (0, length))]);
        verticals.insert(width, vec![Segment::new((width, 0), (width, length))]);

        EdgeIndex {
            horizontals,
            verticals,
        }
    }

    /// Appends the four edges of a placed rectangle.
    pub fn insert_rect(&mut self, x: usize, y: usize, w: usize, l: usize) {
        let (x_max, y_max) = (x + w, y + l);
        self.verticals
            .entry(x)
            .or_default()
            .push(Segment::new((x, y), (x, y_max)));
        self.verticals
            .entry(x_max)
            .or_default()
            .push(Segment::new((x_max, y), (x_max, y_max)));
        self.horizontals
            .entry(y)
            .or_default()
            .push(Segment::new((x, y), (x_max, y)));
        self.horizontals
            .entry(y_max)
            .or_default()
            .push(Segment::new((x, y_max), (x_max, y_max)));
    }

    pub fn horizontals_at(&self, y: usize) -> &[Segment] {
        self.horizontals.get(&y).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn verticals_at(&self, x: usize) -> &[Segment] {
        self.verticals.get(&x).map(Vec::as_slice).unwrap_or(&[])
    }

    /// x keys of vertical segments strictly left of `x`, ascending.
    pub fn vertical_keys_before(&self, x: usize) -> Vec<usize> {
        self.verticals.range(..x).map(|(&k, _)| k).collect()
    }

    /// y keys of horizontal segments strictly below `y`, ascending.
    pub fn horizontal_keys_before(&self, y: usize) -> Vec<usize> {
        self.horizontals.range(..y).map(|(&k, _)| k).collect()
    }
}
