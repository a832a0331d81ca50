use crate::errors::PackError;
use crate::geometry::Point;
use std::collections::VecDeque;
use std::fmt;

/// The ten classes a potential placement origin can belong to.
///
/// `A`/`B` are the top-left and bottom-right corners of a placement, the
/// primed and double-primed variants are their projections onto neighboring
/// rectangles or marginal fallbacks, and `C`/`D`/`E`/`F` are auxiliary
/// corner/projection classes. The class a point lands in decides which
/// strategies reach it, which is exactly what the hyper-search permutes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PointClass {
    A,
    B,
    C,
    D,
    APrime,
    BPrime,
    ADouble,
    BDouble,
    E,
    F,
}

impl PointClass {
    /// Canonical declaration order; strategy ranks are lexicographic over it.
    pub const ALL: [PointClass; 10] = [
        PointClass::A,
        PointClass::B,
        PointClass::C,
        PointClass::D,
        PointClass::APrime,
        PointClass::BPrime,
        PointClass::ADouble,
        PointClass::BDouble,
        PointClass::E,
        PointClass::F,
    ];

    pub fn index(self) -> usize {
        match self {
            PointClass::A => 0,
            PointClass::B => 1,
            PointClass::C => 2,
            PointClass::D => 3,
            PointClass::APrime => 4,
            PointClass::BPrime => 5,
            PointClass::ADouble => 6,
            PointClass::BDouble => 7,
            PointClass::E => 8,
            PointClass::F => 9,
        }
    }

    pub fn tag(self) -> &'static str {
        match self {
            PointClass::A => "A",
            PointClass::B => "B",
            PointClass::C => "C",
            PointClass::D => "D",
            PointClass::APrime => "A'",
            PointClass::BPrime => "B'",
            PointClass::ADouble => "A\"",
            PointClass::BDouble => "B\"",
            PointClass::E => "E",
            PointClass::F => "F",
        }
    }

    pub fn from_tag(tag: &str) -> Option<PointClass> {
        PointClass::ALL.into_iter().find(|c| c.tag() == tag)
    }
}

impl fmt::Display for PointClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

const FACTORIALS: [u64; 10] = [1, 1, 2, 6, 24, 120, 720, 5040, 40320, 362_880];

/// Pool-drain order: a permutation of all ten point classes.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Strategy([PointClass; 10]);

impl Strategy {
    /// Number of distinct strategies, `10!`.
    pub const COUNT: u64 = 3_628_800;

    pub fn new(classes: [PointClass; 10]) -> Result<Self, PackError> {
        let mut seen = [false; 10];
        for class in classes {
            if seen[class.index()] {
                return Err(PackError::PotentialPoints(format!(
                    "duplicate class {class} in strategy"
                )));
            }
            seen[class.index()] = true;
        }
        Ok(Strategy(classes))
    }

    pub fn from_tags(tags: &[&str]) -> Result<Self, PackError> {
        let classes: Vec<PointClass> = tags
            .iter()
            .map(|tag| {
                PointClass::from_tag(tag).ok_or_else(|| {
                    PackError::PotentialPoints(format!("unknown class tag '{tag}'"))
                })
            })
            .collect::<Result<_, _>>()?;
        let classes: [PointClass; 10] = classes.try_into().map_err(|v: Vec<PointClass>| {
            PackError::PotentialPoints(format!(
                "strategy must contain all {} classes, got {}",
                PointClass::ALL.len(),
                v.len()
            ))
        })?;
        Strategy::new(classes)
    }

    pub fn classes(&self) -> &[PointClass; 10] {
        &self.0
    }

    /// The strategy with the given lexicographic rank (`0..COUNT`) over the
    /// canonical class order, via factorial-number-system unranking.
    pub fn nth(rank: u64) -> Strategy {
        debug_assert!(rank < Strategy::COUNT);
        let mut available: Vec<PointClass> = PointClass::ALL.to_vec();
        let mut remainder = rank;
        let mut classes = [PointClass::A; 10];
        for (i, slot) in classes.iter_mut().enumerate() {
            let factorial = FACTORIALS[9 - i];
            *slot = available.remove((remainder / factorial) as usize);
            remainder %= factorial;
        }
        Strategy(classes)
    }

    /// Inverse of [`Strategy::nth`].
    pub fn rank(&self) -> u64 {
        let mut available: Vec<PointClass> = PointClass::ALL.to_vec();
        let mut rank = 0;
        for (i, class) in self.0.iter().enumerate() {
            let pos = available.iter().position(|c| c == class).unwrap_or(0);
            rank += pos as u64 * FACTORIALS[9 - i];
            available.remove(pos);
        }
        rank
    }
}

impl Default for Strategy {
    fn default() -> Self {
        Strategy([
            PointClass::A,
            PointClass::B,
            PointClass::C,
            PointClass::D,
            PointClass::APrime,
            PointClass::BPrime,
            PointClass::BDouble,
            PointClass::ADouble,
            PointClass::E,
            PointClass::F,
        ])
    }
}

impl fmt::Debug for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Strategy(")?;
        for (i, class) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{class}")?;
        }
        write!(f, ")")
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, class) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{class}")?;
        }
        Ok(())
    }
}

/// FIFO pools of candidate placement origins, one per class.
///
/// Within a class, points are returned in insertion order and duplicates are
/// suppressed; together with the strategy's fixed class order this keeps the
/// construction heuristic fully deterministic.
#[derive(Clone, Debug, Default)]
pub struct PointPool {
    queues: [VecDeque<Point>; 10],
}

impl PointPool {
    pub fn new() -> Self {
        PointPool::default()
    }

    /// Inserts the container origin `(0, 0)` into class `A`.
    pub fn seed(&mut self) {
        self.push(PointClass::A, (0, 0));
    }

    /// Appends `point` to `class` unless already present in it.
    pub fn push(&mut self, class: PointClass, point: Point) {
        let queue = &mut self.queues[class.index()];
        if !queue.contains(&point) {
            queue.push_back(point);
        }
    }

    /// Returns `point` to the front of `class`; used to hand a popped but
    /// rejected point back to subsequent items without disturbing FIFO order.
    pub fn restore(&mut self, class: PointClass, point: Point) {
        let queue = &mut self.queues[class.index()];
        if !queue.contains(&point) {
            queue.push_front(point);
        }
    }

    /// Removes and returns the front of the first non-empty class in
    /// `strategy` order.
    pub fn pop_next(&mut self, strategy: &Strategy) -> Option<(PointClass, Point)> {
        strategy
            .classes()
            .iter()
            .find_map(|&class| self.queues[class.index()].pop_front().map(|p| (class, p)))
    }

    /// Removes the first occurrence of `point` from `class`, if present.
    pub fn remove(&mut self, class: PointClass, point: Point) {
        let queue = &mut self.queues[class.index()];
        if let Some(pos) = queue.iter().position(|&p| p == point) {
            queue.remove(pos);
        }
    }

    pub fn clear(&mut self) {
        self.queues.iter_mut().for_each(VecDeque::clear);
    }

    pub fn is_empty(&self) -> bool {
        self.queues.iter().all(VecDeque::is_empty)
    }

    pub fn len(&self) -> usize {
        self.queues.iter().map(VecDeque::len).sum()
    }

    pub fn class_points(&self, class: PointClass) -> &VecDeque<Point> {
        &self.queues[class.index()]
    }
}
