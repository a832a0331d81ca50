use gridpack::construct::{PointClass, PointPool, Strategy};
use test_case::test_case;

#[test]
fn pool_pops_fifo_in_strategy_order() {
    let mut pool = PointPool::new();
    pool.push(PointClass::A, (1, 1));
    pool.push(PointClass::A, (2, 2));
    pool.push(PointClass::B, (3, 3));

    let strategy = Strategy::default();
    assert_eq!(pool.pop_next(&strategy), Some((PointClass::A, (1, 1))));
    assert_eq!(pool.pop_next(&strategy), Some((PointClass::A, (2, 2))));
    assert_eq!(pool.pop_next(&strategy), Some((PointClass::B, (3, 3))));
    assert_eq!(pool.pop_next(&strategy), None);
}

#[test]
fn pool_suppresses_duplicates_within_a_class() {
    let mut pool = PointPool::new();
    pool.push(PointClass::C, (4, 4));
    pool.push(PointClass::C, (4, 4));
    // same coordinate in another class is a different point
    pool.push(PointClass::D, (4, 4));
    assert_eq!(pool.len(), 2);
}

#[test]
fn pool_remove_and_clear() {
    let mut pool = PointPool::new();
    pool.push(PointClass::BDouble, (2, 2));
    pool.push(PointClass::BDouble, (5, 5));
    pool.remove(PointClass::BDouble, (2, 2));
    assert_eq!(
        pool.class_points(PointClass::BDouble).iter().next(),
        Some(&(5, 5))
    );
    pool.clear();
    assert!(pool.is_empty());
}

#[test]
fn pool_restore_returns_points_to_the_front() {
    let mut pool = PointPool::new();
    pool.push(PointClass::A, (1, 0));
    pool.push(PointClass::A, (2, 0));
    let strategy = Strategy::default();
    let (class, point) = pool.pop_next(&strategy).unwrap();
    pool.restore(class, point);
    assert_eq!(pool.pop_next(&strategy), Some((PointClass::A, (1, 0))));
}

#[test]
fn seed_starts_at_the_origin_in_class_a() {
    let mut pool = PointPool::new();
    pool.seed();
    assert_eq!(
        pool.pop_next(&Strategy::default()),
        Some((PointClass::A, (0, 0)))
    );
}

#[test]
fn default_strategy_tags() {
    let tags: Vec<&str> = Strategy::default().classes().iter().map(|c| c.tag()).collect();
    assert_eq!(
        tags,
        ["A", "B", "C", "D", "A'", "B'", "B\"", "A\"", "E", "F"]
    );
}

#[test]
fn strategy_rejects_duplicates_and_unknown_tags() {
    assert!(Strategy::from_tags(&["A", "A", "C", "D", "A'", "B'", "A\"", "B\"", "E", "F"]).is_err());
    assert!(Strategy::from_tags(&["A", "B", "C", "D", "A'", "B'", "A\"", "B\"", "E", "G"]).is_err());
    assert!(Strategy::from_tags(&["A", "B", "C"]).is_err());
    assert!(Strategy::from_tags(&["A", "B", "C", "D", "A'", "B'", "A\"", "B\"", "E", "F"]).is_ok());
}

#[test]
fn unranking_is_lexicographic_over_the_canonical_order() {
    assert_eq!(*Strategy::nth(0).classes(), PointClass::ALL);

    let mut reversed = PointClass::ALL;
    reversed.reverse();
    assert_eq!(*Strategy::nth(Strategy::COUNT - 1).classes(), reversed);

    // rank 1 swaps the last two classes
    let mut swapped_tail = PointClass::ALL;
    swapped_tail.swap(8, 9);
    assert_eq!(*Strategy::nth(1).classes(), swapped_tail);
}

#[test_case(0)]
#[test_case(1)]
#[test_case(42)]
#[test_case(362_880)]
#[test_case(3_628_799)]
fn rank_inverts_nth(rank: u64) {
    assert_eq!(Strategy::nth(rank).rank(), rank);
}

#[test]
fn consecutive_ranks_differ() {
    assert_ne!(Strategy::nth(7), Strategy::nth(8));
}
