use gridpack::construct::Strategy;
use gridpack::entities::{Container, Item};
use gridpack::errors::PackError;
use gridpack::io::ext_repr::{ExtContainerDims, ExtContainers, ExtItemDims, ExtItems};
use gridpack::probs::BPInstance;
use gridpack::util::assertions;
use indexmap::IndexMap;
use pgs::config::Settings;
use pgs::errors::SolverError;
use pgs::io::ExtProblem;
use pgs::opt::hypersearch::{chunk_bounds, search_parallel, FaultInjection, WORKER_BIN_ENV};
use pgs::preprocess::{Orientation, SortKey};
use pgs::solver::{Problem, Solver};
use std::time::{Duration, Instant};
use test_case::test_case;

fn ext_items(dims: &[(&str, u64, u64)]) -> ExtItems {
    dims.iter()
        .map(|&(id, w, l)| (id.to_string(), ExtItemDims { w, l }))
        .collect()
}

fn ext_containers(dims: &[(&str, u64, u64)]) -> ExtContainers {
    dims.iter()
        .map(|&(id, width, length)| (id.to_string(), ExtContainerDims { width, length }))
        .collect()
}

fn settings(workers_num: usize, max_time_in_seconds: u64, rotation: bool) -> Settings {
    Settings {
        workers_num,
        max_time_in_seconds,
        rotation,
        figure: None,
    }
}

/// The test executable is not the `pgs` binary, so point the parent at the
/// worker executable cargo built alongside it.
fn locate_worker_binary() {
    std::env::set_var(WORKER_BIN_ENV, env!("CARGO_BIN_EXE_pgs-worker"));
}

// % ----------- construction through the solver -----------

#[test]
fn exact_fill_scenario() {
    let items = ext_items(&[("a", 2, 2), ("b", 2, 2), ("c", 2, 2), ("d", 2, 2)]);
    let containers = ext_containers(&[("c", 4, 4)]);
    let mut solver = Solver::new(&items, &containers, Settings::default()).unwrap();

    let solution = solver.solve().clone();
    assert!(solution.is_perfect());
    assert_eq!(solution.placed_count(), 4);

    let mut origins: Vec<_> = solution
        .placements()
        .map(|(_, p)| (p.x, p.y))
        .collect();
    origins.sort_unstable();
    assert_eq!(origins, vec![(0, 0), (0, 2), (2, 0), (2, 2)]);
}

#[test_case(true; "rotation on")]
#[test_case(false; "rotation off")]
fn rotation_scenario(rotation: bool) {
    let items = ext_items(&[("a", 5, 1)]);
    let containers = ext_containers(&[("c", 1, 5)]);
    let mut solver =
        Solver::new(&items, &containers, settings(1, 60, rotation)).unwrap();

    let solution = solver.solve();
    if rotation {
        let (_, placement) = solution.placements().next().unwrap();
        assert_eq!(
            (placement.x, placement.y, placement.width, placement.length),
            (0, 0, 1, 5)
        );
    } else {
        assert_eq!(solution.placed_count(), 0);
        assert_eq!(solution.layouts[0].utilization(), 0.0);
    }
}

#[test]
fn multi_container_cascade_scenario() {
    let items = ext_items(&[("a", 2, 2), ("b", 2, 2)]);
    let containers = ext_containers(&[("c1", 2, 2), ("c2", 2, 2)]);
    let mut solver = Solver::new(&items, &containers, Settings::default()).unwrap();

    let solution = solver.solve();
    assert!(solution.is_perfect());
    assert_eq!(solution.layouts.len(), 2);
    assert_eq!(solution.layouts[0].placements.len(), 1);
    assert_eq!(solution.layouts[1].placements.len(), 1);
    assert_eq!(solution.layouts[0].placements[0].item_id, 0);
    assert_eq!(solution.layouts[1].placements[0].item_id, 1);
}

// % ----------- local search -----------

#[test]
fn local_search_reaches_the_full_packing() {
    let items = ext_items(&[("u", 1, 1), ("big", 4, 3), ("wide", 4, 1)]);
    let containers = ext_containers(&[("c", 4, 4)]);
    let mut solver = Solver::new(&items, &containers, Settings::default()).unwrap();

    let solution = solver.local_search(false).clone();
    assert_eq!(solution.objective(), 1.0);
    assert_eq!(solution.placed_count(), 2);
    assert!(assertions::utilizations_in_range(&solution));
    assert!(assertions::item_ids_unique(&solution));

    // the unit item is the one squeezed out
    let exported = solver.export_solution().unwrap();
    assert!(exported.placements["c"].contains_key("big"));
    assert!(exported.placements["c"].contains_key("wide"));
    assert!(!exported.placements["c"].contains_key("u"));
    assert_eq!(exported.utilization["c"], 1.0);
}

#[test]
fn throttle_flag_is_inert_on_small_neighborhoods() {
    let items = ext_items(&[("u", 1, 1), ("big", 4, 3), ("wide", 4, 1)]);
    let containers = ext_containers(&[("c", 4, 4)]);

    let mut throttled = Solver::new(&items, &containers, Settings::default()).unwrap();
    let mut unthrottled = Solver::new(&items, &containers, Settings::default()).unwrap();
    assert_eq!(
        throttled.local_search(true),
        unthrottled.local_search(false)
    );
}

// % ----------- strip packing -----------

#[test]
fn strip_tightening_scenario() {
    let items = ext_items(&[
        ("big", 4, 1),
        ("u1", 1, 1),
        ("u2", 1, 1),
        ("u3", 1, 1),
        ("u4", 1, 1),
    ]);
    let mut solver = Solver::new_strip(&items, 4, Settings::default()).unwrap();
    // seed height is the sum of the items' larger sides
    assert_eq!(solver.container_height(), Some(8));

    solver
        .set_strategy_tags(&["B", "A", "C", "D", "A'", "B'", "A\"", "B\"", "E", "F"])
        .unwrap();
    let solution = solver.local_search(false).clone();

    assert_eq!(solution.placed_count(), 5);
    assert!(solution.is_perfect());
    assert_eq!(solver.container_height(), Some(2));

    let exported = solver.export_solution().unwrap();
    assert_eq!(exported.strip_height, Some(2));
}

#[test]
fn strip_minimum_height_floors_the_tightening() {
    let items = ext_items(&[
        ("big", 4, 1),
        ("u1", 1, 1),
        ("u2", 1, 1),
        ("u3", 1, 1),
        ("u4", 1, 1),
    ]);
    let mut solver = Solver::new_strip(&items, 4, Settings::default()).unwrap();
    solver.set_container_min_height(3).unwrap();
    solver
        .set_strategy_tags(&["B", "A", "C", "D", "A'", "B'", "A\"", "B\"", "E", "F"])
        .unwrap();

    solver.local_search(false);
    assert_eq!(solver.container_height(), Some(3));
}

#[test]
fn strip_height_is_retained_after_a_single_worker_hypersearch() {
    let items = ext_items(&[
        ("big", 4, 1),
        ("u1", 1, 1),
        ("u2", 1, 1),
        ("u3", 1, 1),
        ("u4", 1, 1),
    ]);
    let mut solver = Solver::new_strip(&items, 4, settings(1, 1, true)).unwrap();
    assert_eq!(solver.container_height(), Some(8));

    solver
        .hypersearch(Some(Orientation::Wide), Some((SortKey::Area, true)), true)
        .unwrap();
    // every strategy tried within the budget stacks the units in a column of
    // height 5; that tightened height survives the run
    assert_eq!(solver.container_height(), Some(5));
}

#[test]
fn strip_height_is_untouched_by_a_multi_worker_hypersearch() {
    locate_worker_binary();
    let items = ext_items(&[
        ("big", 4, 1),
        ("u1", 1, 1),
        ("u2", 1, 1),
        ("u3", 1, 1),
        ("u4", 1, 1),
    ]);
    let mut solver = Solver::new_strip(&items, 4, settings(2, 1, true)).unwrap();

    solver
        .hypersearch(Some(Orientation::Wide), Some((SortKey::Area, true)), true)
        .unwrap();
    // workers tighten their own copies only
    assert_eq!(solver.container_height(), Some(8));
}

#[test]
fn reset_container_height_restores_the_seed() {
    let items = ext_items(&[("a", 2, 3), ("b", 1, 4)]);
    let mut solver = Solver::new_strip(&items, 5, Settings::default()).unwrap();
    assert_eq!(solver.container_height(), Some(7));
    solver.set_container_height(6).unwrap();
    solver.set_container_min_height(4).unwrap();
    assert!(solver.set_container_height(3).is_err());

    solver.reset_container_height();
    assert_eq!(solver.container_height(), Some(7));
    assert!(solver.set_container_height(3).is_ok());
}

// % ----------- hyper-search -----------

#[test]
fn hypersearch_single_worker_short_circuits_on_a_full_packing() {
    let items = ext_items(&[("a", 2, 2), ("b", 2, 2), ("c", 2, 2), ("d", 2, 2)]);
    let containers = ext_containers(&[("c", 4, 4)]);
    let mut solver = Solver::new(&items, &containers, Settings::default()).unwrap();

    let started = Instant::now();
    let solution = solver
        .hypersearch(Some(Orientation::Wide), Some((SortKey::Area, true)), true)
        .unwrap()
        .clone();
    assert!(solution.is_perfect());
    assert!(solver.best_strategy().is_some());
    assert!(started.elapsed() < Duration::from_secs(30));
}

#[test]
fn hypersearch_workers_short_circuit_on_a_full_packing() {
    locate_worker_binary();
    let items = ext_items(&[("a", 2, 2), ("b", 2, 2), ("c", 2, 2), ("d", 2, 2)]);
    let containers = ext_containers(&[("c", 4, 4)]);
    let mut solver = Solver::new(&items, &containers, settings(4, 60, true)).unwrap();

    let started = Instant::now();
    let solution = solver
        .hypersearch(Some(Orientation::Wide), Some((SortKey::Area, true)), true)
        .unwrap()
        .clone();
    assert!(solution.is_perfect());
    assert_eq!(solution.placed_count(), 4);
    assert!(assertions::item_ids_unique(&solution));
    assert!(started.elapsed() < Duration::from_secs(30));
}

fn scenario_problem() -> (Problem, Vec<usize>) {
    let containers = vec![Container::new(0, 4, 4)];
    let items = vec![
        Item::new(0, 2, 2),
        Item::new(1, 2, 2),
        Item::new(2, 2, 2),
        Item::new(3, 2, 2),
    ];
    (
        Problem::Bins(BPInstance::new(containers, items)),
        vec![0, 1, 2, 3],
    )
}

#[test]
fn a_failing_worker_does_not_fail_the_search() {
    locate_worker_binary();
    let (problem, order) = scenario_problem();
    let outcome = search_parallel(
        &problem,
        &order,
        true,
        true,
        Instant::now() + Duration::from_secs(30),
        2,
        Some(FaultInjection::Worker(0)),
    )
    .unwrap();
    assert!(outcome.solution.is_perfect());
}

#[test]
fn all_workers_failing_surfaces_a_multiprocess_error() {
    locate_worker_binary();
    let (problem, order) = scenario_problem();
    let result = search_parallel(
        &problem,
        &order,
        true,
        true,
        Instant::now() + Duration::from_secs(30),
        2,
        Some(FaultInjection::All),
    );
    assert!(matches!(result, Err(SolverError::MultiProcess(_))));
}

#[test]
fn worker_chunks_cover_the_whole_strategy_space() {
    for workers_num in [1usize, 2, 3, 7, 11, 16] {
        let mut covered = 0;
        for worker in 0..workers_num {
            let bounds = chunk_bounds(worker, workers_num);
            assert_eq!(bounds.start, covered);
            covered = bounds.end;
        }
        assert_eq!(covered, Strategy::COUNT);
    }
}

// % ----------- preprocessors -----------

#[test]
fn orientation_is_idempotent_and_normalizing() {
    let items = ext_items(&[("a", 2, 5), ("b", 3, 3), ("c", 7, 1)]);
    let containers = ext_containers(&[("c", 10, 10)]);
    let mut solver = Solver::new(&items, &containers, Settings::default()).unwrap();

    solver.orient_items(Some(Orientation::Wide));
    let wide_once: Vec<_> = solver.problem().items().to_vec();
    solver.orient_items(Some(Orientation::Wide));
    assert_eq!(solver.problem().items(), wide_once.as_slice());
    assert_eq!(
        wide_once.iter().map(|i| (i.width, i.length)).collect::<Vec<_>>(),
        vec![(5, 2), (3, 3), (7, 1)]
    );

    solver.orient_items(Some(Orientation::Long));
    assert_eq!(
        solver
            .problem()
            .items()
            .iter()
            .map(|i| (i.width, i.length))
            .collect::<Vec<_>>(),
        vec![(2, 5), (3, 3), (1, 7)]
    );
}

#[test]
fn orientation_is_skipped_when_rotation_is_disabled() {
    let items = ext_items(&[("a", 2, 5)]);
    let containers = ext_containers(&[("c", 10, 10)]);
    let mut solver = Solver::new(&items, &containers, settings(1, 60, false)).unwrap();
    solver.orient_items(Some(Orientation::Wide));
    assert_eq!(solver.problem().items()[0].width, 2);
    assert_eq!(solver.problem().items()[0].length, 5);
}

#[test]
fn sorting_orders_by_key_with_id_tiebreak() {
    let items = ext_items(&[("a", 2, 5), ("b", 3, 3), ("c", 1, 1), ("d", 5, 2)]);
    let containers = ext_containers(&[("c", 10, 10)]);
    let mut solver = Solver::new(&items, &containers, Settings::default()).unwrap();

    solver.sort_items(Some((SortKey::Area, true)));
    // areas: a=10, b=9, c=1, d=10; descending with reversed id tiebreak
    assert_eq!(solver.order(), &[3, 0, 1, 2]);

    solver.sort_items(Some((SortKey::Area, false)));
    assert_eq!(solver.order(), &[2, 1, 0, 3]);

    solver.sort_items(None);
    assert_eq!(solver.order(), &[2, 1, 0, 3]);

    solver.sort_items(Some((SortKey::LongestSideRatio, true)));
    // ratios: a=2.5, b=1, c=1, d=2.5; ids break the ties
    assert_eq!(solver.order(), &[3, 0, 2, 1]);
}

// % ----------- validation and reset policy -----------

#[test]
fn settings_validation() {
    assert!(Settings::default().validate().is_ok());
    assert!(matches!(
        settings(0, 60, true).validate(),
        Err(SolverError::Settings(_))
    ));
    assert!(matches!(
        settings(1, 0, true).validate(),
        Err(SolverError::Settings(_))
    ));
}

#[test]
fn containers_and_strip_width_are_mutually_exclusive() {
    let ext = ExtProblem {
        items: ext_items(&[("a", 1, 1)]),
        containers: Some(ext_containers(&[("c", 2, 2)])),
        strip_pack_width: Some(4),
        settings: None,
    };
    assert!(matches!(
        Solver::from_ext(&ext),
        Err(SolverError::Pack(PackError::Containers(_)))
    ));

    let neither = ExtProblem {
        items: ext_items(&[("a", 1, 1)]),
        containers: None,
        strip_pack_width: None,
        settings: None,
    };
    assert!(Solver::from_ext(&neither).is_err());
}

#[test]
fn input_validation_errors() {
    let containers = ext_containers(&[("c", 2, 2)]);
    let empty: ExtItems = IndexMap::new();
    assert!(matches!(
        Solver::new(&empty, &containers, Settings::default()),
        Err(SolverError::Pack(PackError::Items(_)))
    ));

    let zero_dim = ext_items(&[("a", 0, 2)]);
    assert!(matches!(
        Solver::new(&zero_dim, &containers, Settings::default()),
        Err(SolverError::Pack(PackError::Dimensions(_)))
    ));

    let long_id = "x".repeat(65);
    let bad_id = ext_items(&[(long_id.as_str(), 1, 1)]);
    assert!(matches!(
        Solver::new(&bad_id, &containers, Settings::default()),
        Err(SolverError::Pack(PackError::Items(_)))
    ));

    let no_containers: ExtContainers = IndexMap::new();
    let items = ext_items(&[("a", 1, 1)]);
    assert!(matches!(
        Solver::new(&items, &no_containers, Settings::default()),
        Err(SolverError::Pack(PackError::Containers(_)))
    ));
}

#[test]
fn solution_reset_policy() {
    let items = ext_items(&[("a", 2, 2)]);
    let containers = ext_containers(&[("c", 2, 2)]);
    let mut solver = Solver::new(&items, &containers, Settings::default()).unwrap();

    solver.solve();
    assert!(solver.solution().is_some());

    // settings reassignment keeps the solution
    solver.set_settings(settings(1, 30, true)).unwrap();
    assert!(solver.solution().is_some());

    // strategy reassignment resets it
    solver.set_strategy(Strategy::nth(1));
    assert!(solver.solution().is_none());

    solver.solve();
    solver.set_items(&ext_items(&[("b", 1, 1)])).unwrap();
    assert!(solver.solution().is_none());

    solver.solve();
    solver
        .set_containers(&ext_containers(&[("c2", 3, 3)]))
        .unwrap();
    assert!(solver.solution().is_none());

    // sorting and orientation reset too
    solver.solve();
    solver.sort_items(Some((SortKey::Perimeter, false)));
    assert!(solver.solution().is_none());
    solver.solve();
    solver.orient_items(Some(Orientation::Wide));
    assert!(solver.solution().is_none());
}

#[test]
fn strip_mode_rejects_container_assignment() {
    let items = ext_items(&[("a", 1, 1)]);
    let mut solver = Solver::new_strip(&items, 3, Settings::default()).unwrap();
    assert!(matches!(
        solver.set_containers(&ext_containers(&[("c", 2, 2)])),
        Err(SolverError::Pack(PackError::Containers(_)))
    ));
}
