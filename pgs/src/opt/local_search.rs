use crate::opt::SearchCtrl;
use crate::solver::Problem;
use gridpack::construct::Strategy;
use gridpack::entities::Solution;
use log::debug;
use ordered_float::NotNan;
use thousands::Separable;

/// Neighbor cap per node once throttling engages; the full 2-opt
/// neighborhood of a 71-item instance (2485 swaps) is the last one below it.
pub const MAX_NEIGHBORS_THROTTLE: usize = 2500;

/// Result of a hill climb: the best node found and its objective.
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub solution: Solution,
    pub order: Vec<usize>,
    pub objective: f64,
}

/// 2-opt hill climb over the item order.
///
/// Evaluates the full swap neighborhood of the current node and moves to the
/// best strictly-improving neighbor (best-improvement). With `throttle` set
/// and a neighborhood larger than [`MAX_NEIGHBORS_THROTTLE`], neighbors are
/// scanned in lexicographic `(i, j)` order, the first improvement is taken,
/// and at most the cap is evaluated per node. Terminates on a local optimum,
/// an exactly-100% node, or `ctrl` firing at a node boundary.
///
/// In strip-packing mode every node whose solution satisfies the acceptance
/// rule tightens the strip's imaginary height to the node's stack height.
pub fn hill_climb(
    problem: &mut Problem,
    init_order: Vec<usize>,
    strategy: &Strategy,
    rotation: bool,
    throttle: bool,
    ctrl: &SearchCtrl,
) -> SearchOutcome {
    let n = init_order.len();
    let full_neighborhood = n * n.saturating_sub(1) / 2;
    let throttled = throttle && full_neighborhood > MAX_NEIGHBORS_THROTTLE;

    let mut best_order = init_order;
    let mut best_solution = problem.pack(&best_order, strategy, rotation);
    let mut best_objective = not_nan(best_solution.objective());
    if node_accepted(problem, &best_solution) {
        tighten_strip(problem, &best_solution);
    }

    let mut node_count = 0usize;
    loop {
        if best_solution.is_perfect() || ctrl.should_stop() {
            break;
        }
        node_count += 1;

        let mut improving: Option<(NotNan<f64>, Vec<usize>, Solution)> = None;
        let mut processed = 0usize;
        'scan: for i in 0..n {
            for j in i + 1..n {
                let mut candidate = best_order.clone();
                candidate.swap(i, j);
                let solution = problem.pack(&candidate, strategy, rotation);
                let objective = not_nan(solution.objective());
                processed += 1;

                if objective > best_objective && node_accepted(problem, &solution) {
                    let improves_tracked = improving
                        .as_ref()
                        .map_or(true, |(tracked, _, _)| objective > *tracked);
                    if improves_tracked {
                        improving = Some((objective, candidate, solution));
                    }
                    if throttled {
                        break 'scan;
                    }
                }
                if throttled && processed >= MAX_NEIGHBORS_THROTTLE {
                    break 'scan;
                }
            }
        }

        match improving {
            Some((objective, order, solution)) => {
                best_objective = objective;
                best_order = order;
                tighten_strip(problem, &solution);
                best_solution = solution;
                debug!(
                    "[LS] node {node_count}: objective {:.4} ({} neighbors evaluated)",
                    best_objective,
                    processed.separate_with_commas()
                );
            }
            None => break,
        }
    }

    SearchOutcome {
        solution: best_solution,
        order: best_order,
        objective: best_objective.into_inner(),
    }
}

/// Acceptance rule beyond strict objective improvement: while a strip has no
/// minimum-height floor, only solutions containing every item qualify.
fn node_accepted(problem: &Problem, solution: &Solution) -> bool {
    match problem {
        Problem::Strip(sp) if sp.strip.min_height.is_none() => {
            solution.placed_count() == sp.items.len()
        }
        _ => true,
    }
}

fn tighten_strip(problem: &mut Problem, solution: &Solution) {
    if let Problem::Strip(sp) = problem {
        sp.strip.fit_to(solution.layouts[0].stack_height());
    }
}

fn not_nan(value: f64) -> NotNan<f64> {
    NotNan::new(value).expect("objective value is NaN")
}
