use crate::config::Settings;
use crate::errors::SolverError;
use crate::io::ExtProblem;
use crate::opt::hypersearch::{search_parallel, search_single};
use crate::opt::local_search::hill_climb;
use crate::opt::SearchCtrl;
use crate::preprocess::{orient_items, sorted_order, Orientation, SortKey};
use gridpack::construct::Strategy;
use gridpack::entities::{Item, Solution};
use gridpack::errors::PackError;
use gridpack::io::export::export_solution;
use gridpack::io::ext_repr::{ExtContainers, ExtItems, ExtSolution};
use gridpack::io::import::{import_containers, import_items};
use gridpack::probs::{BPInstance, SPInstance};
use itertools::Itertools;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use thousands::Separable;

/// External id of the imaginary strip-packing container.
pub const STRIP_CONTAINER_EXT_ID: &str = "strip-pack-container";

/// Tagged problem variant: a fixed container sequence, or a single
/// open-ended strip.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum Problem {
    Bins(BPInstance),
    Strip(SPInstance),
}

impl Problem {
    pub fn pack(&self, order: &[usize], strategy: &Strategy, rotation: bool) -> Solution {
        match self {
            Problem::Bins(bp) => bp.pack(order, strategy, rotation),
            Problem::Strip(sp) => sp.pack(order, strategy, rotation),
        }
    }

    pub fn items(&self) -> &[Item] {
        match self {
            Problem::Bins(bp) => &bp.items,
            Problem::Strip(sp) => &sp.items,
        }
    }

    pub fn items_mut(&mut self) -> &mut [Item] {
        match self {
            Problem::Bins(bp) => &mut bp.items,
            Problem::Strip(sp) => &mut sp.items,
        }
    }

    pub fn item_count(&self) -> usize {
        self.items().len()
    }
}

/// Solver facade: owns the problem, the settings and the retained solution.
///
/// Mutating items, containers, the strategy or the item order resets the
/// retained solution; reassigning settings does not.
pub struct Solver {
    problem: Problem,
    ext_item_ids: Vec<String>,
    ext_container_ids: Vec<String>,
    order: Vec<usize>,
    settings: Settings,
    strategy: Strategy,
    solution: Option<Solution>,
    best_strategy: Option<Strategy>,
}

impl Solver {
    pub fn new(
        items: &ExtItems,
        containers: &ExtContainers,
        settings: Settings,
    ) -> Result<Self, SolverError> {
        settings.validate()?;
        let (items, ext_item_ids) = import_items(items)?;
        let (containers, ext_container_ids) = import_containers(containers)?;
        let order = (0..items.len()).collect_vec();
        Ok(Solver {
            problem: Problem::Bins(BPInstance::new(containers, items)),
            ext_item_ids,
            ext_container_ids,
            order,
            settings,
            strategy: Strategy::default(),
            solution: None,
            best_strategy: None,
        })
    }

    pub fn new_strip(
        items: &ExtItems,
        strip_width: usize,
        settings: Settings,
    ) -> Result<Self, SolverError> {
        settings.validate()?;
        if strip_width == 0 {
            return Err(PackError::Dimensions(
                "strip_pack_width must be a positive integer".into(),
            )
            .into());
        }
        let (items, ext_item_ids) = import_items(items)?;
        let order = (0..items.len()).collect_vec();
        Ok(Solver {
            problem: Problem::Strip(SPInstance::new(items, strip_width)),
            ext_item_ids,
            ext_container_ids: vec![STRIP_CONTAINER_EXT_ID.to_string()],
            order,
            settings,
            strategy: Strategy::default(),
            solution: None,
            best_strategy: None,
        })
    }

    /// Builds a solver from an on-disk problem document. `containers` and
    /// `strip_pack_width` are mutually exclusive.
    pub fn from_ext(ext: &ExtProblem) -> Result<Self, SolverError> {
        let settings = ext.settings.clone().unwrap_or_default();
        match (&ext.containers, ext.strip_pack_width) {
            (Some(_), Some(_)) => Err(PackError::Containers(
                "containers and strip_pack_width are mutually exclusive".into(),
            )
            .into()),
            (Some(containers), None) => Solver::new(&ext.items, containers, settings),
            (None, Some(width)) => Solver::new_strip(&ext.items, width as usize, settings),
            (None, None) => Err(PackError::Containers("containers missing".into()).into()),
        }
    }

    // % ----------- accessors and mutation -----------

    pub fn problem(&self) -> &Problem {
        &self.problem
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn strategy(&self) -> &Strategy {
        &self.strategy
    }

    pub fn solution(&self) -> Option<&Solution> {
        self.solution.as_ref()
    }

    pub fn best_strategy(&self) -> Option<&Strategy> {
        self.best_strategy.as_ref()
    }

    pub fn order(&self) -> &[usize] {
        &self.order
    }

    pub fn set_items(&mut self, items: &ExtItems) -> Result<(), SolverError> {
        let (items, ext_item_ids) = import_items(items)?;
        self.order = (0..items.len()).collect_vec();
        self.ext_item_ids = ext_item_ids;
        match &mut self.problem {
            Problem::Bins(bp) => bp.items = items,
            Problem::Strip(sp) => {
                let width = sp.strip.width;
                *sp = SPInstance::new(items, width);
            }
        }
        self.reset_solution();
        Ok(())
    }

    pub fn set_containers(&mut self, containers: &ExtContainers) -> Result<(), SolverError> {
        match &mut self.problem {
            Problem::Strip(_) => Err(PackError::Containers(
                "containers cannot be assigned when strip packing".into(),
            )
            .into()),
            Problem::Bins(bp) => {
                let (containers, ext_container_ids) = import_containers(containers)?;
                bp.containers = containers;
                self.ext_container_ids = ext_container_ids;
                self.reset_solution();
                Ok(())
            }
        }
    }

    /// Settings reassignment revalidates but does not reset the solution.
    pub fn set_settings(&mut self, settings: Settings) -> Result<(), SolverError> {
        settings.validate()?;
        self.settings = settings;
        Ok(())
    }

    pub fn set_strategy(&mut self, strategy: Strategy) {
        self.strategy = strategy;
        self.reset_solution();
    }

    pub fn set_strategy_tags(&mut self, tags: &[&str]) -> Result<(), SolverError> {
        self.set_strategy(Strategy::from_tags(tags)?);
        Ok(())
    }

    fn reset_solution(&mut self) {
        self.solution = None;
        self.best_strategy = None;
    }

    // % ----------- preprocessors -----------

    /// Reorients every item to the given uniform shape. Skipped entirely
    /// when `orientation` is `None` or when rotation is disabled.
    pub fn orient_items(&mut self, orientation: Option<Orientation>) {
        let Some(orientation) = orientation else {
            return;
        };
        if !self.settings.rotation {
            warn!("cannot orient items, rotation is disabled");
            return;
        }
        orient_items(self.problem.items_mut(), orientation);
        self.reset_solution();
    }

    /// Reorders the base item order by the given criterion. Skipped when
    /// `sorting` is `None`.
    pub fn sort_items(&mut self, sorting: Option<(SortKey, bool)>) {
        let Some((key, reverse)) = sorting else {
            return;
        };
        self.order = sorted_order(self.problem.items(), &self.ext_item_ids, key, reverse);
        self.reset_solution();
    }

    // % ----------- strip-pack accessors -----------

    pub fn container_height(&self) -> Option<usize> {
        match &self.problem {
            Problem::Strip(sp) => Some(sp.strip.height),
            Problem::Bins(_) => None,
        }
    }

    pub fn set_container_height(&mut self, height: usize) -> Result<(), SolverError> {
        match &mut self.problem {
            Problem::Strip(sp) => Ok(sp.strip.set_height(height)?),
            Problem::Bins(_) => Err(PackError::Containers(
                "container height is only available when strip packing".into(),
            )
            .into()),
        }
    }

    pub fn set_container_min_height(&mut self, min_height: usize) -> Result<(), SolverError> {
        match &mut self.problem {
            Problem::Strip(sp) => Ok(sp.strip.set_min_height(min_height)?),
            Problem::Bins(_) => Err(PackError::Containers(
                "container height is only available when strip packing".into(),
            )
            .into()),
        }
    }

    /// Restores the imaginary container's seed height; no-op for fixed
    /// containers.
    pub fn reset_container_height(&mut self) {
        if let Problem::Strip(sp) = &mut self.problem {
            sp.reset_height();
        }
    }

    // % ----------- solving -----------

    /// Runs the construction heuristic once with the current order and
    /// strategy, retaining its solution.
    pub fn solve(&mut self) -> &Solution {
        let solution = self
            .problem
            .pack(&self.order, &self.strategy, self.settings.rotation);
        self.solution.insert(solution)
    }

    /// Hill-climbing local search from the current item order, using the
    /// current strategy. In strip-packing mode the tightened height is
    /// retained on the solver.
    pub fn local_search(&mut self, throttle: bool) -> &Solution {
        let ctrl = SearchCtrl {
            deadline: self.settings.deadline(),
            global_best: None,
        };
        let outcome = hill_climb(
            &mut self.problem,
            self.order.clone(),
            &self.strategy,
            self.settings.rotation,
            throttle,
            &ctrl,
        );
        self.best_strategy = Some(self.strategy);
        self.solution.insert(outcome.solution)
    }

    /// Hyper-search: a local search per potential-points strategy, over all
    /// `10!` strategy permutations, preceded by the optional orientation and
    /// sorting preprocessors.
    ///
    /// With `workers_num == 1` the search runs in place and a strip's
    /// tightened height is retained; with more workers each runs as an
    /// independent process on its own copy of the problem and the solver's
    /// height is left untouched.
    pub fn hypersearch(
        &mut self,
        orientation: Option<Orientation>,
        sorting: Option<(SortKey, bool)>,
        throttle: bool,
    ) -> Result<&Solution, SolverError> {
        self.sort_items(sorting);
        self.orient_items(orientation);

        let deadline = self.settings.deadline();
        info!(
            "[HS] starting hyper-search over {} strategies ({} worker{})",
            Strategy::COUNT.separate_with_commas(),
            self.settings.workers_num,
            if self.settings.workers_num == 1 { "" } else { "s" },
        );

        let outcome = if self.settings.workers_num == 1 {
            search_single(
                &mut self.problem,
                &self.order,
                self.strategy,
                self.settings.rotation,
                throttle,
                deadline,
            )
        } else {
            search_parallel(
                &self.problem,
                &self.order,
                self.settings.rotation,
                throttle,
                deadline,
                self.settings.workers_num,
                None,
            )?
        };

        info!(
            "[HS] hyper-search finished, objective {:.4} ({} of {} items placed)",
            outcome.objective,
            outcome.solution.placed_count(),
            self.problem.item_count(),
        );
        self.best_strategy = outcome.strategy;
        Ok(self.solution.insert(outcome.solution))
    }

    /// The retained solution in external representation, if any.
    pub fn export_solution(&self) -> Option<ExtSolution> {
        self.solution.as_ref().map(|solution| {
            export_solution(
                solution,
                &self.ext_item_ids,
                &self.ext_container_ids,
                self.container_height(),
            )
        })
    }
}
