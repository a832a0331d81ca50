use crate::errors::SolverError;
use crate::opt::local_search::hill_climb;
use crate::opt::{SearchCtrl, SharedBest};
use crate::solver::Problem;
use anyhow::{bail, Context};
use gridpack::construct::Strategy;
use gridpack::entities::Solution;
use log::{debug, error};
use serde::{Deserialize, Serialize};
use std::ops::Range;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};
use std::{env, fs, process};

/// Name of the companion worker executable spawned per hyper-search worker.
pub const WORKER_BIN_NAME: &str = "pgs-worker";

/// Environment variable overriding the worker executable location; used by
/// the test harness, whose own executable is not the `pgs` binary.
pub const WORKER_BIN_ENV: &str = "PGS_WORKER_BIN";

/// Best result of a hyper-search run. `strategy` is `None` when the initial
/// default-strategy construction was never beaten.
#[derive(Debug, Clone)]
pub struct HyperOutcome {
    pub solution: Solution,
    pub objective: f64,
    pub strategy: Option<Strategy>,
}

/// Worker-failure injection used by the test suite to exercise isolation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaultInjection {
    Worker(usize),
    All,
}

impl FaultInjection {
    fn hits(self, worker: usize) -> bool {
        match self {
            FaultInjection::Worker(w) => w == worker,
            FaultInjection::All => true,
        }
    }
}

/// Everything a worker process needs, shipped serialized on its stdin: a
/// full copy of the problem, the base item order, its contiguous chunk of
/// strategy ranks, the remaining time budget and the path of the shared
/// best-utilization cell.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct WorkerTask {
    pub problem: Problem,
    pub order: Vec<usize>,
    pub rotation: bool,
    pub throttle: bool,
    pub rank_start: u64,
    pub rank_end: u64,
    pub budget_ms: u64,
    pub cell_path: PathBuf,
    pub inject_failure: bool,
}

/// Best-solution artifact a worker serializes to its stdout on exit.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct WorkerReport {
    pub objective: f64,
    pub solution: Solution,
    pub strategy_rank: Option<u64>,
}

/// Contiguous strategy-rank chunk assigned to `worker` of `workers_num`.
/// Chunks partition `0..Strategy::COUNT` without gaps or overlap.
pub fn chunk_bounds(worker: usize, workers_num: usize) -> Range<u64> {
    let chunk = Strategy::COUNT.div_ceil(workers_num as u64);
    let start = (worker as u64 * chunk).min(Strategy::COUNT);
    let end = ((worker as u64 + 1) * chunk).min(Strategy::COUNT);
    start..end
}

/// Single-worker hyper-search: iterates every strategy rank in order,
/// running a local search per strategy. Terminates on an exactly-100%
/// solution or on the deadline. Operates on `problem` directly, so strip
/// height tightening is retained by the caller.
pub fn search_single(
    problem: &mut Problem,
    order: &[usize],
    init_strategy: Strategy,
    rotation: bool,
    throttle: bool,
    deadline: Instant,
) -> HyperOutcome {
    let ctrl = SearchCtrl {
        deadline,
        global_best: None,
    };
    let mut best = HyperOutcome {
        solution: problem.pack(order, &init_strategy, rotation),
        objective: 0.0,
        strategy: Some(init_strategy),
    };
    best.objective = best.solution.objective();

    if best.solution.is_perfect() {
        return best;
    }
    for rank in 0..Strategy::COUNT {
        if Instant::now() >= deadline {
            debug!("[HS] time budget exhausted after {rank} strategies");
            break;
        }
        let strategy = Strategy::nth(rank);
        let outcome = hill_climb(problem, order.to_vec(), &strategy, rotation, throttle, &ctrl);
        if outcome.objective > best.objective {
            debug!("[HS] new best objective {:.4} ({strategy})", outcome.objective);
            best = HyperOutcome {
                solution: outcome.solution,
                objective: outcome.objective,
                strategy: Some(strategy),
            };
            if best.solution.is_perfect() {
                debug!("[HS] 100% utilization reached, stopping");
                break;
            }
        }
    }
    best
}

/// Multi-worker hyper-search: partitions the strategy ranks into contiguous
/// chunks and spawns one independent worker *process* per chunk, each owning
/// a full copy of the problem. The only cross-worker state is the shared
/// best-utilization cell (an atomic double in a memory-mapped file), polled
/// together with the deadline at strategy and local-search node boundaries.
/// Tasks go out serialized on stdin, best-solution artifacts come back
/// serialized on stdout at worker exit. A worker failure is logged and
/// counted; only when every worker fails does the call surface an error.
/// Ties in the reduction go to the lowest worker index.
pub fn search_parallel(
    problem: &Problem,
    order: &[usize],
    rotation: bool,
    throttle: bool,
    deadline: Instant,
    workers_num: usize,
    fault: Option<FaultInjection>,
) -> Result<HyperOutcome, SolverError> {
    let worker_bin = worker_binary()
        .map_err(|err| SolverError::MultiProcess(format!("{err:#}")))?;
    let cell_path = cell_file_path();
    let _cell = SharedBest::create(&cell_path).map_err(|err| {
        SolverError::MultiProcess(format!(
            "could not create the shared best-utilization cell: {err}"
        ))
    })?;

    let mut children = Vec::with_capacity(workers_num);
    for worker in 0..workers_num {
        let ranks = chunk_bounds(worker, workers_num);
        let task = WorkerTask {
            problem: problem.clone(),
            order: order.to_vec(),
            rotation,
            throttle,
            rank_start: ranks.start,
            rank_end: ranks.end,
            budget_ms: deadline
                .saturating_duration_since(Instant::now())
                .as_millis() as u64,
            cell_path: cell_path.clone(),
            inject_failure: fault.is_some_and(|f| f.hits(worker)),
        };
        match spawn_worker(&worker_bin, &task) {
            Ok(child) => children.push(Some(child)),
            Err(err) => {
                error!("[HS] worker {worker} failed to start: {err:#}");
                children.push(None);
            }
        }
    }

    let mut outcomes = Vec::with_capacity(workers_num);
    for (worker, child) in children.into_iter().enumerate() {
        let Some(child) = child else { continue };
        match collect_report(child) {
            Ok(report) => outcomes.push(HyperOutcome {
                objective: report.objective,
                solution: report.solution,
                strategy: report.strategy_rank.map(Strategy::nth),
            }),
            Err(err) => {
                error!("[HS] worker {worker} failed; remaining workers continue: {err:#}");
            }
        }
    }
    let _ = fs::remove_file(&cell_path);

    outcomes
        .into_iter()
        .reduce(|best, candidate| {
            if candidate.objective > best.objective {
                candidate
            } else {
                best
            }
        })
        .ok_or_else(|| SolverError::MultiProcess("all hyper-search workers failed".into()))
}

/// Body of a worker process: searches the task's rank chunk and returns the
/// best-solution artifact to serialize back to the parent.
pub fn run_worker_task(task: WorkerTask) -> Result<WorkerReport, SolverError> {
    let shared = SharedBest::open(&task.cell_path).map_err(|err| {
        SolverError::MultiProcess(format!(
            "could not open the shared best-utilization cell: {err}"
        ))
    })?;
    let deadline = Instant::now() + Duration::from_millis(task.budget_ms);
    let mut problem = task.problem;
    let outcome = worker_run(
        &mut problem,
        &task.order,
        task.rotation,
        task.throttle,
        deadline,
        task.rank_start..task.rank_end,
        &shared,
    );
    Ok(WorkerReport {
        objective: outcome.objective,
        strategy_rank: outcome.strategy.map(|s| s.rank()),
        solution: outcome.solution,
    })
}

fn worker_run(
    problem: &mut Problem,
    order: &[usize],
    rotation: bool,
    throttle: bool,
    deadline: Instant,
    ranks: Range<u64>,
    shared: &SharedBest,
) -> HyperOutcome {
    let mut best = HyperOutcome {
        solution: problem.pack(order, &Strategy::default(), rotation),
        objective: 0.0,
        strategy: None,
    };
    best.objective = best.solution.objective();
    shared.offer(best.solution.normalized_objective());
    if best.solution.is_perfect() {
        return best;
    }

    let ctrl = SearchCtrl {
        deadline,
        global_best: Some(shared),
    };
    for rank in ranks {
        if ctrl.should_stop() {
            debug!("[HS] <worker {}> stopping at rank {rank}", process::id());
            break;
        }
        let strategy = Strategy::nth(rank);
        let outcome = hill_climb(problem, order.to_vec(), &strategy, rotation, throttle, &ctrl);
        if outcome.objective > best.objective {
            best = HyperOutcome {
                solution: outcome.solution,
                objective: outcome.objective,
                strategy: Some(strategy),
            };
            shared.offer(best.solution.normalized_objective());
            debug!(
                "[HS] <worker {}> new best objective {:.4} ({strategy})",
                process::id(),
                best.objective
            );
            if best.solution.is_perfect() {
                debug!("[HS] <worker {}> 100% utilization reached", process::id());
                break;
            }
        }
    }
    best
}

/// Locates the worker executable: the override variable if set, otherwise a
/// sibling of the running executable (one level up covers test binaries,
/// which live in a subdirectory of the build output).
fn worker_binary() -> anyhow::Result<PathBuf> {
    if let Ok(path) = env::var(WORKER_BIN_ENV) {
        return Ok(PathBuf::from(path));
    }
    let exe = env::current_exe().context("could not resolve the running executable")?;
    let name = format!("{WORKER_BIN_NAME}{}", env::consts::EXE_SUFFIX);
    let mut candidates = Vec::new();
    if let Some(dir) = exe.parent() {
        candidates.push(dir.join(&name));
        if let Some(parent) = dir.parent() {
            candidates.push(parent.join(&name));
        }
    }
    for candidate in &candidates {
        if candidate.is_file() {
            return Ok(candidate.clone());
        }
    }
    bail!("could not locate the {WORKER_BIN_NAME} executable (set {WORKER_BIN_ENV} to override)")
}

/// Per-run path of the shared cell file.
fn cell_file_path() -> PathBuf {
    let stamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or(0);
    env::temp_dir().join(format!("pgs-best-{}-{stamp}.cell", process::id()))
}

/// Spawns a worker process and ships it its task; closing stdin signals the
/// task is complete.
fn spawn_worker(worker_bin: &Path, task: &WorkerTask) -> anyhow::Result<Child> {
    let mut child = Command::new(worker_bin)
        .arg("--log-level")
        .arg(log::max_level().to_string())
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::inherit())
        .spawn()
        .context("could not spawn the worker process")?;
    let stdin = child.stdin.take().expect("worker stdin is piped");
    serde_json::to_writer(stdin, task).context("could not ship the worker its task")?;
    Ok(child)
}

fn collect_report(child: Child) -> anyhow::Result<WorkerReport> {
    let output = child
        .wait_with_output()
        .context("could not collect the worker process")?;
    if !output.status.success() {
        bail!("worker exited with {}", output.status);
    }
    serde_json::from_slice(&output.stdout).context("worker report is not valid")
}
