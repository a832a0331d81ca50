use crate::errors::SolverError;
use log::warn;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// Runtime settings of the solver. Reassigning settings never resets a
/// retained solution.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// Number of hyper-search workers.
    pub workers_num: usize,
    /// Wall-clock budget of a search run.
    pub max_time_in_seconds: u64,
    /// Whether items may be rotated by 90 degrees.
    pub rotation: bool,
    /// Subtree consumed by the external figure renderer; carried through
    /// untouched.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub figure: Option<serde_json::Value>,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            workers_num: 1,
            max_time_in_seconds: 60,
            rotation: true,
            figure: None,
        }
    }
}

impl Settings {
    pub fn validate(&self) -> Result<(), SolverError> {
        if self.workers_num < 1 {
            return Err(SolverError::Settings(
                "workers_num must be a positive integer".into(),
            ));
        }
        if self.max_time_in_seconds < 1 {
            return Err(SolverError::Settings(
                "max_time_in_seconds must be a positive integer".into(),
            ));
        }
        let cpus = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        if self.workers_num > cpus {
            warn!(
                "workers_num ({}) exceeds the available parallelism ({cpus})",
                self.workers_num
            );
        }
        Ok(())
    }

    /// Monotonic deadline of a search run, computed once at its start.
    pub fn deadline(&self) -> Instant {
        Instant::now() + Duration::from_secs(self.max_time_in_seconds)
    }
}
