use gridpack::errors::PackError;
use thiserror::Error;

/// Errors raised at the solver boundary.
#[derive(Error, Debug)]
pub enum SolverError {
    #[error("settings: {0}")]
    Settings(String),
    #[error("multiprocess: {0}")]
    MultiProcess(String),
    #[error(transparent)]
    Pack(#[from] PackError),
}
