use once_cell::sync::Lazy;
use std::time::Instant;

pub mod config;
pub mod errors;
pub mod io;
pub mod opt;
pub mod preprocess;
pub mod solver;

/// Time reference for epoch-relative log timestamps.
pub static EPOCH: Lazy<Instant> = Lazy::new(Instant::now);
