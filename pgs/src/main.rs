use std::fs;

use anyhow::{Context, Result};
use clap::Parser;

use pgs::io;
use pgs::io::cli::Cli;
use pgs::preprocess::{Orientation, SortKey};
use pgs::solver::Solver;

fn main() -> Result<()> {
    let args = Cli::parse();
    io::init_logger(args.log_level)?;

    let ext_problem = io::read_problem(&args.input_file)?;
    let mut solver = Solver::from_ext(&ext_problem)?;

    solver.hypersearch(
        Some(Orientation::Wide),
        Some((SortKey::Area, true)),
        true,
    )?;

    let ext_solution = solver
        .export_solution()
        .context("hyper-search produced no solution")?;

    if !args.solution_folder.exists() {
        fs::create_dir_all(&args.solution_folder).with_context(|| {
            format!("could not create solution folder: {:?}", args.solution_folder)
        })?;
    }
    let input_file_stem = args
        .input_file
        .file_stem()
        .and_then(|s| s.to_str())
        .context("input file has no usable stem")?;
    let solution_path = args
        .solution_folder
        .join(format!("sol_{input_file_stem}.json"));
    io::write_json(&ext_solution, &solution_path)?;

    Ok(())
}
