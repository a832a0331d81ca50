use anyhow::{Context, Result};
use clap::Parser;
use log::LevelFilter;

use pgs::io;
use pgs::opt::hypersearch::{run_worker_task, WorkerTask};

/// Hyper-search worker process. Spawned by the parent solver with its task
/// serialized on stdin; writes its best-solution artifact to stdout on exit.
/// Not meant to be run by hand.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    #[arg(
        short,
        long,
        value_name = "[off, error, warn, info, debug, trace]",
        default_value = "warn"
    )]
    pub log_level: LevelFilter,
}

fn main() -> Result<()> {
    let args = Cli::parse();
    io::init_worker_logger(args.log_level)?;

    let task: WorkerTask =
        serde_json::from_reader(std::io::stdin().lock()).context("could not read the task")?;
    if task.inject_failure {
        panic!("injected worker failure");
    }

    let report = run_worker_task(task)?;
    serde_json::to_writer(std::io::stdout().lock(), &report)
        .context("could not write the report")?;
    Ok(())
}
