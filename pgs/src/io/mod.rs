pub mod cli;

use crate::config::Settings;
use crate::EPOCH;
use anyhow::{Context, Result};
use gridpack::io::ext_repr::{ExtContainers, ExtItems};
use log::{log, Level, LevelFilter};
use serde::{Deserialize, Serialize};
use std::fs;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

/// On-disk problem document: id-keyed items, plus either fixed containers or
/// a strip width, and optional settings.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ExtProblem {
    pub items: ExtItems,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub containers: Option<ExtContainers>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strip_pack_width: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub settings: Option<Settings>,
}

pub fn read_problem(path: &Path) -> Result<ExtProblem> {
    let file = File::open(path).context("could not open problem file")?;
    serde_json::from_reader(BufReader::new(file)).context("not a valid problem document")
}

pub fn write_json(json: &impl Serialize, path: &Path) -> Result<()> {
    let file = File::create(path)?;
    serde_json::to_writer_pretty(BufWriter::new(file), json)?;
    log::info!(
        "solution written to file://{}",
        fs::canonicalize(path)?.to_str().unwrap_or("?")
    );
    Ok(())
}

pub fn init_logger(level_filter: LevelFilter) -> Result<()> {
    dispatch(level_filter).chain(std::io::stdout()).apply()?;
    log!(Level::Info, "Epoch: {}", jiff::Timestamp::now());
    Ok(())
}

/// Logger of a worker process: stderr only, its stdout carries the report.
/// Each worker writes its own stream, so no log line is ever truncated by a
/// sibling.
pub fn init_worker_logger(level_filter: LevelFilter) -> Result<()> {
    dispatch(level_filter).chain(std::io::stderr()).apply()?;
    Ok(())
}

fn dispatch(level_filter: LevelFilter) -> fern::Dispatch {
    fern::Dispatch::new()
        .format(|out, message, record| {
            let handle = std::thread::current();
            let thread_name = handle.name().unwrap_or("-");

            let duration = EPOCH.elapsed();
            let sec = duration.as_secs() % 60;
            let min = (duration.as_secs() / 60) % 60;
            let hours = (duration.as_secs() / 60) / 60;

            let prefix = format!(
                "[{}] [{:0>2}:{:0>2}:{:0>2}] <{}>",
                record.level(),
                hours,
                min,
                sec,
                thread_name,
            );

            out.finish(format_args!("{prefix:<27}{message}"))
        })
        .level(level_filter)
}
