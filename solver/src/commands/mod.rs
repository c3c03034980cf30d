use std::{fs, path::Path, time::Duration};

use anyhow::{Context, Result};
use cycle_cover::Graph;
use instance_parser::{parse_instance, structs::CycleCoverInstance};
use log::trace;

mod benchmark;
mod graph;
mod solve;

pub use benchmark::benchmark;
pub use graph::graph;
pub use solve::solve;

fn read_instance(path: &Path) -> Result<CycleCoverInstance> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    trace!("input file contents: {contents}");

    parse_instance(&contents).with_context(|| format!("failed to parse {}", path.display()))
}

fn read_graph(path: &Path) -> Result<Graph> {
    let instance = read_instance(path)?;
    Graph::from_instance(&instance).with_context(|| format!("invalid instance {}", path.display()))
}

fn budget(seconds: f64) -> Result<Duration> {
    Duration::try_from_secs_f64(seconds)
        .with_context(|| format!("{seconds} is not a valid time budget in seconds"))
}
