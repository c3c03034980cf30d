use std::{fs::File, io::BufWriter, path::Path};

use anyhow::{Context, Result};
use cycle_cover::{report::write_solution, OptimizedCover, SearchOptions};
use log::info;
use serde::Serialize;

use crate::Solve;

use super::{budget, read_graph};

#[derive(Debug, Serialize)]
struct RunSummary<'a> {
    input: &'a Path,
    nodes: usize,
    edges: usize,
    max_cycle_length: usize,
    seed: Option<u64>,
    cost: f64,
    cycles: usize,
    covered_nodes: usize,
    restarts: usize,
    iterations: usize,
    elapsed_ms: u128,
}

fn write_summary(path: &Path, summary: &RunSummary) -> Result<()> {
    let writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(writer, summary)?;
    info!("Wrote run summary to: {path:?}");
    Ok(())
}

pub fn solve(args: Solve) -> Result<()> {
    let budget = budget(args.seconds)?;
    let graph = read_graph(&args.input)?;

    let options = SearchOptions {
        seed: args.seed,
        parallel: args.parallel,
        threads: args.threads,
        tabu_list_size: args.tabu_memory,
        ..SearchOptions::default()
    };
    let cover: OptimizedCover = cycle_cover::solve(&graph, &options, budget);

    let mut writer = BufWriter::new(
        File::create(&args.output)
            .with_context(|| format!("failed to create {}", args.output.display()))?,
    );
    write_solution(&mut writer, &cover)?;
    info!("Wrote solution with cost {} to: {:?}", cover.cost, args.output);

    if let Some(path) = &args.summary {
        let summary = RunSummary {
            input: &args.input,
            nodes: graph.node_count(),
            edges: graph.edge_count(),
            max_cycle_length: graph.max_cycle_length(),
            seed: args.seed,
            cost: cover.cost,
            cycles: cover.cycles.len(),
            covered_nodes: cover.cycles.iter().map(Vec::len).sum(),
            restarts: cover.restarts,
            iterations: cover.iterations,
            elapsed_ms: cover.elapsed.as_millis(),
        };
        write_summary(path, &summary)?;
    }

    Ok(())
}
