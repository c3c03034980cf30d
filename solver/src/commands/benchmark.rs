use anyhow::Result;
use cycle_cover::SearchOptions;
use log::info;

use crate::Benchmark;

use super::{budget, read_graph};

pub fn benchmark(benchmark: Benchmark) -> Result<()> {
    if !benchmark.folder.is_dir() {
        anyhow::bail!("{} is not a directory", benchmark.folder.display())
    }
    let budget = budget(benchmark.seconds)?;

    let mut paths = benchmark
        .folder
        .read_dir()?
        .map(|entry| entry.map(|entry| entry.path()))
        .collect::<Result<Vec<_>, _>>()?;
    paths.retain(|path| path.is_file());
    paths.sort();

    let options = SearchOptions {
        seed: benchmark.seed,
        ..SearchOptions::default()
    };

    let results = paths
        .iter()
        .map(|path| {
            let graph = read_graph(path)?;
            let cover = cycle_cover::solve(&graph, &options, budget);
            info!("{path:?}: {}", cover.cost);
            Ok(format!("{path:?}: {}", cover.cost))
        })
        .collect::<Result<Vec<String>>>()?;

    std::fs::write(&benchmark.output, results.join("\n"))?;
    info!("Wrote {} results to: {:?}", results.len(), benchmark.output);

    Ok(())
}
