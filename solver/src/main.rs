#![forbid(unsafe_code)]
use std::{path::PathBuf, process::ExitCode};

use clap::{Args, Parser, Subcommand};
use clap_verbosity_flag::Verbosity;
use log::{debug, error};

mod commands;

#[derive(Debug, Parser)]
/// Search for heavy vertex-disjoint cycles of bounded length
///
/// A single instance is optimized with `solver solve <input> <output> <seconds>`, which
/// writes the total weight followed by one `u v` line per edge of every cycle.
struct App {
    #[clap(flatten)]
    verbose: Verbosity,

    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a graphviz notation for a problem instance
    Graph {
        #[clap(required = true)]
        input: PathBuf,
        #[clap(required = true)]
        output: PathBuf,
    },
    /// Search for a cycle cover within a time budget and write it to a file
    Solve(Solve),
    /// Solve every instance in a folder and write the achieved costs
    Benchmark(Benchmark),
}

#[derive(Args, Debug)]
pub struct Solve {
    /// Problem instance
    #[clap(required = true)]
    pub input: PathBuf,
    /// Target file for the solution
    #[clap(required = true)]
    pub output: PathBuf,
    /// Time budget in seconds, fractions are allowed
    #[clap(required = true)]
    pub seconds: f64,
    /// Seed for a reproducible run
    #[clap(long)]
    pub seed: Option<u64>,
    /// Run the initial constructions on a thread pool
    #[clap(long)]
    pub parallel: bool,
    /// Size of the thread pool, defaults to the number of cpus
    #[clap(long, requires = "parallel")]
    pub threads: Option<usize>,
    /// Remember recently visited solutions, 1000 of them if no capacity is given
    #[clap(long, value_name = "CAPACITY", num_args = 0..=1, default_missing_value = "1000")]
    pub tabu_memory: Option<usize>,
    /// Write a JSON summary of the run to this file
    #[clap(long)]
    pub summary: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct Benchmark {
    /// Folder with problem instances
    #[clap(required = true)]
    pub folder: PathBuf,
    /// Target file for the costs
    #[clap(required = true)]
    pub output: PathBuf,
    /// Time budget per instance in seconds
    #[clap(required = true)]
    pub seconds: f64,
    /// Seed shared by every run
    #[clap(long)]
    pub seed: Option<u64>,
}

fn main() -> ExitCode {
    let args: App = App::parse();

    env_logger::Builder::new()
        .filter_level(args.verbose.log_level_filter())
        .init();

    debug!("{args:?}");

    if let Err(err) = match args.command {
        Commands::Graph { input, output } => commands::graph(input, output),
        Commands::Solve(solve) => commands::solve(solve),
        Commands::Benchmark(benchmark) => commands::benchmark(benchmark),
    } {
        error!("An error occurred: {err:#}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
