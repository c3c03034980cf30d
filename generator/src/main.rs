use std::{
    fs::File,
    io::{BufWriter, Write},
    path::PathBuf,
};

use clap::Parser;
use rand::{rngs::StdRng, SeedableRng};

mod generator;

/// Program to generate random instances for the cycle cover solver
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Number of nodes to generate
    #[clap(short, long, env, default_value_t = 100)]
    nodes: usize,

    /// Outgoing edges per node
    #[clap(short, long, env, default_value_t = 5)]
    out_degree: usize,

    /// Longest cycle that counts
    #[clap(short = 'l', long, env, default_value_t = 4)]
    max_cycle_length: usize,

    /// Edge weights are drawn from [1, max_weight]
    #[clap(short = 'w', long, env, default_value_t = 100.0)]
    max_weight: f64,

    /// Seed for a reproducible instance
    #[clap(short, long, env)]
    seed: Option<u64>,

    /// Target file for output
    file: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let args: Args = Args::parse();

    if !(args.max_weight >= 1.0 && args.max_weight.is_finite()) {
        anyhow::bail!("max weight must be a finite number of at least 1");
    }

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let instance = generator::generate_instance(
        &mut rng,
        args.nodes,
        args.out_degree,
        args.max_cycle_length,
        args.max_weight,
    );

    let mut writer = BufWriter::new(File::create(args.file)?);
    write!(writer, "{instance}")?;
    writer.flush()?;

    Ok(())
}
