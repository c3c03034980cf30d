use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use cycle_cover::{
    cycles::find_cycles, search::construction::construct, session::SearchSession, solve, Graph,
    SearchOptions,
};
use rand::{rngs::StdRng, seq::index::sample, Rng, SeedableRng};

fn random_graph(node_count: usize, out_degree: usize, max_cycle_length: usize, seed: u64) -> Graph {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut edges = Vec::with_capacity(node_count * out_degree);
    for source in 0..node_count {
        for target in sample(&mut rng, node_count, out_degree).into_iter() {
            if target != source {
                edges.push((source, target, rng.gen_range(1.0..100.0)));
            }
        }
    }

    Graph::new(node_count, max_cycle_length, edges).unwrap()
}

pub fn criterion_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("cycle_cover");
    group.sample_size(20);
    group.sampling_mode(criterion::SamplingMode::Flat);

    for node_count in [100, 1000] {
        let graph = random_graph(node_count, 8, 4, 7);
        let solution = {
            let mut session = SearchSession::new(node_count, Some(7));
            construct(&graph, &mut session)
        };

        group.bench_with_input(
            BenchmarkId::new("find_cycles", node_count),
            &solution,
            |b, solution| b.iter(|| find_cycles(&graph, black_box(solution))),
        );

        group.bench_with_input(BenchmarkId::new("construct", node_count), &graph, |b, graph| {
            b.iter(|| construct(graph, &mut SearchSession::new(node_count, Some(7))))
        });

        for parallel in [false, true] {
            let options = SearchOptions::default()
                .with_seed(7)
                .with_parallel(parallel);
            group.bench_with_input(
                BenchmarkId::new(
                    format!("solve_{}", if parallel { "parallel" } else { "single" }),
                    node_count,
                ),
                &options,
                |b, options| b.iter(|| solve(&graph, options, Duration::from_millis(200))),
            );
        }
    }
    group.finish();
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
